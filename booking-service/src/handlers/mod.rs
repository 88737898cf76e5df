//! HTTP handlers for booking-service.

pub mod bookings;
pub mod debug;
pub mod enquiries;
mod extract;
pub mod health;
mod resources;

pub use health::health_check;
