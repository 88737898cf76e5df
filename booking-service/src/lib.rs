//! booking-service: REST API over the party enquiry and booking collections.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;

pub const SERVICE_NAME: &str = "booking-service";
