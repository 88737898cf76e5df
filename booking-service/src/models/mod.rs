pub mod booking;
pub mod document;
pub mod enquiry;
pub mod resource;

pub use booking::{status_distribution, BookingDebugInfo};
pub use document::Document;
pub use enquiry::{apply_resolution, EnquirySummary};
pub use resource::Resource;
