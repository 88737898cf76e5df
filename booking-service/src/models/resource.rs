use mongodb::bson::oid::ObjectId;
use service_core::error::AppError;

/// The two document collections exposed over HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Enquiry,
    Booking,
}

impl Resource {
    pub fn collection(self) -> &'static str {
        match self {
            Resource::Enquiry => "enquiries",
            Resource::Booking => "bookings",
        }
    }

    pub fn noun(self) -> &'static str {
        match self {
            Resource::Enquiry => "enquiry",
            Resource::Booking => "booking",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Resource::Enquiry => "Enquiry",
            Resource::Booking => "Booking",
        }
    }

    /// Parse a path identifier, rejecting anything that is not an ObjectId.
    pub fn parse_id(self, raw: &str) -> Result<ObjectId, AppError> {
        ObjectId::parse_str(raw).map_err(|_| {
            tracing::warn!(collection = self.collection(), id = %raw, "Invalid ObjectId format");
            AppError::BadRequest(anyhow::anyhow!("Invalid {} ID format", self.noun()))
        })
    }

    pub fn not_found(self) -> AppError {
        AppError::NotFound(anyhow::anyhow!("{} not found", self.title()))
    }

    pub fn deleted_message(self) -> String {
        format!("{} deleted successfully", self.title())
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.noun())
    }
}
