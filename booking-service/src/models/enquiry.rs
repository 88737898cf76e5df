use super::document::{field_json, is_truthy, Document, ID_FIELD};
use mongodb::bson::Bson;
use serde::Serialize;
use serde_json::Value;

pub const STATUS_FIELD: &str = "status";
pub const IS_RESOLVED_FIELD: &str = "isResolved";
pub const CLOSED_STATUS: &str = "Closed";

/// Keep `isResolved` in step with `status` on an enquiry update.
///
/// When the payload sets a non-null `status` and says nothing about
/// `isResolved`, the flag becomes `status == "Closed"`. An explicit
/// `isResolved` always wins.
pub fn apply_resolution(changes: &mut Document) {
    if changes.contains_key(IS_RESOLVED_FIELD) {
        return;
    }

    let resolved = match changes.get(STATUS_FIELD) {
        None | Some(Bson::Null) => return,
        Some(Bson::String(status)) => status == CLOSED_STATUS,
        Some(_) => false,
    };

    changes.insert(IS_RESOLVED_FIELD, resolved);
}

/// Row of the enquiry debug listing.
#[derive(Debug, Serialize)]
pub struct EnquirySummary {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Value>,
}

impl EnquirySummary {
    pub fn from_document(document: &Document) -> Self {
        Self {
            id: field_json(document, ID_FIELD),
            name: field_json(document, "name"),
            status: field_json(document, STATUS_FIELD),
            email: field_json(document, "email"),
        }
    }
}

/// Log which contact fields an enquiry carries after a write.
pub fn log_integrity(document: &Document) {
    tracing::debug!(
        has_name = is_truthy(document.get("name")),
        has_email = is_truthy(document.get("email")),
        has_phone = is_truthy(document.get("phone")),
        has_event_date = is_truthy(document.get("eventDate")),
        status = ?document.get(STATUS_FIELD),
        is_resolved = ?document.get(IS_RESOLVED_FIELD),
        "Enquiry data integrity check"
    );
}
