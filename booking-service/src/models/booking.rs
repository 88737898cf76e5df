use super::document::{
    bson_to_json, field_json, has_items, is_truthy, Document, ID_FIELD, UPDATED_AT,
};
use mongodb::bson::Bson;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

pub const NO_STATUS: &str = "No Status";

/// Read-only snapshot of a booking's key fields.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDebugInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<Value>,
    pub has_package_details: bool,
    pub has_themes: bool,
    pub has_addons: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub themes: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addons: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<Value>,
    pub all_fields: Vec<String>,
}

impl BookingDebugInfo {
    pub fn from_document(document: &Document) -> Self {
        Self {
            booking_id: field_json(document, ID_FIELD),
            status: field_json(document, "status"),
            customer_name: field_json(document, "customerName"),
            has_package_details: is_truthy(document.get("packageDetails")),
            has_themes: has_items(document.get("themes")),
            has_addons: has_items(document.get("addons")),
            total_amount: field_json(document, "totalAmount"),
            package_details: field_json(document, "packageDetails"),
            themes: field_json(document, "themes"),
            addons: field_json(document, "addons"),
            last_updated: field_json(document, UPDATED_AT),
            all_fields: document.keys().cloned().collect(),
        }
    }

    /// Emit the presence summary as a structured log event.
    pub fn log(&self) {
        let package_keys: Vec<&str> = match &self.package_details {
            Some(Value::Object(map)) => map.keys().map(String::as_str).collect(),
            _ => Vec::new(),
        };

        tracing::debug!(
            has_package_details = self.has_package_details,
            has_themes = self.has_themes,
            has_addons = self.has_addons,
            total_amount = ?self.total_amount,
            status = ?self.status,
            package_details_keys = ?package_keys,
            themes_count = count(&self.themes),
            addons_count = count(&self.addons),
            "Booking data integrity check"
        );
    }
}

fn count(value: &Option<Value>) -> usize {
    match value {
        Some(Value::Array(items)) => items.len(),
        _ => 0,
    }
}

/// Count documents per `status`, bucketing missing or empty ones as
/// `"No Status"`.
pub fn status_distribution(documents: &[Document]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for document in documents {
        let key = match document.get("status") {
            Some(Bson::String(s)) if !s.is_empty() => s.clone(),
            Some(other) if is_truthy(Some(other)) => bson_to_json(other).to_string(),
            _ => NO_STATUS.to_string(),
        };
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}
