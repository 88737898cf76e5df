//! Read-only diagnostics over the stored collections.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::models::{document, BookingDebugInfo, EnquirySummary, Resource};
use crate::startup::AppState;
use service_core::error::AppError;

#[derive(Debug, Serialize)]
pub struct EnquiryDebugResponse {
    pub count: usize,
    pub enquiries: Vec<EnquirySummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDebugResponse {
    pub booking: Value,
    pub debug_info: BookingDebugInfo,
}

#[tracing::instrument(skip(state))]
pub async fn list_collections(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, AppError> {
    let names = state
        .store
        .collection_names()
        .await
        .map_err(|e| e.during("Failed to fetch collections"))?;

    Ok(Json(names))
}

#[tracing::instrument(skip(state))]
pub async fn debug_enquiries(
    State(state): State<AppState>,
) -> Result<Json<EnquiryDebugResponse>, AppError> {
    let documents = state
        .store
        .find_all(Resource::Enquiry.collection())
        .await
        .map_err(|e| e.during("Failed to fetch debug data"))?;

    let enquiries: Vec<EnquirySummary> = documents
        .iter()
        .map(EnquirySummary::from_document)
        .collect();

    for (index, summary) in enquiries.iter().enumerate() {
        tracing::debug!(
            position = index + 1,
            id = ?summary.id,
            name = ?summary.name,
            status = ?summary.status,
            "Stored enquiry"
        );
    }

    Ok(Json(EnquiryDebugResponse {
        count: enquiries.len(),
        enquiries,
    }))
}

#[tracing::instrument(skip(state))]
pub async fn debug_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BookingDebugResponse>, AppError> {
    let id = Resource::Booking.parse_id(&id)?;

    let booking = state
        .store
        .find_by_id(Resource::Booking.collection(), &id)
        .await
        .map_err(|e| e.during("Debug endpoint failed"))?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Booking not found in database")))?;

    let debug_info = BookingDebugInfo::from_document(&booking);
    debug_info.log();

    Ok(Json(BookingDebugResponse {
        booking: document::to_json(&booking),
        debug_info,
    }))
}
