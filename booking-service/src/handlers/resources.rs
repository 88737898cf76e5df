//! CRUD logic shared by the enquiry and booking routes.
//!
//! Each operation is one store call, or a write followed by a re-read, with
//! the result rendered as plain JSON.

use axum::{http::StatusCode, Json};
use mongodb::bson::DateTime;
use serde_json::{json, Map, Value};

use crate::models::document::{self, stamp_created, stamp_updated};
use crate::models::{apply_resolution, enquiry, status_distribution, BookingDebugInfo, Resource};
use crate::startup::AppState;
use service_core::error::AppError;

pub async fn list(state: &AppState, resource: Resource) -> Result<Json<Vec<Value>>, AppError> {
    let documents = state
        .store
        .find_all(resource.collection())
        .await
        .map_err(|e| e.during(format!("Failed to fetch {}", resource.collection())))?;

    tracing::info!(
        collection = resource.collection(),
        count = documents.len(),
        "Fetched documents from MongoDB"
    );

    if resource == Resource::Booking {
        tracing::debug!(
            distribution = ?status_distribution(&documents),
            "Current booking status distribution"
        );
    }

    Ok(Json(documents.iter().map(document::to_json).collect()))
}

pub async fn get(
    state: &AppState,
    resource: Resource,
    raw_id: &str,
) -> Result<Json<Value>, AppError> {
    let id = resource.parse_id(raw_id)?;

    let found = state
        .store
        .find_by_id(resource.collection(), &id)
        .await
        .map_err(|e| e.during(format!("Failed to fetch {}", resource.noun())))?;

    match found {
        Some(doc) => Ok(Json(document::to_json(&doc))),
        None => Err(resource.not_found()),
    }
}

pub async fn create(
    state: &AppState,
    resource: Resource,
    payload: Map<String, Value>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let action = format!("Failed to create {}", resource.noun());

    let mut new_document = document::from_json(payload);
    stamp_created(&mut new_document, DateTime::now());

    let id = state
        .store
        .insert_one(resource.collection(), new_document)
        .await
        .map_err(|e| e.during(action.as_str()))?;

    let created = state
        .store
        .find_by_id(resource.collection(), &id)
        .await
        .map_err(|e| e.during(action.as_str()))?
        .ok_or_else(|| {
            tracing::error!(
                collection = resource.collection(),
                id = %id,
                "Inserted document could not be read back"
            );
            AppError::InternalError(anyhow::anyhow!("{}", action))
        })?;

    tracing::info!(collection = resource.collection(), id = %id, "Created document");

    Ok((StatusCode::CREATED, Json(document::to_json(&created))))
}

pub async fn update(
    state: &AppState,
    resource: Resource,
    raw_id: &str,
    payload: Map<String, Value>,
) -> Result<Json<Value>, AppError> {
    let id = resource.parse_id(raw_id)?;
    let action = format!("Failed to update {}", resource.noun());

    let mut changes = document::from_json(payload);
    stamp_updated(&mut changes, DateTime::now());
    if resource == Resource::Enquiry {
        apply_resolution(&mut changes);
    }

    tracing::debug!(
        collection = resource.collection(),
        id = %id,
        fields = ?changes.keys().collect::<Vec<_>>(),
        "Applying update"
    );

    let matched = state
        .store
        .update_by_id(resource.collection(), &id, changes)
        .await
        .map_err(|e| e.during(action.as_str()))?;

    if matched == 0 {
        tracing::warn!(
            collection = resource.collection(),
            id = %id,
            "No document matched update"
        );
        return Err(resource.not_found());
    }

    let updated = state
        .store
        .find_by_id(resource.collection(), &id)
        .await
        .map_err(|e| e.during(action.as_str()))?
        .ok_or_else(|| resource.not_found())?;

    match resource {
        Resource::Enquiry => enquiry::log_integrity(&updated),
        Resource::Booking => BookingDebugInfo::from_document(&updated).log(),
    }
    tracing::info!(
        collection = resource.collection(),
        id = %id,
        status = ?updated.get("status"),
        "Updated document"
    );

    Ok(Json(document::to_json(&updated)))
}

pub async fn delete(
    state: &AppState,
    resource: Resource,
    raw_id: &str,
) -> Result<Json<Value>, AppError> {
    let id = resource.parse_id(raw_id)?;

    let deleted = state
        .store
        .delete_by_id(resource.collection(), &id)
        .await
        .map_err(|e| e.during(format!("Failed to delete {}", resource.noun())))?;

    if deleted == 0 {
        return Err(resource.not_found());
    }

    tracing::info!(collection = resource.collection(), id = %id, "Deleted document");

    Ok(Json(json!({ "message": resource.deleted_message() })))
}
