use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{Map, Value};

use super::extract::JsonBody;
use super::resources;
use crate::models::Resource;
use crate::startup::AppState;
use service_core::error::AppError;

#[tracing::instrument(skip(state))]
pub async fn list_enquiries(State(state): State<AppState>) -> Result<Json<Vec<Value>>, AppError> {
    resources::list(&state, Resource::Enquiry).await
}

#[tracing::instrument(skip(state))]
pub async fn get_enquiry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    resources::get(&state, Resource::Enquiry, &id).await
}

#[tracing::instrument(skip(state, payload))]
pub async fn create_enquiry(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<Map<String, Value>>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    resources::create(&state, Resource::Enquiry, payload).await
}

#[tracing::instrument(skip(state, payload))]
pub async fn update_enquiry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<Map<String, Value>>,
) -> Result<Json<Value>, AppError> {
    resources::update(&state, Resource::Enquiry, &id, payload).await
}

#[tracing::instrument(skip(state))]
pub async fn delete_enquiry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    resources::delete(&state, Resource::Enquiry, &id).await
}
