use axum::{response::IntoResponse, Json};
use chrono::{SecondsFormat, Utc};
use serde_json::json;

/// Liveness only: answers whenever the process is serving requests.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "Server is running",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }))
}
