use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use service_core::error::AppError;

/// `Json` whose rejections (missing content type, malformed or mistyped
/// body) answer with the API's JSON error shape and status 400.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            tracing::warn!(status = %e.status(), "Rejected request body: {}", e.body_text());
            AppError::BadRequest(anyhow::anyhow!("Invalid JSON body: {}", e.body_text()))
        })?;

        Ok(JsonBody(value))
    }
}
