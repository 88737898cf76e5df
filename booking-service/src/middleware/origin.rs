use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use service_core::error::AppError;
use std::collections::HashSet;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Browser origins allowed to call the API.
#[derive(Debug, Clone)]
pub struct AllowedOrigins(Arc<HashSet<String>>);

impl AllowedOrigins {
    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(Arc::new(origins.into_iter().map(Into::into).collect()))
    }

    pub fn permits(&self, origin: &HeaderValue) -> bool {
        origin
            .to_str()
            .map(|o| self.0.contains(o))
            .unwrap_or(false)
    }

    /// CORS response headers for the allowed origins.
    ///
    /// Entries that are not valid header values are skipped with a warning.
    pub fn cors_layer(&self) -> CorsLayer {
        let origins: Vec<HeaderValue> = self
            .0
            .iter()
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::error!("Invalid CORS origin '{}': {}. Skipping.", o, e);
                    None
                }
            })
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([
                Method::GET,
                Method::HEAD,
                Method::PUT,
                Method::PATCH,
                Method::POST,
                Method::DELETE,
            ])
            .allow_headers([
                header::CONTENT_TYPE,
                header::AUTHORIZATION,
                header::HeaderName::from_static("x-request-id"),
            ])
            .allow_credentials(true)
    }
}

/// Reject requests whose `Origin` is not allow-listed before they reach a
/// handler. Requests without an `Origin` header (curl, server-to-server) pass.
pub async fn origin_guard(
    State(allowed): State<AllowedOrigins>,
    req: Request,
    next: Next,
) -> Response {
    match req.headers().get(header::ORIGIN) {
        Some(origin) if !allowed.permits(origin) => {
            tracing::warn!(origin = ?origin, "Rejected request from disallowed origin");
            AppError::Forbidden(anyhow::anyhow!("Not allowed by CORS")).into_response()
        }
        _ => next.run(req).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permits_only_listed_origins() {
        let allowed = AllowedOrigins::new(["http://localhost:3000"]);

        assert!(allowed.permits(&HeaderValue::from_static("http://localhost:3000")));
        assert!(!allowed.permits(&HeaderValue::from_static("http://localhost:3000/")));
        assert!(!allowed.permits(&HeaderValue::from_static("https://evil.example")));
    }
}
