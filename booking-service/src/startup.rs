//! Application startup and lifecycle management.

use crate::config::BookingConfig;
use crate::handlers::{self, bookings, debug, enquiries};
use crate::middleware::{origin_guard, AllowedOrigins};
use crate::services::{get_metrics, DocumentStore, MongoStore};
use axum::{
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    response::IntoResponse,
    routing::get,
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics_middleware, request_id_middleware, request_span, security_headers_middleware,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: BookingConfig,
    pub store: Arc<dyn DocumentStore>,
}

async fn metrics_endpoint() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        get_metrics(),
    )
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/collections", get(debug::list_collections))
        .route(
            "/enquiries",
            get(enquiries::list_enquiries).post(enquiries::create_enquiry),
        )
        .route(
            "/enquiries/:id",
            get(enquiries::get_enquiry)
                .put(enquiries::update_enquiry)
                .delete(enquiries::delete_enquiry),
        )
        .route(
            "/bookings",
            get(bookings::list_bookings).post(bookings::create_booking),
        )
        .route(
            "/bookings/:id",
            get(bookings::get_booking)
                .put(bookings::update_booking)
                .delete(bookings::delete_booking),
        )
        .route("/debug/enquiries", get(debug::debug_enquiries))
        .route("/debug/booking/:id", get(debug::debug_booking))
}

/// Build the full router: `/api` routes, `/metrics`, and the middleware stack.
pub fn build_router(state: AppState) -> Router {
    let allowed_origins = AllowedOrigins::new(state.config.cors.allowed_origins.clone());

    Router::new()
        .nest("/api", api_routes())
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(allowed_origins.cors_layer())
        .layer(from_fn_with_state(allowed_origins, origin_guard))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Connect to MongoDB and build the application.
    ///
    /// Fails if the database cannot be reached; the service never starts
    /// without its store.
    pub async fn build(config: BookingConfig) -> Result<Self, AppError> {
        let store = MongoStore::connect(&config.mongodb.uri, &config.mongodb.database)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::Error::new(e)))?;

        store.ping().await.map_err(|e| {
            tracing::error!("MongoDB did not answer ping: {}", e);
            AppError::DatabaseError(anyhow::Error::new(e))
        })?;

        Self::with_store(config, Arc::new(store)).await
    }

    /// Build the application around an already constructed store.
    pub async fn with_store(
        config: BookingConfig,
        store: Arc<dyn DocumentStore>,
    ) -> Result<Self, AppError> {
        // Port 0 picks a random free port (tests)
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        let router = build_router(AppState { config, store });

        tracing::info!("Server is running on port {}", port);
        tracing::info!("API endpoints available at http://localhost:{}/api", port);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until Ctrl+C or SIGTERM.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}
