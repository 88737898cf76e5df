use booking_service::config::BookingConfig;
use booking_service::services::init_metrics;
use booking_service::startup::Application;
use booking_service::SERVICE_NAME;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = BookingConfig::load()
        .map_err(|e| std::io::Error::other(format!("Configuration error: {}", e)))?;

    init_tracing(
        SERVICE_NAME,
        &config.observability.log_level,
        config.observability.otlp_endpoint.as_deref(),
    );

    if let Err(e) = init_metrics() {
        tracing::warn!("Metrics disabled: {}", e);
    }

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to start {}: {}", SERVICE_NAME, e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    app.run_until_stopped().await
}
