//! Flarecast REST API
//!
//! HTTP API layer, built with Axum.
//!
//! # Endpoints
//!
//! ## Observations
//! - `POST /api/v1/observations` - Record a pain observation
//! - `GET /api/v1/observations` - List observations
//! - `GET /api/v1/observations/:id` - Get an observation
//! - `PUT /api/v1/observations/:id` - Edit an observation
//! - `DELETE /api/v1/observations/:id` - Delete an observation
//!
//! ## Analysis
//! - `POST /api/v1/analyze` - Run a fresh analysis
//! - `GET /api/v1/correlations` - Pain-factor correlations, strongest first
//! - `GET /api/v1/insights` - Derived insights
//!
//! ## Forecast
//! - `GET /api/v1/forecast` - Aggregated days annotated with risk scores
//! - `GET /api/v1/risk` - Tomorrow's flare risk
//!
//! ## Location
//! - `GET /api/v1/location` - Currently configured location
//! - `PUT /api/v1/location` - Resolve a place name and set it
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use crate::config::ApiConfig;
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Observation routes
        .route("/observations", post(routes::observations::create))
        .route("/observations", get(routes::observations::list))
        .route("/observations/:id", get(routes::observations::get))
        .route("/observations/:id", put(routes::observations::update))
        .route("/observations/:id", delete(routes::observations::delete))
        // Analysis routes
        .route("/analyze", post(routes::analysis::run))
        .route("/correlations", get(routes::analysis::correlations))
        .route("/insights", get(routes::analysis::insights))
        // Forecast routes
        .route("/forecast", get(routes::forecast::forecast))
        .route("/risk", get(routes::forecast::risk))
        // Location routes
        .route("/location", get(routes::location::get))
        .route("/location", put(routes::location::set));

    let health_routes = Router::new()
        .route("/live", get(routes::health::live))
        .route("/ready", get(routes::health::ready))
        .route("/", get(routes::health::full));

    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()) // Configure properly in production
        .with_state(shared_state)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Flarecast API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Flarecast API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
