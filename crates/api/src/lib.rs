//! # Signage API
//!
//! The API crate serves the weekly screen schedules over HTTP. It is the
//! remote schedule service the editing store saves to and loads from, and
//! it answers playback queries with each screen's resolved program.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Implement request processing logic
//! - **Middleware**: Error mapping shared by every handler
//! - **Repository**: In-memory block storage keyed by screen
//! - **Config**: Environment configuration
//!
//! The API uses Axum as the web framework.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Error mapping for handlers
pub mod middleware;
/// In-memory schedule storage
pub mod repository;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
};
use eyre::Result;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use crate::repository::ScheduleRepository;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    /// Block storage backing every schedule endpoint
    pub repository: ScheduleRepository,
}

impl ApiState {
    pub fn new(repository: ScheduleRepository) -> Self {
        Self { repository }
    }
}

/// Builds the application router with every route attached to `state`.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use signage_api::{ApiState, build_router, repository::ScheduleRepository};
///
/// let app = build_router(Arc::new(ApiState::new(ScheduleRepository::new())));
/// ```
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Schedule load/save endpoints
        .merge(routes::schedule::routes())
        // Playback endpoints
        .merge(routes::program::routes())
        // Editor grid endpoints
        .merge(routes::grid::routes())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods([Method::GET, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_origin(origins)
}

/// Starts the API server with the provided configuration and repository
///
/// Installs the tracing subscriber, applies the CORS, tracing and timeout
/// layers, and serves until the listener fails.
pub async fn start_server(config: config::ApiConfig, repository: ScheduleRepository) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let state = Arc::new(ApiState::new(repository));
    let app = build_router(state);

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)),
        None => app,
    };

    // Request tracing and timeout middleware
    let app = app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout))),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
