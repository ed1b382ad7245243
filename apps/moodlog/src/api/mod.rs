//! # Moodlog HTTP API Module
//!
//! Read-only dashboard API over the mood store, plus the refresh trigger.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /status` - Sync state, record count, last error
//! - `GET /summary` - Counts, percentages, trend and summary label
//! - `GET /records` - Full history in producer order
//! - `GET /records/filter?keyword=` - Case-insensitive message search
//! - `GET /export[?keyword=]` - CSV download
//! - `POST /refresh` - Pull the log from the sentiment backend
//!
//! CORS origins and the rate limit come from `[server]` in the config.

mod handlers;
mod middleware;
mod types;

pub use handlers::MAX_QUERY_KEYWORD_BYTES;
pub use middleware::create_rate_limiter;
pub use types::{
    ErrorResponse, FilterResponse, HealthResponse, RecordJson, RecordsResponse, RefreshResponse,
    StatusResponse, SummaryResponse,
};

use crate::config::{Config, ServerConfig};
use crate::sync::{StoreReader, SyncController};
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use std::io;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state.
#[derive(Clone)]
pub struct AppState {
    /// The only writer of the store.
    pub sync: SyncController,
    /// Read-only view of the store `sync` writes.
    pub store: StoreReader,
    /// Suggested download name for `/export`.
    pub export_filename: Arc<str>,
}

impl AppState {
    #[must_use]
    pub fn new(sync: SyncController, export_filename: &str) -> Self {
        Self {
            store: sync.reader(),
            sync,
            export_filename: Arc::from(export_filename),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build the CORS layer from `server.cors_origins`.
///
/// - `["*"]`: any origin
/// - `None`: localhost only
/// - otherwise: the listed origins
fn build_cors_layer(origins: Option<&[String]>) -> CorsLayer {
    match origins {
        Some([only]) if only == "*" => {
            tracing::warn!("CORS: Allowing ALL origins. Do not expose this to the internet.");
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match origin.parse::<HeaderValue>() {
                    Ok(hv) => {
                        tracing::info!("CORS: Allowing origin: {}", origin);
                        Some(hv)
                    }
                    Err(e) => {
                        tracing::warn!("CORS: Invalid origin '{}': {}", origin, e);
                        None
                    }
                })
                .collect();

            if allowed.is_empty() {
                tracing::warn!("CORS: No valid origins configured, defaulting to localhost only");
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed)
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE])
            }
        }
        None => build_localhost_cors(),
    }
}

fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:8080",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:8080",
    ]
    .into_iter()
    .filter_map(|o| o.parse::<HeaderValue>().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner): tracing, CORS, body limit, rate limit.
pub fn create_router(state: AppState, server: &ServerConfig) -> Router {
    let cors = build_cors_layer(server.cors_origins.as_deref());

    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/status", get(handlers::status_handler))
        .route("/summary", get(handlers::summary_handler))
        .route("/records", get(handlers::records_handler))
        .route("/records/filter", get(handlers::filter_handler))
        .route("/export", get(handlers::export_handler))
        .route("/refresh", post(handlers::refresh_handler));

    if server.rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", server.rate_limit);
        router = router.layer(axum_middleware::from_fn_with_state(
            create_rate_limiter(server.rate_limit),
            middleware::rate_limit_middleware,
        ));
    } else {
        tracing::info!("Rate limiting disabled");
    }

    router
        .layer(axum::extract::DefaultBodyLimit::max(64 * 1024))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Serve the dashboard API until the process is stopped.
///
/// The first refresh runs before the listener accepts requests; its failure
/// is logged and leaves the store `Failed` rather than aborting startup.
pub async fn run_server(config: &Config, sync: SyncController) -> io::Result<()> {
    if let Err(e) = sync.refresh().await {
        tracing::warn!("Initial refresh failed: {}", e);
    }

    let state = AppState::new(sync, &config.export.filename);
    let router = create_router(state, &config.server);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Moodlog dashboard API listening on {}", addr);

    axum::serve(listener, router).await
}
