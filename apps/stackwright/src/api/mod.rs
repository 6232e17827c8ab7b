//! # Stackwright HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /catalog`, `GET /templates` - Palette and templates
//! - `GET /editor` - Live editor state
//! - `POST /editor/{nodes,edges,connect,technology}` - Edit the graph
//! - `POST /editor/{undo,redo}` - Walk the history
//! - `POST /editor/{load,template,new,rename}` - Replace or rename the stack
//! - `POST /validate`, `POST /validate/remote` - Local rules or remote analysis
//!   of a posted graph, or of the editor graph with `{"editor": true}`
//! - `GET /stacks`, `POST /stacks`, `DELETE /stacks/{id}`,
//!   `POST /stacks/{id}/load` - Saved stacks
//! - `GET /github/repos/{user}` - Public repositories (cached)
//!
//! ## Security Configuration
//!
//! Taken from [`ServerConfig`] (file or `STACKWRIGHT_*` variables):
//! - `cors_origins`: comma-separated origins, or "*" for all (default: localhost only)
//! - `rate_limit`: requests per second (default: 100, 0 to disable)
//! - `api_key`: if set, requires Bearer token authentication

mod auth;
mod handlers;
mod middleware;
mod types;

pub use auth::api_key_auth_middleware;
pub use middleware::{GlobalRateLimiter, create_rate_limiter};
pub use types::{
    AddTechnologyRequest, AddTechnologyResponse, ConnectResponse, DeleteStackResponse,
    EdgeChangesRequest, EditorResponse, ErrorResponse, HealthResponse, HistoryStepResponse,
    NodeChangesRequest, RenameRequest, SaveStackResponse, TemplateRequest, TemplateSummary,
    ValidateRequest,
};

use crate::config::{Config, ServerConfig};
use crate::github::GithubClient;
use crate::remote::{RemoteError, RemoteValidator};
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{delete, get, post},
};
use stackwright_core::{LocalStore, StackEditor, StackError, StackLibrary, Technology};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Maximum request body size (stack JSON uploads included).
const MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Storage backend shared by the server.
pub type SharedStore = Box<dyn LocalStore + Send>;

/// Shared server state.
#[derive(Clone)]
pub struct AppState {
    /// The live editing session.
    pub editor: Arc<RwLock<StackEditor>>,
    /// Saved stacks.
    pub library: Arc<Mutex<StackLibrary<SharedStore>>>,
    /// Palette, fetched once at startup.
    pub catalog: Arc<Vec<Technology>>,
    pub validator: Arc<RemoteValidator>,
    pub github: Arc<GithubClient>,
    pub server: Arc<ServerConfig>,
}

impl AppState {
    /// Build the state from config, a store and an already-loaded catalog.
    pub fn new(
        config: &Config,
        store: SharedStore,
        catalog: Vec<Technology>,
    ) -> Result<Self, RemoteError> {
        let editor = StackEditor::new(config.storage.history_depth, chrono::Utc::now());
        Ok(Self {
            editor: Arc::new(RwLock::new(editor)),
            library: Arc::new(Mutex::new(StackLibrary::new(store))),
            catalog: Arc::new(catalog),
            validator: Arc::new(RemoteValidator::new(config.remote.clone())?),
            github: Arc::new(GithubClient::new(config.github.clone())?),
            server: Arc::new(config.server.clone()),
        })
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build the CORS layer.
///
/// - `"*"`: allows all origins (development only)
/// - unset: localhost only
/// - otherwise: the comma-separated list of origins
fn build_cors_layer(origins: Option<&str>) -> CorsLayer {
    match origins {
        Some("*") => {
            tracing::warn!("CORS: Allowing ALL origins. This is insecure for production!");
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!("CORS: No valid origins configured, defaulting to localhost only");
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            }
        }
        None => {
            tracing::info!("CORS: No origins configured, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// Restrictive CORS layer for the local dev servers of the site.
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
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Body limit
/// 4. Rate Limiting - if enabled
/// 5. Authentication - if an API key is configured
pub fn create_router(state: AppState) -> Router {
    let server = Arc::clone(&state.server);
    let cors = build_cors_layer(server.cors_origins.as_deref());

    let rate_limiter = if server.rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", server.rate_limit);
        Some(create_rate_limiter(server.rate_limit))
    } else {
        tracing::info!("Rate limiting disabled");
        None
    };

    let api_key = server
        .api_key
        .as_deref()
        .filter(|k| !k.is_empty())
        .map(|k| Arc::new(k.to_string()));
    if api_key.is_some() {
        tracing::info!("API key authentication enabled");
    } else {
        tracing::warn!(
            "API key authentication DISABLED - all endpoints are publicly accessible! \
             Set STACKWRIGHT_API_KEY to enable authentication."
        );
    }

    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/catalog", get(handlers::catalog_handler))
        .route("/templates", get(handlers::templates_handler))
        .route("/editor", get(handlers::editor_handler))
        .route("/editor/nodes", post(handlers::node_changes_handler))
        .route("/editor/edges", post(handlers::edge_changes_handler))
        .route("/editor/connect", post(handlers::connect_handler))
        .route("/editor/technology", post(handlers::add_technology_handler))
        .route("/editor/undo", post(handlers::undo_handler))
        .route("/editor/redo", post(handlers::redo_handler))
        .route("/editor/load", post(handlers::load_stack_handler))
        .route("/editor/template", post(handlers::load_template_handler))
        .route("/editor/new", post(handlers::new_stack_handler))
        .route("/editor/rename", post(handlers::rename_handler))
        .route("/validate", post(handlers::validate_handler))
        .route("/validate/remote", post(handlers::validate_remote_handler))
        .route(
            "/stacks",
            get(handlers::list_stacks_handler).post(handlers::save_stack_handler),
        )
        .route("/stacks/{id}", delete(handlers::delete_stack_handler))
        .route("/stacks/{id}/load", post(handlers::load_saved_stack_handler))
        .route("/github/repos/{user}", get(handlers::github_repos_handler));

    if let Some(key) = api_key {
        router = router.layer(axum_middleware::from_fn_with_state(
            key,
            auth::api_key_auth_middleware,
        ));
    }

    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    router
        .layer(axum::extract::DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server and run until Ctrl+C.
pub async fn run_server(addr: &str, state: AppState) -> Result<(), StackError> {
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| StackError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("Stackwright HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| StackError::IoError(format!("Server error: {}", e)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
