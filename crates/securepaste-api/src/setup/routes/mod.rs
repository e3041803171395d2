//! Route configuration and setup.
//!
//! Upload and paste routes live in `api_routes`; health checks in [health](health).

mod health;

use crate::handlers::{chunked_upload, pastes};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{delete, get, post},
    Router,
};
use securepaste_core::Config;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub async fn setup_routes(
    config: &Config,
    state: Arc<AppState>,
) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    let body_limit = config.server.max_request_body_bytes;

    let app = Router::new()
        .route("/health", get(health::health_check))
        .merge(api_routes())
        // Json's built-in 2 MB cap would otherwise undercut the fragment limit
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/upload/sessions", post(chunked_upload::open_session))
        .route(
            "/api/upload/sessions/{session_id}",
            get(chunked_upload::get_upload_progress).delete(chunked_upload::abort_session),
        )
        .route("/api/upload/fragments", post(chunked_upload::push_fragment))
        .route("/api/upload/commit", post(chunked_upload::commit_upload))
        .route("/api/paste", post(pastes::create_paste))
        .route("/api/pastes", get(pastes::list_pastes))
        .route("/api/paste/{id}", delete(pastes::delete_paste))
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        if config.is_production() {
            return Err(anyhow::anyhow!(
                "CORS configured to allow all origins (*) in production"
            ));
        }
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", o, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}
