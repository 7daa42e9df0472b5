//! Unified API router for factdesk
//!
//! Merges the module routers into a single axum `Router` with CORS and
//! request tracing.
//!
//! ## Endpoint Map
//!
//! | Method | Path                   | Module | Description                 |
//! |--------|------------------------|--------|-----------------------------|
//! | GET    | `/health`              | api    | Health probe                |
//! | POST   | `/chatkit`             | chat   | Conversation endpoint       |
//! | GET    | `/facts`               | facts  | Saved facts                 |
//! | POST   | `/facts/:id/save`      | facts  | Approve a proposed fact     |
//! | POST   | `/facts/:id/discard`   | facts  | Reject a proposed fact      |

use crate::chat::{chat_router, ChatState, X_ACCEL_BUFFERING};
use crate::facts::{facts_router, FactsState};
use axum::{
    http::{header, HeaderName, HeaderValue},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{AllowHeaders, AllowMethods, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the complete factdesk HTTP application
pub fn build_app(chat_state: ChatState, facts_state: FactsState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(chat_router(chat_state))
        .merge(facts_router(facts_state))
        .layer(build_cors(cors_origins))
        .layer(TraceLayer::new_for_http())
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// CORS
// =============================================================================

/// Any origin without credentials when `origins` is empty; otherwise only the
/// listed origins, with credentials allowed.
fn build_cors(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
            .expose_headers(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(origin) => Some(origin),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    // Wildcards are not allowed together with credentials, so the response
    // headers this server sets are listed explicitly
    CorsLayer::new()
        .allow_origin(parsed)
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .expose_headers([
            header::CONTENT_TYPE,
            header::CONTENT_LENGTH,
            header::CACHE_CONTROL,
            HeaderName::from_static(X_ACCEL_BUFFERING),
        ])
}
