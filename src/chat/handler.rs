//! HTTP handler for the conversation endpoint
//!
//! `POST /chatkit` hands the raw request body to the configured engine and
//! dispatches whatever it returns.

use crate::chat::dispatch::ResultDispatcher;
use crate::chat::engine::{ChatEngine, RequestContext};
use crate::error::Error;
use crate::facts::FactStore;
use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use bytes::Bytes;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Shared state for the conversation endpoint
#[derive(Clone)]
pub struct ChatState {
    /// `None` when no engine is configured; requests then get 503
    pub engine: Option<Arc<dyn ChatEngine>>,
    pub facts: Arc<FactStore>,
}

/// Create the conversation router
pub fn chat_router(state: ChatState) -> Router {
    Router::new()
        .route("/chatkit", post(chat_endpoint))
        .with_state(state)
}

/// POST /chatkit
async fn chat_endpoint(
    State(state): State<ChatState>,
    headers: HeaderMap,
    payload: Bytes,
) -> Response {
    let Some(engine) = state.engine else {
        return Error::UpstreamUnavailable(
            "No conversation engine is configured. Set engine.upstream_url to enable the \
             conversational endpoint."
                .to_string(),
        )
        .into_response();
    };

    let cancel = CancellationToken::new();
    // Caller hanging up while the engine is still working cancels it too
    let guard = cancel.clone().drop_guard();

    let ctx = RequestContext {
        headers,
        cancel: cancel.clone(),
        facts: state.facts,
    };

    let result = engine.process(payload, ctx).await;
    guard.disarm();

    match result {
        Ok(result) => {
            tracing::debug!(engine = engine.name(), kind = ?result.kind(), "Dispatching chat result");
            ResultDispatcher::new(cancel).dispatch(result)
        }
        Err(e) => {
            tracing::warn!(engine = engine.name(), "Chat request failed: {}", e);
            e.into_response()
        }
    }
}
