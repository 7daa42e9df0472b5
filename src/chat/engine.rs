//! Conversation engine seam
//!
//! The engine is an external collaborator. It receives the raw request body
//! plus a [`RequestContext`] and answers with one of three result shapes.

use crate::chat::dispatch::ResultKind;
use crate::error::Result;
use crate::facts::FactStore;
use async_trait::async_trait;
use axum::http::HeaderMap;
use bytes::Bytes;
use futures::stream::BoxStream;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Lazily produced protocol events, relayed to the caller chunk by chunk
pub type EventStream = BoxStream<'static, Result<Bytes>>;

/// Output of a conversation engine
pub enum ChatResult {
    /// Incremental event stream (`text/event-stream`)
    Streaming(EventStream),
    /// Complete, already-encoded JSON document, passed through untouched
    Document(Bytes),
    /// Any other value, JSON-encoded once at the boundary
    Value(serde_json::Value),
}

impl ChatResult {
    pub fn kind(&self) -> ResultKind {
        match self {
            Self::Streaming(_) => ResultKind::Streaming,
            Self::Document(_) => ResultKind::Document,
            Self::Value(_) => ResultKind::Value,
        }
    }
}

impl std::fmt::Debug for ChatResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Streaming(_) => f.write_str("Streaming(..)"),
            Self::Document(bytes) => f.debug_tuple("Document").field(bytes).finish(),
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
        }
    }
}

/// Per-request context handed to the engine
#[derive(Clone)]
pub struct RequestContext {
    /// Inbound request headers
    pub headers: HeaderMap,
    /// Cancelled when the caller goes away or the relay ends early
    pub cancel: CancellationToken,
    /// Store the engine proposes facts into
    pub facts: Arc<FactStore>,
}

/// A conversational engine that turns protocol requests into results
#[async_trait]
pub trait ChatEngine: Send + Sync {
    /// Engine name, used in logs
    fn name(&self) -> &str;

    /// Process one opaque protocol request
    async fn process(&self, payload: Bytes, ctx: RequestContext) -> Result<ChatResult>;
}
