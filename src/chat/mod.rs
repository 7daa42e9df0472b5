//! Chat module — conversation endpoint and engine result dispatch
//!
//! ```text
//! POST /chatkit -> handler.rs -> ChatEngine (engine.rs / upstream.rs)
//!                      └── dispatch.rs: Streaming | Document | Value -> wire
//! ```

pub mod dispatch;
pub mod engine;
pub mod handler;
pub mod upstream;

pub use dispatch::{classify_content_type, ResultDispatcher, ResultKind, X_ACCEL_BUFFERING};
pub use engine::{ChatEngine, ChatResult, EventStream, RequestContext};
pub use handler::{chat_router, ChatState};
pub use upstream::HttpEngine;
