//! factdesk - Conversational assistant backend with fact review
//!
//! factdesk fronts a conversation engine and keeps track of the facts the
//! assistant proposes while chatting, so that a person can approve or reject
//! each one later.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        factdesk server                        │
//! │                                                              │
//! │  POST /chatkit ──► ChatEngine ──► ResultDispatcher ──► wire   │
//! │                       │           (stream | doc | value)     │
//! │                       │ propose                              │
//! │                       ▼                                      │
//! │  /facts ─────────► FactStore (in memory, RwLock)             │
//! │                    proposed ──► saved | discarded            │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`api`]: Unified HTTP router, CORS, health probe
//! - [`chat`]: Conversation endpoint, engine seam and result dispatch
//! - [`facts`]: Fact lifecycle store and REST handlers
//! - [`config`]: Configuration management

pub mod api;
pub mod chat;
pub mod config;
pub mod error;
pub mod facts;

pub use config::AppConfig;
pub use error::{Error, Result};
