//! HTTP handlers for the Facts API
//!
//! - GET    /facts               — list saved facts
//! - POST   /facts/:id/save      — approve a proposed fact
//! - POST   /facts/:id/discard   — reject a proposed fact

use crate::error::Error;
use crate::facts::store::FactStore;
use crate::facts::types::*;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

/// Shared state for fact handlers
#[derive(Clone)]
pub struct FactsState {
    pub store: Arc<FactStore>,
}

/// Create the facts router
pub fn facts_router(state: FactsState) -> Router {
    Router::new()
        .route("/facts", get(list_facts))
        .route("/facts/:id/save", post(save_fact))
        .route("/facts/:id/discard", post(discard_fact))
        .with_state(state)
}

/// GET /facts
async fn list_facts(State(state): State<FactsState>) -> impl IntoResponse {
    let facts = state.store.list_saved().await;
    Json(FactListResponse { facts })
}

/// POST /facts/:id/save
async fn save_fact(
    State(state): State<FactsState>,
    Path(id): Path<String>,
) -> Result<Json<FactResponse>, Error> {
    let fact = state.store.mark_saved(&id).await.map_err(log_rejection)?;
    tracing::info!(fact_id = %fact.id, "Fact saved");
    Ok(Json(FactResponse { fact }))
}

/// POST /facts/:id/discard
async fn discard_fact(
    State(state): State<FactsState>,
    Path(id): Path<String>,
) -> Result<Json<FactResponse>, Error> {
    let fact = state.store.discard(&id).await.map_err(log_rejection)?;
    tracing::info!(fact_id = %fact.id, "Fact discarded");
    Ok(Json(FactResponse { fact }))
}

fn log_rejection(err: Error) -> Error {
    match &err {
        Error::NotFound(id) => tracing::debug!(fact_id = %id, "Fact not found"),
        other => tracing::warn!("Fact transition rejected: {}", other),
    }
    err
}
