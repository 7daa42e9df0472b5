//! In-memory fact store
//!
//! Facts live only for the lifetime of the process. All operations go
//! through a single `tokio::sync::RwLock`, so every transition is applied
//! in one critical section and readers never see a half-applied change.

use crate::error::{Error, Result};
use crate::facts::types::*;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Facts in creation order plus an id index into that order
#[derive(Default)]
struct FactTable {
    facts: Vec<Fact>,
    index: HashMap<String, usize>,
}

impl FactTable {
    fn get_mut(&mut self, id: &str) -> Option<&mut Fact> {
        let pos = *self.index.get(id)?;
        self.facts.get_mut(pos)
    }
}

/// Registry of proposed facts and their lifecycle state
pub struct FactStore {
    table: RwLock<FactTable>,
}

impl FactStore {
    /// Create a new empty fact store
    pub fn new() -> Self {
        Self {
            table: RwLock::new(FactTable::default()),
        }
    }

    /// Record a new fact in the `proposed` state
    pub async fn propose(&self, content: impl Into<String>) -> Fact {
        let mut table = self.table.write().await;

        let mut id = new_fact_id();
        while table.index.contains_key(&id) {
            id = new_fact_id();
        }

        let fact = Fact {
            id: id.clone(),
            content: content.into(),
            status: FactStatus::Proposed,
            created_at: chrono::Utc::now().timestamp_millis(),
        };

        let pos = table.facts.len();
        table.index.insert(id, pos);
        table.facts.push(fact.clone());
        fact
    }

    /// Get a fact by ID
    pub async fn get(&self, id: &str) -> Option<Fact> {
        let table = self.table.read().await;
        table.index.get(id).map(|&pos| table.facts[pos].clone())
    }

    /// All saved facts, oldest first
    pub async fn list_saved(&self) -> Vec<Fact> {
        self.table
            .read()
            .await
            .facts
            .iter()
            .filter(|f| f.status == FactStatus::Saved)
            .cloned()
            .collect()
    }

    /// Approve a proposed fact
    ///
    /// Saving an already saved fact returns it unchanged. Saving a discarded
    /// fact fails with [`Error::InvalidTransition`].
    pub async fn mark_saved(&self, id: &str) -> Result<Fact> {
        self.transition(id, FactStatus::Saved).await
    }

    /// Reject a proposed fact
    ///
    /// Discarding an already discarded fact returns it unchanged. Discarding
    /// a saved fact fails with [`Error::InvalidTransition`].
    pub async fn discard(&self, id: &str) -> Result<Fact> {
        self.transition(id, FactStatus::Discarded).await
    }

    async fn transition(&self, id: &str, to: FactStatus) -> Result<Fact> {
        let mut table = self.table.write().await;
        let fact = table
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        if fact.status.is_terminal() && fact.status != to {
            return Err(Error::InvalidTransition {
                id: id.to_string(),
                from: fact.status,
                to,
            });
        }

        fact.status = to;
        Ok(fact.clone())
    }
}

impl Default for FactStore {
    fn default() -> Self {
        Self::new()
    }
}

fn new_fact_id() -> String {
    format!("fact-{}", Uuid::new_v4())
}
