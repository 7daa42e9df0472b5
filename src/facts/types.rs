//! Fact types
//!
//! Wire types use camelCase JSON serialization, matching the rest of the API.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a fact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactStatus {
    Proposed,
    Saved,
    Discarded,
}

impl FactStatus {
    /// Whether no further transitions are allowed out of this state
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Proposed)
    }
}

impl std::fmt::Display for FactStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Proposed => write!(f, "proposed"),
            Self::Saved => write!(f, "saved"),
            Self::Discarded => write!(f, "discarded"),
        }
    }
}

/// A fact proposed by the assistant during conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fact {
    pub id: String,
    pub content: String,
    pub status: FactStatus,
    /// Unix milliseconds
    pub created_at: i64,
}

/// `GET /facts` response body
#[derive(Debug, Serialize)]
pub struct FactListResponse {
    pub facts: Vec<Fact>,
}

/// Response body for a single mutated fact
#[derive(Debug, Serialize)]
pub struct FactResponse {
    pub fact: Fact,
}
