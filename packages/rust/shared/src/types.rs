//! Core domain types for LexHarvest.

use serde::{Deserialize, Serialize};

/// Length of a CELEX identifier as emitted by the bulk query endpoint.
pub const CELEX_ID_LEN: usize = 10;

// ---------------------------------------------------------------------------
// CelexId
// ---------------------------------------------------------------------------

/// A CELEX identifier — the canonical key for an EU legal act
/// (e.g. `32023R0001`). Opaque to LexHarvest: it is extracted from the
/// bulk query result, interpolated into document URLs, and used as the
/// artifact filename stem. Never mutated after discovery.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CelexId(String);

impl CelexId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CelexId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CelexId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
