use thiserror::Error;

use crate::types::{PathString, SourceId};

/// Error type for field-spec configuration and per-entity merge failures.
///
/// Absent paths and empty values are not errors: they simply contribute nothing.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("source '{source_id}' path '{path}' expected {expected}, found {found}")]
    MalformedNode {
        source_id: SourceId,
        path: PathString,
        expected: &'static str,
        found: &'static str,
    },
    #[error("raw record is not mergeable: {0}")]
    InvalidRecord(String),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl MergeError {
    /// True when the error comes from a strategy/shape mismatch inside one entity.
    pub fn is_malformed_node(&self) -> bool {
        matches!(self, Self::MalformedNode { .. })
    }
}
