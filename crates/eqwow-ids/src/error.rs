//! Error types for identifier allocation

use thiserror::Error;

use crate::IdKind;

/// Errors that can occur while allocating identifiers
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The counter for a kind reached `u32::MAX`
    #[error("identifier space exhausted for {kind} (last value {last})")]
    Exhausted { kind: IdKind, last: u32 },
}

/// Result type for identifier operations
pub type Result<T> = std::result::Result<T, IdError>;
