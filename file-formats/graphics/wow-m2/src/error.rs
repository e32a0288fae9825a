use std::io;
use thiserror::Error;

use wow_data::error::WowDataError;

/// Error types for M2 model assembly and output
#[derive(Error, Debug)]
pub enum M2Error {
    /// I/O Error during writing
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error from the byte codec (offset overflow, header size mismatch)
    #[error("Data error: {0}")]
    Data(#[from] WowDataError),

    /// Event identifiers are exactly four ASCII characters
    #[error("Invalid event tag '{0}': expected exactly 4 ASCII characters")]
    InvalidEventTag(String),

    /// Required input is missing or inconsistent
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Reference error: an index points past the collection it refers to
    #[error("Reference error: {0}")]
    ReferenceError(String),

    /// Internal error: something went wrong in the assembler logic
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Result type using M2Error
pub type Result<T> = std::result::Result<T, M2Error>;
