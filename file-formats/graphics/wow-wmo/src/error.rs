use std::io;
use thiserror::Error;

use crate::chunk_id::ChunkId;

/// Error types for WMO assembly and writing
#[derive(Error, Debug)]
pub enum WmoError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Binary write error: {0}")]
    BinWrite(#[from] binrw::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Chunk {id} payload of {size} bytes does not fit a u32 size field")]
    ChunkTooLarge { id: ChunkId, size: usize },

    #[error("Invalid reference: {field} value {value} exceeds maximum {max}")]
    InvalidReference { field: String, value: u32, max: u32 },
}

impl WmoError {
    /// Build an [`WmoError::InvalidReference`] from any integer-like index
    pub(crate) fn reference(field: impl Into<String>, value: usize, max: usize) -> Self {
        Self::InvalidReference {
            field: field.into(),
            value: u32::try_from(value).unwrap_or(u32::MAX),
            max: u32::try_from(max).unwrap_or(u32::MAX),
        }
    }
}

/// Result type for WMO operations
pub type Result<T> = std::result::Result<T, WmoError>;
