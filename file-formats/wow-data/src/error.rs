use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WowDataError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Offset overflow: position {0} does not fit in a 32-bit offset")]
    OffsetOverflow(usize),

    #[error("Count overflow: {0} elements do not fit in a 32-bit count")]
    CountOverflow(usize),

    #[error("Key count mismatch: {timestamps} timestamps but {values} values")]
    KeyCountMismatch { timestamps: usize, values: usize },

    #[error("Header size mismatch for {record}: expected {expected} bytes, produced {actual}")]
    HeaderSizeMismatch {
        record: &'static str,
        expected: usize,
        actual: usize,
    },
}

pub type Result<T> = std::result::Result<T, WowDataError>;
