//! eqwow-convert library
//!
//! Command implementations behind the `eqwow-convert` binary: load converted
//! asset descriptions, assign database identifiers and write M2 and WMO files.

pub mod cli;
pub mod commands;
pub mod config;
pub mod utils;
