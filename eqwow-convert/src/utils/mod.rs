//! Shared utilities for the eqwow-convert CLI

pub mod progress;

pub use progress::*;
