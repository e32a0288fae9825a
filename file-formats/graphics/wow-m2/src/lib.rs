// Re-export main components
pub mod chunks;
pub mod common;
pub mod domain;
pub mod error;
pub mod header;
pub mod model;
pub mod skin;

// Re-export common types
pub use domain::{ModelType, ObjectModel};
pub use error::{M2Error, Result};
pub use header::{M2Header, M2ModelFlags};
pub use model::{M2Model, M2WriteOptions};
pub use skin::Skin;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
