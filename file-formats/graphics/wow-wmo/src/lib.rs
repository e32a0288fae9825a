//! # World of Warcraft WMO (World Map Object) Writer
//!
//! This library renders a zone description into WMO version 17 files: one
//! root file plus one group file per mesh partition.
//!
//! ## Features
//!
//! - **Chunks**: Tagged, length-prefixed chunks rendered from `binrw` records
//! - **Root**: Materials, texture and name tables, lights, doodads and fog
//! - **Groups**: Geometry, render batches, BSP collision and vertex colors
//! - **Liquid**: Tiled liquid surfaces with flat or slanted heights
//!
//! ## Quick Start
//!
//! ```no_run
//! use wow_wmo::{WmoWriteOptions, WmoWriter, Zone};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let zone = Zone {
//!     name: "qeynos".into(),
//!     descriptive_name: "South Qeynos".into(),
//!     ..Default::default()
//! };
//!
//! let writer = WmoWriter::new(WmoWriteOptions::default());
//! let written = writer.write_to_dir(&zone, "out")?;
//! println!("Root: {}", written.root.display());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`chunk`]: Chunk headers and payload writer
//! - [`root`]: WMO root file assembly
//! - [`group`]: WMO group file assembly
//! - [`liquid`]: Liquid grid generation
//! - [`types`]: Common data types (Vec3, Color, BoundingBox, etc.)
//! - [`wmo_types`]: WMO root file records
//! - [`wmo_group_types`]: WMO group file records
//! - [`zone`]: Zone description consumed by the assemblers
//! - [`writer`]: On-disk output

pub mod chunk;
pub mod chunk_id;
pub mod error;
pub mod group;
pub mod liquid;
pub mod root;
pub mod types;
pub mod wmo_group_types;
pub mod wmo_types;
pub mod writer;
pub mod zone;

#[cfg(test)]
mod test_support;

pub use chunk::{Chunk, ChunkHeader, ChunkWriter};
pub use chunk_id::ChunkId;
pub use error::{Result, WmoError};
pub use group::{GroupNameOffsets, WmoGroupFile};
pub use liquid::{LIQUID_TILE_SIZE, LiquidGrid, LiquidKind, LiquidPlane, LiquidSlant};
pub use root::WmoRootFile;
pub use types::{BoundingBox, Color, Quat, TexCoord, Vec3};
pub use writer::{AssembledWmo, MAX_GROUP_FILES, WmoWriteOptions, WmoWriter, WrittenWmo};
pub use zone::{
    BspTree, GroupPlacement, Zone, ZoneDoodad, ZoneFog, ZoneGroup, ZoneLight, ZoneMaterial,
    ZoneTriangle,
};
