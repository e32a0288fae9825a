//! Liquid surfaces (`MLIQ`)
//!
//! A liquid plane is described by its XY footprint, a high and a low surface
//! height and a slant. The footprint is tiled into a regular grid of
//! [`LIQUID_TILE_SIZE`] cells and every grid vertex gets a height, either the
//! constant high height or a linear blend between high and low along the
//! slant axis.
//!
//! Grid vertices run row-major with X fastest, starting at the min-X/min-Y
//! corner. "North" is +X and "west" is +Y.

use crate::chunk::{Chunk, ChunkWriter};
use crate::chunk_id::ChunkId;
use crate::error::{Result, WmoError};
use crate::types::Vec3;
use crate::wmo_group_types::{MagmaVertex, MliqHeader, WaterVertex};

/// Edge length of one liquid tile in world units
pub const LIQUID_TILE_SIZE: f32 = 4.166_662_5;

/// Tile flag value for a tile without liquid
pub const NO_LIQUID_TILE: u8 = 0x0F;

/// Kind of liquid, which also selects the vertex format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-support", serde(rename_all = "snake_case"))]
pub enum LiquidKind {
    #[default]
    Water,
    Ocean,
    Magma,
    Slime,
}

impl LiquidKind {
    /// Low nibble written to every tile flag byte
    pub fn tile_type(self) -> u8 {
        match self {
            Self::Water => 0,
            Self::Ocean => 1,
            Self::Magma => 2,
            Self::Slime => 3,
        }
    }

    /// Whether this liquid is written with [`MagmaVertex`] instead of [`WaterVertex`]
    pub fn uses_magma_vertices(self) -> bool {
        matches!(self, Self::Magma | Self::Slime)
    }
}

/// Direction in which a liquid surface slopes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-support", serde(from = "u8", into = "u8"))]
pub enum LiquidSlant {
    #[default]
    None,
    SouthHighNorthLow,
    NorthHighSouthLow,
    WestHighEastLow,
    EastHighWestLow,
}

impl LiquidSlant {
    /// Decode a raw slant value, falling back to flat for unknown values
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::None,
            1 => Self::SouthHighNorthLow,
            2 => Self::NorthHighSouthLow,
            3 => Self::WestHighEastLow,
            4 => Self::EastHighWestLow,
            other => {
                tracing::error!("Unrecognised liquid slant {other}, treating the surface as flat");
                Self::None
            }
        }
    }

    pub fn raw(self) -> u8 {
        match self {
            Self::None => 0,
            Self::SouthHighNorthLow => 1,
            Self::NorthHighSouthLow => 2,
            Self::WestHighEastLow => 3,
            Self::EastHighWestLow => 4,
        }
    }
}

impl From<u8> for LiquidSlant {
    fn from(raw: u8) -> Self {
        Self::from_raw(raw)
    }
}

impl From<LiquidSlant> for u8 {
    fn from(slant: LiquidSlant) -> Self {
        slant.raw()
    }
}

/// A rectangular liquid surface
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-support", serde(default))]
pub struct LiquidPlane {
    pub kind: LiquidKind,
    pub material_id: u16,
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
    pub high_z: f32,
    pub low_z: f32,
    pub slant: LiquidSlant,
}

impl LiquidPlane {
    /// A flat surface at `height` over the given footprint
    pub fn flat(kind: LiquidKind, min: [f32; 2], max: [f32; 2], height: f32) -> Self {
        Self {
            kind,
            material_id: 0,
            min_x: min[0],
            min_y: min[1],
            max_x: max[0],
            max_y: max[1],
            high_z: height,
            low_z: height,
            slant: LiquidSlant::None,
        }
    }

    pub fn x_extent(&self) -> f32 {
        (self.max_x - self.min_x).abs()
    }

    pub fn y_extent(&self) -> f32 {
        (self.max_y - self.min_y).abs()
    }

    /// Surface height at a point, clamped to the footprint
    pub fn height_at(&self, x: f32, y: f32) -> f32 {
        let along = |value: f32, min: f32, max: f32| {
            if max > min {
                (value.clamp(min, max) - min) / (max - min)
            } else {
                0.0
            }
        };
        let tx = along(x, self.min_x, self.max_x);
        let ty = along(y, self.min_y, self.max_y);

        match self.slant {
            LiquidSlant::None => self.high_z,
            LiquidSlant::SouthHighNorthLow => self.high_z + (self.low_z - self.high_z) * tx,
            LiquidSlant::NorthHighSouthLow => self.low_z + (self.high_z - self.low_z) * tx,
            LiquidSlant::WestHighEastLow => self.low_z + (self.high_z - self.low_z) * ty,
            LiquidSlant::EastHighWestLow => self.high_z + (self.low_z - self.high_z) * ty,
        }
    }

    /// Split the plane in halves along its longer axis until no side reaches `max_extent`
    pub fn split(&self, max_extent: f32) -> Vec<Self> {
        if max_extent <= 0.0 {
            tracing::error!("Liquid split size {max_extent} is not positive, keeping the plane whole");
            return vec![self.clone()];
        }
        if self.slant != LiquidSlant::None {
            tracing::warn!("Splitting a slanted liquid plane, each piece keeps the full slope");
        }

        let mut done = Vec::new();
        let mut pending = vec![self.clone()];
        while let Some(mut plane) = pending.pop() {
            if plane.x_extent() < max_extent && plane.y_extent() < max_extent {
                done.push(plane);
                continue;
            }
            let mut other = plane.clone();
            if plane.x_extent() > plane.y_extent() {
                let mid = (plane.min_x + plane.max_x) * 0.5;
                plane.max_x = mid;
                other.min_x = mid;
            } else {
                let mid = (plane.min_y + plane.max_y) * 0.5;
                plane.max_y = mid;
                other.min_y = mid;
            }
            pending.push(other);
            pending.push(plane);
        }
        done
    }
}

/// Vertex payload of a liquid grid
#[derive(Debug, Clone, PartialEq)]
pub enum LiquidVertices {
    Water(Vec<WaterVertex>),
    Magma(Vec<MagmaVertex>),
}

impl LiquidVertices {
    pub fn len(&self) -> usize {
        match self {
            Self::Water(v) => v.len(),
            Self::Magma(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Height of every vertex in grid order
    pub fn heights(&self) -> Vec<f32> {
        match self {
            Self::Water(v) => v.iter().map(|v| v.height).collect(),
            Self::Magma(v) => v.iter().map(|v| v.height).collect(),
        }
    }
}

/// A generated liquid grid, ready to be written as `MLIQ`
#[derive(Debug, Clone, PartialEq)]
pub struct LiquidGrid {
    pub x_vertex_count: u32,
    pub y_vertex_count: u32,
    pub corner: Vec3,
    pub material_id: u16,
    pub vertices: LiquidVertices,
    pub tile_flags: Vec<u8>,
}

fn vertex_count(extent: f32) -> Result<u32> {
    let tiles = (extent / LIQUID_TILE_SIZE).ceil().max(1.0);
    if !tiles.is_finite() || tiles >= f32::from(u16::MAX) {
        return Err(WmoError::InvalidFormat(format!(
            "liquid extent {extent} is too large to tile"
        )));
    }
    Ok(tiles as u32 + 1)
}

impl LiquidGrid {
    /// Tile a liquid plane into a height grid
    pub fn generate(plane: &LiquidPlane) -> Result<Self> {
        let x_vertex_count = vertex_count(plane.x_extent())?;
        let y_vertex_count = vertex_count(plane.y_extent())?;
        let min_x = plane.min_x.min(plane.max_x);
        let min_y = plane.min_y.min(plane.max_y);

        let positions = (0..y_vertex_count).flat_map(|y| {
            (0..x_vertex_count).map(move |x| {
                let px = min_x + x as f32 * LIQUID_TILE_SIZE;
                let py = min_y + y as f32 * LIQUID_TILE_SIZE;
                (x, y, plane.height_at(px, py))
            })
        });

        let vertices = if plane.kind.uses_magma_vertices() {
            LiquidVertices::Magma(
                positions
                    .map(|(x, y, height)| MagmaVertex {
                        s: x as u16,
                        t: y as u16,
                        height,
                    })
                    .collect(),
            )
        } else {
            LiquidVertices::Water(
                positions
                    .map(|(_, _, height)| WaterVertex::still(height))
                    .collect(),
            )
        };

        let tile_count = (x_vertex_count - 1) as usize * (y_vertex_count - 1) as usize;
        tracing::debug!(
            "Liquid grid {x_vertex_count}x{y_vertex_count} vertices, {tile_count} tiles of {:?}",
            plane.kind
        );

        Ok(Self {
            x_vertex_count,
            y_vertex_count,
            corner: Vec3::new(min_x, min_y, plane.high_z),
            material_id: plane.material_id,
            vertices,
            tile_flags: vec![plane.kind.tile_type(); tile_count],
        })
    }

    pub fn x_tile_count(&self) -> u32 {
        self.x_vertex_count - 1
    }

    pub fn y_tile_count(&self) -> u32 {
        self.y_vertex_count - 1
    }

    pub fn header(&self) -> MliqHeader {
        MliqHeader {
            x_vertex_count: self.x_vertex_count as i32,
            y_vertex_count: self.y_vertex_count as i32,
            x_tile_count: self.x_tile_count() as i32,
            y_tile_count: self.y_tile_count() as i32,
            corner: self.corner,
            material_id: self.material_id,
        }
    }

    pub fn to_chunk(&self) -> Result<Chunk> {
        let mut writer = ChunkWriter::new(ChunkId::MLIQ);
        writer.record(&self.header())?;
        match &self.vertices {
            LiquidVertices::Water(vertices) => {
                for vertex in vertices {
                    writer.record(vertex)?;
                }
            }
            LiquidVertices::Magma(vertices) => {
                for vertex in vertices {
                    writer.record(vertex)?;
                }
            }
        }
        writer.bytes(&self.tile_flags)?;
        Ok(writer.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    const EPSILON: f32 = 1e-4;

    fn ten_by_ten(slant: LiquidSlant, high_z: f32, low_z: f32) -> LiquidPlane {
        LiquidPlane {
            high_z,
            low_z,
            slant,
            ..LiquidPlane::flat(LiquidKind::Water, [0.0, 0.0], [10.0, 10.0], high_z)
        }
    }

    #[test]
    fn test_flat_plane() {
        let grid = LiquidGrid::generate(&ten_by_ten(LiquidSlant::None, 5.0, 5.0)).unwrap();
        let expected = (10.0f32 / LIQUID_TILE_SIZE).ceil() as u32 + 1;

        assert_eq!(grid.x_vertex_count, expected);
        assert_eq!(grid.y_vertex_count, expected);
        assert_eq!(grid.x_vertex_count, 4);
        assert_eq!(grid.vertices.len(), 16);
        assert!(grid.vertices.heights().iter().all(|&h| h == 5.0));
        assert_eq!(grid.tile_flags, vec![0; 9]);
        assert_eq!(grid.corner, Vec3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn test_north_high_south_low() {
        let grid =
            LiquidGrid::generate(&ten_by_ten(LiquidSlant::NorthHighSouthLow, 10.0, 0.0)).unwrap();
        let heights = grid.vertices.heights();
        let width = grid.x_vertex_count as usize;

        for row in heights.chunks(width) {
            assert!(row[0].abs() < EPSILON, "south edge {}", row[0]);
            assert!((row[width - 1] - 10.0).abs() < EPSILON, "north edge {}", row[width - 1]);
            assert!((row[1] - LIQUID_TILE_SIZE).abs() < EPSILON);
            assert!(row.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test_case(LiquidSlant::SouthHighNorthLow, [10.0, 0.0, 10.0, 0.0]; "south high")]
    #[test_case(LiquidSlant::NorthHighSouthLow, [0.0, 10.0, 0.0, 10.0]; "north high")]
    #[test_case(LiquidSlant::WestHighEastLow, [0.0, 0.0, 10.0, 10.0]; "west high")]
    #[test_case(LiquidSlant::EastHighWestLow, [10.0, 10.0, 0.0, 0.0]; "east high")]
    fn test_corner_heights(slant: LiquidSlant, corners: [f32; 4]) {
        let grid = LiquidGrid::generate(&ten_by_ten(slant, 10.0, 0.0)).unwrap();
        let heights = grid.vertices.heights();
        let width = grid.x_vertex_count as usize;
        let last = heights.len() - 1;

        // min-x/min-y, max-x/min-y, min-x/max-y, max-x/max-y
        let actual = [heights[0], heights[width - 1], heights[last + 1 - width], heights[last]];
        for (a, e) in actual.iter().zip(corners) {
            assert!((a - e).abs() < EPSILON, "{actual:?} vs {corners:?}");
        }
    }

    #[test]
    fn test_zero_extent_has_one_tile() {
        let plane = LiquidPlane::flat(LiquidKind::Water, [3.0, 3.0], [3.0, 3.0], 1.0);
        let grid = LiquidGrid::generate(&plane).unwrap();
        assert_eq!(grid.x_tile_count(), 1);
        assert_eq!(grid.y_tile_count(), 1);
        assert_eq!(grid.tile_flags.len(), 1);
    }

    #[test]
    fn test_unknown_slant_is_flat() {
        assert_eq!(LiquidSlant::from_raw(9), LiquidSlant::None);
        assert_eq!(LiquidSlant::from(2), LiquidSlant::NorthHighSouthLow);
    }

    #[test]
    fn test_magma_uses_magma_vertices() {
        let plane = LiquidPlane::flat(LiquidKind::Magma, [0.0, 0.0], [5.0, 1.0], 2.0);
        let grid = LiquidGrid::generate(&plane).unwrap();
        let LiquidVertices::Magma(vertices) = &grid.vertices else {
            panic!("expected magma vertices");
        };
        assert_eq!(vertices[1].s, 1);
        assert_eq!(vertices[grid.x_vertex_count as usize].t, 1);
        assert_eq!(grid.tile_flags, vec![2; 2]);
    }

    #[test]
    fn test_chunk_layout() {
        let plane = LiquidPlane::flat(LiquidKind::Water, [0.0, 0.0], [4.0, 4.0], 1.0);
        let grid = LiquidGrid::generate(&plane).unwrap();
        let chunk = grid.to_chunk().unwrap();

        // header, 2x2 vertices, one tile flag
        assert_eq!(chunk.payload.len(), MliqHeader::SIZE + 4 * 8 + 1);
        assert_eq!(&chunk.payload[..4], &2i32.to_le_bytes());
        assert_eq!(&chunk.payload[8..12], &1i32.to_le_bytes());
    }

    #[test]
    fn test_split_keeps_footprint() {
        let plane = LiquidPlane::flat(LiquidKind::Water, [0.0, 0.0], [100.0, 30.0], 0.0);
        let pieces = plane.split(40.0);

        assert!(pieces.iter().all(|p| p.x_extent() < 40.0 && p.y_extent() < 40.0));
        let area: f32 = pieces.iter().map(|p| p.x_extent() * p.y_extent()).sum();
        assert!((area - 3000.0).abs() < 1e-2);
    }
}
