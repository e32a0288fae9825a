//! Fixed-size records of WMO group files

use crate::types::{BoundingBox, Vec3};
use binrw::BinWrite;
use bitflags::bitflags;

bitflags! {
    /// WMO group flags (`MOGP` and `MOGI`)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct WmoGroupFlags: u32 {
        /// Has `MOBN`/`MOBR`
        const HAS_BSP_TREE = 0x01;
        /// Has light map
        const HAS_LIGHT_MAP = 0x02;
        /// Has `MOCV`
        const HAS_VERTEX_COLORS = 0x04;
        /// Outdoor group
        const IS_OUTDOORS = 0x08;
        /// Lit by exterior lighting
        const USE_EXTERIOR_LIGHTING = 0x40;
        /// Unreachable
        const IS_UNREACHABLE = 0x80;
        /// Has `MOLR`
        const HAS_LIGHTS = 0x200;
        /// Has `MODR`
        const HAS_DOODADS = 0x800;
        /// Has `MLIQ`
        const HAS_WATER = 0x1000;
        /// Indoor group
        const IS_INDOORS = 0x2000;
        /// Always draw
        const ALWAYS_DRAW = 0x10000;
        /// Show skybox
        const SHOW_SKYBOX = 0x40000;
        /// Liquid is ocean
        const WATER_IS_OCEAN = 0x80000;
        /// Mount allowed
        const MOUNT_ALLOWED = 0x200000;
    }
}

bitflags! {
    /// Per-triangle material flags (`MOPY`)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct WmoPolyFlags: u8 {
        const UNUSED_1 = 0x01;
        const NO_CAM_COLLIDE = 0x02;
        const DETAIL = 0x04;
        const COLLISION = 0x08;
        const HINT = 0x10;
        const RENDER = 0x20;
        const CULL_OBJECTS = 0x40;
        const COLLIDE_HIT = 0x80;
    }
}

bitflags! {
    /// BSP node flags (`MOBN`)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
    pub struct BspNodeFlags: u16 {
        const Y_AXIS = 0x1;
        const Z_AXIS = 0x2;
        const AXIS_MASK = 0x3;
        const LEAF = 0x4;
    }
}

/// Material index marking a triangle as collision-only
pub const NON_RENDERABLE_MATERIAL: u8 = 0xFF;

/// `MOGP` header, followed in the chunk by the group sub-chunks
#[derive(Debug, Clone, PartialEq, BinWrite)]
#[bw(little)]
pub struct MogpHeader {
    pub group_name_offset: u32,
    pub descriptive_name_offset: u32,
    #[bw(map = |flags: &WmoGroupFlags| flags.bits())]
    pub flags: WmoGroupFlags,
    pub bounding_box: BoundingBox,
    pub portal_start: u16,
    pub portal_count: u16,
    pub trans_batch_count: u16,
    pub interior_batch_count: u16,
    pub exterior_batch_count: u16,
    pub padding: u16,
    pub fog_ids: [u8; 4],
    pub liquid_type: u32,
    pub group_id: u32,
    pub unknown: [u32; 2],
}

impl MogpHeader {
    pub const SIZE: usize = 68;
    /// Liquid field value for groups that are not liquid volumes
    pub const DEFAULT_LIQUID_TYPE: u32 = 15;
}

/// `MOPY` entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinWrite)]
#[bw(little)]
pub struct MopyEntry {
    #[bw(map = |flags: &WmoPolyFlags| flags.bits())]
    pub flags: WmoPolyFlags,
    pub material_id: u8,
}

/// `MOBA` render batch
#[derive(Debug, Clone, PartialEq, Eq, BinWrite)]
#[bw(little)]
pub struct MobaEntry {
    pub bounding_box: [i16; 6],
    pub start_index: u32,
    pub index_count: u16,
    pub min_vertex: u16,
    pub max_vertex: u16,
    pub flags: u8,
    pub material_id: u8,
}

impl MobaEntry {
    pub const SIZE: usize = 24;
}

/// `MOBN` node
#[derive(Debug, Clone, Copy, PartialEq, BinWrite)]
#[bw(little)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct WmoBspNode {
    #[bw(map = |flags: &BspNodeFlags| flags.bits())]
    pub flags: BspNodeFlags,
    pub negative_child: i16,
    pub positive_child: i16,
    pub face_count: u16,
    pub first_face: u32,
    pub plane_distance: f32,
}

impl WmoBspNode {
    pub const SIZE: usize = 16;

    /// A leaf holding `face_count` entries of the face list from `first_face`
    pub fn leaf(first_face: u32, face_count: u16) -> Self {
        Self {
            flags: BspNodeFlags::LEAF,
            negative_child: -1,
            positive_child: -1,
            face_count,
            first_face,
            plane_distance: 0.0,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.flags.contains(BspNodeFlags::LEAF)
    }
}

/// `MLIQ` header
#[derive(Debug, Clone, PartialEq, BinWrite)]
#[bw(little)]
pub struct MliqHeader {
    pub x_vertex_count: i32,
    pub y_vertex_count: i32,
    pub x_tile_count: i32,
    pub y_tile_count: i32,
    pub corner: Vec3,
    pub material_id: u16,
}

impl MliqHeader {
    pub const SIZE: usize = 30;
}

/// Liquid vertex used by water and ocean
#[derive(Debug, Clone, Copy, PartialEq, Default, BinWrite)]
#[bw(little)]
pub struct WaterVertex {
    pub flow_1: u8,
    pub flow_2: u8,
    pub flow_1_percent: u8,
    pub filler: u8,
    pub height: f32,
}

impl WaterVertex {
    pub fn still(height: f32) -> Self {
        Self {
            height,
            ..Self::default()
        }
    }
}

/// Liquid vertex used by magma and slime
#[derive(Debug, Clone, Copy, PartialEq, Default, BinWrite)]
#[bw(little)]
pub struct MagmaVertex {
    pub s: u16,
    pub t: u16,
    pub height: f32,
}
