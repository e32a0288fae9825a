//! Fixed-size records of the WMO root file

use crate::types::{BoundingBox, Color, Quat, Vec3};
use binrw::BinWrite;
use bitflags::bitflags;

/// Version written to every `MVER` chunk
pub const WMO_VERSION: u32 = 17;

bitflags! {
    /// Root header flags (`MOHD`)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct WmoRootFlags: u16 {
        /// Do not attenuate vertex colors near portals
        const DO_NOT_ATTENUATE_VERTICES = 0x01;
        /// Use the unified render path for all groups
        const USE_UNIFIED_RENDER_PATH = 0x02;
        /// `MOGP` liquid fields hold `LiquidType` database ids
        const USE_LIQUID_TYPE_DBC_ID = 0x04;
        /// Leave vertex color alpha untouched
        const DO_NOT_FIX_VERTEX_COLOR_ALPHA = 0x08;
    }
}

bitflags! {
    /// Material flags (`MOMT`)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
    pub struct WmoMaterialFlags: u32 {
        /// Unlit
        const UNLIT = 0x01;
        /// Unfogged
        const UNFOGGED = 0x02;
        /// Two-sided
        const TWO_SIDED = 0x04;
        /// Exterior light
        const EXTERIOR_LIGHT = 0x08;
        /// Window light
        const WINDOW_LIGHT = 0x10;
        /// Clamp S coordinate
        const CLAMP_S = 0x20;
        /// Clamp T coordinate
        const CLAMP_T = 0x40;
    }
}

/// Material blend mode (`MOMT`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-support", serde(rename_all = "snake_case"))]
pub enum WmoBlendMode {
    #[default]
    Opaque = 0,
    AlphaKey = 1,
    Alpha = 2,
    Add = 3,
}

/// `MOHD` payload
#[derive(Debug, Clone, PartialEq, BinWrite)]
#[bw(little)]
pub struct MohdHeader {
    pub material_count: u32,
    pub group_count: u32,
    pub portal_count: u32,
    pub light_count: u32,
    pub doodad_name_count: u32,
    pub doodad_def_count: u32,
    pub doodad_set_count: u32,
    pub ambient_color: Color,
    pub wmo_id: u32,
    pub bounding_box: BoundingBox,
    #[bw(map = |flags: &WmoRootFlags| flags.bits())]
    pub flags: WmoRootFlags,
    pub lod_count: u16,
}

impl MohdHeader {
    pub const SIZE: usize = 64;
}

/// `MOMT` entry
#[derive(Debug, Clone, PartialEq, Eq, BinWrite)]
#[bw(little)]
pub struct MomtEntry {
    #[bw(map = |flags: &WmoMaterialFlags| flags.bits())]
    pub flags: WmoMaterialFlags,
    pub shader: u32,
    #[bw(map = |mode: &WmoBlendMode| *mode as u32)]
    pub blend_mode: WmoBlendMode,
    pub texture_1: u32,
    pub emissive_color: Color,
    pub frame_emissive_color: u32,
    pub texture_2: u32,
    pub diffuse_color: Color,
    pub ground_type: u32,
    pub texture_3: u32,
    pub color_2: u32,
    pub flags_2: u32,
    pub runtime_data: [u32; 4],
}

impl MomtEntry {
    pub const SIZE: usize = 64;
    pub const DEFAULT_GROUND_TYPE: u32 = 6;
    pub const DEFAULT_EMISSIVE: Color = Color::BLACK;
    pub const DEFAULT_DIFFUSE: Color = Color::rgba(149, 149, 149, 255);

    /// A material with the default colors pointing at one texture name
    pub fn new(flags: WmoMaterialFlags, blend_mode: WmoBlendMode, texture_offset: u32) -> Self {
        Self {
            flags,
            shader: 0,
            blend_mode,
            texture_1: texture_offset,
            emissive_color: Self::DEFAULT_EMISSIVE,
            frame_emissive_color: 0,
            texture_2: 0,
            diffuse_color: Self::DEFAULT_DIFFUSE,
            ground_type: Self::DEFAULT_GROUND_TYPE,
            texture_3: 0,
            color_2: 0,
            flags_2: 0,
            runtime_data: [0; 4],
        }
    }
}

/// `MOGI` entry
#[derive(Debug, Clone, PartialEq, BinWrite)]
#[bw(little)]
pub struct MogiEntry {
    pub flags: u32,
    pub bounding_box: BoundingBox,
    pub name_offset: i32,
}

impl MogiEntry {
    pub const SIZE: usize = 32;
}

/// Light type stored in `MOLT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WmoLightType {
    #[default]
    Omni = 0,
    Spot = 1,
    Directional = 2,
    Ambient = 3,
}

/// `MOLT` entry
#[derive(Debug, Clone, PartialEq, BinWrite)]
#[bw(little)]
pub struct MoltEntry {
    #[bw(map = |kind: &WmoLightType| *kind as u8)]
    pub light_type: WmoLightType,
    pub use_attenuation: u8,
    pub padding: [u8; 2],
    pub color: Color,
    pub position: Vec3,
    pub intensity: f32,
    pub unknown: [f32; 4],
    pub attenuation_start: f32,
    pub attenuation_end: f32,
}

impl MoltEntry {
    pub const SIZE: usize = 48;
    pub const DEFAULT_UNKNOWN: [f32; 4] = [0.0, 0.0, -1.0, -0.5];
}

/// `MODS` entry
#[derive(Debug, Clone, PartialEq, Eq, BinWrite)]
#[bw(little)]
pub struct ModsEntry {
    pub name: [u8; 20],
    pub start_index: u32,
    pub count: u32,
    pub padding: u32,
}

impl ModsEntry {
    pub const SIZE: usize = 32;
    pub const DEFAULT_GLOBAL: &'static str = "Set_$DefaultGlobal";

    /// Create a set, truncating the name to 19 bytes so it stays NUL-terminated
    pub fn new(name: &str, start_index: u32, count: u32) -> Self {
        let mut padded = [0u8; 20];
        let len = name.len().min(19);
        padded[..len].copy_from_slice(&name.as_bytes()[..len]);
        Self {
            name: padded,
            start_index,
            count,
            padding: 0,
        }
    }
}

/// `MODD` entry
#[derive(Debug, Clone, PartialEq, BinWrite)]
#[bw(little)]
pub struct ModdEntry {
    /// Name offset in the low 24 bits, flags in the high byte
    pub name_offset_and_flags: u32,
    pub position: Vec3,
    pub orientation: Quat,
    pub scale: f32,
    pub color: Color,
}

impl ModdEntry {
    pub const SIZE: usize = 40;
    pub const MAX_NAME_OFFSET: u32 = 0x00FF_FFFF;

    pub fn pack_name(name_offset: u32, flags: u8) -> u32 {
        (name_offset & Self::MAX_NAME_OFFSET) | (u32::from(flags) << 24)
    }
}

/// `MFOG` entry
#[derive(Debug, Clone, PartialEq, BinWrite)]
#[bw(little)]
pub struct MfogEntry {
    pub flags: u32,
    pub position: Vec3,
    pub small_radius: f32,
    pub large_radius: f32,
    pub fog_end: f32,
    pub fog_start_scalar: f32,
    pub fog_color: Color,
    pub underwater_fog_end: f32,
    pub underwater_fog_start_scalar: f32,
    pub underwater_fog_color: Color,
}

impl MfogEntry {
    pub const SIZE: usize = 48;
}

/// `MCVP` plane
#[derive(Debug, Clone, Copy, PartialEq, Default, BinWrite)]
#[bw(little)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct ConvexVolumePlane {
    pub normal: Vec3,
    pub distance: f32,
}

impl ConvexVolumePlane {
    pub const SIZE: usize = 16;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use test_case::test_case;

    fn size_of<T: for<'a> BinWrite<Args<'a> = ()>>(record: &T) -> usize {
        let mut cursor = Cursor::new(Vec::new());
        record.write_le(&mut cursor).unwrap();
        cursor.into_inner().len()
    }

    #[test]
    fn test_record_sizes() {
        let header = MohdHeader {
            material_count: 0,
            group_count: 0,
            portal_count: 0,
            light_count: 0,
            doodad_name_count: 0,
            doodad_def_count: 0,
            doodad_set_count: 1,
            ambient_color: Color::default(),
            wmo_id: 0,
            bounding_box: BoundingBox::default(),
            flags: WmoRootFlags::empty(),
            lod_count: 0,
        };
        assert_eq!(size_of(&header), MohdHeader::SIZE);
        assert_eq!(
            size_of(&MomtEntry::new(WmoMaterialFlags::empty(), WmoBlendMode::Opaque, 0)),
            MomtEntry::SIZE
        );
        assert_eq!(
            size_of(&MogiEntry {
                flags: 0,
                bounding_box: BoundingBox::default(),
                name_offset: 0,
            }),
            MogiEntry::SIZE
        );
        assert_eq!(size_of(&ModsEntry::new("x", 0, 0)), ModsEntry::SIZE);
        assert_eq!(size_of(&ConvexVolumePlane::default()), ConvexVolumePlane::SIZE);
    }

    #[test]
    fn test_mods_name_is_nul_padded() {
        let set = ModsEntry::new(ModsEntry::DEFAULT_GLOBAL, 0, 3);
        assert_eq!(&set.name, b"Set_$DefaultGlobal\0\0");
    }

    #[test_case(0x12, 0 => 0x0000_0012; "offset only")]
    #[test_case(0x12, 0x80 => 0x8000_0012; "flags in high byte")]
    #[test_case(0x0123_4567, 0 => 0x0023_4567; "offset masked to 24 bits")]
    fn test_pack_doodad_name(offset: u32, flags: u8) -> u32 {
        ModdEntry::pack_name(offset, flags)
    }
}
