use wow_data::prelude::*;

bitflags::bitflags! {
    /// Render flags as defined in the M2 format
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    #[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
    pub struct M2RenderFlags: u16 {
        /// Unlit
        const UNLIT = 0x01;
        /// Unfogged
        const UNFOGGED = 0x02;
        /// No backface culling
        const NO_BACKFACE_CULLING = 0x04;
        /// No z-buffer
        const NO_ZBUFFER = 0x08;
        /// Affected by projection
        const AFFECTED_BY_PROJECTION = 0x10;
        /// Depth test
        const DEPTH_TEST = 0x20;
        /// Depth write
        const DEPTH_WRITE = 0x40;
    }
}

wow_bitflags!(M2RenderFlags, u16);

/// Blend modes as defined in the M2 format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum M2BlendMode {
    #[default]
    Opaque = 0,
    AlphaKey = 1,
    Alpha = 2,
    NoAlphaAdd = 3,
    Add = 4,
    Mod = 5,
    Mod2x = 6,
}

/// Represents a material layer (render flags) in an M2 model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct M2Material {
    pub flags: M2RenderFlags,
    pub blend_mode: M2BlendMode,
}

impl M2Material {
    pub fn new(flags: M2RenderFlags, blend_mode: M2BlendMode) -> Self {
        Self { flags, blend_mode }
    }
}

impl WowDataW for M2Material {
    const WOW_SIZE: usize = 4;

    fn wow_write<W: std::io::Write>(&self, writer: &mut W) -> Result<()> {
        self.flags.wow_write(writer)?;
        (self.blend_mode as u16).wow_write(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_material_bytes() {
        let material = M2Material::new(M2RenderFlags::NO_BACKFACE_CULLING, M2BlendMode::AlphaKey);
        assert_eq!(material.wow_bytes().unwrap(), [0x04, 0x00, 0x01, 0x00]);
    }
}
