use bitflags::bitflags;

use wow_data::prelude::*;

use crate::chunks::{
    M2AttachmentHeader, M2BoneHeader, M2CameraHeader, M2ColorHeader, M2EventHeader,
    M2Material, M2ParticleEmitterHeader, M2Sequence, M2TextureAnimationHeader, M2TextureHeader,
    M2Vertex,
};
use crate::common::Fixed16;

/// Magic signature for M2 files ("MD20")
pub const M2_MAGIC: [u8; 4] = *b"MD20";

/// The only version this crate writes (Wrath of the Lich King)
pub const M2_VERSION: u32 = 264;

bitflags! {
    /// Model flags as defined in the M2 format
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
    pub struct M2ModelFlags: u32 {
        /// Tilt on X axis
        const TILT_X = 0x0001;
        /// Tilt on Y axis
        const TILT_Y = 0x0002;
        /// Add a back-reference to the model
        const ADD_BACK_REFERENCE = 0x0004;
        /// Header carries the blend mode override array
        const BLEND_MODE_OVERRIDES = 0x0008;
        /// Is it a camera?
        const IS_CAMERA = 0x0010;
        /// No particle trails
        const NO_PARTICLE_TRAILS = 0x0040;
        /// Load phys data
        const LOAD_PHYS_DATA = 0x0100;
        /// Has bones
        const HAS_BONES = 0x0400;
        /// Camera can be modified
        const CAMERA_MODIFIABLE = 0x4000;
    }
}

wow_bitflags!(M2ModelFlags, u32);

/// M2 model header for version 264
/// Based on: <https://wowdev.wiki/M2#Header>
///
/// Every array is an absolute `count, offset` pair into the same file. The header is
/// written last, once every section behind it has been placed.
#[derive(Debug, Clone, PartialEq, WowDataW)]
pub struct M2Header {
    /// Magic signature ("MD20")
    pub magic: [u8; 4],
    /// Version of the M2 file
    pub version: u32,
    /// Name of the model, NUL included
    pub name: WowArray<u8>,
    /// Flags
    pub flags: M2ModelFlags,

    /// Global loop durations
    pub global_loops: WowArray<u32>,
    /// Animations
    pub sequences: WowArray<M2Sequence>,
    /// Animation lookups
    pub sequence_lookup: WowArray<i16>,

    /// Bones
    pub bones: WowArray<M2BoneHeader>,
    /// Key bone lookup
    pub key_bone_lookup: WowArray<i16>,

    /// Vertices
    pub vertices: WowArray<M2Vertex>,
    /// Number of skin files
    pub num_skin_profiles: u32,

    /// Color animations
    pub colors: WowArray<M2ColorHeader>,
    /// Textures
    pub textures: WowArray<M2TextureHeader>,
    /// Texture transparency tracks
    pub texture_weights: WowArray<TrackHeader<Fixed16>>,
    /// Texture transforms
    pub texture_transforms: WowArray<M2TextureAnimationHeader>,
    /// Replaceable texture lookup
    pub replaceable_texture_lookup: WowArray<i16>,
    /// Materials (render flags)
    pub materials: WowArray<M2Material>,
    /// Bone lookup table
    pub bone_lookup: WowArray<i16>,
    /// Texture lookup table
    pub texture_lookup: WowArray<i16>,
    /// Texture unit lookup table
    pub texture_unit_lookup: WowArray<i16>,
    /// Transparency lookup table
    pub transparency_lookup: WowArray<i16>,
    /// Texture transform lookup table
    pub texture_transform_lookup: WowArray<i16>,

    /// Bounding box
    pub bounding_box: BoundingBox,
    /// Bounding sphere radius
    pub bounding_sphere_radius: f32,
    /// Collision bounding box
    pub collision_box: BoundingBox,
    /// Collision sphere radius
    pub collision_sphere_radius: f32,

    /// Collision triangle vertex indices, three per face
    pub collision_indices: WowArray<u16>,
    /// Collision positions
    pub collision_positions: WowArray<C3Vector>,
    /// Collision face normals
    pub collision_normals: WowArray<C3Vector>,

    /// Attachments
    pub attachments: WowArray<M2AttachmentHeader>,
    /// Attachment lookup table
    pub attachment_lookup: WowArray<i16>,
    /// Events
    pub events: WowArray<M2EventHeader>,
    /// Lights
    pub lights: WowArray<u8>,
    /// Cameras
    pub cameras: WowArray<M2CameraHeader>,
    /// Camera lookup table
    pub camera_lookup: WowArray<i16>,
    /// Ribbon emitters
    pub ribbon_emitters: WowArray<u8>,
    /// Particle emitters
    pub particle_emitters: WowArray<M2ParticleEmitterHeader>,
}

impl M2Header {
    /// Size of the fixed header, excluding the optional blend mode overrides
    pub const BASE_SIZE: usize = Self::WOW_SIZE;

    /// A header with every array empty.
    pub fn new(flags: M2ModelFlags) -> Self {
        Self {
            magic: M2_MAGIC,
            version: M2_VERSION,
            name: WowArray::default(),
            flags,
            global_loops: WowArray::default(),
            sequences: WowArray::default(),
            sequence_lookup: WowArray::default(),
            bones: WowArray::default(),
            key_bone_lookup: WowArray::default(),
            vertices: WowArray::default(),
            num_skin_profiles: 1,
            colors: WowArray::default(),
            textures: WowArray::default(),
            texture_weights: WowArray::default(),
            texture_transforms: WowArray::default(),
            replaceable_texture_lookup: WowArray::default(),
            materials: WowArray::default(),
            bone_lookup: WowArray::default(),
            texture_lookup: WowArray::default(),
            texture_unit_lookup: WowArray::default(),
            transparency_lookup: WowArray::default(),
            texture_transform_lookup: WowArray::default(),
            bounding_box: BoundingBox::zero(),
            bounding_sphere_radius: 0.0,
            collision_box: BoundingBox::zero(),
            collision_sphere_radius: 0.0,
            collision_indices: WowArray::default(),
            collision_positions: WowArray::default(),
            collision_normals: WowArray::default(),
            attachments: WowArray::default(),
            attachment_lookup: WowArray::default(),
            events: WowArray::default(),
            lights: WowArray::default(),
            cameras: WowArray::default(),
            camera_lookup: WowArray::default(),
            ribbon_emitters: WowArray::default(),
            particle_emitters: WowArray::default(),
        }
    }

    /// Bytes reserved at the start of the file for this header.
    pub fn reserved_size(flags: M2ModelFlags) -> usize {
        if flags.contains(M2ModelFlags::BLEND_MODE_OVERRIDES) {
            Self::BASE_SIZE + WowArray::<u16>::WOW_SIZE
        } else {
            Self::BASE_SIZE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_header_size() {
        assert_eq!(M2Header::BASE_SIZE, 304);
        assert_eq!(M2Header::reserved_size(M2ModelFlags::empty()), 304);
        assert_eq!(
            M2Header::reserved_size(M2ModelFlags::BLEND_MODE_OVERRIDES),
            312
        );
    }

    #[test]
    fn test_header_prefix() {
        let header = M2Header::new(M2ModelFlags::empty());
        let bytes = header.wow_bytes().unwrap();
        assert_eq!(bytes.len(), 304);
        assert_eq!(&bytes[..8], b"MD20\x08\x01\x00\x00");
        // skin profile count sits after the vertex array
        assert_eq!(bytes[68..72], [1, 0, 0, 0]);
    }
}
