use wow_data::error::Result as WDResult;
use wow_data::prelude::*;

bitflags::bitflags! {
    /// Bone flags as defined in the M2 format
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
    pub struct M2BoneFlags: u32 {
        /// Spherical billboard
        const SPHERICAL_BILLBOARD = 0x8;
        /// Cylindrical billboard lock X
        const CYLINDRICAL_BILLBOARD_LOCK_X = 0x10;
        /// Cylindrical billboard lock Y
        const CYLINDRICAL_BILLBOARD_LOCK_Y = 0x20;
        /// Cylindrical billboard lock Z
        const CYLINDRICAL_BILLBOARD_LOCK_Z = 0x40;
        /// Transformed
        const TRANSFORMED = 0x200;
        /// Kinematic bone (requires physics)
        const KINEMATIC_BONE = 0x400;
        /// Helper bone
        const HELPER_BONE = 0x1000;
        /// Has animation
        const HAS_ANIMATION = 0x4000;
        /// Has multiple animations at higher LODs
        const ANIMATED_AT_HIGHER_LODS = 0x8000;
    }
}

wow_bitflags!(M2BoneFlags, u32);

/// Fixed part of a bone record (88 bytes)
#[derive(Debug, Clone, PartialEq, WowDataW)]
pub struct M2BoneHeader {
    pub key_bone_id: i32,
    pub flags: M2BoneFlags,
    pub parent_bone: i16,
    pub submesh_id: u16,
    pub bone_name_crc: u32,
    pub translation: TrackHeader<C3Vector>,
    pub rotation: TrackHeader<Quaternion16>,
    pub scale: TrackHeader<C3Vector>,
    pub pivot: C3Vector,
}

/// Represents a bone in an M2 model
#[derive(Debug, Clone, PartialEq)]
pub struct M2Bone {
    /// Key bone id, -1 for bones without a key role
    pub key_bone_id: i32,
    pub flags: M2BoneFlags,
    /// Parent bone index or -1 for a root
    pub parent_bone: i16,
    pub submesh_id: u16,
    pub bone_name_crc: u32,
    pub translation: TrackSequence<C3Vector>,
    pub rotation: TrackSequence<Quaternion16>,
    pub scale: TrackSequence<C3Vector>,
    pub pivot: C3Vector,
}

impl M2Bone {
    /// A root bone with no animation
    pub fn new(pivot: C3Vector) -> Self {
        Self {
            key_bone_id: -1,
            flags: M2BoneFlags::empty(),
            parent_bone: -1,
            submesh_id: 0,
            bone_name_crc: 0,
            translation: TrackSequence::new(Interpolation::Linear),
            rotation: TrackSequence::new(Interpolation::Linear),
            scale: TrackSequence::new(Interpolation::Linear),
            pivot,
        }
    }
}

impl TrackedRecord for M2Bone {
    type Header = M2BoneHeader;
    const NAME: &'static str = "M2Bone";

    fn emit(&self, base: u32) -> WDResult<Emitted<M2BoneHeader>> {
        let mut bytes = Vec::new();

        let translation = self.translation.emit(base)?;
        bytes.extend_from_slice(&translation.bytes);
        let rotation = self.rotation.emit(offset_at(base, bytes.len())?)?;
        bytes.extend_from_slice(&rotation.bytes);
        let scale = self.scale.emit(offset_at(base, bytes.len())?)?;
        bytes.extend_from_slice(&scale.bytes);

        Ok(Emitted::new(
            bytes,
            M2BoneHeader {
                key_bone_id: self.key_bone_id,
                flags: self.flags,
                parent_bone: self.parent_bone,
                submesh_id: self.submesh_id,
                bone_name_crc: self.bone_name_crc,
                translation: translation.descriptor,
                rotation: rotation.descriptor,
                scale: scale.descriptor,
                pivot: self.pivot,
            },
        ))
    }
}
