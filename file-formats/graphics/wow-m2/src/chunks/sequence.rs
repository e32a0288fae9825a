use wow_data::prelude::*;

/// Animation ids from `AnimationData.dbc` that drive generated events
pub mod animation_ids {
    pub const STAND: u16 = 0;
    pub const DEATH: u16 = 1;
    pub const WALK: u16 = 4;
    pub const RUN: u16 = 5;
    pub const SHUFFLE_LEFT: u16 = 11;
    pub const SHUFFLE_RIGHT: u16 = 12;
    pub const WALK_BACKWARDS: u16 = 13;
    pub const ATTACK_UNARMED: u16 = 16;

    /// Animations that play footstep sounds
    pub const MOVEMENT: [u16; 5] = [WALK, RUN, SHUFFLE_LEFT, SHUFFLE_RIGHT, WALK_BACKWARDS];
}

bitflags::bitflags! {
    /// Animation flags as defined in the M2 format
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
    pub struct M2SequenceFlags: u32 {
        /// Sets 0x80 when loaded
        const INIT_BLEND = 0x1;
        /// Primary bone sequence; the keys live in this file
        const PRIMARY_BONE_SEQUENCE = 0x20;
        /// Has an alias (next variation chain)
        const IS_ALIAS = 0x40;
        /// Blended animation
        const BLENDED = 0x80;
    }
}

wow_bitflags!(M2SequenceFlags, u32);

/// An animation sequence record (64 bytes)
#[derive(Debug, Clone, PartialEq, WowDataW)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-support", serde(default))]
pub struct M2Sequence {
    /// Animation id in `AnimationData.dbc`
    pub animation_id: u16,
    /// Sub-animation id (variation index)
    pub variation_index: u16,
    /// Length of this animation in milliseconds
    pub duration: u32,
    /// Movement speed while playing
    pub movement_speed: f32,
    pub flags: M2SequenceFlags,
    /// Weight among variations of the same animation; variations sum to 32767
    pub frequency: i16,
    pub padding: u16,
    pub replay_min: u32,
    pub replay_max: u32,
    /// Blend time in milliseconds
    pub blend_time: u32,
    pub bounds: BoundingBox,
    pub bound_radius: f32,
    /// Next variation or -1
    pub next_variation: i16,
    pub alias_next: u16,
}

impl Default for M2Sequence {
    fn default() -> Self {
        Self {
            animation_id: animation_ids::STAND,
            variation_index: 0,
            duration: 10_000,
            movement_speed: 0.0,
            flags: M2SequenceFlags::PRIMARY_BONE_SEQUENCE,
            frequency: i16::MAX,
            padding: 0,
            replay_min: 0,
            replay_max: 0,
            blend_time: 150,
            bounds: BoundingBox::zero(),
            bound_radius: 0.0,
            next_variation: -1,
            alias_next: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sequence_layout() {
        assert_eq!(M2Sequence::WOW_SIZE, 64);

        let sequence = M2Sequence {
            animation_id: animation_ids::WALK,
            duration: 1000,
            ..Default::default()
        };
        let bytes = sequence.wow_bytes().unwrap();
        assert_eq!(bytes[..8], [4, 0, 0, 0, 0xE8, 0x03, 0, 0]);
        assert_eq!(bytes[16..18], [0xFF, 0x7F]);
        assert_eq!(bytes[60..64], [0xFF, 0xFF, 0, 0]);
    }
}
