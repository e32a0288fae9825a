use wow_data::error::Result as WDResult;
use wow_data::prelude::*;
use wow_data::track::NO_GLOBAL_SEQUENCE;
use wow_data::utils::count_of;

use crate::error::{M2Error, Result};

/// Event identifiers the converter emits
pub mod tags {
    /// Idle sound loop
    pub const IDLE_SOUND_LOOP: &str = "$DSL";
    /// Death thud
    pub const DEATH: &str = "$DTH";
    /// Combat attack hit
    pub const ATTACK_HIT: &str = "$CAH";
    /// Weapon swoosh / spell cast sound
    pub const SPELL_CAST: &str = "$CSS";
    /// Combat parry
    pub const PARRY: &str = "$CPP";
    /// Wound (being hit)
    pub const HIT: &str = "$HIT";
    /// First fidget sound
    pub const FIDGET_1: &str = "$FD1";
    /// Second fidget sound
    pub const FIDGET_2: &str = "$FD2";
    /// Footstep
    pub const FOOTSTEP: &str = "$FSD";
}

/// Fixed part of an event record (36 bytes)
#[derive(Debug, Clone, PartialEq, WowDataW)]
pub struct M2EventHeader {
    pub identifier: [u8; 4],
    pub data: u32,
    pub bone: u32,
    pub position: C3Vector,
    pub interpolation: u16,
    pub global_sequence: u16,
    pub timestamps: WowArray<WowArray<u32>>,
}

/// Represents an event in an M2 model
///
/// Events only carry timestamps: one list per animation sequence, each possibly empty.
#[derive(Debug, Clone, PartialEq)]
pub struct M2Event {
    identifier: [u8; 4],
    /// Event data (sound database id for sound events)
    pub data: u32,
    /// Bone to attach the event to
    pub bone: u32,
    /// Position relative to bone
    pub position: C3Vector,
    pub interpolation: Interpolation,
    pub global_sequence: Option<u16>,
    /// Fire times per animation sequence
    pub timestamps: Vec<Vec<u32>>,
}

impl M2Event {
    /// Creates an event with no timestamp sequences.
    ///
    /// The identifier must be exactly four ASCII characters; it is never padded or truncated.
    pub fn new(identifier: &str, data: u32, bone: u32) -> Result<Self> {
        let identifier: [u8; 4] = identifier
            .as_bytes()
            .try_into()
            .ok()
            .filter(|_| identifier.is_ascii())
            .ok_or_else(|| M2Error::InvalidEventTag(identifier.to_string()))?;

        Ok(Self {
            identifier,
            data,
            bone,
            position: C3Vector::origin(),
            interpolation: Interpolation::None,
            global_sequence: None,
            timestamps: Vec::new(),
        })
    }

    pub fn identifier(&self) -> &[u8; 4] {
        &self.identifier
    }

    pub fn add_sequence<I: IntoIterator<Item = u32>>(&mut self, timestamps: I) {
        self.timestamps.push(timestamps.into_iter().collect());
    }
}

impl TrackedRecord for M2Event {
    type Header = M2EventHeader;
    const NAME: &'static str = "M2Event";

    /// Descriptors for every sequence, then each sequence's timestamps back to back.
    fn emit(&self, base: u32) -> WDResult<Emitted<M2EventHeader>> {
        let interpolation = self.interpolation as u16;
        let global_sequence = self.global_sequence.unwrap_or(NO_GLOBAL_SEQUENCE);

        let mut header = M2EventHeader {
            identifier: self.identifier,
            data: self.data,
            bone: self.bone,
            position: self.position,
            interpolation,
            global_sequence,
            timestamps: WowArray::default(),
        };
        if self.timestamps.is_empty() {
            return Ok(Emitted::empty(header));
        }

        let descriptor_len = self.timestamps.len() * WowArray::<u32>::WOW_SIZE;
        let mut bytes = vec![0u8; descriptor_len];
        let mut descriptors = Vec::with_capacity(self.timestamps.len());
        for sequence in &self.timestamps {
            if sequence.is_empty() {
                descriptors.push(WowArray::<u32>::default());
                continue;
            }
            let offset = offset_at(base, bytes.len())?;
            for timestamp in sequence {
                timestamp.wow_write(&mut bytes)?;
            }
            descriptors.push(WowArray::new(count_of(sequence.len())?, offset));
        }

        let mut descriptor_bytes = Vec::with_capacity(descriptor_len);
        for descriptor in &descriptors {
            descriptor.wow_write(&mut descriptor_bytes)?;
        }
        bytes[..descriptor_len].copy_from_slice(&descriptor_bytes);

        header.timestamps = WowArray::new(count_of(self.timestamps.len())?, base);
        Ok(Emitted::new(bytes, header))
    }
}
