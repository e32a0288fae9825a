use wow_data::error::Result as WDResult;
use wow_data::prelude::*;

/// Attachment points populated on skeletal creatures
///
/// The discriminant is the attachment id and also the slot in the attachment lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
#[repr(u32)]
pub enum M2AttachmentId {
    /// Right hand, also item visual 1
    HandRight = 1,
    /// Left hand, also item visual 2
    HandLeft = 2,
    ChestBloodFront = 15,
    ChestBloodBack = 16,
    /// Mouth, used for breath effects
    Breath = 17,
    /// Anchor for the floating name plate
    PlayerName = 18,
    /// Ground position under the model
    Base = 19,
    Head = 20,
    SpellLeftHand = 21,
    SpellRightHand = 22,
    Chest = 34,
}

impl M2AttachmentId {
    /// Attachments every skeletal creature gets, in file order
    pub const SKELETAL: [Self; 11] = [
        Self::HandRight,
        Self::HandLeft,
        Self::ChestBloodFront,
        Self::ChestBloodBack,
        Self::Breath,
        Self::PlayerName,
        Self::Base,
        Self::Head,
        Self::SpellLeftHand,
        Self::SpellRightHand,
        Self::Chest,
    ];

    /// Number of slots in the attachment lookup (through `Chest`)
    pub const LOOKUP_LEN: usize = Self::Chest as usize + 1;
}

/// Fixed part of an attachment record (40 bytes)
#[derive(Debug, Clone, PartialEq, WowDataW)]
pub struct M2AttachmentHeader {
    pub id: u32,
    pub bone: u32,
    pub position: C3Vector,
    pub animate_attached: TrackHeader<i32>,
}

/// Represents an attachment in an M2 model
#[derive(Debug, Clone, PartialEq)]
pub struct M2Attachment {
    /// Attachment ID (determines attachment point type)
    pub id: M2AttachmentId,
    /// Bone to attach to
    pub bone: u32,
    /// Position relative to bone
    pub position: C3Vector,
    /// Whether attached objects are shown, keyed over time
    pub animate_attached: TrackSequence<i32>,
}

impl M2Attachment {
    /// An always-visible attachment on `bone`
    pub fn new(id: M2AttachmentId, bone: u32) -> Self {
        Self {
            id,
            bone,
            position: C3Vector::origin(),
            animate_attached: TrackSequence::constant(Interpolation::None, 1),
        }
    }
}

impl TrackedRecord for M2Attachment {
    type Header = M2AttachmentHeader;
    const NAME: &'static str = "M2Attachment";

    fn emit(&self, base: u32) -> WDResult<Emitted<M2AttachmentHeader>> {
        let animate_attached = self.animate_attached.emit(base)?;
        Ok(Emitted::new(
            animate_attached.bytes,
            M2AttachmentHeader {
                id: self.id as u32,
                bone: self.bone,
                position: self.position,
                animate_attached: animate_attached.descriptor,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_attachment_size() {
        assert_eq!(M2AttachmentHeader::WOW_SIZE, 40);
        assert_eq!(M2AttachmentId::LOOKUP_LEN, 35);
    }

    #[test]
    fn test_attachment_emit() {
        let attachment = M2Attachment::new(M2AttachmentId::Head, 5);
        let emitted = attachment.emit(0x400).unwrap();

        let header = emitted.descriptor.wow_bytes().unwrap();
        assert_eq!(header[..8], [20, 0, 0, 0, 5, 0, 0, 0]);
        assert_eq!(emitted.descriptor.animate_attached.timestamps, WowArray::new(1, 0x400));
        assert_eq!(emitted.descriptor.animate_attached.values, WowArray::new(1, 0x408));

        // one timestamp descriptor, one value descriptor, then [0] and [1] each padded
        assert_eq!(emitted.len(), 48);
        assert_eq!(emitted.bytes[32..36], [1, 0, 0, 0]);
    }
}
