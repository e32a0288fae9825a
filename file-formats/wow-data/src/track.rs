//! Animation tracks.
//!
//! A [`TrackSequence`] is the full M2 track: a 20-byte header pointing at one timestamp
//! descriptor and one value descriptor per sequence, each of which points at the keys of
//! that sequence. A [`SimpleTrack`] is the flat 16-byte variant particle emitters use.

use wow_data_derive::WowDataW;

use crate::array::Emitted;
use crate::error::{Result, WowDataError};
use crate::types::{WowArray, WowDataW};
use crate::utils::{count_of, offset_at, pad_to_alignment};

pub const NO_GLOBAL_SEQUENCE: u16 = 0xFFFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum Interpolation {
    #[default]
    None = 0,
    Linear = 1,
    Bezier = 2,
    Hermite = 3,
}

fn check_key_counts(timestamps: usize, values: usize) -> Result<()> {
    if timestamps == values {
        Ok(())
    } else {
        Err(WowDataError::KeyCountMismatch { timestamps, values })
    }
}

/// Timestamp and value lists as they appear in a description document
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(bound(deserialize = "S: serde::Deserialize<'de>, T: serde::Deserialize<'de>"))]
struct KeyLists<S, T> {
    #[serde(default)]
    timestamps: Vec<S>,
    #[serde(default)]
    values: Vec<T>,
}

/// Keys of one sequence, timestamps in milliseconds.
///
/// Timestamps and values always have the same length.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        try_from = "KeyLists<u32, T>",
        bound(deserialize = "T: serde::Deserialize<'de>")
    )
)]
pub struct TrackKeys<T> {
    timestamps: Vec<u32>,
    values: Vec<T>,
}

#[cfg(feature = "serde")]
impl<T> TryFrom<KeyLists<u32, T>> for TrackKeys<T> {
    type Error = WowDataError;

    fn try_from(lists: KeyLists<u32, T>) -> Result<Self> {
        Self::from_lists(lists.timestamps, lists.values)
    }
}

impl<T> Default for TrackKeys<T> {
    fn default() -> Self {
        Self {
            timestamps: Vec::new(),
            values: Vec::new(),
        }
    }
}

impl<T> TrackKeys<T> {
    pub fn from_lists(timestamps: Vec<u32>, values: Vec<T>) -> Result<Self> {
        check_key_counts(timestamps.len(), values.len())?;
        Ok(Self { timestamps, values })
    }

    pub fn timestamps(&self) -> &[u32] {
        &self.timestamps
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn push(&mut self, timestamp: u32, value: T) {
        self.timestamps.push(timestamp);
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

impl<T> FromIterator<(u32, T)> for TrackKeys<T> {
    fn from_iter<I: IntoIterator<Item = (u32, T)>>(iter: I) -> Self {
        let mut keys = Self::default();
        for (timestamp, value) in iter {
            keys.push(timestamp, value);
        }
        keys
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WowDataW)]
pub struct TrackHeader<T> {
    pub interpolation: u16,
    pub global_sequence: u16,
    pub timestamps: WowArray<WowArray<u32>>,
    pub values: WowArray<WowArray<T>>,
}

impl<T> TrackHeader<T> {
    pub const fn empty(interpolation: u16, global_sequence: u16) -> Self {
        Self {
            interpolation,
            global_sequence,
            timestamps: WowArray::new(0, 0),
            values: WowArray::new(0, 0),
        }
    }
}

/// Keyed animation data split into independent sequences.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackSequence<T> {
    pub interpolation: Interpolation,
    /// Index into the model's global loops; the track's own timestamps are still written
    pub global_sequence: Option<u16>,
    #[cfg_attr(feature = "serde", serde(default))]
    sequences: Vec<TrackKeys<T>>,
}

impl<T> Default for TrackSequence<T> {
    fn default() -> Self {
        Self::new(Interpolation::None)
    }
}

impl<T> TrackSequence<T> {
    pub fn new(interpolation: Interpolation) -> Self {
        Self {
            interpolation,
            global_sequence: None,
            sequences: Vec::new(),
        }
    }

    /// A single sequence holding one key at time zero.
    pub fn constant(interpolation: Interpolation, value: T) -> Self {
        let mut track = Self::new(interpolation);
        track.add_sequence([(0, value)]);
        track
    }

    pub fn with_global_sequence(mut self, global_sequence: u16) -> Self {
        self.global_sequence = Some(global_sequence);
        self
    }

    pub fn add_sequence<I: IntoIterator<Item = (u32, T)>>(&mut self, keys: I) {
        self.sequences.push(keys.into_iter().collect());
    }

    /// Appends a key to the last sequence, opening one if there is none yet.
    pub fn push_key(&mut self, timestamp: u32, value: T) {
        if self.sequences.is_empty() {
            self.sequences.push(TrackKeys::default());
        }
        if let Some(last) = self.sequences.last_mut() {
            last.push(timestamp, value);
        }
    }

    pub fn sequences(&self) -> &[TrackKeys<T>] {
        &self.sequences
    }

    pub fn sequence_count(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// Same keys with every value converted, e.g. full rotations to packed ones.
    pub fn map_values<U, F: FnMut(&T) -> U>(&self, mut f: F) -> TrackSequence<U> {
        TrackSequence {
            interpolation: self.interpolation,
            global_sequence: self.global_sequence,
            sequences: self
                .sequences
                .iter()
                .map(|keys| TrackKeys {
                    timestamps: keys.timestamps.clone(),
                    values: keys.values.iter().map(&mut f).collect(),
                })
                .collect(),
        }
    }
}

impl<T: WowDataW> TrackSequence<T> {
    pub const HEADER_SIZE: usize = TrackHeader::<T>::WOW_SIZE;

    /// Emits the per-sequence descriptors and key data at `base`.
    ///
    /// Layout: timestamp descriptors, value descriptors, each sequence's timestamps padded
    /// to 16, each sequence's values padded to 16. The descriptor region is reserved first
    /// and backfilled once every payload offset is known. A sequence without keys gets a
    /// 0/0 descriptor; a track without sequences emits nothing.
    pub fn emit(&self, base: u32) -> Result<Emitted<TrackHeader<T>>> {
        let interpolation = self.interpolation as u16;
        let global_sequence = self.global_sequence.unwrap_or(NO_GLOBAL_SEQUENCE);

        if self.sequences.is_empty() {
            return Ok(Emitted::empty(TrackHeader::empty(
                interpolation,
                global_sequence,
            )));
        }

        let n = self.sequences.len();
        let descriptor_len = WowArray::<u32>::WOW_SIZE * n;
        let mut bytes = vec![0u8; descriptor_len * 2];

        for keys in &self.sequences {
            check_key_counts(keys.timestamps.len(), keys.values.len())?;
        }

        let mut timestamp_descriptors = Vec::with_capacity(n);
        for keys in &self.sequences {
            timestamp_descriptors.push(write_keys(&mut bytes, base, &keys.timestamps)?);
            pad_to_alignment(&mut bytes, base, 16);
        }

        let mut value_descriptors = Vec::with_capacity(n);
        for keys in &self.sequences {
            value_descriptors.push(write_keys(&mut bytes, base, &keys.values)?);
            pad_to_alignment(&mut bytes, base, 16);
        }

        let mut descriptors = Vec::with_capacity(descriptor_len * 2);
        for descriptor in &timestamp_descriptors {
            descriptor.wow_write(&mut descriptors)?;
        }
        for descriptor in &value_descriptors {
            descriptor.wow_write(&mut descriptors)?;
        }
        bytes[..descriptors.len()].copy_from_slice(&descriptors);

        let count = count_of(n)?;
        Ok(Emitted::new(
            bytes,
            TrackHeader {
                interpolation,
                global_sequence,
                timestamps: WowArray::new(count, base),
                values: WowArray::new(count, offset_at(base, descriptor_len)?),
            },
        ))
    }
}

fn write_keys<K: WowDataW>(bytes: &mut Vec<u8>, base: u32, keys: &[K]) -> Result<WowArray<K>> {
    if keys.is_empty() {
        return Ok(WowArray::default());
    }
    let offset = offset_at(base, bytes.len())?;
    for key in keys {
        key.wow_write(bytes)?;
    }
    Ok(WowArray::new(count_of(keys.len())?, offset))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WowDataW)]
pub struct FBlockHeader<T> {
    pub timestamps: WowArray<u16>,
    pub values: WowArray<T>,
}

/// Single-sequence track with 16-bit timestamps and no interpolation header.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        try_from = "KeyLists<u16, T>",
        bound(deserialize = "T: serde::Deserialize<'de>")
    )
)]
pub struct SimpleTrack<T> {
    timestamps: Vec<u16>,
    values: Vec<T>,
}

#[cfg(feature = "serde")]
impl<T> TryFrom<KeyLists<u16, T>> for SimpleTrack<T> {
    type Error = WowDataError;

    fn try_from(lists: KeyLists<u16, T>) -> Result<Self> {
        Self::from_lists(lists.timestamps, lists.values)
    }
}

impl<T> Default for SimpleTrack<T> {
    fn default() -> Self {
        Self {
            timestamps: Vec::new(),
            values: Vec::new(),
        }
    }
}

impl<T> SimpleTrack<T> {
    pub fn from_lists(timestamps: Vec<u16>, values: Vec<T>) -> Result<Self> {
        check_key_counts(timestamps.len(), values.len())?;
        Ok(Self { timestamps, values })
    }

    pub fn timestamps(&self) -> &[u16] {
        &self.timestamps
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn push(&mut self, timestamp: u16, value: T) {
        self.timestamps.push(timestamp);
        self.values.push(value);
    }

    pub fn constant(value: T) -> Self {
        Self {
            timestamps: vec![0],
            values: vec![value],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty() && self.values.is_empty()
    }
}

impl<T: WowDataW> SimpleTrack<T> {
    pub const HEADER_SIZE: usize = FBlockHeader::<T>::WOW_SIZE;

    /// Emits timestamps then values, each padded to 16.
    pub fn emit(&self, base: u32) -> Result<Emitted<FBlockHeader<T>>> {
        if self.is_empty() {
            return Ok(Emitted::empty(FBlockHeader {
                timestamps: WowArray::default(),
                values: WowArray::default(),
            }));
        }

        check_key_counts(self.timestamps.len(), self.values.len())?;
        let mut bytes = Vec::new();
        let timestamps = write_keys(&mut bytes, base, &self.timestamps)?;
        pad_to_alignment(&mut bytes, base, 16);
        let values = write_keys(&mut bytes, base, &self.values)?;
        pad_to_alignment(&mut bytes, base, 16);

        Ok(Emitted::new(bytes, FBlockHeader { timestamps, values }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::C3Vector;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_header_sizes() {
        assert_eq!(TrackSequence::<C3Vector>::HEADER_SIZE, 20);
        assert_eq!(TrackSequence::<u8>::HEADER_SIZE, 20);
        assert_eq!(SimpleTrack::<u16>::HEADER_SIZE, 16);
    }

    #[test]
    fn test_empty_track_is_zero() {
        let track = TrackSequence::<C3Vector>::new(Interpolation::Linear);
        let emitted = track.emit(0x150).unwrap();
        assert!(emitted.is_empty());
        assert_eq!(
            emitted.descriptor.wow_bytes().unwrap(),
            [
                0x01, 0x00, 0xFF, 0xFF, // linear, no global sequence
                0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // timestamps
                0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // values
            ]
        );
    }

    #[test]
    fn test_single_sequence_layout() {
        let track = TrackSequence::constant(Interpolation::None, 1_i32);
        let emitted = track.emit(0x40).unwrap();

        assert_eq!(emitted.descriptor.timestamps, WowArray::new(1, 0x40));
        assert_eq!(emitted.descriptor.values, WowArray::new(1, 0x48));
        assert_eq!(
            emitted.bytes,
            [
                0x01, 0x00, 0x00, 0x00, 0x50, 0x00, 0x00, 0x00, // timestamps -> 0x50
                0x01, 0x00, 0x00, 0x00, 0x60, 0x00, 0x00, 0x00, // values -> 0x60
                0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // timestamp 0 + pad
                0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
                0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // value 1 + pad
                0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
            ]
        );
    }

    #[test]
    fn test_multiple_sequences_order() {
        let mut track = TrackSequence::new(Interpolation::Linear);
        track.add_sequence([(0, 1_u16), (100, 2)]);
        track.add_sequence([(0, 3_u16)]);
        let emitted = track.emit(0).unwrap();

        // 32 descriptor bytes, then ts0 (8) pad, ts1 (4) pad, v0 (4) pad, v1 (2) pad
        assert_eq!(emitted.len(), 32 + 16 * 4);
        let descriptors = &emitted.bytes[..32];
        assert_eq!(descriptors[..8], [2, 0, 0, 0, 32, 0, 0, 0]);
        assert_eq!(descriptors[8..16], [1, 0, 0, 0, 48, 0, 0, 0]);
        assert_eq!(descriptors[16..24], [2, 0, 0, 0, 64, 0, 0, 0]);
        assert_eq!(descriptors[24..32], [1, 0, 0, 0, 80, 0, 0, 0]);
        assert_eq!(emitted.bytes[36..40], [100, 0, 0, 0]);
        assert_eq!(emitted.bytes[64..68], [1, 0, 2, 0]);
    }

    #[test]
    fn test_empty_sequence_has_zero_descriptor() {
        let mut track = TrackSequence::<u32>::new(Interpolation::None);
        track.add_sequence([]);
        track.add_sequence([(0, 5)]);
        let emitted = track.emit(0x10).unwrap();

        assert_eq!(emitted.bytes[..8], [0; 8]);
        assert_eq!(emitted.bytes[16..24], [0; 8]);
        assert_eq!(emitted.descriptor.timestamps, WowArray::new(2, 0x10));
        assert_eq!(emitted.descriptor.values, WowArray::new(2, 0x20));
    }

    #[test]
    fn test_global_sequence_passthrough() {
        let track = TrackSequence::constant(Interpolation::None, 0_u32).with_global_sequence(3);
        let emitted = track.emit(0).unwrap();
        assert_eq!(emitted.descriptor.global_sequence, 3);
        assert_eq!(emitted.descriptor.timestamps.count, 1);
    }

    #[test]
    fn test_push_key_opens_sequence() {
        let mut track = TrackSequence::<u32>::default();
        track.push_key(0, 1);
        track.push_key(10, 2);
        assert_eq!(track.sequence_count(), 1);
        assert_eq!(track.sequences()[0].len(), 2);
    }

    #[test]
    fn test_map_values_keeps_timestamps() {
        let mut track = TrackSequence::new(Interpolation::Linear).with_global_sequence(1);
        track.add_sequence([(0, 1_u32), (50, 2)]);
        let mapped = track.map_values(|v| *v as f32 * 0.5);

        assert_eq!(mapped.interpolation, Interpolation::Linear);
        assert_eq!(mapped.global_sequence, Some(1));
        assert_eq!(mapped.sequences()[0].timestamps(), &[0, 50]);
        assert_eq!(mapped.sequences()[0].values(), &[0.5, 1.0]);
    }

    #[test]
    fn test_simple_track_layout() {
        let track = SimpleTrack::constant(7_u16);
        let emitted = track.emit(0x20).unwrap();
        assert_eq!(emitted.descriptor.timestamps, WowArray::new(1, 0x20));
        assert_eq!(emitted.descriptor.values, WowArray::new(1, 0x30));
        assert_eq!(emitted.len(), 32);
        assert_eq!(emitted.bytes[16..18], [7, 0]);
    }

    #[test]
    fn test_empty_simple_track_is_zero() {
        let track = SimpleTrack::<f32>::default();
        let emitted = track.emit(0x24).unwrap();
        assert!(emitted.is_empty());
        assert_eq!(emitted.descriptor.wow_bytes().unwrap(), [0; 16]);
    }

    #[test]
    fn test_from_lists_rejects_uneven_keys() {
        let err = TrackKeys::from_lists(vec![0, 10], vec![1_u32]).unwrap_err();
        assert!(matches!(
            err,
            WowDataError::KeyCountMismatch {
                timestamps: 2,
                values: 1
            }
        ));
        assert!(SimpleTrack::from_lists(vec![0_u16], Vec::<f32>::new()).is_err());
        assert_eq!(SimpleTrack::from_lists(vec![0_u16], vec![1.0_f32]).unwrap().values(), &[1.0]);
    }

    #[test]
    fn test_uneven_sequence_fails_to_emit() {
        let mut track = TrackSequence::<u32>::new(Interpolation::Linear);
        track.add_sequence([(0, 1), (10, 2)]);
        track.sequences[0].values.pop();
        assert!(matches!(
            track.emit(0),
            Err(WowDataError::KeyCountMismatch {
                timestamps: 2,
                values: 1
            })
        ));
    }

    #[test]
    fn test_uneven_simple_track_fails_to_emit() {
        let mut track = SimpleTrack::constant(3_u16);
        track.timestamps.push(20);
        assert!(matches!(
            track.emit(0),
            Err(WowDataError::KeyCountMismatch {
                timestamps: 2,
                values: 1
            })
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_rejects_uneven_keys() {
        let json = r#"{"interpolation":"Linear","global_sequence":null,
            "sequences":[{"timestamps":[0,10],"values":[{"x":1.0,"y":2.0,"z":3.0}]}]}"#;
        let err = serde_json::from_str::<TrackSequence<C3Vector>>(json).unwrap_err();
        assert!(err.to_string().contains("Key count mismatch"));

        let json = r#"{"timestamps":[0],"values":[]}"#;
        assert!(serde_json::from_str::<SimpleTrack<f32>>(json).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_keeps_even_keys() {
        let mut track = TrackSequence::new(Interpolation::Linear);
        track.add_sequence([(0, 1_u32), (10, 2)]);
        let json = serde_json::to_string(&track).unwrap();
        assert_eq!(serde_json::from_str::<TrackSequence<u32>>(&json).unwrap(), track);
    }
}
