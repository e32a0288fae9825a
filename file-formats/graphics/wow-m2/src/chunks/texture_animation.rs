use wow_data::error::Result as WDResult;
use wow_data::prelude::*;

/// Fixed part of a texture transform (60 bytes)
#[derive(Debug, Clone, PartialEq, WowDataW)]
pub struct M2TextureAnimationHeader {
    pub translation: TrackHeader<C3Vector>,
    pub rotation: TrackHeader<Quaternion>,
    pub scale: TrackHeader<C3Vector>,
}

/// A texture transform (UV scrolling, rotation, scaling)
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-support", serde(default))]
pub struct M2TextureAnimation {
    pub translation: TrackSequence<C3Vector>,
    pub rotation: TrackSequence<Quaternion>,
    pub scale: TrackSequence<C3Vector>,
}

impl M2TextureAnimation {
    /// UV translation only
    pub fn scrolling(translation: TrackSequence<C3Vector>) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }
}

impl TrackedRecord for M2TextureAnimation {
    type Header = M2TextureAnimationHeader;
    const NAME: &'static str = "M2TextureAnimation";

    fn emit(&self, base: u32) -> WDResult<Emitted<M2TextureAnimationHeader>> {
        let translation = self.translation.emit(base)?;
        let mut bytes = translation.bytes;
        let rotation = self.rotation.emit(offset_at(base, bytes.len())?)?;
        bytes.extend_from_slice(&rotation.bytes);
        let scale = self.scale.emit(offset_at(base, bytes.len())?)?;
        bytes.extend_from_slice(&scale.bytes);

        Ok(Emitted::new(
            bytes,
            M2TextureAnimationHeader {
                translation: translation.descriptor,
                rotation: rotation.descriptor,
                scale: scale.descriptor,
            },
        ))
    }
}
