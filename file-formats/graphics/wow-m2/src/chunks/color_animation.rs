use wow_data::error::Result as WDResult;
use wow_data::prelude::*;

use crate::common::Fixed16;

/// Fixed part of a color animation (40 bytes)
#[derive(Debug, Clone, PartialEq, WowDataW)]
pub struct M2ColorHeader {
    pub color: TrackHeader<C3Vector>,
    pub alpha: TrackHeader<Fixed16>,
}

/// Color animation structure: RGB in `[0, 1]` plus alpha
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct M2Color {
    pub color: TrackSequence<C3Vector>,
    pub alpha: TrackSequence<Fixed16>,
}

impl M2Color {
    pub fn constant(color: C3Vector, alpha: Fixed16) -> Self {
        Self {
            color: TrackSequence::constant(Interpolation::None, color),
            alpha: TrackSequence::constant(Interpolation::None, alpha),
        }
    }
}

impl TrackedRecord for M2Color {
    type Header = M2ColorHeader;
    const NAME: &'static str = "M2Color";

    fn emit(&self, base: u32) -> WDResult<Emitted<M2ColorHeader>> {
        let color = self.color.emit(base)?;
        let mut bytes = color.bytes;
        let alpha = self.alpha.emit(offset_at(base, bytes.len())?)?;
        bytes.extend_from_slice(&alpha.bytes);

        Ok(Emitted::new(
            bytes,
            M2ColorHeader {
                color: color.descriptor,
                alpha: alpha.descriptor,
            },
        ))
    }
}
