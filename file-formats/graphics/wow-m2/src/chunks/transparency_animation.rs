use wow_data::error::Result as WDResult;
use wow_data::prelude::*;

use crate::common::Fixed16;

/// Texture transparency ("texture weight") track
#[derive(Debug, Clone, PartialEq)]
pub struct M2TransparencyAnimation {
    pub alpha: TrackSequence<Fixed16>,
}

impl M2TransparencyAnimation {
    /// Fully opaque at all times
    pub fn opaque() -> Self {
        Self {
            alpha: TrackSequence::constant(Interpolation::None, Fixed16::OPAQUE),
        }
    }
}

impl From<TrackSequence<Fixed16>> for M2TransparencyAnimation {
    fn from(alpha: TrackSequence<Fixed16>) -> Self {
        Self { alpha }
    }
}

impl TrackedRecord for M2TransparencyAnimation {
    type Header = TrackHeader<Fixed16>;
    const NAME: &'static str = "M2TransparencyAnimation";

    fn emit(&self, base: u32) -> WDResult<Emitted<TrackHeader<Fixed16>>> {
        self.alpha.emit(base)
    }
}
