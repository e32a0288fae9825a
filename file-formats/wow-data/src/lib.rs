extern crate self as wow_data;

pub mod array;
pub mod error;
pub mod track;
pub mod types;
pub mod utils;

pub mod prelude {
    pub use crate::array::{Emitted, HeaderBlock, OffsetArray, TrackedRecord};
    pub use crate::error::{Result, WowDataError};
    pub use crate::track::{
        FBlockHeader, Interpolation, SimpleTrack, TrackHeader, TrackKeys, TrackSequence,
    };
    pub use crate::types::{
        BoundingBox, C2Vector, C3Vector, CImVector, Quaternion, Quaternion16, WowArray, WowDataW,
    };
    pub use crate::utils::{offset_at, pad_to_alignment};
    pub use crate::wow_bitflags;
    pub use wow_data_derive::WowDataW;
}
