use std::io::Write;

use wow_data::error::Result as WDResult;
use wow_data::prelude::*;
use wow_data::utils::count_of;

/// Fixed-point value in `[-1, 1]` stored as an `i16`, used for alpha tracks.
///
/// `32767` is fully opaque, `0` fully transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct Fixed16(pub i16);

impl Fixed16 {
    pub const OPAQUE: Self = Self(i16::MAX);
    pub const TRANSPARENT: Self = Self(0);

    /// Converts an alpha in `[0, 1]` to its fixed-point form.
    pub fn from_alpha(alpha: f32) -> Self {
        Self((alpha.clamp(0.0, 1.0) * i16::MAX as f32).round() as i16)
    }

    pub fn to_alpha(self) -> f32 {
        self.0 as f32 / i16::MAX as f32
    }
}

impl WowDataW for Fixed16 {
    const WOW_SIZE: usize = 2;

    fn wow_write<W: Write>(&self, writer: &mut W) -> WDResult<()> {
        self.0.wow_write(writer)
    }
}

/// Key value with its in and out tangents, used by camera tracks.
#[derive(Debug, Clone, Copy, PartialEq, Default, WowDataW)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct SplineKey<T: WowDataW> {
    pub value: T,
    pub in_tan: T,
    pub out_tan: T,
}

impl<T: WowDataW + Copy> SplineKey<T> {
    /// A key whose tangents equal its value.
    pub fn flat(value: T) -> Self {
        Self {
            value,
            in_tan: value,
            out_tan: value,
        }
    }
}

/// Emits a NUL-terminated ASCII string; the count includes the terminator.
///
/// An empty string still writes its terminator.
pub fn emit_string(value: &str, base: u32) -> WDResult<Emitted<WowArray<u8>>> {
    let mut bytes = Vec::with_capacity(value.len() + 1);
    bytes.extend_from_slice(value.as_bytes());
    bytes.push(0);
    let count = count_of(bytes.len())?;
    Ok(Emitted::new(bytes, WowArray::new(count, base)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fixed16_alpha() {
        assert_eq!(Fixed16::from_alpha(1.0), Fixed16::OPAQUE);
        assert_eq!(Fixed16::from_alpha(-3.0), Fixed16::TRANSPARENT);
        assert_eq!(Fixed16::from_alpha(0.5), Fixed16(16384));
        assert_eq!(Fixed16::OPAQUE.wow_bytes().unwrap(), [0xFF, 0x7F]);
    }

    #[test]
    fn test_spline_key_size() {
        assert_eq!(SplineKey::<C3Vector>::WOW_SIZE, 36);
        assert_eq!(SplineKey::<f32>::WOW_SIZE, 12);
    }

    #[test]
    fn test_emit_string() {
        let emitted = emit_string("Orc", 0x130).unwrap();
        assert_eq!(emitted.descriptor, WowArray::new(4, 0x130));
        assert_eq!(emitted.bytes, b"Orc\0");
    }
}
