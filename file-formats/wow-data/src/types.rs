use std::fmt;
use std::io::Write;
use std::marker::PhantomData;

use byteorder::{LittleEndian, WriteBytesExt};
use wow_data_derive::WowDataW;

use crate::error::Result;

/// Fixed-width little-endian encoding.
///
/// The encoded width is a property of the type, never of the value, so a parent can size
/// the region it reserves for a header before any of the data behind it exists.
pub trait WowDataW {
    /// Number of bytes `wow_write` produces for every value of this type
    const WOW_SIZE: usize;

    fn wow_write<W: Write>(&self, writer: &mut W) -> Result<()>;

    fn wow_size(&self) -> usize {
        Self::WOW_SIZE
    }

    fn wow_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(Self::WOW_SIZE);
        self.wow_write(&mut bytes)?;
        Ok(bytes)
    }
}

macro_rules! impl_wow_data_w_le {
    ($ty:ty, $method:ident) => {
        impl WowDataW for $ty {
            const WOW_SIZE: usize = size_of::<$ty>();

            fn wow_write<W: Write>(&self, writer: &mut W) -> Result<()> {
                writer.$method::<LittleEndian>(*self)?;
                Ok(())
            }
        }
    };
}

impl_wow_data_w_le!(u16, write_u16);
impl_wow_data_w_le!(i16, write_i16);
impl_wow_data_w_le!(u32, write_u32);
impl_wow_data_w_le!(i32, write_i32);
impl_wow_data_w_le!(f32, write_f32);

impl WowDataW for u8 {
    const WOW_SIZE: usize = 1;

    fn wow_write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u8(*self)?;
        Ok(())
    }
}

impl WowDataW for i8 {
    const WOW_SIZE: usize = 1;

    fn wow_write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_i8(*self)?;
        Ok(())
    }
}

impl<T: WowDataW, const N: usize> WowDataW for [T; N] {
    const WOW_SIZE: usize = T::WOW_SIZE * N;

    fn wow_write<W: Write>(&self, writer: &mut W) -> Result<()> {
        for item in self {
            item.wow_write(writer)?;
        }
        Ok(())
    }
}

/// Count and absolute byte offset of a block referenced from a fixed header.
///
/// A zero count always pairs with a zero offset.
pub struct WowArray<T> {
    pub count: u32,
    pub offset: u32,
    _phantom: PhantomData<T>,
}

impl<T> WowArray<T> {
    pub const fn new(count: u32, offset: u32) -> Self {
        Self {
            count,
            offset,
            _phantom: PhantomData,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Reinterprets the descriptor as pointing at a different element type.
    pub const fn cast<U>(self) -> WowArray<U> {
        WowArray::new(self.count, self.offset)
    }
}

impl<T> Clone for WowArray<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for WowArray<T> {}

impl<T> Default for WowArray<T> {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl<T> PartialEq for WowArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.count == other.count && self.offset == other.offset
    }
}

impl<T> Eq for WowArray<T> {}

impl<T> fmt::Debug for WowArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WowArray")
            .field("count", &self.count)
            .field("offset", &self.offset)
            .finish()
    }
}

impl<T> WowDataW for WowArray<T> {
    const WOW_SIZE: usize = 8;

    fn wow_write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32::<LittleEndian>(self.count)?;
        writer.write_u32::<LittleEndian>(self.offset)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, WowDataW)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct C3Vector {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl C3Vector {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn to_glam(&self) -> glam::Vec3 {
        glam::Vec3::new(self.x, self.y, self.z)
    }

    pub fn from_glam(v: glam::Vec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }

    pub const fn origin() -> Self {
        Self::new(0., 0., 0.)
    }

    pub const fn one() -> Self {
        Self::new(1., 1., 1.)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, WowDataW)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct C2Vector {
    pub x: f32,
    pub y: f32,
}

impl C2Vector {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn to_glam(&self) -> glam::Vec2 {
        glam::Vec2::new(self.x, self.y)
    }

    pub fn from_glam(v: glam::Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, WowDataW)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    pub min: C3Vector,
    pub max: C3Vector,
}

impl BoundingBox {
    pub const fn new(min: C3Vector, max: C3Vector) -> Self {
        Self { min, max }
    }

    pub const fn zero() -> Self {
        Self::new(C3Vector::origin(), C3Vector::origin())
    }

    /// Smallest box holding every point, or a zero box for no points.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a C3Vector>) -> Self {
        let mut points = points.into_iter();
        let Some(first) = points.next() else {
            return Self::zero();
        };
        let (min, max) = points.fold((first.to_glam(), first.to_glam()), |(min, max), p| {
            (min.min(p.to_glam()), max.max(p.to_glam()))
        });
        Self::new(C3Vector::from_glam(min), C3Vector::from_glam(max))
    }

    pub fn center(&self) -> C3Vector {
        C3Vector::from_glam((self.min.to_glam() + self.max.to_glam()) * 0.5)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, WowDataW)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quaternion {
    pub const fn identity() -> Self {
        Self {
            x: 0.,
            y: 0.,
            z: 0.,
            w: 1.,
        }
    }

    pub fn to_glam(&self) -> glam::Quat {
        glam::Quat::from_xyzw(self.x, self.y, self.z, self.w)
    }

    pub fn from_glam(q: glam::Quat) -> Self {
        Self {
            x: q.x,
            y: q.y,
            z: q.z,
            w: q.w,
        }
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::identity()
    }
}

#[inline]
pub fn u16_to_f32(value: u16) -> f32 {
    (value as f32 / i16::MAX as f32) - 1.0
}

#[inline]
pub fn f32_to_u16(value: f32) -> u16 {
    ((value.clamp(-1.0, 1.0) + 1.0) * i16::MAX as f32).round() as u16
}

impl From<Quaternion16> for Quaternion {
    fn from(value: Quaternion16) -> Self {
        Self {
            x: u16_to_f32(value.x),
            y: u16_to_f32(value.y),
            z: u16_to_f32(value.z),
            w: u16_to_f32(value.w),
        }
    }
}

/// Packed rotation used by bone tracks, each component stored as `(c + 1) * 32767`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WowDataW)]
pub struct Quaternion16 {
    pub x: u16,
    pub y: u16,
    pub z: u16,
    pub w: u16,
}

impl From<Quaternion> for Quaternion16 {
    fn from(value: Quaternion) -> Self {
        Self {
            x: f32_to_u16(value.x),
            y: f32_to_u16(value.y),
            z: f32_to_u16(value.z),
            w: f32_to_u16(value.w),
        }
    }
}

impl Default for Quaternion16 {
    fn default() -> Self {
        Quaternion::identity().into()
    }
}

/// Byte color stored blue, green, red, alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, WowDataW)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CImVector {
    pub b: u8,
    pub g: u8,
    pub r: u8,
    pub a: u8,
}

impl CImVector {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { b, g, r, a }
    }
}

/// Implements [`WowDataW`] for a `bitflags` type by writing its raw bits.
#[macro_export]
macro_rules! wow_bitflags {
    ($ty:ty, $bits:ty) => {
        impl $crate::types::WowDataW for $ty {
            const WOW_SIZE: usize = <$bits as $crate::types::WowDataW>::WOW_SIZE;

            fn wow_write<W: ::std::io::Write>(&self, writer: &mut W) -> $crate::error::Result<()> {
                <$bits as $crate::types::WowDataW>::wow_write(&self.bits(), writer)
            }
        }
    };
}
