use binrw::BinWrite;

/// Represents a 3D vector
#[derive(Debug, Clone, Copy, PartialEq, Default, BinWrite)]
#[bw(little)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

/// Represents a bounding box defined by min and max points
#[derive(Debug, Clone, Copy, PartialEq, Default, BinWrite)]
#[bw(little)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point, or `None` for no points
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = *points.next()?;
        Some(points.fold(Self::new(first, first), |mut bounds, p| {
            bounds.min.x = bounds.min.x.min(p.x);
            bounds.min.y = bounds.min.y.min(p.y);
            bounds.min.z = bounds.min.z.min(p.z);
            bounds.max.x = bounds.max.x.max(p.x);
            bounds.max.y = bounds.max.y.max(p.y);
            bounds.max.z = bounds.max.z.max(p.z);
            bounds
        }))
    }

    /// Six `i16` values, each rounded away from zero so the box never shrinks
    pub fn to_low_res(&self) -> [i16; 6] {
        fn round_out(v: f32) -> i16 {
            let rounded = if v >= 0.0 { v.ceil() } else { v.floor() };
            // Float to int casts saturate
            rounded as i16
        }

        [
            round_out(self.min.x),
            round_out(self.min.y),
            round_out(self.min.z),
            round_out(self.max.x),
            round_out(self.max.y),
            round_out(self.max.z),
        ]
    }
}

/// Represents a color, stored on disk as BGRA (`CImVector`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, BinWrite)]
#[bw(little)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub b: u8,
    pub g: u8,
    pub r: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgba(255, 255, 255, 255);
    pub const BLACK: Self = Self::rgba(0, 0, 0, 255);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { b, g, r, a }
    }
}

/// Rotation quaternion, written as x, y, z, w
#[derive(Debug, Clone, Copy, PartialEq, BinWrite)]
#[bw(little)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quat {
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Texture coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, BinWrite)]
#[bw(little)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct TexCoord {
    pub u: f32,
    pub v: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use binrw::BinWrite;
    use std::io::Cursor;

    fn bytes_of<T: for<'a> BinWrite<Args<'a> = ()>>(value: &T) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        value.write_le(&mut cursor).unwrap();
        cursor.into_inner()
    }

    #[test]
    fn test_color_is_bgra() {
        assert_eq!(bytes_of(&Color::rgba(1, 2, 3, 4)), [3, 2, 1, 4]);
    }

    #[test]
    fn test_bounding_box_layout() {
        let bounds = BoundingBox::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0));
        let bytes = bytes_of(&bounds);
        assert_eq!(bytes.len(), 24);
        assert_eq!(&bytes[20..24], &6.0f32.to_le_bytes());
    }

    #[test]
    fn test_low_res_rounds_away_from_zero() {
        let bounds = BoundingBox::new(Vec3::new(-1.2, 0.0, 2.0), Vec3::new(3.1, -0.5, 1e9));
        assert_eq!(bounds.to_low_res(), [-2, 0, 2, 4, -1, i16::MAX]);
    }

    #[test]
    fn test_from_points() {
        let points = [Vec3::new(1.0, -1.0, 0.0), Vec3::new(-2.0, 3.0, 5.0)];
        let bounds = BoundingBox::from_points(&points).unwrap();
        assert_eq!(bounds.min, Vec3::new(-2.0, -1.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(1.0, 3.0, 5.0));
        assert!(BoundingBox::from_points(&[]).is_none());
    }
}
