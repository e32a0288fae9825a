use wow_data::error::Result as WDResult;
use wow_data::prelude::*;

use crate::common::SplineKey;

/// Camera types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum M2CameraType {
    /// Character-sheet portrait
    #[default]
    Portrait = 0,
    /// Character info panel
    CharacterInfo = 1,
}

/// Fixed part of a camera record (100 bytes)
#[derive(Debug, Clone, PartialEq, WowDataW)]
pub struct M2CameraHeader {
    pub camera_type: u32,
    pub diagonal_fov: f32,
    pub far_clip: f32,
    pub near_clip: f32,
    pub positions: TrackHeader<SplineKey<C3Vector>>,
    pub position_base: C3Vector,
    pub target_positions: TrackHeader<SplineKey<C3Vector>>,
    pub target_position_base: C3Vector,
    pub roll: TrackHeader<f32>,
}

/// Represents a camera in an M2 model
#[derive(Debug, Clone, PartialEq)]
pub struct M2Camera {
    pub camera_type: M2CameraType,
    pub diagonal_fov: f32,
    pub far_clip: f32,
    pub near_clip: f32,
    pub positions: TrackSequence<SplineKey<C3Vector>>,
    pub position_base: C3Vector,
    pub target_positions: TrackSequence<SplineKey<C3Vector>>,
    pub target_position_base: C3Vector,
    pub roll: TrackSequence<f32>,
}

impl M2Camera {
    pub const PORTRAIT_FOV: f32 = 0.950_022;
    pub const PORTRAIT_FAR_CLIP: f32 = 27.777_78;
    pub const PORTRAIT_NEAR_CLIP: f32 = 0.222_222_2;

    /// Portrait camera looking from `position` at `target`, with one static key per track
    pub fn portrait(position: C3Vector, target: C3Vector) -> Self {
        let still = SplineKey::flat(C3Vector::origin());
        Self {
            camera_type: M2CameraType::Portrait,
            diagonal_fov: Self::PORTRAIT_FOV,
            far_clip: Self::PORTRAIT_FAR_CLIP,
            near_clip: Self::PORTRAIT_NEAR_CLIP,
            positions: TrackSequence::constant(Interpolation::None, still),
            position_base: position,
            target_positions: TrackSequence::constant(Interpolation::None, still),
            target_position_base: target,
            roll: TrackSequence::constant(Interpolation::None, 0.0),
        }
    }
}

impl TrackedRecord for M2Camera {
    type Header = M2CameraHeader;
    const NAME: &'static str = "M2Camera";

    fn emit(&self, base: u32) -> WDResult<Emitted<M2CameraHeader>> {
        let mut bytes = Vec::new();

        let positions = self.positions.emit(base)?;
        bytes.extend_from_slice(&positions.bytes);
        let target_positions = self.target_positions.emit(offset_at(base, bytes.len())?)?;
        bytes.extend_from_slice(&target_positions.bytes);
        let roll = self.roll.emit(offset_at(base, bytes.len())?)?;
        bytes.extend_from_slice(&roll.bytes);

        Ok(Emitted::new(
            bytes,
            M2CameraHeader {
                camera_type: self.camera_type as u32,
                diagonal_fov: self.diagonal_fov,
                far_clip: self.far_clip,
                near_clip: self.near_clip,
                positions: positions.descriptor,
                position_base: self.position_base,
                target_positions: target_positions.descriptor,
                target_position_base: self.target_position_base,
                roll: roll.descriptor,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_camera_header_size() {
        assert_eq!(M2CameraHeader::WOW_SIZE, 100);
    }

    #[test]
    fn test_portrait_camera_emit() {
        let camera = M2Camera::portrait(C3Vector::new(3.0, 0.0, 1.5), C3Vector::origin());
        let emitted = camera.emit(0).unwrap();

        let header = emitted.descriptor.wow_bytes().unwrap();
        assert_eq!(header[..4], [0, 0, 0, 0]);
        assert_eq!(header[4..8], 0.950_022_f32.to_le_bytes());

        // 16 descriptor bytes + 16 timestamp + 48 for one 36-byte spline key
        assert_eq!(emitted.descriptor.positions.timestamps, WowArray::new(1, 0));
        assert_eq!(emitted.descriptor.target_positions.timestamps, WowArray::new(1, 80));
        assert_eq!(emitted.descriptor.roll.timestamps, WowArray::new(1, 160));
        assert_eq!(emitted.len(), 160 + 48);
    }
}
