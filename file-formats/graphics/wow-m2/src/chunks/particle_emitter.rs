use wow_data::error::Result as WDResult;
use wow_data::prelude::*;
use wow_data::utils::count_of;

use crate::common::Fixed16;

bitflags::bitflags! {
    /// Particle flags as defined in the M2 format
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
    pub struct M2ParticleFlags: u32 {
        /// Particles are affected by lighting
        const LIT = 0x00000001;
        /// Particles are billboarded
        const BILLBOARDED = 0x00000008;
        /// Particles stretch based on their velocity
        const AFFECTED_BY_VELOCITY = 0x00000010;
        /// Particles rotate around their central point
        const ROTATING = 0x00000020;
        /// Particles use random texture coordinate generation
        const RANDOMIZED = 0x00000040;
        /// Particles use tiling
        const TILED = 0x00000080;
        /// ModelParticleEmitterType::Plane should be treated as ModelParticleEmitterType::Sphere
        const SPHERE_AS_SOURCE = 0x00000100;
        /// The center of the sphere should be used as the source of the particles
        const USE_SPHERE_CENTER = 0x00000200;
        /// Use a Z-buffer test for particles
        const ZBUFFER_TEST = 0x00000800;
        /// Particles follow their emitter
        const FOLLOW_EMITTER = 0x00002000;
        /// Random spawn position
        const RANDOM_SPAWN_POSITION = 0x00020000;
    }
}

wow_bitflags!(M2ParticleFlags, u32);

/// Particle emitter type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum M2ParticleEmitterType {
    /// Point emitter (particles spawn from a single point)
    Point = 0,
    /// Plane emitter (particles spawn within a 2D plane)
    #[default]
    Plane = 1,
    /// Sphere emitter (particles spawn within a 3D sphere)
    Sphere = 2,
    /// Spline emitter (particles follow a spline path)
    Spline = 3,
}

/// Fixed part of a particle emitter record (476 bytes)
#[derive(Debug, Clone, PartialEq, WowDataW)]
pub struct M2ParticleEmitterHeader {
    pub id: i32,
    pub flags: M2ParticleFlags,
    pub position: C3Vector,
    pub bone: u16,
    pub texture: u16,
    pub geometry_model: WowArray<u8>,
    pub recursion_model: WowArray<u8>,
    pub blend_mode: u8,
    pub emitter_type: u8,
    pub color_index: u16,
    pub particle_type: u8,
    pub head_or_tail: u8,
    pub texture_tile_rotation: u16,
    pub texture_rows: u16,
    pub texture_columns: u16,
    pub emission_speed: TrackHeader<f32>,
    pub speed_variation: TrackHeader<f32>,
    pub vertical_range: TrackHeader<f32>,
    pub horizontal_range: TrackHeader<f32>,
    pub gravity: TrackHeader<f32>,
    pub lifespan: TrackHeader<f32>,
    pub lifespan_variation: f32,
    pub emission_rate: TrackHeader<f32>,
    pub emission_rate_variation: f32,
    pub emission_area_length: TrackHeader<f32>,
    pub emission_area_width: TrackHeader<f32>,
    pub z_source: TrackHeader<f32>,
    pub color: FBlockHeader<C3Vector>,
    pub alpha: FBlockHeader<Fixed16>,
    pub scale: FBlockHeader<C2Vector>,
    pub scale_variation: C2Vector,
    pub head_cell: FBlockHeader<u16>,
    pub tail_cell: FBlockHeader<u16>,
    pub tail_length: f32,
    pub twinkle_speed: f32,
    pub twinkle_percent: f32,
    pub twinkle_scale: [f32; 2],
    pub burst_multiplier: f32,
    pub drag: f32,
    pub base_spin: f32,
    pub base_spin_variation: f32,
    pub spin: f32,
    pub spin_variation: f32,
    pub tumble: BoundingBox,
    pub wind_vector: C3Vector,
    pub wind_time: f32,
    pub follow_speed1: f32,
    pub follow_scale1: f32,
    pub follow_speed2: f32,
    pub follow_scale2: f32,
    pub spline_points: WowArray<C3Vector>,
    pub enabled_in: TrackHeader<u8>,
}

/// Represents a particle emitter in an M2 model
///
/// Only the spawn, motion and appearance basics are driven by content; every other field
/// keeps the neutral value the client expects.
#[derive(Debug, Clone, PartialEq)]
pub struct M2ParticleEmitter {
    pub flags: M2ParticleFlags,
    /// Position relative to the bone
    pub position: C3Vector,
    /// Bone to attach the emitter to
    pub bone: u16,
    /// Index into the texture list
    pub texture: u16,
    /// Geometry model filename, empty for plain sprites
    pub geometry_model: String,
    pub blend_mode: u8,
    pub emitter_type: M2ParticleEmitterType,
    pub texture_rows: u16,
    pub texture_columns: u16,
    pub emission_speed: TrackSequence<f32>,
    pub speed_variation: TrackSequence<f32>,
    pub vertical_range: TrackSequence<f32>,
    pub horizontal_range: TrackSequence<f32>,
    pub gravity: TrackSequence<f32>,
    /// Particle life in seconds
    pub lifespan: TrackSequence<f32>,
    /// Particles spawned per second
    pub emission_rate: TrackSequence<f32>,
    pub emission_area_length: TrackSequence<f32>,
    pub emission_area_width: TrackSequence<f32>,
    pub z_source: TrackSequence<f32>,
    pub color: SimpleTrack<C3Vector>,
    pub alpha: SimpleTrack<Fixed16>,
    pub scale: SimpleTrack<C2Vector>,
    pub head_cell: SimpleTrack<u16>,
    pub tail_cell: SimpleTrack<u16>,
    pub twinkle_scale: [f32; 2],
    pub drag: f32,
    pub wind_vector: C3Vector,
    pub enabled_in: TrackSequence<u8>,
}

impl M2ParticleEmitter {
    pub fn new(bone: u16, texture: u16) -> Self {
        Self {
            flags: M2ParticleFlags::BILLBOARDED,
            position: C3Vector::origin(),
            bone,
            texture,
            geometry_model: String::new(),
            blend_mode: 4,
            emitter_type: M2ParticleEmitterType::Plane,
            texture_rows: 1,
            texture_columns: 1,
            emission_speed: TrackSequence::constant(Interpolation::Linear, 0.0),
            speed_variation: TrackSequence::constant(Interpolation::Linear, 0.0),
            vertical_range: TrackSequence::constant(Interpolation::Linear, 0.0),
            horizontal_range: TrackSequence::constant(Interpolation::Linear, 0.0),
            gravity: TrackSequence::constant(Interpolation::Linear, 0.0),
            lifespan: TrackSequence::constant(Interpolation::Linear, 1.0),
            emission_rate: TrackSequence::constant(Interpolation::Linear, 1.0),
            emission_area_length: TrackSequence::constant(Interpolation::Linear, 0.0),
            emission_area_width: TrackSequence::constant(Interpolation::Linear, 0.0),
            z_source: TrackSequence::constant(Interpolation::Linear, 0.0),
            color: SimpleTrack::constant(C3Vector::new(255.0, 255.0, 255.0)),
            alpha: SimpleTrack::constant(Fixed16::OPAQUE),
            scale: SimpleTrack::constant(C2Vector::new(1.0, 1.0)),
            head_cell: SimpleTrack::constant(0),
            tail_cell: SimpleTrack::constant(0),
            twinkle_scale: [1.0, 1.0],
            drag: 0.0,
            wind_vector: C3Vector::origin(),
            enabled_in: TrackSequence::constant(Interpolation::None, 1),
        }
    }
}

/// Appends a track emitted at the current end of `bytes`.
fn append<D>(
    bytes: &mut Vec<u8>,
    base: u32,
    emit: impl FnOnce(u32) -> WDResult<Emitted<D>>,
) -> WDResult<D> {
    let emitted = emit(offset_at(base, bytes.len())?)?;
    bytes.extend_from_slice(&emitted.bytes);
    Ok(emitted.descriptor)
}

impl TrackedRecord for M2ParticleEmitter {
    type Header = M2ParticleEmitterHeader;
    const NAME: &'static str = "M2ParticleEmitter";

    fn emit(&self, base: u32) -> WDResult<Emitted<M2ParticleEmitterHeader>> {
        let mut bytes = Vec::new();

        let geometry_model = if self.geometry_model.is_empty() {
            WowArray::default()
        } else {
            let offset = offset_at(base, bytes.len())?;
            bytes.extend_from_slice(self.geometry_model.as_bytes());
            bytes.push(0);
            let name = WowArray::new(count_of(self.geometry_model.len() + 1)?, offset);
            pad_to_alignment(&mut bytes, base, 16);
            name
        };

        let emission_speed = append(&mut bytes, base, |at| self.emission_speed.emit(at))?;
        let speed_variation = append(&mut bytes, base, |at| self.speed_variation.emit(at))?;
        let vertical_range = append(&mut bytes, base, |at| self.vertical_range.emit(at))?;
        let horizontal_range = append(&mut bytes, base, |at| self.horizontal_range.emit(at))?;
        let gravity = append(&mut bytes, base, |at| self.gravity.emit(at))?;
        let lifespan = append(&mut bytes, base, |at| self.lifespan.emit(at))?;
        let emission_rate = append(&mut bytes, base, |at| self.emission_rate.emit(at))?;
        let emission_area_length =
            append(&mut bytes, base, |at| self.emission_area_length.emit(at))?;
        let emission_area_width =
            append(&mut bytes, base, |at| self.emission_area_width.emit(at))?;
        let z_source = append(&mut bytes, base, |at| self.z_source.emit(at))?;
        let color = append(&mut bytes, base, |at| self.color.emit(at))?;
        let alpha = append(&mut bytes, base, |at| self.alpha.emit(at))?;
        let scale = append(&mut bytes, base, |at| self.scale.emit(at))?;
        let head_cell = append(&mut bytes, base, |at| self.head_cell.emit(at))?;
        let tail_cell = append(&mut bytes, base, |at| self.tail_cell.emit(at))?;
        let enabled_in = append(&mut bytes, base, |at| self.enabled_in.emit(at))?;

        Ok(Emitted::new(
            bytes,
            M2ParticleEmitterHeader {
                id: -1,
                flags: self.flags,
                position: self.position,
                bone: self.bone,
                texture: self.texture,
                geometry_model,
                recursion_model: WowArray::default(),
                blend_mode: self.blend_mode,
                emitter_type: self.emitter_type as u8,
                color_index: 0,
                particle_type: 0,
                head_or_tail: 0,
                texture_tile_rotation: 0,
                texture_rows: self.texture_rows,
                texture_columns: self.texture_columns,
                emission_speed,
                speed_variation,
                vertical_range,
                horizontal_range,
                gravity,
                lifespan,
                lifespan_variation: 0.0,
                emission_rate,
                emission_rate_variation: 0.0,
                emission_area_length,
                emission_area_width,
                z_source,
                color,
                alpha,
                scale,
                scale_variation: C2Vector::default(),
                head_cell,
                tail_cell,
                tail_length: 0.0,
                twinkle_speed: 0.0,
                twinkle_percent: 0.0,
                twinkle_scale: self.twinkle_scale,
                burst_multiplier: 1.0,
                drag: self.drag,
                base_spin: 0.0,
                base_spin_variation: 0.0,
                spin: 0.0,
                spin_variation: 0.0,
                tumble: BoundingBox::zero(),
                wind_vector: self.wind_vector,
                wind_time: 0.0,
                follow_speed1: 0.0,
                follow_scale1: 0.0,
                follow_speed2: 0.0,
                follow_scale2: 0.0,
                spline_points: WowArray::default(),
                enabled_in,
            },
        ))
    }
}
