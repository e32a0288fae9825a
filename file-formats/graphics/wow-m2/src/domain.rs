//! In-memory description of one model, as handed over by the ingestion layer.
//!
//! Everything here is already in final order: the assembler never reorders a collection,
//! it only validates cross references and lays the collections out on disk.

use std::collections::BTreeMap;

use wow_data::prelude::*;

use crate::chunks::{
    M2AttachmentId, M2BoneFlags, M2Color, M2Material, M2ParticleFlags, M2Sequence,
    M2TextureAnimation, M2TextureFlags, M2Vertex,
};
use crate::common::Fixed16;
use crate::error::{M2Error, Result};
use crate::header::M2ModelFlags;

/// Whether a model carries a real skeleton or a single static root bone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub enum ModelType {
    /// Doodads and other rigid objects
    #[default]
    Static,
    /// Creatures with key bones, attachments and a portrait camera
    Skeletal,
}

/// A bone with full-precision rotations; compressed on emit
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-support", serde(default))]
pub struct ModelBone {
    pub key_bone_id: i32,
    pub flags: M2BoneFlags,
    pub parent_bone: i16,
    pub pivot: C3Vector,
    pub translation: TrackSequence<C3Vector>,
    pub rotation: TrackSequence<Quaternion>,
    pub scale: TrackSequence<C3Vector>,
}

impl Default for ModelBone {
    fn default() -> Self {
        Self {
            key_bone_id: -1,
            flags: M2BoneFlags::empty(),
            parent_bone: -1,
            pivot: C3Vector::origin(),
            translation: TrackSequence::new(Interpolation::Linear),
            rotation: TrackSequence::new(Interpolation::Linear),
            scale: TrackSequence::new(Interpolation::Linear),
        }
    }
}

/// One render triangle and the material it is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelTriangle {
    /// Indices into the model's vertex list
    pub vertices: [u16; 3],
    /// Index into the model's material list
    pub material: u16,
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-support", serde(default))]
pub struct ModelTexture {
    /// Bare texture name without folder or extension
    pub name: String,
    pub flags: M2TextureFlags,
}

/// Where the portrait camera looks from and at
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-support", serde(default))]
pub struct ModelCamera {
    pub position: C3Vector,
    pub target: C3Vector,
}

/// The handful of emitter properties the converter fills in
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-support", serde(default))]
pub struct ModelParticleEmitter {
    pub bone: u16,
    pub texture: u16,
    pub position: C3Vector,
    pub flags: M2ParticleFlags,
    pub emission_speed: f32,
    /// Particle size, applied to both axes
    pub scale: f32,
    /// Particles per second
    pub spawn_rate: f32,
    pub gravity: f32,
    /// Seconds
    pub lifespan: f32,
}

impl Default for ModelParticleEmitter {
    fn default() -> Self {
        Self {
            bone: 0,
            texture: 0,
            position: C3Vector::origin(),
            flags: M2ParticleFlags::BILLBOARDED,
            emission_speed: 0.0,
            scale: 1.0,
            spawn_rate: 1.0,
            gravity: 0.0,
            lifespan: 1.0,
        }
    }
}

/// A complete model ready for assembly
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-support", serde(default))]
pub struct ObjectModel {
    /// Base name of the written files
    pub name: String,
    pub model_type: ModelType,
    pub flags: M2ModelFlags,
    /// Loop lengths in milliseconds
    pub global_loops: Vec<u32>,
    pub sequences: Vec<M2Sequence>,
    /// Animation id to sequence index, -1 when the animation is missing
    pub sequence_lookup: Vec<i16>,
    pub bones: Vec<ModelBone>,
    pub key_bone_lookup: Vec<i16>,
    pub vertices: Vec<M2Vertex>,
    pub triangles: Vec<ModelTriangle>,
    /// Vertex color animations
    pub colors: Vec<M2Color>,
    pub textures: Vec<ModelTexture>,
    /// Texture weight tracks, one per transparency lookup target
    pub texture_transparencies: Vec<TrackSequence<Fixed16>>,
    pub texture_animations: Vec<M2TextureAnimation>,
    pub replaceable_texture_lookup: Vec<i16>,
    pub materials: Vec<M2Material>,
    /// Bones each material is skinned to
    pub bone_lookups_by_material: BTreeMap<u16, Vec<i16>>,
    pub texture_lookup: Vec<i16>,
    pub texture_mapping_lookup: Vec<i16>,
    pub transparency_lookup: Vec<i16>,
    pub texture_animation_lookup: Vec<i16>,
    pub bounding_box: BoundingBox,
    pub bounding_radius: f32,
    pub collision_box: BoundingBox,
    pub collision_radius: f32,
    pub collision_triangles: Vec<[u16; 3]>,
    pub collision_positions: Vec<C3Vector>,
    pub collision_normals: Vec<C3Vector>,
    /// Bone carrying each attachment point; bone 0 when absent
    pub attachment_bones: BTreeMap<M2AttachmentId, u16>,
    /// Bone carrying each event, keyed by event tag; bone 0 when absent
    pub event_bones: BTreeMap<String, u16>,
    /// Sound id of the idle loop
    pub idle_sound: Option<u32>,
    /// Emit the death, combat, fidget and footstep events
    pub combat_events: bool,
    pub camera: ModelCamera,
    pub particle_emitters: Vec<ModelParticleEmitter>,
    /// Second-texture blend mode combos, written only with `BLEND_MODE_OVERRIDES`
    pub blend_mode_overrides: Vec<u16>,
}

fn check_index(kind: &str, index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(M2Error::ReferenceError(format!(
            "{kind} index {index} out of range (have {len})"
        )))
    }
}

/// Lookup tables use -1 for "nothing"; any other negative value is a defect.
fn check_lookup(kind: &str, lookup: &[i16], len: usize) -> Result<()> {
    for &entry in lookup {
        if entry == -1 {
            continue;
        }
        let index = usize::try_from(entry).map_err(|_| {
            M2Error::ReferenceError(format!("{kind} lookup holds invalid entry {entry}"))
        })?;
        check_index(kind, index, len)?;
    }
    Ok(())
}

impl ObjectModel {
    pub fn is_skeletal(&self) -> bool {
        self.model_type == ModelType::Skeletal
    }

    /// Bone an attachment hangs from
    pub fn attachment_bone(&self, id: M2AttachmentId) -> u16 {
        self.attachment_bones.get(&id).copied().unwrap_or(0)
    }

    /// Bone an event fires from
    pub fn event_bone(&self, tag: &str) -> u16 {
        self.event_bones.get(tag).copied().unwrap_or(0)
    }

    /// Sequence index playing `animation_id`, if the model has that animation
    pub fn sequence_for_animation(&self, animation_id: u16) -> Option<usize> {
        self.sequence_lookup
            .get(usize::from(animation_id))
            .and_then(|&index| usize::try_from(index).ok())
    }

    /// Checks every cross reference before anything is emitted.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(M2Error::ValidationError("model has no name".into()));
        }
        if !self.name.is_ascii() {
            return Err(M2Error::ValidationError(format!(
                "model name '{}' is not ASCII",
                self.name
            )));
        }
        if self.bones.is_empty() {
            return Err(M2Error::ValidationError(format!(
                "model '{}' has no skeleton",
                self.name
            )));
        }

        let bone_count = self.bones.len();
        for bone in &self.bones {
            if bone.parent_bone != -1 {
                check_lookup("parent bone", &[bone.parent_bone], bone_count)?;
            }
        }
        for vertex in &self.vertices {
            for (&bone, &weight) in vertex.bone_indices.iter().zip(&vertex.bone_weights) {
                if weight > 0 {
                    check_index("vertex bone", usize::from(bone), bone_count)?;
                }
            }
        }
        for triangle in &self.triangles {
            for &vertex in &triangle.vertices {
                check_index("triangle vertex", usize::from(vertex), self.vertices.len())?;
            }
            check_index(
                "triangle material",
                usize::from(triangle.material),
                self.materials.len(),
            )?;
        }

        check_lookup("sequence", &self.sequence_lookup, self.sequences.len())?;
        check_lookup("key bone", &self.key_bone_lookup, bone_count)?;
        check_lookup("texture", &self.texture_lookup, self.textures.len())?;
        check_lookup(
            "replaceable texture",
            &self.replaceable_texture_lookup,
            self.textures.len(),
        )?;
        check_lookup(
            "transparency",
            &self.transparency_lookup,
            self.texture_transparencies.len(),
        )?;
        check_lookup(
            "texture animation",
            &self.texture_animation_lookup,
            self.texture_animations.len(),
        )?;
        for (&material, bones) in &self.bone_lookups_by_material {
            check_index("bone lookup material", usize::from(material), self.materials.len())?;
            check_lookup("bone lookup", bones, bone_count)?;
        }

        for &bone in self.attachment_bones.values() {
            check_index("attachment bone", usize::from(bone), bone_count)?;
        }
        for &bone in self.event_bones.values() {
            check_index("event bone", usize::from(bone), bone_count)?;
        }
        for emitter in &self.particle_emitters {
            check_index("particle bone", usize::from(emitter.bone), bone_count)?;
            check_index(
                "particle texture",
                usize::from(emitter.texture),
                self.textures.len(),
            )?;
        }
        for triangle in &self.collision_triangles {
            for &vertex in triangle {
                check_index(
                    "collision vertex",
                    usize::from(vertex),
                    self.collision_positions.len(),
                )?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> ObjectModel {
        ObjectModel {
            name: "Crate".into(),
            bones: vec![ModelBone::default()],
            ..Default::default()
        }
    }

    #[test]
    fn test_minimal_model_is_valid() {
        assert!(minimal().validate().is_ok());
    }

    #[test]
    fn test_missing_name_or_skeleton() {
        let mut model = minimal();
        model.name.clear();
        assert!(matches!(model.validate(), Err(M2Error::ValidationError(_))));

        let mut model = minimal();
        model.bones.clear();
        assert!(matches!(model.validate(), Err(M2Error::ValidationError(_))));
    }

    #[test]
    fn test_out_of_range_references() {
        let mut model = minimal();
        model.triangles.push(ModelTriangle {
            vertices: [0, 1, 2],
            material: 0,
        });
        assert!(matches!(model.validate(), Err(M2Error::ReferenceError(_))));

        let mut model = minimal();
        model.texture_lookup = vec![0];
        assert!(matches!(model.validate(), Err(M2Error::ReferenceError(_))));

        let mut model = minimal();
        model.sequence_lookup = vec![-1, -1];
        assert!(model.validate().is_ok());
        model.sequence_lookup = vec![-2];
        assert!(matches!(model.validate(), Err(M2Error::ReferenceError(_))));
    }

    #[test]
    fn test_sequence_for_animation() {
        let mut model = minimal();
        model.sequences = vec![M2Sequence::default(), M2Sequence::default()];
        model.sequence_lookup = vec![0, -1, 1];
        assert_eq!(model.sequence_for_animation(0), Some(0));
        assert_eq!(model.sequence_for_animation(1), None);
        assert_eq!(model.sequence_for_animation(2), Some(1));
        assert_eq!(model.sequence_for_animation(40), None);
    }
}
