use std::fs;
use std::path::{Path, PathBuf};

use wow_data::error::Result as WDResult;
use wow_data::prelude::*;

use crate::chunks::event::tags;
use crate::chunks::sequence::animation_ids;
use crate::chunks::{
    M2Attachment, M2AttachmentId, M2Bone, M2Camera, M2Color, M2Event, M2Material,
    M2ParticleEmitter, M2Sequence, M2Texture, M2TextureAnimation, M2TransparencyAnimation,
    M2Vertex,
};
use crate::common::emit_string;
use crate::domain::{ModelBone, ModelParticleEmitter, ObjectModel};
use crate::error::{M2Error, Result};
use crate::header::{M2Header, M2ModelFlags};
use crate::skin::Skin;

/// Default in-game folder for creature textures
pub const DEFAULT_TEXTURE_FOLDER: &str = "CREATURE\\EVERQUEST";

/// Options controlling how a model is laid out on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct M2WriteOptions {
    /// In-game folder prefixed to every texture name
    pub texture_folder: String,
}

impl Default for M2WriteOptions {
    fn default() -> Self {
        Self {
            texture_folder: DEFAULT_TEXTURE_FOLDER.to_string(),
        }
    }
}

/// Appends sections to the model buffer, each followed by 16-byte alignment.
struct SectionWriter {
    bytes: Vec<u8>,
}

impl SectionWriter {
    fn new(reserved: usize) -> Self {
        Self {
            bytes: vec![0u8; reserved],
        }
    }

    fn section<D>(
        &mut self,
        name: &str,
        emit: impl FnOnce(u32) -> WDResult<Emitted<D>>,
    ) -> Result<D> {
        let base = offset_at(0, self.bytes.len())?;
        let emitted = emit(base)?;
        log::debug!("{name}: {} bytes at {base:#x}", emitted.len());
        self.bytes.extend_from_slice(&emitted.bytes);
        pad_to_alignment(&mut self.bytes, 0, 16);
        Ok(emitted.descriptor)
    }
}

/// A model with every section collected in file order
///
/// Built once from an [`ObjectModel`]; emitting it never changes it.
#[derive(Debug, Clone, PartialEq)]
pub struct M2Model {
    pub name: String,
    pub flags: M2ModelFlags,
    pub global_loops: OffsetArray<u32>,
    pub sequences: OffsetArray<M2Sequence>,
    pub sequence_lookup: OffsetArray<i16>,
    pub bones: OffsetArray<M2Bone>,
    pub key_bone_lookup: OffsetArray<i16>,
    pub vertices: OffsetArray<M2Vertex>,
    pub colors: OffsetArray<M2Color>,
    pub textures: OffsetArray<M2Texture>,
    pub texture_weights: OffsetArray<M2TransparencyAnimation>,
    pub texture_transforms: OffsetArray<M2TextureAnimation>,
    pub replaceable_texture_lookup: OffsetArray<i16>,
    pub materials: OffsetArray<M2Material>,
    pub bone_lookup: OffsetArray<i16>,
    pub texture_lookup: OffsetArray<i16>,
    pub texture_unit_lookup: OffsetArray<i16>,
    pub transparency_lookup: OffsetArray<i16>,
    pub texture_transform_lookup: OffsetArray<i16>,
    pub bounding_box: BoundingBox,
    pub bounding_sphere_radius: f32,
    pub collision_box: BoundingBox,
    pub collision_sphere_radius: f32,
    pub collision_indices: OffsetArray<u16>,
    pub collision_positions: OffsetArray<C3Vector>,
    pub collision_normals: OffsetArray<C3Vector>,
    pub attachments: OffsetArray<M2Attachment>,
    pub attachment_lookup: OffsetArray<i16>,
    pub events: OffsetArray<M2Event>,
    pub cameras: OffsetArray<M2Camera>,
    pub camera_lookup: OffsetArray<i16>,
    pub particle_emitters: OffsetArray<M2ParticleEmitter>,
    pub blend_mode_overrides: OffsetArray<u16>,
    pub skin: Skin,
}

impl M2Model {
    /// Validates the model and collects every section.
    pub fn from_object_model(model: &ObjectModel, options: &M2WriteOptions) -> Result<Self> {
        model.validate()?;

        let (attachments, attachment_lookup) = build_attachments(model)?;
        let mut cameras = OffsetArray::new();
        let mut camera_lookup = OffsetArray::new();
        if model.is_skeletal() {
            cameras.push(M2Camera::portrait(model.camera.position, model.camera.target));
            camera_lookup.push(0);
        }

        Ok(Self {
            name: model.name.clone(),
            flags: model.flags,
            global_loops: model.global_loops.clone().into(),
            sequences: model.sequences.clone().into(),
            sequence_lookup: model.sequence_lookup.clone().into(),
            bones: model.bones.iter().map(convert_bone).collect(),
            key_bone_lookup: model.key_bone_lookup.clone().into(),
            vertices: model.vertices.clone().into(),
            colors: model.colors.clone().into(),
            textures: model
                .textures
                .iter()
                .map(|texture| {
                    M2Texture::in_folder(&options.texture_folder, &texture.name, texture.flags)
                })
                .collect(),
            texture_weights: model
                .texture_transparencies
                .iter()
                .cloned()
                .map(M2TransparencyAnimation::from)
                .collect(),
            texture_transforms: model.texture_animations.clone().into(),
            replaceable_texture_lookup: model.replaceable_texture_lookup.clone().into(),
            materials: model.materials.clone().into(),
            bone_lookup: build_bone_lookup(model),
            texture_lookup: model.texture_lookup.clone().into(),
            texture_unit_lookup: model.texture_mapping_lookup.clone().into(),
            transparency_lookup: model.transparency_lookup.clone().into(),
            texture_transform_lookup: model.texture_animation_lookup.clone().into(),
            bounding_box: model.bounding_box,
            bounding_sphere_radius: model.bounding_radius,
            collision_box: model.collision_box,
            collision_sphere_radius: model.collision_radius,
            collision_indices: model.collision_triangles.iter().flatten().copied().collect(),
            collision_positions: model.collision_positions.clone().into(),
            collision_normals: model.collision_normals.clone().into(),
            attachments,
            attachment_lookup,
            events: build_events(model)?,
            cameras,
            camera_lookup,
            particle_emitters: model.particle_emitters.iter().map(convert_emitter).collect(),
            blend_mode_overrides: model.blend_mode_overrides.clone().into(),
            skin: Skin::build(model)?,
        })
    }

    /// Renders the whole model file: reserve the header, append each section, backfill.
    pub fn emit(&self) -> Result<Emitted<M2Header>> {
        let mut writer = SectionWriter::new(M2Header::reserved_size(self.flags));
        let mut header = M2Header::new(self.flags);

        header.name = writer.section("name", |base| emit_string(&self.name, base))?;
        header.global_loops = writer.section("global loops", |base| self.global_loops.emit(base))?;
        header.sequences = writer.section("sequences", |base| self.sequences.emit(base))?;
        header.sequence_lookup =
            writer.section("sequence lookup", |base| self.sequence_lookup.emit(base))?;
        header.bones = writer.section("bones", |base| {
            self.bones.emit_records(base, HeaderBlock::Aligned)
        })?;
        header.key_bone_lookup =
            writer.section("key bone lookup", |base| self.key_bone_lookup.emit(base))?;
        header.vertices = writer.section("vertices", |base| self.vertices.emit(base))?;
        header.colors = writer.section("colors", |base| {
            self.colors.emit_records(base, HeaderBlock::Aligned)
        })?;
        header.textures = writer.section("textures", |base| {
            self.textures.emit_records(base, HeaderBlock::Packed)
        })?;
        header.texture_weights = writer.section("texture weights", |base| {
            self.texture_weights.emit_records(base, HeaderBlock::Aligned)
        })?;
        header.texture_transforms = writer.section("texture transforms", |base| {
            self.texture_transforms.emit_records(base, HeaderBlock::Packed)
        })?;
        header.replaceable_texture_lookup = writer.section("replaceable texture lookup", |base| {
            self.replaceable_texture_lookup.emit(base)
        })?;
        header.materials = writer.section("materials", |base| self.materials.emit(base))?;
        header.bone_lookup = writer.section("bone lookup", |base| self.bone_lookup.emit(base))?;
        header.texture_lookup =
            writer.section("texture lookup", |base| self.texture_lookup.emit(base))?;
        header.texture_unit_lookup =
            writer.section("texture unit lookup", |base| self.texture_unit_lookup.emit(base))?;
        header.transparency_lookup =
            writer.section("transparency lookup", |base| self.transparency_lookup.emit(base))?;
        header.texture_transform_lookup = writer.section("texture transform lookup", |base| {
            self.texture_transform_lookup.emit(base)
        })?;
        header.bounding_box = self.bounding_box;
        header.bounding_sphere_radius = self.bounding_sphere_radius;
        header.collision_box = self.collision_box;
        header.collision_sphere_radius = self.collision_sphere_radius;
        header.collision_indices =
            writer.section("collision indices", |base| self.collision_indices.emit(base))?;
        header.collision_positions =
            writer.section("collision positions", |base| self.collision_positions.emit(base))?;
        header.collision_normals =
            writer.section("collision normals", |base| self.collision_normals.emit(base))?;
        header.attachments = writer.section("attachments", |base| {
            self.attachments.emit_records(base, HeaderBlock::Aligned)
        })?;
        header.attachment_lookup =
            writer.section("attachment lookup", |base| self.attachment_lookup.emit(base))?;
        header.events = writer.section("events", |base| {
            self.events.emit_records(base, HeaderBlock::Packed)
        })?;
        header.lights = writer.section("lights", |_| Ok(Emitted::empty(WowArray::default())))?;
        header.cameras = writer.section("cameras", |base| {
            self.cameras.emit_records(base, HeaderBlock::Aligned)
        })?;
        header.camera_lookup =
            writer.section("camera lookup", |base| self.camera_lookup.emit(base))?;
        header.ribbon_emitters =
            writer.section("ribbon emitters", |_| Ok(Emitted::empty(WowArray::default())))?;
        header.particle_emitters = writer.section("particle emitters", |base| {
            self.particle_emitters.emit_records(base, HeaderBlock::Aligned)
        })?;

        let mut bytes = if self.flags.contains(M2ModelFlags::BLEND_MODE_OVERRIDES) {
            let overrides = writer.section("blend mode overrides", |base| {
                self.blend_mode_overrides.emit(base)
            })?;
            let mut bytes = writer.bytes;
            let end = M2Header::BASE_SIZE + WowArray::<u16>::WOW_SIZE;
            bytes[M2Header::BASE_SIZE..end].copy_from_slice(&overrides.wow_bytes()?);
            bytes
        } else {
            writer.bytes
        };

        let header_bytes = header.wow_bytes()?;
        if header_bytes.len() != M2Header::BASE_SIZE {
            return Err(M2Error::InternalError(format!(
                "header rendered {} bytes, expected {}",
                header_bytes.len(),
                M2Header::BASE_SIZE
            )));
        }
        bytes[..M2Header::BASE_SIZE].copy_from_slice(&header_bytes);

        Ok(Emitted::new(bytes, header))
    }

    /// The model file bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.emit()?.bytes)
    }

    /// The companion skin file bytes
    pub fn skin_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.skin.emit()?.bytes)
    }

    /// File name of the model file
    pub fn file_name(&self) -> String {
        format!("{}.m2", self.name)
    }

    /// Writes `<name>.m2` and `<name>00.skin` into `dir`, creating it if needed.
    ///
    /// Both files are rendered before anything touches the disk.
    pub fn write_to_dir<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf> {
        let dir = dir.as_ref();
        let model_bytes = self.to_bytes()?;
        let skin_bytes = self.skin_bytes()?;

        fs::create_dir_all(dir)?;
        let model_path = dir.join(self.file_name());
        write_atomically(&model_path, &model_bytes)?;
        write_atomically(&dir.join(Skin::file_name(&self.name)), &skin_bytes)?;

        log::info!(
            "Wrote model '{}' ({} bytes, {} bone(s), {} vertices)",
            self.name,
            model_bytes.len(),
            self.bones.len(),
            self.vertices.len()
        );
        Ok(model_path)
    }
}

/// Writes to a temporary sibling, then renames it over `path`.
pub(crate) fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut temp = path.as_os_str().to_owned();
    temp.push(".tmp");
    let temp = PathBuf::from(temp);

    if let Err(e) = fs::write(&temp, bytes).and_then(|()| fs::rename(&temp, path)) {
        let _ = fs::remove_file(&temp);
        return Err(e.into());
    }
    Ok(())
}

fn convert_bone(bone: &ModelBone) -> M2Bone {
    M2Bone {
        key_bone_id: bone.key_bone_id,
        flags: bone.flags,
        parent_bone: bone.parent_bone,
        translation: bone.translation.clone(),
        rotation: bone.rotation.map_values(|&rotation| Quaternion16::from(rotation)),
        scale: bone.scale.clone(),
        ..M2Bone::new(bone.pivot)
    }
}

fn convert_emitter(emitter: &ModelParticleEmitter) -> M2ParticleEmitter {
    M2ParticleEmitter {
        flags: emitter.flags,
        position: emitter.position,
        emission_speed: TrackSequence::constant(Interpolation::Linear, emitter.emission_speed),
        gravity: TrackSequence::constant(Interpolation::Linear, emitter.gravity),
        lifespan: TrackSequence::constant(Interpolation::Linear, emitter.lifespan),
        emission_rate: TrackSequence::constant(Interpolation::Linear, emitter.spawn_rate),
        scale: SimpleTrack::constant(C2Vector::new(emitter.scale, emitter.scale)),
        ..M2ParticleEmitter::new(emitter.bone, emitter.texture)
    }
}

/// `[0]` without per-material lists, otherwise the lists concatenated four times over.
fn build_bone_lookup(model: &ObjectModel) -> OffsetArray<i16> {
    if model.bone_lookups_by_material.is_empty() {
        return vec![0].into();
    }
    let once: Vec<i16> = model
        .bone_lookups_by_material
        .values()
        .flatten()
        .copied()
        .collect();
    std::iter::repeat_n(once, 4).flatten().collect()
}

fn build_attachments(
    model: &ObjectModel,
) -> Result<(OffsetArray<M2Attachment>, OffsetArray<i16>)> {
    if !model.is_skeletal() || model.key_bone_lookup.len() <= 26 {
        return Ok((OffsetArray::new(), OffsetArray::new()));
    }

    let mut attachments = OffsetArray::new();
    let mut lookup = vec![-1i16; M2AttachmentId::LOOKUP_LEN];
    for id in M2AttachmentId::SKELETAL {
        let index = i16::try_from(attachments.len())
            .map_err(|_| M2Error::InternalError("attachment index overflow".into()))?;
        lookup[id as usize] = index;
        attachments.push(M2Attachment::new(id, u32::from(model.attachment_bone(id))));
    }
    Ok((attachments, lookup.into()))
}

/// An event holding one timestamp list per sequence, `[0]` where `fires` says so.
fn per_sequence_event(
    model: &ObjectModel,
    tag: &str,
    fires: impl Fn(usize, &M2Sequence) -> bool,
) -> Result<M2Event> {
    let mut event = M2Event::new(tag, 0, u32::from(model.event_bone(tag)))?;
    for (index, sequence) in model.sequences.iter().enumerate() {
        if fires(index, sequence) {
            event.add_sequence([0]);
        } else {
            event.add_sequence(Vec::new());
        }
    }
    Ok(event)
}

fn build_events(model: &ObjectModel) -> Result<OffsetArray<M2Event>> {
    let mut events = OffsetArray::new();

    if let Some(sound) = model.idle_sound {
        let bone = u32::from(model.event_bone(tags::IDLE_SOUND_LOOP));
        let mut event = M2Event::new(tags::IDLE_SOUND_LOOP, sound, bone)?;
        event.add_sequence([0]);
        events.push(event);
    }

    if model.combat_events && model.is_skeletal() {
        let attack = model.sequence_for_animation(animation_ids::ATTACK_UNARMED);
        let is_attack = |index: usize, _: &M2Sequence| Some(index) == attack;

        events.push(per_sequence_event(model, tags::DEATH, |_, _| false)?);
        events.push(per_sequence_event(model, tags::ATTACK_HIT, is_attack)?);
        events.push(per_sequence_event(model, tags::SPELL_CAST, is_attack)?);
        events.push(per_sequence_event(model, tags::PARRY, is_attack)?);
        events.push(per_sequence_event(model, tags::HIT, |_, _| true)?);
        events.push(per_sequence_event(model, tags::FIDGET_1, |index, _| index == 2)?);
        events.push(per_sequence_event(model, tags::FIDGET_2, |index, _| index == 3)?);
        events.push(per_sequence_event(model, tags::FOOTSTEP, |_, sequence| {
            animation_ids::MOVEMENT.contains(&sequence.animation_id)
        })?);
    } else if model.combat_events {
        log::warn!("Model '{}' is not skeletal; combat events skipped", model.name);
    }

    Ok(events)
}
