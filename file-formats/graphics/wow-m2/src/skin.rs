use std::collections::{BTreeMap, BTreeSet};

use wow_data::prelude::*;

use crate::domain::{ModelTriangle, ObjectModel};
use crate::error::{M2Error, Result};

/// Magic signature for Skin files ("SKIN")
pub const SKIN_MAGIC: [u8; 4] = *b"SKIN";

/// Largest number of bones a single draw call may reference
pub const SKIN_BONE_COUNT_MAX: u32 = 21;

/// Skin file header (48 bytes)
#[derive(Debug, Clone, PartialEq, WowDataW)]
pub struct SkinHeader {
    /// Magic signature ("SKIN")
    pub magic: [u8; 4],
    /// Vertex indices into the model's vertex list
    pub indices: WowArray<u16>,
    /// Triangle corners, three per triangle
    pub triangles: WowArray<u16>,
    /// Bone indices, four per vertex
    pub bone_indices: WowArray<[u8; 4]>,
    pub submeshes: WowArray<SkinSubmesh>,
    pub texture_units: WowArray<SkinTextureUnit>,
    pub bone_count_max: u32,
}

/// Submesh structure (48 bytes)
#[derive(Debug, Clone, Copy, PartialEq, WowDataW)]
pub struct SkinSubmesh {
    pub id: u16,
    pub level: u16,
    pub vertex_start: u16,
    pub vertex_count: u16,
    pub index_start: u16,
    pub index_count: u16,
    pub bone_count: u16,
    pub bone_combo_index: u16,
    pub bones_influencing: u16,
    pub center_bone: u16,
    pub center_of_mass: C3Vector,
    pub sort_center: C3Vector,
    pub sort_radius: f32,
}

/// Texture unit (batch) binding one submesh to one material (24 bytes)
#[derive(Debug, Clone, Copy, PartialEq, WowDataW)]
pub struct SkinTextureUnit {
    pub flags: u8,
    pub priority_plane: i8,
    pub shader_id: u16,
    pub submesh_index: u16,
    pub geoset_index: u16,
    pub color_index: i16,
    pub material_index: u16,
    pub material_layer: u16,
    pub texture_count: u16,
    pub texture_lookup: u16,
    pub texture_unit_lookup: u16,
    pub transparency_lookup: u16,
    pub texture_transform_lookup: u16,
}

impl SkinTextureUnit {
    /// Flags every generated batch carries
    pub const DEFAULT_FLAGS: u8 = 0x10;
}

fn to_u16(kind: &str, value: usize) -> Result<u16> {
    u16::try_from(value)
        .map_err(|_| M2Error::ValidationError(format!("{kind} {value} does not fit in 16 bits")))
}

/// Position and bounds of the vertices one submesh references.
fn submesh_bounds(model: &ObjectModel, vertices: &BTreeSet<u16>) -> (C3Vector, C3Vector, f32) {
    if vertices.is_empty() {
        return (C3Vector::origin(), C3Vector::origin(), 0.0);
    }

    let positions: Vec<C3Vector> = vertices
        .iter()
        .filter_map(|&index| model.vertices.get(usize::from(index)))
        .map(|vertex| vertex.position)
        .collect();
    let sum = positions
        .iter()
        .fold(glam::Vec3::ZERO, |sum, position| sum + position.to_glam());
    let center_of_mass = C3Vector::from_glam(sum / positions.len() as f32);

    let bounds = BoundingBox::from_points(&positions);
    let radius = (bounds.max.to_glam() - bounds.min.to_glam()).length() * 0.5;
    (center_of_mass, bounds.center(), radius)
}

/// Main Skin structure
///
/// Holds the render partition of one model: one submesh and one texture unit per material,
/// ordered by material id.
#[derive(Debug, Clone, PartialEq)]
pub struct Skin {
    pub indices: OffsetArray<u16>,
    pub triangles: OffsetArray<u16>,
    pub bone_indices: OffsetArray<[u8; 4]>,
    pub submeshes: OffsetArray<SkinSubmesh>,
    pub texture_units: OffsetArray<SkinTextureUnit>,
}

impl Skin {
    /// Partitions the model's triangles by material.
    ///
    /// The triangle list is written grouped by material id (input order kept within a
    /// material), so each submesh's index range covers exactly its own triangles.
    pub fn build(model: &ObjectModel) -> Result<Self> {
        let vertex_count = to_u16("vertex count", model.vertices.len())?;
        let indices = (0..vertex_count).collect();
        let bone_indices = model
            .vertices
            .iter()
            .map(|vertex| vertex.bone_indices)
            .collect();

        let mut by_material: BTreeMap<u16, Vec<&ModelTriangle>> = BTreeMap::new();
        for triangle in &model.triangles {
            by_material
                .entry(triangle.material)
                .or_default()
                .push(triangle);
        }
        let triangles = by_material
            .values()
            .flatten()
            .flat_map(|triangle| triangle.vertices)
            .collect();

        let mut submeshes = OffsetArray::new();
        let mut texture_units = OffsetArray::new();
        let mut vertex_start = 0u16;
        let mut index_start = 0u16;
        for (submesh_index, (&material, triangles)) in by_material.iter().enumerate() {
            let submesh_index = to_u16("submesh index", submesh_index)?;
            let unique: BTreeSet<u16> = triangles
                .iter()
                .flat_map(|triangle| triangle.vertices)
                .collect();
            let unique_count = to_u16("submesh vertex count", unique.len())?;
            let index_count = to_u16("submesh index count", triangles.len() * 3)?;
            let (center_of_mass, sort_center, sort_radius) = submesh_bounds(model, &unique);

            submeshes.push(SkinSubmesh {
                id: 0,
                level: 0,
                vertex_start,
                vertex_count: unique_count,
                index_start,
                index_count,
                bone_count: 1,
                bone_combo_index: 1,
                bones_influencing: 1,
                center_bone: 0,
                center_of_mass,
                sort_center,
                sort_radius,
            });

            if usize::from(material) >= model.texture_lookup.len() {
                return Err(M2Error::ReferenceError(format!(
                    "material {material} has no texture lookup entry (have {})",
                    model.texture_lookup.len()
                )));
            }
            texture_units.push(SkinTextureUnit {
                flags: SkinTextureUnit::DEFAULT_FLAGS,
                priority_plane: 0,
                shader_id: 0,
                submesh_index,
                geoset_index: submesh_index,
                color_index: -1,
                material_index: material,
                material_layer: 0,
                texture_count: 1,
                // materials and texture lookup entries are paired by id, not by submesh position
                texture_lookup: material,
                texture_unit_lookup: 0,
                transparency_lookup: 0,
                texture_transform_lookup: 0,
            });

            vertex_start = vertex_start.checked_add(unique_count).ok_or_else(|| {
                M2Error::ValidationError("submesh vertex start does not fit in 16 bits".into())
            })?;
            index_start = index_start.checked_add(index_count).ok_or_else(|| {
                M2Error::ValidationError("submesh index start does not fit in 16 bits".into())
            })?;
        }

        Ok(Self {
            indices,
            triangles,
            bone_indices,
            submeshes,
            texture_units,
        })
    }

    /// Lays the sections out back to back after the header.
    pub fn emit(&self) -> Result<Emitted<SkinHeader>> {
        let mut bytes = vec![0u8; SkinHeader::WOW_SIZE];

        let indices = self.indices.emit(offset_at(0, bytes.len())?)?;
        bytes.extend_from_slice(&indices.bytes);
        let triangles = self.triangles.emit(offset_at(0, bytes.len())?)?;
        bytes.extend_from_slice(&triangles.bytes);
        let bone_indices = self.bone_indices.emit(offset_at(0, bytes.len())?)?;
        bytes.extend_from_slice(&bone_indices.bytes);
        let submeshes = self.submeshes.emit(offset_at(0, bytes.len())?)?;
        bytes.extend_from_slice(&submeshes.bytes);
        let texture_units = self.texture_units.emit(offset_at(0, bytes.len())?)?;
        bytes.extend_from_slice(&texture_units.bytes);

        let header = SkinHeader {
            magic: SKIN_MAGIC,
            indices: indices.descriptor,
            triangles: triangles.descriptor,
            bone_indices: bone_indices.descriptor,
            submeshes: submeshes.descriptor,
            texture_units: texture_units.descriptor,
            bone_count_max: SKIN_BONE_COUNT_MAX,
        };
        bytes[..SkinHeader::WOW_SIZE].copy_from_slice(&header.wow_bytes()?);

        log::debug!(
            "Skin: {} triangles in {} submeshes, {} bytes",
            self.triangles.len() / 3,
            self.submeshes.len(),
            bytes.len()
        );
        Ok(Emitted::new(bytes, header))
    }

    /// File name of the skin belonging to model `name`
    pub fn file_name(name: &str) -> String {
        format!("{name}00.skin")
    }
}
