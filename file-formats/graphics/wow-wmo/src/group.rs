//! WMO group files
//!
//! A group file is `MVER` followed by one `MOGP` chunk. The `MOGP` payload is
//! the fixed group header and then the geometry sub-chunks, in order:
//! `MOPY`, `MOVI`, `MOVT`, `MONR`, `MOTV`, `MOBA`, `MOLR`, `MODR`, `MOBN`,
//! `MOBR`, `MOCV`, `MLIQ`. Light references, doodad references, vertex colors
//! and liquid are only written when the group has them.

use crate::chunk::{Chunk, ChunkWriter, render_chunks};
use crate::chunk_id::ChunkId;
use crate::error::{Result, WmoError};
use crate::liquid::{LiquidGrid, LiquidKind};
use crate::types::BoundingBox;
use crate::wmo_group_types::{
    MobaEntry, MogpHeader, MopyEntry, NON_RENDERABLE_MATERIAL, WmoGroupFlags, WmoPolyFlags,
};
use crate::wmo_types::WMO_VERSION;
use crate::zone::{BspTree, GroupPlacement, ZoneGroup, ZoneMaterial, ZoneTriangle};

/// Offsets of a group's two names inside the root `MOGN` chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GroupNameOffsets {
    pub name: u32,
    pub descriptive_name: u32,
}

/// Header flags of a group, shared by `MOGP` and the root `MOGI` entry
pub fn group_flags(group: &ZoneGroup) -> WmoGroupFlags {
    let mut flags = WmoGroupFlags::HAS_BSP_TREE;
    flags |= match group.placement {
        GroupPlacement::Exterior => {
            WmoGroupFlags::IS_OUTDOORS | WmoGroupFlags::USE_EXTERIOR_LIGHTING
        }
        GroupPlacement::Interior => WmoGroupFlags::IS_INDOORS,
    };
    if !group.vertex_colors.is_empty() {
        flags |= WmoGroupFlags::HAS_VERTEX_COLORS;
    }
    if !group.light_refs.is_empty() {
        flags |= WmoGroupFlags::HAS_LIGHTS;
    }
    if !group.doodad_refs.is_empty() {
        flags |= WmoGroupFlags::HAS_DOODADS;
    }
    if let Some(liquid) = &group.liquid {
        flags |= WmoGroupFlags::HAS_WATER;
        if liquid.kind == LiquidKind::Ocean {
            flags |= WmoGroupFlags::WATER_IS_OCEAN;
        }
    }
    flags
}

fn is_renderable(materials: &[ZoneMaterial], triangle: &ZoneTriangle) -> bool {
    materials
        .get(usize::from(triangle.material))
        .is_some_and(|m| m.renderable)
}

/// Render batches over consecutive runs of renderable triangles sharing a material
pub fn build_batches(group: &ZoneGroup, materials: &[ZoneMaterial]) -> Result<Vec<MobaEntry>> {
    // Index count is a u16, so long runs are cut into several batches
    const MAX_TRIANGLES_PER_BATCH: usize = u16::MAX as usize / 3;

    let mut batches = Vec::new();
    let mut start = 0;
    while start < group.triangles.len() {
        let material = group.triangles[start].material;
        let run = group.triangles[start..]
            .iter()
            .take_while(|t| t.material == material)
            .count()
            .min(MAX_TRIANGLES_PER_BATCH);
        let triangles = &group.triangles[start..start + run];

        if is_renderable(materials, &triangles[0]) {
            let indices = || triangles.iter().flat_map(|t| t.vertices);
            let min_vertex = indices().min().unwrap_or(0);
            let max_vertex = indices().max().unwrap_or(0);
            let bounds = BoundingBox::from_points(
                indices().filter_map(|i| group.vertices.get(usize::from(i))),
            )
            .unwrap_or_default();
            let material_id = u8::try_from(material).map_err(|_| {
                WmoError::reference("batch material", usize::from(material), 0xFF)
            })?;

            batches.push(MobaEntry {
                bounding_box: bounds.to_low_res(),
                start_index: u32::try_from(start * 3).map_err(|_| {
                    WmoError::reference("batch start index", start * 3, u32::MAX as usize)
                })?,
                index_count: (run * 3) as u16,
                min_vertex,
                max_vertex,
                flags: 0,
                material_id,
            });
        }
        start += run;
    }
    Ok(batches)
}

/// A group file split into its header and sub-chunks
#[derive(Debug, Clone, PartialEq)]
pub struct WmoGroupFile {
    pub header: MogpHeader,
    pub chunks: Vec<Chunk>,
}

impl WmoGroupFile {
    /// Collect every sub-chunk of one group
    pub fn build(
        group: &ZoneGroup,
        materials: &[ZoneMaterial],
        names: GroupNameOffsets,
    ) -> Result<Self> {
        let batches = build_batches(group, materials)?;
        let batch_count = u16::try_from(batches.len())
            .map_err(|_| WmoError::reference("batches", batches.len(), usize::from(u16::MAX)))?;
        let (interior_batch_count, exterior_batch_count) = match group.placement {
            GroupPlacement::Exterior => (0, batch_count),
            GroupPlacement::Interior => (batch_count, 0),
        };

        let header = MogpHeader {
            group_name_offset: names.name,
            descriptive_name_offset: names.descriptive_name,
            flags: group_flags(group),
            bounding_box: group.bounds(),
            portal_start: 0,
            portal_count: 0,
            trans_batch_count: 0,
            interior_batch_count,
            exterior_batch_count,
            padding: 0,
            fog_ids: [0; 4],
            liquid_type: if group.liquid_volume {
                0
            } else {
                MogpHeader::DEFAULT_LIQUID_TYPE
            },
            group_id: group.group_id,
            unknown: [0; 2],
        };

        let polys: Vec<MopyEntry> = group
            .triangles
            .iter()
            .map(|t| {
                if is_renderable(materials, t) {
                    MopyEntry {
                        flags: WmoPolyFlags::empty(),
                        material_id: t.material as u8,
                    }
                } else {
                    MopyEntry {
                        flags: WmoPolyFlags::COLLISION,
                        material_id: NON_RENDERABLE_MATERIAL,
                    }
                }
            })
            .collect();
        let indices: Vec<[u16; 3]> = group.triangles.iter().map(|t| t.vertices).collect();

        let mut chunks = vec![
            Chunk::from_records(ChunkId::MOPY, &polys)?,
            Chunk::from_records(ChunkId::MOVI, &indices)?,
            Chunk::from_records(ChunkId::MOVT, &group.vertices)?,
            Chunk::from_records(ChunkId::MONR, &group.normals)?,
            Chunk::from_records(ChunkId::MOTV, &group.tex_coords)?,
            Chunk::from_records(ChunkId::MOBA, &batches)?,
        ];
        if !group.light_refs.is_empty() {
            chunks.push(Chunk::from_records(ChunkId::MOLR, &group.light_refs)?);
        }
        if !group.doodad_refs.is_empty() {
            chunks.push(Chunk::from_records(ChunkId::MODR, &group.doodad_refs)?);
        }

        let bsp = match &group.bsp {
            Some(bsp) => bsp.clone(),
            None => {
                let count = u16::try_from(group.triangles.len()).map_err(|_| {
                    WmoError::reference(
                        "triangles without a BSP tree",
                        group.triangles.len(),
                        usize::from(u16::MAX),
                    )
                })?;
                BspTree::single_leaf(count)
            }
        };
        chunks.push(Chunk::from_records(ChunkId::MOBN, &bsp.nodes)?);
        chunks.push(Chunk::from_records(ChunkId::MOBR, &bsp.face_indices)?);

        if !group.vertex_colors.is_empty() {
            chunks.push(Chunk::from_records(ChunkId::MOCV, &group.vertex_colors)?);
        }
        if let Some(liquid) = &group.liquid {
            chunks.push(LiquidGrid::generate(liquid)?.to_chunk()?);
        }

        Ok(Self { header, chunks })
    }

    /// The `MOGP` chunk: header followed by every sub-chunk
    pub fn mogp_chunk(&self) -> Result<Chunk> {
        let mut writer = ChunkWriter::new(ChunkId::MOGP);
        writer.record(&self.header)?;
        writer.bytes(&render_chunks(&self.chunks)?)?;
        Ok(writer.finish())
    }

    /// Render the whole group file
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        render_chunks(&[
            Chunk::from_records(ChunkId::MVER, &[WMO_VERSION])?,
            self.mogp_chunk()?,
        ])
    }

    pub fn chunk(&self, id: ChunkId) -> Option<&Chunk> {
        self.chunks.iter().find(|c| c.id == id)
    }
}
