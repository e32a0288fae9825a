//! WMO root file
//!
//! The root is a flat list of chunks:
//! `MVER`, `MOHD`, `MOTX`, `MOMT`, `MOGN`, `MOGI`, `MOSB`, `MOPV`, `MOPT`,
//! `MOPR`, `MOVV`, `MOVB`, `MOLT`, `MODS`, `MODN`, `MODD`, `MFOG` and,
//! when enabled, `MCVP`. String tables are built first so materials, groups
//! and doodads can refer to names by byte offset.

use std::collections::HashMap;

use crate::chunk::{Chunk, ChunkWriter, render_chunks};
use crate::chunk_id::ChunkId;
use crate::error::{Result, WmoError};
use crate::group::{GroupNameOffsets, group_flags};
use crate::wmo_types::{
    MfogEntry, ModsEntry, ModdEntry, MogiEntry, MohdHeader, MoltEntry, MomtEntry, WMO_VERSION,
    WmoLightType, WmoRootFlags,
};
use crate::writer::WmoWriteOptions;
use crate::zone::Zone;

/// A NUL-terminated string table with the offset of every distinct entry
#[derive(Debug)]
struct StringTable {
    writer: ChunkWriter,
    offsets: HashMap<String, u32>,
}

impl StringTable {
    fn new(id: ChunkId) -> Self {
        Self {
            writer: ChunkWriter::new(id),
            offsets: HashMap::new(),
        }
    }

    /// Offset of `value`, appending it on first use
    fn intern(&mut self, value: &str, alignment: usize) -> Result<u32> {
        if let Some(&offset) = self.offsets.get(value) {
            return Ok(offset);
        }
        let offset = self.append(value, alignment)?;
        self.offsets.insert(value.to_owned(), offset);
        Ok(offset)
    }

    /// Append `value` even if it is already present
    fn append(&mut self, value: &str, alignment: usize) -> Result<u32> {
        let len = self.writer.len();
        let offset = u32::try_from(len)
            .map_err(|_| WmoError::reference("string table offset", len, u32::MAX as usize))?;
        self.writer.c_string(value)?.pad_to(alignment)?;
        Ok(offset)
    }

    fn finish(self) -> Chunk {
        self.writer.finish()
    }
}

/// Every root chunk, collected before rendering
#[derive(Debug, Clone, PartialEq)]
pub struct WmoRootFile {
    pub header: MohdHeader,
    pub textures: Chunk,
    pub materials: Vec<MomtEntry>,
    pub group_names: Chunk,
    pub group_name_offsets: Vec<GroupNameOffsets>,
    pub group_infos: Vec<MogiEntry>,
    pub lights: Vec<MoltEntry>,
    pub doodad_sets: Vec<ModsEntry>,
    pub doodad_names: Chunk,
    pub doodad_defs: Vec<ModdEntry>,
    pub fog: MfogEntry,
    pub convex_volume_planes: Option<Chunk>,
}

impl WmoRootFile {
    /// Collect the root of `zone`
    pub fn build(zone: &Zone, options: &WmoWriteOptions) -> Result<Self> {
        let zone_folder = zone.name.to_uppercase();

        // MOTX and MOMT
        let mut textures = StringTable::new(ChunkId::MOTX);
        let mut materials = Vec::with_capacity(zone.materials.len());
        for material in &zone.materials {
            let texture_offset = match &material.texture {
                Some(texture) => {
                    let path = format!(
                        "{}\\{}\\{}.BLP",
                        options.zone_texture_folder,
                        zone_folder,
                        texture.to_uppercase()
                    );
                    textures.intern(&path, 4)?
                }
                None => 0,
            };
            materials.push(MomtEntry::new(
                material.flags,
                material.blend_mode,
                texture_offset,
            ));
        }
        textures.writer.bytes(&[0; 4])?;

        // MOGN and MOGI
        let mut group_names = StringTable::new(ChunkId::MOGN);
        group_names.writer.bytes(&[0, 0])?;
        let mut group_name_offsets = Vec::with_capacity(zone.groups.len());
        let mut group_infos = Vec::with_capacity(zone.groups.len());
        for group in &zone.groups {
            let name = group.name.as_deref().unwrap_or(&zone.name);
            let descriptive = group
                .descriptive_name
                .as_deref()
                .unwrap_or(&zone.descriptive_name);
            let offsets = GroupNameOffsets {
                name: group_names.append(name, 1)?,
                descriptive_name: group_names.append(descriptive, 1)?,
            };
            group_infos.push(MogiEntry {
                flags: group_flags(group).bits(),
                bounding_box: group.bounds(),
                name_offset: offsets.name as i32,
            });
            group_name_offsets.push(offsets);
        }
        group_names.writer.pad_to(4)?;

        let lights = zone
            .lights
            .iter()
            .map(|light| MoltEntry {
                light_type: WmoLightType::Omni,
                use_attenuation: 1,
                padding: [1, 1],
                color: light.color,
                position: light.position,
                intensity: light.intensity,
                unknown: MoltEntry::DEFAULT_UNKNOWN,
                attenuation_start: light.attenuation_start,
                attenuation_end: light.attenuation_end,
            })
            .collect();

        // MODN and MODD
        let mut doodad_names = StringTable::new(ChunkId::MODN);
        let mut doodad_defs = Vec::with_capacity(zone.doodads.len());
        for doodad in &zone.doodads {
            let path = format!(
                "{}\\{name}\\{name}.MDX",
                options.doodad_folder,
                name = doodad.model_name
            )
            .to_uppercase();
            let offset = doodad_names.intern(&path, 1)?;
            if offset > ModdEntry::MAX_NAME_OFFSET {
                return Err(WmoError::reference(
                    "doodad name offset",
                    offset as usize,
                    ModdEntry::MAX_NAME_OFFSET as usize,
                ));
            }
            doodad_defs.push(ModdEntry {
                name_offset_and_flags: ModdEntry::pack_name(offset, doodad.flags),
                position: doodad.position,
                orientation: doodad.orientation,
                scale: doodad.scale,
                color: doodad.color,
            });
        }
        let doodad_name_count = doodad_names.offsets.len();

        let doodad_count = u32::try_from(zone.doodads.len())
            .map_err(|_| WmoError::reference("doodads", zone.doodads.len(), u32::MAX as usize))?;
        let doodad_sets = vec![ModsEntry::new(ModsEntry::DEFAULT_GLOBAL, 0, doodad_count)];

        let fog = MfogEntry {
            flags: u32::from(zone.fog.infinite_radius),
            position: zone.fog.position,
            small_radius: zone.fog.near_radius,
            large_radius: zone.fog.far_radius,
            fog_end: zone.fog.end,
            fog_start_scalar: zone.fog.start_scalar,
            fog_color: zone.fog.color,
            underwater_fog_end: zone.fog.underwater_end,
            underwater_fog_start_scalar: zone.fog.underwater_start_scalar,
            underwater_fog_color: zone.fog.underwater_color,
        };

        let convex_volume_planes = if options.add_convex_volume_planes {
            Some(Chunk::from_records(
                ChunkId::MCVP,
                &zone.convex_volume_planes,
            )?)
        } else {
            None
        };

        let mut flags =
            WmoRootFlags::USE_LIQUID_TYPE_DBC_ID | WmoRootFlags::DO_NOT_FIX_VERTEX_COLOR_ALPHA;
        if zone.ambient_color.is_some() {
            flags |= WmoRootFlags::USE_UNIFIED_RENDER_PATH;
        }

        let count = |what: &str, len: usize| {
            u32::try_from(len).map_err(|_| WmoError::reference(what, len, u32::MAX as usize))
        };
        let header = MohdHeader {
            material_count: count("materials", materials.len())?,
            group_count: count("groups", zone.groups.len())?,
            portal_count: 0,
            light_count: count("lights", zone.lights.len())?,
            doodad_name_count: count("doodad names", doodad_name_count)?,
            doodad_def_count: doodad_count,
            doodad_set_count: count("doodad sets", doodad_sets.len())?,
            ambient_color: zone.ambient_color.unwrap_or_default(),
            wmo_id: zone.wmo_id,
            bounding_box: zone.bounds(),
            flags,
            lod_count: 0,
        };

        Ok(Self {
            header,
            textures: textures.finish(),
            materials,
            group_names: group_names.finish(),
            group_name_offsets,
            group_infos,
            lights,
            doodad_sets,
            doodad_names: doodad_names.finish(),
            doodad_defs,
            fog,
            convex_volume_planes,
        })
    }

    /// Every chunk in file order
    pub fn chunks(&self) -> Result<Vec<Chunk>> {
        let mut chunks = vec![
            Chunk::from_records(ChunkId::MVER, &[WMO_VERSION])?,
            Chunk::from_records(ChunkId::MOHD, std::slice::from_ref(&self.header))?,
            self.textures.clone(),
            Chunk::from_records(ChunkId::MOMT, &self.materials)?,
            self.group_names.clone(),
            Chunk::from_records(ChunkId::MOGI, &self.group_infos)?,
            Chunk::new(ChunkId::MOSB, vec![0; 4]),
            Chunk::empty(ChunkId::MOPV),
            Chunk::empty(ChunkId::MOPT),
            Chunk::empty(ChunkId::MOPR),
            Chunk::empty(ChunkId::MOVV),
            Chunk::empty(ChunkId::MOVB),
            Chunk::from_records(ChunkId::MOLT, &self.lights)?,
            Chunk::from_records(ChunkId::MODS, &self.doodad_sets)?,
            self.doodad_names.clone(),
            Chunk::from_records(ChunkId::MODD, &self.doodad_defs)?,
            Chunk::from_records(ChunkId::MFOG, std::slice::from_ref(&self.fog))?,
        ];
        if let Some(planes) = &self.convex_volume_planes {
            chunks.push(planes.clone());
        }
        for chunk in &chunks {
            tracing::debug!("Root chunk {}: {} bytes", chunk.id, chunk.payload.len());
        }
        Ok(chunks)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        render_chunks(&self.chunks()?)
    }
}
