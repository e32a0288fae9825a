//! WMO zone command implementation

use anyhow::{Context, Result};
use eqwow_ids::{IdAllocator, IdKind};
use serde::Serialize;
use std::path::{Path, PathBuf};
use wow_wmo::{WmoWriter, Zone};

use super::write_manifest;
use crate::config::{ConvertConfig, load_document};

/// Identifiers assigned to one written zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneRecord {
    pub name: String,
    pub root: PathBuf,
    pub groups: Vec<PathBuf>,
    pub wmo_id: u32,
    pub group_ids: Vec<u32>,
    pub area_id: u32,
}

/// `<zone>.ids.json` next to the root file
pub fn manifest_name(zone: &str) -> String {
    format!("{zone}.ids.json")
}

/// Fill every identifier the description leaves at zero
pub fn assign_ids(zone: &mut Zone, ids: &IdAllocator) -> Result<()> {
    if zone.wmo_id == 0 {
        zone.wmo_id = ids.next(IdKind::Wmo)?;
    }
    for group in zone.groups.iter_mut().filter(|g| g.group_id == 0) {
        group.group_id = ids.next(IdKind::WmoGroup)?;
    }
    Ok(())
}

pub fn execute(input: &Path, output: &Path, config: &ConvertConfig) -> Result<ZoneRecord> {
    let mut zone: Zone = load_document(input)?;
    let ids = IdAllocator::new(config.ids);
    assign_ids(&mut zone, &ids)?;
    let area_id = ids.next(IdKind::Area)?;

    let written = WmoWriter::new(config.wmo_options())
        .write_to_dir(&zone, output)
        .with_context(|| format!("Failed to write zone '{}'", zone.name))?;

    let record = ZoneRecord {
        name: zone.name.clone(),
        root: written.root,
        groups: written.groups,
        wmo_id: zone.wmo_id,
        group_ids: zone.groups.iter().map(|g| g.group_id).collect(),
        area_id,
    };
    write_manifest(&output.join(manifest_name(&zone.name)), &record)?;
    log::info!(
        "Zone '{}' written with WMO id {} and {} group(s)",
        record.name,
        record.wmo_id,
        record.groups.len()
    );
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use eqwow_ids::IdStarts;
    use pretty_assertions::assert_eq;
    use wow_wmo::ZoneGroup;

    #[test]
    fn test_assign_ids_keeps_explicit_values() {
        let mut zone = Zone {
            name: "akanon".into(),
            groups: vec![
                ZoneGroup::default(),
                ZoneGroup {
                    group_id: 42,
                    ..Default::default()
                },
                ZoneGroup::default(),
            ],
            ..Default::default()
        };
        let ids = IdAllocator::new(IdStarts {
            wmo: 10,
            wmo_group: 500,
            ..Default::default()
        });

        assign_ids(&mut zone, &ids).unwrap();
        assert_eq!(zone.wmo_id, 10);
        let group_ids: Vec<u32> = zone.groups.iter().map(|g| g.group_id).collect();
        assert_eq!(group_ids, vec![500, 42, 501]);
    }

    #[test]
    fn test_assign_ids_explicit_wmo_id() {
        let mut zone = Zone {
            wmo_id: 9,
            ..Default::default()
        };
        let ids = IdAllocator::default();
        assign_ids(&mut zone, &ids).unwrap();
        assert_eq!(zone.wmo_id, 9);
        assert_eq!(ids.peek(IdKind::Wmo), IdStarts::default().wmo);
    }
}
