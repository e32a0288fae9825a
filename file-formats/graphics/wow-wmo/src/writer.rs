use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::group::WmoGroupFile;
use crate::root::WmoRootFile;
use crate::zone::Zone;

/// Group files past this count cannot be addressed by the `_NNN` naming scheme
pub const MAX_GROUP_FILES: usize = 999;

pub const DEFAULT_ZONE_TEXTURE_FOLDER: &str = "WORLD\\EVERQUEST\\ZONETEXTURES";
pub const DEFAULT_DOODAD_FOLDER: &str = "WORLD\\EVERQUEST\\STATICDOODADS";

/// Options for WMO output
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-support", serde(default))]
pub struct WmoWriteOptions {
    /// Folder prefix of `MOTX` texture paths; the zone name is appended
    pub zone_texture_folder: String,
    /// Folder prefix of `MODN` doodad paths
    pub doodad_folder: String,
    /// Write the `MCVP` chunk
    pub add_convex_volume_planes: bool,
}

impl Default for WmoWriteOptions {
    fn default() -> Self {
        Self {
            zone_texture_folder: DEFAULT_ZONE_TEXTURE_FOLDER.to_owned(),
            doodad_folder: DEFAULT_DOODAD_FOLDER.to_owned(),
            add_convex_volume_planes: false,
        }
    }
}

/// Rendered root and group files of one zone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledWmo {
    pub root: Vec<u8>,
    pub groups: Vec<Vec<u8>>,
}

/// Paths written by [`WmoWriter::write_to_dir`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenWmo {
    pub root: PathBuf,
    pub groups: Vec<PathBuf>,
}

/// `<base>.wmo`
pub fn root_file_name(base: &str) -> String {
    format!("{base}.wmo")
}

/// `<base>_NNN.wmo`
pub fn group_file_name(base: &str, index: usize) -> String {
    format!("{base}_{index:03}.wmo")
}

/// Write `bytes` to a temporary sibling of `path`, then rename it into place
fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    let result = fs::File::create(&tmp_path)
        .and_then(|mut file| {
            file.write_all(bytes)?;
            file.sync_all()
        })
        .and_then(|()| fs::rename(&tmp_path, path));
    if let Err(e) = result {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    Ok(())
}

/// Writer for WMO files
#[derive(Debug, Clone, Default)]
pub struct WmoWriter {
    options: WmoWriteOptions,
}

impl WmoWriter {
    /// Create a new WMO writer
    pub fn new(options: WmoWriteOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &WmoWriteOptions {
        &self.options
    }

    /// Render the root and every group of `zone` in memory
    ///
    /// More than [`MAX_GROUP_FILES`] groups is logged as an error, but every
    /// group is still rendered and listed in the root.
    pub fn assemble(&self, zone: &Zone) -> Result<AssembledWmo> {
        zone.validate()?;
        if zone.groups.len() > MAX_GROUP_FILES {
            tracing::error!(
                "Zone '{}' has {} groups, groups past {} will not load",
                zone.name,
                zone.groups.len(),
                MAX_GROUP_FILES
            );
        }

        let root = WmoRootFile::build(zone, &self.options)?;
        let groups = zone
            .groups
            .iter()
            .zip(&root.group_name_offsets)
            .map(|(group, &names)| WmoGroupFile::build(group, &zone.materials, names)?.to_bytes())
            .collect::<Result<Vec<_>>>()?;
        let root = root.to_bytes()?;

        tracing::debug!(
            "Assembled zone '{}': root {} bytes, {} groups",
            zone.name,
            root.len(),
            groups.len()
        );
        Ok(AssembledWmo { root, groups })
    }

    /// Assemble `zone` and write `<name>.wmo` plus `<name>_NNN.wmo` into `dir`
    pub fn write_to_dir<P: AsRef<Path>>(&self, zone: &Zone, dir: P) -> Result<WrittenWmo> {
        let assembled = self.assemble(zone)?;
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let root = dir.join(root_file_name(&zone.name));
        write_atomically(&root, &assembled.root)?;

        let mut groups = Vec::with_capacity(assembled.groups.len());
        for (index, bytes) in assembled.groups.iter().enumerate() {
            let path = dir.join(group_file_name(&zone.name, index));
            write_atomically(&path, bytes)?;
            groups.push(path);
        }

        tracing::info!(
            "Wrote {} and {} group files",
            root.display(),
            groups.len()
        );
        Ok(WrittenWmo { root, groups })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WmoError;
    use crate::test_support::sample_zone;
    use tempfile::TempDir;

    #[test]
    fn test_file_names() {
        assert_eq!(root_file_name("qeynos"), "qeynos.wmo");
        assert_eq!(group_file_name("qeynos", 0), "qeynos_000.wmo");
        assert_eq!(group_file_name("qeynos", 42), "qeynos_042.wmo");
        assert_eq!(group_file_name("qeynos", 1000), "qeynos_1000.wmo");
    }

    #[test]
    fn test_write_to_dir() {
        let dir = TempDir::new().unwrap();
        let writer = WmoWriter::default();
        let written = writer.write_to_dir(&sample_zone(), dir.path()).unwrap();

        assert_eq!(written.root, dir.path().join("qeynos.wmo"));
        assert_eq!(written.groups, vec![dir.path().join("qeynos_000.wmo")]);

        let assembled = writer.assemble(&sample_zone()).unwrap();
        assert_eq!(fs::read(&written.root).unwrap(), assembled.root);
        assert_eq!(fs::read(&written.groups[0]).unwrap(), assembled.groups[0]);
        assert!(!dir.path().join("qeynos.wmo.tmp").exists());
    }

    #[test]
    fn test_invalid_zone_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut zone = sample_zone();
        zone.groups[0].triangles[0].vertices[0] = 99;

        let result = WmoWriter::default().write_to_dir(&zone, dir.path().join("out"));
        assert!(matches!(result, Err(WmoError::InvalidReference { .. })));
        assert!(!dir.path().join("out").exists());
    }
}
