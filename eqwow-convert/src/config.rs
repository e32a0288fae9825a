//! Conversion settings and input document loading

use anyhow::{Context, Result};
use eqwow_ids::IdStarts;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use wow_m2::M2WriteOptions;
use wow_m2::model::DEFAULT_TEXTURE_FOLDER;
use wow_wmo::WmoWriteOptions;
use wow_wmo::writer::{DEFAULT_DOODAD_FOLDER, DEFAULT_ZONE_TEXTURE_FOLDER};

/// Settings shared by every command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// In-game folder of creature textures
    pub texture_folder: String,
    /// In-game folder of zone textures
    pub zone_texture_folder: String,
    /// In-game folder of static doodads
    pub doodad_folder: String,
    /// Write the optional `MCVP` chunk
    pub add_convex_volume_planes: bool,
    /// First identifier of each kind
    pub ids: IdStarts,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            texture_folder: DEFAULT_TEXTURE_FOLDER.to_string(),
            zone_texture_folder: DEFAULT_ZONE_TEXTURE_FOLDER.to_string(),
            doodad_folder: DEFAULT_DOODAD_FOLDER.to_string(),
            add_convex_volume_planes: false,
            ids: IdStarts::default(),
        }
    }
}

impl ConvertConfig {
    /// Load the configuration at `path`, or the defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let config = load_document(path)?;
                log::debug!("Loaded configuration from {}", path.display());
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn m2_options(&self) -> M2WriteOptions {
        M2WriteOptions {
            texture_folder: self.texture_folder.clone(),
        }
    }

    pub fn wmo_options(&self) -> WmoWriteOptions {
        WmoWriteOptions {
            zone_texture_folder: self.zone_texture_folder.clone(),
            doodad_folder: self.doodad_folder.clone(),
            add_convex_volume_planes: self.add_convex_volume_planes,
        }
    }
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}

/// Read a JSON or YAML document, chosen by file extension
pub fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    if is_yaml(path) {
        serde_yaml_ng::from_str(&text)
            .with_context(|| format!("Failed to parse YAML {}", path.display()))
    } else {
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse JSON {}", path.display()))
    }
}
