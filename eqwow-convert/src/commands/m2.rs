//! M2 model command implementation

use anyhow::{Context, Result};
use eqwow_ids::{IdAllocator, IdKind};
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use wow_m2::{M2Model, M2WriteOptions, ObjectModel};

use super::{BatchSummary, write_manifest};
use crate::config::{ConvertConfig, load_document};
use crate::utils::create_progress_bar;

/// Manifest written next to the models
pub const MANIFEST_NAME: &str = "models.json";

/// Identifiers assigned to one written model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelRecord {
    pub name: String,
    pub file: PathBuf,
    pub creature_model_id: u32,
    pub creature_display_info_id: u32,
}

pub fn execute(
    inputs: &[PathBuf],
    output: &Path,
    config: &ConvertConfig,
    quiet: bool,
) -> Result<BatchSummary> {
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory {}", output.display()))?;

    let ids = IdAllocator::new(config.ids);
    let options = config.m2_options();
    let progress = create_progress_bar(inputs.len() as u64, "Writing models", quiet);

    let built: Vec<(&PathBuf, Result<BuiltModel>)> = inputs
        .par_iter()
        .map(|input| {
            let result = build_model(input, &options);
            if result.is_err() {
                progress.inc(1);
            }
            (input, result)
        })
        .collect();

    // identifiers follow input order, independent of build scheduling
    let mut planned = Vec::with_capacity(built.len());
    for (input, result) in built {
        planned.push((input, result.and_then(|built| built.with_ids(&ids))));
    }

    let results: Vec<(&PathBuf, Result<ModelRecord>)> = planned
        .into_par_iter()
        .map(|(input, result)| {
            let was_built = result.is_ok();
            let result = result.and_then(|built| built.write(output));
            if was_built {
                progress.inc(1);
            }
            (input, result)
        })
        .collect();
    progress.finish_and_clear();

    let mut summary = BatchSummary::default();
    let mut records = Vec::new();
    for (input, result) in results {
        summary.record(&result);
        match result {
            Ok(record) => records.push(record),
            Err(e) => log::error!("Skipping {}: {e:#}", input.display()),
        }
    }

    records.sort_by(|a, b| a.name.cmp(&b.name));
    if !records.is_empty() {
        write_manifest(&output.join(MANIFEST_NAME), &records)?;
    }
    summary.into_result("models")
}

/// A model built in memory, with identifiers once they are assigned
struct BuiltModel {
    name: String,
    model: M2Model,
    creature_model_id: u32,
    creature_display_info_id: u32,
}

impl BuiltModel {
    fn with_ids(mut self, ids: &IdAllocator) -> Result<Self> {
        self.creature_model_id = ids.next(IdKind::CreatureModel)?;
        self.creature_display_info_id = ids.next(IdKind::CreatureDisplayInfo)?;
        log::debug!(
            "Model '{}' has creature model id {}, display info id {}",
            self.name,
            self.creature_model_id,
            self.creature_display_info_id
        );
        Ok(self)
    }

    fn write(self, output: &Path) -> Result<ModelRecord> {
        let file = self
            .model
            .write_to_dir(output)
            .with_context(|| format!("Failed to write model '{}'", self.name))?;
        Ok(ModelRecord {
            name: self.name,
            file,
            creature_model_id: self.creature_model_id,
            creature_display_info_id: self.creature_display_info_id,
        })
    }
}

fn build_model(input: &Path, options: &M2WriteOptions) -> Result<BuiltModel> {
    let description: ObjectModel = load_document(input)?;
    let model = M2Model::from_object_model(&description, options)
        .with_context(|| format!("Failed to build model '{}'", description.name))?;
    Ok(BuiltModel {
        name: description.name,
        model,
        creature_model_id: 0,
        creature_display_info_id: 0,
    })
}
