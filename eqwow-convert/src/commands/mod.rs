//! Command implementations for each output format

pub mod m2;
pub mod wmo;

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Outcome of a batch of independent conversions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn record<T>(&mut self, result: &Result<T>) {
        if result.is_ok() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }

    /// Fail the run only when nothing at all was converted
    pub fn into_result(self, what: &str) -> Result<Self> {
        if self.succeeded == 0 && self.failed > 0 {
            anyhow::bail!("No {what} could be converted ({} failed)", self.failed);
        }
        if self.failed > 0 {
            log::warn!(
                "Converted {} {what}, {} failed",
                self.succeeded,
                self.failed
            );
        } else {
            log::info!("Converted {} {what}", self.succeeded);
        }
        Ok(self)
    }
}

/// Write `records` as pretty JSON to `path`
pub(crate) fn write_manifest<T: Serialize>(path: &Path, records: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    log::debug!("Wrote manifest {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_partial_failure_is_ok() {
        let mut summary = BatchSummary::default();
        summary.record(&Ok::<_, anyhow::Error>(()));
        summary.record::<()>(&Err(anyhow::anyhow!("broken")));
        assert_eq!(
            summary.into_result("models").unwrap(),
            BatchSummary {
                succeeded: 1,
                failed: 1
            }
        );
    }

    #[test]
    fn test_summary_total_failure_is_err() {
        let mut summary = BatchSummary::default();
        summary.record::<()>(&Err(anyhow::anyhow!("broken")));
        let err = summary.into_result("models").unwrap_err();
        assert_eq!(err.to_string(), "No models could be converted (1 failed)");
    }
}
