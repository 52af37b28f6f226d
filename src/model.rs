use std::path::{Path, PathBuf};

use polars::prelude::*;
use tracing::info;

use crate::error::DiffCountError;
use crate::loader::read_table;
use crate::merge::merge;
use crate::report::{status_counts, write_report, ReportConfig};
use crate::sol::prepare_sol;
use crate::tew::prepare_tew;

/// Holds the two normalized reports and reconciles them.
///
/// Relative paths given to the loaders are resolved against `base_path`.
pub struct DiffCountModel {
    base_path: PathBuf,
    sol: Option<DataFrame>,
    tew: Option<DataFrame>,
}

impl DiffCountModel {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            sol: None,
            tew: None,
        }
    }

    // ── Data loading ────────────────────────────────────────────────────────

    /// Read, map and normalize a SOL report. Returns the normalized table.
    pub fn load_sol(&mut self, filename: impl AsRef<Path>) -> Result<&DataFrame, DiffCountError> {
        let raw = read_table(&self.base_path.join(filename))?;
        self.set_sol(&raw)
    }

    /// Read, map and normalize a TEW report. Returns the normalized table.
    pub fn load_tew(&mut self, filename: impl AsRef<Path>) -> Result<&DataFrame, DiffCountError> {
        let raw = read_table(&self.base_path.join(filename))?;
        self.set_tew(&raw)
    }

    /// Normalize an already loaded raw SOL table.
    pub fn set_sol(&mut self, raw: &DataFrame) -> Result<&DataFrame, DiffCountError> {
        let df = prepare_sol(raw)?;
        info!(rows = df.height(), "processed SOL report");
        Ok(&*self.sol.insert(df))
    }

    /// Normalize an already loaded raw TEW table.
    pub fn set_tew(&mut self, raw: &DataFrame) -> Result<&DataFrame, DiffCountError> {
        let df = prepare_tew(raw)?;
        info!(rows = df.height(), "processed TEW report");
        Ok(&*self.tew.insert(df))
    }

    // ── Reconciliation ──────────────────────────────────────────────────────

    pub fn reconcile(&self) -> Result<DataFrame, DiffCountError> {
        let sol = self
            .sol
            .as_ref()
            .ok_or_else(|| DiffCountError::NotLoaded("SOL report".into()))?;
        let tew = self
            .tew
            .as_ref()
            .ok_or_else(|| DiffCountError::NotLoaded("TEW report".into()))?;

        let merged = merge(sol, tew)?;
        let summary = status_counts(&merged)?;
        info!(rows = merged.height(), "merged reports");
        for (status, n) in &summary.counts {
            info!(status = status.as_str(), rows = n, "status count");
        }
        Ok(merged)
    }

    /// Reconcile and write the report to `output` (relative to `base_path`).
    pub fn write_report(
        &self,
        output: impl AsRef<Path>,
        config: &ReportConfig,
    ) -> Result<DataFrame, DiffCountError> {
        let merged = self.reconcile()?;
        write_report(&merged, &self.base_path.join(output), config)?;
        Ok(merged)
    }

    // ── Properties ──────────────────────────────────────────────────────────

    pub fn sol_df(&self) -> Option<&DataFrame> {
        self.sol.as_ref()
    }

    pub fn tew_df(&self) -> Option<&DataFrame> {
        self.tew.as_ref()
    }
}
