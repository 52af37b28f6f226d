//! Reconciles the SOL and TEW billing/wordcount reports.
//!
//! Each report is mapped to canonical column names, normalized to one row
//! per (project, target, vendor) group, and the two are outer-joined into a
//! table with a status per group and the SOL/TEW volumes side by side.

pub mod error;
pub mod loader;
pub mod locale;
pub mod mapper;
pub mod merge;
pub mod model;
pub mod report;
pub mod schema;
pub mod sol;
pub mod status;
pub mod tew;

#[cfg(feature = "python")]
mod python;

pub use error::DiffCountError;
pub use merge::merge;
pub use model::DiffCountModel;
pub use report::{ReportConfig, StatusSummary};
pub use sol::{normalize_sol, prepare_sol};
pub use status::{classify, Status};
pub use tew::{normalize_tew, prepare_tew};

#[cfg(feature = "python")]
#[pyo3::pymodule]
fn diffcount(m: &pyo3::Bound<'_, pyo3::types::PyModule>) -> pyo3::PyResult<()> {
    python::register(m)
}
