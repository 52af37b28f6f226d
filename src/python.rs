use pyo3::prelude::*;
use pyo3::types::PyModule;
use pyo3_polars::PyDataFrame;

use crate::model::DiffCountModel;
use crate::report::ReportConfig;
use crate::schema::{key, merged, sol, tew};
use crate::status::Status;

#[pyclass(name = "DiffCount")]
pub struct PyDiffCount {
    inner: DiffCountModel,
}

#[pymethods]
impl PyDiffCount {
    #[new]
    #[pyo3(signature = (base_path=None))]
    fn new(base_path: Option<String>) -> Self {
        Self {
            inner: DiffCountModel::new(base_path.unwrap_or_else(|| ".".to_string())),
        }
    }

    /// Load a SOL report (.csv, .xlsx, ...). Returns the normalized table.
    fn load_sol(&mut self, filename: &str) -> PyResult<PyDataFrame> {
        let df = self.inner.load_sol(filename)?;
        Ok(PyDataFrame(df.clone()))
    }

    /// Load a TEW report (.csv, .xlsx, ...). Returns the normalized table.
    fn load_tew(&mut self, filename: &str) -> PyResult<PyDataFrame> {
        let df = self.inner.load_tew(filename)?;
        Ok(PyDataFrame(df.clone()))
    }

    fn reconcile(&self) -> PyResult<PyDataFrame> {
        Ok(PyDataFrame(self.inner.reconcile()?))
    }

    /// Reconcile and save. `.csv` writes a flat file, anything else a
    /// styled workbook.
    #[pyo3(signature = (output, sheet_name=None))]
    fn write_report(&self, output: &str, sheet_name: Option<String>) -> PyResult<PyDataFrame> {
        let mut config = ReportConfig::default();
        if let Some(name) = sheet_name {
            config.sheet_name = name;
        }
        Ok(PyDataFrame(self.inner.write_report(output, &config)?))
    }

    #[getter]
    fn sol_df(&self) -> Option<PyDataFrame> {
        self.inner.sol_df().cloned().map(PyDataFrame)
    }

    #[getter]
    fn tew_df(&self) -> Option<PyDataFrame> {
        self.inner.tew_df().cloned().map(PyDataFrame)
    }
}

/// Map and normalize a raw SOL DataFrame (native headers).
#[pyfunction]
fn prepare_sol(raw: PyDataFrame) -> PyResult<PyDataFrame> {
    Ok(PyDataFrame(crate::sol::prepare_sol(&raw.0)?))
}

/// Map and normalize a raw TEW DataFrame (native headers).
#[pyfunction]
fn prepare_tew(raw: PyDataFrame) -> PyResult<PyDataFrame> {
    Ok(PyDataFrame(crate::tew::prepare_tew(&raw.0)?))
}

/// Normalize a SOL DataFrame that already has canonical column names.
#[pyfunction]
fn normalize_sol(mapped: PyDataFrame) -> PyResult<PyDataFrame> {
    Ok(PyDataFrame(crate::sol::normalize_sol(mapped.0)?))
}

/// Normalize a TEW DataFrame that already has canonical column names.
#[pyfunction]
fn normalize_tew(mapped: PyDataFrame) -> PyResult<PyDataFrame> {
    Ok(PyDataFrame(crate::tew::normalize_tew(mapped.0)?))
}

/// Outer-join two normalized tables and classify each group.
#[pyfunction]
fn merge(sol_df: PyDataFrame, tew_df: PyDataFrame) -> PyResult<PyDataFrame> {
    Ok(PyDataFrame(crate::merge::merge(&sol_df.0, &tew_df.0)?))
}

/// Export schema constants as Python submodules
fn add_schema_exports(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Key
    let key_mod = PyModule::new(m.py(), "key")?;
    key_mod.add("PROJECT_ID", key::PROJECT_ID)?;
    key_mod.add("PROJECT_NAME", key::PROJECT_NAME)?;
    key_mod.add("TARGET", key::TARGET)?;
    key_mod.add("TGROUP", key::TGROUP)?;
    key_mod.add("JOIN", key::JOIN.to_vec())?;
    m.add_submodule(&key_mod)?;

    // SOL
    let sol_mod = PyModule::new(m.py(), "sol")?;
    sol_mod.add("TOTAL", sol::TOTAL)?;
    sol_mod.add("COLUMN_MAPPING", sol::COLUMN_MAPPING.to_vec())?;
    sol_mod.add("UNIT_CATEGORIES", sol::UNIT_CATEGORIES.to_vec())?;
    m.add_submodule(&sol_mod)?;

    // TEW
    let tew_mod = PyModule::new(m.py(), "tew")?;
    tew_mod.add("NAME", tew::NAME)?;
    tew_mod.add("TOTAL", tew::TOTAL)?;
    tew_mod.add("COLUMN_MAPPING", tew::COLUMN_MAPPING.to_vec())?;
    tew_mod.add("CATEGORIES", tew::CATEGORIES.to_vec())?;
    m.add_submodule(&tew_mod)?;

    // Merged
    let merged_mod = PyModule::new(m.py(), "merged")?;
    merged_mod.add("STATUS", merged::STATUS)?;
    merged_mod.add("FINAL_COLUMN_ORDER", merged::FINAL_COLUMN_ORDER.to_vec())?;
    merged_mod.add("FINAL_COLUMN_PAIRS", merged::FINAL_COLUMN_PAIRS.to_vec())?;
    m.add_submodule(&merged_mod)?;

    // Status values
    let status_mod = PyModule::new(m.py(), "status")?;
    for status in Status::ALL {
        status_mod.add(status.as_str(), status.as_str())?;
    }
    m.add_submodule(&status_mod)?;

    Ok(())
}

pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyDiffCount>()?;
    m.add_function(wrap_pyfunction!(prepare_sol, m)?)?;
    m.add_function(wrap_pyfunction!(prepare_tew, m)?)?;
    m.add_function(wrap_pyfunction!(normalize_sol, m)?)?;
    m.add_function(wrap_pyfunction!(normalize_tew, m)?)?;
    m.add_function(wrap_pyfunction!(merge, m)?)?;
    add_schema_exports(m)?;
    Ok(())
}
