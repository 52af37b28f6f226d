#[cfg(feature = "python")]
use pyo3::exceptions::{PyKeyError, PyRuntimeError};
#[cfg(feature = "python")]
use pyo3::PyErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiffCountError {
    /// A required header is absent from an input report. Usually means the
    /// wrong file was supplied for that side.
    #[error("Invalid {report} format. Column named <{header}> not found")]
    MissingColumn { report: String, header: String },

    /// The fixed output order references columns the merged table lacks.
    #[error("Columns missing from the final column order: {}", missing.join(", "))]
    ColumnOrder { missing: Vec<String> },

    #[error("Data not loaded: {0}")]
    NotLoaded(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("InvalidData: {0}")]
    InvalidData(String),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("Workbook error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),
}

impl DiffCountError {
    /// True when the error means the input file is not the expected report.
    pub fn is_wrong_file(&self) -> bool {
        matches!(self, DiffCountError::MissingColumn { .. })
    }
}

#[cfg(feature = "python")]
impl From<DiffCountError> for PyErr {
    fn from(err: DiffCountError) -> PyErr {
        match err {
            DiffCountError::MissingColumn { .. } => PyKeyError::new_err(err.to_string()),
            other => PyRuntimeError::new_err(other.to_string()),
        }
    }
}
