use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use polars::prelude::*;
use tracing::info;

use crate::error::DiffCountError;

const SPREADSHEET_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xls", "xlsb", "ods"];

/// Read a report into a DataFrame with every column as String.
///
/// `.csv` goes through the polars reader; spreadsheet formats read the
/// first sheet with calamine, first row as headers. Header names are
/// trimmed either way.
pub fn read_table(path: &Path) -> Result<DataFrame, DiffCountError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let df = if extension == "csv" {
        read_csv_as_strings(path)?
    } else if SPREADSHEET_EXTENSIONS.contains(&extension.as_str()) {
        read_sheet_as_strings(path)?
    } else {
        return Err(DiffCountError::UnsupportedFormat(path.display().to_string()));
    };

    let df = trim_column_names(df)?;
    info!(path = %path.display(), rows = df.height(), "read report");
    Ok(df)
}

fn read_csv_as_strings(path: &Path) -> Result<DataFrame, DiffCountError> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0)) // all columns as String
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    Ok(df)
}

fn read_sheet_as_strings(path: &Path) -> Result<DataFrame, DiffCountError> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| DiffCountError::InvalidData(format!("{} has no sheets", path.display())))?;
    let range = workbook.worksheet_range(&sheet_name)?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(DataFrame::empty());
    };
    // Styled but blank columns come back with an empty header; skip them.
    let headers: Vec<(usize, String)> = header_row
        .iter()
        .enumerate()
        .filter_map(|(i, cell)| cell_text(cell).map(|name| (i, name)))
        .collect();

    let mut values: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for row in rows {
        for ((i, _), column) in headers.iter().zip(values.iter_mut()) {
            column.push(row.get(*i).and_then(cell_text));
        }
    }

    let columns: Vec<Column> = headers
        .iter()
        .zip(values)
        .map(|((_, name), column)| Series::new(name.as_str().into(), column).into())
        .collect();

    Ok(DataFrame::new(columns)?)
}

/// Text of one spreadsheet cell; `None` for empty cells. Whole floats lose
/// their fractional part so numeric ids read the same as in a CSV export.
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.trim().is_empty() => None,
        Data::String(s) => Some(s.clone()),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => Some(format!("{}", *f as i64)),
        Data::Float(f) => Some(f.to_string()),
        Data::Int(i) => Some(i.to_string()),
        other => Some(other.to_string()),
    }
}

fn trim_column_names(mut df: DataFrame) -> Result<DataFrame, DiffCountError> {
    let trimmed: Vec<String> = df
        .get_column_names_str()
        .iter()
        .map(|c| c.trim().to_string())
        .collect();
    df.set_column_names(trimmed.as_slice())?;
    Ok(df)
}
