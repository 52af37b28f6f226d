use polars::prelude::*;
use tracing::debug;

use crate::error::DiffCountError;

/// Select the native columns named by `mapping` and rename them to their
/// canonical names, in mapping order. Every other column is dropped.
///
/// `report` only labels the error: a missing header almost always means
/// the file for the other side was picked.
pub fn select_and_rename(
    df: &DataFrame,
    mapping: &[(&str, &str)],
    report: &str,
) -> Result<DataFrame, DiffCountError> {
    require_columns(df, mapping.iter().map(|(_, native)| *native), report)?;

    let exprs: Vec<Expr> = mapping
        .iter()
        .map(|(canonical, native)| col(*native).alias(*canonical))
        .collect();

    let mapped = df.clone().lazy().select(exprs).collect()?;
    debug!(report, columns = mapping.len(), rows = mapped.height(), "mapped report columns");
    Ok(mapped)
}

/// Parse volume columns to Float64.
///
/// String columns are trimmed first; values that still don't parse become
/// null. Columns of any other dtype are cast directly.
pub fn parse_numeric(df: DataFrame, columns: &[&str]) -> Result<DataFrame, DiffCountError> {
    let mut exprs = Vec::with_capacity(columns.len());
    for &name in columns {
        let expr = if df.column(name)?.dtype() == &DataType::String {
            col(name)
                .str()
                .strip_chars(lit(" \t\r\n"))
                .cast(DataType::Float64)
        } else {
            col(name).cast(DataType::Float64)
        };
        exprs.push(expr);
    }

    Ok(df.lazy().with_columns(exprs).collect()?)
}

fn require_columns<'a>(
    df: &DataFrame,
    required: impl IntoIterator<Item = &'a str>,
    report: &str,
) -> Result<(), DiffCountError> {
    for col_name in required {
        if df.column(col_name).is_err() {
            return Err(DiffCountError::MissingColumn {
                report: report.to_string(),
                header: col_name.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renames_and_drops_unmapped_columns() {
        let raw = df!(
            "Extra" => &["x"],
            "Name Header" => &["Proj"],
            "Id Header" => &["P1"],
        )
        .unwrap();

        let mapped =
            select_and_rename(&raw, &[("projectId", "Id Header"), ("projectName", "Name Header")], "SOL")
                .unwrap();

        assert_eq!(mapped.get_column_names_str(), vec!["projectId", "projectName"]);
        assert_eq!(mapped.column("projectId").unwrap().str().unwrap().get(0), Some("P1"));
    }

    #[test]
    fn missing_header_is_reported() {
        let raw = df!("Id Header" => &["P1"]).unwrap();

        let err = select_and_rename(&raw, &[("projectId", "Id Header"), ("target", "Target")], "TEW")
            .unwrap_err();

        match err {
            DiffCountError::MissingColumn { report, header } => {
                assert_eq!(report, "TEW");
                assert_eq!(header, "Target");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn header_match_is_case_sensitive() {
        let raw = df!("id header" => &["P1"]).unwrap();
        let err = select_and_rename(&raw, &[("projectId", "Id Header")], "SOL").unwrap_err();
        assert!(err.is_wrong_file());
    }

    #[test]
    fn parses_padded_strings_and_keeps_garbage_as_null() {
        let raw = df!(
            "a" => &[Some(" 12.5 "), Some("-3"), Some("n/a"), None],
            "b" => &[1i64, 2, 3, 4],
        )
        .unwrap();

        let parsed = parse_numeric(raw, &["a", "b"]).unwrap();
        let a = parsed.column("a").unwrap().f64().unwrap();
        assert_eq!(a.get(0), Some(12.5));
        assert_eq!(a.get(1), Some(-3.0));
        assert_eq!(a.get(2), None);
        assert_eq!(a.get(3), None);
        assert_eq!(parsed.column("b").unwrap().f64().unwrap().get(3), Some(4.0));
    }
}
