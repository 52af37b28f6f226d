//! Output side of the reconciliation: fixed column order, status summary,
//! per-category disagreement flags, and the `.xlsx` / `.csv` writers.
use std::collections::BTreeSet;
use std::fmt;
use std::fs::File;
use std::path::Path;

use polars::datatypes::AnyValue;
use polars::prelude::*;
use rust_xlsxwriter::{
    Color, ConditionalFormatCell, ConditionalFormatCellRule, ConditionalFormatFormula, Format,
    Workbook, Worksheet,
};
use tracing::{info, warn};

use crate::error::DiffCountError;
use crate::schema::merged;
use crate::status::Status;

// ── Config ──────────────────────────────────────────────────────────────────

/// Options for the rendered workbook.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub sheet_name: String,
    /// Keep the header row visible while scrolling.
    pub freeze_header: bool,
    /// Highlight TEW cells that differ from their SOL counterpart.
    pub highlight_pairs: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            sheet_name: "Sheet1".to_string(),
            freeze_header: true,
            highlight_pairs: true,
        }
    }
}

// ── Column order ────────────────────────────────────────────────────────────

/// Put the fixed report columns first, in order, followed by any other
/// columns the table carries.
pub fn order_columns(df: &DataFrame) -> Result<DataFrame, DiffCountError> {
    let present: BTreeSet<&str> = df.get_column_names_str().into_iter().collect();
    let missing: Vec<String> = merged::FINAL_COLUMN_ORDER
        .iter()
        .filter(|c| !present.contains(*c))
        .map(|c| c.to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    if !missing.is_empty() {
        return Err(DiffCountError::ColumnOrder { missing });
    }

    Ok(df.select(ordered_names(df))?)
}

/// Like [`order_columns`], but a missing fixed column only logs a warning
/// and the present columns are ordered as well as possible.
pub fn order_columns_lenient(df: &DataFrame) -> Result<DataFrame, DiffCountError> {
    match order_columns(df) {
        Err(DiffCountError::ColumnOrder { missing }) => {
            warn!(
                missing = %missing.join(", "),
                "final table lacks columns from the fixed order"
            );
            Ok(df.select(ordered_names(df))?)
        }
        other => other,
    }
}

fn ordered_names(df: &DataFrame) -> Vec<String> {
    let present = df.get_column_names_str();
    let mut names: Vec<String> = merged::FINAL_COLUMN_ORDER
        .iter()
        .filter(|c| present.contains(*c))
        .map(|c| c.to_string())
        .collect();
    names.extend(
        present
            .iter()
            .filter(|c| !merged::FINAL_COLUMN_ORDER.contains(*c))
            .map(|c| c.to_string()),
    );
    names
}

// ── Disagreement flags ──────────────────────────────────────────────────────

pub fn differs_column(tew_col: &str) -> String {
    format!("{}_differs", tew_col.trim_start_matches("tew_"))
}

/// Append one Boolean column per compared category pair, true where the
/// SOL and TEW values differ.
pub fn flag_disagreements(df: &DataFrame) -> Result<DataFrame, DiffCountError> {
    let flags: Vec<Expr> = merged::FINAL_COLUMN_PAIRS
        .iter()
        .map(|(sol_col, tew_col)| col(*sol_col).neq(col(*tew_col)).alias(differs_column(tew_col)))
        .collect();

    Ok(df.clone().lazy().with_columns(flags).collect()?)
}

// ── Status summary ──────────────────────────────────────────────────────────

/// Row count per status of a merged table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSummary {
    pub counts: Vec<(Status, usize)>,
    pub total: usize,
}

impl StatusSummary {
    pub fn count(&self, status: Status) -> usize {
        self.counts
            .iter()
            .find(|(s, _)| *s == status)
            .map_or(0, |(_, n)| *n)
    }
}

impl fmt::Display for StatusSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Rows by status:")?;
        for (status, n) in &self.counts {
            writeln!(f, "\t{:20} : {}", status.as_str(), n)?;
        }
        write!(f, "\n\t{:20} : {}", "Total", self.total)
    }
}

pub fn status_counts(df: &DataFrame) -> Result<StatusSummary, DiffCountError> {
    let statuses = df.column(merged::STATUS)?.str()?;

    let mut counts: Vec<(Status, usize)> = Status::ALL.iter().map(|s| (*s, 0)).collect();
    for value in statuses.into_iter().flatten() {
        let status = Status::parse(value)
            .ok_or_else(|| DiffCountError::InvalidData(format!("Unknown status: {value}")))?;
        if let Some(entry) = counts.iter_mut().find(|(s, _)| *s == status) {
            entry.1 += 1;
        }
    }

    Ok(StatusSummary {
        counts,
        total: df.height(),
    })
}

// ── Writers ─────────────────────────────────────────────────────────────────

/// Write the merged table, picking the format from the file extension:
/// `.csv` gets a flat file with disagreement flags, anything else a styled
/// workbook.
pub fn write_report(
    df: &DataFrame,
    path: &Path,
    config: &ReportConfig,
) -> Result<(), DiffCountError> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    if is_csv {
        write_csv(df, path)
    } else {
        write_xlsx(df, path, config)
    }
}

pub fn write_csv(df: &DataFrame, path: &Path) -> Result<(), DiffCountError> {
    let ordered = order_columns_lenient(df)?;
    let mut flagged = flag_disagreements(&ordered)?;

    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut flagged)?;

    info!(path = %path.display(), rows = flagged.height(), "saved report");
    Ok(())
}

pub fn write_xlsx(
    df: &DataFrame,
    path: &Path,
    config: &ReportConfig,
) -> Result<(), DiffCountError> {
    let data = order_columns_lenient(df)?;
    let names = data.get_column_names_str();

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&config.sheet_name)?;

    let header = Format::new().set_bold();
    for (c, name) in names.iter().enumerate() {
        worksheet.write_string_with_format(0, c as u16, *name, &header)?;
    }

    for (c, column) in data.get_columns().iter().enumerate() {
        // `Series::iter` walks the first chunk only.
        let series = column.as_materialized_series().rechunk();
        for (r, value) in series.iter().enumerate() {
            write_cell(worksheet, r as u32 + 1, c as u16, value)?;
        }
    }

    let last_row = data.height() as u32;
    if last_row > 0 {
        if let Some(status_col) = names.iter().position(|n| *n == merged::STATUS) {
            add_status_formats(worksheet, last_row, status_col as u16)?;
        }
        if config.highlight_pairs {
            add_pair_formats(worksheet, last_row, &names)?;
        }
    }

    if config.freeze_header {
        worksheet.set_freeze_panes(1, 0)?;
    }
    worksheet.autofit();

    workbook.save(path)?;
    info!(path = %path.display(), rows = data.height(), "saved report");
    Ok(())
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    column: u16,
    value: AnyValue,
) -> Result<(), DiffCountError> {
    match value {
        AnyValue::Null => {}
        AnyValue::String(s) => {
            worksheet.write_string(row, column, s)?;
        }
        AnyValue::StringOwned(s) => {
            worksheet.write_string(row, column, s.as_str())?;
        }
        AnyValue::Boolean(b) => {
            worksheet.write_boolean(row, column, b)?;
        }
        AnyValue::Float64(f) => {
            worksheet.write_number(row, column, f)?;
        }
        AnyValue::Float32(f) => {
            worksheet.write_number(row, column, f as f64)?;
        }
        AnyValue::Int64(i) => {
            worksheet.write_number(row, column, i as f64)?;
        }
        AnyValue::Int32(i) => {
            worksheet.write_number(row, column, i as f64)?;
        }
        AnyValue::UInt32(i) => {
            worksheet.write_number(row, column, i as f64)?;
        }
        other => {
            worksheet.write_string(row, column, format!("{other}"))?;
        }
    }
    Ok(())
}

fn fill(background: u32, font: u32) -> Format {
    Format::new()
        .set_background_color(Color::RGB(background))
        .set_font_color(Color::RGB(font))
}

fn bad_format() -> Format {
    fill(0xFFC7CE, 0x9C0006)
}

/// One cell rule per status value. The rules are mutually exclusive, so
/// the order they are added in does not matter.
fn add_status_formats(
    worksheet: &mut Worksheet,
    last_row: u32,
    status_col: u16,
) -> Result<(), DiffCountError> {
    let styles = [
        (Status::Mismatch, bad_format()),
        (Status::Ok, fill(0xC6EFCE, 0x006100)),
        (Status::TewMissing, fill(0xCCC0DA, 0x403151)),
        (Status::SolMissing, fill(0xFDE9D9, 0x974706)),
    ];

    for (status, format) in styles {
        let quoted = format!("\"{}\"", status.as_str());
        let rule = ConditionalFormatCell::new()
            .set_rule(ConditionalFormatCellRule::EqualTo(quoted.as_str()))
            .set_format(format);
        worksheet.add_conditional_format(1, status_col, last_row, status_col, &rule)?;
    }
    Ok(())
}

/// Red TEW cell wherever it differs from the SOL cell of the same pair.
fn add_pair_formats(
    worksheet: &mut Worksheet,
    last_row: u32,
    names: &[&str],
) -> Result<(), DiffCountError> {
    for (sol_col, tew_col) in merged::FINAL_COLUMN_PAIRS {
        let (Some(sol_i), Some(tew_i)) = (
            names.iter().position(|n| *n == sol_col),
            names.iter().position(|n| *n == tew_col),
        ) else {
            continue;
        };
        let formula = format!(
            "=${}2<>${}2",
            column_letter(sol_i as u16),
            column_letter(tew_i as u16)
        );
        let rule = ConditionalFormatFormula::new()
            .set_rule(formula.as_str())
            .set_format(bad_format());
        worksheet.add_conditional_format(1, tew_i as u16, last_row, tew_i as u16, &rule)?;
    }
    Ok(())
}

/// Zero-based column index to its spreadsheet letters (0 -> A, 26 -> AA).
fn column_letter(index: u16) -> String {
    let mut n = index as u32 + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::merged::FINAL_COLUMN_ORDER;
    use calamine::Reader;

    /// A merged table with every fixed column, rows given as
    /// (status, sol_total, tew_total); every category is 1.0 on both sides
    /// except `tew_95`, which is 2.0.
    fn merged_table(rows: &[(&str, f64, f64)]) -> DataFrame {
        let n = rows.len();
        let mut columns: Vec<Column> = Vec::new();
        for name in FINAL_COLUMN_ORDER.iter().rev() {
            let column: Column = match *name {
                "status" => Series::new((*name).into(), rows.iter().map(|r| r.0).collect::<Vec<_>>()).into(),
                "sol_total" => Series::new((*name).into(), rows.iter().map(|r| r.1).collect::<Vec<_>>()).into(),
                "tew_total" => Series::new((*name).into(), rows.iter().map(|r| r.2).collect::<Vec<_>>()).into(),
                "tew_95" => Series::new((*name).into(), vec![2.0; n]).into(),
                n_ if n_.starts_with("sol_") || n_.starts_with("tew_") => {
                    Series::new((*name).into(), vec![1.0; n]).into()
                }
                _ => Series::new((*name).into(), vec!["x"; n]).into(),
            };
            columns.push(column);
        }
        DataFrame::new(columns).unwrap()
    }

    #[test]
    fn fixed_columns_come_first_and_extras_are_appended() {
        let mut df = merged_table(&[("OK", 1.0, 1.0)]);
        df.with_column(Series::new("note".into(), vec!["extra"])).unwrap();

        let ordered = order_columns(&df).unwrap();
        let names = ordered.get_column_names_str();
        assert_eq!(&names[..FINAL_COLUMN_ORDER.len()], &FINAL_COLUMN_ORDER[..]);
        assert_eq!(names.last(), Some(&"note"));
    }

    #[test]
    fn missing_fixed_column_is_a_typed_error() {
        let df = merged_table(&[("OK", 1.0, 1.0)]).drop("tew_mt").unwrap().drop("sol_ice").unwrap();

        match order_columns(&df).unwrap_err() {
            DiffCountError::ColumnOrder { missing } => {
                assert_eq!(missing, vec!["sol_ice".to_string(), "tew_mt".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }

        let lenient = order_columns_lenient(&df).unwrap();
        let names = lenient.get_column_names_str();
        assert_eq!(names.len(), FINAL_COLUMN_ORDER.len() - 2);
        assert_eq!(names[0], "projectId");
        assert_eq!(names[4], "status");
    }

    #[test]
    fn disagreement_flags_compare_pairs() {
        let df = merged_table(&[("OK", 1.0, 1.0)]);
        let flagged = flag_disagreements(&df).unwrap();

        let fuzzy = flagged.column(&differs_column("tew_95")).unwrap().bool().unwrap();
        assert_eq!(fuzzy.get(0), Some(true));
        let no_match = flagged.column("no_match_differs").unwrap().bool().unwrap();
        assert_eq!(no_match.get(0), Some(false));
        assert!(flagged.column("mt_differs").is_err());
    }

    #[test]
    fn summary_counts_every_status() {
        let df = merged_table(&[
            ("OK", 1.0, 1.0),
            ("MISMATCH", 1.0, 2.0),
            ("OK", 3.0, 3.0),
            ("SOL_MISSING", 0.0, 3.0),
        ]);

        let summary = status_counts(&df).unwrap();
        assert_eq!(summary.total, 4);
        assert_eq!(summary.count(Status::Ok), 2);
        assert_eq!(summary.count(Status::Mismatch), 1);
        assert_eq!(summary.count(Status::SolMissing), 1);
        assert_eq!(summary.count(Status::TewMissing), 0);
        assert!(summary.to_string().contains("TEW_MISSING"));
    }

    #[test]
    fn column_letters() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(36), "AK");
    }

    #[test]
    fn writes_csv_with_flags() {
        let df = merged_table(&[("MISMATCH", 1.0, 2.0)]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        write_report(&df, &path, &ReportConfig::default()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let header = text.lines().next().unwrap();
        assert!(header.starts_with("projectId,projectName,target,tgroup,status,sol_total,tew_total"));
        assert!(header.ends_with("edc7_differs"));
    }

    #[test]
    fn writes_every_cell_of_a_multi_chunk_table() {
        let mut df = merged_table(&[("OK", 1.0, 1.0)]);
        df.vstack_mut(&merged_table(&[("MISMATCH", 2.0, 3.0), ("SOL_MISSING", 0.0, 4.0)]))
            .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chunks.xlsx");

        write_report(&df, &path, &ReportConfig::default()).unwrap();

        let mut workbook: calamine::Xlsx<_> = calamine::open_workbook(&path).unwrap();
        let range = workbook.worksheet_range("Sheet1").unwrap();
        assert_eq!(range.height(), 4);
        let status_col = FINAL_COLUMN_ORDER.iter().position(|c| *c == "status").unwrap();
        let tew_total_col = FINAL_COLUMN_ORDER.iter().position(|c| *c == "tew_total").unwrap();
        assert_eq!(
            range.get((3, status_col)),
            Some(&calamine::Data::String("SOL_MISSING".into()))
        );
        assert_eq!(range.get((2, tew_total_col)), Some(&calamine::Data::Float(3.0)));
    }

    #[test]
    fn writes_xlsx_workbook() {
        let df = merged_table(&[("OK", 1.0, 1.0), ("TEW_MISSING", 4.0, 0.0)]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");

        write_report(&df, &path, &ReportConfig::default()).unwrap();

        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
