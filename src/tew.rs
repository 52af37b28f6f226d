use polars::prelude::*;
use tracing::debug;

use crate::error::DiffCountError;
use crate::locale::{harmonize_tew_target, rewrite_column};
use crate::mapper::{parse_numeric, select_and_rename};
use crate::schema::{key, tew};
use crate::sol::group_exprs;

/// Map the native TEW headers and normalize the result.
pub fn prepare_tew(raw: &DataFrame) -> Result<DataFrame, DiffCountError> {
    let mapped = select_and_rename(raw, &tew::COLUMN_MAPPING, "TEW")?;
    normalize_tew(mapped)
}

/// Normalize a mapped TEW table to one row per
/// (projectId, tew_name, target, tgroup), with the fuzzy match/repeat
/// halves folded into one column per tier.
pub fn normalize_tew(df: DataFrame) -> Result<DataFrame, DiffCountError> {
    let volumes = tew::volume_columns();
    let df = parse_numeric(df, &volumes)?;
    let rows_in = df.height();

    let df = df
        .lazy()
        .filter(col(tew::TOTAL).neq_missing(lit(0.0)))
        .collect()?;

    let df = rewrite_column(df, key::TARGET, harmonize_tew_target)?;

    let sums: Vec<Expr> = volumes.iter().map(|c| col(*c).sum()).collect();

    let fuzzy: Vec<Expr> = tew::FUZZY_TIERS
        .iter()
        .map(|(combined, matches, repeats)| (col(*matches) + col(*repeats)).alias(*combined))
        .collect();

    // Sub-columns are left behind by selecting the final layout.
    let mut layout = group_exprs(&tew::GROUP_BY);
    layout.push(col(tew::TOTAL));
    layout.extend(tew::CATEGORIES.iter().map(|c| col(*c)));

    let out = df
        .lazy()
        .group_by(group_exprs(&tew::GROUP_BY))
        .agg(sums)
        .with_columns(fuzzy)
        .select(layout)
        .sort_by_exprs(
            group_exprs(&tew::GROUP_BY),
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .collect()?;

    debug!(rows_in, groups = out.height(), "normalized TEW report");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mapped TEW table with every volume at 0 except the ones given.
    fn tew_rows(targets: &[&str], names: &[&str], overrides: &[(&str, Vec<f64>)]) -> DataFrame {
        let n = targets.len();
        let mut columns: Vec<Column> = vec![
            Series::new(key::PROJECT_ID.into(), vec!["P1"; n]).into(),
            Series::new(key::TARGET.into(), targets).into(),
            Series::new(key::TGROUP.into(), vec!["V1"; n]).into(),
            Series::new(tew::NAME.into(), names).into(),
        ];
        for name in tew::volume_columns() {
            let values = overrides
                .iter()
                .find(|(c, _)| *c == name)
                .map(|(_, v)| v.clone())
                .unwrap_or_else(|| vec![0.0; n]);
            columns.push(Series::new(name.into(), values).into());
        }
        DataFrame::new(columns).unwrap()
    }

    fn value(df: &DataFrame, column: &str, row: usize) -> Option<f64> {
        df.column(column).unwrap().f64().unwrap().get(row)
    }

    #[test]
    fn zero_totals_are_dropped_and_negatives_kept() {
        let df = tew_rows(
            &["en_US", "de_DE"],
            &["Proj1", "Proj1"],
            &[(tew::TOTAL, vec![0.0, -4.0])],
        );

        let out = normalize_tew(df).unwrap();
        assert_eq!(out.height(), 1);
        assert_eq!(value(&out, tew::TOTAL, 0), Some(-4.0));
    }

    #[test]
    fn script_variants_collapse_into_one_group() {
        let df = tew_rows(
            &["sr_RS_Latn", "sr_RS", "sr_RS_Cyrl"],
            &["Proj1"; 3],
            &[
                (tew::TOTAL, vec![10.0, 5.0, 1.0]),
                ("tew_no_match", vec![10.0, 5.0, 1.0]),
            ],
        );

        let out = normalize_tew(df).unwrap();
        assert_eq!(out.height(), 2);
        let target = out.column(key::TARGET).unwrap().str().unwrap();
        assert_eq!(target.get(0), Some("sr_CP"));
        assert_eq!(target.get(1), Some("sr_RS"));
        assert_eq!(value(&out, "tew_no_match", 1), Some(15.0));
        assert_eq!(value(&out, tew::TOTAL, 1), Some(15.0));
    }

    #[test]
    fn fuzzy_halves_are_recombined_and_dropped() {
        let df = tew_rows(
            &["en_US", "en_US"],
            &["Proj1"; 2],
            &[
                (tew::TOTAL, vec![30.0, 12.0]),
                ("tew_95_a", vec![1.0, 2.0]),
                ("tew_95_b", vec![3.0, 4.0]),
                ("tew_85_a", vec![5.0, 0.0]),
                ("tew_85_b", vec![0.0, 6.0]),
                ("tew_75_a", vec![-1.0, 0.0]),
                ("tew_75_b", vec![0.0, 0.0]),
            ],
        );

        let out = normalize_tew(df).unwrap();
        assert_eq!(out.height(), 1);
        assert_eq!(value(&out, "tew_95", 0), Some(10.0));
        assert_eq!(value(&out, "tew_85", 0), Some(11.0));
        assert_eq!(value(&out, "tew_75", 0), Some(-1.0));
        for (_, matches, repeats) in tew::FUZZY_TIERS {
            assert!(out.column(matches).is_err());
            assert!(out.column(repeats).is_err());
        }
    }

    #[test]
    fn output_layout_is_key_total_then_categories() {
        let df = tew_rows(&["en_US"], &["Proj1"], &[(tew::TOTAL, vec![1.0])]);

        let out = normalize_tew(df).unwrap();
        let mut expected: Vec<&str> = tew::GROUP_BY.to_vec();
        expected.push(tew::TOTAL);
        expected.extend(tew::CATEGORIES);
        assert_eq!(out.get_column_names_str(), expected);
    }

    #[test]
    fn different_project_names_stay_separate_groups() {
        let df = tew_rows(
            &["en_US", "en_US"],
            &["Proj1", "Proj1 (copy)"],
            &[(tew::TOTAL, vec![1.0, 2.0])],
        );

        let out = normalize_tew(df).unwrap();
        assert_eq!(out.height(), 2);
    }
}
