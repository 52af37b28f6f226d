use polars::prelude::*;
use tracing::debug;

use crate::error::DiffCountError;
use crate::locale::{harmonize_sol_target, rewrite_column};
use crate::mapper::{parse_numeric, select_and_rename};
use crate::schema::{key, sol};

/// Tag prepended to SOL vendor codes.
pub const VENDOR_PREFIX: &str = "SAPLSP";
/// Step that is never billed.
pub const NON_BILLABLE_STEP: &str = "LATINIZE";
/// Total-unit value marking the billing quantity as hours.
pub const HOUR_UNIT: &str = "H";

/// Map the native SOL headers and normalize the result.
pub fn prepare_sol(raw: &DataFrame) -> Result<DataFrame, DiffCountError> {
    let mapped = select_and_rename(raw, &sol::COLUMN_MAPPING, "SOL")?;
    normalize_sol(mapped)
}

/// Normalize a mapped SOL table to one row per
/// (projectId, projectName, target, tgroup) with one column per unit
/// category.
pub fn normalize_sol(df: DataFrame) -> Result<DataFrame, DiffCountError> {
    let df = parse_numeric(df, &[sol::TOTAL])?;
    let rows_in = df.height();

    // Zero rows are placeholders and outnumber the real rows several times.
    // Negative totals are corrections and stay.
    let df = df
        .lazy()
        .filter(col(sol::TOTAL).neq_missing(lit(0.0)))
        .with_columns([concat_str([lit(VENDOR_PREFIX), col(key::TGROUP)], "", false)
            .alias(key::TGROUP)])
        .collect()?;

    let df = rewrite_column(df, key::TARGET, harmonize_sol_target)?;

    // Rows without a vendor are internal bookkeeping and never billed.
    let mut lazy = df
        .lazy()
        .filter(col(key::TGROUP).is_not_null())
        .filter(col(sol::STEP).neq_missing(lit(NON_BILLABLE_STEP)));

    lazy = lazy.with_columns(unit_pivot_exprs());

    // Hour-denominated quantities must not count as words. The unit
    // categories above were filled before this, from the raw quantity.
    lazy = lazy.with_columns([when(col(sol::TOTAL_UNIT).eq(lit(HOUR_UNIT)))
        .then(lit(0.0))
        .otherwise(col(sol::TOTAL))
        .alias(sol::TOTAL)]);

    // step, sol_total_unit and sls_unit are left out of the aggregation.
    let mut sums = vec![col(sol::TOTAL).sum()];
    sums.extend(
        sol::UNIT_CATEGORIES
            .iter()
            .map(|(category, _)| col(*category).sum()),
    );

    let out = lazy
        .group_by(group_exprs(&sol::GROUP_BY))
        .agg(sums)
        .sort_by_exprs(
            group_exprs(&sol::GROUP_BY),
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .collect()?;

    debug!(rows_in, groups = out.height(), "normalized SOL report");
    Ok(out)
}

/// One column per unit category holding the row's quantity when its SLS
/// unit matches the category code, 0 otherwise.
fn unit_pivot_exprs() -> Vec<Expr> {
    sol::UNIT_CATEGORIES
        .iter()
        .map(|(category, unit_code)| {
            when(col(sol::SLS_UNIT).eq(lit(*unit_code)))
                .then(col(sol::TOTAL))
                .otherwise(lit(0.0))
                .alias(*category)
        })
        .collect()
}

pub(crate) fn group_exprs(columns: &[&str]) -> Vec<Expr> {
    columns.iter().map(|c| col(*c)).collect()
}
