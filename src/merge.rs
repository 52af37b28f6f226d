use polars::prelude::*;
use tracing::debug;

use crate::error::DiffCountError;
use crate::schema::{key, merged, sol, tew};
use crate::sol::group_exprs;
use crate::status::classify;

/// Outer-join the normalized SOL and TEW tables on
/// (projectId, target, tgroup) and classify every resulting group.
///
/// The project name comes from SOL, falling back to the TEW name when SOL
/// has none. Numeric cells left empty by the join are set to 0 after the
/// status is computed, so a missing side never reads as a zero total.
///
/// Rows are sorted by project id only. Within a project they keep join
/// order: SOL rows as SOL lists them, then TEW-only rows in TEW order.
pub fn merge(sol_df: &DataFrame, tew_df: &DataFrame) -> Result<DataFrame, DiffCountError> {
    // Keys compare as text on both sides.
    let key_as_text: Vec<Expr> = key::JOIN
        .iter()
        .map(|c| col(*c).cast(DataType::String))
        .collect();

    let joined = sol_df
        .clone()
        .lazy()
        .with_columns(key_as_text.clone())
        .join(
            tew_df.clone().lazy().with_columns(key_as_text),
            group_exprs(&key::JOIN),
            group_exprs(&key::JOIN),
            JoinArgs {
                maintain_order: MaintainOrderJoin::LeftRight,
                ..JoinArgs::new(JoinType::Full).with_coalesce(JoinCoalesce::CoalesceColumns)
            },
        )
        .with_columns([when(
            col(key::PROJECT_NAME)
                .is_null()
                .or(col(key::PROJECT_NAME).eq(lit(""))),
        )
        .then(col(tew::NAME))
        .otherwise(col(key::PROJECT_NAME))
        .alias(key::PROJECT_NAME)])
        .collect()?;

    let mut joined = joined.drop(tew::NAME)?;

    let statuses: Vec<&str> = {
        let sol_totals = joined.column(sol::TOTAL)?.f64()?;
        let tew_totals = joined.column(tew::TOTAL)?.f64()?;
        sol_totals
            .into_iter()
            .zip(tew_totals)
            .map(|(s, t)| classify(s, t).as_str())
            .collect()
    };
    joined.with_column(Series::new(merged::STATUS.into(), statuses))?;

    let fill: Vec<Expr> = joined
        .get_columns()
        .iter()
        .filter(|c| c.dtype().is_float())
        .map(|c| col(c.name().clone()).fill_null(lit(0.0)))
        .collect();

    let out = joined
        .lazy()
        .with_columns(fill)
        .sort_by_exprs(
            vec![col(key::PROJECT_ID)],
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .collect()?;

    debug!(rows = out.height(), "merged SOL and TEW groups");
    Ok(out)
}
