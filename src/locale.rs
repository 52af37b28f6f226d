//! Target-locale harmonization. SOL writes `enUS`, TEW writes `en_US` and
//! adds script suffixes for a few locales; both are brought to `en_US` form.

use polars::prelude::*;

use crate::error::DiffCountError;

/// SOL codes that are already final and never get a separator.
const SOL_EXCEPTIONS: [&str; 5] = ["ckb", "ceb", "eo", "hil", "cnr"];

/// SOL code remapped after the exception check, and its replacement.
const SOL_REMAP: (&str, &str) = ("cnr", "sla_ME");

/// TEW codes renamed to the base locale SOL uses.
const TEW_RENAMES: [(&str, &str); 4] = [
    ("sr_RS_Latn", "sr_RS"),
    ("az_AZ_Latn", "az_AZ"),
    ("bs_BA_Latn", "bs_BA"),
    ("sr_RS_Cyrl", "sr_CP"),
];

/// `enUS` -> `en_US`. Codes that already carry a separator anywhere
/// (`en_US`, `sla_ME`) are returned as they are.
pub fn harmonize_sol_target(code: &str) -> String {
    if code == SOL_REMAP.0 {
        return SOL_REMAP.1.to_string();
    }
    if SOL_EXCEPTIONS.contains(&code) || code.contains('_') {
        return code.to_string();
    }

    let split = code.char_indices().nth(2).map_or(code.len(), |(i, _)| i);
    let (lang, rest) = code.split_at(split);
    format!("{lang}_{rest}")
}

pub fn harmonize_tew_target(code: &str) -> String {
    TEW_RENAMES
        .iter()
        .find(|(from, _)| *from == code)
        .map_or(code, |(_, to)| *to)
        .to_string()
}

/// Rewrite a String column value by value. Nulls stay null.
pub(crate) fn rewrite_column(
    mut df: DataFrame,
    column: &str,
    rewrite: fn(&str) -> String,
) -> Result<DataFrame, DiffCountError> {
    let rewritten: StringChunked = df
        .column(column)?
        .str()?
        .into_iter()
        .map(|v| v.map(rewrite))
        .collect();

    df.with_column(rewritten.into_series().with_name(column.into()))?;
    Ok(df)
}
