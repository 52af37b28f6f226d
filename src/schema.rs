/// Column-name constants and mapping tables for both reports.
/// Single source of truth - exported to Python via PyO3 when the
/// `python` feature is on.

// ── Shared key columns ──────────────────────────────────────────────────────
pub mod key {
    pub const PROJECT_ID: &str = "projectId";
    pub const PROJECT_NAME: &str = "projectName";
    pub const TARGET: &str = "target";
    pub const TGROUP: &str = "tgroup";

    /// Columns both normalized tables are joined on.
    pub const JOIN: [&str; 3] = [PROJECT_ID, TARGET, TGROUP];
}

// ── SOL report ──────────────────────────────────────────────────────────────
pub mod sol {
    use super::key;

    pub const STEP: &str = "step";
    pub const TOTAL: &str = "sol_total";
    pub const TOTAL_UNIT: &str = "sol_total_unit";
    pub const SLS_UNIT: &str = "sls_unit";

    /// Canonical name -> native header.
    pub const COLUMN_MAPPING: [(&str, &str); 8] = [
        (key::PROJECT_ID, "External Project ID"),
        (key::PROJECT_NAME, "Content Name"),
        (key::TARGET, "Target Language"),
        (key::TGROUP, "Vendor (Translator Group)"),
        (STEP, "Step"),
        (TOTAL, "Billing Quantity"),
        (TOTAL_UNIT, "Unit"),
        (SLS_UNIT, "SLS Unit Key"),
    ];

    /// Category column -> SLS unit code it collects.
    pub const UNIT_CATEGORIES: [(&str, &str); 16] = [
        ("sol_no_match", "NO_MATCH"),
        ("sol_100_match", "100_MATCH"),
        ("sol_repetitions", "REPETITIONS"),
        ("sol_95", "95-99_MATCH"),
        ("sol_85", "85-94_MATCH"),
        ("sol_75", "75-84_MATCH"),
        ("sol_non_trans", "NON_TRANSLATABLE"),
        ("sol_ice", "ICE_MATCH"),
        ("sol_mt", "MT"),
        ("sol_edc1", "EDC1"),
        ("sol_edc2", "EDC2"),
        ("sol_edc3", "EDC3"),
        ("sol_edc4", "EDC4"),
        ("sol_edc5", "EDC5"),
        ("sol_edc6", "EDC6"),
        ("sol_edc7", "EDC7"),
    ];

    pub const GROUP_BY: [&str; 4] = [key::PROJECT_ID, key::PROJECT_NAME, key::TARGET, key::TGROUP];
}

// ── TEW report ──────────────────────────────────────────────────────────────
pub mod tew {
    use super::key;

    pub const NAME: &str = "tew_name";
    pub const TOTAL: &str = "tew_total";

    /// Canonical name -> native header.
    pub const COLUMN_MAPPING: [(&str, &str); 24] = [
        (key::PROJECT_ID, "XTM_PROJECT_ID"),
        (key::TARGET, "JOB_TARGET_LANGUAGE"),
        (key::TGROUP, "LSP_NAME"),
        (NAME, "XTM_PROJECT_NAME"),
        (TOTAL, "STATS_VOLUME_TOTAL_WORDS"),
        ("tew_no_match", "STATS_VOLUME_NO_MATCHING_WORDS"),
        ("tew_100_match", "STATS_VOLUME_LEVERAGED_WORDS"),
        ("tew_repetitions", "STATS_VOLUME_REPEATS_WORDS"),
        ("tew_95_a", "STATS_VOLUME_HIGH_FUZZY_MATCH_WORDS"),
        ("tew_95_b", "STATS_VOLUME_HIGH_FUZZY_REPEATS_WORDS"),
        ("tew_85_a", "STATS_VOLUME_MEDIUM_FUZZY_MATCH_WORDS"),
        ("tew_85_b", "STATS_VOLUME_MEDIUM_FUZZY_REPEATS_WORDS"),
        ("tew_75_a", "STATS_VOLUME_LOW_FUZZY_MATCH_WORDS"),
        ("tew_75_b", "STATS_VOLUME_LOW_FUZZY_REPEATS_WORDS"),
        ("tew_non_trans", "STATS_VOLUME_NON_TRANSLATABLE_WORDS"),
        ("tew_ice", "STATS_VOLUME_ICE_MATCH_WORDS"),
        ("tew_mt", "STATS_VOLUME_MACHINE_TRANSLATION_WORDS"),
        ("tew_edc1", "STATS_VOLUME_MACHINE_TRANSLATION_EDC_WORDS_CATEGORY1_WORDCOUNT"),
        ("tew_edc2", "STATS_VOLUME_MACHINE_TRANSLATION_EDC_WORDS_CATEGORY2_WORDCOUNT"),
        ("tew_edc3", "STATS_VOLUME_MACHINE_TRANSLATION_EDC_WORDS_CATEGORY3_WORDCOUNT"),
        ("tew_edc4", "STATS_VOLUME_MACHINE_TRANSLATION_EDC_WORDS_CATEGORY4_WORDCOUNT"),
        ("tew_edc5", "STATS_VOLUME_MACHINE_TRANSLATION_EDC_WORDS_CATEGORY5_WORDCOUNT"),
        ("tew_edc6", "STATS_VOLUME_MACHINE_TRANSLATION_EDC_WORDS_CATEGORY6_WORDCOUNT"),
        ("tew_edc7", "STATS_VOLUME_MACHINE_TRANSLATION_EDC_WORDS_CATEGORY7_WORDCOUNT"),
    ];

    /// Fuzzy tiers reported as (combined, match part, repeat part).
    pub const FUZZY_TIERS: [(&str, &str, &str); 3] = [
        ("tew_95", "tew_95_a", "tew_95_b"),
        ("tew_85", "tew_85_a", "tew_85_b"),
        ("tew_75", "tew_75_a", "tew_75_b"),
    ];

    /// Categories after fuzzy recombination, aligned with `sol::UNIT_CATEGORIES`.
    pub const CATEGORIES: [&str; 16] = [
        "tew_no_match",
        "tew_100_match",
        "tew_repetitions",
        "tew_95",
        "tew_85",
        "tew_75",
        "tew_non_trans",
        "tew_ice",
        "tew_mt",
        "tew_edc1",
        "tew_edc2",
        "tew_edc3",
        "tew_edc4",
        "tew_edc5",
        "tew_edc6",
        "tew_edc7",
    ];

    pub const GROUP_BY: [&str; 4] = [key::PROJECT_ID, NAME, key::TARGET, key::TGROUP];

    /// Every numeric column of the mapped report, before recombination.
    pub fn volume_columns() -> Vec<&'static str> {
        COLUMN_MAPPING
            .iter()
            .map(|(canonical, _)| *canonical)
            .filter(|c| !GROUP_BY.contains(c))
            .collect()
    }
}

// ── Merged report ───────────────────────────────────────────────────────────
pub mod merged {
    use super::key;

    pub const STATUS: &str = "status";

    pub const FINAL_COLUMN_ORDER: [&str; 39] = [
        // Group-by columns
        key::PROJECT_ID,
        key::PROJECT_NAME,
        key::TARGET,
        key::TGROUP,
        STATUS,
        // Column pairs, total first
        "sol_total",
        "tew_total",
        "sol_no_match",
        "tew_no_match",
        "sol_100_match",
        "tew_100_match",
        "sol_repetitions",
        "tew_repetitions",
        "sol_95",
        "tew_95",
        "sol_85",
        "tew_85",
        "sol_75",
        "tew_75",
        "sol_non_trans",
        "tew_non_trans",
        "sol_ice",
        "tew_ice",
        "sol_mt",
        "tew_mt",
        "sol_edc1",
        "tew_edc1",
        "sol_edc2",
        "tew_edc2",
        "sol_edc3",
        "tew_edc3",
        "sol_edc4",
        "tew_edc4",
        "sol_edc5",
        "tew_edc5",
        "sol_edc6",
        "tew_edc6",
        "sol_edc7",
        "tew_edc7",
    ];

    /// Category pairs compared cell by cell in the report. Total is
    /// covered by the status column; the two MT columns measure
    /// different things and are left out.
    pub const FINAL_COLUMN_PAIRS: [(&str, &str); 15] = [
        ("sol_no_match", "tew_no_match"),
        ("sol_100_match", "tew_100_match"),
        ("sol_repetitions", "tew_repetitions"),
        ("sol_95", "tew_95"),
        ("sol_85", "tew_85"),
        ("sol_75", "tew_75"),
        ("sol_non_trans", "tew_non_trans"),
        ("sol_ice", "tew_ice"),
        ("sol_edc1", "tew_edc1"),
        ("sol_edc2", "tew_edc2"),
        ("sol_edc3", "tew_edc3"),
        ("sol_edc4", "tew_edc4"),
        ("sol_edc5", "tew_edc5"),
        ("sol_edc6", "tew_edc6"),
        ("sol_edc7", "tew_edc7"),
    ];
}
