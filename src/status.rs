use std::fmt;

/// Agreement between the SOL and TEW totals of one merged group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Group only present in the TEW report.
    SolMissing,
    /// Group only present in the SOL report.
    TewMissing,
    Ok,
    Mismatch,
}

impl Status {
    /// Display order used by summaries.
    pub const ALL: [Status; 4] = [
        Status::SolMissing,
        Status::TewMissing,
        Status::Ok,
        Status::Mismatch,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::SolMissing => "SOL_MISSING",
            Status::TewMissing => "TEW_MISSING",
            Status::Ok => "OK",
            Status::Mismatch => "MISMATCH",
        }
    }

    pub fn parse(value: &str) -> Option<Status> {
        Status::ALL.into_iter().find(|s| s.as_str() == value)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Condition over the pre-fill (nullable) totals of a merged row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    SolTotalAbsent,
    TewTotalAbsent,
    TotalsEqual,
    Always,
}

impl Rule {
    pub fn holds(self, sol_total: Option<f64>, tew_total: Option<f64>) -> bool {
        match self {
            Rule::SolTotalAbsent => sol_total.is_none(),
            Rule::TewTotalAbsent => tew_total.is_none(),
            // Exact comparison, no tolerance.
            Rule::TotalsEqual => sol_total == tew_total,
            Rule::Always => true,
        }
    }
}

/// Evaluated top to bottom, first match wins.
pub const STATUS_RULES: [(Rule, Status); 4] = [
    (Rule::SolTotalAbsent, Status::SolMissing),
    (Rule::TewTotalAbsent, Status::TewMissing),
    (Rule::TotalsEqual, Status::Ok),
    (Rule::Always, Status::Mismatch),
];

/// Outcome of the last rule. That rule is `Rule::Always`, so `classify`
/// never needs another default.
const FALLBACK: Status = STATUS_RULES[STATUS_RULES.len() - 1].1;

pub fn classify(sol_total: Option<f64>, tew_total: Option<f64>) -> Status {
    STATUS_RULES
        .iter()
        .find(|(rule, _)| rule.holds(sol_total, tew_total))
        .map_or(FALLBACK, |(_, status)| *status)
}
