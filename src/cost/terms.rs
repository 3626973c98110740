//! Itemized cost terms for diagnostics.

use serde::{Deserialize, Serialize};

/// Penalty categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostTerm {
    UnmatchedDose,
    UnmatchedSchedule,
    Duplicate,
    DayDelta,
    TimeDelta,
    UnspecifiedMatch,
    UnspecifiedDayDelta,
    DayMonotonicity,
    TimeMonotonicity,
}

/// One contribution to a score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermRecord {
    pub term: CostTerm,
    pub cost: f64,
    /// Term-specific magnitude: day delta, minutes, entry index, or the
    /// size of a monotonicity inversion.
    pub context: Option<f64>,
}

impl TermRecord {
    /// Creates a record for one term.
    pub fn new(term: CostTerm, cost: f64, context: Option<f64>) -> Self {
        Self {
            term,
            cost,
            context,
        }
    }
}
