//! Match results and projection from the best chromosome.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cost::TermRecord;
use crate::ga::Termination;
use crate::models::DoseId;
use crate::slots::{Slot, SlotModel};

/// Match for one recorded dose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoseMatch {
    /// Dose identifier as supplied.
    pub dose: DoseId,
    /// Matched slot, or `None` if the dose matches nothing.
    #[serde(rename = "match")]
    pub slot: Option<Slot>,
}

/// Outcome of a `match` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// One entry per dose, in input order.
    pub matches: Vec<DoseMatch>,
    /// Wake boundary of day 0; `None` when there were no doses.
    pub start: Option<DateTime<Utc>>,
    /// Fitness of the returned assignment.
    pub fitness: Option<f64>,
    /// Cost of the returned assignment.
    pub score: Option<f64>,
    /// Generations evolved.
    pub generations: usize,
    pub termination: Option<Termination>,
    /// Itemized cost, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<Vec<TermRecord>>,
}

impl MatchResult {
    /// Result for a call without doses. No search is run.
    pub fn empty() -> Self {
        Self {
            matches: Vec::new(),
            start: None,
            fitness: None,
            score: None,
            generations: 0,
            termination: None,
            breakdown: None,
        }
    }

    /// Number of doses matched to a slot.
    pub fn matched_count(&self) -> usize {
        self.matches.iter().filter(|m| m.slot.is_some()).count()
    }

    /// Slot matched to dose `id`, if any.
    pub fn slot_for(&self, id: impl Into<DoseId>) -> Option<Slot> {
        let id = id.into();
        self.matches
            .iter()
            .find(|m| m.dose == id)
            .and_then(|m| m.slot)
    }
}

/// Maps genes (in sorted-dose order) back to per-dose matches in input order.
///
/// `sorted` holds `(input position, dose id)` for each gene.
pub fn project(sorted: &[(usize, DoseId)], genes: &[usize], slots: &SlotModel) -> Vec<DoseMatch> {
    debug_assert_eq!(sorted.len(), genes.len());
    let mut matches: Vec<(usize, DoseMatch)> = sorted
        .iter()
        .zip(genes)
        .map(|((position, id), &gene)| {
            (
                *position,
                DoseMatch {
                    dose: id.clone(),
                    slot: slots.decode(gene),
                },
            )
        })
        .collect();
    matches.sort_by_key(|(position, _)| *position);
    matches.into_iter().map(|(_, m)| m).collect()
}
