//! Cost evaluation of candidate assignments.

use chrono::{DateTime, Utc};

use super::{CostTerm, CostWeights, TermRecord};
use crate::models::SlotTime;
use crate::slots::SlotModel;
use crate::time::TimeIndexer;

/// Scores assignments of sorted doses to slots.
///
/// Built once per matching run. Everything that does not depend on the
/// assignment (dose day indices, expected instants per slot) is
/// precomputed here, so [`score`](Self::score) does no timezone work.
#[derive(Debug, Clone)]
pub struct CostEvaluator {
    weights: CostWeights,
    as_needed: bool,
    slots: SlotModel,
    /// Dose instants, ascending.
    dose_times: Vec<DateTime<Utc>>,
    /// Wake-cycle day of each dose.
    dose_days: Vec<i64>,
    /// Expected instant of every exact slot; `None` for unspecified entries.
    expected: Vec<Option<DateTime<Utc>>>,
}

impl CostEvaluator {
    /// Creates an evaluator.
    ///
    /// `dose_times` must be sorted ascending and `entries` non-empty.
    pub fn new(
        weights: CostWeights,
        as_needed: bool,
        entries: &[SlotTime],
        indexer: &TimeIndexer,
        dose_times: Vec<DateTime<Utc>>,
    ) -> Self {
        debug_assert!(dose_times.windows(2).all(|w| w[0] <= w[1]));
        let dose_days: Vec<i64> = dose_times.iter().map(|&t| indexer.day_index(t)).collect();
        let last_day = dose_days.last().copied().unwrap_or(0);
        let slots = SlotModel::from_last_day(entries.len(), last_day);

        // The expected instant depends only on (day, entry): it is the entry's
        // local time shifted onto the assigned wake-cycle day.
        let expected = (0..slots.total_slots())
            .map(|gene| {
                let day = (gene / slots.entries_per_day()) as i64;
                entries
                    .get(gene % slots.entries_per_day())
                    .and_then(SlotTime::time)
                    .map(|time| indexer.expected_at(day, time))
            })
            .collect();

        Self {
            weights,
            as_needed,
            slots,
            dose_times,
            dose_days,
            expected,
        }
    }

    /// Penalty weights in use.
    pub fn weights(&self) -> &CostWeights {
        &self.weights
    }

    /// Slot space the genes address.
    pub fn slots(&self) -> &SlotModel {
        &self.slots
    }

    /// Number of doses (genome length).
    pub fn dose_count(&self) -> usize {
        self.dose_times.len()
    }

    /// Wake-cycle day index of each dose, ascending.
    pub fn dose_days(&self) -> &[i64] {
        &self.dose_days
    }

    /// Expected instant of slot `gene`, if it is an exact slot.
    pub fn expected_at(&self, gene: usize) -> Option<DateTime<Utc>> {
        self.expected.get(gene).copied().flatten()
    }

    /// Total cost of `genes`. Lower is better.
    pub fn score(&self, genes: &[usize]) -> f64 {
        let mut total = 0.0;
        self.accumulate(genes, |_, cost, _| total += cost);
        total
    }

    /// Fitness of `genes` (`scale / score`). Higher is better.
    pub fn fitness(&self, genes: &[usize]) -> f64 {
        self.weights.fitness(self.score(genes))
    }

    /// Every nonzero term contributing to [`score`](Self::score).
    ///
    /// The costs sum to the score.
    pub fn itemize(&self, genes: &[usize]) -> Vec<TermRecord> {
        let mut records = Vec::new();
        self.accumulate(genes, |term, cost, context| {
            records.push(TermRecord::new(term, cost, context))
        });
        records
    }

    fn accumulate(&self, genes: &[usize], mut emit: impl FnMut(CostTerm, f64, Option<f64>)) {
        debug_assert_eq!(genes.len(), self.dose_times.len());
        let w = &self.weights;
        let per_day = self.slots.entries_per_day();

        let mut seen = vec![false; self.slots.total_slots()];
        let mut assigned = vec![0usize; per_day];
        let mut covered = vec![0usize; per_day];
        let mut prev_day: Option<usize> = None;
        let mut prev_expected: Option<DateTime<Utc>> = None;

        for (i, &gene) in genes.iter().enumerate() {
            let Some(slot) = self.slots.decode(gene) else {
                emit(CostTerm::UnmatchedDose, w.unmatched_dose, None);
                continue;
            };

            assigned[slot.index] += 1;
            if !seen[gene] {
                seen[gene] = true;
                covered[slot.index] += 1;
            }

            let delta = self.dose_days[i].abs_diff(slot.day as i64);
            if delta > 0 {
                emit(CostTerm::DayDelta, w.day_kernel(delta), Some(delta as f64));
            }

            if let Some(prev) = prev_day {
                if slot.day < prev {
                    emit(
                        CostTerm::DayMonotonicity,
                        w.day_monotonicity,
                        Some((prev - slot.day) as f64),
                    );
                }
            }
            prev_day = Some(slot.day);

            match self.expected[gene] {
                Some(expected) => {
                    let minutes = (expected - self.dose_times[i]).num_seconds().abs() as f64 / 60.0;
                    if minutes > 0.0 {
                        emit(CostTerm::TimeDelta, w.time_kernel(minutes), Some(minutes));
                    }
                    if let Some(prev) = prev_expected {
                        if expected < prev {
                            emit(
                                CostTerm::TimeMonotonicity,
                                w.time_monotonicity,
                                Some((prev - expected).num_minutes() as f64),
                            );
                        }
                    }
                    prev_expected = Some(expected);
                }
                None => {
                    emit(
                        CostTerm::UnspecifiedMatch,
                        w.unspecified_match(self.as_needed),
                        None,
                    );
                    if delta > 0 {
                        emit(
                            CostTerm::UnspecifiedDayDelta,
                            delta as f64 * w.unspecified_day_delta,
                            Some(delta as f64),
                        );
                    }
                }
            }
        }

        // Per-entry coverage is order-independent
        for index in 0..per_day {
            let missing = self.slots.days_spanned().abs_diff(covered[index]);
            if missing > 0 {
                emit(
                    CostTerm::UnmatchedSchedule,
                    w.unmatched_schedule * missing as f64,
                    Some(index as f64),
                );
            }
            let repeats = assigned[index] - covered[index];
            if repeats > 0 {
                emit(
                    CostTerm::Duplicate,
                    w.duplicate * repeats as f64,
                    Some(index as f64),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slots::Slot;
    use chrono::{NaiveTime, TimeZone};

    fn at(d: u32, h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 1, d, h, m, 0).unwrap()
    }

    fn exact(h: u32, m: u32) -> SlotTime {
        SlotTime::Exact(NaiveTime::from_hms_opt(h, m, 0).unwrap())
    }

    /// UTC, waking at 06:00.
    fn evaluator(entries: &[SlotTime], as_needed: bool, doses: Vec<DateTime<Utc>>) -> CostEvaluator {
        let wake = NaiveTime::from_hms_opt(6, 0, 0).unwrap();
        let indexer = TimeIndexer::new(chrono_tz::UTC, wake, doses[0]);
        CostEvaluator::new(CostWeights::default(), as_needed, entries, &indexer, doses)
    }

    fn terms_of(records: &[TermRecord], term: CostTerm) -> Vec<&TermRecord> {
        records.iter().filter(|r| r.term == term).collect()
    }

    #[test]
    fn test_single_exact_match() {
        let ev = evaluator(&[exact(8, 0)], false, vec![at(1, 8, 0)]);
        assert_eq!(ev.slots().total_slots(), 1);
        let records = ev.itemize(&[0]);
        assert!(terms_of(&records, CostTerm::TimeDelta).is_empty());
        assert!(terms_of(&records, CostTerm::DayDelta).is_empty());
        assert_eq!(ev.score(&[0]), 0.0);
        assert!(ev.fitness(&[0]).is_finite());
        // Leaving it unmatched is strictly worse
        assert!(ev.score(&[1]) > ev.score(&[0]));
    }

    #[test]
    fn test_unmatched_schedule_scaling() {
        let doses = vec![at(1, 7, 0), at(2, 7, 0), at(3, 7, 0)];
        let ev = evaluator(&[exact(7, 0), exact(19, 0)], false, doses);
        assert_eq!(ev.slots().days_spanned(), 3);
        let m = *ev.slots();
        let genes = [
            m.encode(Slot::new(0, 0)),
            m.encode(Slot::new(1, 0)),
            m.encode(Slot::new(2, 0)),
        ];
        let records = ev.itemize(&genes);
        let unmatched = terms_of(&records, CostTerm::UnmatchedSchedule);
        assert_eq!(unmatched.len(), 1);
        assert_eq!(unmatched[0].context, Some(1.0));
        assert_eq!(unmatched[0].cost, CostWeights::default().unmatched_schedule * 3.0);
        assert_eq!(ev.score(&genes), unmatched[0].cost);
    }

    #[test]
    fn test_duplicate_counts_repeats() {
        let w = CostWeights::default();
        let ev = evaluator(&[exact(7, 0)], false, vec![at(1, 7, 0), at(1, 7, 30)]);
        let records = ev.itemize(&[0, 0]);
        let dups = terms_of(&records, CostTerm::Duplicate);
        assert_eq!(dups.len(), 1);
        assert_eq!(dups[0].cost, w.duplicate);

        let ev = evaluator(
            &[exact(7, 0)],
            false,
            vec![at(1, 7, 0), at(1, 7, 30), at(1, 8, 0)],
        );
        let records = ev.itemize(&[0, 0, 0]);
        let dups = terms_of(&records, CostTerm::Duplicate);
        assert_eq!(dups[0].cost, w.duplicate * 2.0);
    }

    #[test]
    fn test_day_delta_superlinear() {
        let ev = evaluator(&[exact(7, 0)], false, vec![at(1, 7, 0), at(4, 7, 0)]);
        assert_eq!(ev.dose_days(), &[0, 3]);
        let day_cost = |genes: &[usize]| -> f64 {
            terms_of(&ev.itemize(genes), CostTerm::DayDelta)
                .iter()
                .map(|r| r.cost)
                .sum()
        };
        let one = day_cost(&[0, 2]);
        let two = day_cost(&[0, 1]);
        assert!(one > 0.0);
        assert!(two > 16.0 * one);
    }

    #[test]
    fn test_time_delta() {
        let ev = evaluator(&[exact(7, 0)], false, vec![at(1, 8, 0)]);
        let records = ev.itemize(&[0]);
        let time = terms_of(&records, CostTerm::TimeDelta);
        assert_eq!(time.len(), 1);
        assert_eq!(time[0].context, Some(60.0));
        assert_eq!(time[0].cost, CostWeights::default().time_kernel(60.0));
    }

    #[test]
    fn test_time_delta_before_wake() {
        // 05:30 is before the 06:00 wake, so it belongs to day 0 even though
        // it is on the next calendar date.
        let ev = evaluator(&[exact(5, 0)], false, vec![at(1, 7, 0), at(2, 5, 30)]);
        assert_eq!(ev.dose_days(), &[0, 0]);
        assert_eq!(ev.expected_at(0), Some(at(2, 5, 0)));
        let time = terms_of(&ev.itemize(&[1, 0]), CostTerm::TimeDelta)
            .into_iter()
            .find(|r| r.context == Some(30.0))
            .cloned();
        assert!(time.is_some());
    }

    #[test]
    fn test_day_monotonicity() {
        let doses = vec![at(1, 7, 0), at(2, 7, 0), at(3, 7, 0)];
        let ev = evaluator(&[exact(7, 0)], false, doses);
        assert!(terms_of(&ev.itemize(&[0, 1, 2]), CostTerm::DayMonotonicity).is_empty());

        let records = ev.itemize(&[1, 0, 2]);
        let inversions = terms_of(&records, CostTerm::DayMonotonicity);
        assert_eq!(inversions.len(), 1);
        assert_eq!(inversions[0].cost, CostWeights::default().day_monotonicity);
        assert_eq!(terms_of(&records, CostTerm::TimeMonotonicity).len(), 1);

        let records = ev.itemize(&[2, 1, 0]);
        assert_eq!(terms_of(&records, CostTerm::DayMonotonicity).len(), 2);
    }

    #[test]
    fn test_time_monotonicity_within_day() {
        let ev = evaluator(
            &[exact(7, 0), exact(19, 0)],
            false,
            vec![at(1, 7, 0), at(1, 19, 0)],
        );
        assert!(terms_of(&ev.itemize(&[0, 1]), CostTerm::TimeMonotonicity).is_empty());
        let records = ev.itemize(&[1, 0]);
        assert_eq!(terms_of(&records, CostTerm::TimeMonotonicity).len(), 1);
        assert!(terms_of(&records, CostTerm::DayMonotonicity).is_empty());
    }

    #[test]
    fn test_unspecified_entries() {
        let w = CostWeights::default();
        let strict = evaluator(&[SlotTime::Unspecified], false, vec![at(1, 13, 17)]);
        assert_eq!(strict.score(&[0]), w.unmatched_dose);
        assert!(terms_of(&strict.itemize(&[0]), CostTerm::TimeDelta).is_empty());

        let relaxed = evaluator(&[SlotTime::Unspecified], true, vec![at(1, 13, 17)]);
        assert_eq!(relaxed.score(&[0]), w.unspecified_as_needed);

        // Dose on day 1 assigned to day 0
        let ev = evaluator(&[SlotTime::Unspecified], false, vec![at(1, 9, 0), at(2, 9, 0)]);
        let records = ev.itemize(&[2, 0]);
        let extra = terms_of(&records, CostTerm::UnspecifiedDayDelta);
        assert_eq!(extra.len(), 1);
        assert_eq!(extra[0].cost, w.unspecified_day_delta);
        assert_eq!(terms_of(&records, CostTerm::DayDelta)[0].cost, w.day_kernel(1));
    }

    #[test]
    fn test_all_unmatched() {
        let w = CostWeights::default();
        let ev = evaluator(&[exact(7, 0)], false, vec![at(1, 7, 0), at(2, 7, 0)]);
        let sentinel = ev.slots().unmatched();
        let expected = 2.0 * w.unmatched_dose + 2.0 * w.unmatched_schedule;
        assert_eq!(ev.score(&[sentinel, sentinel]), expected);
    }

    #[test]
    fn test_itemized_sum_equals_score() {
        let ev = evaluator(
            &[exact(7, 0), SlotTime::Unspecified],
            false,
            vec![at(1, 7, 10), at(1, 12, 0), at(2, 6, 50), at(3, 21, 0)],
        );
        let genes = [0, 0, 5, 3];
        let sum: f64 = ev.itemize(&genes).iter().map(|r| r.cost).sum();
        assert!((sum - ev.score(&genes)).abs() < 1e-9);
    }
}
