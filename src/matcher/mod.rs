//! The `match` operation.
//!
//! Builds a fresh, self-contained matching run from immutable inputs:
//! resolve the schedule, parse and sort doses, anchor day 0, size the slot
//! space, search with the GA, and project the best assignment back onto
//! the caller's doses.
//!
//! # Example
//! ```
//! use u_dose_match::{match_doses, Dose, Habits, MatchParams, Schedule, ScheduleEntry};
//!
//! let schedule = Schedule::new()
//!     .with_entry(ScheduleEntry::exact("08:00"))
//!     .with_entry(ScheduleEntry::exact("20:00"));
//! let habits = Habits::new().with_wake("07:00").with_tz("UTC");
//! let doses = vec![
//!     Dose::new("morning", "2021-05-01T08:04:00Z"),
//!     Dose::new("evening", "2021-05-01T19:51:00Z"),
//! ];
//! let params = MatchParams::new().with_seed(1);
//!
//! let result = match_doses(&schedule, &habits, &doses, &params).unwrap();
//! assert_eq!(result.matches.len(), 2);
//! ```

mod params;
mod result;

pub use params::MatchParams;
pub use result::{DoseMatch, MatchResult, project};

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::debug;

use crate::cost::CostEvaluator;
use crate::error::Result;
use crate::ga::{AssignmentChromosome, GaResult, GaRunner, MatchingProblem};
use crate::models::{Dose, DoseId, Habits, Schedule};
use crate::time::TimeIndexer;

/// Matches recorded doses to a schedule.
///
/// Shorthand for [`ScheduleMatcher::new`] followed by [`ScheduleMatcher::run`].
pub fn match_doses(
    schedule: &Schedule,
    habits: &Habits,
    doses: &[Dose],
    params: &MatchParams,
) -> Result<MatchResult> {
    Ok(ScheduleMatcher::new(schedule, habits, doses, params)?.run())
}

/// A validated matching run, ready to search.
#[derive(Debug, Clone)]
pub struct ScheduleMatcher {
    params: MatchParams,
    /// `(input position, id)` per dose, in timestamp order.
    sorted: Vec<(usize, DoseId)>,
    /// `None` when there are no doses.
    search: Option<Search>,
}

#[derive(Debug, Clone)]
struct Search {
    problem: MatchingProblem,
    start: DateTime<Utc>,
}

impl ScheduleMatcher {
    /// Validates inputs and precomputes everything the search needs.
    ///
    /// Configuration is checked before doses, so an unusable schedule is
    /// reported even when there are no doses.
    ///
    /// # Errors
    /// - Configuration: invalid parameters, empty schedule, malformed time
    ///   of day, missing habit time, unknown timezone.
    /// - Input: a dose timestamp that is not ISO-8601.
    pub fn new(
        schedule: &Schedule,
        habits: &Habits,
        doses: &[Dose],
        params: &MatchParams,
    ) -> Result<Self> {
        params.validate()?;
        let entries = schedule.resolve(habits)?;
        let tz = habits.timezone()?;
        let wake = habits.wake_time()?;

        let mut parsed = doses
            .iter()
            .enumerate()
            .map(|(position, dose)| -> Result<_> {
                Ok((dose.timestamp()?, position, dose.id.clone()))
            })
            .collect::<Result<Vec<_>>>()?;
        parsed.sort_by_key(|(ts, _, _)| *ts);

        let times: Vec<DateTime<Utc>> = parsed.iter().map(|(ts, _, _)| *ts).collect();
        let sorted = parsed
            .into_iter()
            .map(|(_, position, id)| (position, id))
            .collect();

        let search = times.first().map(|&earliest| {
            let indexer = TimeIndexer::new(tz, wake, earliest);
            let evaluator = CostEvaluator::new(
                params.weights.clone(),
                schedule.as_needed,
                &entries,
                &indexer,
                times.clone(),
            );
            let slots = evaluator.slots();
            debug!(
                doses = times.len(),
                entries_per_day = slots.entries_per_day(),
                days_spanned = slots.days_spanned(),
                total_slots = slots.total_slots(),
                first_wake = %indexer.first_wake(),
                "matcher constructed"
            );
            Search {
                problem: MatchingProblem::new(evaluator),
                start: indexer.first_wake(),
            }
        });

        Ok(Self {
            params: params.clone(),
            sorted,
            search,
        })
    }

    /// The search problem, or `None` if there are no doses.
    pub fn problem(&self) -> Option<&MatchingProblem> {
        self.search.as_ref().map(|s| &s.problem)
    }

    /// Wake boundary of day 0, or `None` if there are no doses.
    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.search.as_ref().map(|s| s.start)
    }

    /// Runs the search with `params.seed`, or OS entropy if unset.
    pub fn run(&self) -> MatchResult {
        match &self.search {
            Some(search) => {
                let outcome = GaRunner::run(&search.problem, &self.params.ga);
                self.finish(search, outcome)
            }
            None => MatchResult::empty(),
        }
    }

    /// Runs the search with a caller-supplied generator.
    pub fn run_with_rng<R: Rng>(&self, rng: &mut R) -> MatchResult {
        match &self.search {
            Some(search) => {
                let outcome = GaRunner::run_with_rng(&search.problem, &self.params.ga, rng);
                self.finish(search, outcome)
            }
            None => MatchResult::empty(),
        }
    }

    fn finish(&self, search: &Search, outcome: GaResult<AssignmentChromosome>) -> MatchResult {
        let evaluator = search.problem.evaluator();
        let genes = &outcome.best.genes;
        MatchResult {
            matches: project(&self.sorted, genes, evaluator.slots()),
            start: Some(search.start),
            fitness: Some(outcome.best_fitness),
            score: Some(evaluator.score(genes)),
            generations: outcome.generations,
            termination: Some(outcome.termination),
            breakdown: self.params.verbose.then(|| evaluator.itemize(genes)),
        }
    }
}
