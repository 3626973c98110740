//! Assignment cost model.
//!
//! Scores a candidate assignment (one gene per dose) as a sum of weighted
//! penalty terms. Lower is better; [`CostWeights::fitness`] turns a score
//! into a maximization objective for the GA.
//!
//! # Terms
//!
//! | Term | Per | Cost |
//! |------|-----|------|
//! | Unmatched dose | sentinel gene | `unmatched_dose` |
//! | Unmatched schedule | entry | `unmatched_schedule * (days - covered days)` |
//! | Duplicate | entry | `duplicate * (assignments - covered days)` |
//! | Day delta | matched gene | `day * d^5` |
//! | Time delta | exact match | `(minute * m)^1.1` |
//! | Unspecified match | unspecified match | flat, plus `unspecified_day_delta * d` |
//! | Day monotonicity | inversion | `day_monotonicity` |
//! | Time monotonicity | inversion | `time_monotonicity` |

mod evaluator;
mod terms;
mod weights;

pub use evaluator::CostEvaluator;
pub use terms::{CostTerm, TermRecord};
pub use weights::{CostWeights, MIN_SCORE};
