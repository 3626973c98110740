//! Schedule-to-dose matching for the U-Engine ecosystem.
//!
//! Given a recurring daily schedule ("07:00 and 19:00") and the doses a
//! patient actually recorded, finds the most plausible assignment of each
//! dose to a scheduled slot, or to nothing. Doses drift, get skipped, and
//! arrive out of order, so this is a best-effort global assignment found by
//! a genetic algorithm rather than a join.
//!
//! # Modules
//!
//! - **`models`**: Inputs: `Schedule`, `Habits`, `Dose`
//! - **`time`**: Wake-cycle day indexing in the user's timezone
//! - **`slots`**: Linear (day, entry) slot space with an "unmatched" sentinel
//! - **`cost`**: Multi-term penalty model and fitness
//! - **`ga`**: Generational GA over integer-vector chromosomes
//! - **`matcher`**: The `match` operation and result projection
//!
//! # Concurrency
//!
//! Every call builds its own evaluator, population and generator from its
//! inputs. Nothing is shared between calls, so independent matches can run
//! on separate threads without synchronization.
//!
//! # References
//!
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization, and Machine Learning"
//! - Burkard, Dell'Amico & Martello (2012), "Assignment Problems"

pub mod cost;
pub mod error;
pub mod ga;
pub mod matcher;
pub mod models;
pub mod slots;
pub mod time;

pub use error::{ErrorKind, MatchError, Result};
pub use matcher::{DoseMatch, MatchParams, MatchResult, ScheduleMatcher, match_doses};
pub use models::{DailyEvent, Dose, DoseId, EventTiming, Habits, Schedule, ScheduleEntry};
pub use slots::{Slot, SlotModel};
