//! Matching input models.
//!
//! | Type | Role |
//! |------|------|
//! | [`Schedule`] | What should happen each day |
//! | [`Habits`] | Wake time, timezone, meal and sleep times |
//! | [`Dose`] | What actually happened |

mod dose;
mod habits;
mod schedule;
mod time_of_day;

pub use dose::{Dose, DoseId};
pub use habits::{DEFAULT_TZ, DEFAULT_WAKE, DailyEvent, Habits};
pub use schedule::{EVENT_OFFSET_MINUTES, EventTiming, Schedule, ScheduleEntry, SlotTime};
pub use time_of_day::parse_time_of_day;
