//! Time-of-day parsing.
//!
//! Accepts 24-hour `HH:MM` and 12-hour `hh:mm am|pm`. Seconds are
//! always zero.

use chrono::NaiveTime;

use crate::error::{MatchError, Result};

const FORMATS: [&str; 3] = ["%H:%M", "%I:%M %p", "%I:%M%p"];

/// Parses a wall-clock time of day.
///
/// # Errors
/// [`MatchError::InvalidTimeOfDay`] if no supported format matches.
pub fn parse_time_of_day(raw: &str) -> Result<NaiveTime> {
    let trimmed = raw.trim();
    FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| MatchError::InvalidTimeOfDay(raw.to_string()))
}
