//! Patient habits: wake time, timezone, and daily event times.
//!
//! The wake time defines where one matching "day" ends and the next
//! begins. Meal and sleep times anchor schedule entries such as
//! "before breakfast".

use chrono::NaiveTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::parse_time_of_day;
use crate::error::{MatchError, Result};

/// Wake time used when habits do not specify one.
pub const DEFAULT_WAKE: &str = "09:00";
/// Timezone used when habits do not specify one.
pub const DEFAULT_TZ: &str = "America/New_York";

/// A recurring daily event that schedule entries can be anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DailyEvent {
    Breakfast,
    Lunch,
    Dinner,
    Sleep,
}

impl DailyEvent {
    /// Habit field name for this event.
    pub fn as_str(&self) -> &'static str {
        match self {
            DailyEvent::Breakfast => "breakfast",
            DailyEvent::Lunch => "lunch",
            DailyEvent::Dinner => "dinner",
            DailyEvent::Sleep => "sleep",
        }
    }
}

/// User habits. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Habits {
    /// Wake time (`HH:MM`). Default: [`DEFAULT_WAKE`].
    pub wake: Option<String>,
    /// IANA timezone name. Default: [`DEFAULT_TZ`].
    pub tz: Option<String>,
    pub breakfast: Option<String>,
    pub lunch: Option<String>,
    pub dinner: Option<String>,
    pub sleep: Option<String>,
}

impl Habits {
    /// Creates habits with every field defaulted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the wake time.
    pub fn with_wake(mut self, wake: impl Into<String>) -> Self {
        self.wake = Some(wake.into());
        self
    }

    /// Sets the timezone.
    pub fn with_tz(mut self, tz: impl Into<String>) -> Self {
        self.tz = Some(tz.into());
        self
    }

    /// Sets the time of a daily event.
    pub fn with_event(mut self, event: DailyEvent, time: impl Into<String>) -> Self {
        let time = Some(time.into());
        match event {
            DailyEvent::Breakfast => self.breakfast = time,
            DailyEvent::Lunch => self.lunch = time,
            DailyEvent::Dinner => self.dinner = time,
            DailyEvent::Sleep => self.sleep = time,
        }
        self
    }

    /// Parsed wake time, falling back to [`DEFAULT_WAKE`].
    pub fn wake_time(&self) -> Result<NaiveTime> {
        parse_time_of_day(self.wake.as_deref().unwrap_or(DEFAULT_WAKE))
    }

    /// Resolved timezone, falling back to [`DEFAULT_TZ`].
    ///
    /// # Errors
    /// [`MatchError::UnknownTimezone`] if the name is not in the IANA database.
    pub fn timezone(&self) -> Result<Tz> {
        let name = self.tz.as_deref().unwrap_or(DEFAULT_TZ);
        name.parse::<Tz>()
            .map_err(|_| MatchError::UnknownTimezone(name.to_string()))
    }

    /// Parsed time of a daily event.
    ///
    /// # Errors
    /// [`MatchError::MissingHabit`] if the habit is not set.
    pub fn event_time(&self, event: DailyEvent) -> Result<NaiveTime> {
        let raw = match event {
            DailyEvent::Breakfast => &self.breakfast,
            DailyEvent::Lunch => &self.lunch,
            DailyEvent::Dinner => &self.dinner,
            DailyEvent::Sleep => &self.sleep,
        };
        match raw {
            Some(time) => parse_time_of_day(time),
            None => Err(MatchError::MissingHabit(event.as_str().to_string())),
        }
    }
}
