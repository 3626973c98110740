//! Medication schedule model.
//!
//! A schedule is an ordered list of per-day entries. Each entry is either
//! pinned to a clock time, anchored to a daily habit (e.g. "before
//! breakfast"), or unspecified ("as needed").

use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};

use super::{DailyEvent, Habits, parse_time_of_day};
use crate::error::{MatchError, Result};

/// Offset applied to habit-anchored entries that are before or after the event.
pub const EVENT_OFFSET_MINUTES: i64 = 15;

/// Position of a dose relative to a daily event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventTiming {
    Before,
    During,
    #[default]
    After,
}

/// One scheduled dose per day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ScheduleEntry {
    /// Fixed clock time (`HH:MM` or `hh:mm am|pm`).
    Exact { time: String },
    /// No fixed time.
    Unspecified,
    /// Relative to a habit time, e.g. 15 minutes before breakfast.
    Event {
        event: DailyEvent,
        #[serde(default)]
        when: EventTiming,
    },
}

impl ScheduleEntry {
    /// Creates an exact entry.
    pub fn exact(time: impl Into<String>) -> Self {
        ScheduleEntry::Exact { time: time.into() }
    }

    /// Creates a habit-anchored entry.
    pub fn event(event: DailyEvent, when: EventTiming) -> Self {
        ScheduleEntry::Event { event, when }
    }

    /// Resolves this entry to a concrete slot time using `habits`.
    pub fn resolve(&self, habits: &Habits) -> Result<SlotTime> {
        match self {
            ScheduleEntry::Exact { time } => Ok(SlotTime::Exact(parse_time_of_day(time)?)),
            ScheduleEntry::Unspecified => Ok(SlotTime::Unspecified),
            ScheduleEntry::Event { event, when } => {
                let base = habits.event_time(*event)?;
                let offset = match when {
                    EventTiming::Before => -EVENT_OFFSET_MINUTES,
                    EventTiming::During => 0,
                    EventTiming::After => EVENT_OFFSET_MINUTES,
                };
                // Wraps across midnight, e.g. "before" a 00:05 sleep time.
                let (time, _) = base.overflowing_add_signed(Duration::minutes(offset));
                Ok(SlotTime::Exact(time))
            }
        }
    }
}

/// Resolved form of a [`ScheduleEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotTime {
    /// Expected at this local time of day.
    Exact(NaiveTime),
    /// Any time of day.
    Unspecified,
}

impl SlotTime {
    /// The expected time of day, if any.
    pub fn time(&self) -> Option<NaiveTime> {
        match self {
            SlotTime::Exact(t) => Some(*t),
            SlotTime::Unspecified => None,
        }
    }
}

/// A recurring daily schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Per-day entries, in order.
    pub times: Vec<ScheduleEntry>,
    /// Relaxes penalties for unspecified entries.
    #[serde(default)]
    pub as_needed: bool,
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry.
    pub fn with_entry(mut self, entry: ScheduleEntry) -> Self {
        self.times.push(entry);
        self
    }

    /// Marks the schedule as "as needed".
    pub fn with_as_needed(mut self, as_needed: bool) -> Self {
        self.as_needed = as_needed;
        self
    }

    /// Number of entries per day.
    pub fn entries_per_day(&self) -> usize {
        self.times.len()
    }

    /// Resolves every entry against `habits`.
    ///
    /// # Errors
    /// - [`MatchError::EmptySchedule`] if there are no entries.
    /// - Any error from [`ScheduleEntry::resolve`].
    pub fn resolve(&self, habits: &Habits) -> Result<Vec<SlotTime>> {
        if self.times.is_empty() {
            return Err(MatchError::EmptySchedule);
        }
        self.times.iter().map(|e| e.resolve(habits)).collect()
    }
}
