//! Error types for schedule matching.
//!
//! Every failure happens while the matcher is being constructed, before a
//! population exists. The search itself never fails.

use thiserror::Error;

/// Errors raised while building a matching run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchError {
    #[error("unknown timezone '{0}'")]
    UnknownTimezone(String),

    #[error("invalid time of day '{0}' (expected HH:MM or hh:mm am/pm)")]
    InvalidTimeOfDay(String),

    #[error("schedule has no entries")]
    EmptySchedule,

    #[error("schedule entry refers to '{0}' but habits define no time for it")]
    MissingHabit(String),

    #[error("dose '{id}' has an invalid timestamp '{date}'")]
    InvalidTimestamp { id: String, date: String },

    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Coarse classification of a [`MatchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Schedule, habits or parameters are unusable.
    Configuration,
    /// A recorded dose is malformed.
    Input,
}

impl MatchError {
    /// Returns the error category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MatchError::InvalidTimestamp { .. } => ErrorKind::Input,
            MatchError::UnknownTimezone(_)
            | MatchError::InvalidTimeOfDay(_)
            | MatchError::EmptySchedule
            | MatchError::MissingHabit(_)
            | MatchError::InvalidParameter { .. } => ErrorKind::Configuration,
        }
    }
}

pub type Result<T, E = MatchError> = std::result::Result<T, E>;
