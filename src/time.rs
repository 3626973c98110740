//! Wake-cycle day indexing.
//!
//! A matching "day" runs from one wake time to the next in the user's
//! timezone, not midnight to midnight. Day 0 is the wake cycle that
//! contains the earliest recorded dose.
//!
//! # DST
//! Boundaries are built from local calendar dates and then resolved in
//! the zone, so a 23- or 25-hour day still counts as one day. A wake time
//! inside a spring-forward gap resolves one hour later; an ambiguous
//! fall-back time resolves to the earlier instant.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::Result;
use crate::models::Habits;

/// Maps instants to wake-cycle day indices.
#[derive(Debug, Clone)]
pub struct TimeIndexer {
    tz: Tz,
    wake: NaiveTime,
    first_wake: DateTime<Tz>,
}

impl TimeIndexer {
    /// Creates an indexer anchored at the wake cycle containing `earliest`.
    pub fn new(tz: Tz, wake: NaiveTime, earliest: DateTime<Utc>) -> Self {
        let mut indexer = Self {
            tz,
            wake,
            first_wake: earliest.with_timezone(&tz),
        };
        indexer.first_wake = indexer.wake_boundary(earliest);
        indexer
    }

    /// Creates an indexer from habits (defaults applied).
    ///
    /// # Errors
    /// Unknown timezone or malformed wake time.
    pub fn from_habits(habits: &Habits, earliest: DateTime<Utc>) -> Result<Self> {
        Ok(Self::new(habits.timezone()?, habits.wake_time()?, earliest))
    }

    /// Timezone used for all local arithmetic.
    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Wake boundary of day 0.
    pub fn first_wake(&self) -> DateTime<Utc> {
        self.first_wake.with_timezone(&Utc)
    }

    /// Start of the wake cycle containing `ts`.
    pub fn wake_boundary(&self, ts: DateTime<Utc>) -> DateTime<Tz> {
        let local = ts.with_timezone(&self.tz);
        let date = local.date_naive();
        let boundary = self.local_at(date, self.wake);
        if boundary > local {
            self.local_at(date.pred_opt().unwrap_or(date), self.wake)
        } else {
            boundary
        }
    }

    /// Number of wake cycles between day 0 and the cycle containing `ts`.
    pub fn day_index(&self, ts: DateTime<Utc>) -> i64 {
        let boundary = self.wake_boundary(ts);
        (boundary.date_naive() - self.first_wake.date_naive()).num_days()
    }

    /// The instant at local `time` that falls on wake-cycle `day`.
    ///
    /// Times earlier than the wake time belong to the next calendar date,
    /// since they come at the tail of the cycle.
    pub fn expected_at(&self, day: i64, time: NaiveTime) -> DateTime<Utc> {
        let origin = self.first_wake.date_naive();
        let guess = shift_days(origin, day);
        let candidate = self.local_at(guess, time);
        let drift = day - self.day_index(candidate.with_timezone(&Utc));
        if drift == 0 {
            return candidate.with_timezone(&Utc);
        }
        self.local_at(shift_days(guess, drift), time)
            .with_timezone(&Utc)
    }

    /// Resolves a local wall-clock time on `date` to an instant.
    pub fn local_at(&self, date: NaiveDate, time: NaiveTime) -> DateTime<Tz> {
        resolve_local(&self.tz, date.and_time(time))
    }
}

fn shift_days(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(days)).unwrap_or(date)
}

fn resolve_local(tz: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => tz
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .unwrap_or_else(|| tz.from_utc_datetime(&naive)),
    }
}
