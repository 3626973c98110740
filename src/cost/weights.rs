//! Cost weights and kernels.

use serde::{Deserialize, Serialize};

use crate::error::{MatchError, Result};

/// Floor applied to a score before converting it to fitness.
pub const MIN_SCORE: f64 = 1e-9;

/// Weighting constants of the cost model.
///
/// Deserializes with per-field defaults, so a partial params object only
/// overrides the keys it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostWeights {
    /// Numerator of `fitness = scale / score` (default: 100).
    pub scale: f64,
    /// Cost per dose left unmatched (default: 4).
    pub unmatched_dose: f64,
    /// Cost per missing day of a schedule entry (default: 4).
    pub unmatched_schedule: f64,
    /// Cost per repeated (day, entry) assignment (default: 8).
    pub duplicate: f64,
    /// Day kernel factor: `day * d^5` (default: 2).
    pub day: f64,
    /// Time kernel factor: `(minute * m)^1.1` (default: 0.02).
    pub minute: f64,
    /// Flat cost of matching an unspecified entry on an as-needed schedule (default: 1).
    pub unspecified_as_needed: f64,
    /// Extra cost per day of delta on an unspecified entry (default: 4).
    pub unspecified_day_delta: f64,
    /// Cost per day-order inversion (default: 6).
    pub day_monotonicity: f64,
    /// Cost per time-order inversion (default: 6).
    pub time_monotonicity: f64,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self {
            scale: 100.0,
            unmatched_dose: 4.0,
            unmatched_schedule: 4.0,
            duplicate: 8.0,
            day: 2.0,
            minute: 0.02,
            unspecified_as_needed: 1.0,
            unspecified_day_delta: 4.0,
            day_monotonicity: 6.0,
            time_monotonicity: 6.0,
        }
    }
}

impl CostWeights {
    /// Day-delta kernel, steeply superlinear.
    #[inline]
    pub fn day_kernel(&self, delta: u64) -> f64 {
        self.day * (delta as f64).powi(5)
    }

    /// Time-delta kernel over absolute minutes, mildly superlinear.
    #[inline]
    pub fn time_kernel(&self, minutes: f64) -> f64 {
        (self.minute * minutes.abs()).powf(1.1)
    }

    /// Flat cost of matching a dose to an unspecified entry.
    ///
    /// Equal to the unmatched-dose cost unless the schedule is as-needed.
    #[inline]
    pub fn unspecified_match(&self, as_needed: bool) -> f64 {
        if as_needed {
            self.unspecified_as_needed
        } else {
            self.unmatched_dose
        }
    }

    /// Converts a score into fitness. Strictly decreasing in `score`.
    #[inline]
    pub fn fitness(&self, score: f64) -> f64 {
        self.scale / score.max(MIN_SCORE)
    }

    /// Checks that every weight is finite and non-negative and `scale` is positive.
    pub fn validate(&self) -> Result<()> {
        let fields: [(&'static str, f64); 10] = [
            ("scale", self.scale),
            ("unmatched_dose", self.unmatched_dose),
            ("unmatched_schedule", self.unmatched_schedule),
            ("duplicate", self.duplicate),
            ("day", self.day),
            ("minute", self.minute),
            ("unspecified_as_needed", self.unspecified_as_needed),
            ("unspecified_day_delta", self.unspecified_day_delta),
            ("day_monotonicity", self.day_monotonicity),
            ("time_monotonicity", self.time_monotonicity),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(MatchError::InvalidParameter {
                    name,
                    reason: format!("must be finite and non-negative, got {value}"),
                });
            }
        }
        if self.scale == 0.0 {
            return Err(MatchError::InvalidParameter {
                name: "scale",
                reason: "must be positive".into(),
            });
        }
        Ok(())
    }
}
