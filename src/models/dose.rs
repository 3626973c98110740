//! Recorded dose events.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{MatchError, Result};

/// Offset-bearing layouts tried after RFC 3339. `%#z` also accepts `Z`.
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M%#z"];

/// Layouts without an offset, read as UTC.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Caller-defined dose identifier.
///
/// Opaque to the matcher. Numbers stay numbers and strings stay strings
/// when echoed back in a result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DoseId {
    Int(i64),
    Text(String),
}

impl fmt::Display for DoseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DoseId::Int(n) => write!(f, "{n}"),
            DoseId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for DoseId {
    fn from(id: i64) -> Self {
        DoseId::Int(id)
    }
}

impl From<String> for DoseId {
    fn from(id: String) -> Self {
        DoseId::Text(id)
    }
}

impl From<&str> for DoseId {
    fn from(id: &str) -> Self {
        DoseId::Text(id.to_string())
    }
}

impl PartialEq<str> for DoseId {
    fn eq(&self, other: &str) -> bool {
        matches!(self, DoseId::Text(s) if s == other)
    }
}

impl PartialEq<&str> for DoseId {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl PartialEq<i64> for DoseId {
    fn eq(&self, other: &i64) -> bool {
        matches!(self, DoseId::Int(n) if n == other)
    }
}

/// A dose the patient actually recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dose {
    /// Echoed back unchanged in results.
    pub id: DoseId,
    /// ISO-8601 timestamp. A value without an offset is read as UTC.
    pub date: String,
}

impl Dose {
    /// Creates a dose from an id and an ISO-8601 timestamp.
    pub fn new(id: impl Into<DoseId>, date: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            date: date.into(),
        }
    }

    /// Creates a dose from an already-parsed instant.
    pub fn at(id: impl Into<DoseId>, date: DateTime<Utc>) -> Self {
        Self::new(id, date.to_rfc3339())
    }

    /// Parses the timestamp.
    ///
    /// Accepts RFC 3339 plus minute-precision forms such as
    /// `2015-03-01T07:30Z`, `2015-03-01T07:30+0100` and `2015-03-01T07:30`.
    ///
    /// # Errors
    /// [`MatchError::InvalidTimestamp`] if the date is not ISO-8601.
    pub fn timestamp(&self) -> Result<DateTime<Utc>> {
        let raw = self.date.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(dt.with_timezone(&Utc));
        }
        let with_offset = OFFSET_FORMATS
            .iter()
            .find_map(|fmt| DateTime::parse_from_str(raw, fmt).ok())
            .map(|dt| dt.with_timezone(&Utc));
        let naive = || {
            NAIVE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|naive| naive.and_utc())
        };
        with_offset
            .or_else(naive)
            .ok_or_else(|| MatchError::InvalidTimestamp {
                id: self.id.to_string(),
                date: self.date.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2015, 3, 1, h, m, 0).unwrap()
    }

    #[test]
    fn test_parse_with_offset() {
        let dose = Dose::new("a", "2015-03-01T07:30:00-05:00");
        assert_eq!(dose.timestamp().unwrap(), utc(12, 30));
    }

    #[test]
    fn test_parse_without_offset() {
        let dose = Dose::new("a", "2015-03-01T07:30:00.250");
        let ts = dose.timestamp().unwrap();
        assert_eq!(ts.timestamp(), 1_425_195_000);
        assert_eq!(ts.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_parse_minute_precision() {
        assert_eq!(Dose::new("a", "2015-03-01T07:30Z").timestamp().unwrap(), utc(7, 30));
        assert_eq!(Dose::new("a", "2015-03-01T07:30-05:00").timestamp().unwrap(), utc(12, 30));
        assert_eq!(Dose::new("a", "2015-03-01T07:30+0100").timestamp().unwrap(), utc(6, 30));
        assert_eq!(Dose::new("a", "2015-03-01T07:30").timestamp().unwrap(), utc(7, 30));
    }

    #[test]
    fn test_parse_compact_offset_with_seconds() {
        let dose = Dose::new("a", "2015-03-01T07:30:00+0100");
        assert_eq!(dose.timestamp().unwrap(), utc(6, 30));
    }

    #[test]
    fn test_round_trip_at() {
        let instant = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(Dose::at("x", instant).timestamp().unwrap(), instant);
    }

    #[test]
    fn test_invalid() {
        let dose = Dose::new("bad", "last tuesday");
        assert_eq!(
            dose.timestamp(),
            Err(MatchError::InvalidTimestamp {
                id: "bad".into(),
                date: "last tuesday".into()
            })
        );
        let dose = Dose::new(7_i64, "2015-03-01");
        assert!(matches!(
            dose.timestamp(),
            Err(MatchError::InvalidTimestamp { ref id, .. }) if id == "7"
        ));
    }

    #[test]
    fn test_numeric_id_keeps_shape() {
        let dose: Dose =
            serde_json::from_str(r#"{"id": 17, "date": "2015-03-01T07:30:00Z"}"#).unwrap();
        assert_eq!(dose.id, DoseId::Int(17));
        assert_eq!(dose.id, 17_i64);
        assert_eq!(serde_json::to_value(&dose.id).unwrap(), serde_json::json!(17));

        let dose: Dose = serde_json::from_str(r#"{"id": "17", "date": "2015-03-01T07:30:00Z"}"#).unwrap();
        assert_eq!(dose.id, "17");
        assert_eq!(serde_json::to_value(&dose.id).unwrap(), serde_json::json!("17"));
    }
}
