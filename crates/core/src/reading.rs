use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Display format for every reading timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Wall-clock time of a reading, truncated to whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    pub fn new(at: NaiveDateTime) -> Self {
        use chrono::Timelike;
        // Sub-second precision is not part of the format; drop it so that
        // equality matches what is displayed.
        Self(at.with_nanosecond(0).unwrap_or(at))
    }

    /// Parse a `YYYY-MM-DD HH:MM:SS` string.
    pub fn parse(s: &str) -> Option<Self> {
        NaiveDateTime::parse_from_str(s.trim(), TIMESTAMP_FORMAT)
            .ok()
            .map(Self)
    }

    #[must_use]
    pub fn as_datetime(&self) -> NaiveDateTime {
        self.0
    }

    /// Time-of-day only (`HH:MM:SS`), used for compact axis labels.
    pub fn time_of_day(&self) -> String {
        self.0.format("%H:%M:%S").to_string()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!("expected '{TIMESTAMP_FORMAT}', got '{raw}'"))
        })
    }
}

/// One synthetic sample. Created once per tick and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    value:     f64,
    timestamp: Timestamp,
}

impl Reading {
    pub fn new(value: f64, timestamp: Timestamp) -> Self {
        Self { value, timestamp }
    }

    #[inline]
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[inline]
    #[must_use]
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

/// Round `value` to `decimals` places (`round(x, 1)` semantics).
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .and_then(|d| d.and_hms_opt(h, m, s))
            .unwrap()
    }

    #[test]
    fn timestamp_uses_fixed_format() {
        let ts = Timestamp::new(at(7, 5, 3));
        assert_eq!(ts.to_string(), "2024-03-09 07:05:03");
        assert_eq!(ts.time_of_day(), "07:05:03");
    }

    #[test]
    fn timestamp_drops_subseconds() {
        let with_nanos = at(7, 5, 3)
            .checked_add_signed(chrono::Duration::milliseconds(750))
            .unwrap();
        assert_eq!(Timestamp::new(with_nanos), Timestamp::new(at(7, 5, 3)));
    }

    #[test]
    fn timestamp_parse_round_trips_display() {
        let ts = Timestamp::parse("2024-03-09 23:59:59").unwrap();
        assert_eq!(ts.to_string(), "2024-03-09 23:59:59");
        assert!(Timestamp::parse("09/03/2024").is_none());
    }

    #[test]
    fn reading_serializes_timestamp_as_string() {
        let reading = Reading::new(11.7, Timestamp::new(at(12, 0, 0)));
        let json = serde_json::to_string(&reading).unwrap();
        assert_eq!(json, r#"{"value":11.7,"timestamp":"2024-03-09 12:00:00"}"#);
    }

    #[test]
    fn round_to_one_decimal() {
        assert_eq!(round_to(7.349, 1), 7.3);
        assert_eq!(round_to(-16.96, 1), -17.0);
        assert_eq!(round_to(5.0, 0), 5.0);
    }
}
