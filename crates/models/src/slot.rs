use crate::validation::ValidationError;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use serde::{Serialize, Serializer};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Number of tables that can be booked in a single slot
pub const TABLES_PER_SLOT: i32 = 10;

/// Accepted wall-clock layouts, tried in order
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Layouts carrying a UTC offset, converted to restaurant local time
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M%:z"];

/// A one-hour booking window, identified by its start at the top of the hour
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSlot(NaiveDateTime);

impl TimeSlot {
    /// Parses a requested time and normalizes it to its slot
    ///
    /// # Arguments
    /// * `raw` - An ISO-8601 date-time such as `2099-01-01T19:00`
    /// * `now` - The current restaurant-local time
    ///
    /// # Returns
    /// The slot containing the requested time, or an error if the input does
    /// not parse or is not strictly after `now`
    pub fn parse(raw: &str, now: NaiveDateTime) -> Result<Self, ValidationError> {
        let requested = parse_datetime(raw)?;

        if requested <= now {
            return Err(ValidationError::PastTimeSlot);
        }

        Ok(Self::containing(requested))
    }

    /// Parses a requested time against the current local clock
    pub fn parse_now(raw: &str) -> Result<Self, ValidationError> {
        Self::parse(raw, Local::now().naive_local())
    }

    /// The slot containing the given instant
    pub fn containing(at: NaiveDateTime) -> Self {
        let midnight = at.date().and_time(NaiveTime::MIN);
        Self(midnight + TimeDelta::hours(i64::from(at.hour())))
    }

    pub fn start(self) -> NaiveDateTime {
        self.0
    }

    /// The slot `hours` after this one
    pub fn offset(self, hours: i64) -> Self {
        Self(self.0 + TimeDelta::hours(hours))
    }

    /// Short human-readable form used in customer messages
    pub fn label(self) -> String {
        self.0.format("%Y-%m-%d %H:%M").to_string()
    }
}

impl Display for TimeSlot {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%S"))
    }
}

impl Serialize for TimeSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parses an ISO-8601 date-time into restaurant-local wall-clock time
pub fn parse_datetime(raw: &str) -> Result<NaiveDateTime, ValidationError> {
    let raw = raw.trim();

    if let Some(parsed) = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
    {
        return Ok(parsed);
    }

    if let Some(parsed) = OFFSET_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(raw, format).ok())
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok())
    {
        return Ok(parsed.with_timezone(&Local).naive_local());
    }

    // A bare date means midnight
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|_| ValidationError::MalformedTimeSlot(raw.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").unwrap()
    }

    #[test]
    fn test_slot_truncates_to_hour() {
        let now = at("2025-01-01 00:00:00");

        for raw in [
            "2099-01-01T19:00",
            "2099-01-01T19:59",
            "2099-01-01T19:30:45",
            "2099-01-01T19:30:45.123456",
            "2099-01-01 19:01",
        ] {
            let slot = TimeSlot::parse(raw, now).unwrap();
            let start = slot.start();

            assert_eq!(start, at("2099-01-01 19:00:00"), "input {raw}");
            assert_eq!(start.minute(), 0);
            assert_eq!(start.second(), 0);
            assert_eq!(start.nanosecond(), 0);
        }
    }

    #[test]
    fn test_same_hour_requests_collide() {
        let now = at("2025-01-01 00:00:00");
        let a = TimeSlot::parse("2099-01-01T19:05", now).unwrap();
        let b = TimeSlot::parse("2099-01-01T19:55", now).unwrap();
        let c = TimeSlot::parse("2099-01-01T20:00", now).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_past_and_present_are_rejected() {
        let now = at("2025-06-01 18:30:00");

        assert_eq!(
            TimeSlot::parse("2020-01-01T19:00", now),
            Err(ValidationError::PastTimeSlot)
        );
        assert_eq!(
            TimeSlot::parse("2025-06-01T18:30", now),
            Err(ValidationError::PastTimeSlot)
        );
        // Later in the current hour is still accepted
        assert_eq!(
            TimeSlot::parse("2025-06-01T18:45", now).unwrap().start(),
            at("2025-06-01 18:00:00")
        );
    }

    #[test]
    fn test_malformed_input() {
        let now = at("2025-01-01 00:00:00");

        for raw in ["", "tomorrow", "2099-13-01T19:00", "19:00"] {
            assert!(
                matches!(
                    TimeSlot::parse(raw, now),
                    Err(ValidationError::MalformedTimeSlot(_))
                ),
                "input {raw:?}"
            );
        }
    }

    #[test]
    fn test_date_only_and_offset_inputs() {
        assert_eq!(
            parse_datetime("2099-01-01").unwrap(),
            at("2099-01-01 00:00:00")
        );

        let with_offset = parse_datetime("2099-01-01T19:00:00+00:00").unwrap();
        let expected = DateTime::parse_from_rfc3339("2099-01-01T19:00:00+00:00")
            .unwrap()
            .with_timezone(&Local)
            .naive_local();
        assert_eq!(with_offset, expected);

        for raw in ["2099-01-01T19:00:00Z", "2099-01-01T19:00:00.250Z"] {
            let zulu = parse_datetime(raw).unwrap();
            let expected = DateTime::parse_from_rfc3339(raw)
                .unwrap()
                .with_timezone(&Local)
                .naive_local();
            assert_eq!(zulu, expected, "input {raw}");
        }
        assert_eq!(
            parse_datetime("2099-01-01T19:00:00Z").unwrap(),
            parse_datetime("2099-01-01T19:00:00+00:00").unwrap()
        );
    }

    #[test]
    fn test_display_and_label() {
        let slot = TimeSlot::containing(at("2099-01-01 19:42:10"));

        assert_eq!(slot.to_string(), "2099-01-01T19:00:00");
        assert_eq!(slot.label(), "2099-01-01 19:00");
        assert_eq!(
            serde_json::to_string(&slot).unwrap(),
            "\"2099-01-01T19:00:00\""
        );
        assert_eq!(slot.offset(2).to_string(), "2099-01-01T21:00:00");
    }
}
