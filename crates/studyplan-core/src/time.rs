//! Date Utilities
//!
//! Every component goes through these helpers for date arithmetic so that
//! rounding and timezone handling stay consistent. All arithmetic is UTC;
//! callers that think in local time convert before handing data over.
//!
//! "Now" is never read implicitly inside the engine. Operations take a
//! `DateTime<Utc>` argument, and the [`Clock`] trait exists for the outer
//! layers that need to produce one.

use chrono::{DateTime, Datelike, Days, NaiveDate, Timelike, Utc, Weekday};

/// Seconds in a day, used for fractional day differences
const SECONDS_PER_DAY: f64 = 86_400.0;

// ============================================================================
// CLOCK
// ============================================================================

/// Source of the current instant
pub trait Clock {
    /// The current instant
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a fixed instant, for reproducible runs
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

// ============================================================================
// ARITHMETIC
// ============================================================================

/// Whole calendar days from `now` until `date` (negative once the date has passed)
pub fn days_until(date: NaiveDate, now: DateTime<Utc>) -> i64 {
    (date - now.date_naive()).num_days()
}

/// Fractional days elapsed since `instant`, never negative
pub fn days_since(instant: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let seconds = (now - instant).num_seconds() as f64;
    (seconds / SECONDS_PER_DAY).max(0.0)
}

/// Calendar date `days` days after `now`, saturating at chrono's date range
pub fn add_days(now: DateTime<Utc>, days: i64) -> NaiveDate {
    let date = now.date_naive();
    if days >= 0 {
        date.checked_add_days(Days::new(days.unsigned_abs()))
            .unwrap_or(NaiveDate::MAX)
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
            .unwrap_or(NaiveDate::MIN)
    }
}

/// Hour of day (0-23)
pub fn hour_of(instant: DateTime<Utc>) -> usize {
    instant.hour() as usize
}

/// Lowercase English weekday name, used as the key of day-of-week maps
pub fn weekday_key(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// Weekday key of an instant
pub fn weekday_key_of(instant: DateTime<Utc>) -> &'static str {
    weekday_key(instant.weekday())
}

/// Saturday or Sunday
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// All seven weekday keys, Monday first
pub const WEEKDAY_KEYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

// ============================================================================
// SERDE: "HH:MM" CLOCK TIMES
// ============================================================================

/// Serialize `NaiveTime` as `"HH:MM"` and accept `"HH:MM"` or `"HH:MM:SS"`
pub mod clock_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(|e| serde::de::Error::custom(format!("invalid clock time '{}': {}", raw, e)))
    }
}
