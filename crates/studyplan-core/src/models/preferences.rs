//! Learner preferences: when they can study and for how long.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::time::clock_time;

/// A window of the day the learner may be scheduled in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeBlock {
    #[serde(with = "clock_time")]
    pub start: NaiveTime,
    #[serde(with = "clock_time")]
    pub end: NaiveTime,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

impl TimeBlock {
    /// Build an available block from hour/minute pairs. Invalid times collapse to midnight.
    pub fn new(start: (u32, u32), end: (u32, u32)) -> Self {
        Self {
            start: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap_or_default(),
            end: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap_or_default(),
            available: true,
        }
    }

    /// Length of the block in minutes (zero for inverted blocks)
    pub fn minutes(&self) -> i64 {
        (self.end - self.start).num_minutes().max(0)
    }
}

/// Learner scheduling preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    /// Hours of day (0-23) the learner feels sharpest
    pub peak_hours: Vec<u32>,
    /// Preferred session length in minutes
    pub session_length: u32,
    /// Preferred break length in minutes
    pub break_length: u32,
    pub weekday_blocks: Vec<TimeBlock>,
    pub weekend_blocks: Vec<TimeBlock>,
    pub max_daily_hours: f64,
    /// Minutes of rest enforced between two scheduled sessions
    pub min_break_between_sessions: u32,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            peak_hours: vec![9, 10, 11],
            session_length: 45,
            break_length: 15,
            weekday_blocks: vec![TimeBlock::new((9, 0), (12, 0)), TimeBlock::new((14, 0), (17, 0))],
            weekend_blocks: vec![TimeBlock::new((10, 0), (13, 0))],
            max_daily_hours: 6.0,
            min_break_between_sessions: 15,
        }
    }
}

impl UserPreferences {
    /// Daily study cap, never negative
    pub fn max_daily_minutes(&self) -> i64 {
        (self.max_daily_hours.max(0.0) * 60.0).round() as i64
    }
}
