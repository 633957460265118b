//! The learner's productivity pattern: how sharp they are by hour and weekday.

use std::collections::BTreeMap;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::time;

/// Productivity assumed for any hour or day without data
pub const NEUTRAL_PRODUCTIVITY: f64 = 0.5;

/// Derived productivity profile. Recomputed on demand, never persisted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductivityPattern {
    /// Index = hour of day (0-23), value in [0, 1]
    pub hourly_productivity: [f64; 24],
    /// Keyed by lowercase weekday name, value in [0, 1]
    pub day_of_week_productivity: BTreeMap<String, f64>,
    /// Minutes
    pub session_length_optimal: u32,
    /// Minutes
    pub break_length_optimal: u32,
    /// Fractional effectiveness lost per hour of continuous study
    pub focus_decline_rate: f64,
}

impl ProductivityPattern {
    /// Productivity at an hour of day (hours wrap at 24)
    pub fn productivity_at(&self, hour: usize) -> f64 {
        self.hourly_productivity[hour % 24]
    }

    /// Mean of the 24 hourly values
    pub fn average_hourly_productivity(&self) -> f64 {
        self.hourly_productivity.iter().sum::<f64>() / 24.0
    }

    /// Productivity on a weekday
    pub fn day_productivity(&self, weekday: Weekday) -> f64 {
        self.day_of_week_productivity
            .get(time::weekday_key(weekday))
            .copied()
            .unwrap_or(NEUTRAL_PRODUCTIVITY)
    }

    /// The `n` most productive hours, best first; ties go to the earlier hour
    pub fn peak_hours(&self, n: usize) -> Vec<usize> {
        let mut hours: Vec<usize> = (0..24).collect();
        hours.sort_by(|a, b| {
            self.hourly_productivity[*b]
                .partial_cmp(&self.hourly_productivity[*a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hours.truncate(n);
        hours
    }

    /// Most productive weekday key; ties go to the earlier day of the week
    pub fn best_day(&self) -> Option<&'static str> {
        let mut best: Option<(&'static str, f64)> = None;
        for key in time::WEEKDAY_KEYS {
            let value = self
                .day_of_week_productivity
                .get(key)
                .copied()
                .unwrap_or(NEUTRAL_PRODUCTIVITY);
            if best.is_none_or(|(_, v)| value > v) {
                best = Some((key, value));
            }
        }
        best.map(|(key, _)| key)
    }
}
