//! Productivity Pattern Analyzer
//!
//! Learns when the learner studies well from their session history.
//!
//! With fewer than `min_sessions` sessions there is nothing trustworthy to
//! learn from, so a hand-authored default curve is returned instead. Above
//! that threshold, each hour and weekday bucket scores
//! `effective minutes / total minutes` where a session's effective minutes
//! are `duration * effectiveness / 5`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::pattern::{ProductivityPattern, NEUTRAL_PRODUCTIVITY};
use crate::models::StudySession;
use crate::time;

// ============================================================================
// DEFAULT CURVE
// ============================================================================

/// An inclusive band of hours sharing one productivity value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourBand {
    pub start_hour: usize,
    pub end_hour: usize,
    pub productivity: f64,
}

impl HourBand {
    fn new(start_hour: usize, end_hour: usize, productivity: f64) -> Self {
        Self { start_hour, end_hour, productivity }
    }

    fn contains(&self, hour: usize) -> bool {
        (self.start_hour..=self.end_hour).contains(&hour)
    }
}

/// Productivity curve used for learners without enough history.
///
/// Peak bands are checked in order; the first band containing an hour wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DefaultProductivityCurve {
    pub peak_bands: Vec<HourBand>,
    /// Hours outside the peak bands but inside this band
    pub daytime: HourBand,
    /// Everything else
    pub night_productivity: f64,
    pub day_of_week: BTreeMap<String, f64>,
}

impl Default for DefaultProductivityCurve {
    fn default() -> Self {
        let day_of_week = [
            ("monday", 0.8),
            ("tuesday", 0.9),
            ("wednesday", 0.85),
            ("thursday", 0.8),
            ("friday", 0.7),
            ("saturday", 0.75),
            ("sunday", 0.7),
        ]
        .into_iter()
        .map(|(day, value)| (day.to_string(), value))
        .collect();

        Self {
            peak_bands: vec![
                HourBand::new(9, 11, 0.9),
                HourBand::new(14, 16, 0.7),
                HourBand::new(19, 21, 0.8),
            ],
            daytime: HourBand::new(6, 22, NEUTRAL_PRODUCTIVITY),
            night_productivity: 0.2,
            day_of_week,
        }
    }
}

impl DefaultProductivityCurve {
    /// Productivity the curve assigns to an hour
    pub fn hourly(&self, hour: usize) -> f64 {
        if let Some(band) = self.peak_bands.iter().find(|b| b.contains(hour)) {
            band.productivity
        } else if self.daytime.contains(hour) {
            self.daytime.productivity
        } else {
            self.night_productivity
        }
    }
}

// ============================================================================
// ANALYZER CONFIG
// ============================================================================

/// Tunables for the productivity analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductivityConfig {
    /// Below this many sessions the default curve is used
    pub min_sessions: usize,
    pub default_curve: DefaultProductivityCurve,
    /// Session length reported when no bucket has data (minutes)
    pub default_session_length: u32,
    /// Width of the session-length buckets (minutes)
    pub session_bucket_minutes: u32,
    /// Break length is not learned from data; this value is always reported
    pub break_length: u32,
    /// Focus decline reported when there are too few long sessions to measure it
    pub default_focus_decline_rate: f64,
    /// Sessions at least this long count as "long" (minutes)
    pub long_session_minutes: u32,
    /// Long sessions needed before focus decline is measured
    pub min_long_sessions: usize,
    /// Upper bound on the measured focus decline per hour
    pub max_focus_decline_rate: f64,
}

impl Default for ProductivityConfig {
    fn default() -> Self {
        Self {
            min_sessions: 10,
            default_curve: DefaultProductivityCurve::default(),
            default_session_length: 45,
            session_bucket_minutes: 15,
            break_length: 15,
            default_focus_decline_rate: 0.02,
            long_session_minutes: 60,
            min_long_sessions: 5,
            max_focus_decline_rate: 0.2,
        }
    }
}

// ============================================================================
// ANALYZER
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
struct Bucket {
    total: f64,
    effective: f64,
}

impl Bucket {
    fn add(&mut self, session: &StudySession) {
        let duration = session.duration as f64;
        self.total += duration;
        self.effective += duration * (session.effectiveness_clamped() / 5.0);
    }

    fn productivity(&self) -> f64 {
        if self.total > 0.0 {
            (self.effective / self.total).clamp(0.0, 1.0)
        } else {
            NEUTRAL_PRODUCTIVITY
        }
    }
}

/// Derives a [`ProductivityPattern`] from session history
#[derive(Debug, Clone, Default)]
pub struct ProductivityPatternAnalyzer {
    config: ProductivityConfig,
}

impl ProductivityPatternAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ProductivityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProductivityConfig {
        &self.config
    }

    /// The pattern used when there is not enough history
    pub fn default_pattern(&self) -> ProductivityPattern {
        let curve = &self.config.default_curve;
        let mut hourly = [0.0; 24];
        for (hour, value) in hourly.iter_mut().enumerate() {
            *value = curve.hourly(hour);
        }

        let mut days = BTreeMap::new();
        for key in time::WEEKDAY_KEYS {
            let value = curve.day_of_week.get(key).copied().unwrap_or(NEUTRAL_PRODUCTIVITY);
            days.insert(key.to_string(), value);
        }

        ProductivityPattern {
            hourly_productivity: hourly,
            day_of_week_productivity: days,
            session_length_optimal: self.config.default_session_length,
            break_length_optimal: self.config.break_length,
            focus_decline_rate: self.config.default_focus_decline_rate,
        }
    }

    /// Analyze session history. Identical input always yields an identical pattern.
    pub fn analyze(&self, sessions: &[StudySession]) -> ProductivityPattern {
        if sessions.len() < self.config.min_sessions {
            tracing::debug!(
                "Only {} sessions (< {}), using default productivity curve",
                sessions.len(),
                self.config.min_sessions
            );
            return self.default_pattern();
        }

        let mut hours = [Bucket::default(); 24];
        let mut days: BTreeMap<&'static str, Bucket> = BTreeMap::new();

        for session in sessions {
            hours[time::hour_of(session.start_time)].add(session);
            days.entry(time::weekday_key_of(session.start_time))
                .or_default()
                .add(session);
        }

        let mut hourly = [0.0; 24];
        for (value, bucket) in hourly.iter_mut().zip(hours.iter()) {
            *value = bucket.productivity();
        }

        let day_of_week_productivity = time::WEEKDAY_KEYS
            .iter()
            .map(|key| {
                let value = days.get(key).map(Bucket::productivity).unwrap_or(NEUTRAL_PRODUCTIVITY);
                (key.to_string(), value)
            })
            .collect();

        ProductivityPattern {
            hourly_productivity: hourly,
            day_of_week_productivity,
            session_length_optimal: self.optimal_session_length(sessions),
            break_length_optimal: self.config.break_length,
            focus_decline_rate: self.focus_decline_rate(sessions),
        }
    }

    /// Session-length bucket with the highest mean effectiveness.
    ///
    /// Lengths are rounded to the nearest bucket (minimum one bucket); on a
    /// tie the shorter bucket wins.
    fn optimal_session_length(&self, sessions: &[StudySession]) -> u32 {
        let width = self.config.session_bucket_minutes.max(1);
        let mut buckets: BTreeMap<u32, (f64, usize)> = BTreeMap::new();

        for session in sessions {
            let rounded = ((session.duration as f64 / width as f64).round() as u32).max(1) * width;
            let entry = buckets.entry(rounded).or_insert((0.0, 0));
            entry.0 += session.effectiveness_clamped();
            entry.1 += 1;
        }

        let mut best: Option<(u32, f64)> = None;
        for (length, (sum, count)) in buckets {
            let mean = sum / count as f64;
            if best.is_none_or(|(_, b)| mean > b) {
                best = Some((length, mean));
            }
        }

        best.map(|(length, _)| length)
            .unwrap_or(self.config.default_session_length)
    }

    /// Effectiveness lost per hour of study, measured from long vs short sessions.
    ///
    /// This is a deliberately shallow heuristic: without at least
    /// `min_long_sessions` long sessions the configured default is reported.
    fn focus_decline_rate(&self, sessions: &[StudySession]) -> f64 {
        let (long, short): (Vec<&StudySession>, Vec<&StudySession>) = sessions
            .iter()
            .partition(|s| s.duration >= self.config.long_session_minutes);

        if long.len() < self.config.min_long_sessions || short.is_empty() {
            return self.config.default_focus_decline_rate;
        }

        let mean = |group: &[&StudySession]| {
            group.iter().map(|s| s.effectiveness_clamped()).sum::<f64>() / group.len() as f64
        };
        let long_hours = long.iter().map(|s| s.hours()).sum::<f64>() / long.len() as f64;
        if long_hours <= 0.0 {
            return self.config.default_focus_decline_rate;
        }

        let drop = ((mean(&short) - mean(&long)) / 5.0).max(0.0);
        (drop / long_hours).clamp(0.0, self.config.max_focus_decline_rate)
    }
}
