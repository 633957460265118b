//! Learning velocity: study hours per day, its trend, and a short projection.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::PerformancePredictor;
use crate::models::{average_effectiveness, StudySession, Subject};
use crate::time;

/// Direction of the learner's recent velocity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VelocityTrend {
    Increasing,
    Stable,
    Decreasing,
}

impl VelocityTrend {
    /// Multiplier applied to the current velocity when projecting
    pub fn factor(&self) -> f64 {
        match self {
            VelocityTrend::Increasing => 1.1,
            VelocityTrend::Stable => 1.0,
            VelocityTrend::Decreasing => 0.9,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VelocityTrend::Increasing => "increasing",
            VelocityTrend::Stable => "stable",
            VelocityTrend::Decreasing => "decreasing",
        }
    }
}

/// Study pace summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningVelocity {
    /// Hours per day over the last week
    pub current_velocity: f64,
    pub projected_velocity: f64,
    pub trend: VelocityTrend,
    /// Hours per day for each past week, most recent first
    pub weekly_velocities: Vec<f64>,
    /// 0.8 to 1.2
    pub motivation_multiplier: f64,
    /// 0.9 to 1.1
    pub consistency_multiplier: f64,
}

impl PerformancePredictor {
    /// Current velocity, trend, and projected velocity.
    ///
    /// The trend compares the mean of the latest three weekly velocities with
    /// the three before them; a relative change beyond 10% is a trend.
    pub fn predict_learning_velocity(
        &self,
        sessions: &[StudySession],
        subjects: &[Subject],
        now: DateTime<Utc>,
    ) -> LearningVelocity {
        let cfg = &self.config;
        let window = cfg.velocity_window_days.max(1);
        let weeks = cfg.trend_weeks.max(1);

        let weekly_velocities: Vec<f64> = (0..weeks * 2)
            .map(|w| {
                let end = now - Duration::days(window * w as i64);
                let start = end - Duration::days(window);
                hours_between(sessions, start, end) / window as f64
            })
            .collect();

        let current_velocity = weekly_velocities[0];
        let recent = mean(&weekly_velocities[..weeks]);
        let prior = mean(&weekly_velocities[weeks..]);
        let trend = if prior > 0.0 {
            let change = (recent - prior) / prior;
            if change > cfg.trend_threshold {
                VelocityTrend::Increasing
            } else if change < -cfg.trend_threshold {
                VelocityTrend::Decreasing
            } else {
                VelocityTrend::Stable
            }
        } else if recent > 0.0 {
            VelocityTrend::Increasing
        } else {
            VelocityTrend::Stable
        };

        let daily = self.daily_hours(sessions, now);
        let consistency_multiplier = 0.9 + 0.2 * inverse_variation(&daily);
        let motivation_multiplier = 0.8 + 0.4 * self.motivation_score(sessions, subjects, &daily, now);

        let projected_velocity =
            current_velocity * trend.factor() * motivation_multiplier * consistency_multiplier;

        LearningVelocity {
            current_velocity,
            projected_velocity,
            trend,
            weekly_velocities,
            motivation_multiplier,
            consistency_multiplier,
        }
    }

    /// Hours studied on each of the last `consistency_window_days` days, today first
    pub(crate) fn daily_hours(&self, sessions: &[StudySession], now: DateTime<Utc>) -> Vec<f64> {
        let days = self.config.consistency_window_days.max(1) as usize;
        let mut daily = vec![0.0; days];
        for session in sessions.iter().filter(|s| s.start_time <= now) {
            let index = time::days_since(session.start_time, now).floor() as usize;
            if index < days {
                daily[index] += session.hours();
            }
        }
        daily
    }

    /// Blend of study-day consistency, recent effectiveness, and overall completion, in [0, 1]
    fn motivation_score(
        &self,
        sessions: &[StudySession],
        subjects: &[Subject],
        daily: &[f64],
        now: DateTime<Utc>,
    ) -> f64 {
        let active_days = daily.iter().filter(|h| **h > 0.0).count() as f64 / daily.len().max(1) as f64;

        let cutoff = now - Duration::days(self.config.consistency_window_days);
        let recent_effectiveness = average_effectiveness(
            sessions.iter().filter(|s| s.start_time > cutoff && s.start_time <= now),
        )
        .unwrap_or(self.config.neutral_effectiveness)
            / 5.0;

        let estimated: f64 = subjects.iter().map(|s| s.estimated_hours.max(0.0)).sum();
        let completed: f64 = subjects
            .iter()
            .map(|s| s.completed_hours.max(0.0).min(s.estimated_hours.max(0.0)))
            .sum();
        let completion = if estimated > 0.0 { (completed / estimated).clamp(0.0, 1.0) } else { 0.0 };

        ((active_days + recent_effectiveness + completion) / 3.0).clamp(0.0, 1.0)
    }
}

/// Total hours of sessions starting in `(start, end]`
pub(crate) fn hours_between(sessions: &[StudySession], start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    sessions
        .iter()
        .filter(|s| s.start_time > start && s.start_time <= end)
        .map(|s| s.hours())
        .sum()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// `1 / (1 + coefficient of variation)`: 1.0 for perfectly even study, toward 0 for bursts
fn inverse_variation(values: &[f64]) -> f64 {
    let m = mean(values);
    if m <= 0.0 {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    let cv = variance.sqrt() / m;
    1.0 / (1.0 + cv)
}
