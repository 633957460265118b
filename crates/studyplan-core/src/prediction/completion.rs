//! Subject completion forecast.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::PerformancePredictor;
use crate::models::{average_effectiveness, sessions_for_subject, StudySession, Subject, UserPreferences};
use crate::productivity::ProductivityPattern;
use crate::time;

/// Why a subject might not finish on time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompletionRisk {
    /// Needs more hours per day than the learner has
    HighTimeRequirement,
    HighDifficulty,
    NearDeadline,
    /// Recent sessions rate below average
    LowEffectiveness,
    /// Has history, but nothing within the recent window
    NoRecentProgress,
}

impl CompletionRisk {
    pub fn description(&self) -> &'static str {
        match self {
            CompletionRisk::HighTimeRequirement => "Requires more daily hours than are available",
            CompletionRisk::HighDifficulty => "Subject difficulty is high",
            CompletionRisk::NearDeadline => "Deadline is close",
            CompletionRisk::LowEffectiveness => "Study sessions have been less effective than usual",
            CompletionRisk::NoRecentProgress => "No study sessions recently",
        }
    }
}

/// Completion forecast for one subject
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionPrediction {
    pub subject_id: String,
    /// Probability of finishing by the deadline, in [0.1, 1]
    pub probability: f64,
    pub expected_completion_date: NaiveDate,
    /// Grows with the amount of history, in [0, 1]
    pub confidence: f64,
    pub required_daily_hours: f64,
    pub available_daily_hours: f64,
    pub risk_factors: Vec<CompletionRisk>,
    /// At most three
    pub recommendations: Vec<String>,
}

impl PerformancePredictor {
    /// Forecast whether a subject's remaining hours fit before its deadline.
    ///
    /// - `required = remaining / max(1, days to deadline)`
    /// - `available = min(maxDailyHours, avg hourly productivity * 10)`
    /// - `p = min(1, available / required) * (avg effectiveness / 5) * 1.2`,
    ///   minus 0.1 per difficulty point above 3, floored at 0.1
    ///
    /// A subject without sessions is forecast from the productivity pattern
    /// and a neutral effectiveness alone.
    pub fn predict_subject_completion(
        &self,
        subject: &Subject,
        sessions: &[StudySession],
        pattern: &ProductivityPattern,
        prefs: &UserPreferences,
        now: DateTime<Utc>,
    ) -> CompletionPrediction {
        let cfg = &self.config;
        let subject_sessions: Vec<&StudySession> = sessions_for_subject(sessions, &subject.id).collect();

        let remaining = subject.remaining_hours();
        let days = time::days_until(subject.deadline, now);
        let required = remaining / (days.max(1) as f64);
        let available = prefs
            .max_daily_hours
            .max(0.0)
            .min(pattern.average_hourly_productivity() * cfg.daily_capacity_hours);

        let avg_effectiveness = average_effectiveness(subject_sessions.iter().copied())
            .unwrap_or(cfg.neutral_effectiveness);

        let not_sized = subject.estimated_hours <= 0.0 && subject.completed_hours <= 0.0;
        let probability = if not_sized {
            cfg.new_subject_probability
        } else if remaining <= 0.0 {
            1.0
        } else {
            let capacity = if required > 0.0 { (available / required).min(1.0) } else { 1.0 };
            let adjusted = (capacity * (avg_effectiveness / 5.0) * cfg.effectiveness_boost).min(1.0);
            let penalty = (subject.difficulty_clamped() as f64 - 3.0) * cfg.difficulty_penalty;
            (adjusted - penalty).clamp(cfg.min_completion_probability, 1.0)
        };

        let daily_progress = available * (avg_effectiveness / 5.0);
        let days_needed = if remaining <= 0.0 {
            0
        } else if daily_progress > 0.0 {
            ((remaining / daily_progress).ceil() as i64).min(cfg.max_forecast_days)
        } else {
            cfg.max_forecast_days
        };
        let expected_completion_date = time::add_days(now, days_needed);

        let confidence = (subject_sessions.len() as f64
            / cfg.confidence_saturation_sessions.max(1) as f64)
            .min(1.0);

        let mut risk_factors = Vec::new();
        if remaining > 0.0 && required > available {
            risk_factors.push(CompletionRisk::HighTimeRequirement);
        }
        if subject.difficulty_clamped() >= 4 {
            risk_factors.push(CompletionRisk::HighDifficulty);
        }
        if remaining > 0.0 && days <= cfg.near_deadline_days {
            risk_factors.push(CompletionRisk::NearDeadline);
        }
        if !subject_sessions.is_empty() && avg_effectiveness < cfg.low_effectiveness_threshold {
            risk_factors.push(CompletionRisk::LowEffectiveness);
        }
        if !subject_sessions.is_empty() {
            let recent_cutoff = now - Duration::days(cfg.recent_activity_days);
            if !subject_sessions.iter().any(|s| s.start_time >= recent_cutoff) {
                risk_factors.push(CompletionRisk::NoRecentProgress);
            }
        }

        let recommendations = self.completion_recommendations(subject, &risk_factors, required);

        CompletionPrediction {
            subject_id: subject.id.clone(),
            probability,
            expected_completion_date,
            confidence,
            required_daily_hours: required,
            available_daily_hours: available,
            risk_factors,
            recommendations,
        }
    }

    fn completion_recommendations(
        &self,
        subject: &Subject,
        risks: &[CompletionRisk],
        required: f64,
    ) -> Vec<String> {
        let mut recommendations: Vec<String> = risks
            .iter()
            .map(|risk| match risk {
                CompletionRisk::HighTimeRequirement => format!(
                    "Plan {:.1} hours per day for {} or renegotiate the deadline",
                    required, subject.name
                ),
                CompletionRisk::HighDifficulty => format!(
                    "Schedule {} during your peak hours and break it into smaller topics",
                    subject.name
                ),
                CompletionRisk::NearDeadline => {
                    format!("Focus on the highest-value topics of {} first", subject.name)
                }
                CompletionRisk::LowEffectiveness => format!(
                    "Try a different technique for {}, such as active recall",
                    subject.name
                ),
                CompletionRisk::NoRecentProgress => {
                    format!("Resume {} with a short session today", subject.name)
                }
            })
            .collect();

        if recommendations.is_empty() {
            recommendations.push(format!("Keep your current pace on {}", subject.name));
        }
        recommendations.truncate(self.config.max_recommendations);
        recommendations
    }
}
