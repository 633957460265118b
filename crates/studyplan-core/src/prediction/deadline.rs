//! Deadline success odds per subject.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::PerformancePredictor;
use crate::models::{average_effectiveness, sessions_for_subject, StudySession, Subject};
use crate::time;

/// Success forecast for one subject's deadline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadlineForecast {
    pub subject_id: String,
    pub subject_name: String,
    /// Always within [0.05, 0.95]
    pub probability: f64,
    /// Zero once the deadline has passed
    pub days_remaining: i64,
    pub required_daily_hours: f64,
    /// The subject's share of the learner's current velocity
    pub achievable_daily_hours: f64,
    /// At most two
    pub recommendations: Vec<String>,
}

impl PerformancePredictor {
    /// Deadline success probability for every subject, most at-risk first.
    ///
    /// Starts at 1.0 and multiplies penalty factors for:
    /// 1. required vs achievable daily hours (0.3 / 0.6 / 0.8 tiers)
    /// 2. difficulty (5: 0.8, 4: 0.9)
    /// 3. no activity in the last week (0.7), else low recent effectiveness (0.8)
    /// 4. time pressure (3 days or less: 0.7, a week or less: 0.85)
    pub fn predict_deadline_success(
        &self,
        subjects: &[Subject],
        sessions: &[StudySession],
        current_velocity: f64,
        now: DateTime<Utc>,
    ) -> Vec<DeadlineForecast> {
        let cfg = &self.config;
        let active = subjects.iter().filter(|s| s.remaining_hours() > 0.0).count().max(1);
        let share = current_velocity.max(0.0) / active as f64;

        let mut forecasts: Vec<DeadlineForecast> = subjects
            .iter()
            .map(|subject| {
                let days_remaining = time::days_until(subject.deadline, now).max(0);
                let remaining = subject.remaining_hours();
                let required = remaining / days_remaining.max(1) as f64;

                let probability = if remaining <= 0.0 {
                    cfg.max_success_probability
                } else {
                    let mut p = 1.0;
                    p *= hours_factor(required, share);
                    p *= match subject.difficulty_clamped() {
                        5 => 0.8,
                        4 => 0.9,
                        _ => 1.0,
                    };

                    let recent_cutoff = now - Duration::days(cfg.recent_activity_days);
                    let recent: Vec<&StudySession> = sessions_for_subject(sessions, &subject.id)
                        .filter(|s| s.start_time >= recent_cutoff && s.start_time <= now)
                        .collect();
                    match average_effectiveness(recent.iter().copied()) {
                        None => p *= 0.7,
                        Some(avg) if avg < cfg.low_effectiveness_threshold => p *= 0.8,
                        Some(_) => {}
                    }

                    if days_remaining <= 3 {
                        p *= 0.7;
                    } else if days_remaining <= cfg.near_deadline_days {
                        p *= 0.85;
                    }
                    p
                };

                let probability =
                    probability.clamp(cfg.min_success_probability, cfg.max_success_probability);

                DeadlineForecast {
                    subject_id: subject.id.clone(),
                    subject_name: subject.name.clone(),
                    probability,
                    days_remaining,
                    required_daily_hours: required,
                    achievable_daily_hours: share,
                    recommendations: self.deadline_recommendations(subject, required, share, probability),
                }
            })
            .collect();

        forecasts.sort_by(|a, b| {
            a.probability
                .partial_cmp(&b.probability)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        forecasts
    }

    fn deadline_recommendations(
        &self,
        subject: &Subject,
        required: f64,
        achievable: f64,
        probability: f64,
    ) -> Vec<String> {
        let mut out = Vec::new();
        if subject.remaining_hours() <= 0.0 {
            out.push(format!("{} is complete; switch to spaced review", subject.name));
            return out;
        }
        if required > achievable {
            out.push(format!(
                "Increase {} to {:.1} hours per day (currently {:.1})",
                subject.name, required, achievable
            ));
        }
        if probability < 0.5 {
            out.push(format!(
                "Narrow the scope of {} to its most important topics",
                subject.name
            ));
        }
        if subject.difficulty_clamped() >= 4 {
            out.push(format!("Study {} during your peak hours", subject.name));
        }
        if out.is_empty() {
            out.push(format!("{} is on track", subject.name));
        }
        out.truncate(self.config.deadline_recommendations);
        out
    }
}

/// Penalty for a gap between required and achievable daily hours
fn hours_factor(required: f64, achievable: f64) -> f64 {
    if required <= 0.0 {
        return 1.0;
    }
    if achievable <= 0.0 {
        return 0.3;
    }
    let ratio = required / achievable;
    if ratio > 2.0 {
        0.3
    } else if ratio > 1.5 {
        0.6
    } else if ratio > 1.0 {
        0.8
    } else {
        1.0
    }
}
