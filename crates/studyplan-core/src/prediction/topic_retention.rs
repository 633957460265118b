//! Topic-level retention forecast.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PerformancePredictor;
use crate::models::{newest_first, sessions_for_topic, StudySession, Subject, Topic};
use crate::time;

/// Floor on memory strength when evaluating the forgetting curve
const MIN_CURVE_STRENGTH: f64 = 0.1;

/// Days of interval earned per unit of memory strength
const INTERVAL_DAYS_PER_STRENGTH: f64 = 7.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicRetentionForecast {
    pub topic_id: String,
    pub memory_strength: f64,
    /// Estimated probability of recall right now, in [0, 1]
    pub retention: f64,
    pub optimal_interval_days: u32,
    pub days_since_review: f64,
    pub session_count: usize,
}

impl PerformancePredictor {
    /// Memory strength, current retention, and the next useful interval.
    ///
    /// - `strength = (avg effectiveness / 5) * ln(n + 1) * (6 - subject difficulty) / 5`
    /// - `retention = curve(days, ease, strength) * (6 - topic difficulty) / 5`
    /// - `interval = clamp(1, 30, round(strength * 7))`
    pub fn predict_topic_retention(
        &self,
        topic: &Topic,
        subject: &Subject,
        sessions: &[StudySession],
        now: DateTime<Utc>,
    ) -> TopicRetentionForecast {
        let history = newest_first(sessions_for_topic(sessions, &topic.id));

        let last_activity = topic
            .last_reviewed
            .or_else(|| history.first().map(|s| s.start_time));
        let days_since_review = last_activity
            .map(|at| time::days_since(at, now))
            .unwrap_or(0.0);

        if history.is_empty() {
            return TopicRetentionForecast {
                topic_id: topic.id.clone(),
                memory_strength: 0.0,
                retention: self.config.default_retention,
                optimal_interval_days: 1,
                days_since_review,
                session_count: 0,
            };
        }

        let n = history.len() as f64;
        let avg = history.iter().map(|s| s.effectiveness_clamped()).sum::<f64>() / n;
        let subject_ease = (6.0 - subject.difficulty_clamped() as f64) / 5.0;
        let memory_strength = (avg / 5.0) * (n + 1.0).ln() * subject_ease;

        let topic_ease = (6.0 - topic.difficulty_clamped() as f64) / 5.0;
        let curve = self.retention.retention_probability(
            days_since_review,
            topic.ease_factor,
            memory_strength.max(MIN_CURVE_STRENGTH),
        );
        let retention = (curve * topic_ease).clamp(0.0, 1.0);

        let optimal_interval_days = ((memory_strength * INTERVAL_DAYS_PER_STRENGTH).round() as u32)
            .clamp(1, self.config.max_review_interval_days.max(1));

        TopicRetentionForecast {
            topic_id: topic.id.clone(),
            memory_strength,
            retention,
            optimal_interval_days,
            days_since_review,
            session_count: history.len(),
        }
    }
}
