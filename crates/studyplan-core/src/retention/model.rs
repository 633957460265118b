//! Retention Model
//!
//! Per-topic memory modelling:
//!
//! 1. **Adaptive review**: SM-2 driven by the latest session's effectiveness,
//!    nudged by the learner's overall retention rate and compressed when a
//!    topic is badly overdue
//! 2. **Forgetting curve**: `R = exp(-t / (S * EF))`
//! 3. **Mastery**: blend of repetition count, ease, and recent effectiveness
//! 4. **Review queue**: topics ranked by forgetting risk, weakness, and difficulty

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::sm2::{self, ReviewSchedule};
use crate::models::{
    newest_first, sessions_for_topic, StudySession, Subject, Topic, DEFAULT_EASE_FACTOR,
    MIN_EASE_FACTOR,
};
use crate::time;

// ============================================================================
// RETENTION CONFIG
// ============================================================================

/// Tunables for the retention model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetentionConfig {
    /// SM-2 ease floor
    pub min_ease_factor: f64,
    /// Ease factor treated as "fully easy" when normalizing for mastery
    pub reference_ease_factor: f64,
    /// Below this retention rate, quality is shifted down
    pub low_retention_threshold: f64,
    /// Above this retention rate, quality is shifted up
    pub high_retention_threshold: f64,
    /// Size of the retention-rate quality shift
    pub retention_quality_shift: f64,
    /// Quality used when no session speaks for a topic
    pub neutral_quality: f64,
    /// Overdue by more than this multiple of the new interval triggers compression
    pub overdue_ratio: f64,
    /// Interval multiplier applied under urgency compression
    pub urgency_compression: f64,
    /// Ceiling on any interval this model hands out
    pub max_review_interval_days: u32,
    /// Default review queue length
    pub max_reviews_per_day: usize,
    /// Review count at which the repetition term of mastery saturates
    pub mastery_review_saturation: u32,
    /// Sessions considered for the effectiveness term of mastery
    pub mastery_recent_sessions: usize,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            min_ease_factor: MIN_EASE_FACTOR,
            reference_ease_factor: DEFAULT_EASE_FACTOR,
            low_retention_threshold: 0.7,
            high_retention_threshold: 0.9,
            retention_quality_shift: 0.5,
            neutral_quality: 3.0,
            overdue_ratio: 1.5,
            urgency_compression: 0.8,
            max_review_interval_days: 365,
            max_reviews_per_day: 10,
            mastery_review_saturation: 10,
            mastery_recent_sessions: 5,
        }
    }
}

// ============================================================================
// RESULTS
// ============================================================================

/// Result of an adaptive review computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptiveReview {
    pub topic_id: String,
    pub schedule: ReviewSchedule,
    /// Quality actually fed into SM-2 after the retention-rate shift
    pub quality_used: f64,
    /// Days past the previous due date (0 when on time or never reviewed)
    pub days_overdue: f64,
    /// Whether the interval was shortened because the topic was badly overdue
    pub urgency_compressed: bool,
}

/// A topic's place in the review queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPriority {
    pub topic_id: String,
    pub subject_id: String,
    pub score: f64,
    pub retention: f64,
    pub mastery: f64,
}

// ============================================================================
// RETENTION MODEL
// ============================================================================

/// Spaced-repetition and forgetting-curve model for topics
#[derive(Debug, Clone, Default)]
pub struct RetentionModel {
    config: RetentionConfig,
}

impl RetentionModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RetentionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RetentionConfig {
        &self.config
    }

    /// One SM-2 step using this model's ease floor and interval ceiling
    pub fn next_review(
        &self,
        quality: f64,
        ease_factor: f64,
        interval: u32,
        review_count: u32,
        now: DateTime<Utc>,
    ) -> ReviewSchedule {
        let mut schedule = sm2::next_review_with_floor(
            quality,
            ease_factor,
            interval,
            review_count,
            now,
            self.config.min_ease_factor,
        );
        let ceiling = self.config.max_review_interval_days.max(1);
        if schedule.interval > ceiling {
            schedule.interval = ceiling;
            schedule.next_review_date = time::add_days(now, ceiling as i64);
        }
        schedule
    }

    /// SM-2 driven by the learner's most recent session on this topic.
    ///
    /// Sessions tagged with the topic are preferred; otherwise the latest
    /// session of the owning subject speaks for it. A learner with weak
    /// overall retention gets shorter intervals, a strong one longer.
    pub fn adaptive_review(
        &self,
        topic: &Topic,
        recent_sessions: &[StudySession],
        user_retention_rate: f64,
        now: DateTime<Utc>,
    ) -> AdaptiveReview {
        let latest = newest_first(sessions_for_topic(recent_sessions, &topic.id))
            .first()
            .copied()
            .or_else(|| {
                newest_first(
                    recent_sessions
                        .iter()
                        .filter(|s| s.subject_id == topic.subject_id),
                )
                .first()
                .copied()
            });

        let mut quality = latest
            .map(|s| s.effectiveness_clamped())
            .unwrap_or(self.config.neutral_quality);

        if user_retention_rate < self.config.low_retention_threshold {
            quality -= self.config.retention_quality_shift;
        } else if user_retention_rate > self.config.high_retention_threshold {
            quality += self.config.retention_quality_shift;
        }

        let mut schedule = self.next_review(
            quality,
            topic.ease_factor,
            topic.review_interval,
            topic.review_count,
            now,
        );

        let days_overdue = topic
            .last_reviewed
            .map(|last| (time::days_since(last, now) - topic.review_interval as f64).max(0.0))
            .unwrap_or(0.0);

        let urgency_compressed = days_overdue > self.config.overdue_ratio * schedule.interval as f64;
        if urgency_compressed {
            let compressed =
                ((schedule.interval as f64) * self.config.urgency_compression).round().max(1.0) as u32;
            tracing::debug!(
                "Topic {} overdue by {:.1} days, compressing interval {} -> {}",
                topic.id,
                days_overdue,
                schedule.interval,
                compressed
            );
            schedule.interval = compressed;
            schedule.next_review_date = time::add_days(now, compressed as i64);
        }

        AdaptiveReview {
            topic_id: topic.id.clone(),
            schedule,
            quality_used: quality.clamp(0.0, sm2::MAX_QUALITY),
            days_overdue,
            urgency_compressed,
        }
    }

    /// Exponential forgetting curve `exp(-days / (strength * ease))`, in [0, 1]
    pub fn retention_probability(
        &self,
        days_since_review: f64,
        ease_factor: f64,
        initial_strength: f64,
    ) -> f64 {
        retention_probability(days_since_review, ease_factor, initial_strength)
    }

    /// Topics due for review: never reviewed, or reviewed at least `reviewInterval` days ago
    pub fn due_for_review<'a>(&self, topics: &'a [Topic], now: DateTime<Utc>) -> Vec<&'a Topic> {
        topics.iter().filter(|t| is_due(t, now)).collect()
    }

    /// Next review date per topic; never-reviewed topics are due today
    pub fn review_schedule(&self, topics: &[Topic], now: DateTime<Utc>) -> BTreeMap<String, NaiveDate> {
        topics
            .iter()
            .map(|t| (t.id.clone(), stored_review_date(t, now)))
            .collect()
    }

    /// Next review date per topic, pulled forward by the learner's recent results.
    ///
    /// Each topic keeps its stored due date unless [`adaptive_review`] at `now`,
    /// fed the owning subject's retention rate, lands earlier. A weak latest
    /// session or a low retention rate can only bring a review closer.
    ///
    /// [`adaptive_review`]: RetentionModel::adaptive_review
    pub fn adaptive_review_schedule(
        &self,
        subjects: &[Subject],
        sessions: &[StudySession],
        now: DateTime<Utc>,
    ) -> BTreeMap<String, NaiveDate> {
        subjects
            .iter()
            .flat_map(|subject| subject.topics.iter().map(move |topic| (subject, topic)))
            .map(|(subject, topic)| {
                let stored = stored_review_date(topic, now);
                let adaptive = self
                    .adaptive_review(topic, sessions, subject.retention_rate, now)
                    .schedule
                    .next_review_date;
                (topic.id.clone(), stored.min(adaptive))
            })
            .collect()
    }

    /// Mastery in [0, 1]:
    /// `0.4 * min(1, reviews/10) + 0.3 * normalized ease + 0.3 * recent effectiveness / 5`
    pub fn mastery_level(&self, topic: &Topic, sessions: &[StudySession]) -> f64 {
        let repetition = (topic.review_count as f64
            / self.config.mastery_review_saturation.max(1) as f64)
            .min(1.0);

        let ease_span = (self.config.reference_ease_factor - self.config.min_ease_factor).max(f64::EPSILON);
        let ease = ((topic.ease_factor - self.config.min_ease_factor) / ease_span).clamp(0.0, 1.0);

        let recent = newest_first(sessions_for_topic(sessions, &topic.id));
        let effectiveness = if recent.is_empty() {
            topic.mastery_level.clamp(0.0, 1.0)
        } else {
            let window = &recent[..recent.len().min(self.config.mastery_recent_sessions.max(1))];
            let avg = window.iter().map(|s| s.effectiveness_clamped()).sum::<f64>() / window.len() as f64;
            avg / 5.0
        };

        (0.4 * repetition + 0.3 * ease + 0.3 * effectiveness).clamp(0.0, 1.0)
    }

    /// Rank topics for review, highest urgency first, at most `max_per_day`.
    ///
    /// Score: `0.4 * (1 - retention) + 0.3 * (1 - mastery) + 0.3 * difficulty / 5`.
    /// Equal scores keep input order.
    pub fn prioritize_reviews(
        &self,
        topics: &[Topic],
        sessions: &[StudySession],
        max_per_day: usize,
        now: DateTime<Utc>,
    ) -> Vec<ReviewPriority> {
        let mut ranked: Vec<ReviewPriority> = topics
            .iter()
            .map(|topic| {
                let retention = match topic.last_reviewed {
                    Some(last) => {
                        self.retention_probability(time::days_since(last, now), topic.ease_factor, 1.0)
                    }
                    None => 0.0,
                };
                let mastery = self.mastery_level(topic, sessions);
                let difficulty = topic.difficulty_clamped() as f64 / 5.0;
                ReviewPriority {
                    topic_id: topic.id.clone(),
                    subject_id: topic.subject_id.clone(),
                    score: 0.4 * (1.0 - retention) + 0.3 * (1.0 - mastery) + 0.3 * difficulty,
                    retention,
                    mastery,
                }
            })
            .collect();

        // sort_by is stable, so ties keep input order
        ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(max_per_day);
        ranked
    }

    /// The topic as it stands after a review of the given quality at `now`.
    ///
    /// Returns a new value; the caller persists it.
    pub fn next_topic_state(
        &self,
        topic: &Topic,
        quality: f64,
        sessions: &[StudySession],
        now: DateTime<Utc>,
    ) -> Topic {
        let schedule = self.next_review(
            quality,
            topic.ease_factor,
            topic.review_interval,
            topic.review_count,
            now,
        );

        let mut next = topic.clone();
        next.review_interval = schedule.interval;
        next.ease_factor = schedule.ease_factor;
        next.review_count = schedule.review_count;
        next.last_reviewed = Some(now);
        next.mastery_level = self.mastery_level(&next, sessions);
        next
    }
}

// ============================================================================
// FREE FUNCTIONS
// ============================================================================

/// Exponential forgetting curve `exp(-days / (strength * ease))`, clamped to [0, 1].
///
/// Non-positive elapsed time means full retention; a degenerate denominator
/// means nothing is retained once any time has passed.
pub fn retention_probability(days_since_review: f64, ease_factor: f64, initial_strength: f64) -> f64 {
    if !(days_since_review > 0.0) {
        return 1.0;
    }
    let denominator = initial_strength * ease_factor;
    if !(denominator > 0.0) || !denominator.is_finite() {
        return 0.0;
    }
    (-days_since_review / denominator).exp().clamp(0.0, 1.0)
}

/// `lastReviewed + reviewInterval`, or today when never reviewed
fn stored_review_date(topic: &Topic, now: DateTime<Utc>) -> NaiveDate {
    match topic.last_reviewed {
        Some(last) => time::add_days(last, topic.review_interval as i64),
        None => now.date_naive(),
    }
}

/// Whether a topic is due at `now`
pub fn is_due(topic: &Topic, now: DateTime<Utc>) -> bool {
    match topic.last_reviewed {
        None => true,
        Some(last) => time::days_since(last, now) >= topic.review_interval as f64,
    }
}
