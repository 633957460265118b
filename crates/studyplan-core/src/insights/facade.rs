//! Recommendation facade: one call from a learner snapshot to a full insight bundle.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::risk::{assess_risk, RiskAssessment, RiskKind};
use super::techniques::TechniqueSuggestion;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::ids::IdProvider;
use crate::models::{validate_inputs, StudySession, Subject, Topic, UserPreferences};
use crate::prediction::{
    CompletionPrediction, DeadlineForecast, LearningVelocity, PerformanceMetrics,
    PerformancePredictor, TopicRetentionForecast,
};
use crate::productivity::{ProductivityPattern, ProductivityPatternAnalyzer};
use crate::retention::{RetentionModel, ReviewPriority};
use crate::scheduler::{ScheduleOptimizer, StudyPlan};

/// Retention below which a queued review becomes a recommendation
const FADING_RETENTION: f64 = 0.5;
/// Deadline odds below which a subject gets its own recommendation
const AT_RISK_PROBABILITY: f64 = 0.5;
const MAX_REVIEW_RECOMMENDATIONS: usize = 3;
const MAX_TECHNIQUE_RECOMMENDATIONS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecommendationKind {
    Deadline,
    Review,
    Technique,
    Wellbeing,
    Schedule,
}

impl RecommendationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationKind::Deadline => "deadline",
            RecommendationKind::Review => "review",
            RecommendationKind::Technique => "technique",
            RecommendationKind::Wellbeing => "wellbeing",
            RecommendationKind::Schedule => "schedule",
        }
    }
}

/// A structured recommendation; turning it into prose is left to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptiveRecommendation {
    pub kind: RecommendationKind,
    /// 1 (act now) to 3 (when convenient)
    pub priority: u8,
    pub title: String,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,
}

/// Everything the engine knows about a learner at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightBundle {
    pub generated_at: DateTime<Utc>,
    pub productivity_pattern: ProductivityPattern,
    pub study_plan: StudyPlan,
    /// Topic id to next review date
    pub review_schedule: BTreeMap<String, NaiveDate>,
    pub review_queue: Vec<ReviewPriority>,
    pub topic_retention: Vec<TopicRetentionForecast>,
    pub completion: Vec<CompletionPrediction>,
    pub velocity: LearningVelocity,
    /// Most at-risk first
    pub deadlines: Vec<DeadlineForecast>,
    pub metrics: PerformanceMetrics,
    pub techniques: Vec<TechniqueSuggestion>,
    pub risk: RiskAssessment,
    pub recommendations: Vec<AdaptiveRecommendation>,
}

/// Orchestrates every engine component over one snapshot
#[derive(Debug, Clone)]
pub struct RecommendationFacade {
    config: EngineConfig,
    retention: RetentionModel,
    analyzer: ProductivityPatternAnalyzer,
    predictor: PerformancePredictor,
    optimizer: ScheduleOptimizer,
}

impl Default for RecommendationFacade {
    fn default() -> Self {
        Self::with_config(EngineConfig::default())
    }
}

impl RecommendationFacade {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let retention = RetentionModel::with_config(config.retention.clone());
        Self {
            analyzer: ProductivityPatternAnalyzer::with_config(config.productivity.clone()),
            predictor: PerformancePredictor::with_config(config.prediction.clone())
                .with_retention_model(retention.clone()),
            optimizer: ScheduleOptimizer::with_config(config.scheduler.clone())
                .with_retention_model(retention.clone()),
            retention,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn retention(&self) -> &RetentionModel {
        &self.retention
    }

    pub fn analyzer(&self) -> &ProductivityPatternAnalyzer {
        &self.analyzer
    }

    pub fn predictor(&self) -> &PerformancePredictor {
        &self.predictor
    }

    pub fn optimizer(&self) -> &ScheduleOptimizer {
        &self.optimizer
    }

    /// Build a plan for the configured horizon after validating the input
    pub fn plan(
        &self,
        subjects: &[Subject],
        sessions: &[StudySession],
        prefs: &UserPreferences,
        now: DateTime<Utc>,
        ids: &mut dyn IdProvider,
    ) -> Result<StudyPlan> {
        validate_inputs(subjects, sessions)?;
        let pattern = self.analyzer.analyze(sessions);
        Ok(self.optimizer.generate_optimal_schedule(
            subjects,
            sessions,
            prefs,
            &pattern,
            self.config.scheduler.default_days_ahead,
            now,
            ids,
        ))
    }

    /// Run the full pipeline.
    ///
    /// Order: validation, productivity pattern, schedule, retention and review
    /// maps, predictions, technique suggestions, risk assessment, and finally
    /// the ranked recommendation list.
    pub fn generate_insights(
        &self,
        subjects: &[Subject],
        sessions: &[StudySession],
        prefs: &UserPreferences,
        now: DateTime<Utc>,
        ids: &mut dyn IdProvider,
    ) -> Result<InsightBundle> {
        validate_inputs(subjects, sessions)?;

        let pattern = self.analyzer.analyze(sessions);
        let study_plan = self.optimizer.generate_optimal_schedule(
            subjects,
            sessions,
            prefs,
            &pattern,
            self.config.scheduler.default_days_ahead,
            now,
            ids,
        );

        let topics: Vec<Topic> = subjects.iter().flat_map(|s| s.topics.iter().cloned()).collect();
        let review_schedule = self.retention.adaptive_review_schedule(subjects, sessions, now);
        let review_queue = self.retention.prioritize_reviews(
            &topics,
            sessions,
            self.config.retention.max_reviews_per_day,
            now,
        );
        let topic_retention: Vec<TopicRetentionForecast> = subjects
            .iter()
            .flat_map(|subject| {
                subject
                    .topics
                    .iter()
                    .map(move |topic| (subject, topic))
            })
            .map(|(subject, topic)| self.predictor.predict_topic_retention(topic, subject, sessions, now))
            .collect();

        let completion: Vec<CompletionPrediction> = subjects
            .iter()
            .map(|s| self.predictor.predict_subject_completion(s, sessions, &pattern, prefs, now))
            .collect();
        let velocity = self.predictor.predict_learning_velocity(sessions, subjects, now);
        let deadlines = self
            .predictor
            .predict_deadline_success(subjects, sessions, velocity.current_velocity, now);
        let metrics = self.predictor.compute_performance_metrics(subjects, sessions, now);

        let techniques = self.config.techniques.suggest(subjects);
        let risk = assess_risk(&self.config.risk, subjects, sessions, now);

        let recommendations =
            self.recommendations(subjects, &deadlines, &review_queue, &techniques, &risk, &pattern);

        tracing::info!(
            "Generated insights for {} subjects / {} sessions: {} recommendations, overall risk {}",
            subjects.len(),
            sessions.len(),
            recommendations.len(),
            risk.overall_risk
        );

        Ok(InsightBundle {
            generated_at: now,
            productivity_pattern: pattern,
            study_plan,
            review_schedule,
            review_queue,
            topic_retention,
            completion,
            velocity,
            deadlines,
            metrics,
            techniques,
            risk,
            recommendations,
        })
    }

    /// Distill the bundle into at most `max_recommendations` items, most urgent first
    fn recommendations(
        &self,
        subjects: &[Subject],
        deadlines: &[DeadlineForecast],
        review_queue: &[ReviewPriority],
        techniques: &[TechniqueSuggestion],
        risk: &RiskAssessment,
        pattern: &ProductivityPattern,
    ) -> Vec<AdaptiveRecommendation> {
        let mut out = Vec::new();

        for factor in &risk.factors {
            let (kind, title) = match factor.kind {
                RiskKind::DeadlinePressure => (RecommendationKind::Deadline, "Several deadlines are close"),
                RiskKind::BurnoutRisk => (RecommendationKind::Wellbeing, "Ease off to avoid burnout"),
                RiskKind::TopicDifficulty => (RecommendationKind::Schedule, "Balance your hard subjects"),
            };
            out.push(AdaptiveRecommendation {
                kind,
                priority: match factor.severity {
                    s if s >= 4 => 1,
                    3 => 2,
                    _ => 3,
                },
                title: title.to_string(),
                detail: format!("{} {}", factor.description, factor.mitigation),
                subject_id: None,
            });
        }

        for forecast in deadlines.iter().filter(|d| d.probability < AT_RISK_PROBABILITY) {
            out.push(AdaptiveRecommendation {
                kind: RecommendationKind::Deadline,
                priority: 1,
                title: format!(
                    "{} is at risk ({:.0}% chance to finish)",
                    forecast.subject_name,
                    forecast.probability * 100.0
                ),
                detail: forecast.recommendations.join(". "),
                subject_id: Some(forecast.subject_id.clone()),
            });
        }

        for review in review_queue
            .iter()
            .filter(|r| r.retention < FADING_RETENTION)
            .take(MAX_REVIEW_RECOMMENDATIONS)
        {
            let name = subjects
                .iter()
                .find(|s| s.id == review.subject_id)
                .and_then(|s| s.topic(&review.topic_id))
                .filter(|t| !t.name.is_empty())
                .map(|t| t.name.as_str())
                .unwrap_or(review.topic_id.as_str());
            out.push(AdaptiveRecommendation {
                kind: RecommendationKind::Review,
                priority: 2,
                title: format!("Review {}", name),
                detail: format!(
                    "Estimated retention {:.0}%, mastery {:.0}%",
                    review.retention * 100.0,
                    review.mastery * 100.0
                ),
                subject_id: Some(review.subject_id.clone()),
            });
        }

        for suggestion in techniques.iter().take(MAX_TECHNIQUE_RECOMMENDATIONS) {
            out.push(AdaptiveRecommendation {
                kind: RecommendationKind::Technique,
                priority: 3,
                title: format!(
                    "Try {} (+{:.0}% expected)",
                    suggestion.technique.label(),
                    suggestion.expected_improvement * 100.0
                ),
                detail: suggestion.reason.clone(),
                subject_id: match suggestion.subject_ids.as_slice() {
                    [only] => Some(only.clone()),
                    _ => None,
                },
            });
        }

        if let Some(peak) = pattern.peak_hours(1).first() {
            let day = pattern.best_day().unwrap_or("any day");
            out.push(AdaptiveRecommendation {
                kind: RecommendationKind::Schedule,
                priority: 3,
                title: format!("Put demanding work around {:02}:00", peak),
                detail: format!("Your productivity peaks at {:02}:00; your strongest day is {}", peak, day),
                subject_id: None,
            });
        }

        out.sort_by_key(|r| r.priority);
        out.truncate(self.config.max_recommendations);
        out
    }
}
