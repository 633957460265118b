//! Performance Prediction
//!
//! Forecasts built on the productivity pattern and session history:
//!
//! - **Subject completion**: will the remaining hours fit before the deadline?
//! - **Learning velocity**: hours per day now, its trend, and a projection
//! - **Deadline success**: per-subject success odds, most at-risk first
//! - **Topic retention**: memory strength and the next useful review interval
//! - **Performance metrics**: descriptive totals over the whole history

mod completion;
mod deadline;
mod metrics;
mod topic_retention;
mod velocity;

pub use completion::{CompletionPrediction, CompletionRisk};
pub use deadline::DeadlineForecast;
pub use metrics::PerformanceMetrics;
pub use topic_retention::TopicRetentionForecast;
pub use velocity::{LearningVelocity, VelocityTrend};

use serde::{Deserialize, Serialize};

use crate::retention::RetentionModel;

// ============================================================================
// PREDICTION CONFIG
// ============================================================================

/// Tunables for every predictor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PredictionConfig {
    // ========== Completion ==========
    /// Available daily hours = min(maxDailyHours, avg hourly productivity * this)
    pub daily_capacity_hours: f64,
    pub effectiveness_boost: f64,
    /// Probability removed per difficulty point above 3
    pub difficulty_penalty: f64,
    pub min_completion_probability: f64,
    /// Reported for subjects that have not been sized yet
    pub new_subject_probability: f64,
    /// Effectiveness assumed when a subject has no sessions (1-5)
    pub neutral_effectiveness: f64,
    /// Session count at which confidence saturates
    pub confidence_saturation_sessions: usize,
    pub near_deadline_days: i64,
    pub low_effectiveness_threshold: f64,
    /// Window for "recent progress" checks (days)
    pub recent_activity_days: i64,
    pub max_recommendations: usize,
    /// Completion forecasts never reach further out than this (days)
    pub max_forecast_days: i64,

    // ========== Velocity ==========
    pub velocity_window_days: i64,
    /// Weeks averaged on each side of the trend comparison
    pub trend_weeks: usize,
    /// Relative change that counts as a trend
    pub trend_threshold: f64,
    pub consistency_window_days: i64,

    // ========== Deadline ==========
    pub min_success_probability: f64,
    pub max_success_probability: f64,
    pub deadline_recommendations: usize,

    // ========== Topic retention ==========
    /// Retention reported for topics with no sessions
    pub default_retention: f64,
    pub max_review_interval_days: u32,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            daily_capacity_hours: 10.0,
            effectiveness_boost: 1.2,
            difficulty_penalty: 0.1,
            min_completion_probability: 0.1,
            new_subject_probability: 0.3,
            neutral_effectiveness: 3.0,
            confidence_saturation_sessions: 10,
            near_deadline_days: 7,
            low_effectiveness_threshold: 3.0,
            recent_activity_days: 7,
            max_recommendations: 3,
            max_forecast_days: 365,
            velocity_window_days: 7,
            trend_weeks: 3,
            trend_threshold: 0.1,
            consistency_window_days: 14,
            min_success_probability: 0.05,
            max_success_probability: 0.95,
            deadline_recommendations: 2,
            default_retention: 0.8,
            max_review_interval_days: 30,
        }
    }
}

// ============================================================================
// PERFORMANCE PREDICTOR
// ============================================================================

/// Forecasts completion, velocity, deadline success, and topic retention
#[derive(Debug, Clone, Default)]
pub struct PerformancePredictor {
    config: PredictionConfig,
    retention: RetentionModel,
}

impl PerformancePredictor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PredictionConfig) -> Self {
        Self {
            config,
            retention: RetentionModel::new(),
        }
    }

    /// Use a specific retention model for forgetting-curve lookups
    pub fn with_retention_model(mut self, retention: RetentionModel) -> Self {
        self.retention = retention;
        self
    }

    pub fn config(&self) -> &PredictionConfig {
        &self.config
    }
}
