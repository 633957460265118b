//! Schedule Optimizer
//!
//! Turns outstanding work into a dated, time-boxed study plan:
//!
//! - **Tasks**: remaining hours split into chunks, plus a review task per due topic
//! - **Prioritization**: deadline pressure, subject priority, review urgency
//! - **Day packing**: greedy fill of the learner's time blocks, one slot at a time
//! - **Plan**: a multi-day horizon with a confidence score
//!
//! Cognitive-load ceilings by time of day come from [`CognitiveLoadTable`].

mod cognitive;
mod optimizer;
mod tasks;

pub use cognitive::{CognitiveLoadTable, DayPeriod, LoadCeiling};
pub use optimizer::{AdaptiveFactors, DailySchedule, DaySchedule, MotivationFactors, ScheduledSession, StudyPlan};
pub use tasks::{PriorityWeights, StudyTask};

use serde::{Deserialize, Serialize};

use crate::models::UserPreferences;
use crate::retention::RetentionModel;

// ============================================================================
// SCHEDULER CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchedulerConfig {
    /// Work is split into chunks of this many minutes
    pub chunk_minutes: u32,
    /// Minutes of work in a review task
    pub review_minutes: u32,
    /// Subjects this close to their deadline get review tasks at priority 1
    pub urgent_days: i64,
    /// Shortest session ever scheduled (minutes)
    pub min_slot_minutes: u32,
    /// Upper bound on a chunk's optimal session length (minutes)
    pub max_chunk_session_minutes: u32,
    pub default_days_ahead: u32,
    pub base_confidence: f64,
    /// Share of the hour budget above which the plan counts as overloaded
    pub overload_ratio: f64,
    pub overload_penalty: f64,
    pub min_confidence: f64,
    pub max_confidence: f64,
    pub priority_weights: PriorityWeights,
    pub cognitive_load: CognitiveLoadTable,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            chunk_minutes: 45,
            review_minutes: 20,
            urgent_days: 7,
            min_slot_minutes: 30,
            max_chunk_session_minutes: 45,
            default_days_ahead: 14,
            base_confidence: 0.8,
            overload_ratio: 0.9,
            overload_penalty: 0.2,
            min_confidence: 0.3,
            max_confidence: 1.0,
            priority_weights: PriorityWeights::default(),
            cognitive_load: CognitiveLoadTable::default(),
        }
    }
}

/// Per-day limits taken from the learner's preferences
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleConstraints {
    pub preferred_session_length: u32,
    pub min_break_between_sessions: u32,
    pub max_daily_minutes: i64,
}

impl From<&UserPreferences> for ScheduleConstraints {
    fn from(prefs: &UserPreferences) -> Self {
        Self {
            preferred_session_length: prefs.session_length,
            min_break_between_sessions: prefs.min_break_between_sessions,
            max_daily_minutes: prefs.max_daily_minutes(),
        }
    }
}

// ============================================================================
// SCHEDULE OPTIMIZER
// ============================================================================

/// Builds study plans from subjects, history, and preferences
#[derive(Debug, Clone, Default)]
pub struct ScheduleOptimizer {
    config: SchedulerConfig,
    retention: RetentionModel,
}

impl ScheduleOptimizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SchedulerConfig) -> Self {
        Self {
            config,
            retention: RetentionModel::new(),
        }
    }

    /// Use a specific retention model to decide which topics are due
    pub fn with_retention_model(mut self, retention: RetentionModel) -> Self {
        self.retention = retention;
        self
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }
}
