//! # Studyplan Core
//!
//! Adaptive study scheduling and retention engine. Pure functions over plain
//! value objects: the caller hands in subjects, sessions, preferences, and the
//! current time, and gets back plans, forecasts, and recommendations.
//!
//! - **Retention**: SM-2 spaced repetition and an exponential forgetting curve
//! - **Productivity**: per-hour and per-weekday productivity learned from history
//! - **Prediction**: completion odds, learning velocity, deadline success, topic retention
//! - **Scheduling**: greedy packing of study and review work into time blocks
//! - **Insights**: technique suggestions, risk assessment, ranked recommendations
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use studyplan_core::prelude::*;
//!
//! let snapshot = StudySnapshot::from_json_str(&json)?;
//! let facade = RecommendationFacade::new();
//! let mut ids = SequentialIdProvider::new();
//! let bundle = facade.generate_insights(
//!     &snapshot.subjects,
//!     &snapshot.sessions,
//!     &snapshot.preferences,
//!     SystemClock.now(),
//!     &mut ids,
//! )?;
//! println!("{} sessions planned", bundle.study_plan.sessions().count());
//! ```
//!
//! The engine performs no I/O and keeps no state between calls. "Now" is
//! always a parameter, and identifiers come from an injected [`IdProvider`],
//! so runs are reproducible.

#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod config;
pub mod error;
pub mod ids;
pub mod models;
pub mod time;

/// SM-2 scheduling and forgetting-curve estimation per topic
pub mod retention;

/// Productivity patterns learned from session history
pub mod productivity;

/// Completion, velocity, deadline, and retention forecasts
pub mod prediction;

/// Study tasks, day packing, and multi-day plans
pub mod scheduler;

/// Technique suggestions, risk assessment, and the recommendation facade
pub mod insights;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use ids::{IdKind, IdProvider, SequentialIdProvider, UuidIdProvider};
pub use time::{Clock, FixedClock, SystemClock};

// Value objects
pub use models::{
    validate_inputs, StudySession, StudySnapshot, StudyTechnique, Subject, SubjectCategory,
    TimeBlock, Topic, UserPreferences,
};

// Retention
pub use retention::{
    next_review, retention_probability, AdaptiveReview, RetentionConfig, RetentionModel,
    ReviewPriority, ReviewSchedule,
};

// Productivity
pub use productivity::{ProductivityConfig, ProductivityPattern, ProductivityPatternAnalyzer};

// Prediction
pub use prediction::{
    CompletionPrediction, CompletionRisk, DeadlineForecast, LearningVelocity, PerformanceMetrics,
    PerformancePredictor, PredictionConfig, TopicRetentionForecast, VelocityTrend,
};

// Scheduling
pub use scheduler::{
    CognitiveLoadTable, DailySchedule, PriorityWeights, ScheduleConstraints, ScheduleOptimizer,
    ScheduledSession, SchedulerConfig, StudyPlan, StudyTask,
};

// Insights
pub use insights::{
    assess_risk, AdaptiveRecommendation, InsightBundle, RecommendationFacade, RecommendationKind,
    RiskAssessment, RiskConfig, RiskFactor, RiskKind, RiskLevel, TechniqueRuleTable,
    TechniqueSuggestion,
};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        Clock, EngineConfig, EngineError, IdProvider, InsightBundle, ProductivityPattern,
        RecommendationFacade, Result, SequentialIdProvider, StudyPlan, StudySession,
        StudySnapshot, Subject, SystemClock, Topic, UserPreferences, UuidIdProvider,
    };

    pub use crate::{
        PerformancePredictor, ProductivityPatternAnalyzer, RetentionModel, ScheduleOptimizer,
    };
}
