//! Engine configuration
//!
//! One aggregate of every component's tunables, loadable from JSON. Missing
//! sections and fields fall back to their defaults.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::insights::{RiskConfig, TechniqueRuleTable};
use crate::prediction::PredictionConfig;
use crate::productivity::ProductivityConfig;
use crate::retention::RetentionConfig;
use crate::scheduler::SchedulerConfig;

/// Recommendations returned by one insight run, at most
pub const DEFAULT_MAX_RECOMMENDATIONS: usize = 10;

/// Longest look-back or forecast window any component accepts (days)
pub const MAX_WINDOW_DAYS: i64 = 3650;

/// Longest plan horizon (days)
pub const MAX_DAYS_AHEAD: u32 = 366;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub retention: RetentionConfig,
    pub productivity: ProductivityConfig,
    pub prediction: PredictionConfig,
    pub scheduler: SchedulerConfig,
    pub techniques: TechniqueRuleTable,
    pub risk: RiskConfig,
    pub max_recommendations: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            retention: RetentionConfig::default(),
            productivity: ProductivityConfig::default(),
            prediction: PredictionConfig::default(),
            scheduler: SchedulerConfig::default(),
            techniques: TechniqueRuleTable::default(),
            risk: RiskConfig::default(),
            max_recommendations: DEFAULT_MAX_RECOMMENDATIONS,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a config document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values no component can work with
    pub fn validate(&self) -> Result<()> {
        if !(self.retention.min_ease_factor >= 1.0) {
            return Err(EngineError::InvalidConfig(format!(
                "retention.minEaseFactor must be at least 1.0, got {}",
                self.retention.min_ease_factor
            )));
        }
        if self.retention.max_reviews_per_day == 0 {
            return Err(EngineError::InvalidConfig(
                "retention.maxReviewsPerDay must be positive".to_string(),
            ));
        }
        if self.scheduler.cognitive_load.is_empty() {
            return Err(EngineError::InvalidConfig(
                "scheduler.cognitiveLoad needs at least one period".to_string(),
            ));
        }
        if self.scheduler.min_slot_minutes == 0 || self.scheduler.chunk_minutes == 0 {
            return Err(EngineError::InvalidConfig(
                "scheduler.minSlotMinutes and scheduler.chunkMinutes must be positive".to_string(),
            ));
        }
        if !(self.scheduler.min_confidence <= self.scheduler.max_confidence) {
            return Err(EngineError::InvalidConfig(
                "scheduler.minConfidence exceeds scheduler.maxConfidence".to_string(),
            ));
        }
        if !(self.prediction.min_success_probability <= self.prediction.max_success_probability) {
            return Err(EngineError::InvalidConfig(
                "prediction.minSuccessProbability exceeds prediction.maxSuccessProbability".to_string(),
            ));
        }

        let scheduler = &self.scheduler;
        in_range("scheduler.minConfidence", scheduler.min_confidence, 0.0, 1.0)?;
        in_range("scheduler.maxConfidence", scheduler.max_confidence, 0.0, 1.0)?;
        in_range("scheduler.defaultDaysAhead", scheduler.default_days_ahead, 0, MAX_DAYS_AHEAD)?;

        let prediction = &self.prediction;
        in_range("prediction.minCompletionProbability", prediction.min_completion_probability, 0.0, 1.0)?;
        in_range("prediction.minSuccessProbability", prediction.min_success_probability, 0.0, 1.0)?;
        in_range("prediction.maxSuccessProbability", prediction.max_success_probability, 0.0, 1.0)?;
        in_range("prediction.recentActivityDays", prediction.recent_activity_days, 0, MAX_WINDOW_DAYS)?;
        in_range("prediction.maxForecastDays", prediction.max_forecast_days, 0, MAX_WINDOW_DAYS)?;
        in_range("prediction.velocityWindowDays", prediction.velocity_window_days, 0, MAX_WINDOW_DAYS)?;
        in_range("prediction.consistencyWindowDays", prediction.consistency_window_days, 0, MAX_WINDOW_DAYS)?;
        in_range("prediction.trendWeeks", prediction.trend_weeks, 0, 52)?;

        in_range(
            "productivity.maxFocusDeclineRate",
            self.productivity.max_focus_decline_rate,
            0.0,
            1.0,
        )?;
        in_range("risk.burnoutWindowDays", self.risk.burnout_window_days, 0, MAX_WINDOW_DAYS)?;
        Ok(())
    }
}

/// `lo <= value <= hi`, rejecting NaN
fn in_range<T: PartialOrd + Display>(field: &str, value: T, lo: T, hi: T) -> Result<()> {
    if value >= lo && value <= hi {
        Ok(())
    } else {
        Err(EngineError::InvalidConfig(format!(
            "{} must be between {} and {}, got {}",
            field, lo, hi, value
        )))
    }
}
