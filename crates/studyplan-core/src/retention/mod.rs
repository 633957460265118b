//! Retention Module
//!
//! SM-2 spaced repetition plus an exponential forgetting curve, applied per topic.
//!
//! ## Core Formulas:
//! - Ease: `EF' = max(1.3, EF + 0.1 - (5 - q) * (0.08 + (5 - q) * 0.02))`
//! - Interval: 1, 6, then `round(I * EF')`, capped at 100 years
//! - Retention: `R = exp(-t / (S * EF))`

mod model;
mod sm2;

pub use model::{
    is_due, retention_probability, AdaptiveReview, RetentionConfig, RetentionModel,
    ReviewPriority,
};
pub use sm2::{
    next_review, next_review_with_floor, updated_ease, ReviewSchedule, MAX_INTERVAL_DAYS, MAX_QUALITY,
    PASSING_QUALITY,
};
