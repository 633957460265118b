//! SM-2 (SuperMemo 2) interval arithmetic.
//!
//! - Each topic carries an ease factor (EF) that adjusts with recall quality
//! - Quality below 3: the topic re-enters learning (interval 1, count 0)
//! - Quality 3-5: interval grows 1 day, then 6 days, then by EF each time
//! - EF never drops below 1.3
//! - Intervals stop growing at [`MAX_INTERVAL_DAYS`]

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{DEFAULT_EASE_FACTOR, MIN_EASE_FACTOR};
use crate::time;

/// Lowest quality that counts as a successful recall
pub const PASSING_QUALITY: f64 = 3.0;

/// Highest recall quality
pub const MAX_QUALITY: f64 = 5.0;

/// Interval after the first successful repetition
const FIRST_INTERVAL: u32 = 1;

/// Interval after the second successful repetition
const SECOND_INTERVAL: u32 = 6;

/// Longest interval SM-2 will hand out (100 years)
pub const MAX_INTERVAL_DAYS: u32 = 36_500;

/// Outcome of one SM-2 step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSchedule {
    /// Days until the next review
    pub interval: u32,
    pub ease_factor: f64,
    pub review_count: u32,
    pub next_review_date: NaiveDate,
}

/// Ease factor after a review of the given quality, floored at `min_ease`
pub fn updated_ease(ease_factor: f64, quality: f64, min_ease: f64) -> f64 {
    let miss = MAX_QUALITY - quality;
    (ease_factor + 0.1 - miss * (0.08 + miss * 0.02)).max(min_ease)
}

/// One SM-2 step with the standard 1.3 ease floor.
///
/// `quality` is clamped to [0, 5]. The next review date is `now + interval`.
pub fn next_review(
    quality: f64,
    ease_factor: f64,
    interval: u32,
    review_count: u32,
    now: DateTime<Utc>,
) -> ReviewSchedule {
    next_review_with_floor(quality, ease_factor, interval, review_count, now, MIN_EASE_FACTOR)
}

/// One SM-2 step with a configurable ease floor
pub fn next_review_with_floor(
    quality: f64,
    ease_factor: f64,
    interval: u32,
    review_count: u32,
    now: DateTime<Utc>,
    min_ease: f64,
) -> ReviewSchedule {
    let quality = if quality.is_finite() { quality.clamp(0.0, MAX_QUALITY) } else { 0.0 };
    let ease_factor = if ease_factor.is_finite() { ease_factor } else { DEFAULT_EASE_FACTOR };
    let new_ease = updated_ease(ease_factor, quality, min_ease);

    let (new_interval, new_count) = if quality < PASSING_QUALITY {
        (FIRST_INTERVAL, 0)
    } else {
        let next = match review_count {
            0 => FIRST_INTERVAL,
            1 => SECOND_INTERVAL,
            _ => ((interval.max(1) as f64) * new_ease).round().max(1.0) as u32,
        };
        (next.min(MAX_INTERVAL_DAYS), review_count.saturating_add(1))
    };

    ReviewSchedule {
        interval: new_interval,
        ease_factor: new_ease,
        review_count: new_count,
        next_review_date: time::add_days(now, new_interval as i64),
    }
}
