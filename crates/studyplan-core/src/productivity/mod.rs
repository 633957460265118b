//! Productivity Module
//!
//! Per-hour and per-weekday productivity, optimal session length, and focus
//! decline, learned from study-session history.

mod analyzer;
mod pattern;

pub use analyzer::{
    DefaultProductivityCurve, HourBand, ProductivityConfig, ProductivityPatternAnalyzer,
};
pub use pattern::{ProductivityPattern, NEUTRAL_PRODUCTIVITY};
