//! Insights
//!
//! The recommendation facade runs every component over one learner snapshot
//! and layers two heuristic passes on top:
//!
//! - **Techniques**: a rule table keyed by subject category
//! - **Risk**: deadline pressure, burnout, and difficulty mix

mod facade;
mod risk;
mod techniques;

pub use facade::{AdaptiveRecommendation, InsightBundle, RecommendationFacade, RecommendationKind};
pub use risk::{assess_risk, RiskAssessment, RiskConfig, RiskFactor, RiskKind, RiskLevel};
pub use techniques::{CategoryKeywords, CategoryRule, TechniqueEffect, TechniqueRuleTable, TechniqueSuggestion};
