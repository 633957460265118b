//! Subjects and Topics
//!
//! A subject is a unit of coursework with a deadline; topics are the
//! individually reviewable pieces inside it. Both are caller-owned value
//! objects. The engine never mutates them; the retention model hands back
//! updated copies instead.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Mastery level at which a topic counts as learned
pub const MASTERY_COMPLETE_THRESHOLD: f64 = 0.8;

/// Lowest ease factor SM-2 allows
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Ease factor a fresh topic starts with
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

// ============================================================================
// SUBJECT CATEGORY
// ============================================================================

/// Explicit subject classification used by the technique rule table.
///
/// When a subject carries no category the rule table falls back to matching
/// keywords in the subject name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectCategory {
    /// Math, physics, programming: learned by doing problems
    Quantitative,
    /// History, vocabulary: heavy on recall of facts
    Memorization,
    /// Theory-heavy subjects
    Conceptual,
    /// Natural languages
    Language,
}

impl SubjectCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubjectCategory::Quantitative => "quantitative",
            SubjectCategory::Memorization => "memorization",
            SubjectCategory::Conceptual => "conceptual",
            SubjectCategory::Language => "language",
        }
    }
}

impl std::fmt::Display for SubjectCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// TOPIC
// ============================================================================

/// A reviewable unit of a subject, carrying its SM-2 state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: String,
    /// Owning subject (back-reference only)
    pub subject_id: String,
    #[serde(default)]
    pub name: String,
    /// 1 (easy) to 5 (hard)
    pub difficulty: u8,
    /// 0.0 to 1.0
    #[serde(default)]
    pub mastery_level: f64,
    /// Days between reviews
    #[serde(default = "default_review_interval")]
    pub review_interval: u32,
    #[serde(default)]
    pub review_count: u32,
    /// SM-2 ease factor, never below 1.3
    #[serde(default = "default_ease_factor")]
    pub ease_factor: f64,
    #[serde(default)]
    pub last_reviewed: Option<DateTime<Utc>>,
}

fn default_review_interval() -> u32 {
    1
}

fn default_ease_factor() -> f64 {
    DEFAULT_EASE_FACTOR
}

impl Topic {
    /// Create a fresh, never-reviewed topic
    pub fn new(id: impl Into<String>, subject_id: impl Into<String>, difficulty: u8) -> Self {
        Self {
            id: id.into(),
            subject_id: subject_id.into(),
            name: String::new(),
            difficulty,
            mastery_level: 0.0,
            review_interval: default_review_interval(),
            review_count: 0,
            ease_factor: DEFAULT_EASE_FACTOR,
            last_reviewed: None,
        }
    }

    /// Whether the topic still needs first-pass study
    pub fn is_incomplete(&self) -> bool {
        self.mastery_level < MASTERY_COMPLETE_THRESHOLD
    }

    /// Difficulty clamped to the 1-5 scale
    pub fn difficulty_clamped(&self) -> u8 {
        self.difficulty.clamp(1, 5)
    }
}

// ============================================================================
// SUBJECT
// ============================================================================

/// A subject with a deadline and an hour budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub deadline: NaiveDate,
    /// 1 (highest) to 3 (lowest)
    pub priority: u8,
    /// 1 (easy) to 5 (hard)
    pub difficulty: u8,
    pub estimated_hours: f64,
    /// May exceed `estimated_hours`; ratios are clamped where used
    #[serde(default)]
    pub completed_hours: f64,
    #[serde(default)]
    pub topics: Vec<Topic>,
    /// 1 to 5
    #[serde(default = "default_cognitive_load")]
    pub cognitive_load: u8,
    /// Learner's historical retention for this subject, 0.0 to 1.0
    #[serde(default = "default_retention_rate")]
    pub retention_rate: f64,
    /// Explicit classification for technique rules
    #[serde(default)]
    pub category: Option<SubjectCategory>,
}

fn default_cognitive_load() -> u8 {
    3
}

fn default_retention_rate() -> f64 {
    0.8
}

impl Subject {
    /// Hours of work still outstanding
    pub fn remaining_hours(&self) -> f64 {
        (self.estimated_hours - self.completed_hours).max(0.0)
    }

    /// Completed fraction, clamped to [0, 1]
    pub fn progress(&self) -> f64 {
        if self.estimated_hours <= 0.0 {
            return if self.completed_hours > 0.0 { 1.0 } else { 0.0 };
        }
        (self.completed_hours / self.estimated_hours).clamp(0.0, 1.0)
    }

    pub fn difficulty_clamped(&self) -> u8 {
        self.difficulty.clamp(1, 5)
    }

    pub fn priority_clamped(&self) -> u8 {
        self.priority.clamp(1, 3)
    }

    pub fn cognitive_load_clamped(&self) -> u8 {
        self.cognitive_load.clamp(1, 5)
    }

    /// Look up one of this subject's topics
    pub fn topic(&self, topic_id: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.id == topic_id)
    }
}
