//! Study sessions: the immutable history the analyzers learn from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// STUDY TECHNIQUE
// ============================================================================

/// The study techniques the engine knows how to recommend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum StudyTechnique {
    #[default]
    Pomodoro,
    ActiveRecall,
    SpacedRepetition,
    Feynman,
    MindMapping,
    PracticeProblems,
    Interleaving,
    Elaboration,
    Flashcards,
    Summarization,
}

impl StudyTechnique {
    /// Every technique, in declaration order
    pub const ALL: [StudyTechnique; 10] = [
        StudyTechnique::Pomodoro,
        StudyTechnique::ActiveRecall,
        StudyTechnique::SpacedRepetition,
        StudyTechnique::Feynman,
        StudyTechnique::MindMapping,
        StudyTechnique::PracticeProblems,
        StudyTechnique::Interleaving,
        StudyTechnique::Elaboration,
        StudyTechnique::Flashcards,
        StudyTechnique::Summarization,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StudyTechnique::Pomodoro => "pomodoro",
            StudyTechnique::ActiveRecall => "active-recall",
            StudyTechnique::SpacedRepetition => "spaced-repetition",
            StudyTechnique::Feynman => "feynman",
            StudyTechnique::MindMapping => "mind-mapping",
            StudyTechnique::PracticeProblems => "practice-problems",
            StudyTechnique::Interleaving => "interleaving",
            StudyTechnique::Elaboration => "elaboration",
            StudyTechnique::Flashcards => "flashcards",
            StudyTechnique::Summarization => "summarization",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            StudyTechnique::Pomodoro => "Pomodoro",
            StudyTechnique::ActiveRecall => "Active recall",
            StudyTechnique::SpacedRepetition => "Spaced repetition",
            StudyTechnique::Feynman => "Feynman technique",
            StudyTechnique::MindMapping => "Mind mapping",
            StudyTechnique::PracticeProblems => "Practice problems",
            StudyTechnique::Interleaving => "Interleaving",
            StudyTechnique::Elaboration => "Elaboration",
            StudyTechnique::Flashcards => "Flashcards",
            StudyTechnique::Summarization => "Summarization",
        }
    }
}

impl std::fmt::Display for StudyTechnique {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// STUDY SESSION
// ============================================================================

/// One historical study session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub id: String,
    pub subject_id: String,
    #[serde(default)]
    pub topic_id: Option<String>,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    /// Minutes
    pub duration: u32,
    /// Self-reported, 1 to 5
    pub effectiveness: u8,
    #[serde(default)]
    pub technique: StudyTechnique,
    #[serde(default)]
    pub interruptions: u32,
}

impl StudySession {
    /// Duration in hours
    pub fn hours(&self) -> f64 {
        self.duration as f64 / 60.0
    }

    /// Effectiveness clamped to the 1-5 scale
    pub fn effectiveness_clamped(&self) -> f64 {
        self.effectiveness.clamp(1, 5) as f64
    }
}

// ============================================================================
// SESSION SLICES
// ============================================================================

/// Mean effectiveness (1-5) of the given sessions, `None` when empty
pub fn average_effectiveness<'a, I>(sessions: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a StudySession>,
{
    let (sum, count) = sessions
        .into_iter()
        .fold((0.0, 0usize), |(sum, n), s| (sum + s.effectiveness_clamped(), n + 1));
    if count == 0 { None } else { Some(sum / count as f64) }
}

/// Sessions belonging to one subject
pub fn sessions_for_subject<'a>(
    sessions: &'a [StudySession],
    subject_id: &'a str,
) -> impl Iterator<Item = &'a StudySession> + 'a {
    sessions.iter().filter(move |s| s.subject_id == subject_id)
}

/// Sessions tagged with one topic
pub fn sessions_for_topic<'a>(
    sessions: &'a [StudySession],
    topic_id: &'a str,
) -> impl Iterator<Item = &'a StudySession> + 'a {
    sessions
        .iter()
        .filter(move |s| s.topic_id.as_deref() == Some(topic_id))
}

/// Sessions sorted newest first (stable for equal start times)
pub fn newest_first<'a, I>(sessions: I) -> Vec<&'a StudySession>
where
    I: IntoIterator<Item = &'a StudySession>,
{
    let mut sorted: Vec<&StudySession> = sessions.into_iter().collect();
    sorted.sort_by(|a, b| b.start_time.cmp(&a.start_time));
    sorted
}
