//! Value objects the engine consumes
//!
//! - Subjects and their topics (with SM-2 review state)
//! - Historical study sessions
//! - Learner preferences (time blocks, caps)
//! - A snapshot bundling all three, as stored by callers

mod preferences;
mod session;
mod subject;

pub use preferences::{TimeBlock, UserPreferences};
pub use session::{
    average_effectiveness, newest_first, sessions_for_subject, sessions_for_topic, StudySession,
    StudyTechnique,
};
pub use subject::{
    Subject, SubjectCategory, Topic, DEFAULT_EASE_FACTOR, MASTERY_COMPLETE_THRESHOLD,
    MIN_EASE_FACTOR,
};

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{EngineError, Result};

/// Everything the engine needs about one learner
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySnapshot {
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub sessions: Vec<StudySession>,
    #[serde(default)]
    pub preferences: UserPreferences,
}

impl StudySnapshot {
    /// Parse a snapshot from JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Reject structurally invalid input before any aggregate is computed.
///
/// Fails on duplicate subject ids, sessions pointing at unknown subjects,
/// and sessions tagged with a topic their subject does not own.
pub fn validate_inputs(subjects: &[Subject], sessions: &[StudySession]) -> Result<()> {
    let mut seen = HashSet::with_capacity(subjects.len());
    for subject in subjects {
        if !seen.insert(subject.id.as_str()) {
            return Err(EngineError::DuplicateSubject(subject.id.clone()));
        }
    }

    for session in sessions {
        let subject = subjects
            .iter()
            .find(|s| s.id == session.subject_id)
            .ok_or_else(|| EngineError::UnknownSubject {
                session_id: session.id.clone(),
                subject_id: session.subject_id.clone(),
            })?;

        if let Some(topic_id) = &session.topic_id {
            if subject.topic(topic_id).is_none() {
                return Err(EngineError::UnknownTopic {
                    session_id: session.id.clone(),
                    subject_id: subject.id.clone(),
                    topic_id: topic_id.clone(),
                });
            }
        }

        if session.duration == 0 {
            tracing::warn!("Session {} has zero duration", session.id);
        }
    }

    Ok(())
}
