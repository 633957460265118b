//! Engine Errors
//!
//! The engine degrades gracefully on sparse input (empty histories yield
//! documented defaults), but structurally broken input fails fast: a session
//! that points at a subject nobody knows about would silently skew every
//! aggregate it touched.

use thiserror::Error;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Errors produced by the study engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// A study session references a subject id that is not in the subject list
    #[error("Session {session_id} references unknown subject {subject_id}")]
    UnknownSubject {
        /// Offending session
        session_id: String,
        /// The subject id it pointed at
        subject_id: String,
    },

    /// A study session references a topic that does not belong to its subject
    #[error("Session {session_id} references topic {topic_id} which is not part of subject {subject_id}")]
    UnknownTopic {
        /// Offending session
        session_id: String,
        /// The subject the session belongs to
        subject_id: String,
        /// The topic id it pointed at
        topic_id: String,
    },

    /// Two subjects share the same id
    #[error("Duplicate subject id: {0}")]
    DuplicateSubject(String),

    /// Engine configuration is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Snapshot or config (de)serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
