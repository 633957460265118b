//! Identifier providers for generated records (tasks, scheduled sessions, plans).
//!
//! Scheduling runs are reproducible when a [`SequentialIdProvider`] is injected.

use uuid::Uuid;

/// Kind of record an identifier is minted for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Task,
    Session,
    Plan,
}

impl IdKind {
    fn prefix(&self) -> &'static str {
        match self {
            IdKind::Task => "task",
            IdKind::Session => "session",
            IdKind::Plan => "plan",
        }
    }
}

/// Mints identifiers for generated records
pub trait IdProvider {
    fn next_id(&mut self, kind: IdKind) -> String;
}

/// Random UUID v4 identifiers
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdProvider;

impl IdProvider for UuidIdProvider {
    fn next_id(&mut self, _kind: IdKind) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic `task-0001`, `session-0001`, ... identifiers
#[derive(Debug, Clone, Default)]
pub struct SequentialIdProvider {
    counters: [u32; 3],
}

impl SequentialIdProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdProvider for SequentialIdProvider {
    fn next_id(&mut self, kind: IdKind) -> String {
        let slot = match kind {
            IdKind::Task => 0,
            IdKind::Session => 1,
            IdKind::Plan => 2,
        };
        self.counters[slot] += 1;
        format!("{}-{:04}", kind.prefix(), self.counters[slot])
    }
}
