//! End-to-end test support for the study scheduling engine.
//!
//! The test targets under `tests/` build learner snapshots through
//! [`mocks::TestDataFactory`] and drive the engine the way a caller would.

pub mod mocks;

pub use mocks::{HistoryConfig, TestDataFactory};
