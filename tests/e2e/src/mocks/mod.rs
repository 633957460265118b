//! Fixture builders

mod fixtures;

pub use fixtures::{HistoryConfig, TestDataFactory};
