//! Test Helper Utilities
//!
//! Shared utilities for testing racing-scraper

#![allow(dead_code, unused_imports)]

pub mod fake_api;
pub mod fixtures;

// Re-export commonly used items
pub use fake_api::{Call, FakeApi};
pub use fixtures::{formed_runner, meeting, race_detail, runner};
