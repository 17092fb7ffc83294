//! # Racing Common Library
//!
//! Shared code for the racing scraper workspace including:
//! - Error and result types
//! - Bootstrap configuration loading (TOML)
//! - Static country and category catalog
//! - Form field lists used by the completeness heuristic and merger
//! - Filename sanitization

pub mod catalog;
pub mod config;
pub mod error;
pub mod sanitize;

pub use error::{Error, Result};
