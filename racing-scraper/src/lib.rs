//! racing-scraper library interface
//!
//! Exposes the fetch, completeness, merge, and persistence pipeline for the
//! binary and for integration testing.

pub mod config;
pub mod models;
pub mod selection;
pub mod services;

pub use crate::config::{Args, ScraperConfig};
pub use crate::selection::Selection;
pub use crate::services::{AffiliateClient, RaceWalker, RacingApi, WalkReport};
