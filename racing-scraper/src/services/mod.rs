//! Service modules for the scrape pipeline
//!
//! Leaf-first: the client talks to the API, the completeness heuristic and
//! merger work on fetched records, the store and summary own the output tree,
//! and the walker drives all of them for one date.

pub mod affiliate_client;
pub mod completeness;
pub mod race_store;
pub mod race_walker;
pub mod summary;
pub mod supplement_merger;

pub use affiliate_client::{AffiliateClient, ClientSettings, FetchError, RacingApi, RateLimiter};
pub use completeness::needs_enhancement;
pub use race_store::RaceStore;
pub use race_walker::{CollectedMeeting, RaceOutcome, RaceWalker, WalkReport};
pub use summary::{build_summary, write_summary, MeetingSummary, Summary};
pub use supplement_merger::{fill_missing, EnhancementReport, SupplementMerger};
