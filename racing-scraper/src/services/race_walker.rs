//! Meeting and race walk for one date
//!
//! **Flow:**
//! 1. Collect meetings for every (country, category) pair, country-major
//! 2. Per meeting: write `meeting_info.json`, then walk its races
//! 3. Per race: fetch detail → completeness check → supplemental merge → write
//! 4. Re-derive `summary.json` from the date directory
//!
//! Remote failures never stop the walk. A meetings query that fails counts as
//! zero meetings; a race that fails to fetch or write is logged and skipped.

use racing_common::Result;
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

use crate::models::{Meeting, RaceStub};
use crate::selection::Selection;
use crate::services::affiliate_client::RacingApi;
use crate::services::completeness::needs_enhancement;
use crate::services::race_store::{race_file_name, RaceStore};
use crate::services::summary::{write_summary, Summary};
use crate::services::supplement_merger::{SupplementMerger, DEFAULT_RUNNER_DELAY_MS};

/// Meeting together with the country it was requested under
#[derive(Debug, Clone)]
pub struct CollectedMeeting {
    pub requested_country: String,
    pub meeting: Meeting,
}

/// Terminal state of one race
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaceOutcome {
    /// Written to disk; `enhanced` when a supplemental merge ran first
    Saved { enhanced: bool },
    /// Detail fetch or write failed; nothing written
    Failed,
    /// Race stub had no identifier
    Skipped,
}

/// Counters for one walk, alongside the disk-derived summary
#[derive(Debug, Clone, Default)]
pub struct WalkReport {
    pub meetings_found: usize,
    pub meetings_written: usize,
    pub races_saved: usize,
    pub races_failed: usize,
    pub races_skipped: usize,
    /// Races that triggered a supplemental merge
    pub enhancements_attempted: usize,
    pub summary: Option<Summary>,
}

impl WalkReport {
    fn record(&mut self, outcome: RaceOutcome) {
        match outcome {
            RaceOutcome::Saved { enhanced } => {
                self.races_saved += 1;
                if enhanced {
                    self.enhancements_attempted += 1;
                }
            }
            RaceOutcome::Failed => self.races_failed += 1,
            RaceOutcome::Skipped => self.races_skipped += 1,
        }
    }
}

/// Walks meetings and races for a date and persists them
pub struct RaceWalker<A: RacingApi> {
    api: A,
    store: RaceStore,
    runner_pause: Duration,
}

impl<A: RacingApi> RaceWalker<A> {
    pub fn new(api: A, store: RaceStore) -> Self {
        Self {
            api,
            store,
            runner_pause: Duration::from_millis(DEFAULT_RUNNER_DELAY_MS),
        }
    }

    /// Pause between per-runner lookups during supplemental merges
    pub fn with_runner_pause(mut self, runner_pause: Duration) -> Self {
        self.runner_pause = runner_pause;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Query every (country, category) pair and concatenate the results
    pub async fn collect_meetings(&self, date: &str, selection: &Selection) -> Vec<CollectedMeeting> {
        let mut collected = Vec::new();

        for country in &selection.countries {
            for category in &selection.categories {
                match self.api.meetings(date, country, category).await {
                    Ok(meetings) => {
                        info!("Found {} {} meetings for {}", meetings.len(), category, country);
                        collected.extend(meetings.into_iter().map(|raw| CollectedMeeting {
                            requested_country: country.clone(),
                            meeting: Meeting::from_value(raw),
                        }));
                    }
                    Err(e) => {
                        warn!("Error fetching {} meetings for {}: {}", category, country, e);
                    }
                }
            }
        }

        collected
    }

    /// Scrape one date end to end.
    ///
    /// Fails only when the date directory or the summary cannot be written.
    pub async fn run(&self, date: &str, selection: &Selection) -> Result<WalkReport> {
        info!("Starting scrape for {}", date);
        let date_dir = self.store.ensure_date_dir(date)?;

        info!("Fetching meetings...");
        let meetings = self.collect_meetings(date, selection).await;
        let mut report = WalkReport {
            meetings_found: meetings.len(),
            ..WalkReport::default()
        };

        if meetings.is_empty() {
            info!("No meetings found for this date.");
        } else {
            info!("Found {} total meetings", meetings.len());
        }

        let total = meetings.len();
        for (idx, collected) in meetings.iter().enumerate() {
            let meeting = &collected.meeting;
            info!(
                "[{}/{}] Processing: {} ({}, {})",
                idx + 1,
                total,
                meeting.name,
                meeting.category_name,
                meeting.state
            );

            let meeting_dir = match self.store.write_meeting(&date_dir, meeting) {
                Ok(dir) => dir,
                Err(e) => {
                    warn!("Failed to write meeting {}: {}", meeting.name, e);
                    continue;
                }
            };
            report.meetings_written += 1;

            info!("  Found {} races", meeting.races.len());
            let mut used_names = HashSet::new();
            for race in &meeting.races {
                let outcome = self
                    .process_race(
                        race,
                        &collected.requested_country,
                        &meeting_dir,
                        &mut used_names,
                    )
                    .await;
                report.record(outcome);
            }
        }

        info!("Scraping complete! Data saved to: {}", date_dir.display());
        report.summary = Some(write_summary(&date_dir)?);
        Ok(report)
    }

    /// Fetch, check, enhance and write one race
    ///
    /// `used_names` holds the race file names already written for this
    /// meeting; a clashing race gets its id appended instead of overwriting.
    pub async fn process_race(
        &self,
        race: &RaceStub,
        requested_country: &str,
        meeting_dir: &Path,
        used_names: &mut HashSet<String>,
    ) -> RaceOutcome {
        let Some(race_id) = race.id.as_deref() else {
            return RaceOutcome::Skipped;
        };

        info!("    Fetching Race {}: {}...", race.race_number, race.name);

        let mut record: Value = match self.api.race(race_id).await {
            Ok(record) => record,
            Err(e) => {
                warn!(race_id = %race_id, "    Failed to fetch race details: {}", e);
                return RaceOutcome::Failed;
            }
        };

        let enhanced = needs_enhancement(Some(&record), requested_country);
        if enhanced {
            info!(race_id = %race_id, "    Form data incomplete, fetching supplemental data");
            SupplementMerger::new(&self.api, self.runner_pause)
                .enhance(race_id, &mut record)
                .await;
        }

        let mut race_name = race.name.clone();
        if !used_names.insert(race_file_name(race.race_number, &race_name)) {
            warn!(
                race_id = %race_id,
                "    Race file name collision for Race {}: {}",
                race.race_number,
                race.name
            );
            race_name = format!("{}_{}", race.name, race_id);
            used_names.insert(race_file_name(race.race_number, &race_name));
        }

        match self
            .store
            .write_race(meeting_dir, race.race_number, &race_name, &record)
        {
            Ok(path) => {
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                info!("    Saved to {}", file_name);
                RaceOutcome::Saved { enhanced }
            }
            Err(e) => {
                warn!(race_id = %race_id, "    Failed to write race: {}", e);
                RaceOutcome::Failed
            }
        }
    }
}
