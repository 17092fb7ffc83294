//! Date-level summary derived from the output tree
//!
//! Counts come from what is on disk, not from the run that wrote it, so the
//! summary stays right after a restart against a partially populated date
//! directory.

use chrono::Utc;
use racing_common::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};
use walkdir::WalkDir;

use super::race_store::{is_race_file, write_json_atomic, MEETING_INFO_FILE};

/// Summary file name, written into the date directory
pub const SUMMARY_FILE: &str = "summary.json";

/// Country bucket for meetings whose info file lacks one
const UNKNOWN_COUNTRY: &str = "UNKNOWN";

/// Per-meeting line of the summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingSummary {
    pub folder: String,
    pub country: String,
    pub race_count: usize,
}

/// Contents of `summary.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub date: String,
    pub generated_at: String,
    pub total_meetings: usize,
    pub total_races: usize,
    pub races_by_country: BTreeMap<String, usize>,
    pub meetings: Vec<MeetingSummary>,
}

/// Scan `date_dir` and tally meetings and races.
///
/// Every immediate subdirectory is one meeting; its `Race_*.json` files are
/// its races. Meetings are listed in folder-name order.
pub fn build_summary(date_dir: &Path) -> Result<Summary> {
    let mut meetings = Vec::new();

    for entry in WalkDir::new(date_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| std::io::Error::other(e.to_string()))?;
        if !entry.file_type().is_dir() {
            continue;
        }

        let race_count = count_race_files(entry.path())?;
        meetings.push(MeetingSummary {
            folder: entry.file_name().to_string_lossy().into_owned(),
            country: meeting_country(entry.path()),
            race_count,
        });
    }

    let mut races_by_country = BTreeMap::new();
    for meeting in &meetings {
        *races_by_country.entry(meeting.country.clone()).or_insert(0) += meeting.race_count;
    }

    Ok(Summary {
        date: date_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        generated_at: Utc::now().to_rfc3339(),
        total_meetings: meetings.len(),
        total_races: meetings.iter().map(|m| m.race_count).sum(),
        races_by_country,
        meetings,
    })
}

/// Build the summary and write it to `<date_dir>/summary.json`
pub fn write_summary(date_dir: &Path) -> Result<Summary> {
    let summary = build_summary(date_dir)?;
    write_json_atomic(&date_dir.join(SUMMARY_FILE), &summary)?;

    info!(
        "Summary: {} meetings, {} races",
        summary.total_meetings, summary.total_races
    );
    Ok(summary)
}

fn count_race_files(meeting_dir: &Path) -> Result<usize> {
    let mut count = 0;
    for entry in WalkDir::new(meeting_dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| std::io::Error::other(e.to_string()))?;
        if entry.file_type().is_file() && is_race_file(&entry.file_name().to_string_lossy()) {
            count += 1;
        }
    }
    Ok(count)
}

/// Country from `meeting_info.json`, or `UNKNOWN` if unreadable
fn meeting_country(meeting_dir: &Path) -> String {
    let path = meeting_dir.join(MEETING_INFO_FILE);
    let country = fs::read_to_string(&path)
        .ok()
        .and_then(|text| match serde_json::from_str::<Value>(&text) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Unreadable meeting info");
                None
            }
        })
        .and_then(|info| {
            info.get("country")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string)
        });
    country.unwrap_or_else(|| UNKNOWN_COUNTRY.to_string())
}
