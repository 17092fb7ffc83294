//! On-disk layout for scraped records
//!
//! ```text
//! <base_dir>/<YYYY-MM-DD>/<meeting-folder>/meeting_info.json
//! <base_dir>/<YYYY-MM-DD>/<meeting-folder>/Race_NN_<name>.json
//! <base_dir>/<YYYY-MM-DD>/summary.json
//! ```
//!
//! Files are written to a temporary sibling and renamed into place, so a
//! crash mid-write never leaves a truncated `Race_*.json` for the summary to
//! count.

use racing_common::sanitize::{collapse_separators, sanitize_filename};
use racing_common::Result;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::models::Meeting;

/// Meeting record file name
pub const MEETING_INFO_FILE: &str = "meeting_info.json";

/// Prefix shared by every race file
pub const RACE_FILE_PREFIX: &str = "Race_";

/// Writes meetings and races under a base directory
#[derive(Debug, Clone)]
pub struct RaceStore {
    base_dir: PathBuf,
}

impl RaceStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Directory for one scrape date (not created)
    pub fn date_dir(&self, date: &str) -> PathBuf {
        self.base_dir.join(date)
    }

    /// Create the date directory, including missing parents
    pub fn ensure_date_dir(&self, date: &str) -> Result<PathBuf> {
        let dir = self.date_dir(date);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Create the meeting folder and write `meeting_info.json` into it
    pub fn write_meeting(&self, date_dir: &Path, meeting: &Meeting) -> Result<PathBuf> {
        let dir = date_dir.join(meeting_folder_name(meeting));
        fs::create_dir_all(&dir)?;
        write_json_atomic(&dir.join(MEETING_INFO_FILE), &meeting.raw)?;
        Ok(dir)
    }

    /// Write one race record, returning its path
    pub fn write_race(
        &self,
        meeting_dir: &Path,
        race_number: u32,
        race_name: &str,
        record: &impl Serialize,
    ) -> Result<PathBuf> {
        let path = meeting_dir.join(race_file_name(race_number, race_name));
        write_json_atomic(&path, record)?;
        Ok(path)
    }
}

/// Folder name for a meeting: `<name>_<category>_<country>_<state>`
///
/// Only the first word of the category is used ("Thoroughbred Racing" →
/// "Thoroughbred"). Empty parts collapse away.
pub fn meeting_folder_name(meeting: &Meeting) -> String {
    let category = meeting.category_name.split_whitespace().next().unwrap_or("");
    let joined = [
        meeting.name.as_str(),
        category,
        meeting.country.as_str(),
        meeting.state.as_str(),
    ]
    .map(str::trim)
    .join("_");
    // Sanitize first: reserved characters become separators too
    let name = collapse_separators(&sanitize_filename(&joined), '_')
        .trim()
        .to_string();
    if name.is_empty() {
        format!("meeting_{}", sanitize_filename(&meeting.id))
    } else {
        name
    }
}

/// Race file name: `Race_<2-digit number>_<name>.json`
pub fn race_file_name(race_number: u32, race_name: &str) -> String {
    sanitize_filename(&format!("{RACE_FILE_PREFIX}{race_number:02}_{race_name}.json"))
}

/// True for file names produced by [`race_file_name`]
pub fn is_race_file(name: &str) -> bool {
    name.starts_with(RACE_FILE_PREFIX) && name.ends_with(".json")
}

/// Pretty-print `value` to `path` via a temporary file and rename
pub fn write_json_atomic(path: &Path, value: &impl Serialize) -> Result<()> {
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    {
        let mut writer = BufWriter::new(File::create(&tmp_path)?);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    Ok(())
}
