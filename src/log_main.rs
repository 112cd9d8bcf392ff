//! Poll debug log and session history

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::utils::path::get_data_dir;

/// Date and time with exactly three fraction digits
pub fn current_datetime_ms_str() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}

/// Date and time usable in file names (no colons)
pub fn current_datetime_file_str() -> String {
    Local::now().format("%Y-%m-%d %H-%M-%S").to_string()
}

/// Append-only, line-oriented debug log written after every poll
#[derive(Debug, Clone)]
pub struct PollLog {
    path: PathBuf,
}

impl PollLog {
    /// New log file in `dir`, named after the current date and time
    pub fn create_in(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.log", current_datetime_file_str()));
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `line` prefixed with a millisecond timestamp
    pub fn append(&self, line: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}    {}", current_datetime_ms_str(), line)?;
        Ok(())
    }
}

/// One fishing run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub start: String,
    pub stop: Option<String>,
    pub fish_caught: u64,
    pub end: String,
}

/// Get sessions file path
pub fn get_sessions_path() -> PathBuf {
    get_data_dir().join("logs").join("sessions.json")
}

/// Load sessions from file; a missing or unreadable file yields no sessions
pub fn load_sessions(path: &Path) -> Vec<SessionRecord> {
    fs::read_to_string(path)
        .ok()
        .and_then(|c| serde_json::from_str(&c).ok())
        .unwrap_or_default()
}

/// Append a session to the history file
pub fn append_session(path: &Path, record: SessionRecord) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut sessions = load_sessions(path);
    sessions.push(record);
    fs::write(path, serde_json::to_string_pretty(&sessions)?)?;
    Ok(())
}
