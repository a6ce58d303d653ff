//! Tracking-service log sinks

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::plot::PlotArtifact;
use crate::{Error, Result};

/// Receives plot emissions for the active run.
pub trait RunLogger {
    /// Record `artifact` under `key`.
    ///
    /// # Errors
    ///
    /// Returns error if the emission cannot be recorded.
    fn log(&mut self, key: &str, artifact: PlotArtifact) -> Result<()>;
}

/// One logged plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    key: String,
    artifact: PlotArtifact,
    logged_at: DateTime<Utc>,
}

impl LogEntry {
    fn new(key: &str, artifact: PlotArtifact) -> Self {
        Self {
            key: key.to_string(),
            artifact,
            logged_at: Utc::now(),
        }
    }

    /// Get the log key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get the logged plot.
    #[must_use]
    pub const fn artifact(&self) -> &PlotArtifact {
        &self.artifact
    }

    /// Get the emission timestamp.
    #[must_use]
    pub const fn logged_at(&self) -> DateTime<Utc> {
        self.logged_at
    }
}

/// Keeps emissions in memory, in order.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    entries: Vec<LogEntry>,
}

impl MemoryLogger {
    /// Create an empty logger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All entries in emission order.
    #[must_use]
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Logged keys in emission order.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.entries.iter().map(LogEntry::key).collect()
    }

    /// Most recent entry logged under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&LogEntry> {
        self.entries.iter().rev().find(|entry| entry.key == key)
    }
}

impl RunLogger for MemoryLogger {
    fn log(&mut self, key: &str, artifact: PlotArtifact) -> Result<()> {
        self.entries.push(LogEntry::new(key, artifact));
        Ok(())
    }
}

/// Appends one JSON line per emission to a file.
#[derive(Debug)]
pub struct JsonlLogger {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl JsonlLogger {
    /// Open (or create) `path` for appending.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    /// Path of the log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RunLogger for JsonlLogger {
    fn log(&mut self, key: &str, artifact: PlotArtifact) -> Result<()> {
        let entry = LogEntry::new(key, artifact);
        serde_json::to_writer(&mut self.writer, &entry).map_err(|e| {
            Error::Tracking(format!(
                "failed to record '{key}' in {}: {e}",
                self.path.display()
            ))
        })?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Read back the entries of a JSON-lines log.
///
/// # Errors
///
/// Returns error if the file cannot be read or a line is not an entry.
pub fn read_jsonl(path: impl AsRef<Path>) -> Result<Vec<LogEntry>> {
    std::fs::read_to_string(path)?
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).map_err(Error::from))
        .collect()
}
