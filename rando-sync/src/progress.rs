//! Coarse progress reporting.
//!
//! Progress is advisory: a reporter that cannot write must never fail the run.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Receives percentage milestones during a run.
pub trait ProgressReporter {
    fn report(&self, percent: u8, message: &str);
}

/// Discards every milestone.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&self, _percent: u8, _message: &str) {}
}

/// Appends one JSON object per milestone to a file.
#[derive(Debug, Clone)]
pub struct JsonLinesProgress {
    path: PathBuf,
    name: String,
}

#[derive(Debug, Serialize)]
struct ProgressLine<'a> {
    name: &'a str,
    current: u8,
    total: u8,
    infos: &'a str,
    at: DateTime<Utc>,
}

impl JsonLinesProgress {
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }

    fn append(&self, line: &ProgressLine<'_>) -> std::io::Result<()> {
        let mut json = serde_json::to_vec(line)?;
        json.push(b'\n');
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(&json)
    }
}

impl ProgressReporter for JsonLinesProgress {
    fn report(&self, percent: u8, message: &str) {
        let line = ProgressLine {
            name: &self.name,
            current: percent.min(100),
            total: 100,
            infos: message,
            at: Utc::now(),
        };
        if let Err(e) = self.append(&line) {
            tracing::warn!(path = %self.path.display(), "could not write progress: {e}");
        }
    }
}
