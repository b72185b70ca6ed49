//! Run report: what a sync produced and which individual exports degraded.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::differ::ArchiveOutcome;

/// Why a single export was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FailureReason {
    /// The renderer raised.
    Raised(String),
    /// The renderer answered with a non-success status.
    Status(u16),
    /// A media or static source file could not be copied.
    Copy(String),
    /// A map tile could not be fetched.
    Tile(String),
    /// The output path would land outside the bundle.
    Unsafe(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Raised(msg) => write!(f, "failed ({msg})"),
            FailureReason::Status(code) => write!(f, "failed (HTTP {code})"),
            FailureReason::Copy(msg) => write!(f, "copy failed ({msg})"),
            FailureReason::Tile(msg) => write!(f, "tile failed ({msg})"),
            FailureReason::Unsafe(msg) => write!(f, "refused ({msg})"),
        }
    }
}

/// One degraded export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskFailure {
    /// Language of the export, `None` for tiles.
    pub language: Option<String>,
    /// Output path relative to the destination root, or tile address.
    pub target: String,
    pub reason: FailureReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveRecord {
    pub path: PathBuf,
    pub entries: usize,
    pub outcome: ArchiveOutcome,
}

/// Summary of a completed run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    /// Files written or copied into the bundle.
    pub written: usize,
    pub tiles_fetched: usize,
    pub archives: Vec<ArchiveRecord>,
    pub failures: Vec<TaskFailure>,
}

impl SyncReport {
    /// `false` once any individual export degraded.
    pub fn success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn unchanged_archives(&self) -> usize {
        self.archives
            .iter()
            .filter(|a| a.outcome == ArchiveOutcome::Unchanged)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_tracks_failures() {
        let mut report = SyncReport::default();
        assert!(report.success());
        report.failures.push(TaskFailure {
            language: Some("en".to_string()),
            target: "api/en/treks.geojson".to_string(),
            reason: FailureReason::Status(500),
        });
        assert!(!report.success());
    }

    #[test]
    fn reasons_render_like_terminal_output() {
        assert_eq!(FailureReason::Status(404).to_string(), "failed (HTTP 404)");
        assert_eq!(
            FailureReason::Raised("boom".to_string()).to_string(),
            "failed (boom)"
        );
    }

    #[test]
    fn report_serializes_outcomes_in_lowercase() {
        let report = SyncReport {
            archives: vec![ArchiveRecord {
                path: PathBuf::from("zip/tiles/global.zip"),
                entries: 3,
                outcome: ArchiveOutcome::Unchanged,
            }],
            ..SyncReport::default()
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["archives"][0]["outcome"], "unchanged");
    }
}
