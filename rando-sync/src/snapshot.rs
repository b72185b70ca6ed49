//! Content snapshotter: turns one rendering call into one file of the bundle.
//!
//! ## Failure policy
//!
//! | Condition                          | Effect                                  |
//! |------------------------------------|-----------------------------------------|
//! | renderer raises                    | task skipped, failure recorded          |
//! | non-2xx status                     | task skipped, failure recorded          |
//! | media/static source unreadable     | task skipped, failure recorded          |
//! | output path leaves the bundle      | task skipped, failure recorded          |
//! | writing into the temporary tree    | `Err`, aborts the run                   |
//! | inserting into an archive          | `Err`, aborts the run                   |

use std::path::{Component, Path, PathBuf};

use rando_core::Language;
use rando_render::{Endpoint, RenderRequest, Renderable};

use crate::archive::Archive;
use crate::differ::{ArchiveOutcome, Differ};
use crate::error::{io_err, SyncError};
use crate::report::{ArchiveRecord, FailureReason, SyncReport, TaskFailure};

/// One rendering call to make. Consumed by [`Snapshotter::render`].
pub struct ExportTask<'a> {
    endpoint: Endpoint,
    query: Vec<(String, String)>,
    dest: Option<String>,
    archive: Option<&'a mut Archive>,
}

impl<'a> ExportTask<'a> {
    /// A task writing to the endpoint's own route.
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            query: Vec::new(),
            dest: None,
            archive: None,
        }
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Write to `dest` (relative, `/`-separated) instead of the endpoint route.
    pub fn dest(mut self, dest: impl Into<String>) -> Self {
        self.dest = Some(dest.into());
        self
    }

    /// Also insert the payload into `archive`.
    pub fn archive(mut self, archive: &'a mut Archive) -> Self {
        self.archive = Some(archive);
        self
    }
}

/// Result of one export task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Written to this path, relative to the bundle root.
    Written(String),
    /// Nothing to export (e.g. an empty media field).
    Skipped,
    Failed(FailureReason),
}

/// Renders tasks into the temporary tree and keeps the run report.
pub struct Snapshotter<'r> {
    renderer: &'r dyn Renderable,
    tmp_root: PathBuf,
    host: String,
    differ: Differ,
    report: SyncReport,
}

impl<'r> Snapshotter<'r> {
    pub fn new(
        renderer: &'r dyn Renderable,
        tmp_root: impl Into<PathBuf>,
        host: impl Into<String>,
        differ: Differ,
    ) -> Self {
        Self {
            renderer,
            tmp_root: tmp_root.into(),
            host: host.into(),
            differ,
            report: SyncReport::default(),
        }
    }

    pub fn tmp_root(&self) -> &Path {
        &self.tmp_root
    }

    /// Render `task` for `lang`, write it, and feed its archive if any.
    pub fn render(&mut self, lang: &Language, task: ExportTask<'_>) -> Result<TaskOutcome, SyncError> {
        let ExportTask {
            endpoint,
            query,
            dest,
            archive,
        } = task;
        let dest = dest.unwrap_or_else(|| endpoint.route(lang));
        if !stays_inside(&dest) {
            return Ok(self.degrade(Some(lang), dest, FailureReason::Unsafe("path escapes the bundle".to_string())));
        }
        let mut request = RenderRequest::new(endpoint, lang.clone(), self.host.clone());
        request.query = query;

        let response = match self.renderer.render(&request) {
            Ok(response) => response,
            Err(err) => return Ok(self.degrade(Some(lang), dest, FailureReason::Raised(err.to_string()))),
        };
        if !response.is_success() {
            let status = response.status;
            return Ok(self.degrade(Some(lang), dest, FailureReason::Status(status)));
        }
        let bytes = match response.into_bytes() {
            Ok(bytes) => bytes,
            Err(err) => return Ok(self.degrade(Some(lang), dest, FailureReason::Raised(err.to_string()))),
        };

        self.write_output(&dest, &bytes)?;
        if let Some(archive) = archive {
            archive.insert(&dest, &bytes)?;
        }
        self.report.written += 1;
        tracing::debug!(%lang, %dest, "generated");
        Ok(TaskOutcome::Written(dest))
    }

    /// Copy `<src_root>/<name>` to `<url_prefix>/<name>` in the bundle.
    ///
    /// An empty `name` means the field is unset and is skipped silently.
    pub fn copy_file(
        &mut self,
        lang: Option<&Language>,
        name: &str,
        src_root: &Path,
        url_prefix: &str,
        archive: Option<&mut Archive>,
    ) -> Result<TaskOutcome, SyncError> {
        if name.is_empty() {
            return Ok(TaskOutcome::Skipped);
        }
        let rel = if url_prefix.is_empty() {
            name.to_string()
        } else {
            format!("{url_prefix}/{name}")
        };
        if !stays_inside(name) {
            return Ok(self.degrade(lang, rel, FailureReason::Copy("path escapes its root".to_string())));
        }

        let src = src_root.join(name);
        let bytes = match std::fs::read(&src) {
            Ok(bytes) => bytes,
            Err(err) => {
                let reason = format!("{}: {err}", src.display());
                return Ok(self.degrade(lang, rel, FailureReason::Copy(reason)));
            }
        };

        self.write_output(&rel, &bytes)?;
        if let Some(archive) = archive {
            archive.insert(&rel, &bytes)?;
        }
        self.report.written += 1;
        tracing::debug!(dest = %rel, "copied");
        Ok(TaskOutcome::Written(rel))
    }

    /// Seal `archive` through the differ and record the outcome.
    pub fn seal(&mut self, archive: Archive) -> Result<ArchiveOutcome, SyncError> {
        let path = archive.rel_path().to_path_buf();
        let entries = archive.len();
        let outcome = self.differ.finalize(archive)?;
        match outcome {
            ArchiveOutcome::Unchanged => tracing::info!(archive = %path.display(), entries, "unchanged"),
            ArchiveOutcome::Zipped => tracing::info!(archive = %path.display(), entries, "zipped"),
        }
        self.report.archives.push(ArchiveRecord {
            path,
            entries,
            outcome,
        });
        Ok(outcome)
    }

    /// Record a degraded export that happened outside [`render`](Self::render).
    pub fn record_failure(&mut self, lang: Option<&Language>, target: impl Into<String>, reason: FailureReason) {
        self.degrade(lang, target.into(), reason);
    }

    pub(crate) fn count_tiles(&mut self, fetched: usize) {
        self.report.tiles_fetched += fetched;
    }

    pub fn report(&self) -> &SyncReport {
        &self.report
    }

    pub fn into_report(self) -> SyncReport {
        self.report
    }

    fn degrade(&mut self, lang: Option<&Language>, target: String, reason: FailureReason) -> TaskOutcome {
        match lang {
            Some(lang) => tracing::warn!(%lang, %target, "{reason}"),
            None => tracing::warn!(%target, "{reason}"),
        }
        self.report.failures.push(TaskFailure {
            language: lang.map(|l| l.to_string()),
            target,
            reason: reason.clone(),
        });
        TaskOutcome::Failed(reason)
    }

    fn write_output(&self, rel: &str, bytes: &[u8]) -> Result<(), SyncError> {
        let path = self.tmp_root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
        }
        std::fs::write(&path, bytes).map_err(|e| io_err(&path, e))
    }
}

/// Whether `rel` only names plain components below its root.
fn stays_inside(rel: &str) -> bool {
    Path::new(rel)
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
}
