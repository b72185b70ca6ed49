//! Archive differ: detects archives whose content did not change since the
//! previous publication.
//!
//! Entries are compared as a set of `(name, sha256)` pairs, so entry order
//! does not matter. When the sets match, the new file takes the previous
//! file's access and modification times, so timestamp-aware mirrors
//! skip the transfer.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use filetime::FileTime;
use serde::Serialize;
use sha2::{Digest, Sha256};
use zip::ZipArchive;

use crate::archive::Archive;
use crate::error::{io_err, zip_err, SyncError};

/// What sealing an archive amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveOutcome {
    /// Same entries as the published archive; timestamps carried over.
    Unchanged,
    /// New or changed archive.
    Zipped,
}

/// Seals archives and compares them with the copy under the destination root.
#[derive(Debug, Clone)]
pub struct Differ {
    dst_root: PathBuf,
}

impl Differ {
    pub fn new(dst_root: impl Into<PathBuf>) -> Self {
        Self {
            dst_root: dst_root.into(),
        }
    }

    /// Seal `archive` and classify it against its published predecessor.
    pub fn finalize(&self, archive: Archive) -> Result<ArchiveOutcome, SyncError> {
        let old_path = self.dst_root.join(archive.rel_path());
        let new_path = archive.seal()?;

        let old = match entry_checksums(&old_path) {
            Ok(old) => old,
            Err(err) => {
                tracing::debug!(path = %old_path.display(), error = %err, "no previous archive to compare");
                return Ok(ArchiveOutcome::Zipped);
            }
        };
        let new = entry_checksums(&new_path)?;
        if old != new {
            return Ok(ArchiveOutcome::Zipped);
        }

        let meta = std::fs::metadata(&old_path).map_err(|e| io_err(&old_path, e))?;
        filetime::set_file_times(
            &new_path,
            FileTime::from_last_access_time(&meta),
            FileTime::from_last_modification_time(&meta),
        )
        .map_err(|e| io_err(&new_path, e))?;
        Ok(ArchiveOutcome::Unchanged)
    }
}

/// `(entry name, sha256 hex)` for every entry of the zip at `path`.
pub fn entry_checksums(path: &Path) -> Result<BTreeSet<(String, String)>, SyncError> {
    let file = File::open(path).map_err(|e| io_err(path, e))?;
    let mut zip = ZipArchive::new(file).map_err(|e| zip_err(path, e))?;
    let mut sums = BTreeSet::new();
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).map_err(|e| zip_err(path, e))?;
        let mut hasher = Sha256::new();
        let mut buf = [0u8; 16 * 1024];
        loop {
            let n = entry.read(&mut buf).map_err(|e| io_err(path, e))?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }
        sums.insert((entry.name().to_string(), hex::encode(hasher.finalize())));
    }
    Ok(sums)
}
