//! Write-once zip archives.
//!
//! An [`Archive`] is created under the temporary tree, receives named
//! entries, and is sealed exactly once by the [`Differ`](crate::Differ).
//! Sealing consumes the value, so a sealed archive cannot be appended to.

use std::collections::HashSet;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{io_err, zip_err, SyncError};

pub struct Archive {
    rel_path: PathBuf,
    path: PathBuf,
    writer: ZipWriter<File>,
    names: HashSet<String>,
}

impl Archive {
    /// Create `<root>/<rel_path>`, making parent directories as needed.
    pub fn create(root: &Path, rel_path: impl Into<PathBuf>) -> Result<Self, SyncError> {
        let rel_path = rel_path.into();
        let path = root.join(&rel_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
        }
        let file = File::create(&path).map_err(|e| io_err(&path, e))?;
        Ok(Self {
            rel_path,
            path,
            writer: ZipWriter::new(file),
            names: HashSet::new(),
        })
    }

    /// Add an entry. The first entry under a given name wins; later ones are
    /// skipped and `false` is returned.
    pub fn insert(&mut self, name: &str, bytes: &[u8]) -> Result<bool, SyncError> {
        if !self.names.insert(name.to_string()) {
            tracing::debug!(archive = %self.rel_path.display(), entry = name, "duplicate entry skipped");
            return Ok(false);
        }
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
        self.writer
            .start_file(name, options)
            .map_err(|e| zip_err(&self.path, e))?;
        self.writer
            .write_all(bytes)
            .map_err(|e| io_err(&self.path, e))?;
        Ok(true)
    }

    /// Path relative to the sync roots, e.g. `zip/treks/en/global.zip`.
    pub fn rel_path(&self) -> &Path {
        &self.rel_path
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Write the central directory and close the file.
    pub(crate) fn seal(mut self) -> Result<PathBuf, SyncError> {
        let file = self.writer.finish().map_err(|e| zip_err(&self.path, e))?;
        file.sync_all().map_err(|e| io_err(&self.path, e))?;
        Ok(self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;
    use zip::ZipArchive;

    #[test]
    fn entries_are_readable_after_seal() {
        let tmp = TempDir::new().unwrap();
        let mut archive = Archive::create(tmp.path(), "zip/treks/en/1.zip").unwrap();
        archive.insert("api/en/treks/1/pois.geojson", b"{}").unwrap();
        archive.insert("media/a.jpg", b"jpeg").unwrap();
        assert_eq!(archive.len(), 2);

        let path = archive.seal().unwrap();
        assert_eq!(path, tmp.path().join("zip/treks/en/1.zip"));

        let mut zip = ZipArchive::new(File::open(&path).unwrap()).unwrap();
        let mut body = String::new();
        zip.by_name("media/a.jpg")
            .unwrap()
            .read_to_string(&mut body)
            .unwrap();
        assert_eq!(body, "jpeg");
    }

    #[test]
    fn duplicate_names_keep_first_entry() {
        let tmp = TempDir::new().unwrap();
        let mut archive = Archive::create(tmp.path(), "global.zip").unwrap();
        assert!(archive.insert("api/en/parameters.json", b"first").unwrap());
        assert!(!archive.insert("api/en/parameters.json", b"second").unwrap());
        let path = archive.seal().unwrap();

        let mut zip = ZipArchive::new(File::open(&path).unwrap()).unwrap();
        assert_eq!(zip.len(), 1);
        let mut body = String::new();
        zip.by_index(0).unwrap().read_to_string(&mut body).unwrap();
        assert_eq!(body, "first");
    }

    #[test]
    fn empty_archive_is_still_a_valid_zip() {
        let tmp = TempDir::new().unwrap();
        let archive = Archive::create(tmp.path(), "zip/tiles/9.zip").unwrap();
        assert!(archive.is_empty());
        let path = archive.seal().unwrap();
        assert_eq!(ZipArchive::new(File::open(&path).unwrap()).unwrap().len(), 0);
    }
}
