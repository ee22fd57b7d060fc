//! Store lifecycle: open or create a configuration file, look up and change
//! values, and persist changes through an atomic temp-file rewrite.
//!
//! A [`ConfigStore`] owns the parsed [`Document`] plus the two paths it
//! needs: the source file and the rewrite staging file (source path plus a
//! fixed `.tmp` suffix).  Mutations only touch the in-memory document and
//! set a dirty flag; the disk is written at most once, on [`flush`],
//! [`close`] or drop, and only while dirty.
//!
//! The store takes no lock on the underlying file.  Two handles opened on
//! the same path race on the staging file and on the final rename; last
//! writer wins.  Single-process, single-threaded use is the supported model.
//!
//! [`flush`]: ConfigStore::flush
//! [`close`]: ConfigStore::close

use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::document::{Document, Section};
use crate::format::{parse_document, render_document};

/// Suffix appended to the store path to form the rewrite staging path.
/// Not configurable; two stores on one base path collide here.
const WRITE_SUFFIX: &str = ".tmp";

/// Errors produced by store lifecycle operations.
///
/// Lookup misses are *not* errors ([`ConfigStore::get`] reports them as
/// `None`) and malformed file content is tolerated by the parser, so
/// everything that can go wrong is an I/O failure with path context.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A file could not be opened, read, created or written.
    #[error("I/O error accessing configuration at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The rewritten staging file could not be moved over the original.
    /// The staging file is left behind for inspection.
    #[error("failed to replace configuration at {path}: {source}")]
    Replace {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// An open configuration file: the parsed document plus its disk locations.
#[derive(Debug)]
pub struct ConfigStore {
    document: Document,
    path: PathBuf,
    write_path: PathBuf,
    dirty: bool,
}

impl ConfigStore {
    // ── Lifecycle ─────────────────────────────────────────────────────────────

    /// Opens and parses an existing configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the file is missing or unreadable.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let file = File::open(&path).map_err(|source| StoreError::io(&path, source))?;
        let mut reader = BufReader::new(file);
        let document =
            parse_document(&mut reader).map_err(|source| StoreError::io(&path, source))?;

        debug!(path = %path.display(), sections = document.section_count(), "opened configuration store");

        let write_path = write_path_for(&path);
        Ok(Self {
            document,
            path,
            write_path,
            dirty: false,
        })
    }

    /// Opens a configuration file, first creating it empty when it does not
    /// exist yet.
    ///
    /// An existing file is never truncated; only a NotFound open triggers
    /// creation.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the file can be neither opened nor
    /// created.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        match Self::open(path) {
            Err(StoreError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "creating empty configuration file");
                File::create(path).map_err(|source| StoreError::io(path, source))?;
                Self::open(path)
            }
            other => other,
        }
    }

    /// Flushes pending changes (if any) and consumes the handle.
    ///
    /// The handle is gone regardless of the outcome; a failed flush is
    /// reported but never retried.
    ///
    /// # Errors
    ///
    /// Returns the flush error when the store was dirty and the rewrite
    /// failed.
    pub fn close(mut self) -> Result<(), StoreError> {
        let result = if self.dirty {
            self.write_to_disk()
        } else {
            Ok(())
        };
        // Drop must not retry a flush this close already reported.
        self.dirty = false;
        result
    }

    /// Writes the document back to disk if it has unsaved changes.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the staging file cannot be written,
    /// or [`StoreError::Replace`] when the original cannot be removed or the
    /// staging file cannot be renamed over it.  The store stays dirty in
    /// both cases.
    pub fn flush(&mut self) -> Result<(), StoreError> {
        if !self.dirty {
            return Ok(());
        }
        self.write_to_disk()?;
        self.dirty = false;
        Ok(())
    }

    // ── Lookup / mutation ─────────────────────────────────────────────────────

    /// Returns a copy of the value of `entry` in `section`, or `None` when
    /// it does not exist.  `section == None` addresses the global section.
    pub fn get(&self, section: Option<&str>, entry: &str) -> Option<String> {
        self.document
            .find_entry(section, entry)
            .map(|e| e.value().to_owned())
    }

    /// `true` when `entry` exists in `section`.  Looks up without creating.
    pub fn contains(&self, section: Option<&str>, entry: &str) -> bool {
        self.document.find_entry(section, entry).is_some()
    }

    /// Sets the value of `entry` in `section`, creating the section and the
    /// entry as needed, and marks the store dirty.
    pub fn set(&mut self, section: Option<&str>, entry: &str, value: &str) {
        self.document
            .find_or_create_entry(section, entry)
            .set_value(value);
        self.dirty = true;
    }

    // ── Introspection ─────────────────────────────────────────────────────────

    /// The sections of the document in file order, global section first.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.document.sections()
    }

    /// The path of the underlying configuration file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `true` when the in-memory document has diverged from the file.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    // ── Rewrite ───────────────────────────────────────────────────────────────

    /// Serializes the document to the staging path, then swaps it over the
    /// original with remove + rename.
    ///
    /// A failure while writing leaves a partial staging file behind and the
    /// original untouched; a failure during the swap can lose the original
    /// (already removed) while the staging file still holds the full
    /// rewrite.
    fn write_to_disk(&self) -> Result<(), StoreError> {
        let mut file = File::create(&self.write_path)
            .map_err(|source| StoreError::io(&self.write_path, source))?;
        file.write_all(render_document(&self.document).as_bytes())
            .map_err(|source| StoreError::io(&self.write_path, source))?;
        drop(file);

        fs::remove_file(&self.path).map_err(|source| StoreError::Replace {
            path: self.path.clone(),
            source,
        })?;
        fs::rename(&self.write_path, &self.path).map_err(|source| StoreError::Replace {
            path: self.path.clone(),
            source,
        })?;

        debug!(path = %self.path.display(), "configuration flushed");
        Ok(())
    }
}

impl Drop for ConfigStore {
    /// Conditional-flush guard: a store dropped while dirty still tries to
    /// save, like `BufWriter`.  Errors cannot propagate out of drop, so they
    /// are only logged; call [`ConfigStore::close`] to observe them.
    fn drop(&mut self) {
        if self.dirty {
            if let Err(error) = self.flush() {
                warn!(
                    path = %self.path.display(),
                    %error,
                    "configuration store dropped with unsaved changes that could not be written"
                );
            }
        }
    }
}

/// The staging path: the store path with [`WRITE_SUFFIX`] appended.
fn write_path_for(path: &Path) -> PathBuf {
    let mut staged = path.as_os_str().to_os_string();
    staged.push(WRITE_SUFFIX);
    PathBuf::from(staged)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    /// Fresh scratch file path in a per-test temp directory.
    fn scratch_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("inistore_test_{}", Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    fn write_file(path: &Path, content: &str) {
        fs::write(path, content).unwrap();
    }

    // ── Open / create ─────────────────────────────────────────────────────────

    #[test]
    fn test_open_missing_file_fails_with_not_found() {
        let path = scratch_path("missing.conf");
        let error = ConfigStore::open(&path).unwrap_err();
        match error {
            StoreError::Io { source, .. } => {
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn test_create_makes_an_empty_file_and_opens_it() {
        let path = scratch_path("fresh.conf");
        let store = ConfigStore::create(&path).unwrap();

        assert!(path.exists());
        assert!(!store.is_dirty());
        assert_eq!(store.sections().count(), 1);
    }

    #[test]
    fn test_create_does_not_truncate_an_existing_file() {
        let path = scratch_path("existing.conf");
        write_file(&path, "[Sect]\nKey=kept\n");

        let store = ConfigStore::create(&path).unwrap();
        assert_eq!(store.get(Some("Sect"), "Key").as_deref(), Some("kept"));
    }

    #[test]
    fn test_staging_path_appends_the_suffix() {
        let path = scratch_path("suffixed.conf");
        write_file(&path, "");
        let store = ConfigStore::open(&path).unwrap();
        assert_eq!(
            store.write_path,
            PathBuf::from(format!("{}.tmp", path.display()))
        );
    }

    // ── Get / set ─────────────────────────────────────────────────────────────

    #[test]
    fn test_set_then_get_returns_the_value() {
        let path = scratch_path("setget.conf");
        let mut store = ConfigStore::create(&path).unwrap();

        store.set(Some("Sect"), "Key", "Value");
        assert_eq!(store.get(Some("Sect"), "Key").as_deref(), Some("Value"));
        assert!(store.is_dirty());
    }

    #[test]
    fn test_set_twice_overwrites_instead_of_duplicating() {
        let path = scratch_path("overwrite.conf");
        let mut store = ConfigStore::create(&path).unwrap();

        store.set(Some("Sect"), "Key", "first");
        store.set(Some("Sect"), "Key", "second");

        assert_eq!(store.get(Some("Sect"), "Key").as_deref(), Some("second"));
        let section = store.sections().nth(1).unwrap();
        assert_eq!(section.len(), 1);
    }

    #[test]
    fn test_get_miss_mutates_nothing() {
        let path = scratch_path("miss.conf");
        write_file(&path, "[Sect]\nKey=Value\n");
        let store = ConfigStore::open(&path).unwrap();

        assert_eq!(store.get(Some("Sect"), "Other"), None);
        assert_eq!(store.get(Some("Nowhere"), "Key"), None);
        assert!(!store.is_dirty());
        assert_eq!(store.sections().count(), 2);
    }

    #[test]
    fn test_global_section_is_addressed_with_none() {
        let path = scratch_path("global.conf");
        write_file(&path, "top=1\n[Sect]\nKey=2\n");
        let store = ConfigStore::open(&path).unwrap();

        assert_eq!(store.get(None, "top").as_deref(), Some("1"));
        assert_eq!(store.get(None, "Key"), None);
    }

    #[test]
    fn test_contains_reports_existence_without_creating() {
        let path = scratch_path("contains.conf");
        write_file(&path, "[Sect]\nKey=Value\n");
        let store = ConfigStore::open(&path).unwrap();

        assert!(store.contains(Some("Sect"), "Key"));
        assert!(!store.contains(Some("Sect"), "Missing"));
        assert_eq!(store.sections().nth(1).unwrap().len(), 1);
    }

    // ── Flush / close ─────────────────────────────────────────────────────────

    #[test]
    fn test_close_writes_changes_back() {
        let path = scratch_path("close.conf");
        let mut store = ConfigStore::create(&path).unwrap();
        store.set(Some("Sect"), "Key", "Value");
        store.close().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "[Sect]\nKey=Value\n");
    }

    #[test]
    fn test_clean_close_does_not_rewrite_the_file() {
        let path = scratch_path("clean.conf");
        // Content the writer would normalize; it must survive a clean close.
        write_file(&path, "   \n[Sect]\nKey=Value\n");
        let store = ConfigStore::open(&path).unwrap();
        store.close().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "   \n[Sect]\nKey=Value\n");
    }

    #[test]
    fn test_flush_clears_the_dirty_flag() {
        let path = scratch_path("flush.conf");
        let mut store = ConfigStore::create(&path).unwrap();
        store.set(None, "Key", "Value");

        store.flush().unwrap();
        assert!(!store.is_dirty());
        assert_eq!(fs::read_to_string(&path).unwrap(), "Key=Value\n");
    }

    #[test]
    fn test_flush_removes_the_staging_file() {
        let path = scratch_path("staging.conf");
        let mut store = ConfigStore::create(&path).unwrap();
        store.set(None, "Key", "Value");

        let staging = store.write_path.clone();
        store.flush().unwrap();
        assert!(!staging.exists());
    }

    #[test]
    fn test_drop_while_dirty_flushes() {
        let path = scratch_path("drop.conf");
        {
            let mut store = ConfigStore::create(&path).unwrap();
            store.set(Some("Sect"), "Key", "saved-on-drop");
        }
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "[Sect]\nKey=saved-on-drop\n"
        );
    }

    #[test]
    fn test_comments_survive_a_rewrite() {
        let path = scratch_path("comments.conf");
        write_file(
            &path,
            "# top comment\n[Sect] # header\nKey=old # trailing\n",
        );

        let mut store = ConfigStore::open(&path).unwrap();
        store.set(Some("Sect"), "Key", "new");
        store.close().unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "# top comment\n[Sect] # header\nKey=new # trailing\n"
        );
    }
}
