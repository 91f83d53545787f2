//! Batched, non-recursive listing of the session directory
//!
//! `Batches` opens the directory once and yields its entries in chunks of at
//! most `batch_size`, so a session store holding millions of files never has
//! more than one chunk of metadata in memory.

use crate::config::BATCH_SIZE;
use crate::utils::{ExpireError, Result};
use chrono::{DateTime, Utc};
use std::ffi::OsString;
use std::fs::{self, DirEntry, ReadDir};
use std::io;
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Snapshot of one directory entry taken at scan time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEntry {
    pub name: OsString,
    pub modified: DateTime<Utc>,
    pub is_dir: bool,
}

impl SessionEntry {
    /// Stats the entry itself; symlinks are not followed.
    fn from_dir_entry(entry: &DirEntry) -> io::Result<Self> {
        let metadata = entry.metadata()?;
        Ok(Self {
            name: entry.file_name(),
            modified: mtime_to_utc(metadata.modified()?),
            is_dir: metadata.is_dir(),
        })
    }
}

/// Converts a filesystem mtime without panicking on values chrono cannot
/// represent. Out-of-range mtimes clamp to `DateTime::<Utc>::MIN_UTC` or
/// `MAX_UTC`, so a far-past file always expires and a far-future one never does.
pub fn mtime_to_utc(mtime: SystemTime) -> DateTime<Utc> {
    match mtime.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_secs())
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, after.subsec_nanos()))
            .unwrap_or(DateTime::<Utc>::MAX_UTC),
        Err(err) => {
            let before = err.duration();
            let nanos = before.subsec_nanos();
            i64::try_from(before.as_secs())
                .ok()
                .and_then(|secs| {
                    if nanos == 0 {
                        Some((-secs, 0))
                    } else {
                        (-secs).checked_sub(1).map(|s| (s, 1_000_000_000 - nanos))
                    }
                })
                .and_then(|(secs, nanos)| DateTime::from_timestamp(secs, nanos))
                .unwrap_or(DateTime::<Utc>::MIN_UTC)
        }
    }
}

/// Lazy sequence of entry batches from a single directory
#[derive(Debug)]
pub struct Batches {
    dir: PathBuf,
    entries: ReadDir,
    batch_size: usize,
    exhausted: bool,
}

impl Batches {
    /// Opens `dir` for listing. A `batch_size` of zero yields the whole
    /// directory as one batch.
    ///
    /// # Errors
    /// Returns `ExpireError::DirOpen` if the directory cannot be opened.
    pub fn open(dir: &Path, batch_size: usize) -> Result<Self> {
        let entries = fs::read_dir(dir).map_err(|e| ExpireError::dir_open(dir, e))?;
        Ok(Self {
            dir: dir.to_path_buf(),
            entries,
            batch_size,
            exhausted: false,
        })
    }

    fn limit(&self) -> usize {
        if self.batch_size == 0 {
            usize::MAX
        } else {
            self.batch_size
        }
    }

    fn fail(&mut self, source: io::Error) -> Option<Result<Vec<SessionEntry>>> {
        self.exhausted = true;
        Some(Err(ExpireError::dir_list(&self.dir, source)))
    }
}

impl Iterator for Batches {
    type Item = Result<Vec<SessionEntry>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        let limit = self.limit();
        let mut batch = Vec::with_capacity(limit.min(BATCH_SIZE));

        while batch.len() < limit {
            let entry = match self.entries.next() {
                Some(Ok(entry)) => entry,
                Some(Err(e)) => return self.fail(e),
                None => {
                    self.exhausted = true;
                    break;
                }
            };

            match SessionEntry::from_dir_entry(&entry) {
                Ok(session_entry) => batch.push(session_entry),
                // Removed between readdir and stat, usually by PHP's own GC
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    tracing::trace!(path = %entry.path().display(), "Entry vanished during scan");
                }
                Err(e) => return self.fail(e),
            }
        }

        if batch.is_empty() {
            None
        } else {
            tracing::trace!(entries = batch.len(), "Read directory batch");
            Some(Ok(batch))
        }
    }
}

impl FusedIterator for Batches {}
