//! Run counters and the summary line

use std::fmt;
use std::path::{Path, PathBuf};

/// Counters for one expiry run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiryReport {
    /// Directory that was scanned
    pub session_dir: PathBuf,
    /// Entries seen, directories included
    pub scanned: usize,
    /// Files removed, or that would have been removed in dry-run
    pub expired: usize,
    /// Directory entries left untouched
    pub dirs_skipped: usize,
    /// Expired files whose removal failed (still counted in `expired`)
    pub failed_removals: usize,
    pub dry_run: bool,
}

impl ExpiryReport {
    pub fn new(session_dir: &Path, dry_run: bool) -> Self {
        Self {
            session_dir: session_dir.to_path_buf(),
            scanned: 0,
            expired: 0,
            dirs_skipped: 0,
            failed_removals: 0,
            dry_run,
        }
    }

    /// Emits the summary as the single info-level line of a normal run.
    pub fn log_summary(&self) {
        tracing::debug!(
            scanned = self.scanned,
            expired = self.expired,
            dirs_skipped = self.dirs_skipped,
            failed_removals = self.failed_removals,
            dry_run = self.dry_run,
            "Expiry run complete"
        );
        tracing::info!("{}", self);
    }
}

impl fmt::Display for ExpiryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Expired {} session files from {}",
            self.expired,
            self.session_dir.display()
        )
    }
}
