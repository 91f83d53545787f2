//! Session file expiry
//!
//! Scans the session directory in batches and removes every file whose
//! modification time is older than the session expiry plus the grace period.
//! Removal is best effort: a file that cannot be deleted is logged and still
//! counted, and the scan carries on.

pub mod filter;
pub mod report;
pub mod scanner;

pub use filter::{remove_expired, Cutoff, Removal};
pub use report::ExpiryReport;
pub use scanner::{Batches, SessionEntry};

use crate::config::{Settings, GRACE_SECS};
use crate::utils::Result;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use tracing::debug;

/// Removes expired files from one session directory
pub struct Expirer {
    session_dir: PathBuf,
    cutoff: Cutoff,
    dry_run: bool,
    batch_size: usize,
}

impl Expirer {
    /// Creates an Expirer for `settings.session_dir` using the given expiry.
    ///
    /// # Errors
    /// Returns `ExpireError::InvalidCutoff` if expiry plus grace is not a
    /// usable duration.
    pub fn new(settings: &Settings, expiry_secs: i64) -> Result<Self> {
        let cutoff = Cutoff::new(expiry_secs, GRACE_SECS)?;
        debug!(
            expiry_secs = expiry_secs,
            grace_secs = GRACE_SECS,
            cutoff_secs = cutoff.window().num_seconds(),
            "Computed cutoff"
        );

        Ok(Self {
            session_dir: settings.session_dir.clone(),
            cutoff,
            dry_run: settings.dry_run,
            batch_size: settings.batch_size,
        })
    }

    /// Runs the expiry scan against the current wall-clock time
    pub fn run(&self) -> Result<ExpiryReport> {
        self.run_at(Utc::now())
    }

    /// Runs the expiry scan with `now` as the single reference time for
    /// every entry.
    ///
    /// # Errors
    /// Fails if the directory cannot be opened or listed. Files removed
    /// before a listing error stay removed.
    pub fn run_at(&self, now: DateTime<Utc>) -> Result<ExpiryReport> {
        let mut report = ExpiryReport::new(&self.session_dir, self.dry_run);

        for batch in Batches::open(&self.session_dir, self.batch_size)? {
            self.expire_batch(now, &batch?, &mut report);
        }

        Ok(report)
    }

    fn expire_batch(&self, now: DateTime<Utc>, batch: &[SessionEntry], report: &mut ExpiryReport) {
        for entry in batch {
            report.scanned += 1;

            if entry.is_dir {
                report.dirs_skipped += 1;
                continue;
            }
            if !self.cutoff.is_expired(now, entry) {
                continue;
            }

            let path = self.session_dir.join(&entry.name);
            match remove_expired(&path, self.dry_run) {
                Removal::Removed => debug!("Deleted: {}", path.display()),
                Removal::Skipped => debug!("Would delete: {}", path.display()),
                Removal::Failed(e) => {
                    report.failed_removals += 1;
                    debug!(error = %e, "Failed to delete: {}", path.display());
                }
            }
            report.expired += 1;
        }
    }
}
