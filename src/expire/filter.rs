//! Expiry decision and best-effort removal of session files

use crate::expire::scanner::SessionEntry;
use crate::utils::{ExpireError, Result};
use chrono::{DateTime, Duration, Utc};
use std::fs;
use std::io;
use std::path::Path;

/// Largest window whose nanosecond count fits in an `i64`
pub const MAX_CUTOFF_SECS: i64 = i64::MAX / 1_000_000_000;

/// Age window after which a session file may be removed (expiry + grace)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cutoff {
    window: Duration,
}

impl Cutoff {
    /// Builds the cutoff window from the configured expiry and grace period.
    ///
    /// # Errors
    /// Returns `ExpireError::InvalidCutoff` when the sum is negative or
    /// exceeds `MAX_CUTOFF_SECS`.
    pub fn new(expiry_secs: i64, grace_secs: i64) -> Result<Self> {
        expiry_secs
            .checked_add(grace_secs)
            .filter(|total| (0..=MAX_CUTOFF_SECS).contains(total))
            .and_then(Duration::try_seconds)
            .map(|window| Self { window })
            .ok_or_else(|| ExpireError::invalid_cutoff(expiry_secs, grace_secs))
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Latest modification time that still counts as expired at `now`.
    ///
    /// `None` only when `now` itself sits within one window of the earliest
    /// representable time, in which case nothing is old enough.
    pub fn threshold(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        now.checked_sub_signed(self.window)
    }

    /// An entry is expired when it is not a directory and was last modified
    /// strictly before `now - window`. An entry exactly at the boundary is kept.
    pub fn is_expired(&self, now: DateTime<Utc>, entry: &SessionEntry) -> bool {
        if entry.is_dir {
            return false;
        }
        self.threshold(now)
            .is_some_and(|threshold| threshold > entry.modified)
    }
}

/// Outcome of acting on one expired entry
#[derive(Debug)]
pub enum Removal {
    Removed,
    /// Dry-run: the file was left in place
    Skipped,
    /// Removal failed; the run continues and the entry still counts as expired
    Failed(io::Error),
}

/// Removes an expired session file unless `dry_run` is set.
pub fn remove_expired(path: &Path, dry_run: bool) -> Removal {
    if dry_run {
        return Removal::Skipped;
    }
    match fs::remove_file(path) {
        Ok(()) => Removal::Removed,
        Err(e) => Removal::Failed(e),
    }
}
