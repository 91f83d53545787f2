//! expire-files: removes stale PHP session files from a file-based session store.
//!
//! The expiry threshold is read from `session.gc_maxlifetime` in php.ini, a
//! fixed grace period is added, and every plain file in the session directory
//! older than that is deleted.

pub mod cli;
pub mod config;
pub mod expire;
pub mod utils;

use config::{read_session_expiry, Settings};
use expire::{Expirer, ExpiryReport};
use utils::Result;

/// Runs one complete expiry pass: read the expiry, scan, delete, report.
///
/// # Errors
/// Any fatal condition (unreadable config, unlistable directory, unusable
/// cutoff) is returned to the caller; per-file failures are not errors.
pub fn run(settings: &Settings) -> Result<ExpiryReport> {
    tracing::debug!(
        config_path = %settings.config_path.display(),
        session_dir = %settings.session_dir.display(),
        dry_run = settings.dry_run,
        batch_size = settings.batch_size,
        "Starting expiry run"
    );

    let expiry_secs = read_session_expiry(&settings.config_path)?;
    let report = Expirer::new(settings, expiry_secs)?.run()?;
    report.log_summary();

    Ok(report)
}
