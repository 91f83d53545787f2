//! Centralized error types for expire-files
//!
//! Library code returns `ExpireError` built with `thiserror`. The binary wraps
//! it with `anyhow` context and is the only place that terminates the process.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors that abort an expiry run
#[derive(Error, Debug)]
pub enum ExpireError {
    /// Config file could not be opened
    #[error("failed to open config file {path}: {source}")]
    ConfigOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file opened but a read failed mid-scan
    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Session directory could not be opened
    #[error("failed to open session directory {path}: {source}")]
    DirOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Listing the session directory failed for a reason other than exhaustion
    #[error("failed to list session directory {path}: {source}")]
    DirList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// expiry + grace does not describe a usable cutoff
    #[error("invalid cutoff duration: expiry {expiry_secs}s + grace {grace_secs}s")]
    InvalidCutoff { expiry_secs: i64, grace_secs: i64 },
}

impl ExpireError {
    pub fn config_open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ConfigOpen {
            path: path.into(),
            source,
        }
    }

    pub fn config_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ConfigRead {
            path: path.into(),
            source,
        }
    }

    pub fn dir_open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirOpen {
            path: path.into(),
            source,
        }
    }

    pub fn dir_list(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirList {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_cutoff(expiry_secs: i64, grace_secs: i64) -> Self {
        Self::InvalidCutoff {
            expiry_secs,
            grace_secs,
        }
    }

    /// Returns a hint for the operator reading the cron log
    pub fn suggestion(&self) -> Option<String> {
        match self {
            ExpireError::ConfigOpen { .. } => {
                Some("Pass the php.ini holding session.gc_maxlifetime with -c.".to_string())
            }
            ExpireError::DirOpen { .. } => {
                Some("Pass the session.save_path directory with -d.".to_string())
            }
            ExpireError::InvalidCutoff { .. } => {
                Some("Check the session.gc_maxlifetime value in the config file.".to_string())
            }
            _ => None,
        }
    }
}

/// Result type alias using ExpireError
pub type Result<T> = std::result::Result<T, ExpireError>;
