use std::path::PathBuf;

/// Default php.ini holding `session.gc_maxlifetime`
pub const DEFAULT_CONFIG_PATH: &str = "/etc/php5/apache2/php.ini";

/// Default PHP file-session directory
pub const DEFAULT_SESSION_DIR: &str = "/var/php/";

/// Expiry used when a matched `session.gc_maxlifetime` value does not parse (8 hours)
pub const DEFAULT_EXPIRY_SECS: i64 = 8 * 60 * 60;

/// Extra time a session file is kept beyond its expiry
pub const GRACE_SECS: i64 = 60 * 60;

/// Directory entries read per listing step
pub const BATCH_SIZE: usize = 1000;

/// Immutable settings for one run, built once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub config_path: PathBuf,
    pub session_dir: PathBuf,
    pub debug: bool,
    pub dry_run: bool,
    /// Zero reads the whole directory as a single batch
    pub batch_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            session_dir: PathBuf::from(DEFAULT_SESSION_DIR),
            debug: false,
            dry_run: false,
            batch_size: BATCH_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert_eq!(settings.config_path, PathBuf::from("/etc/php5/apache2/php.ini"));
        assert_eq!(settings.session_dir, PathBuf::from("/var/php/"));
        assert!(!settings.debug);
        assert!(!settings.dry_run);
        assert_eq!(settings.batch_size, 1000);
    }

    #[test]
    fn test_constants() {
        assert_eq!(DEFAULT_EXPIRY_SECS, 28800);
        assert_eq!(GRACE_SECS, 3600);
    }
}
