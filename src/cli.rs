use crate::config::{Settings, BATCH_SIZE, DEFAULT_CONFIG_PATH, DEFAULT_SESSION_DIR};
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// Long flags that cron entries spell with a single dash
const LEGACY_LONG_FLAGS: &[&str] = &["debug", "dryrun"];

#[derive(Parser, Debug)]
#[command(name = "expire-files")]
#[command(about = "Deletes expired PHP session files")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// php config that contains the session.gc_maxlifetime variable
    #[arg(short = 'c', long = "config", value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// php file sessions directory
    #[arg(short = 'd', long = "dir", value_name = "PATH", default_value = DEFAULT_SESSION_DIR)]
    pub dir: PathBuf,

    /// Turn on debugging
    #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    pub debug: Option<bool>,

    /// Turn on dry-run mode: count and log expired files without deleting them
    #[arg(
        long,
        visible_alias = "dry-run",
        num_args = 0..=1,
        default_missing_value = "true",
        require_equals = true
    )]
    pub dryrun: Option<bool>,
}

impl Cli {
    /// Parses the process arguments, accepting the legacy single-dash flags
    pub fn try_parse_legacy() -> Result<Self, clap::Error> {
        Self::try_parse_from(normalize_legacy_args(std::env::args_os()))
    }

    pub fn into_settings(self) -> Settings {
        Settings {
            config_path: self.config,
            session_dir: self.dir,
            debug: self.debug.unwrap_or(false),
            dry_run: self.dryrun.unwrap_or(false),
            batch_size: BATCH_SIZE,
        }
    }
}

/// Rewrites `-debug`, `-dryrun` and their `=bool` forms to `--debug` and
/// `--dryrun`. Anything after `--` passes through untouched.
pub fn normalize_legacy_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut passthrough = false;
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if passthrough {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "--" {
                passthrough = true;
                return arg;
            }
            let rewritten = text
                .strip_prefix('-')
                .filter(|rest| !rest.starts_with('-') && is_legacy_flag(rest))
                .map(|rest| format!("--{}", rest));
            rewritten.map_or(arg, OsString::from)
        })
        .collect()
}

fn is_legacy_flag(rest: &str) -> bool {
    let name = rest.split_once('=').map_or(rest, |(name, _)| name);
    LEGACY_LONG_FLAGS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Settings {
        Cli::try_parse_from(normalize_legacy_args(args.iter().copied()))
            .unwrap()
            .into_settings()
    }

    #[test]
    fn test_defaults() {
        let settings = parse(&["expire-files"]);
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_short_path_flags() {
        let settings = parse(&["expire-files", "-c", "/tmp/php.ini", "-d", "/tmp/sessions/"]);
        assert_eq!(settings.config_path, PathBuf::from("/tmp/php.ini"));
        assert_eq!(settings.session_dir, PathBuf::from("/tmp/sessions/"));
    }

    #[test]
    fn test_legacy_single_dash_flags() {
        let settings = parse(&["expire-files", "-debug", "-dryrun"]);
        assert!(settings.debug);
        assert!(settings.dry_run);
    }

    #[test]
    fn test_double_dash_flags() {
        let settings = parse(&["expire-files", "--debug", "--dry-run"]);
        assert!(settings.debug);
        assert!(settings.dry_run);
    }

    #[test]
    fn test_legacy_boolean_values() {
        let settings = parse(&["expire-files", "-debug=false", "-dryrun=true"]);
        assert!(!settings.debug);
        assert!(settings.dry_run);
    }

    #[test]
    fn test_debug_does_not_swallow_next_argument() {
        let settings = parse(&["expire-files", "-debug", "-d", "/srv/sessions/"]);
        assert!(settings.debug);
        assert_eq!(settings.session_dir, PathBuf::from("/srv/sessions/"));
    }

    #[test]
    fn test_normalize_leaves_values_alone() {
        let args = normalize_legacy_args(["expire-files", "-d", "-debug", "--", "-dryrun"]);
        let args: Vec<&str> = args.iter().map(|a| a.to_str().unwrap()).collect();
        assert_eq!(args, vec!["expire-files", "-d", "--debug", "--", "-dryrun"]);
    }

    #[test]
    fn test_normalize_ignores_unknown_flags() {
        let args = normalize_legacy_args(["expire-files", "-verbose", "-c"]);
        let args: Vec<&str> = args.iter().map(|a| a.to_str().unwrap()).collect();
        assert_eq!(args, vec!["expire-files", "-verbose", "-c"]);
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        let result = Cli::try_parse_from(normalize_legacy_args(["expire-files", "--bogus"]));
        assert!(result.is_err());
    }
}
