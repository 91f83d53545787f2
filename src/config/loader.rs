use crate::config::schema::DEFAULT_EXPIRY_SECS;
use crate::utils::{ExpireError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Literal prefix of the line carrying the session lifetime
pub const EXPIRY_KEY_PREFIX: &[u8] = b"session.gc_maxlifetime = ";

/// Reads `session.gc_maxlifetime` from a php.ini style file.
///
/// The file is streamed line by line and the last matching line wins. A
/// matched value that is not an integer resolves to `DEFAULT_EXPIRY_SECS`,
/// while a file with no matching line at all resolves to `0`.
///
/// # Errors
/// Returns `ExpireError::ConfigOpen` if the file cannot be opened and
/// `ExpireError::ConfigRead` if reading fails part way through.
pub fn read_session_expiry(path: &Path) -> Result<i64> {
    tracing::debug!(config_path = %path.display(), "Reading session expiry");

    let file = File::open(path).map_err(|e| ExpireError::config_open(path, e))?;
    let expiry = scan_session_expiry(BufReader::new(file), path)?;

    tracing::debug!(expiry_secs = expiry, "Resolved session expiry");
    Ok(expiry)
}

/// Scans already-opened config content; `path` is only used for error context.
pub fn scan_session_expiry<R: BufRead>(reader: R, path: &Path) -> Result<i64> {
    let mut expiry = 0;

    for line in reader.split(b'\n') {
        let mut line = line.map_err(|e| ExpireError::config_read(path, e))?;
        if line.last() == Some(&b'\r') {
            line.pop();
        }

        if let Some(value) = match_expiry_line(&line) {
            expiry = value;
        }
    }

    Ok(expiry)
}

/// Returns the expiry carried by a single line, if the line is a match.
fn match_expiry_line(line: &[u8]) -> Option<i64> {
    // Prefix plus at least one digit
    if line.len() < EXPIRY_KEY_PREFIX.len() + 1 {
        return None;
    }

    let rest = line.strip_prefix(EXPIRY_KEY_PREFIX)?;
    let parsed = std::str::from_utf8(rest)
        .ok()
        .and_then(|s| s.parse::<i64>().ok());

    match parsed {
        Some(value) => Some(value),
        None => {
            tracing::debug!(
                value = %String::from_utf8_lossy(rest),
                default_secs = DEFAULT_EXPIRY_SECS,
                "Unparseable session.gc_maxlifetime, using default"
            );
            Some(DEFAULT_EXPIRY_SECS)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn scan(content: &str) -> i64 {
        scan_session_expiry(Cursor::new(content.as_bytes()), Path::new("php.ini")).unwrap()
    }

    #[test]
    fn test_single_match() {
        assert_eq!(scan("session.gc_maxlifetime = 1440\n"), 1440);
    }

    #[test]
    fn test_last_match_wins() {
        let content = "session.gc_maxlifetime = 100\nsession.gc_maxlifetime = 200\n";
        assert_eq!(scan(content), 200);
    }

    #[test]
    fn test_malformed_value_uses_default() {
        assert_eq!(scan("session.gc_maxlifetime = abc\n"), 28800);
    }

    #[test]
    fn test_later_valid_match_overrides_malformed() {
        let content = "session.gc_maxlifetime = abc\nsession.gc_maxlifetime = 600\n";
        assert_eq!(scan(content), 600);
    }

    #[test]
    fn test_later_malformed_match_overrides_valid() {
        let content = "session.gc_maxlifetime = 600\nsession.gc_maxlifetime = 6oo\n";
        assert_eq!(scan(content), 28800);
    }

    #[test]
    fn test_no_match_is_zero() {
        let content = "[Session]\nsession.save_handler = files\nsession.save_path = /var/php\n";
        assert_eq!(scan(content), 0);
    }

    #[test]
    fn test_empty_file_is_zero() {
        assert_eq!(scan(""), 0);
    }

    #[test]
    fn test_prefix_is_exact() {
        // Spacing, case and comment markers must match exactly
        let content = "session.gc_maxlifetime=1440\n\
                       Session.gc_maxlifetime = 1440\n\
                       ;session.gc_maxlifetime = 1440\n\
                       session.gc_maxlifetime  = 1440\n";
        assert_eq!(scan(content), 0);
    }

    #[test]
    fn test_prefix_without_value_is_skipped() {
        assert_eq!(scan("session.gc_maxlifetime = \n"), 0);
    }

    #[test]
    fn test_single_digit_value() {
        assert_eq!(scan("session.gc_maxlifetime = 5\n"), 5);
    }

    #[test]
    fn test_trailing_whitespace_is_malformed() {
        assert_eq!(scan("session.gc_maxlifetime = 1440 \n"), 28800);
    }

    #[test]
    fn test_crlf_line_endings() {
        assert_eq!(scan("[Session]\r\nsession.gc_maxlifetime = 1440\r\n"), 1440);
    }

    #[test]
    fn test_last_line_without_newline() {
        assert_eq!(scan("a = b\nsession.gc_maxlifetime = 3600"), 3600);
    }

    #[test]
    fn test_non_utf8_lines_are_tolerated() {
        let mut content = b"; caf\xe9\n".to_vec();
        content.extend_from_slice(b"session.gc_maxlifetime = 720\n");
        let expiry = scan_session_expiry(Cursor::new(content), Path::new("php.ini")).unwrap();
        assert_eq!(expiry, 720);
    }

    #[test]
    fn test_read_session_expiry_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("php.ini");
        std::fs::write(&path, "[Session]\nsession.gc_maxlifetime = 1440\n").unwrap();

        assert_eq!(read_session_expiry(&path).unwrap(), 1440);
    }

    #[test]
    fn test_read_session_expiry_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.ini");

        let err = read_session_expiry(&path).unwrap_err();
        assert!(matches!(err, ExpireError::ConfigOpen { .. }));
    }
}
