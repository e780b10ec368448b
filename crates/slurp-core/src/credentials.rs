//! OAuth credentials loaded from a four-line key file.
//!
//! Line order: consumer key, consumer secret, access token, access token secret.

use crate::error::ConfigError;
use std::fmt;
use std::fs;
use std::path::Path;

/// Longest token kept from a key file line; anything beyond is cut off.
pub const MAX_TOKEN_LEN: usize = 63;

/// The four tokens needed to sign a request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

// Secrets stay out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .field("access_token", &self.access_token)
            .field("access_token_secret", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Read the key file at `path`. A missing file, fewer than four lines, or an empty
    /// token is a `ConfigError`; nothing is sent over the network with partial credentials.
    pub fn read_key_file(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path).map_err(|source| ConfigError::KeyFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&data).ok_or_else(|| ConfigError::ShortKeyFile {
            path: path.to_path_buf(),
            found: data
                .lines()
                .take(4)
                .take_while(|l| !strip_line(l).is_empty())
                .count(),
        })
    }

    /// Parse key file contents. Returns None unless the first four lines are all non-empty.
    pub fn parse(data: &str) -> Option<Self> {
        let mut tokens = data.lines().map(truncate_token);
        let mut next = || tokens.next().filter(|t| !t.is_empty());
        Some(Self {
            consumer_key: next()?,
            consumer_secret: next()?,
            access_token: next()?,
            access_token_secret: next()?,
        })
    }
}

/// Only line terminators are stripped; other whitespace is part of the token.
fn strip_line(line: &str) -> &str {
    line.trim_end_matches('\r')
}

fn truncate_token(line: &str) -> String {
    let line = strip_line(line);
    match line.char_indices().nth(MAX_TOKEN_LEN) {
        Some((cut, _)) => {
            tracing::warn!(
                "key file line longer than {} characters, truncating",
                MAX_TOKEN_LEN
            );
            line[..cut].to_string()
        }
        None => line.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn key_file(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn four_lines_round_trip_exactly() {
        let f = key_file("ckey-123\ncsecret-456\natok-789\natoksecret-abc\n");
        let creds = Credentials::read_key_file(f.path()).unwrap();
        assert_eq!(creds.consumer_key, "ckey-123");
        assert_eq!(creds.consumer_secret, "csecret-456");
        assert_eq!(creds.access_token, "atok-789");
        assert_eq!(creds.access_token_secret, "atoksecret-abc");
    }

    #[test]
    fn crlf_line_endings_are_stripped() {
        let creds = Credentials::parse("a\r\nb\r\nc\r\nd\r\n").unwrap();
        assert_eq!(creds.consumer_key, "a");
        assert_eq!(creds.access_token_secret, "d");
    }

    #[test]
    fn last_line_without_newline_is_accepted() {
        let creds = Credentials::parse("a\nb\nc\nd").unwrap();
        assert_eq!(creds.access_token_secret, "d");
    }

    #[test]
    fn short_file_is_config_error() {
        let f = key_file("ckey\ncsecret\n");
        match Credentials::read_key_file(f.path()) {
            Err(ConfigError::ShortKeyFile { found, .. }) => assert_eq!(found, 2),
            other => panic!("expected ShortKeyFile, got {:?}", other),
        }
    }

    #[test]
    fn whitespace_token_counts_as_present() {
        let f = key_file("ckey\n   \n");
        match Credentials::read_key_file(f.path()) {
            Err(ConfigError::ShortKeyFile { found, .. }) => assert_eq!(found, 2),
            other => panic!("expected ShortKeyFile, got {:?}", other),
        }
        let creds = Credentials::parse("a\n \nc\nd\n").unwrap();
        assert_eq!(creds.consumer_secret, " ");
    }

    #[test]
    fn empty_token_is_rejected() {
        assert!(Credentials::parse("a\n\nc\nd\n").is_none());
    }

    #[test]
    fn missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Credentials::read_key_file(&dir.path().join("keys")).unwrap_err();
        assert!(matches!(err, ConfigError::KeyFile { .. }));
    }

    #[test]
    fn long_line_is_truncated() {
        let long = "x".repeat(100);
        let creds = Credentials::parse(&format!("{}\nb\nc\nd\n", long)).unwrap();
        assert_eq!(creds.consumer_key.len(), MAX_TOKEN_LEN);
    }

    #[test]
    fn debug_redacts_secrets() {
        let creds = Credentials::parse("ck\nsupersecret\ntok\nalsosecret\n").unwrap();
        let dbg = format!("{:?}", creds);
        assert!(dbg.contains("ck"));
        assert!(!dbg.contains("supersecret"));
        assert!(!dbg.contains("alsosecret"));
    }
}
