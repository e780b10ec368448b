//! Attempt outcome error type for retry classification.

use std::fmt;
use std::time::Duration;

/// Result of an attempt that ended with the remote closing the stream cleanly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferStats {
    /// Payload bytes written to the sink during the attempt.
    pub bytes: u64,
    /// Final HTTP status of the response.
    pub status: u32,
}

/// Error returned by a single streaming attempt (curl failure, HTTP error, stall, or sink failure).
/// Used so we can classify and pick a backoff before converting to anyhow.
#[derive(Debug)]
pub enum StreamError {
    /// Curl reported an error (connect, TLS, reset, etc.).
    Curl(curl::Error),
    /// Response had a failing HTTP status.
    Http(u32),
    /// The idle watchdog aborted a connected but silent transfer.
    IdleTimeout { idle: Duration },
    /// Writing to the output sink failed (e.g. disk full, broken pipe). Not retried.
    Sink(std::io::Error),
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::Curl(e) => write!(f, "{}", e),
            StreamError::Http(code) => write!(f, "HTTP {}", code),
            StreamError::IdleTimeout { idle } => {
                write!(f, "no data received for {}s", idle.as_secs())
            }
            StreamError::Sink(e) => write!(f, "sink: {}", e),
        }
    }
}

impl std::error::Error for StreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StreamError::Curl(e) => Some(e),
            StreamError::Sink(e) => Some(e),
            StreamError::Http(_) | StreamError::IdleTimeout { .. } => None,
        }
    }
}
