//! Failure classification and reconnect backoff.
//!
//! Every attempt outcome maps to exactly one `FailureCategory`; the category
//! decides whether the supervisor stops, and which escalation counter the
//! backoff policy advances before the next attempt.

mod classify;
mod error;
mod policy;

pub use classify::{classify, classify_curl_error, classify_http_status, is_documented_terminal};
pub use error::{StreamError, TransferStats};
pub use policy::{Backoff, BackoffState, Sleep, ThreadSleep};

/// What an attempt outcome means for the reconnect loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureCategory {
    /// HTTP status with no recovery (bad credentials, bad request, gone), or any unrecognized status.
    HttpTerminal,
    /// Server overload (503).
    HttpRetryable,
    /// Explicit throttling (420).
    RateLimited,
    /// Connection/socket failure or idle-watchdog abort.
    TransportError,
    /// Remote ended the stream without an error.
    GracefulClose,
    /// The output sink refused bytes; reconnecting cannot fix that.
    SinkFailure,
}

impl FailureCategory {
    /// True if the transport handle must be discarded before the next attempt.
    pub fn needs_fresh_handle(self) -> bool {
        matches!(
            self,
            FailureCategory::TransportError | FailureCategory::GracefulClose
        )
    }
}
