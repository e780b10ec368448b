//! Streaming transport boundary.
//!
//! The supervisor only drives a transport's lifecycle (perform, recreate) and
//! observes the outcome; connect, TLS and chunked decoding live behind it.

mod curl;

pub use self::curl::{CurlOptions, CurlTransport};

use crate::request::SignedRequest;
use crate::retry::{StreamError, TransferStats};
use crate::watchdog::IdleWatchdog;
use std::io::Write;

pub trait StreamTransport {
    /// Run one streaming attempt, writing payload bytes to `sink` and feeding
    /// progress ticks to `watchdog`. Blocks until the remote closes, an error
    /// occurs, or the watchdog asks for an abort.
    fn perform(
        &mut self,
        request: &SignedRequest,
        sink: &mut dyn Write,
        watchdog: &mut IdleWatchdog,
    ) -> Result<TransferStats, StreamError>;

    /// Discard the underlying handle and start over with a fresh one.
    fn recreate(&mut self);
}
