//! Connection supervisor: the attempt / classify / back off / re-sign loop.
//!
//! Attempts are strictly sequential, so the sink is only ever written by one
//! attempt at a time. Retryable failures are fully absorbed here; the loop only
//! ends on a terminal HTTP status, a signing failure, or a sink failure.

use crate::error::SigningError;
use crate::request::{RequestSigner, StreamRequest};
use crate::retry::{
    self, is_documented_terminal, Backoff, FailureCategory, Sleep, StreamError, ThreadSleep,
};
use crate::transport::StreamTransport;
use crate::watchdog::IdleWatchdog;
use std::fmt;
use std::io::Write;
use std::time::Duration;

/// Why the supervisor stopped.
#[derive(Debug)]
pub enum Termination {
    /// Documented non-retryable status (401, 403, 404, 406, 413, 416).
    HttpTerminal { status: u32 },
    /// Any status with no defined handling.
    UnexpectedHttp { status: u32 },
    SigningFailed(SigningError),
    SinkFailed(std::io::Error),
}

impl Termination {
    /// Process exit status: terminal HTTP outcomes are a normal shutdown.
    pub fn exit_code(&self) -> i32 {
        match self {
            Termination::HttpTerminal { .. } | Termination::UnexpectedHttp { .. } => 0,
            Termination::SigningFailed(_) | Termination::SinkFailed(_) => 1,
        }
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::HttpTerminal { status } => {
                write!(f, "request failed with HTTP error {}", status)
            }
            Termination::UnexpectedHttp { status } => {
                write!(f, "unexpected HTTP error {}", status)
            }
            Termination::SigningFailed(e) => write!(f, "cannot sign request: {}", e),
            Termination::SinkFailed(e) => write!(f, "cannot write output: {}", e),
        }
    }
}

pub struct Supervisor<T, G, S: Sleep = ThreadSleep> {
    transport: T,
    signer: G,
    backoff: Backoff<S>,
    idle_timeout: Duration,
    attempts: u64,
}

impl<T, G, S> Supervisor<T, G, S>
where
    T: StreamTransport,
    G: RequestSigner,
    S: Sleep,
{
    pub fn new(transport: T, signer: G, backoff: Backoff<S>, idle_timeout: Duration) -> Self {
        Self {
            transport,
            signer,
            backoff,
            idle_timeout,
            attempts: 0,
        }
    }

    /// Connection attempts made so far.
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    pub fn backoff(&self) -> &Backoff<S> {
        &self.backoff
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn signer(&self) -> &G {
        &self.signer
    }

    /// Stream until a terminal condition. The sink is flushed before returning.
    pub fn run(&mut self, request: &StreamRequest, sink: &mut dyn Write) -> Termination {
        let termination = self.run_until_terminal(request, sink);
        match &termination {
            Termination::SinkFailed(_) | Termination::SigningFailed(_) => {
                tracing::error!("{}, aborting", termination)
            }
            _ => tracing::error!("{}, not reconnecting", termination),
        }
        if let Err(e) = sink.flush() {
            tracing::warn!("final flush of output failed: {}", e);
        }
        tracing::info!("cleaning up after {} attempt(s)", self.attempts);
        termination
    }

    fn run_until_terminal(&mut self, request: &StreamRequest, sink: &mut dyn Write) -> Termination {
        let mut watchdog = IdleWatchdog::new(self.idle_timeout);
        loop {
            // Signatures are time-bound; sign again for every attempt.
            let signed = match request.sign(&self.signer) {
                Ok(signed) => signed,
                Err(e) => return Termination::SigningFailed(e),
            };
            watchdog.reset();
            self.attempts += 1;
            tracing::info!(
                attempt = self.attempts,
                method = %signed.method,
                endpoint = request.endpoint(),
                "connecting"
            );

            let outcome = self.transport.perform(&signed, sink, &mut watchdog);
            let category = retry::classify(&outcome);

            match outcome {
                Err(StreamError::Http(status)) if category == FailureCategory::HttpTerminal => {
                    return if is_documented_terminal(status) {
                        Termination::HttpTerminal { status }
                    } else {
                        Termination::UnexpectedHttp { status }
                    };
                }
                Err(StreamError::Sink(e)) => return Termination::SinkFailed(e),
                Ok(stats) => tracing::info!(
                    bytes = stats.bytes,
                    status = stats.status,
                    "stream closed by remote, reconnecting"
                ),
                Err(StreamError::Http(status)) => {
                    tracing::warn!("received HTTP error {}, reconnecting", status)
                }
                Err(StreamError::IdleTimeout { idle }) => tracing::warn!(
                    "no data for {}s, dropping stalled connection",
                    idle.as_secs()
                ),
                Err(e) => tracing::warn!("transport error: {}, reconnecting", e),
            }

            self.backoff.wait_for(category);
            if category.needs_fresh_handle() {
                self.transport.recreate();
            }
        }
    }
}
