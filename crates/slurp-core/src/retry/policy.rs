use super::FailureCategory;
use crate::config::BackoffConfig;
use std::time::Duration;

/// Escalation counters, one per retryable category.
///
/// Counters only grow and are never reset by a successful attempt; they live
/// as long as the supervisor that owns them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackoffState {
    http_secs: u64,
    rate_limit_secs: u64,
    transport_ms: u64,
    config: BackoffConfig,
}

impl Default for BackoffState {
    fn default() -> Self {
        Self::new(BackoffConfig::default())
    }
}

impl BackoffState {
    pub fn new(config: BackoffConfig) -> Self {
        Self {
            http_secs: config.http_initial_secs,
            rate_limit_secs: config.rate_limit_initial_secs,
            transport_ms: config.transport_step_ms,
            config,
        }
    }

    /// Delay the next failure of `category` would wait, without advancing anything.
    ///
    /// `GracefulClose` shares the transport counter. Categories that never
    /// retry get zero.
    pub fn peek(&self, category: FailureCategory) -> Duration {
        match category {
            FailureCategory::HttpRetryable => Duration::from_secs(self.http_secs),
            FailureCategory::RateLimited => Duration::from_secs(self.rate_limit_secs),
            FailureCategory::TransportError | FailureCategory::GracefulClose => {
                Duration::from_millis(self.transport_ms)
            }
            FailureCategory::HttpTerminal | FailureCategory::SinkFailure => Duration::ZERO,
        }
    }

    /// Return the delay for this failure and escalate the category's counter.
    pub fn next_delay(&mut self, category: FailureCategory) -> Duration {
        let delay = self.peek(category);
        match category {
            FailureCategory::HttpRetryable => {
                // Doubles until the cap, then stays there.
                self.http_secs = self.http_secs.saturating_mul(2).min(self.config.http_max_secs);
            }
            FailureCategory::RateLimited => {
                // No ceiling; saturates instead of overflowing.
                self.rate_limit_secs = self.rate_limit_secs.saturating_mul(2);
            }
            FailureCategory::TransportError | FailureCategory::GracefulClose => {
                self.transport_ms = self
                    .transport_ms
                    .saturating_add(self.config.transport_step_ms)
                    .min(self.config.transport_max_ms);
            }
            FailureCategory::HttpTerminal | FailureCategory::SinkFailure => {}
        }
        delay
    }
}

/// Blocking suspension used between attempts.
pub trait Sleep {
    fn sleep(&mut self, duration: Duration);
}

/// Plain thread sleep; once entered it always runs to completion.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleep;

impl Sleep for ThreadSleep {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Backoff policy: escalation state plus the sleeper that performs the wait.
#[derive(Debug)]
pub struct Backoff<S: Sleep = ThreadSleep> {
    state: BackoffState,
    sleeper: S,
}

impl Backoff<ThreadSleep> {
    pub fn new(config: BackoffConfig) -> Self {
        Self::with_sleeper(config, ThreadSleep)
    }
}

impl<S: Sleep> Backoff<S> {
    pub fn with_sleeper(config: BackoffConfig, sleeper: S) -> Self {
        Self {
            state: BackoffState::new(config),
            sleeper,
        }
    }

    /// Block for the category's current delay, then escalate it. Returns the delay waited.
    pub fn wait_for(&mut self, category: FailureCategory) -> Duration {
        let delay = self.state.next_delay(category);
        tracing::debug!(
            category = ?category,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            "waiting before reconnect"
        );
        if !delay.is_zero() {
            self.sleeper.sleep(delay);
        }
        delay
    }

    pub fn state(&self) -> &BackoffState {
        &self.state
    }

    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }
}
