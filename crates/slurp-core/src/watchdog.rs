//! Idle-data watchdog for connected but silent transfers.
//!
//! The transport calls `on_progress_tick` at whatever cadence it likes with the
//! payload bytes received since the previous tick. Keep-alive-only ticks carry
//! zero bytes, so a socket can look healthy while the stream is dead; once the
//! zero-byte run that followed real data exceeds the timeout, the watchdog asks
//! for an abort.

use std::time::{Duration, Instant};

/// Default idle threshold.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickVerdict {
    Continue,
    /// Abort the transfer; `idle` is how long no payload has arrived.
    Abort { idle: Duration },
}

#[derive(Debug, Clone)]
pub struct IdleWatchdog {
    timeout: Duration,
    had_data_last_tick: bool,
    idle_since: Option<Instant>,
}

impl Default for IdleWatchdog {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_TIMEOUT)
    }
}

impl IdleWatchdog {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            had_data_last_tick: false,
            idle_since: None,
        }
    }

    /// Forget everything; called at the start of each attempt and after an abort.
    pub fn reset(&mut self) {
        self.had_data_last_tick = false;
        self.idle_since = None;
    }

    pub fn on_progress_tick(&mut self, bytes: u64, now: Instant) -> TickVerdict {
        if bytes > 0 {
            if !self.had_data_last_tick {
                self.idle_since = None;
            }
            self.had_data_last_tick = true;
            return TickVerdict::Continue;
        }

        if self.had_data_last_tick {
            self.idle_since = Some(now);
        } else if let Some(since) = self.idle_since {
            let idle = now.saturating_duration_since(since);
            if idle > self.timeout {
                self.reset();
                return TickVerdict::Abort { idle };
            }
        }
        self.had_data_last_tick = false;
        TickVerdict::Continue
    }
}
