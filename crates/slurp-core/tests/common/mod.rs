pub mod stream_server;

use slurp_core::retry::Sleep;
use std::time::Duration;

/// Records backoff waits instead of sleeping.
#[derive(Debug, Default)]
pub struct RecordingSleep(pub Vec<Duration>);

impl Sleep for RecordingSleep {
    fn sleep(&mut self, duration: Duration) {
        self.0.push(duration);
    }
}
