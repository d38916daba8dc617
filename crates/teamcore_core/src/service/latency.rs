//! Simulated network latency for mock backend calls.

use std::time::Duration;

/// Pause applied before a mock call resolves.
pub trait Latency {
    fn simulate(&self, operation: &'static str);
}

/// Resolves immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLatency;

impl Latency for NoLatency {
    fn simulate(&self, _operation: &'static str) {}
}

/// Blocks the calling thread for a fixed duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedLatency {
    delay: Duration,
}

impl FixedLatency {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Latency for FixedLatency {
    fn simulate(&self, operation: &'static str) {
        log::debug!(
            "event=latency_simulated module=service operation={operation} delay_ms={}",
            self.delay.as_millis()
        );
        std::thread::sleep(self.delay);
    }
}
