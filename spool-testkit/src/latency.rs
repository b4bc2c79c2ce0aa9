use spool::LatencySampler;
use std::time::Duration;

/// Sampler that never sleeps. Makes coordination tests run at full speed.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZeroLatency;

impl LatencySampler for ZeroLatency {
    fn sample(&self, _max_units: u32) -> Duration {
        Duration::ZERO
    }
}

/// Sampler that returns the same delay on every draw, ignoring the bound.
///
/// Useful when a test needs a guaranteed minimum amount of wall time per
/// page, e.g. to observe a batch mid-flight.
#[derive(Clone, Copy, Debug)]
pub struct FixedLatency {
    delay: Duration,
}

impl FixedLatency {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl LatencySampler for FixedLatency {
    fn sample(&self, _max_units: u32) -> Duration {
        self.delay
    }
}
