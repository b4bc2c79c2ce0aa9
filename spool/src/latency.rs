use rand::Rng;
use std::time::Duration;

/// Source of simulated latencies for spooling and draining.
///
/// Each call is an independent draw; implementations must be cheap enough
/// to sample once per page. Tests inject deterministic samplers from the
/// testkit in place of [`RandomLatency`].
pub trait LatencySampler: Send + Sync {
    /// Sample a delay of 0..=`max_units` time units, inclusive.
    fn sample(&self, max_units: u32) -> Duration;
}

/// Uniformly random latency over whole time units.
#[derive(Clone, Copy, Debug)]
pub struct RandomLatency {
    unit: Duration,
}

impl RandomLatency {
    /// Sampler whose unit of simulated time is `unit` of wall time.
    pub fn new(unit: Duration) -> Self {
        Self { unit }
    }

    pub fn unit(&self) -> Duration {
        self.unit
    }
}

impl Default for RandomLatency {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl LatencySampler for RandomLatency {
    fn sample(&self, max_units: u32) -> Duration {
        let mut rng = rand::thread_rng();
        let units = rng.gen_range(0..=max_units);
        self.unit * units
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_stays_within_bounds() {
        let sampler = RandomLatency::new(Duration::from_millis(10));
        for _ in 0..100 {
            let delay = sampler.sample(4);
            assert!(delay <= Duration::from_millis(40));
            assert_eq!(delay.subsec_millis() % 10, 0);
        }
    }

    #[test]
    fn test_zero_bound_is_always_zero() {
        let sampler = RandomLatency::new(Duration::from_millis(10));
        for _ in 0..10 {
            assert_eq!(sampler.sample(0), Duration::ZERO);
        }
    }
}
