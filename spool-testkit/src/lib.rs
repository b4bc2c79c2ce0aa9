//! Test support for spool: recording/failing sinks and deterministic
//! latency sources, for exercising the coordination protocol without
//! randomized timing.

pub mod latency;
pub mod sink;

pub use latency::{FixedLatency, ZeroLatency};
pub use sink::{FailingSink, RecordingSink};
