//! iperf3 probe executor for the bwramp capacity search.
//!
//! Runs `iperf3 -J -u` once per probe, bounds it with the request timeout
//! and maps the JSON report into a [`bwramp_core::probe::ProbeOutcome`].
//! No retries happen here; the ramp controller owns all retry policy.

/// Executor errors (construction only; probe failures are outcomes).
pub mod error;

/// iperf3 command line construction.
pub mod command;

/// iperf3 JSON report extraction.
pub mod report;

/// The blocking, timeout-bounded executor.
pub mod executor;

pub use error::IperfError;
pub use executor::Iperf3Executor;
