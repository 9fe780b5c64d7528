//! Error types for bwramp-iperf.
//!
//! Only building the executor can fail. Once built, every problem with a
//! probe (spawn failure, non-zero exit, timeout, bad JSON) is reported as
//! a `ProbeOutcome::Failed` so the controller can record it.

/// Unified error type for bwramp-iperf.
#[derive(Debug, thiserror::Error)]
pub enum IperfError {
    /// The private async runtime used to supervise iperf3 could not start.
    #[error("Runtime error: {0}")]
    Runtime(#[from] std::io::Error),
}
