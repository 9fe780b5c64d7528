//! Search constants and CLI defaults.
//!
//! The defaults mirror the values the capacity search has always been run
//! with, so downstream analysis compares like with like. Changing one of
//! these changes the meaning of previously recorded sessions.

/// Additive tolerance on the ramp bound (bits per second).
///
/// The ramp continues while `current <= max + RAMP_BOUND_EPSILON_BPS`, so
/// the configured maximum is always attempted even after float drift.
pub const RAMP_BOUND_EPSILON_BPS: f64 = 1.0;

/// Unit multipliers accepted by the bandwidth codec.
pub const KILO: f64 = 1e3;
pub const MEGA: f64 = 1e6;
pub const GIGA: f64 = 1e9;
pub const TERA: f64 = 1e12;

/// Default iperf3 server port.
pub const DEFAULT_PORT: u16 = 5201;

/// Default duration of a single probe (seconds).
pub const DEFAULT_DURATION_SECS: u64 = 15;

/// Default number of parallel probe streams.
pub const DEFAULT_PARALLEL: u16 = 4;

/// Default hard bound on a single probe, including tool startup (seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 45;

/// Default maximum tolerated packet loss (percent).
pub const DEFAULT_LOSS_THRESHOLD_PERCENT: f64 = 1.0;

/// Default maximum tolerated jitter (milliseconds).
pub const DEFAULT_JITTER_THRESHOLD_MS: f64 = 5.0;

/// Default maximum tolerated throughput drop versus the last accepted
/// ramp step (percent).
pub const DEFAULT_DROP_THRESHOLD_PERCENT: f64 = 5.0;

/// Tool name recorded in session metadata.
pub const PROBE_TOOL: &str = "iperf3";

/// Transport protocol recorded in session metadata.
pub const PROBE_PROTOCOL: &str = "udp";
