//! Probe executor contract: the boundary to the measurement tool.
//!
//! The controller never generates traffic itself. It hands a
//! [`ProbeRequest`] to an injected [`ProbeExecutor`] and receives a
//! [`ProbeReport`]. Executors must not retry: every retry decision belongs
//! to the ramp controller.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::bandwidth::Bandwidth;

/// Traffic direction relative to the client running the probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Client sends to server.
    Uplink,
    /// Server sends to client (iperf3 `-R`).
    Downlink,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Uplink => "uplink",
            Direction::Downlink => "downlink",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything about a probe except its target bandwidth.
///
/// Fixed for the whole session; the controller stamps a target onto it
/// with [`ProbeSettings::request`] for every probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSettings {
    /// Server host name or address.
    pub server: String,
    /// Server port.
    pub port: u16,
    pub direction: Direction,
    /// Traffic duration of a single probe.
    pub duration: Duration,
    /// Number of parallel streams.
    pub parallel: u16,
    /// Hard bound on one probe, tool startup included.
    pub timeout: Duration,
}

impl ProbeSettings {
    /// Build the request for one probe at `bandwidth`.
    pub fn request(&self, bandwidth: Bandwidth) -> ProbeRequest {
        ProbeRequest {
            server: self.server.clone(),
            port: self.port,
            direction: self.direction,
            duration: self.duration,
            parallel: self.parallel,
            bandwidth,
            timeout: self.timeout,
        }
    }
}

/// A single bounded-duration measurement request. Immutable per call.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeRequest {
    pub server: String,
    pub port: u16,
    pub direction: Direction,
    pub duration: Duration,
    pub parallel: u16,
    /// Target offered load.
    pub bandwidth: Bandwidth,
    pub timeout: Duration,
}

/// Measured values reported by the probe tool.
///
/// Each field is `None` when the tool omitted it. Absent values are
/// unknown, not passing: threshold checks skip them explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub throughput_bps: Option<f64>,
    pub jitter_ms: Option<f64>,
    pub loss_percent: Option<f64>,
    pub packet_count: Option<u64>,
}

/// Why a probe produced no measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeFailureKind {
    /// The tool did not finish within the request timeout.
    Timeout,
    /// The tool could not be started or exited abnormally.
    ProcessError,
    /// The tool's output could not be interpreted.
    ParseError,
}

impl ProbeFailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ProbeFailureKind::Timeout => "timeout",
            ProbeFailureKind::ProcessError => "process_error",
            ProbeFailureKind::ParseError => "parse_error",
        }
    }
}

impl fmt::Display for ProbeFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one probe.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    Measured(Measurement),
    Failed {
        kind: ProbeFailureKind,
        /// Free-form diagnostics (stderr, parser message). Never inspected
        /// by the controller.
        detail: Option<String>,
    },
}

impl ProbeOutcome {
    pub fn failed(kind: ProbeFailureKind, detail: impl Into<String>) -> Self {
        ProbeOutcome::Failed {
            kind,
            detail: Some(detail.into()),
        }
    }
}

/// Outcome plus the command line that produced it, for the session log.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeReport {
    pub outcome: ProbeOutcome,
    pub command: Option<String>,
}

impl From<ProbeOutcome> for ProbeReport {
    fn from(outcome: ProbeOutcome) -> Self {
        ProbeReport {
            outcome,
            command: None,
        }
    }
}

/// Performs one blocking, bounded-duration measurement.
///
/// # Contract
///
/// - Returns within roughly `request.timeout`; an overrun is reported as
///   [`ProbeFailureKind::Timeout`].
/// - Never retries internally.
/// - Distinguishes timeout, process failure and unparseable output.
pub trait ProbeExecutor {
    fn probe(&mut self, request: &ProbeRequest) -> ProbeReport;
}

impl<E: ProbeExecutor + ?Sized> ProbeExecutor for &mut E {
    fn probe(&mut self, request: &ProbeRequest) -> ProbeReport {
        (**self).probe(request)
    }
}

impl<E: ProbeExecutor + ?Sized> ProbeExecutor for Box<E> {
    fn probe(&mut self, request: &ProbeRequest) -> ProbeReport {
        (**self).probe(request)
    }
}
