//! Threshold policy types.
//!
//! All three bounds are inclusive: a value equal to its threshold passes,
//! only a value strictly greater (or, for throughput, strictly below the
//! tolerated floor) rejects.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DROP_THRESHOLD_PERCENT, DEFAULT_JITTER_THRESHOLD_MS, DEFAULT_LOSS_THRESHOLD_PERCENT,
};
use crate::errors::RampError;

/// Quality bounds a measurement must satisfy to be accepted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdPolicy {
    /// Maximum tolerated packet loss (percent).
    pub loss_percent: f64,
    /// Maximum tolerated jitter (milliseconds).
    pub jitter_ms: f64,
    /// Maximum tolerated throughput drop versus the last accepted ramp
    /// step (percent).
    pub drop_percent: f64,
}

impl ThresholdPolicy {
    /// Reject NaN, infinite or negative bounds.
    pub fn validate(&self) -> Result<(), RampError> {
        for (name, value) in [
            ("loss threshold", self.loss_percent),
            ("jitter threshold", self.jitter_ms),
            ("drop threshold", self.drop_percent),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(RampError::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Lowest throughput still accepted against `baseline`.
    pub fn throughput_floor(&self, baseline: f64) -> f64 {
        baseline * (1.0 - self.drop_percent / 100.0)
    }
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self {
            loss_percent: DEFAULT_LOSS_THRESHOLD_PERCENT,
            jitter_ms: DEFAULT_JITTER_THRESHOLD_MS,
            drop_percent: DEFAULT_DROP_THRESHOLD_PERCENT,
        }
    }
}

/// Which bound a rejected measurement crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Violation {
    Loss,
    Jitter,
    ThroughputDrop,
}

impl Violation {
    /// Stop-reason prefix for this violation.
    pub fn as_str(self) -> &'static str {
        match self {
            Violation::Loss => "loss_threshold",
            Violation::Jitter => "jitter_threshold",
            Violation::ThroughputDrop => "throughput_drop",
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of evaluating one measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    /// Rejected by the first failing check, in evaluation order.
    Reject(Violation),
}

impl Verdict {
    pub fn is_accepted(self) -> bool {
        matches!(self, Verdict::Accept)
    }
}
