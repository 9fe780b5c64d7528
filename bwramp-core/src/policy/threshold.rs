//! Threshold evaluation: deterministic accept/reject of one measurement.
//!
//! No IO, no clocks, no global state.

use super::types::{ThresholdPolicy, Verdict, Violation};
use crate::probe::Measurement;

/// Judge `measurement` against `policy`.
///
/// Checks run in a fixed order and the first failure is reported:
///
/// 1. loss present and `> policy.loss_percent` → [`Violation::Loss`]
/// 2. jitter present and `> policy.jitter_ms` → [`Violation::Jitter`]
/// 3. `baseline` present, throughput present and below
///    `baseline * (1 - drop/100)` → [`Violation::ThroughputDrop`]
///
/// Absent fields are skipped, never treated as zero.
pub fn evaluate(
    policy: &ThresholdPolicy,
    measurement: &Measurement,
    baseline: Option<f64>,
) -> Verdict {
    if let Some(loss) = measurement.loss_percent {
        if loss > policy.loss_percent {
            return Verdict::Reject(Violation::Loss);
        }
    }

    if let Some(jitter) = measurement.jitter_ms {
        if jitter > policy.jitter_ms {
            return Verdict::Reject(Violation::Jitter);
        }
    }

    if let (Some(baseline), Some(throughput)) = (baseline, measurement.throughput_bps) {
        if throughput < policy.throughput_floor(baseline) {
            return Verdict::Reject(Violation::ThroughputDrop);
        }
    }

    Verdict::Accept
}
