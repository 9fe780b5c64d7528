//! Ramp session state and stop reasons.
//!
//! A [`RampSession`] is created by the controller, driven to completion in
//! one pass and then only read. All mutation goes through `pub(crate)`
//! methods so callers outside the controller cannot resume a finished
//! session or rewrite its history.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::bandwidth::Bandwidth;
use crate::config::RampConfig;
use crate::policy::Violation;
use crate::probe::ProbeFailureKind;
use crate::recorder::{StepLog, StepRecord};

/// How a threshold violation was resolved by the fallback protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// The re-probe at the last accepted target passed.
    Confirmed,
    /// The probe one step below the last accepted target passed.
    SteppedDown,
}

impl Recovery {
    pub fn suffix(self) -> &'static str {
        match self {
            Recovery::Confirmed => "_fallback_confirmed",
            Recovery::SteppedDown => "_fallback_stepdown",
        }
    }
}

/// Terminal classification of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every ramp step up to the maximum passed.
    MaxReached,
    /// A ramp step crossed a threshold.
    Threshold {
        violation: Violation,
        recovery: Option<Recovery>,
    },
    /// A probe produced no measurement. Always fatal.
    ProbeFailed(ProbeFailureKind),
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::MaxReached => f.write_str("max_reached"),
            StopReason::Threshold {
                violation,
                recovery,
            } => {
                f.write_str(violation.as_str())?;
                if let Some(recovery) = recovery {
                    f.write_str(recovery.suffix())?;
                }
                Ok(())
            }
            StopReason::ProbeFailed(kind) => f.write_str(kind.as_str()),
        }
    }
}

impl Serialize for StopReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Mutable controller state for one capacity search.
#[derive(Debug, Clone)]
pub struct RampSession {
    config: RampConfig,
    current: f64,
    baseline_throughput: Option<f64>,
    fallback_attempted: bool,
    log: StepLog,
    stop_reason: Option<StopReason>,
}

impl RampSession {
    pub(crate) fn new(config: RampConfig) -> Self {
        let current = config.start().bps();
        Self {
            config,
            current,
            baseline_throughput: None,
            fallback_attempted: false,
            log: StepLog::new(),
            stop_reason: None,
        }
    }

    pub fn config(&self) -> &RampConfig {
        &self.config
    }

    /// Next ramp target, in bits per second.
    pub fn current_target(&self) -> f64 {
        self.current
    }

    /// Throughput of the last accepted ramp step that reported one.
    pub fn baseline_throughput(&self) -> Option<f64> {
        self.baseline_throughput
    }

    pub fn fallback_attempted(&self) -> bool {
        self.fallback_attempted
    }

    /// Every probe issued, in order.
    pub fn steps(&self) -> &[StepRecord] {
        self.log.steps()
    }

    /// The adopted step: the last accepted one, or the confirm/fallback
    /// step that replaced it.
    pub fn selected(&self) -> Option<&StepRecord> {
        self.log.selected()
    }

    /// Target of the adopted step.
    pub fn last_accepted_target(&self) -> Option<Bandwidth> {
        self.selected().map(|r| r.target)
    }

    /// `None` until the controller has finished.
    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop_reason
    }

    pub fn is_finished(&self) -> bool {
        self.stop_reason.is_some()
    }

    pub(crate) fn record(&mut self, record: StepRecord) -> usize {
        debug_assert!(!self.is_finished(), "probe recorded after stop");
        self.log.push(record)
    }

    pub(crate) fn adopt(&mut self, index: usize) {
        self.log.adopt(index);
    }

    /// Advance the ramp after an accepted normal step.
    pub(crate) fn advance(&mut self, throughput: Option<f64>) {
        if let Some(throughput) = throughput {
            self.baseline_throughput = Some(throughput);
        }
        self.current += self.config.step().bps();
    }

    /// Claim the one-shot fallback. Returns `false` if already used.
    pub(crate) fn begin_fallback(&mut self) -> bool {
        !std::mem::replace(&mut self.fallback_attempted, true)
    }

    pub(crate) fn finish(&mut self, reason: StopReason) {
        debug_assert!(self.stop_reason.is_none(), "stop reason set twice");
        self.stop_reason = Some(reason);
    }
}
