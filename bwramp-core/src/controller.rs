//! Ramp controller: the capacity search state machine.
//!
//! ```text
//!            accept: target += step
//!           ┌──────┐
//!           ▼      │
//!        Ramping ──┘── target > max + ε ─────────────────▶ Done(max_reached)
//!           │
//!           │ reject (needs a prior accepted step,
//!           │         fallback not yet used)
//!           ▼
//!       Confirming ── accept ────────────────────────────▶ Done(<v>_fallback_confirmed)
//!           │
//!           │ reject
//!           ▼
//!      SteppingDown ─ accept ────────────────────────────▶ Done(<v>_fallback_stepdown)
//!           │
//!           └─ reject / nothing below last accepted ─────▶ Done(<v>)
//!
//!   any state ── probe failed ───────────────────────────▶ Done(<failure kind>)
//! ```
//!
//! Probes are issued one at a time; each call blocks until the executor
//! returns. The stop reason is written exactly once, when the loop leaves
//! `Done`.

use tracing::{debug, info, warn};

use crate::bandwidth::Bandwidth;
use crate::config::RampConfig;
use crate::constants::RAMP_BOUND_EPSILON_BPS;
use crate::policy::{evaluate, Verdict, Violation};
use crate::probe::{ProbeExecutor, ProbeFailureKind, ProbeOutcome};
use crate::recorder::{StepRecord, StepRole};
use crate::session::{RampSession, Recovery, StopReason};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Ramping,
    Confirming(Violation),
    SteppingDown(Violation),
    Done(StopReason),
}

/// What one probe amounted to.
#[derive(Debug, Clone, Copy, PartialEq)]
enum StepResult {
    Accepted { index: usize, throughput: Option<f64> },
    Rejected(Violation),
    Failed(ProbeFailureKind),
}

/// Run one capacity search to completion.
///
/// Never fails: probe errors and threshold violations end the session with
/// the matching [`StopReason`], and the returned session always has one.
pub fn run<E: ProbeExecutor + ?Sized>(config: RampConfig, executor: &mut E) -> RampSession {
    let mut session = RampSession::new(config);
    info!(
        start = %session.config().start(),
        step = %session.config().step(),
        max = %session.config().max(),
        direction = %session.config().probe().direction,
        "starting capacity search"
    );

    let mut phase = Phase::Ramping;
    loop {
        phase = match phase {
            Phase::Ramping => ramp(&mut session, executor),
            Phase::Confirming(violation) => confirm(&mut session, executor, violation),
            Phase::SteppingDown(violation) => step_down(&mut session, executor, violation),
            Phase::Done(reason) => {
                info!(
                    stop_reason = %reason,
                    selected = ?session.last_accepted_target().map(Bandwidth::encode),
                    steps = session.steps().len(),
                    "capacity search finished"
                );
                session.finish(reason);
                break;
            }
        };
    }
    session
}

fn ramp<E: ProbeExecutor + ?Sized>(session: &mut RampSession, executor: &mut E) -> Phase {
    let current = session.current_target();
    if current > session.config().max().bps() + RAMP_BOUND_EPSILON_BPS {
        return Phase::Done(StopReason::MaxReached);
    }

    // `current` is start + n * step, both validated finite and positive.
    let Some(target) = Bandwidth::new(current) else {
        return Phase::Done(StopReason::MaxReached);
    };

    match probe_step(session, executor, target, StepRole::Normal) {
        StepResult::Accepted { index, throughput } => {
            session.adopt(index);
            session.advance(throughput);
            Phase::Ramping
        }
        StepResult::Failed(kind) => Phase::Done(StopReason::ProbeFailed(kind)),
        StepResult::Rejected(violation) => {
            let unrecoverable = StopReason::Threshold {
                violation,
                recovery: None,
            };
            if session.selected().is_none() {
                warn!(%violation, "first ramp step rejected, nothing to fall back to");
                Phase::Done(unrecoverable)
            } else if session.begin_fallback() {
                Phase::Confirming(violation)
            } else {
                Phase::Done(unrecoverable)
            }
        }
    }
}

fn confirm<E: ProbeExecutor + ?Sized>(
    session: &mut RampSession,
    executor: &mut E,
    violation: Violation,
) -> Phase {
    let Some(target) = session.last_accepted_target() else {
        return Phase::Done(StopReason::Threshold {
            violation,
            recovery: None,
        });
    };

    match probe_step(session, executor, target, StepRole::Confirm) {
        StepResult::Accepted { index, .. } => {
            session.adopt(index);
            Phase::Done(StopReason::Threshold {
                violation,
                recovery: Some(Recovery::Confirmed),
            })
        }
        StepResult::Failed(kind) => Phase::Done(StopReason::ProbeFailed(kind)),
        StepResult::Rejected(_) => Phase::SteppingDown(violation),
    }
}

fn step_down<E: ProbeExecutor + ?Sized>(
    session: &mut RampSession,
    executor: &mut E,
    violation: Violation,
) -> Phase {
    let exhausted = Phase::Done(StopReason::Threshold {
        violation,
        recovery: None,
    });
    let Some(last) = session.last_accepted_target() else {
        return exhausted;
    };

    let config = session.config();
    let down = (last.bps() - config.step().bps()).max(config.start().bps());
    let target = match Bandwidth::new(down) {
        Some(target) if target < last => target,
        _ => {
            debug!(last = %last, "no lower target to step down to");
            return exhausted;
        }
    };

    match probe_step(session, executor, target, StepRole::Fallback) {
        StepResult::Accepted { index, .. } => {
            session.adopt(index);
            Phase::Done(StopReason::Threshold {
                violation,
                recovery: Some(Recovery::SteppedDown),
            })
        }
        StepResult::Failed(kind) => Phase::Done(StopReason::ProbeFailed(kind)),
        StepResult::Rejected(_) => exhausted,
    }
}

/// Probe once at `target`, judge the outcome and append the record.
fn probe_step<E: ProbeExecutor + ?Sized>(
    session: &mut RampSession,
    executor: &mut E,
    target: Bandwidth,
    role: StepRole,
) -> StepResult {
    let request = session.config().probe().request(target);
    debug!(target = %target, ?role, "issuing probe");
    let report = executor.probe(&request);

    // Confirm and fallback probes are judged against the ramp baseline too.
    let verdict = match &report.outcome {
        ProbeOutcome::Measured(m) => Ok((
            evaluate(session.config().policy(), m, session.baseline_throughput()),
            m.throughput_bps,
        )),
        ProbeOutcome::Failed { kind, .. } => Err(*kind),
    };

    let accepted = matches!(verdict, Ok((v, _)) if v.is_accepted());
    let index = session.record(StepRecord::new(target, role, report, accepted));

    match verdict {
        Ok((Verdict::Accept, throughput)) => {
            info!(target = %target, ?role, throughput_bps = ?throughput, "step accepted");
            StepResult::Accepted { index, throughput }
        }
        Ok((Verdict::Reject(violation), _)) => {
            warn!(target = %target, ?role, %violation, "step rejected");
            StepResult::Rejected(violation)
        }
        Err(kind) => {
            warn!(target = %target, ?role, %kind, "probe failed");
            StepResult::Failed(kind)
        }
    }
}
