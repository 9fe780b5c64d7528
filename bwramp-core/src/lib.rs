//! bwramp core: adaptive bandwidth capacity search.
//!
//! Finds the highest offered load a path sustains by probing at a rising
//! target, judging each probe against loss, jitter and throughput-drop
//! thresholds, and on the first violation running a bounded
//! confirm-then-stepdown protocol before stopping.
//!
//! The crate is pure logic. Traffic generation is delegated to an injected
//! [`probe::ProbeExecutor`]; the iperf3 implementation lives in
//! `bwramp-iperf`, the command-line driver in `bwramp-cli`.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`constants`] | Bound epsilon, unit multipliers, CLI defaults |
//! | [`errors`] | `RampError`, stop-reason registry |
//! | [`bandwidth`] | Bandwidth string codec |
//! | [`probe`] | Probe executor contract and outcome types |
//! | [`policy`] | Threshold evaluation |
//! | [`config`] | Validated search configuration |
//! | [`session`] | Session state and stop reasons |
//! | [`controller`] | The ramp state machine |
//! | [`recorder`] | Step log and session output schema |
//!
//! # Example
//!
//! ```no_run
//! use bwramp_core::{controller, RampConfig, SessionMeta, SessionReport};
//! # fn demo(config: RampConfig, executor: &mut dyn bwramp_core::probe::ProbeExecutor)
//! #     -> Result<(), bwramp_core::RampError> {
//! let session = controller::run(config, executor);
//! let meta = SessionMeta::new("2026-10-17T12:00:00Z");
//! SessionReport::new(&meta, &session)?.write_pretty(std::io::stdout())?;
//! # Ok(())
//! # }
//! ```

/// Search constants and defaults.
pub mod constants;

/// Error types and the stop-reason registry.
pub mod errors;

/// Bandwidth value codec.
pub mod bandwidth;

/// Probe executor boundary.
pub mod probe;

/// Threshold policy.
pub mod policy;

/// Search configuration.
pub mod config;

/// Ramp session state.
pub mod session;

/// Ramp controller state machine.
pub mod controller;

/// Session recorder and output schema.
pub mod recorder;

pub use bandwidth::Bandwidth;
pub use config::RampConfig;
pub use errors::RampError;
pub use policy::ThresholdPolicy;
pub use recorder::{SessionMeta, SessionReport, StepRecord, StepRole};
pub use session::{RampSession, Recovery, StopReason};
