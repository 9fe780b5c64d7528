//! Session recorder: append-only step log and the session output schema.
//!
//! The recorder performs no evaluation. [`StepLog`] keeps every probe in
//! issuance order and remembers which record is currently adopted;
//! [`SessionReport`] turns a finished session into the JSON document that
//! downstream report tooling parses by key.
//!
//! # Output schema
//!
//! ```text
//! {
//!   "meta":        { caller keys..., fixed keys (win on collision) },
//!   "steps":       [ step, ... ],
//!   "selected":    step | null,
//!   "stop_reason": "<code>"
//! }
//! ```
//!
//! A step always has `target_bps`, `target_str` and `ok`. Measurement
//! fields (`throughput_bps`, `jitter_ms`, `loss_percent`, `packets`) appear
//! only when the tool reported them; `error`/`detail` only on failed
//! probes; `cmd` when the executor reported one; `confirm`/`fallback` only
//! on those roles.

use std::io;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::bandwidth::Bandwidth;
use crate::constants::{PROBE_PROTOCOL, PROBE_TOOL};
use crate::errors::RampError;
use crate::probe::{Direction, ProbeOutcome, ProbeReport};
use crate::session::RampSession;

/// Why a probe was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepRole {
    /// Regular ramp probe.
    Normal,
    /// Re-probe at the last accepted target after a violation.
    Confirm,
    /// One step below the last accepted target after a failed confirm.
    Fallback,
}

/// One probe and its verdict. Never mutated once logged.
#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord {
    pub target: Bandwidth,
    /// Encoded target exactly as handed to the probe tool.
    pub target_str: String,
    pub role: StepRole,
    pub outcome: ProbeOutcome,
    pub command: Option<String>,
    pub accepted: bool,
}

impl StepRecord {
    pub fn new(target: Bandwidth, role: StepRole, report: ProbeReport, accepted: bool) -> Self {
        Self {
            target,
            target_str: target.encode(),
            role,
            outcome: report.outcome,
            command: report.command,
            accepted,
        }
    }

    pub fn target_bps(&self) -> f64 {
        self.target.bps()
    }
}

/// Append-only, chronologically ordered step records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepLog {
    steps: Vec<StepRecord>,
    adopted: Option<usize>,
}

impl StepLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record and return its index.
    pub fn push(&mut self, record: StepRecord) -> usize {
        self.steps.push(record);
        self.steps.len() - 1
    }

    /// Mark the record at `index` as the current selection.
    ///
    /// Only accepted records can be adopted; anything else is ignored.
    pub fn adopt(&mut self, index: usize) {
        let accepted = self.steps.get(index).is_some_and(|r| r.accepted);
        debug_assert!(accepted, "adopting a missing or rejected step #{index}");
        if accepted {
            self.adopted = Some(index);
        }
    }

    /// The adopted record, if any step has passed.
    pub fn selected(&self) -> Option<&StepRecord> {
        self.adopted.map(|i| &self.steps[i])
    }

    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Caller-supplied session metadata.
///
/// The fixed fields are typed; anything else the caller wants echoed goes
/// in `extra`, which is merged into `meta` at serialization time and never
/// read by the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionMeta {
    pub tool: String,
    pub protocol: String,
    /// RFC 3339 timestamp of the run.
    pub timestamp: String,
    pub extra: Map<String, Value>,
}

impl SessionMeta {
    /// Metadata for an iperf3 UDP run with no extra keys.
    ///
    /// Direction is not taken here; `meta.direction` always comes from the
    /// session's probe settings.
    pub fn new(timestamp: impl Into<String>) -> Self {
        Self {
            tool: PROBE_TOOL.to_string(),
            protocol: PROBE_PROTOCOL.to_string(),
            timestamp: timestamp.into(),
            extra: Map::new(),
        }
    }

    pub fn with_extra(mut self, extra: Map<String, Value>) -> Self {
        self.extra = extra;
        self
    }
}

#[derive(Serialize)]
struct FixedMeta<'a> {
    tool: &'a str,
    protocol: &'a str,
    direction: Direction,
    timestamp: &'a str,
    adaptive: bool,
    loss_threshold: f64,
    jitter_threshold: f64,
    drop_threshold: f64,
    start_bps: f64,
    step_bps: f64,
    max_bps: f64,
}

/// A finished session, ready to serialize.
#[derive(Debug)]
pub struct SessionReport<'a> {
    meta: &'a SessionMeta,
    session: &'a RampSession,
    stop_reason: String,
}

impl<'a> SessionReport<'a> {
    /// # Errors
    ///
    /// [`RampError::SessionInProgress`] if the session has no stop reason.
    pub fn new(meta: &'a SessionMeta, session: &'a RampSession) -> Result<Self, RampError> {
        let stop_reason = session
            .stop_reason()
            .ok_or(RampError::SessionInProgress)?
            .to_string();
        Ok(Self {
            meta,
            session,
            stop_reason,
        })
    }

    /// The `meta` object: caller keys first, fixed keys overwrite.
    pub fn meta_object(&self) -> Result<Map<String, Value>, RampError> {
        let config = self.session.config();
        let policy = config.policy();
        let fixed = FixedMeta {
            tool: &self.meta.tool,
            protocol: &self.meta.protocol,
            direction: config.probe().direction,
            timestamp: &self.meta.timestamp,
            adaptive: true,
            loss_threshold: policy.loss_percent,
            jitter_threshold: policy.jitter_ms,
            drop_threshold: policy.drop_percent,
            start_bps: config.start().bps(),
            step_bps: config.step().bps(),
            max_bps: config.max().bps(),
        };

        let mut merged = self.meta.extra.clone();
        if let Value::Object(fixed) = serde_json::to_value(&fixed)? {
            merged.extend(fixed);
        }
        Ok(merged)
    }

    pub fn to_value(&self) -> Result<Value, RampError> {
        #[derive(Serialize)]
        struct Document<'b> {
            meta: Map<String, Value>,
            steps: &'b [StepRecord],
            selected: Option<&'b StepRecord>,
            stop_reason: &'b str,
        }

        let doc = Document {
            meta: self.meta_object()?,
            steps: self.session.steps(),
            selected: self.session.selected(),
            stop_reason: &self.stop_reason,
        };
        Ok(serde_json::to_value(&doc)?)
    }

    /// Write the document as indented JSON.
    pub fn write_pretty<W: io::Write>(&self, mut writer: W) -> Result<(), RampError> {
        serde_json::to_writer_pretty(&mut writer, &self.to_value()?)?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct StepView<'a> {
    target_bps: f64,
    target_str: &'a str,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    throughput_bps: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    jitter_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    loss_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    packets: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cmd: Option<&'a str>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    confirm: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    fallback: bool,
}

impl Serialize for StepRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut view = StepView {
            target_bps: self.target.bps(),
            target_str: &self.target_str,
            ok: self.accepted,
            throughput_bps: None,
            jitter_ms: None,
            loss_percent: None,
            packets: None,
            error: None,
            detail: None,
            cmd: self.command.as_deref(),
            confirm: self.role == StepRole::Confirm,
            fallback: self.role == StepRole::Fallback,
        };
        match &self.outcome {
            ProbeOutcome::Measured(m) => {
                view.throughput_bps = m.throughput_bps;
                view.jitter_ms = m.jitter_ms;
                view.loss_percent = m.loss_percent;
                view.packets = m.packet_count;
            }
            ProbeOutcome::Failed { kind, detail } => {
                view.error = Some(kind.as_str());
                view.detail = detail.as_deref();
            }
        }
        view.serialize(serializer)
    }
}
