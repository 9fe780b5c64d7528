//! Conformance: Session Output Schema
//!
//! Field names and nesting are consumed by other tools in the pipeline.
//! Any change here is a breaking change for them.

use std::collections::VecDeque;
use std::time::Duration;

use bwramp_core::controller::run;
use bwramp_core::errors::is_valid_stop_reason;
use bwramp_core::probe::{
    Direction, Measurement, ProbeExecutor, ProbeFailureKind, ProbeOutcome, ProbeReport,
    ProbeRequest, ProbeSettings,
};
use bwramp_core::{RampConfig, RampError, RampSession, SessionMeta, SessionReport, ThresholdPolicy};
use serde_json::{json, Map, Value};

struct Scripted(VecDeque<ProbeOutcome>);

impl ProbeExecutor for Scripted {
    fn probe(&mut self, request: &ProbeRequest) -> ProbeReport {
        ProbeReport {
            outcome: self.0.pop_front().expect("unscripted probe"),
            command: Some(format!(
                "iperf3 -c {} -p {} -J -u -b {}",
                request.server, request.port, request.bandwidth
            )),
        }
    }
}

fn measured(throughput: f64, loss: f64) -> ProbeOutcome {
    ProbeOutcome::Measured(Measurement {
        throughput_bps: Some(throughput),
        jitter_ms: Some(0.5),
        loss_percent: Some(loss),
        packet_count: Some(170_000),
    })
}

fn session(outcomes: Vec<ProbeOutcome>) -> RampSession {
    session_toward(Direction::Downlink, outcomes)
}

fn session_toward(direction: Direction, outcomes: Vec<ProbeOutcome>) -> RampSession {
    let config = RampConfig::new(
        "2G".parse().unwrap(),
        "2G".parse().unwrap(),
        "10G".parse().unwrap(),
        ThresholdPolicy::default(),
        ProbeSettings {
            server: "192.0.2.44".into(),
            port: 5202,
            direction,
            duration: Duration::from_secs(10),
            parallel: 2,
            timeout: Duration::from_secs(30),
        },
    )
    .unwrap();
    run(config, &mut Scripted(outcomes.into()))
}

fn meta() -> SessionMeta {
    let mut extra = Map::new();
    extra.insert("name".into(), json!("lab-a"));
    extra.insert("tool".into(), json!("caller-override"));
    SessionMeta::new("2026-10-17T08:30:00+00:00").with_extra(extra)
}

fn document(session: &RampSession) -> Value {
    let meta = meta();
    SessionReport::new(&meta, session).unwrap().to_value().unwrap()
}

fn stepdown_session() -> RampSession {
    session(vec![
        measured(2e9, 0.0),
        measured(4e9, 0.0),
        measured(5e9, 2.0),
        measured(4e9, 2.0),
        measured(4e9, 0.0),
    ])
}

/// Exactly four top-level keys.
#[test]
fn conformance_top_level_keys() {
    let doc = document(&stepdown_session());
    let mut keys: Vec<&str> = doc.as_object().unwrap().keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["meta", "selected", "steps", "stop_reason"]);
}

/// Fixed meta fields are present and win over caller keys.
#[test]
fn conformance_meta_fields() {
    let doc = document(&stepdown_session());
    let meta = &doc["meta"];

    assert_eq!(meta["name"], "lab-a", "caller keys are carried");
    assert_eq!(meta["tool"], "iperf3", "fixed keys win on collision");
    assert_eq!(meta["protocol"], "udp");
    assert_eq!(meta["direction"], "downlink");
    assert_eq!(meta["timestamp"], "2026-10-17T08:30:00+00:00");
    assert_eq!(meta["adaptive"], true);
    assert_eq!(meta["loss_threshold"], 1.0);
    assert_eq!(meta["jitter_threshold"], 5.0);
    assert_eq!(meta["drop_threshold"], 5.0);
    assert_eq!(meta["start_bps"], 2e9);
    assert_eq!(meta["step_bps"], 2e9);
    assert_eq!(meta["max_bps"], 10e9);
}

/// `meta.direction` is the direction the session actually probed; a
/// caller key of the same name cannot replace it.
#[test]
fn conformance_meta_direction_follows_session() {
    let s = session_toward(
        Direction::Uplink,
        vec![ProbeOutcome::failed(ProbeFailureKind::ProcessError, "refused")],
    );
    let mut extra = Map::new();
    extra.insert("direction".into(), json!("downlink"));
    let meta = SessionMeta::new("2026-10-17T08:30:00+00:00").with_extra(extra);
    let doc = SessionReport::new(&meta, &s).unwrap().to_value().unwrap();
    assert_eq!(doc["meta"]["direction"], "uplink");
}

/// Step objects carry the stable keys and role markers.
#[test]
fn conformance_step_fields_and_roles() {
    let doc = document(&stepdown_session());
    let steps = doc["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 5);

    let first = &steps[0];
    assert_eq!(first["target_bps"], 2e9);
    assert_eq!(first["target_str"], "2.000G");
    assert_eq!(first["ok"], true);
    assert_eq!(first["throughput_bps"], 2e9);
    assert_eq!(first["jitter_ms"], 0.5);
    assert_eq!(first["loss_percent"], 0.0);
    assert_eq!(first["packets"], 170_000);
    assert_eq!(first["cmd"], "iperf3 -c 192.0.2.44 -p 5202 -J -u -b 2.000G");
    assert!(first.get("confirm").is_none());
    assert!(first.get("fallback").is_none());
    assert!(first.get("error").is_none());

    assert_eq!(steps[2]["ok"], false);
    assert_eq!(steps[3]["confirm"], true);
    assert_eq!(steps[3]["target_bps"], 4e9);
    assert_eq!(steps[4]["fallback"], true);
    assert_eq!(steps[4]["target_bps"], 2e9);
}

/// `selected` is the adopted step object itself.
#[test]
fn conformance_selected_is_step_object() {
    let doc = document(&stepdown_session());
    assert_eq!(doc["selected"], doc["steps"][4]);
    assert_eq!(doc["stop_reason"], "loss_threshold_fallback_stepdown");
}

/// Failed steps carry `error` and no measurement keys; `selected` is null
/// when nothing passed.
#[test]
fn conformance_failed_step_and_null_selection() {
    let s = session(vec![ProbeOutcome::failed(
        ProbeFailureKind::Timeout,
        "no report within 30s",
    )]);
    let doc = document(&s);

    assert_eq!(doc["stop_reason"], "timeout");
    assert!(doc["selected"].is_null());

    let step = &doc["steps"][0];
    assert_eq!(step["error"], "timeout");
    assert_eq!(step["detail"], "no report within 30s");
    assert_eq!(step["ok"], false);
    for key in ["throughput_bps", "jitter_ms", "loss_percent", "packets"] {
        assert!(step.get(key).is_none(), "failed step has {key}");
    }
}

/// Absent measurement fields are omitted, never written as zero.
#[test]
fn conformance_partial_measurement_omits_fields() {
    let partial = ProbeOutcome::Measured(Measurement {
        throughput_bps: Some(2e9),
        jitter_ms: None,
        loss_percent: None,
        packet_count: None,
    });
    let s = session(vec![
        partial.clone(),
        partial.clone(),
        partial.clone(),
        partial.clone(),
        partial,
    ]);
    let doc = document(&s);
    let step = &doc["steps"][0];
    assert_eq!(step["throughput_bps"], 2e9);
    assert!(step.get("jitter_ms").is_none());
    assert!(step.get("loss_percent").is_none());
    assert!(step.get("packets").is_none());
}

/// Written stop reasons are always registered codes.
#[test]
fn conformance_written_stop_reason_is_registered() {
    let doc = document(&stepdown_session());
    assert!(is_valid_stop_reason(doc["stop_reason"].as_str().unwrap()));
}

/// Pretty output parses back to the same document.
#[test]
fn conformance_pretty_output_is_json() {
    let s = stepdown_session();
    let meta = meta();
    let report = SessionReport::new(&meta, &s).unwrap();
    let mut buf = Vec::new();
    report.write_pretty(&mut buf).unwrap();
    let parsed: Value = serde_json::from_slice(&buf).unwrap();
    assert_eq!(parsed, report.to_value().unwrap());
    assert!(buf.ends_with(b"\n"));
}

#[test]
fn conformance_report_error_display() {
    let err = RampError::SessionInProgress;
    assert_eq!(err.to_string(), "Session still in progress");
}
