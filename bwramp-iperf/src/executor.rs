//! Timeout-bounded iperf3 execution.
//!
//! Each probe spawns one iperf3 child on a private current-thread tokio
//! runtime and waits for it under `tokio::time::timeout`. The child is
//! spawned with `kill_on_drop`, so abandoning the wait on timeout also
//! kills the process. The public API stays blocking: the ramp controller
//! issues exactly one probe at a time.

use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Instant;

use bwramp_core::constants::PROBE_TOOL;
use bwramp_core::probe::{ProbeExecutor, ProbeFailureKind, ProbeOutcome, ProbeReport, ProbeRequest};
use tokio::process::Command;
use tokio::runtime::Runtime;
use tracing::{debug, warn};

use crate::command::{display_command, probe_args};
use crate::error::IperfError;
use crate::report::{parse_measurement, reported_error};

/// Runs iperf3 as a subprocess, one probe per call.
pub struct Iperf3Executor {
    binary: PathBuf,
    runtime: Runtime,
}

impl Iperf3Executor {
    /// Executor using `iperf3` from `PATH`.
    pub fn new() -> Result<Self, IperfError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            binary: PathBuf::from(PROBE_TOOL),
            runtime,
        })
    }

    /// Use a specific iperf3 binary.
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    fn execute(&self, request: &ProbeRequest, args: &[String]) -> ProbeOutcome {
        let mut cmd = Command::new(&self.binary);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = self.runtime.block_on(async {
            let child = cmd.spawn()?;
            Ok::<_, std::io::Error>(
                tokio::time::timeout(request.timeout, child.wait_with_output()).await,
            )
        });

        match output {
            Err(e) => ProbeOutcome::failed(
                ProbeFailureKind::ProcessError,
                format!("failed to start {}: {e}", self.binary.display()),
            ),
            Ok(Err(_elapsed)) => ProbeOutcome::failed(
                ProbeFailureKind::Timeout,
                format!("no result within {}s", request.timeout.as_secs_f64()),
            ),
            Ok(Ok(Err(e))) => ProbeOutcome::failed(
                ProbeFailureKind::ProcessError,
                format!("failed to collect output: {e}"),
            ),
            Ok(Ok(Ok(output))) => interpret(output),
        }
    }
}

/// Map a finished iperf3 process to an outcome.
fn interpret(output: Output) -> ProbeOutcome {
    if !output.status.success() {
        let reason = reported_error(&output.stdout)
            .unwrap_or_else(|| String::from_utf8_lossy(&output.stderr).trim().to_string());
        let detail = if reason.is_empty() {
            output.status.to_string()
        } else {
            format!("{}: {reason}", output.status)
        };
        return ProbeOutcome::failed(ProbeFailureKind::ProcessError, detail);
    }

    // iperf3 can exit 0 with only an `error` and no summary.
    if let Some(reason) = reported_error(&output.stdout) {
        return ProbeOutcome::failed(ProbeFailureKind::ProcessError, reason);
    }

    match parse_measurement(&output.stdout) {
        Ok(measurement) => ProbeOutcome::Measured(measurement),
        Err(e) => ProbeOutcome::failed(ProbeFailureKind::ParseError, e),
    }
}

impl ProbeExecutor for Iperf3Executor {
    fn probe(&mut self, request: &ProbeRequest) -> ProbeReport {
        let args = probe_args(request);
        let command = display_command(&self.binary, &args);
        debug!(%command, timeout_secs = request.timeout.as_secs(), "running probe");

        let started = Instant::now();
        let outcome = self.execute(request, &args);
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &outcome {
            ProbeOutcome::Measured(m) => debug!(
                elapsed_ms,
                throughput_bps = ?m.throughput_bps,
                jitter_ms = ?m.jitter_ms,
                loss_percent = ?m.loss_percent,
                "probe finished"
            ),
            ProbeOutcome::Failed { kind, detail } => warn!(
                elapsed_ms,
                %kind,
                detail = detail.as_deref().unwrap_or(""),
                "probe failed"
            ),
        }

        ProbeReport {
            outcome,
            command: Some(command),
        }
    }
}
