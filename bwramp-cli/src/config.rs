use std::path::PathBuf;
use std::time::Duration;

use bwramp_core::constants::{
    DEFAULT_DROP_THRESHOLD_PERCENT, DEFAULT_DURATION_SECS, DEFAULT_JITTER_THRESHOLD_MS,
    DEFAULT_LOSS_THRESHOLD_PERCENT, DEFAULT_PARALLEL, DEFAULT_PORT, DEFAULT_TIMEOUT_SECS,
    PROBE_TOOL,
};
use bwramp_core::probe::{Direction, ProbeSettings};
use bwramp_core::{Bandwidth, RampConfig, RampError, ThresholdPolicy};
use clap::ValueEnum;

/// Adaptive UDP capacity search
///
/// Ramps iperf3 UDP load against a server until loss, jitter or a
/// throughput drop says the path is saturated, then writes the session
/// as JSON.
#[derive(clap::Parser, Clone, Debug)]
#[clap(name = "bwramp")]
#[clap(version)]
pub struct Config {
    /// iperf3 server host.
    #[arg(long)]
    pub server: String,
    /// iperf3 server port.
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,
    /// Traffic direction relative to this host.
    #[arg(long, value_enum)]
    pub direction: DirectionArg,
    /// Seconds per probe.
    #[arg(long, default_value_t = DEFAULT_DURATION_SECS)]
    pub duration: u64,
    /// Parallel iperf3 streams per probe.
    #[arg(long, default_value_t = DEFAULT_PARALLEL)]
    pub parallel: u16,
    /// First target bandwidth, e.g. `500M`.
    #[arg(long)]
    pub start: Bandwidth,
    /// Ramp increment, e.g. `250M`.
    #[arg(long)]
    pub step: Bandwidth,
    /// Highest target to try, e.g. `10G`.
    #[arg(long)]
    pub max: Bandwidth,
    /// Reject a probe whose loss exceeds this percentage.
    #[arg(long, default_value_t = DEFAULT_LOSS_THRESHOLD_PERCENT)]
    pub loss_threshold: f64,
    /// Reject a probe whose jitter exceeds this many milliseconds.
    #[arg(long, default_value_t = DEFAULT_JITTER_THRESHOLD_MS)]
    pub jitter_threshold: f64,
    /// Reject a probe whose throughput falls this many percent below the
    /// last accepted ramp step.
    #[arg(long, default_value_t = DEFAULT_DROP_THRESHOLD_PERCENT)]
    pub drop_threshold: f64,
    /// Seconds to wait for one probe before giving up.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,
    /// Where to write the session JSON.
    #[arg(long)]
    pub out: PathBuf,
    /// JSON object merged into the output `meta`.
    #[arg(long, default_value = "{}")]
    pub meta: String,
    /// iperf3 binary to run.
    #[arg(long, env = "BWRAMP_IPERF_BIN", default_value = PROBE_TOOL)]
    pub iperf_bin: PathBuf,
    /// Log each probe request and result.
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DirectionArg {
    Uplink,
    Downlink,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Uplink => Direction::Uplink,
            DirectionArg::Downlink => Direction::Downlink,
        }
    }
}

impl Config {
    pub fn direction(&self) -> Direction {
        self.direction.into()
    }

    pub fn policy(&self) -> ThresholdPolicy {
        ThresholdPolicy {
            loss_percent: self.loss_threshold,
            jitter_ms: self.jitter_threshold,
            drop_percent: self.drop_threshold,
        }
    }

    pub fn probe_settings(&self) -> ProbeSettings {
        ProbeSettings {
            server: self.server.clone(),
            port: self.port,
            direction: self.direction(),
            duration: Duration::from_secs(self.duration),
            parallel: self.parallel,
            timeout: Duration::from_secs(self.timeout),
        }
    }

    /// Validated search configuration built from the flags.
    pub fn ramp_config(&self) -> Result<RampConfig, RampError> {
        RampConfig::new(
            self.start,
            self.step,
            self.max,
            self.policy(),
            self.probe_settings(),
        )
    }
}
