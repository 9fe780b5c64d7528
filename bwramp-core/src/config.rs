//! Ramp configuration: search bounds, thresholds and probe settings.

use std::time::Duration;

use crate::bandwidth::Bandwidth;
use crate::errors::RampError;
use crate::policy::ThresholdPolicy;
use crate::probe::ProbeSettings;

/// Validated parameters of one capacity search.
///
/// Construct with [`RampConfig::new`]; the fields are read-only afterwards
/// so a running session can rely on them.
#[derive(Debug, Clone, PartialEq)]
pub struct RampConfig {
    start: Bandwidth,
    step: Bandwidth,
    max: Bandwidth,
    policy: ThresholdPolicy,
    probe: ProbeSettings,
}

impl RampConfig {
    /// Validate and assemble a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RampError::InvalidConfig`] when:
    /// - `start` or `step` is zero (a zero step would never reach `max`),
    /// - `max < start`,
    /// - any threshold is negative or not finite,
    /// - the probe duration, timeout or parallelism is zero,
    /// - the server name is empty.
    pub fn new(
        start: Bandwidth,
        step: Bandwidth,
        max: Bandwidth,
        policy: ThresholdPolicy,
        probe: ProbeSettings,
    ) -> Result<Self, RampError> {
        if start.bps() <= 0.0 {
            return Err(RampError::InvalidConfig("start must be positive".into()));
        }
        if step.bps() <= 0.0 {
            return Err(RampError::InvalidConfig("step must be positive".into()));
        }
        if max < start {
            return Err(RampError::InvalidConfig(format!(
                "max ({max}) is below start ({start})"
            )));
        }
        policy.validate()?;
        validate_probe(&probe)?;

        Ok(Self {
            start,
            step,
            max,
            policy,
            probe,
        })
    }

    pub fn start(&self) -> Bandwidth {
        self.start
    }

    pub fn step(&self) -> Bandwidth {
        self.step
    }

    pub fn max(&self) -> Bandwidth {
        self.max
    }

    pub fn policy(&self) -> &ThresholdPolicy {
        &self.policy
    }

    pub fn probe(&self) -> &ProbeSettings {
        &self.probe
    }
}

fn validate_probe(probe: &ProbeSettings) -> Result<(), RampError> {
    if probe.server.trim().is_empty() {
        return Err(RampError::InvalidConfig("server must not be empty".into()));
    }
    if probe.duration == Duration::ZERO {
        return Err(RampError::InvalidConfig("duration must be non-zero".into()));
    }
    if probe.timeout == Duration::ZERO {
        return Err(RampError::InvalidConfig("timeout must be non-zero".into()));
    }
    if probe.parallel == 0 {
        return Err(RampError::InvalidConfig(
            "parallel must be at least 1".into(),
        ));
    }
    Ok(())
}
