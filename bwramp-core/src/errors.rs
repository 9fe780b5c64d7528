//! Error types for bwramp-core.
//!
//! Only configuration and output writing can fail. A ramp session itself
//! never returns an error: probe failures and threshold violations are
//! recorded in the session and surface through its stop reason.

/// Unified error type for bwramp-core operations.
#[derive(Debug, thiserror::Error)]
pub enum RampError {
    /// A bandwidth string could not be decoded.
    #[error("Invalid bandwidth: {0:?}")]
    InvalidBandwidth(String),

    /// Search bounds, thresholds or probe settings are unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A report was requested for a session that has not stopped yet.
    #[error("Session still in progress")]
    SessionInProgress,

    /// Session output could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Session output could not be written.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// ── Stop Reason Registry ────────────────────────────────────────────

/// Canonical stop-reason strings (13 codes).
///
/// Downstream report tooling keys on these exact strings. Every
/// `stop_reason` written by the recorder is one of these.
pub const STOP_REASON_CODES: [&str; 13] = [
    // Ramp completed (1)
    "max_reached",
    // Threshold violation, fallback exhausted or not applicable (3)
    "loss_threshold",
    "jitter_threshold",
    "throughput_drop",
    // Threshold violation, confirm probe passed (3)
    "loss_threshold_fallback_confirmed",
    "jitter_threshold_fallback_confirmed",
    "throughput_drop_fallback_confirmed",
    // Threshold violation, stepdown probe passed (3)
    "loss_threshold_fallback_stepdown",
    "jitter_threshold_fallback_stepdown",
    "throughput_drop_fallback_stepdown",
    // Probe failure (3)
    "timeout",
    "process_error",
    "parse_error",
];

/// Returns `true` if the given string is a canonical stop reason.
pub fn is_valid_stop_reason(reason: &str) -> bool {
    STOP_REASON_CODES.contains(&reason)
}
