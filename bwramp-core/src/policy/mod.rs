//! Threshold policy: pure, deterministic accept/reject decisions.
//!
//! The policy judges a single measurement against three independent
//! bounds. It keeps no history: the drop baseline is owned by the ramp
//! session and passed in on every call.

pub mod threshold;
pub mod types;

// Re-export the canonical entrypoint and core types.
pub use threshold::evaluate;
pub use types::{ThresholdPolicy, Verdict, Violation};
