//! Conformance: Stop Reason Registry
//!
//! Asserts the canonical 13-code registry and that every reason the
//! controller can actually produce is in it.

use bwramp_core::errors::{is_valid_stop_reason, STOP_REASON_CODES};

/// Exact list and order.
#[test]
fn conformance_stop_reason_registry_exact_list() {
    let expected: [&str; 13] = [
        "max_reached",
        "loss_threshold",
        "jitter_threshold",
        "throughput_drop",
        "loss_threshold_fallback_confirmed",
        "jitter_threshold_fallback_confirmed",
        "throughput_drop_fallback_confirmed",
        "loss_threshold_fallback_stepdown",
        "jitter_threshold_fallback_stepdown",
        "throughput_drop_fallback_stepdown",
        "timeout",
        "process_error",
        "parse_error",
    ];

    assert_eq!(STOP_REASON_CODES, expected, "STOP_REASON_CODES drift");
}

/// All codes must be unique.
#[test]
fn conformance_stop_reason_registry_unique() {
    let mut seen = std::collections::HashSet::new();
    for code in &STOP_REASON_CODES {
        assert!(seen.insert(code), "duplicate stop reason: {code}");
    }
}

/// Suffixed codes only ever extend a threshold code.
#[test]
fn conformance_stop_reason_suffixes_extend_threshold_codes() {
    for code in &STOP_REASON_CODES {
        for suffix in ["_fallback_confirmed", "_fallback_stepdown"] {
            if let Some(base) = code.strip_suffix(suffix) {
                assert!(
                    ["loss_threshold", "jitter_threshold", "throughput_drop"].contains(&base),
                    "{code} extends non-threshold code {base}"
                );
            }
        }
    }
}

/// The validator accepts every canonical code and nothing else.
#[test]
fn conformance_stop_reason_validator() {
    for code in &STOP_REASON_CODES {
        assert!(is_valid_stop_reason(code), "validator rejected {code}");
    }
    assert!(!is_valid_stop_reason("json_parse"));
    assert!(!is_valid_stop_reason("exit_1"));
    assert!(!is_valid_stop_reason("Max_Reached"));
}
