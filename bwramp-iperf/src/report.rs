//! iperf3 JSON report extraction.
//!
//! Only the UDP summary is read: `end.sum`, or `end.sum_received` when
//! `sum` is missing or an empty object. Fields iperf3 left out stay
//! `None`; nothing is defaulted to zero.

use bwramp_core::probe::Measurement;
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
struct IperfReport {
    #[serde(default)]
    end: Option<EndSection>,
    /// Present when iperf3 itself reports a failure.
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct EndSection {
    #[serde(default)]
    sum: Option<Map<String, Value>>,
    #[serde(default)]
    sum_received: Option<Map<String, Value>>,
}

#[derive(Debug, Default, Deserialize)]
struct UdpSum {
    bits_per_second: Option<f64>,
    jitter_ms: Option<f64>,
    lost_percent: Option<f64>,
    packets: Option<u64>,
}

/// Parse a complete iperf3 `-J` document into a measurement.
///
/// # Errors
///
/// Returns the parser's message when `stdout` is not JSON, or when a
/// summary field has the wrong type.
pub fn parse_measurement(stdout: &[u8]) -> Result<Measurement, String> {
    let report: IperfReport = serde_json::from_slice(stdout).map_err(|e| e.to_string())?;
    let end = report.end.unwrap_or_default();

    let summary = [end.sum, end.sum_received]
        .into_iter()
        .flatten()
        .find(|section| !section.is_empty())
        .unwrap_or_default();

    let sum: UdpSum =
        serde_json::from_value(Value::Object(summary)).map_err(|e| format!("end.sum: {e}"))?;

    Ok(Measurement {
        throughput_bps: sum.bits_per_second,
        jitter_ms: sum.jitter_ms,
        loss_percent: sum.lost_percent,
        packet_count: sum.packets,
    })
}

/// The `error` string of an iperf3 JSON document, if it has one.
///
/// iperf3 run with `-J` reports its own failures on stdout, which is far
/// more useful in the session log than an exit code.
pub fn reported_error(stdout: &[u8]) -> Option<String> {
    serde_json::from_slice::<IperfReport>(stdout)
        .ok()
        .and_then(|r| r.error)
}
