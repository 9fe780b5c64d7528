//! iperf3 command line for one UDP probe.
//!
//! `<bin> -c <server> -p <port> -t <secs> -P <streams> -J -u -b <target>`,
//! plus `-R` when the server sends (downlink).

use std::path::Path;

use bwramp_core::probe::{Direction, ProbeRequest};

/// Arguments passed to iperf3 for `request`, binary excluded.
pub fn probe_args(request: &ProbeRequest) -> Vec<String> {
    let mut args = vec![
        "-c".to_string(),
        request.server.clone(),
        "-p".to_string(),
        request.port.to_string(),
        "-t".to_string(),
        request.duration.as_secs().max(1).to_string(),
        "-P".to_string(),
        request.parallel.to_string(),
        "-J".to_string(),
        "-u".to_string(),
        "-b".to_string(),
        request.bandwidth.encode(),
    ];
    if request.direction == Direction::Downlink {
        args.push("-R".to_string());
    }
    args
}

/// Human-readable command line recorded with each step.
pub fn display_command(binary: &Path, args: &[String]) -> String {
    format!("{} {}", binary.display(), args.join(" "))
}
