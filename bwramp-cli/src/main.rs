use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::Context;
use bwramp_core::{controller, SessionMeta, SessionReport};
use bwramp_iperf::Iperf3Executor;
use clap::Parser;
use tracing::info;

mod config;
mod logging;
mod meta;

use crate::config::Config;

fn main() -> Result<(), anyhow::Error> {
    let config = Config::parse();
    logging::init(config.verbose);

    let ramp = config.ramp_config().context("invalid configuration")?;
    let extra = meta::parse_extra(&config.meta);
    let timestamp = chrono::Utc::now().to_rfc3339();

    let mut executor = Iperf3Executor::new()
        .context("failed to start probe runtime")?
        .with_binary(&config.iperf_bin);

    info!(
        server = %config.server,
        iperf_bin = %executor.binary().display(),
        "probe executor ready"
    );
    let session = controller::run(ramp, &mut executor);

    let meta = SessionMeta::new(timestamp).with_extra(extra);
    let report = SessionReport::new(&meta, &session)?;

    let file = File::create(&config.out)
        .with_context(|| format!("failed to create {}", config.out.display()))?;
    let mut writer = BufWriter::new(file);
    report.write_pretty(&mut writer)?;
    writer
        .flush()
        .with_context(|| format!("failed to write {}", config.out.display()))?;

    info!(
        out = %config.out.display(),
        steps = session.steps().len(),
        selected = session.selected().map(|s| s.target_str.as_str()).unwrap_or("none"),
        "session written"
    );
    Ok(())
}
