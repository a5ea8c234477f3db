// cargo run --bin latest-tle-coords -- --config configs/example.toml -i 44387 \
//   --start 2024-05-13 --end "2024-05-13 23:59:00"

use chrono::Duration;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use groundtrack_lib::{
    cli::{parse_step, parse_utc_time},
    config::Config,
    sink::FileSink,
    source::SpaceTrackSource,
    FixedTle, Generator, Interruptor,
};
use tleprotocol::parse_tle;
use tletypes::prelude::*;

/// Ground track over a time range using only the latest published TLE
#[derive(Parser, Debug)]
#[command(version)]
struct Opts {
    /// Configuration toml file.
    ///
    /// The defaults are used when not provided.
    #[arg(long)]
    config: Option<PathBuf>,

    /// NORAD catalog number
    #[arg(short = 'i', long)]
    satellite_id: SatelliteId,

    /// First sample instant (UTC), YYYY-MM-DD[THH:MM:SS]
    #[arg(short = 's', long, value_parser = parse_utc_time)]
    start: UtcTimestamp,

    /// Last sample instant (UTC), inclusive
    #[arg(short = 'e', long, value_parser = parse_utc_time)]
    end: UtcTimestamp,

    /// Time between samples
    #[arg(short = 't', long, default_value = "1m", value_parser = parse_step)]
    step: Duration,

    /// Output file path to append to.
    ///
    /// Defaults to `<output-dir>/coordinates_latest.dat`.
    output: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let opts = Opts::parse();

    let range = TimeRange::new(opts.start, opts.end, opts.step)?;
    let cfg = Config::load_or_default(opts.config.as_ref())?;

    let intr = Interruptor::new();
    intr.install_ctrlc_handler()?;

    let mut source = SpaceTrackSource::new(&cfg.space_track)?;
    let lines = source
        .latest(opts.satellite_id)?
        .ok_or_else(|| format!("No TLE published for satellite {}", opts.satellite_id))?;
    let tle = parse_tle(&lines)?;
    if tle.satellite_id != opts.satellite_id {
        return Err(format!(
            "Space-Track returned a TLE for satellite {} instead of {}",
            tle.satellite_id, opts.satellite_id
        )
        .into());
    }
    info!(satellite_id = %tle.satellite_id, epoch = %tle.epoch, "Latest TLE");

    let output = opts
        .output
        .unwrap_or_else(|| cfg.output_dir.join("coordinates_latest.dat"));
    let mut sink = FileSink::new(output, cfg.record_format);
    let report = Generator::with_interruptor(FixedTle(tle), intr).generate(
        opts.satellite_id,
        &range,
        &mut sink,
    )?;

    println!(
        "Wrote {} records to '{}'",
        report.written,
        sink.path().display()
    );

    Ok(())
}
