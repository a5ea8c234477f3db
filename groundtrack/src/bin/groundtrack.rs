use chrono::Duration;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use groundtrack_lib::{
    cache::TleCache,
    cli::{parse_step, parse_utc_time},
    config::Config,
    sink::FileSink,
    source::SpaceTrackSource,
    Generator, Interruptor, TleResolver,
};
use tletypes::prelude::*;

/// Compute a satellite ground track from the TLEs in effect on each day
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

    /// Output file to append records to.
    ///
    /// Defaults to `<output-dir>/SAT-<satellite-id>.dat`.
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Override the configured TLE cache directory
    #[arg(long)]
    cache_dir: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let opts = Opts::parse();

    let range = TimeRange::new(opts.start, opts.end, opts.step)?;
    let cfg = Config::load_or_default(opts.config.as_ref())?;

    let intr = Interruptor::new();
    intr.install_ctrlc_handler()?;

    let cache = TleCache::new(opts.cache_dir.unwrap_or_else(|| cfg.cache_dir.clone()));
    let output = opts.output.unwrap_or_else(|| {
        cfg.output_dir
            .join(format!("SAT-{}.dat", opts.satellite_id))
    });
    info!(
        satellite_id = %opts.satellite_id,
        cache_dir = %cache.dir().display(),
        output = %output.display(),
        "Starting"
    );

    let source = SpaceTrackSource::new(&cfg.space_track)?;
    let resolver = TleResolver::new(cache, source, cfg.selection_policy);
    let mut generator = Generator::with_interruptor(resolver, intr);
    let mut sink = FileSink::new(output, cfg.record_format);

    let report = generator.generate(opts.satellite_id, &range, &mut sink)?;
    for (day, reason) in report.unavailable_days.iter() {
        info!(%day, %reason, "Day without TLE");
    }

    Ok(())
}
