// cargo run --bin coords-from-tle -- --date 2024-05-13 \
//   --line1 "1 44387U 19038A   24134.50749057  .00000245  00000-0  12652-3 0  9998" \
//   --line2 "2 44387  98.8247 103.6000 0002382  74.0416 286.1024 14.23882512252450" \
//   /tmp/coordinates.dat

use chrono::Duration;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use groundtrack_lib::{
    cli::{parse_day, parse_step},
    sink::FileSink,
    FixedTle, Generator,
};
use tleprotocol::{parse_tle, RecordFormat};
use tletypes::prelude::*;

/// Ground track of one UTC day from a literal element set
#[derive(Parser, Debug)]
#[command(version)]
struct Opts {
    /// TLE line 1
    #[arg(long)]
    line1: String,

    /// TLE line 2
    #[arg(long)]
    line2: String,

    /// UTC day to cover, from 00:00 up to the next day
    #[arg(short = 'd', long, value_parser = parse_day)]
    date: Day,

    /// Time between samples
    #[arg(short = 't', long, default_value = "1m", value_parser = parse_step)]
    step: Duration,

    /// Record float layout
    #[arg(short = 'f', long, value_enum, default_value_t = Format::Fixed)]
    format: Format,

    /// Output file path to append to
    output: PathBuf,
}

#[derive(Copy, Clone, Debug, clap::ValueEnum)]
enum Format {
    Scientific,
    Fixed,
}

impl From<Format> for RecordFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Scientific => RecordFormat::Scientific,
            Format::Fixed => RecordFormat::Fixed,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let opts = Opts::parse();

    let tle = parse_tle(&TleLines::new(opts.line1.trim(), opts.line2.trim()))?;
    info!(satellite_id = %tle.satellite_id, epoch = %tle.epoch, "TLE is valid");

    let satellite_id = tle.satellite_id;
    let range = TimeRange::whole_day(opts.date, opts.step)?;
    let mut sink = FileSink::new(opts.output, opts.format.into());
    let report = Generator::new(FixedTle(tle)).generate(satellite_id, &range, &mut sink)?;

    println!(
        "Wrote {} records to '{}'",
        report.written,
        sink.path().display()
    );

    Ok(())
}
