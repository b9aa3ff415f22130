//! Command-line front end to the viewer's numeric core: robust colour ranges,
//! line profiles and measurements over CSV point files.
mod input;

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Builder;
use log::LevelFilter;
use serde::Serialize;

use lidar_core::elevation::{raw_extent, sample_elevations};
use lidar_core::measure::measure;
use lidar_core::profile::{extract_segments, write_profile_csv};
use lidar_core::{AnalysisConfig, CutStatus, ProfileSession, RobustRangeEstimator};

use input::{parse_points, read_points_csv};

#[derive(Parser, Debug)]
#[command(name = "lidar", about = "Elevation ranges, line profiles and measurements for LiDAR points")]
struct Cli {
    /// JSON configuration file; missing keys use defaults.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Robust elevation range of a point file, as JSON.
    Range {
        /// CSV file with x, y, z columns.
        #[arg(short, long)]
        input: PathBuf,

        /// Override the sample limit from the config.
        #[arg(long)]
        max_samples: Option<usize>,
    },
    /// Line profile along a polyline, as CSV.
    Profile {
        /// CSV file with x, y, z columns.
        #[arg(short, long)]
        input: PathBuf,

        /// Cut control points: "x,y[,z];x,y[,z];...".
        #[arg(long)]
        cut: String,

        /// Corridor width in metres around the cut.
        #[arg(short, long)]
        width: Option<f64>,

        /// Output CSV; stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip smoothing.
        #[arg(long)]
        raw: bool,
    },
    /// Lengths, area, angles, bearings and circle for picked points, as JSON.
    Measure {
        /// Points: "x,y,z;x,y,z;...".
        #[arg(short, long)]
        points: String,
    },
}

#[derive(Serialize)]
struct RangeReport {
    min: f64,
    max: f64,
    raw_min: f64,
    raw_max: f64,
    samples: usize,
}

fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            AnalysisConfig::from_json_str(&json)
                .with_context(|| format!("invalid config {}", path.display()))
        }
        None => Ok(AnalysisConfig::default()),
    }
}

fn run_range(config: &AnalysisConfig, input: &Path, max_samples: Option<usize>) -> Result<()> {
    let points = read_points_csv(input)?;
    let mut range_config = config.range.clone();
    if let Some(n) = max_samples {
        range_config.max_samples = n;
    }

    let samples = sample_elevations(&points, range_config.max_samples);
    log::info!("{} points, {} elevation samples", points.len(), samples.len());

    let Some(raw) = raw_extent(&samples) else {
        anyhow::bail!("no finite elevations in {}", input.display());
    };
    let estimator = RobustRangeEstimator::new(range_config);
    // raw_extent succeeded, so there is at least one finite sample.
    let robust = estimator.estimate(&samples).unwrap_or(raw);

    let report = RangeReport {
        min: robust.min,
        max: robust.max,
        raw_min: raw.min,
        raw_max: raw.max,
        samples: samples.len(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run_profile(
    config: &AnalysisConfig,
    input: &Path,
    cut: &str,
    width: Option<f64>,
    output: Option<&Path>,
    raw: bool,
) -> Result<()> {
    let cut = parse_points(cut)?;
    let points = read_points_csv(input)?;
    let width = width.unwrap_or(config.profile.default_width);

    let mut session = ProfileSession::new(&config.profile);
    if session.observe_cut(&cut) == CutStatus::Invalid {
        anyhow::bail!("a profile cut needs at least 2 control points, got {}", cut.len());
    }

    let segments = extract_segments(&cut, &points, width)?;
    for (i, segment) in segments.iter().enumerate() {
        log::debug!("segment {i}: {} points over {:.3} m", segment.points.len(), segment.length);
        session.ingest(segment);
    }

    let profile = if raw {
        session.raw_snapshot()
    } else {
        session.snapshot()
    };
    log::info!(
        "{} profile points from {} segments (width {width} m)",
        profile.len(),
        segments.len()
    );

    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            write_profile_csv(BufWriter::new(file), &profile)?;
            log::info!("wrote {}", path.display());
        }
        None => write_profile_csv(io::stdout().lock(), &profile)?,
    }
    Ok(())
}

fn run_measure(points: &str) -> Result<()> {
    let points = parse_points(points)?;
    println!("{}", serde_json::to_string_pretty(&measure(&points))?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}",
                buf.timestamp_seconds(),
                record.level(),
                record.args()
            )
        })
        .filter(None, level)
        .parse_default_env()
        .init();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Range { input, max_samples } => run_range(&config, &input, max_samples),
        Command::Profile {
            input,
            cut,
            width,
            output,
            raw,
        } => run_profile(&config, &input, &cut, width, output.as_deref(), raw),
        Command::Measure { points } => run_measure(&points),
    }
}
