use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use std::{
    io::{self, Read},
    path::{Path, PathBuf},
};
use stride_lib::{
    activity::{
        best_splits_vs_time, min_times_for_activity, perform_interval_detection,
        processed_time_series, Activity, ActivityPoint, Channel, ProcessingOptions, SplitMetric,
    },
    config::AnalysisConfig,
    detectors::steps::{detect_intervals, IntervalDetectionParams},
    io::{points as points_io, text as text_io},
    metrics::best_split::EngineKind,
    series::gaps::interpolate_null_values,
    signal::Interval,
};

#[derive(Parser)]
#[command(
    name = "stride",
    version,
    about = "stride: best splits and interval detection for activity data"
)]
struct Cli {
    /// TOML file with analysis settings; flags override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ChannelArg {
    #[value(name = "heart-rate", alias = "hr")]
    HeartRate,
    Power,
    Cadence,
    Elevation,
    Time,
    Speed,
}

impl ChannelArg {
    fn metric(self) -> SplitMetric {
        match self {
            ChannelArg::HeartRate => SplitMetric::HeartRate,
            ChannelArg::Power => SplitMetric::Power,
            ChannelArg::Cadence => SplitMetric::Cadence,
            ChannelArg::Elevation => SplitMetric::Elevation,
            ChannelArg::Time => SplitMetric::Time,
            ChannelArg::Speed => SplitMetric::Speed,
        }
    }

    fn channel(self) -> Result<Channel> {
        self.metric()
            .channel()
            .ok_or_else(|| anyhow::anyhow!("{:?} is only available for best splits", self))
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum EngineArg {
    Reference,
    Parallel,
}

impl From<EngineArg> for EngineKind {
    fn from(arg: EngineArg) -> Self {
        match arg {
            EngineArg::Reference => EngineKind::Reference,
            EngineArg::Parallel => EngineKind::Parallel,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Gap-fill a CSV activity into one entry per second
    Fill {
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Interpolate short gaps in newline-delimited values (`null` marks a gap)
    Interpolate {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        max_gap: Option<usize>,
    },
    /// Per-second channel series with optional interpolation and downsampling
    Series {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long, value_enum)]
        channel: ChannelArg,
        #[arg(long)]
        resolution: Option<usize>,
        #[arg(long)]
        max_gap: Option<usize>,
        #[arg(long)]
        no_interpolate: bool,
    },
    /// Best average over each window length (seconds)
    BestSplits {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long, value_enum)]
        metric: ChannelArg,
        #[arg(long, value_delimiter = ',')]
        windows: Option<Vec<usize>>,
        #[arg(long, value_enum)]
        engine: Option<EngineArg>,
        #[arg(long)]
        max_gap: Option<usize>,
    },
    /// Fastest time over each distance (metres)
    MinTimes {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long, value_delimiter = ',')]
        distances: Option<Vec<f64>>,
    },
    /// Detect workout steps in power and segment into intervals
    DetectIntervals {
        #[arg(long)]
        input: Option<PathBuf>,
        /// Treat the input as newline-delimited intensity values instead of a CSV activity
        #[arg(long)]
        values: bool,
        #[arg(long)]
        window_radius: Option<usize>,
        #[arg(long)]
        step_threshold: Option<f64>,
        #[arg(long)]
        input_smoothing_radius: Option<usize>,
        #[arg(long)]
        discrepancy_smoothing_radius: Option<usize>,
        #[arg(long)]
        min_interval_duration: Option<usize>,
        #[arg(long)]
        ftp: Option<f64>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = match cli.config.as_deref() {
        Some(path) => {
            info!("loading config from {}", path.display());
            AnalysisConfig::load(path)?
        }
        None => AnalysisConfig::default(),
    };
    match cli.command {
        Commands::Fill { input } => cmd_fill(input.as_deref())?,
        Commands::Interpolate { input, max_gap } => cmd_interpolate(
            input.as_deref(),
            max_gap.unwrap_or(config.processing.max_gap_for_interpolation),
        )?,
        Commands::Series {
            input,
            channel,
            resolution,
            max_gap,
            no_interpolate,
        } => {
            let options = ProcessingOptions {
                interpolate_null: config.processing.interpolate_null && !no_interpolate,
                max_gap_for_interpolation: max_gap
                    .unwrap_or(config.processing.max_gap_for_interpolation),
                resolution: resolution.unwrap_or(config.processing.resolution),
            };
            cmd_series(input.as_deref(), channel, &options)?
        }
        Commands::BestSplits {
            input,
            metric,
            windows,
            engine,
            max_gap,
        } => cmd_best_splits(
            input.as_deref(),
            metric.metric(),
            &windows.unwrap_or_else(|| config.best_splits.windows.clone()),
            engine.map(EngineKind::from).unwrap_or(config.best_splits.engine),
            max_gap.unwrap_or(config.processing.max_gap_for_interpolation),
        )?,
        Commands::MinTimes { input, distances } => cmd_min_times(
            input.as_deref(),
            &distances.unwrap_or_else(|| config.best_splits.distances.clone()),
        )?,
        Commands::DetectIntervals {
            input,
            values,
            window_radius,
            step_threshold,
            input_smoothing_radius,
            discrepancy_smoothing_radius,
            min_interval_duration,
            ftp,
        } => {
            let defaults = config.detection.params;
            let params = IntervalDetectionParams {
                min_interval_duration: min_interval_duration
                    .unwrap_or(defaults.min_interval_duration),
                input_smoothing_radius: input_smoothing_radius
                    .unwrap_or(defaults.input_smoothing_radius),
                discrepancy_smoothing_radius: discrepancy_smoothing_radius
                    .unwrap_or(defaults.discrepancy_smoothing_radius),
                window_radius: window_radius.unwrap_or(defaults.window_radius),
                step_threshold: step_threshold.unwrap_or(defaults.step_threshold),
            };
            params.validate()?;
            let ftp = ftp.unwrap_or(config.detection.ftp);
            cmd_detect_intervals(input.as_deref(), values, &params, ftp)?
        }
    }
    Ok(())
}

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn load_activity(input: Option<&Path>) -> Result<Activity> {
    let points: Vec<ActivityPoint> = match input {
        Some(path) => points_io::read_points_csv(path)?,
        None => points_io::read_points(io::stdin().lock())?,
    };
    info!("loaded {} points", points.len());
    Ok(Activity::from_points(points))
}

fn cmd_fill(input: Option<&Path>) -> Result<()> {
    let activity = load_activity(input)?;
    println!("{}", serde_json::to_string(&activity.filled_points)?);
    Ok(())
}

fn cmd_interpolate(input: Option<&Path>, max_gap: usize) -> Result<()> {
    let values = text_io::parse_nullable_series(&read_input(input)?)?;
    let interpolated = interpolate_null_values(&values, max_gap);
    println!("{}", serde_json::to_string(&interpolated)?);
    Ok(())
}

fn cmd_series(input: Option<&Path>, channel: ChannelArg, options: &ProcessingOptions) -> Result<()> {
    let channel = channel.channel()?;
    let activity = load_activity(input)?;
    let series = processed_time_series(&activity, channel, options);
    println!("{}", serde_json::to_string(&series)?);
    Ok(())
}

fn cmd_best_splits(
    input: Option<&Path>,
    metric: SplitMetric,
    windows: &[usize],
    engine: EngineKind,
    max_gap: usize,
) -> Result<()> {
    let activity = load_activity(input)?;
    let results = best_splits_vs_time(&activity, metric, windows, max_gap, engine.engine());
    println!("{}", serde_json::to_string(&results)?);
    Ok(())
}

fn cmd_min_times(input: Option<&Path>, distances: &[f64]) -> Result<()> {
    let activity = load_activity(input)?;
    let results = min_times_for_activity(&activity, distances)?;
    println!("{}", serde_json::to_string(&results)?);
    Ok(())
}

#[derive(serde::Serialize)]
struct IntervalSummary {
    duration_seconds: usize,
    average: f64,
    intensity_percent: f64,
}

#[derive(serde::Serialize)]
struct DetectionOutput {
    detected_steps: Vec<usize>,
    boundaries: Vec<usize>,
    intervals: Vec<IntervalSummary>,
}

fn summarize(intervals: &[Interval], ftp: f64) -> Vec<IntervalSummary> {
    intervals
        .iter()
        .map(|i| IntervalSummary {
            duration_seconds: i.duration_seconds,
            average: i.average,
            intensity_percent: i.intensity_percent(ftp),
        })
        .collect()
}

fn cmd_detect_intervals(
    input: Option<&Path>,
    values: bool,
    params: &IntervalDetectionParams,
    ftp: f64,
) -> Result<()> {
    let (detected_steps, boundaries, intervals) = if values {
        let samples = text_io::parse_nullable_series(&read_input(input)?)?;
        let intensity: Vec<f64> = samples.iter().map(|v| v.unwrap_or(0.0)).collect();
        let detection = detect_intervals(&intensity, params);
        (
            detection.detected_steps,
            detection.boundaries,
            detection.intervals,
        )
    } else {
        let activity = load_activity(input)?;
        let result = perform_interval_detection(&activity, params);
        (result.detected_steps, result.boundaries, result.intervals)
    };
    let output = DetectionOutput {
        detected_steps,
        boundaries,
        intervals: summarize(&intervals, ftp),
    };
    println!("{}", serde_json::to_string(&output)?);
    Ok(())
}
