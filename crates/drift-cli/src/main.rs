//! snowdrift - score station observations and report risk periods
//!
//! ```text
//! snowdrift data/SN18700.jsonl data/SN90450.jsonl
//! snowdrift --config snowdrift.toml --output-dir out/ data/*.jsonl
//! ```
//!
//! Each input file holds one station's observations as JSON lines. Periods
//! are written as JSON lines to stdout or to `<output-dir>/periods.jsonl`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use drift_config::AppConfig;
use drift_core::{emit_periods, PeriodSink, RiskAnalyzer};
use drift_obs::LogFormat;
use tracing::{info, warn};

#[derive(Parser)]
#[command(
    name = "snowdrift",
    about = "Snowdrift and slippery-road risk periods from station observations"
)]
struct Args {
    /// Observation files (JSON lines), one station per file
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Configuration file (defaults to $SNOWDRIFT_CONFIG or snowdrift.toml)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Write periods to this directory instead of stdout
    #[arg(long, short = 'o')]
    output_dir: Option<PathBuf>,

    /// Override the high-risk score threshold
    #[arg(long)]
    threshold: Option<f64>,

    /// Override the minimum period duration (observations)
    #[arg(long)]
    min_duration: Option<usize>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    drift_obs::init(
        "snowdrift",
        if args.json_logs {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        },
    );

    let mut config = match &args.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => AppConfig::load().context("Failed to load configuration")?,
    };
    if let Some(threshold) = args.threshold {
        config.risk.threshold = threshold;
    }
    if let Some(min_duration) = args.min_duration {
        config.risk.min_duration = min_duration;
    }

    let analyzer = Arc::new(
        RiskAnalyzer::new(config.risk.clone()).context("Invalid risk configuration")?,
    );
    info!(
        "Analyzing {} files (threshold {}, min duration {})",
        args.files.len(),
        config.risk.threshold,
        config.risk.min_duration
    );

    let results = drift_cli::analyze_files(
        args.files,
        analyzer,
        config.input.clone(),
        config.station_id().map(str::to_string),
    )
    .await;

    let output_dir = args.output_dir.or_else(|| config.output_dir().map(PathBuf::from));
    let mut sink: Box<dyn PeriodSink> = match output_dir {
        Some(dir) => Box::new(drift_cli::JsonlSink::in_dir(&dir).with_context(|| {
            format!("Failed to open output directory {}", dir.display())
        })?),
        None => Box::new(drift_cli::JsonlSink::new(std::io::stdout())),
    };

    let mut failed = 0;
    for (path, result) in results {
        match result {
            Ok(report) => {
                let emitted = emit_periods(&report, sink.as_mut())?;
                let summary = report.summary();
                info!(
                    file = %path.display(),
                    station = report.station.as_deref().unwrap_or("-"),
                    "{} periods, {} high-risk observations, peak {:.2}",
                    emitted,
                    summary.high_risk_observations,
                    summary.peak_score.unwrap_or(0.0)
                );
            }
            Err(e) => {
                warn!(file = %path.display(), "Skipping file: {:#}", e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{} input files could not be analyzed", failed);
    }
    Ok(())
}
