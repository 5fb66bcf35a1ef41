use std::fs::{create_dir_all, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use drift_config::InputConfig;
use drift_core::{
    normalize_observation, ObservationSeries, PeriodSink, RiskAnalyzer, RiskPeriod, RiskReport,
    WeatherObservation,
};
use serde::Serialize;
use tokio::task::{spawn_blocking, JoinError};

/// Station id taken from the file stem (`SN18700.jsonl` -> `SN18700`)
pub fn station_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.trim_end_matches(".observations").to_string())
}

/// Read one observation per line, converting to cm and m/s
pub fn load_observations(path: &Path, input: &InputConfig) -> Result<Vec<WeatherObservation>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;

    let mut observations = Vec::new();
    for (n, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read {}", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        let obs: WeatherObservation = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: invalid observation", path.display(), n + 1))?;
        observations.push(normalize_observation(obs, input.depth_unit, input.speed_unit));
    }

    Ok(observations)
}

/// Load, validate and analyze a single station file
pub fn analyze_file(
    path: &Path,
    analyzer: &RiskAnalyzer,
    input: &InputConfig,
    station: Option<String>,
) -> Result<RiskReport> {
    let observations = load_observations(path, input)?;
    let station = station.or_else(|| station_from_path(path));
    let series = ObservationSeries::new(station, observations)
        .with_context(|| format!("{}: observations out of order", path.display()))?;

    Ok(analyzer.analyze(&series))
}

/// Analyze every file on the blocking pool; results keep the input order.
///
/// Files are independent, so one failure does not affect the others. A
/// configured `station` id wins over the id derived from each file name.
pub async fn analyze_files(
    paths: Vec<PathBuf>,
    analyzer: Arc<RiskAnalyzer>,
    input: InputConfig,
    station: Option<String>,
) -> Vec<(PathBuf, Result<RiskReport>)> {
    let handles: Vec<_> = paths
        .into_iter()
        .map(|path| {
            let analyzer = Arc::clone(&analyzer);
            let input = input.clone();
            let station = station.clone();
            let task_path = path.clone();
            let handle =
                spawn_blocking(move || analyze_file(&task_path, &analyzer, &input, station));
            (path, handle)
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for (path, handle) in handles {
        results.push(task_result(path, handle.await));
    }
    results
}

/// A task that panicked or was cancelled still yields an entry for its file
fn task_result(
    path: PathBuf,
    joined: std::result::Result<Result<RiskReport>, JoinError>,
) -> (PathBuf, Result<RiskReport>) {
    match joined {
        Ok(result) => (path, result),
        Err(e) => {
            tracing::error!(file = %path.display(), error = ?e, "analysis task failed");
            let context = format!("{}: analysis task failed", path.display());
            (path, Err(anyhow::Error::new(e).context(context)))
        }
    }
}

#[derive(Serialize)]
struct PeriodRecord<'a> {
    station: Option<&'a str>,
    #[serde(flatten)]
    period: &'a RiskPeriod,
}

/// Writes periods as JSON lines
pub struct JsonlSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonlSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl JsonlSink<File> {
    /// Append to `<dir>/periods.jsonl`, creating the directory if needed
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        create_dir_all(dir)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join("periods.jsonl"))?;
        Ok(Self::new(file))
    }
}

impl<W: Write> PeriodSink for JsonlSink<W> {
    fn emit(&mut self, station: Option<&str>, period: &RiskPeriod) -> Result<()> {
        let line = serde_json::to_string(&PeriodRecord { station, period })?;
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}
