//! End-to-end analysis: series -> snow changes -> scores -> periods

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{
    summarize_periods, AnalysisResult, ObservationSeries, PeriodSegmenter, PeriodSummary,
    RiskConfig, RiskPeriod, RiskPoint, RiskScorer, ScoringDiagnostics, SnowAnalysis,
    SnowChangeAnalyzer,
};

/// Everything derived from one station's series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    pub station: Option<String>,
    pub snow: Vec<SnowAnalysis>,
    pub points: Vec<RiskPoint>,
    pub periods: Vec<RiskPeriod>,
    pub diagnostics: ScoringDiagnostics,
}

impl RiskReport {
    pub fn summary(&self) -> PeriodSummary {
        summarize_periods(&self.periods)
    }
}

/// Consumer of finished risk periods (alerting, persistence)
pub trait PeriodSink {
    fn emit(&mut self, station: Option<&str>, period: &RiskPeriod) -> Result<()>;
}

/// Sink that keeps periods in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    pub periods: Vec<(Option<String>, RiskPeriod)>,
}

impl PeriodSink for MemorySink {
    fn emit(&mut self, station: Option<&str>, period: &RiskPeriod) -> Result<()> {
        self.periods.push((station.map(str::to_string), period.clone()));
        Ok(())
    }
}

/// Runs every period of a report through a sink, returning how many were emitted
pub fn emit_periods(report: &RiskReport, sink: &mut dyn PeriodSink) -> Result<usize> {
    for period in &report.periods {
        sink.emit(report.station.as_deref(), period)?;
    }
    Ok(report.periods.len())
}

/// Single entry point combining the analyzer, scorer and segmenter
#[derive(Debug, Clone)]
pub struct RiskAnalyzer {
    snow: SnowChangeAnalyzer,
    scorer: RiskScorer,
    segmenter: PeriodSegmenter,
}

impl RiskAnalyzer {
    /// Build from a validated configuration
    pub fn new(config: RiskConfig) -> AnalysisResult<Self> {
        config.validate()?;

        Ok(Self {
            snow: SnowChangeAnalyzer::new(config.confidence.clone())?,
            segmenter: PeriodSegmenter::from_config(&config)?,
            scorer: RiskScorer::new(config),
        })
    }

    pub fn config(&self) -> &RiskConfig {
        self.scorer.config()
    }

    #[instrument(
        skip(self, series),
        fields(station = series.station().unwrap_or("-"), len = series.len())
    )]
    pub fn analyze(&self, series: &ObservationSeries) -> RiskReport {
        let observations = series.observations();

        let snow = self.snow.analyze(observations);
        let (points, diagnostics) = self.scorer.score_series(observations, &snow);
        let periods = self.segmenter.segment_points(&points);

        info!(
            "Found {} risk periods in {} observations",
            periods.len(),
            observations.len()
        );

        RiskReport {
            station: series.station().map(str::to_string),
            snow,
            points,
            periods,
            diagnostics,
        }
    }
}
