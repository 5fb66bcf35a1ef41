//! Aggregate statistics over runs of risk scores and over whole reports

use serde::{Deserialize, Serialize};

use crate::RiskPeriod;

/// Running max/mean over the scores of one period
#[derive(Debug, Clone, Default)]
pub struct ScoreAccumulator {
    count: usize,
    sum: f64,
    max: Option<f64>,
}

impl ScoreAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.max = Some(self.max.map_or(value, |m| m.max(value)));
    }

    pub fn max(&self) -> Option<f64> {
        self.max
    }

    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        Some(self.sum / self.count as f64)
    }
}

impl Extend<f64> for ScoreAccumulator {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}

/// Headline numbers handed to alerting collaborators
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub period_count: usize,
    /// Observations covered by all periods together
    pub high_risk_observations: usize,
    pub longest_duration: usize,
    pub peak_score: Option<f64>,
}

pub fn summarize_periods(periods: &[RiskPeriod]) -> PeriodSummary {
    let mut peak = ScoreAccumulator::new();
    peak.extend(periods.iter().map(|p| p.max_risk_score));

    PeriodSummary {
        period_count: periods.len(),
        high_risk_observations: periods.iter().map(|p| p.duration).sum(),
        longest_duration: periods.iter().map(|p| p.duration).max().unwrap_or(0),
        peak_score: peak.max(),
    }
}
