//! Segmentation of a high-risk mask into contiguous risk periods
//!
//! A two-state scan over the mask. The sequence is treated as if preceded and
//! followed by `false`, so runs starting at index 0 and runs still open at the
//! last index are both closed and emitted.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::{AnalysisError, AnalysisResult, RiskConfig, RiskPeriod, RiskPoint, ScoreAccumulator};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SegmentState {
    Outside,
    Inside { start: usize },
}

/// Splits a boolean high-risk sequence into periods of at least `min_duration`
#[derive(Debug, Clone)]
pub struct PeriodSegmenter {
    min_duration: usize,
}

impl Default for PeriodSegmenter {
    fn default() -> Self {
        Self { min_duration: 2 }
    }
}

impl PeriodSegmenter {
    pub fn new(min_duration: usize) -> AnalysisResult<Self> {
        if min_duration == 0 {
            return Err(AnalysisError::InvalidConfig(
                "min_duration must be at least 1".to_string(),
            ));
        }
        Ok(Self { min_duration })
    }

    pub fn from_config(config: &RiskConfig) -> AnalysisResult<Self> {
        Self::new(config.min_duration)
    }

    /// Segment an explicit mask aligned with `timestamps` and `scores`
    pub fn segment(
        &self,
        timestamps: &[DateTime<Utc>],
        is_high_risk: &[bool],
        scores: &[f64],
    ) -> AnalysisResult<Vec<RiskPeriod>> {
        if timestamps.len() != is_high_risk.len() || scores.len() != is_high_risk.len() {
            return Err(AnalysisError::LengthMismatch {
                timestamps: timestamps.len(),
                flags: is_high_risk.len(),
                scores: scores.len(),
            });
        }

        let mut periods = Vec::new();
        let mut state = SegmentState::Outside;

        for (i, &high) in is_high_risk.iter().enumerate() {
            state = match (state, high) {
                (SegmentState::Outside, true) => SegmentState::Inside { start: i },
                (SegmentState::Inside { start }, false) => {
                    self.close(start, i - 1, timestamps, scores, &mut periods);
                    SegmentState::Outside
                }
                (unchanged, _) => unchanged,
            };
        }

        if let SegmentState::Inside { start } = state {
            self.close(start, is_high_risk.len() - 1, timestamps, scores, &mut periods);
        }

        Ok(periods)
    }

    /// Segment using `score >= threshold` as the mask
    pub fn segment_scores(
        &self,
        timestamps: &[DateTime<Utc>],
        scores: &[f64],
        threshold: f64,
    ) -> AnalysisResult<Vec<RiskPeriod>> {
        let mask: Vec<bool> = scores.iter().map(|&s| s >= threshold).collect();
        self.segment(timestamps, &mask, scores)
    }

    /// Segment already-scored points
    pub fn segment_points(&self, points: &[RiskPoint]) -> Vec<RiskPeriod> {
        let timestamps: Vec<DateTime<Utc>> = points.iter().map(|p| p.timestamp).collect();
        let mask: Vec<bool> = points.iter().map(|p| p.is_high_risk).collect();
        let scores: Vec<f64> = points.iter().map(|p| p.score).collect();

        // All three slices come from the same points
        self.segment(&timestamps, &mask, &scores).unwrap_or_default()
    }

    fn close(
        &self,
        start: usize,
        end: usize,
        timestamps: &[DateTime<Utc>],
        scores: &[f64],
        periods: &mut Vec<RiskPeriod>,
    ) {
        let duration = end - start + 1;
        if duration < self.min_duration {
            debug!(
                "Dropping run {}..={} shorter than {} observations",
                start, end, self.min_duration
            );
            return;
        }

        let mut stats = ScoreAccumulator::new();
        stats.extend(scores[start..=end].iter().copied());

        periods.push(RiskPeriod {
            start_time: timestamps[start],
            end_time: timestamps[end],
            start_index: start,
            end_index: end,
            duration,
            max_risk_score: stats.max().unwrap_or_default(),
            avg_risk_score: stats.mean().unwrap_or_default(),
        });
    }
}
