//! Snow-depth change analysis with sensor-noise confidence

use tracing::debug;

use crate::{AnalysisResult, ConfidenceModel, SnowAnalysis, WeatherObservation};

impl ConfidenceModel {
    /// Trust in a reading given its absolute depth and single-step change.
    ///
    /// Penalties stack; the result stays within `[floor, 1.0]` even for an
    /// unvalidated model.
    pub fn confidence(&self, depth: f64, change: f64) -> f64 {
        let floor = self.effective_floor();
        let mut confidence = self.baseline;

        if depth.abs() > self.depth_limit {
            confidence -= self.depth_penalty;
        }
        if change.abs() > self.change_limit {
            confidence -= self.change_penalty;
        }

        if confidence.is_nan() {
            return floor;
        }
        confidence.clamp(floor, 1.0)
    }

    /// Floor pinned to `[0.1, 1.0]`
    fn effective_floor(&self) -> f64 {
        if self.floor.is_nan() {
            0.1
        } else {
            self.floor.clamp(0.1, 1.0)
        }
    }
}

/// Computes depth change and confidence for each adjacent observation pair
#[derive(Debug, Clone, Default)]
pub struct SnowChangeAnalyzer {
    model: ConfidenceModel,
}

impl SnowChangeAnalyzer {
    pub fn new(model: ConfidenceModel) -> AnalysisResult<Self> {
        model.validate()?;
        Ok(Self { model })
    }

    /// One record per adjacent pair, so `len - 1` records for `len >= 2`.
    ///
    /// Returns nothing when the series is too short or carries no snow depth
    /// at all. Pairs with a missing depth are kept but marked invalid.
    pub fn analyze(&self, observations: &[WeatherObservation]) -> Vec<SnowAnalysis> {
        if observations.len() < 2 {
            return Vec::new();
        }
        if !observations
            .iter()
            .any(|o| o.surface_snow_thickness.is_some())
        {
            debug!("No snow depth in series, skipping change analysis");
            return Vec::new();
        }

        let records: Vec<SnowAnalysis> = observations
            .windows(2)
            .map(|pair| self.analyze_pair(&pair[0], &pair[1]))
            .collect();

        let invalid = records.iter().filter(|r| !r.is_valid).count();
        if invalid > 0 {
            debug!(
                "{} of {} snow change records lack a depth on one side",
                invalid,
                records.len()
            );
        }

        records
    }

    fn analyze_pair(
        &self,
        previous: &WeatherObservation,
        current: &WeatherObservation,
    ) -> SnowAnalysis {
        let raw_depth = current.snow_depth();

        match (previous.snow_depth(), raw_depth) {
            (Some(before), Some(after)) => {
                let change = after - before;
                SnowAnalysis {
                    timestamp: current.timestamp,
                    raw_depth,
                    change: Some(change),
                    confidence: self.model.confidence(after, change),
                    is_valid: true,
                }
            }
            _ => SnowAnalysis {
                timestamp: current.timestamp,
                raw_depth,
                change: None,
                confidence: self.model.effective_floor(),
                is_valid: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn at(hour: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap() + Duration::hours(hour)
    }

    fn depths(values: &[Option<f64>]) -> Vec<WeatherObservation> {
        values
            .iter()
            .enumerate()
            .map(|(i, depth)| {
                let mut obs = WeatherObservation::new(at(i as i64));
                obs.surface_snow_thickness = *depth;
                obs
            })
            .collect()
    }

    #[test]
    fn test_confidence_baseline() {
        let model = ConfidenceModel::default();
        assert!((model.confidence(50.0, 3.0) - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_confidence_penalties_stack() {
        let model = ConfidenceModel::default();
        assert!((model.confidence(250.0, 5.0) - 0.6).abs() < 1e-9);
        assert!((model.confidence(50.0, -25.0) - 0.5).abs() < 1e-9);
        assert!((model.confidence(250.0, 25.0) - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_confidence_limits_are_exclusive() {
        let model = ConfidenceModel::default();
        assert!((model.confidence(200.0, 20.0) - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_confidence_floor() {
        let model = ConfidenceModel {
            baseline: 0.4,
            ..ConfidenceModel::default()
        };
        assert_eq!(model.confidence(300.0, 30.0), 0.1);
    }

    #[test]
    fn test_unvalidated_model_stays_in_range() {
        let high_floor = ConfidenceModel {
            floor: 1.5,
            ..ConfidenceModel::default()
        };
        assert_eq!(high_floor.confidence(10.0, 2.0), 1.0);

        let nan_baseline = ConfidenceModel {
            baseline: f64::NAN,
            ..ConfidenceModel::default()
        };
        assert_eq!(nan_baseline.confidence(10.0, 1.0), 0.1);

        let nan_floor = ConfidenceModel {
            floor: f64::NAN,
            ..ConfidenceModel::default()
        };
        assert!((nan_floor.confidence(250.0, 25.0) - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_analyzer_rejects_invalid_model() {
        let model = ConfidenceModel {
            floor: 1.5,
            ..ConfidenceModel::default()
        };
        assert!(SnowChangeAnalyzer::new(model).is_err());

        let model = ConfidenceModel {
            baseline: f64::NAN,
            ..ConfidenceModel::default()
        };
        assert!(SnowChangeAnalyzer::new(model).is_err());

        let analyzer = SnowChangeAnalyzer::new(ConfidenceModel::default()).unwrap();
        let records = analyzer.analyze(&depths(&[Some(10.0), Some(12.0)]));
        assert_eq!(records.len(), 1);
        assert!((records[0].confidence - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_changes_for_each_pair() {
        let analyzer = SnowChangeAnalyzer::default();
        let obs = depths(&[Some(10.0), Some(12.0), Some(8.0), Some(15.0), Some(11.0)]);

        let records = analyzer.analyze(&obs);
        let changes: Vec<_> = records.iter().map(|r| r.change).collect();

        assert_eq!(records.len(), 4);
        assert_eq!(
            changes,
            vec![Some(2.0), Some(-4.0), Some(7.0), Some(-4.0)]
        );
        assert!(records.iter().all(|r| r.is_valid));
        assert_eq!(records[0].timestamp, at(1));
        assert_eq!(records[3].raw_depth, Some(11.0));
    }

    #[test]
    fn test_missing_depth_marks_invalid() {
        let analyzer = SnowChangeAnalyzer::default();
        let obs = depths(&[Some(10.0), Some(f64::NAN), Some(14.0), Some(15.0)]);

        let records = analyzer.analyze(&obs);

        assert_eq!(records.len(), 3);
        assert!(!records[0].is_valid);
        assert!(!records[1].is_valid);
        assert!(records[2].is_valid);
        assert_eq!(records[0].change, None);
        assert_eq!(records[0].confidence, 0.1);
        assert_eq!(records[2].change, Some(1.0));
    }

    #[test]
    fn test_short_or_depthless_input_is_empty() {
        let analyzer = SnowChangeAnalyzer::default();

        assert!(analyzer.analyze(&[]).is_empty());
        assert!(analyzer.analyze(&depths(&[Some(10.0)])).is_empty());
        assert!(analyzer.analyze(&depths(&[None, None, None])).is_empty());
    }
}
