//! Weighted multi-factor risk scoring
//!
//! Each observation gets three independent contributions (wind, temperature,
//! snow-depth change), each already scaled by its weight. The score is their
//! sum clipped to `[0, 1]`. A missing input zeroes its own contribution and is
//! counted in [`ScoringDiagnostics`]; it never stops the batch.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{RiskConfig, RiskPoint, SnowAnalysis, WeatherObservation};

/// Counters for degraded sub-scores across one batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringDiagnostics {
    pub scored: usize,
    pub missing_wind: usize,
    pub missing_temperature: usize,
    /// Points after the first whose snow change was absent or invalid
    pub missing_snow_change: usize,
    pub stability_uplifts: usize,
}

impl ScoringDiagnostics {
    pub fn degraded(&self) -> usize {
        self.missing_wind + self.missing_temperature + self.missing_snow_change
    }
}

/// Population standard deviation, `None` below two values
fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some(variance.sqrt())
}

/// Short-window wind variability per observation.
///
/// The metric is the larger of the trailing-window standard deviation of
/// wind speed and the gust spread (`gust - speed`) at that point. `None` when
/// neither can be computed.
pub fn wind_stability(observations: &[WeatherObservation], window: usize) -> Vec<Option<f64>> {
    let window = window.max(1);

    observations
        .iter()
        .enumerate()
        .map(|(i, obs)| {
            let start = (i + 1).saturating_sub(window);
            let speeds: Vec<f64> = observations[start..=i]
                .iter()
                .filter_map(WeatherObservation::wind)
                .collect();

            let spread = std_dev(&speeds);
            let gust_spread = match (obs.gust(), obs.wind()) {
                (Some(gust), Some(speed)) => Some((gust - speed).max(0.0)),
                _ => None,
            };

            match (spread, gust_spread) {
                (Some(a), Some(b)) => Some(a.max(b)),
                (a, b) => a.or(b),
            }
        })
        .collect()
}

/// Scores observations against one [`RiskConfig`]
#[derive(Debug, Clone, Default)]
pub struct RiskScorer {
    config: RiskConfig,
}

impl RiskScorer {
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// Weighted wind contribution, or `None` when speed is missing
    pub fn wind_score(&self, speed: Option<f64>, stability: Option<f64>) -> Option<f64> {
        let wind = &self.config.wind;
        let speed = speed?;

        let base = if speed >= wind.strong {
            wind.weight
        } else if speed >= wind.moderate {
            wind.weight * wind.moderate_fraction
        } else {
            0.0
        };

        if self.uplift_applies(stability) {
            Some(base * self.config.stability.uplift)
        } else {
            Some(base)
        }
    }

    fn uplift_applies(&self, stability: Option<f64>) -> bool {
        let cfg = &self.config.stability;
        cfg.enabled && stability.is_some_and(|s| s > cfg.noise_threshold)
    }

    /// Weighted temperature contribution, linear between the cool and cold cutoffs
    pub fn temperature_score(&self, temperature: Option<f64>) -> Option<f64> {
        let temp = &self.config.temperature;
        let t = temperature?;

        let score = if t < temp.cold {
            temp.weight
        } else if t < temp.cool {
            temp.weight * (temp.cool - t) / (temp.cool - temp.cold)
        } else {
            0.0
        };
        Some(score)
    }

    /// Weighted snow contribution from the magnitude of a depth change
    pub fn snow_score(&self, change: Option<f64>) -> Option<f64> {
        let snow = &self.config.snow;
        let magnitude = change?.abs();

        let score = if magnitude >= snow.high {
            snow.weight
        } else if magnitude >= snow.moderate {
            snow.weight * snow.moderate_fraction
        } else if magnitude >= snow.low {
            snow.weight * snow.low_fraction
        } else {
            0.0
        };
        Some(score)
    }

    /// Score a single observation.
    ///
    /// `snow_change` is the valid depth change ending at this observation, if any.
    pub fn score(
        &self,
        obs: &WeatherObservation,
        snow_change: Option<f64>,
        stability: Option<f64>,
    ) -> RiskPoint {
        let wind = self.wind_score(obs.wind(), stability).unwrap_or(0.0);
        let temperature = self.temperature_score(obs.temperature()).unwrap_or(0.0);
        let snow = self.snow_score(snow_change).unwrap_or(0.0);

        let score = (wind + temperature + snow).clamp(0.0, 1.0);

        RiskPoint {
            timestamp: obs.timestamp,
            score,
            is_high_risk: score >= self.config.threshold,
            wind,
            temperature,
            snow,
        }
    }

    /// Score a whole series, pairing each point with the snow record ending at it
    pub fn score_series(
        &self,
        observations: &[WeatherObservation],
        snow: &[SnowAnalysis],
    ) -> (Vec<RiskPoint>, ScoringDiagnostics) {
        let stability = wind_stability(observations, self.config.stability.window);
        let mut diagnostics = ScoringDiagnostics::default();

        let points: Vec<RiskPoint> = observations
            .iter()
            .enumerate()
            .map(|(i, obs)| {
                let record = i
                    .checked_sub(1)
                    .and_then(|k| snow.get(k))
                    .filter(|r| r.timestamp == obs.timestamp && r.is_valid);
                let change = record.and_then(|r| r.change);

                if obs.wind().is_none() {
                    diagnostics.missing_wind += 1;
                    debug!(timestamp = %obs.timestamp, "wind speed missing, wind contributes 0");
                }
                if obs.temperature().is_none() {
                    diagnostics.missing_temperature += 1;
                    debug!(
                        timestamp = %obs.timestamp,
                        "air temperature missing, temperature contributes 0"
                    );
                }
                if i > 0 && change.is_none() {
                    diagnostics.missing_snow_change += 1;
                    debug!(
                        timestamp = %obs.timestamp,
                        "snow change unavailable, snow contributes 0"
                    );
                }

                let point = self.score(obs, change, stability[i]);
                if point.wind > 0.0 && self.uplift_applies(stability[i]) {
                    diagnostics.stability_uplifts += 1;
                }
                diagnostics.scored += 1;
                point
            })
            .collect();

        if diagnostics.scored > 0 {
            if diagnostics.missing_wind == diagnostics.scored
                || diagnostics.missing_temperature == diagnostics.scored
            {
                warn!(
                    "Scores degenerate: wind missing {}/{}, temperature missing {}/{}",
                    diagnostics.missing_wind,
                    diagnostics.scored,
                    diagnostics.missing_temperature,
                    diagnostics.scored
                );
            }
            info!(
                "Scored {} observations ({} degraded sub-scores, {} stability uplifts)",
                diagnostics.scored,
                diagnostics.degraded(),
                diagnostics.stability_uplifts
            );
        }

        (points, diagnostics)
    }
}
