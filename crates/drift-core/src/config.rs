//! Scoring and segmentation parameters
//!
//! A single [`RiskConfig`] value is passed into every component. Calibration
//! sweeps build many of these side by side, so nothing here is global.

use serde::{Deserialize, Serialize};

use crate::{AnalysisError, AnalysisResult};

/// Wind speed cutoffs (m/s) and weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindThresholds {
    pub moderate: f64,
    pub strong: f64,
    pub weight: f64,
    /// Share of the weight granted between the moderate and strong cutoffs
    pub moderate_fraction: f64,
}

impl Default for WindThresholds {
    fn default() -> Self {
        Self {
            moderate: 6.0,
            strong: 10.0,
            weight: 0.4,
            moderate_fraction: 0.6,
        }
    }
}

/// Uplift applied to the wind contribution when wind is gusty or unsteady
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilityConfig {
    pub enabled: bool,
    /// Trailing window length in observations
    pub window: usize,
    /// Variability (m/s) above which the uplift applies
    pub noise_threshold: f64,
    pub uplift: f64,
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window: 3,
            noise_threshold: 2.0,
            uplift: 1.2,
        }
    }
}

/// Air temperature cutoffs (°C) and weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemperatureThresholds {
    /// At or above this, temperature contributes nothing
    pub cool: f64,
    /// Below this, temperature contributes its full weight
    pub cold: f64,
    pub weight: f64,
}

impl Default for TemperatureThresholds {
    fn default() -> Self {
        Self {
            cool: 0.0,
            cold: -5.0,
            weight: 0.3,
        }
    }
}

/// Snow-depth change magnitude cutoffs (cm per step) and weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnowChangeThresholds {
    pub low: f64,
    pub moderate: f64,
    pub high: f64,
    pub weight: f64,
    pub low_fraction: f64,
    pub moderate_fraction: f64,
}

impl Default for SnowChangeThresholds {
    fn default() -> Self {
        Self {
            low: 1.0,
            moderate: 2.0,
            high: 5.0,
            weight: 0.3,
            low_fraction: 0.3,
            moderate_fraction: 0.6,
        }
    }
}

/// Trust model for snow-depth change readings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceModel {
    pub baseline: f64,
    pub depth_limit: f64,
    pub depth_penalty: f64,
    pub change_limit: f64,
    pub change_penalty: f64,
    pub floor: f64,
}

impl Default for ConfidenceModel {
    fn default() -> Self {
        Self {
            baseline: 0.8,
            depth_limit: 200.0,
            depth_penalty: 0.2,
            change_limit: 20.0,
            change_penalty: 0.3,
            floor: 0.1,
        }
    }
}

/// Complete parameter set for one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    pub wind: WindThresholds,
    pub stability: StabilityConfig,
    pub temperature: TemperatureThresholds,
    pub snow: SnowChangeThresholds,
    pub confidence: ConfidenceModel,
    /// Score at or above which a point counts as high risk
    pub threshold: f64,
    /// Minimum number of observations in an emitted period
    pub min_duration: usize,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            wind: WindThresholds::default(),
            stability: StabilityConfig::default(),
            temperature: TemperatureThresholds::default(),
            snow: SnowChangeThresholds::default(),
            confidence: ConfidenceModel::default(),
            threshold: 0.6,
            min_duration: 2,
        }
    }
}

fn check(ok: bool, message: impl FnOnce() -> String) -> AnalysisResult<()> {
    if ok {
        Ok(())
    } else {
        Err(AnalysisError::InvalidConfig(message()))
    }
}

fn is_fraction(v: f64) -> bool {
    (0.0..=1.0).contains(&v)
}

impl RiskConfig {
    /// Reject parameter sets that no calibration could have intended
    pub fn validate(&self) -> AnalysisResult<()> {
        check(self.min_duration >= 1, || {
            "min_duration must be at least 1".to_string()
        })?;
        check(is_fraction(self.threshold), || {
            format!("threshold {} outside [0, 1]", self.threshold)
        })?;

        for (name, weight) in [
            ("wind", self.wind.weight),
            ("temperature", self.temperature.weight),
            ("snow", self.snow.weight),
        ] {
            check(weight.is_finite() && weight >= 0.0, || {
                format!("{name} weight {weight} must be non-negative")
            })?;
        }

        check(self.wind.moderate <= self.wind.strong, || {
            format!(
                "wind moderate cutoff {} above strong cutoff {}",
                self.wind.moderate, self.wind.strong
            )
        })?;
        check(is_fraction(self.wind.moderate_fraction), || {
            "wind moderate_fraction outside [0, 1]".to_string()
        })?;
        check(self.temperature.cold < self.temperature.cool, || {
            format!(
                "temperature cold cutoff {} must be below cool cutoff {}",
                self.temperature.cold, self.temperature.cool
            )
        })?;
        check(
            self.snow.low <= self.snow.moderate && self.snow.moderate <= self.snow.high,
            || {
                format!(
                    "snow cutoffs must be ordered low <= moderate <= high, got {} / {} / {}",
                    self.snow.low, self.snow.moderate, self.snow.high
                )
            },
        )?;
        check(
            is_fraction(self.snow.low_fraction) && is_fraction(self.snow.moderate_fraction),
            || "snow fractions outside [0, 1]".to_string(),
        )?;
        check(self.stability.window >= 2, || {
            "stability window must cover at least 2 observations".to_string()
        })?;
        check(self.stability.uplift >= 1.0, || {
            format!("stability uplift {} below 1.0", self.stability.uplift)
        })?;
        self.confidence.validate()?;

        Ok(())
    }
}

impl ConfidenceModel {
    /// Reject models whose output could leave `[0.1, 1.0]` or be NaN
    pub fn validate(&self) -> AnalysisResult<()> {
        for (name, value) in [
            ("baseline", self.baseline),
            ("depth_limit", self.depth_limit),
            ("depth_penalty", self.depth_penalty),
            ("change_limit", self.change_limit),
            ("change_penalty", self.change_penalty),
        ] {
            check(value.is_finite(), || {
                format!("confidence {name} {value} must be finite")
            })?;
        }
        check((0.1..=1.0).contains(&self.floor), || {
            format!("confidence floor {} outside [0.1, 1]", self.floor)
        })?;

        Ok(())
    }
}
