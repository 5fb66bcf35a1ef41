//! Unit normalization for incoming observations
//!
//! Scoring cutoffs are expressed in cm of snow and m/s of wind. Feeds that
//! report other units are converted here before analysis.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::WeatherObservation;

/// Unit conversion error
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum UnitError {
    #[error("Unknown depth unit: {0}")]
    UnknownDepthUnit(String),

    #[error("Unknown speed unit: {0}")]
    UnknownSpeedUnit(String),
}

/// Snow depth unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepthUnit {
    Mm,
    #[default]
    Cm,
    M,
}

impl DepthUnit {
    /// Convert a depth in this unit to centimetres
    pub fn to_cm(self, value: f64) -> f64 {
        match self {
            DepthUnit::Mm => value / 10.0,
            DepthUnit::Cm => value,
            DepthUnit::M => value * 100.0,
        }
    }
}

impl FromStr for DepthUnit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mm" => Ok(DepthUnit::Mm),
            "cm" => Ok(DepthUnit::Cm),
            "m" => Ok(DepthUnit::M),
            other => Err(UnitError::UnknownDepthUnit(other.to_string())),
        }
    }
}

/// Wind speed unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpeedUnit {
    #[default]
    #[serde(rename = "m/s")]
    MetersPerSecond,
    #[serde(rename = "km/h")]
    KilometersPerHour,
    #[serde(rename = "knots")]
    Knots,
}

impl SpeedUnit {
    /// Convert a speed in this unit to m/s
    pub fn to_mps(self, value: f64) -> f64 {
        match self {
            SpeedUnit::MetersPerSecond => value,
            SpeedUnit::KilometersPerHour => value / 3.6,
            SpeedUnit::Knots => value * 0.514444,
        }
    }
}

impl FromStr for SpeedUnit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "m/s" | "mps" => Ok(SpeedUnit::MetersPerSecond),
            "km/h" | "kph" => Ok(SpeedUnit::KilometersPerHour),
            "knots" | "kt" => Ok(SpeedUnit::Knots),
            other => Err(UnitError::UnknownSpeedUnit(other.to_string())),
        }
    }
}

/// Rewrite depth and wind fields into cm and m/s
pub fn normalize_observation(
    mut obs: WeatherObservation,
    depth: DepthUnit,
    speed: SpeedUnit,
) -> WeatherObservation {
    obs.surface_snow_thickness = obs.surface_snow_thickness.map(|v| depth.to_cm(v));
    obs.wind_speed = obs.wind_speed.map(|v| speed.to_mps(v));
    obs.wind_gust = obs.wind_gust.map(|v| speed.to_mps(v));
    obs
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_depth_conversion() {
        assert_eq!(DepthUnit::Mm.to_cm(250.0), 25.0);
        assert_eq!(DepthUnit::Cm.to_cm(25.0), 25.0);
        assert_eq!(DepthUnit::M.to_cm(0.25), 25.0);
    }

    #[test]
    fn test_speed_conversion() {
        assert!((SpeedUnit::KilometersPerHour.to_mps(36.0) - 10.0).abs() < 1e-9);
        assert!((SpeedUnit::Knots.to_mps(10.0) - 5.14444).abs() < 1e-6);
        assert_eq!(SpeedUnit::MetersPerSecond.to_mps(7.0), 7.0);
    }

    #[test]
    fn test_unit_parsing() {
        assert_eq!("MM".parse::<DepthUnit>(), Ok(DepthUnit::Mm));
        assert_eq!("kph".parse::<SpeedUnit>(), Ok(SpeedUnit::KilometersPerHour));
        assert_eq!(
            "inch".parse::<DepthUnit>(),
            Err(UnitError::UnknownDepthUnit("inch".to_string()))
        );
    }

    #[test]
    fn test_normalize_observation() {
        let mut obs = WeatherObservation::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        obs.surface_snow_thickness = Some(420.0);
        obs.wind_speed = Some(36.0);
        obs.air_temperature = Some(-3.0);

        let normalized = normalize_observation(obs, DepthUnit::Mm, SpeedUnit::KilometersPerHour);

        assert_eq!(normalized.surface_snow_thickness, Some(42.0));
        assert!((normalized.wind_speed.unwrap() - 10.0).abs() < 1e-9);
        assert_eq!(normalized.wind_gust, None);
        assert_eq!(normalized.air_temperature, Some(-3.0));
    }
}
