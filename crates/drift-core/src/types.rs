//! Core data types for station observations and derived risk records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AnalysisError, AnalysisResult};

/// Keep a measurement only when it is present and finite
fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// One sensor reading at one timestamp
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherObservation {
    pub timestamp: DateTime<Utc>,

    /// Air temperature (°C)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub air_temperature: Option<f64>,

    /// Mean wind speed (m/s)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<f64>,

    /// Wind direction (degrees, meteorological "from")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_from_direction: Option<f64>,

    /// Max gust over the interval (m/s)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_gust: Option<f64>,

    /// Snow depth (cm once normalized)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface_snow_thickness: Option<f64>,

    /// Precipitation over the interval (mm)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precipitation_amount: Option<f64>,
}

impl WeatherObservation {
    /// Observation with only a timestamp; fields are filled in by the caller
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            air_temperature: None,
            wind_speed: None,
            wind_from_direction: None,
            wind_gust: None,
            surface_snow_thickness: None,
            precipitation_amount: None,
        }
    }

    pub fn temperature(&self) -> Option<f64> {
        finite(self.air_temperature)
    }

    pub fn wind(&self) -> Option<f64> {
        finite(self.wind_speed)
    }

    pub fn gust(&self) -> Option<f64> {
        finite(self.wind_gust)
    }

    pub fn snow_depth(&self) -> Option<f64> {
        finite(self.surface_snow_thickness)
    }
}

/// Time-ordered observations for a single station
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationSeries {
    station: Option<String>,
    observations: Vec<WeatherObservation>,
}

impl ObservationSeries {
    /// Build a series, rejecting timestamps that are not strictly ascending.
    ///
    /// The input is never re-sorted: unordered data is a caller error.
    pub fn new(
        station: Option<String>,
        observations: Vec<WeatherObservation>,
    ) -> AnalysisResult<Self> {
        for (index, pair) in observations.windows(2).enumerate() {
            if pair[1].timestamp <= pair[0].timestamp {
                return Err(AnalysisError::OutOfOrder {
                    index: index + 1,
                    timestamp: pair[1].timestamp,
                });
            }
        }

        Ok(Self {
            station,
            observations,
        })
    }

    pub fn station(&self) -> Option<&str> {
        self.station.as_deref()
    }

    pub fn observations(&self) -> &[WeatherObservation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// Snow-depth change between two adjacent observations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnowAnalysis {
    /// Timestamp of the later observation of the pair
    pub timestamp: DateTime<Utc>,
    pub raw_depth: Option<f64>,
    /// `None` when either depth of the pair is missing
    pub change: Option<f64>,
    pub confidence: f64,
    pub is_valid: bool,
}

/// Scored observation with its per-factor breakdown
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskPoint {
    pub timestamp: DateTime<Utc>,
    pub score: f64,
    pub is_high_risk: bool,
    pub wind: f64,
    pub temperature: f64,
    pub snow: f64,
}

/// Contiguous span of high-risk observations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskPeriod {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub start_index: usize,
    pub end_index: usize,
    /// Number of contributing observations
    pub duration: usize,
    pub max_risk_score: f64,
    pub avg_risk_score: f64,
}
