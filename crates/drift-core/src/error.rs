//! Error types for programmer errors in the analysis core
//!
//! Data-quality problems (missing fields, empty series, implausible readings)
//! never surface here; they degrade results instead.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Observation {index} at {timestamp} is not after the previous observation")]
    OutOfOrder {
        index: usize,
        timestamp: DateTime<Utc>,
    },

    #[error("Length mismatch: {timestamps} timestamps, {flags} flags, {scores} scores")]
    LengthMismatch {
        timestamps: usize,
        flags: usize,
        scores: usize,
    },
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
