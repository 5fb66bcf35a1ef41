//! Core data types, scoring, and risk-period segmentation for snowdrift analysis
//!
//! This crate turns an ordered series of hourly station observations into a
//! per-timestamp risk score and a list of maintenance-relevant risk periods.
//! Everything here is a pure, synchronous transform; fetching observations and
//! persisting results belong to the caller.

pub mod config;
pub mod error;
pub mod periods;
pub mod pipeline;
pub mod rollups;
pub mod scoring;
pub mod snow;
pub mod types;
pub mod units;

pub use config::*;
pub use error::*;
pub use periods::*;
pub use pipeline::*;
pub use rollups::*;
pub use scoring::*;
pub use snow::*;
pub use types::*;
pub use units::*;
