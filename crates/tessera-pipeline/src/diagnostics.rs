//! Run diagnostics: timing and grid metrics for each pipeline stage.
//!
//! These diagnostics are permanent instrumentation intended for
//! parameter experimentation and performance tuning — see
//! [`process_with_diagnostics`](crate::process_with_diagnostics).
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since [`std::time::Duration`] does not implement serde
//! traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::Dimensions;

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Diagnostics collected from a single mosaic run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MosaicDiagnostics {
    /// Configuration resolution duration (seconds).
    #[serde(with = "duration_serde")]
    pub resolve: Duration,

    /// Block grid planning duration (seconds).
    #[serde(with = "duration_serde")]
    pub plan: Duration,

    /// Parallel reduce-and-expand duration (seconds), including the
    /// worker-pool join barrier.
    #[serde(with = "duration_serde")]
    pub mosaic: Duration,

    /// Total wall-clock duration of the run (seconds).
    #[serde(with = "duration_serde")]
    pub total: Duration,

    /// Grid and scheduling metrics for the run.
    pub summary: RunSummary,
}

/// Grid and scheduling metrics from a single run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Source (and output) image dimensions.
    pub dimensions: Dimensions,
    /// Resolved block side length in pixels.
    pub block_size: u32,
    /// Number of blocks along the horizontal axis.
    pub blocks_x: u32,
    /// Number of blocks along the vertical axis.
    pub blocks_y: u32,
    /// Total block count (`blocks_x * blocks_y`).
    pub block_count: usize,
    /// Worker threads available to the pool.
    pub workers: usize,
}
