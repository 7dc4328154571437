//! Anomaly classification types

use serde::{Deserialize, Serialize};

/// Market status derived from the rolling window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketStatus {
    /// Window holds too few samples to be statistically meaningful
    Calibrating,
    /// All window prices identical (zero deviation)
    Stable,
    /// Price within the anomaly threshold
    Normal,
    /// Price more than the threshold above the window mean
    PumpDetected,
    /// Price more than the threshold below the window mean
    DumpDetected,
}

/// Verdict for a single tick against the rolling window
///
/// Derived and stateless: recomputed for every tick, never persisted.
/// `z_score` and `mean_price` are rounded to 2 decimals for presentation;
/// threshold comparison happens on the unrounded value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub status: MarketStatus,
    pub z_score: f64,
    pub mean_price: f64,
}
