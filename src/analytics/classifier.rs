//! Z-score anomaly classifier

use super::types::{Classification, MarketStatus};
use super::window::RollingWindow;

/// Classifies each incoming price against the rolling window
///
/// Pure and deterministic: same window contents and price always yield the
/// same classification. The window passed in holds the prices seen *before*
/// the current one.
#[derive(Debug, Clone)]
pub struct AnomalyClassifier {
    /// Minimum window samples before classification is meaningful
    min_samples: usize,
    /// Absolute z-score beyond which a pump/dump is flagged
    z_threshold: f64,
}

impl AnomalyClassifier {
    /// Create a classifier with the given calibration floor and threshold
    pub fn new(min_samples: usize, z_threshold: f64) -> Self {
        Self {
            min_samples,
            z_threshold,
        }
    }

    /// Classify a price against the window
    pub fn classify(&self, window: &RollingWindow, current_price: f64) -> Classification {
        if window.len() < self.min_samples {
            return Classification {
                status: MarketStatus::Calibrating,
                z_score: 0.0,
                mean_price: round2(current_price),
            };
        }

        let n = window.len() as f64;
        let mean = window.iter().sum::<f64>() / n;
        let variance = window.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / n;
        let std_dev = variance.sqrt();

        if std_dev == 0.0 {
            return Classification {
                status: MarketStatus::Stable,
                z_score: 0.0,
                mean_price: round2(mean),
            };
        }

        // Thresholds compare against the unrounded z-score
        let z_score = (current_price - mean) / std_dev;
        let status = if z_score > self.z_threshold {
            MarketStatus::PumpDetected
        } else if z_score < -self.z_threshold {
            MarketStatus::DumpDetected
        } else {
            MarketStatus::Normal
        };

        Classification {
            status,
            z_score: round2(z_score),
            mean_price: round2(mean),
        }
    }
}

impl Default for AnomalyClassifier {
    fn default() -> Self {
        Self::new(20, 2.0)
    }
}

/// Round to 2 decimal places for presentation
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
