//! Enriched event payloads published to subscribers

use crate::analytics::Classification;
use crate::feed::Tick;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tick enriched with classification and whale detection
///
/// Ephemeral: lives only long enough to be serialized and published.
/// Wire shape: `{price, stats: {status, z_score, mean_price}, volume,
/// is_whale, timestamp}` with an RFC 3339 timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedEvent {
    pub price: f64,
    pub stats: Classification,
    pub volume: f64,
    pub is_whale: bool,
    pub timestamp: DateTime<Utc>,
}

impl EnrichedEvent {
    /// Build an event from a tick and its classification
    ///
    /// A tick is a whale trade when its notional volume strictly exceeds
    /// `whale_volume_threshold`.
    pub fn from_tick(tick: &Tick, stats: Classification, whale_volume_threshold: f64) -> Self {
        let volume = tick.volume();
        Self {
            price: tick.price,
            stats,
            volume,
            is_whale: volume > whale_volume_threshold,
            timestamp: tick.timestamp,
        }
    }
}
