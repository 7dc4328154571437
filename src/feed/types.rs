//! Market data feed types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single trade tick from the upstream feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tick {
    /// Trade price
    pub price: f64,
    /// Trade quantity in base asset
    pub quantity: f64,
    /// Trade timestamp (exchange time when available, receive time otherwise)
    pub timestamp: DateTime<Utc>,
}

impl Tick {
    /// Notional volume of the trade
    pub fn volume(&self) -> f64 {
        self.price * self.quantity
    }
}

/// Events emitted by a market feed
#[derive(Debug, Clone)]
pub enum FeedEvent {
    /// Upstream connection established (also sent after each reconnect)
    Connected,
    /// A decoded trade tick
    Tick(Tick),
}

/// Feed decode errors
///
/// These are transient: the connector logs them and backs off, they are
/// never surfaced to subscribers.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("malformed feed payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unparseable trade field {field}: {value}")]
    Decode { field: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_volume() {
        let tick = Tick {
            price: 60_000.0,
            quantity: 1.0,
            timestamp: Utc::now(),
        };
        assert_eq!(tick.volume(), 60_000.0);
    }

    #[test]
    fn test_feed_error_display() {
        let err = FeedError::Decode {
            field: "p",
            value: "not_a_number".to_string(),
        };
        assert_eq!(err.to_string(), "unparseable trade field p: not_a_number");
    }
}
