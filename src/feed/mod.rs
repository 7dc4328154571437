//! Market data feed module
//!
//! Provides real-time trade ticks from the Binance WebSocket stream

mod binance;
mod types;

pub use binance::BinanceFeed;
pub use types::{FeedError, FeedEvent, Tick};

use async_trait::async_trait;
use tokio::sync::mpsc;

/// Trait for market feed implementations
#[async_trait]
pub trait MarketFeed: Send + Sync {
    /// Subscribe to feed events (connection status and trade ticks)
    async fn subscribe(&self) -> anyhow::Result<mpsc::Receiver<FeedEvent>>;
}
