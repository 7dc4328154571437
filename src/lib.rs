//! tradepulse: real-time market-data anomaly detection and streaming server
//!
//! This library provides the core components for:
//! - Real-time trade ticks from the Binance WebSocket feed
//! - Rolling-window z-score anomaly classification
//! - Whale-trade detection on notional volume
//! - Fan-out of enriched events to many WebSocket subscribers
//! - HTTP API for portfolio, trade execution and news headlines
//! - SQLite trade persistence
//! - Per-client rate limiting
//! - Full observability stack

pub mod analytics;
pub mod api;
pub mod cli;
pub mod config;
pub mod feed;
pub mod news;
pub mod pipeline;
pub mod portfolio;
pub mod rate_limit;
pub mod store;
pub mod stream;
pub mod telemetry;
pub mod ws;
