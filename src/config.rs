//! Configuration types for tradepulse

use crate::telemetry::LogFormat;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub feed: FeedConfig,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub trading: TradingConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

/// Upstream price feed configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    pub exchange: String,
    pub symbol: String,

    /// Fixed delay before re-reading/re-connecting after a feed failure
    #[serde(default = "default_reconnect_delay_secs")]
    pub reconnect_delay_secs: u64,
}

fn default_reconnect_delay_secs() -> u64 {
    5
}

/// HTTP/WebSocket server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,

    /// Outbound queue capacity per WebSocket subscriber
    #[serde(default = "default_subscriber_queue_capacity")]
    pub subscriber_queue_capacity: usize,
}

fn default_subscriber_queue_capacity() -> usize {
    64
}

/// Anomaly detection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyticsConfig {
    /// Rolling price window capacity
    #[serde(default = "default_window_capacity")]
    pub window_capacity: usize,

    /// Minimum window samples before classification is meaningful
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,

    /// Absolute z-score beyond which a pump/dump is flagged
    #[serde(default = "default_z_score_threshold")]
    pub z_score_threshold: f64,

    /// Notional volume above which a tick is a whale trade
    #[serde(default = "default_whale_volume_threshold")]
    pub whale_volume_threshold: f64,
}

fn default_window_capacity() -> usize {
    100
}
fn default_min_samples() -> usize {
    20
}
fn default_z_score_threshold() -> f64 {
    2.0
}
fn default_whale_volume_threshold() -> f64 {
    50_000.0
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            window_capacity: 100,
            min_samples: 20,
            z_score_threshold: 2.0,
            whale_volume_threshold: 50_000.0,
        }
    }
}

/// Trade execution configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TradingConfig {
    /// Fixed size per executed trade, in base asset
    #[serde(default = "default_trade_size")]
    pub trade_size: Decimal,

    /// Starting USD balance of the in-memory portfolio
    #[serde(default = "default_initial_usd")]
    pub initial_usd: Decimal,

    /// Starting BTC balance of the in-memory portfolio
    #[serde(default = "default_initial_btc")]
    pub initial_btc: Decimal,
}

fn default_trade_size() -> Decimal {
    Decimal::new(1, 1) // 0.1
}
fn default_initial_usd() -> Decimal {
    Decimal::new(100_000, 0)
}
fn default_initial_btc() -> Decimal {
    Decimal::ZERO
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            trade_size: Decimal::new(1, 1),
            initial_usd: Decimal::new(100_000, 0),
            initial_btc: Decimal::ZERO,
        }
    }
}

/// Trade store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: PathBuf,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("./tradepulse.db")
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

/// Per-client-IP rate limiting for request endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Requests allowed per window
    #[serde(default = "default_max_requests")]
    pub max_requests: usize,

    /// Sliding window length in seconds
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

fn default_max_requests() -> usize {
    5
}
fn default_window_secs() -> u64 {
    10
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 5,
            window_secs: 10,
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    pub metrics_port: u16,
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
