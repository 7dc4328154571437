//! Binance WebSocket trade feed implementation

use super::{FeedError, FeedEvent, MarketFeed, Tick};
use crate::telemetry::{self, CounterMetric};
use crate::ws::{WsClient, WsConfig, WsMessage};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::time::Duration;
use tokio::sync::mpsc;

/// Binance WebSocket base URL
const BINANCE_WS_URL: &str = "wss://stream.binance.com:9443/ws";

/// Binance WebSocket feed for the `<symbol>@trade` stream
///
/// A message is a trade tick iff it carries a parseable price (`p`) and
/// quantity (`q`) field; every other shape (heartbeats, subscription acks)
/// is ignored.
pub struct BinanceFeed {
    symbol: String,
    ws_url: String,
    reconnect_delay: Duration,
}

impl BinanceFeed {
    /// Create a new Binance feed for the given symbol
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into().to_lowercase(),
            ws_url: BINANCE_WS_URL.to_string(),
            reconnect_delay: Duration::from_secs(5),
        }
    }

    /// Override the WebSocket base URL (used against local test servers)
    pub fn with_ws_url(mut self, url: impl Into<String>) -> Self {
        self.ws_url = url.into();
        self
    }

    /// Set the fixed delay applied after feed failures
    pub fn reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Build the WebSocket URL for the trade stream
    fn build_ws_url(&self) -> String {
        format!("{}/{}@trade", self.ws_url, self.symbol)
    }

    /// Decode a feed message into a Tick
    ///
    /// Returns Ok(None) for recognized-but-irrelevant shapes, Err for
    /// payloads that should have been trades but could not be decoded.
    fn parse_message(msg: &str) -> Result<Option<Tick>, FeedError> {
        let value: serde_json::Value = serde_json::from_str(msg)?;

        let (Some(price_field), Some(qty_field)) = (value.get("p"), value.get("q")) else {
            return Ok(None);
        };

        let price = parse_float("p", price_field)?;
        let quantity = parse_float("q", qty_field)?;

        let timestamp = value
            .get("T")
            .and_then(|v| v.as_i64())
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            .unwrap_or_else(Utc::now);

        Ok(Some(Tick {
            price,
            quantity,
            timestamp,
        }))
    }

    /// Run the message processing loop
    ///
    /// Decode failures are logged and followed by the fixed backoff delay
    /// before the loop resumes; they never escape this function.
    async fn run_message_loop(
        mut ws_rx: mpsc::Receiver<WsMessage>,
        event_tx: mpsc::Sender<FeedEvent>,
        backoff: Duration,
    ) {
        loop {
            let msg = tokio::select! {
                msg = ws_rx.recv() => match msg {
                    Some(msg) => msg,
                    None => break,
                },
                // Stop (and release the transport) as soon as the consumer
                // goes away, even if the stream is idle
                _ = event_tx.closed() => {
                    tracing::debug!("Tick receiver dropped, stopping feed");
                    break;
                }
            };

            match msg {
                WsMessage::Text(text) => match Self::parse_message(&text) {
                    Ok(Some(tick)) => {
                        if event_tx.send(FeedEvent::Tick(tick)).await.is_err() {
                            break;
                        }
                    }
                    Ok(None) => {
                        // Heartbeat or other non-trade message
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to decode feed message, backing off");
                        tokio::time::sleep(backoff).await;
                    }
                },
                WsMessage::Connected => {
                    tracing::info!("Binance feed connected");
                    if event_tx.send(FeedEvent::Connected).await.is_err() {
                        break;
                    }
                }
                WsMessage::Disconnected => {
                    tracing::warn!("Binance feed disconnected");
                    break;
                }
                WsMessage::Reconnecting { attempt } => {
                    telemetry::increment(CounterMetric::FeedReconnects);
                    tracing::warn!(attempt, "Binance feed reconnecting...");
                }
                WsMessage::Binary(_) => {
                    // Binance doesn't send binary messages for trade streams
                }
            }
        }
    }
}

#[async_trait]
impl MarketFeed for BinanceFeed {
    async fn subscribe(&self) -> anyhow::Result<mpsc::Receiver<FeedEvent>> {
        let (event_tx, event_rx) = mpsc::channel(1024);
        let url = self.build_ws_url();

        tracing::info!(symbol = %self.symbol, "Subscribing to Binance trade feed");

        // Infinite reconnects with the fixed feed backoff delay
        let config = WsConfig::new(url)
            .max_reconnects(0)
            .reconnect_delay(self.reconnect_delay)
            .ping_interval(Duration::from_secs(30));

        let client = WsClient::new(config);
        let ws_rx = client.connect();

        let backoff = self.reconnect_delay;
        tokio::spawn(async move {
            Self::run_message_loop(ws_rx, event_tx, backoff).await;
        });

        Ok(event_rx)
    }
}

/// Parse a float carried either as a JSON string or a JSON number
fn parse_float(field: &'static str, value: &serde_json::Value) -> Result<f64, FeedError> {
    let parsed = match value {
        serde_json::Value::String(s) => s.parse::<f64>().ok(),
        serde_json::Value::Number(n) => n.as_f64(),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(FeedError::Decode {
            field,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binance_feed_creation() {
        let feed = BinanceFeed::new("btcusdt");
        assert_eq!(feed.symbol, "btcusdt");
    }

    #[test]
    fn test_binance_feed_uppercase_symbol() {
        let feed = BinanceFeed::new("BTCUSDT");
        assert_eq!(feed.symbol, "btcusdt");
    }

    #[test]
    fn test_build_ws_url() {
        let feed = BinanceFeed::new("btcusdt");
        let url = feed.build_ws_url();
        assert_eq!(url, "wss://stream.binance.com:9443/ws/btcusdt@trade");
    }

    #[test]
    fn test_parse_valid_trade_message() {
        let msg = r#"{
            "e": "trade",
            "E": 1704067200000,
            "s": "BTCUSDT",
            "t": 123456789,
            "p": "42500.50",
            "q": "0.001",
            "T": 1704067200123
        }"#;

        let tick = BinanceFeed::parse_message(msg).unwrap().unwrap();
        assert_eq!(tick.price, 42500.50);
        assert_eq!(tick.quantity, 0.001);
        assert_eq!(tick.timestamp.timestamp_millis(), 1704067200123);
    }

    #[test]
    fn test_parse_numeric_price_fields() {
        // Price/quantity as JSON numbers instead of strings
        let msg = r#"{"p": 100.5, "q": 2}"#;

        let tick = BinanceFeed::parse_message(msg).unwrap().unwrap();
        assert_eq!(tick.price, 100.5);
        assert_eq!(tick.quantity, 2.0);
    }

    #[test]
    fn test_parse_message_without_price_ignored() {
        // Heartbeats and other non-trade shapes are not errors
        let msg = r#"{"e": "ping", "E": 1704067200000}"#;
        assert!(BinanceFeed::parse_message(msg).unwrap().is_none());

        let msg = r#"{"result": null, "id": 1}"#;
        assert!(BinanceFeed::parse_message(msg).unwrap().is_none());
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = BinanceFeed::parse_message("not valid json");
        assert!(matches!(result, Err(FeedError::Malformed(_))));
    }

    #[test]
    fn test_parse_invalid_price() {
        let msg = r#"{"p": "not_a_number", "q": "0.001"}"#;
        let result = BinanceFeed::parse_message(msg);
        assert!(matches!(result, Err(FeedError::Decode { field: "p", .. })));
    }

    #[test]
    fn test_parse_missing_timestamp_defaults_to_now() {
        let msg = r#"{"p": "100.0", "q": "1.0"}"#;
        let tick = BinanceFeed::parse_message(msg).unwrap().unwrap();
        assert!(tick.timestamp.timestamp() > 0);
    }

    #[tokio::test]
    async fn test_message_loop_handles_text() {
        let (ws_tx, ws_rx) = mpsc::channel(10);
        let (event_tx, mut event_rx) = mpsc::channel(10);

        let handle = tokio::spawn(async move {
            BinanceFeed::run_message_loop(ws_rx, event_tx, Duration::from_millis(1)).await;
        });

        ws_tx.send(WsMessage::Connected).await.unwrap();
        let msg = r#"{"e":"trade","E":1704067200000,"s":"BTCUSDT","t":123456789,"p":"42500.50","q":"0.001","T":1704067200123}"#;
        ws_tx.send(WsMessage::Text(msg.to_string())).await.unwrap();

        assert!(matches!(
            event_rx.recv().await.unwrap(),
            FeedEvent::Connected
        ));
        match event_rx.recv().await.unwrap() {
            FeedEvent::Tick(tick) => assert_eq!(tick.price, 42500.50),
            other => panic!("expected tick, got {:?}", other),
        }

        ws_tx.send(WsMessage::Disconnected).await.unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_message_loop_survives_malformed_messages() {
        let (ws_tx, ws_rx) = mpsc::channel(10);
        let (event_tx, mut event_rx) = mpsc::channel(10);

        let handle = tokio::spawn(async move {
            BinanceFeed::run_message_loop(ws_rx, event_tx, Duration::from_millis(1)).await;
        });

        // Malformed message triggers the backoff path, then the loop resumes
        ws_tx
            .send(WsMessage::Text("invalid json".to_string()))
            .await
            .unwrap();

        let msg = r#"{"e":"trade","E":1704067200000,"s":"BTCUSDT","t":123456789,"p":"100.00","q":"0.001","T":1704067200123}"#;
        ws_tx.send(WsMessage::Text(msg.to_string())).await.unwrap();

        match event_rx.recv().await.unwrap() {
            FeedEvent::Tick(tick) => assert_eq!(tick.price, 100.0),
            other => panic!("expected tick, got {:?}", other),
        }

        ws_tx.send(WsMessage::Disconnected).await.unwrap();
        handle.await.unwrap();
    }
}
