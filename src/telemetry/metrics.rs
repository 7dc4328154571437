//! Prometheus metrics

use metrics_exporter_prometheus::PrometheusBuilder;

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Ticks decoded and processed by the pipeline
    TicksProcessed,
    /// Enriched events delivered to subscribers (per subscriber)
    EventsDelivered,
    /// Subscribers removed for being slow or gone
    SubscribersDropped,
    /// Upstream feed reconnection attempts
    FeedReconnects,
    /// Trades executed via the API
    TradesExecuted,
    /// News headlines ingested via the API
    HeadlinesIngested,
}

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Currently connected subscribers
    ActiveSubscribers,
    /// Rolling window fill level
    WindowSize,
    /// Last observed trade price
    LastPrice,
}

impl CounterMetric {
    fn name(self) -> &'static str {
        match self {
            CounterMetric::TicksProcessed => "tradepulse_ticks_processed_total",
            CounterMetric::EventsDelivered => "tradepulse_events_delivered_total",
            CounterMetric::SubscribersDropped => "tradepulse_subscribers_dropped_total",
            CounterMetric::FeedReconnects => "tradepulse_feed_reconnects_total",
            CounterMetric::TradesExecuted => "tradepulse_trades_executed_total",
            CounterMetric::HeadlinesIngested => "tradepulse_headlines_ingested_total",
        }
    }
}

impl GaugeMetric {
    fn name(self) -> &'static str {
        match self {
            GaugeMetric::ActiveSubscribers => "tradepulse_active_subscribers",
            GaugeMetric::WindowSize => "tradepulse_window_size",
            GaugeMetric::LastPrice => "tradepulse_last_price",
        }
    }
}

/// Increment a counter by one
pub fn increment(metric: CounterMetric) {
    increment_by(metric, 1);
}

/// Increment a counter by an arbitrary amount
pub fn increment_by(metric: CounterMetric, amount: u64) {
    metrics::counter!(metric.name()).increment(amount);
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    metrics::gauge!(metric.name()).set(value);
}

/// Start the Prometheus scrape endpoint
///
/// Failure to bind (port in use, e.g. a second local process) downgrades to
/// a warning: metrics are lost but the service keeps running.
pub fn install_exporter(port: u16) {
    let builder = PrometheusBuilder::new().with_http_listener(([0, 0, 0, 0], port));
    match builder.install() {
        Ok(()) => tracing::info!(port, "Prometheus exporter listening"),
        Err(e) => tracing::warn!(error = %e, "Metrics exporter not started"),
    }
}
