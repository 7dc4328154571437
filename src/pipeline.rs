//! Ingestion pipeline
//!
//! The single long-lived task tying the system together: feed events in,
//! window update + classification in the middle, broadcast out. The rolling
//! window and classifier are owned exclusively by this task, so tick
//! processing needs no locks and contains no await points: a tick is either
//! fully processed or not processed at all.

use crate::analytics::{AnomalyClassifier, MarketStatus, RollingWindow};
use crate::config::AnalyticsConfig;
use crate::feed::{FeedEvent, Tick};
use crate::stream::{Broadcaster, EnrichedEvent};
use crate::telemetry::{self, CounterMetric, GaugeMetric};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

/// Pipeline lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Waiting for the first upstream connection
    Starting,
    /// Steady tick-processing loop
    Running,
    /// Shutdown signal observed, winding down
    Stopping,
    /// Feed released, no further ticks will be processed
    Stopped,
}

/// Orchestrates feed -> window/classifier -> broadcaster
pub struct Pipeline {
    window: RollingWindow,
    classifier: AnomalyClassifier,
    broadcaster: Arc<Broadcaster>,
    whale_volume_threshold: f64,
    state: PipelineState,
}

impl Pipeline {
    /// Create a pipeline from analytics configuration
    pub fn new(config: &AnalyticsConfig, broadcaster: Arc<Broadcaster>) -> Self {
        Self {
            window: RollingWindow::new(config.window_capacity),
            classifier: AnomalyClassifier::new(config.min_samples, config.z_score_threshold),
            broadcaster,
            whale_volume_threshold: config.whale_volume_threshold,
            state: PipelineState::Starting,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Run until the feed ends or shutdown is signalled
    ///
    /// The shutdown arm is polled first: a pending shutdown wins over a
    /// pending tick, and an in-flight tick always completes before the
    /// signal is observed.
    pub async fn run(
        mut self,
        mut events: mpsc::Receiver<FeedEvent>,
        mut shutdown: watch::Receiver<bool>,
    ) -> PipelineState {
        tracing::info!("Pipeline starting");

        loop {
            tokio::select! {
                biased;

                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        self.transition(PipelineState::Stopping);
                        break;
                    }
                }

                event = events.recv() => match event {
                    Some(FeedEvent::Connected) => {
                        if self.state == PipelineState::Starting {
                            self.transition(PipelineState::Running);
                        } else {
                            tracing::info!("Upstream feed re-established");
                        }
                    }
                    Some(FeedEvent::Tick(tick)) => {
                        if self.state == PipelineState::Starting {
                            self.transition(PipelineState::Running);
                        }
                        self.process(tick);
                    }
                    None => {
                        tracing::error!("Feed channel closed, stopping pipeline");
                        self.transition(PipelineState::Stopping);
                        break;
                    }
                },
            }
        }

        // Dropping the receiver releases the upstream connection
        drop(events);
        self.transition(PipelineState::Stopped);
        self.state
    }

    /// Process a single tick: classify, enrich, publish, then record it
    ///
    /// Classification runs against the window of *prior* ticks; the current
    /// price joins the window afterwards.
    fn process(&mut self, tick: Tick) {
        let stats = self.classifier.classify(&self.window, tick.price);
        let event = EnrichedEvent::from_tick(&tick, stats, self.whale_volume_threshold);

        match stats.status {
            MarketStatus::PumpDetected | MarketStatus::DumpDetected => {
                tracing::warn!(
                    price = tick.price,
                    z_score = stats.z_score,
                    status = ?stats.status,
                    "Anomalous tick"
                );
            }
            _ => {
                tracing::debug!(price = tick.price, z_score = stats.z_score, "Tick processed");
            }
        }

        let delivered = self.broadcaster.publish(&event);
        self.window.push(tick.price);

        telemetry::increment(CounterMetric::TicksProcessed);
        telemetry::increment_by(CounterMetric::EventsDelivered, delivered as u64);
        telemetry::set_gauge(GaugeMetric::WindowSize, self.window.len() as f64);
        telemetry::set_gauge(GaugeMetric::LastPrice, tick.price);
    }

    fn transition(&mut self, next: PipelineState) {
        tracing::info!(from = ?self.state, to = ?next, "Pipeline state change");
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn tick(price: f64, quantity: f64) -> FeedEvent {
        FeedEvent::Tick(Tick {
            price,
            quantity,
            timestamp: Utc::now(),
        })
    }

    fn test_pipeline(broadcaster: Arc<Broadcaster>) -> Pipeline {
        Pipeline::new(&AnalyticsConfig::default(), broadcaster)
    }

    #[tokio::test]
    async fn test_ticks_flow_through_to_subscribers() {
        let broadcaster = Arc::new(Broadcaster::new(32));
        let mut sub = broadcaster.subscribe();

        let (event_tx, event_rx) = mpsc::channel(32);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(test_pipeline(broadcaster).run(event_rx, shutdown_rx));

        event_tx.send(FeedEvent::Connected).await.unwrap();
        event_tx.send(tick(100.0, 0.5)).await.unwrap();
        event_tx.send(tick(101.0, 600.0)).await.unwrap();

        let payload = sub.recv().await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(json["price"], 100.0);
        assert_eq!(json["stats"]["status"], "CALIBRATING");
        assert_eq!(json["is_whale"], false);

        let payload = sub.recv().await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(json["price"], 101.0);
        assert_eq!(json["volume"], 60_600.0);
        assert_eq!(json["is_whale"], true);

        shutdown_tx.send(true).unwrap();
        assert_eq!(handle.await.unwrap(), PipelineState::Stopped);
    }

    #[tokio::test]
    async fn test_classification_excludes_current_tick() {
        let broadcaster = Arc::new(Broadcaster::new(64));
        let mut sub = broadcaster.subscribe();

        let (event_tx, event_rx) = mpsc::channel(64);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(test_pipeline(broadcaster).run(event_rx, shutdown_rx));

        event_tx.send(FeedEvent::Connected).await.unwrap();
        // Flat window, then a wild spike: the spike must classify against
        // the 20 identical prior prices (std dev 0 -> STABLE)
        for _ in 0..20 {
            event_tx.send(tick(100.0, 0.1)).await.unwrap();
        }
        event_tx.send(tick(300.0, 0.1)).await.unwrap();

        for _ in 0..20 {
            sub.recv().await.unwrap();
        }
        let payload = sub.recv().await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(json["stats"]["status"], "STABLE");
        assert_eq!(json["stats"]["z_score"], 0.0);

        drop(event_tx);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_takes_priority_over_pending_ticks() {
        let broadcaster = Arc::new(Broadcaster::new(8));
        let mut sub = broadcaster.subscribe();

        let (event_tx, event_rx) = mpsc::channel(8);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        // Queue ticks and the shutdown before the pipeline starts polling:
        // the biased select must observe shutdown first and drop them all
        event_tx.send(FeedEvent::Connected).await.unwrap();
        event_tx.send(tick(100.0, 1.0)).await.unwrap();
        shutdown_tx.send(true).unwrap();

        let state = test_pipeline(broadcaster).run(event_rx, shutdown_rx).await;
        assert_eq!(state, PipelineState::Stopped);

        // Nothing was published
        assert!(sub.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_feed_channel_close_stops_pipeline() {
        let broadcaster = Arc::new(Broadcaster::new(8));
        let (event_tx, event_rx) = mpsc::channel(8);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(test_pipeline(broadcaster).run(event_rx, shutdown_rx));
        drop(event_tx);

        assert_eq!(handle.await.unwrap(), PipelineState::Stopped);
    }

    #[tokio::test]
    async fn test_connected_transitions_to_running() {
        let broadcaster = Arc::new(Broadcaster::new(8));
        let pipeline = test_pipeline(broadcaster.clone());
        assert_eq!(pipeline.state(), PipelineState::Starting);

        let (event_tx, event_rx) = mpsc::channel(8);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(pipeline.run(event_rx, shutdown_rx));

        event_tx.send(FeedEvent::Connected).await.unwrap();
        tokio::task::yield_now().await;

        shutdown_tx.send(true).unwrap();
        assert_eq!(handle.await.unwrap(), PipelineState::Stopped);
    }
}
