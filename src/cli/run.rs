//! Run command implementation
//!
//! Wires the feed, pipeline, broadcaster and API server together and keeps
//! them running until Ctrl-C.

use crate::api::{create_router, AppState};
use crate::config::Config;
use crate::feed::{BinanceFeed, MarketFeed};
use crate::news::NewsLog;
use crate::pipeline::Pipeline;
use crate::portfolio::Portfolio;
use crate::rate_limit::RateLimiter;
use crate::store::TradeStore;
use crate::stream::Broadcaster;
use clap::Args;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{watch, Mutex, RwLock};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Override the configured server port
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl RunArgs {
    pub async fn execute(&self, config: Config) -> anyhow::Result<()> {
        let store = TradeStore::open(&config.database.path)?;
        let store = Arc::new(Mutex::new(store));

        let portfolio = Arc::new(RwLock::new(Portfolio::new(
            config.trading.initial_usd,
            config.trading.initial_btc,
        )));

        let broadcaster = Arc::new(Broadcaster::new(config.server.subscriber_queue_capacity));
        let news = Arc::new(NewsLog::new(100));
        let rate_limiter = Arc::new(RateLimiter::new(
            config.rate_limit.max_requests,
            Duration::from_secs(config.rate_limit.window_secs),
        ));

        // Ingestion pipeline with cooperative shutdown
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let feed = BinanceFeed::new(&config.feed.symbol)
            .reconnect_delay(Duration::from_secs(config.feed.reconnect_delay_secs));
        let events = feed.subscribe().await?;
        let pipeline = Pipeline::new(&config.analytics, broadcaster.clone());
        let pipeline_handle = tokio::spawn(pipeline.run(events, shutdown_rx));

        // API server
        let state = AppState {
            broadcaster,
            portfolio,
            store,
            news,
            rate_limiter,
            trade_size: config.trading.trade_size,
        };
        let app = create_router(state);

        let port = self.port.unwrap_or(config.server.port);
        let addr: SocketAddr = format!("{}:{}", config.server.host, port).parse()?;
        let listener = TcpListener::bind(addr).await?;
        tracing::info!(%addr, "API server listening");

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        // Server is down; stop the pipeline and let the in-flight tick finish
        tracing::info!("Shutting down ingestion pipeline");
        let _ = shutdown_tx.send(true);
        let final_state = pipeline_handle.await?;
        tracing::info!(state = ?final_state, "Pipeline stopped");

        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
