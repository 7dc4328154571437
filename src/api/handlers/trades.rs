//! Trade execution and history handlers

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::portfolio::{PortfolioSnapshot, TradeSide};
use crate::store::TradeRecord;
use crate::telemetry::{self, CounterMetric};
use axum::{
    extract::{ConnectInfo, State},
    Json,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

#[derive(Debug, Deserialize)]
pub struct ExecuteTradeRequest {
    pub side: TradeSide,
    pub price: f64,
}

#[derive(Debug, Serialize)]
pub struct ExecuteTradeResponse {
    pub status: &'static str,
    pub trade_id: i64,
    pub portfolio: PortfolioSnapshot,
}

/// Execute a fixed-size trade at the given price
///
/// Updates the in-memory portfolio first, then persists the trade record.
/// The call is synchronous from the client's point of view but never
/// touches the ingestion task.
pub async fn execute_trade(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(req): Json<ExecuteTradeRequest>,
) -> Result<Json<ExecuteTradeResponse>, ApiError> {
    state.rate_limiter.check(addr.ip())?;

    let price = Decimal::try_from(req.price)
        .map_err(|_| ApiError::BadRequest("price must be a finite number".into()))?;
    let amount = state.trade_size;

    let snapshot = {
        let mut portfolio = state.portfolio.write().await;
        portfolio.apply(req.side, price, amount)?;
        portfolio.snapshot()
    };

    let trade_id = state.store.lock().await.record_trade(
        req.side,
        req.price,
        amount.to_f64().unwrap_or(0.0),
    )?;

    telemetry::increment(CounterMetric::TradesExecuted);
    tracing::info!(
        side = req.side.as_str(),
        price = req.price,
        trade_id,
        usd_balance = snapshot.usd,
        "Trade executed"
    );

    Ok(Json(ExecuteTradeResponse {
        status: "executed",
        trade_id,
        portfolio: snapshot,
    }))
}

/// Most recent executed trades, newest first
pub async fn trade_history(
    State(state): State<AppState>,
) -> Result<Json<Vec<TradeRecord>>, ApiError> {
    let trades = state.store.lock().await.recent_trades(10)?;
    Ok(Json(trades))
}
