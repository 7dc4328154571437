//! Shared application state for request handlers

use crate::news::NewsLog;
use crate::portfolio::Portfolio;
use crate::rate_limit::RateLimiter;
use crate::store::TradeStore;
use crate::stream::Broadcaster;
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

#[derive(Clone)]
pub struct AppState {
    pub broadcaster: Arc<Broadcaster>,
    pub portfolio: Arc<RwLock<Portfolio>>,
    pub store: Arc<Mutex<TradeStore>>,
    pub news: Arc<NewsLog>,
    pub rate_limiter: Arc<RateLimiter>,
    /// Fixed size per executed trade, in base asset
    pub trade_size: Decimal,
}
