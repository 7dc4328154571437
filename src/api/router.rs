//! API route table

use super::handlers::{news, portfolio, stream, trades};
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/portfolio", get(portfolio::get_portfolio))
        .route("/trade/execute", post(trades::execute_trade))
        .route("/trade/history", get(trades::trade_history))
        .route("/ingest/news", post(news::ingest_news))
        .route("/news/latest", get(news::latest_news))
        .route("/ws/stream", get(stream::stream_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
