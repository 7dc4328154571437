//! Portfolio query handler

use crate::api::state::AppState;
use crate::portfolio::PortfolioSnapshot;
use axum::{extract::State, Json};

pub async fn get_portfolio(State(state): State<AppState>) -> Json<PortfolioSnapshot> {
    let portfolio = state.portfolio.read().await;
    Json(portfolio.snapshot())
}
