//! News headline ingest and query handlers

use crate::api::state::AppState;
use crate::news::{Headline, HeadlineSubmission};
use crate::telemetry::{self, CounterMetric};
use axum::{extract::State, Json};

pub async fn ingest_news(
    State(state): State<AppState>,
    Json(submission): Json<HeadlineSubmission>,
) -> Json<Headline> {
    let headline = state.news.ingest(submission).await;

    telemetry::increment(CounterMetric::HeadlinesIngested);
    tracing::debug!(ticker = %headline.ticker, "Headline ingested");

    Json(headline)
}

pub async fn latest_news(State(state): State<AppState>) -> Json<Vec<Headline>> {
    Json(state.news.latest(20).await)
}
