//! HTTP/WebSocket API
//!
//! Request-handling surface serving portfolio queries, trade execution,
//! trade history, news ingest, and the subscriber stream endpoint. Runs
//! concurrently with (and independently of) the ingestion pipeline.

mod error;
mod handlers;
mod router;
mod state;

pub use error::ApiError;
pub use router::create_router;
pub use state::AppState;
