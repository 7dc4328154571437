//! Event streaming module
//!
//! Enriched tick events and the WebSocket fan-out broadcaster.

mod broadcaster;
mod events;

pub use broadcaster::{Broadcaster, Subscription};
pub use events::EnrichedEvent;
