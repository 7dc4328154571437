//! Price analytics module
//!
//! Rolling price window and z-score anomaly classification.
//! Classification is a pure function over the window contents, so the
//! whole module is synchronous and free of shared state.

mod classifier;
mod types;
mod window;

pub use classifier::AnomalyClassifier;
pub use types::{Classification, MarketStatus};
pub use window::RollingWindow;
