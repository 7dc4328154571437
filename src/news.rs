//! In-memory news headline log
//!
//! Fed by the `/ingest/news` endpoint (typically from the headline
//! simulator) and served back newest-first. Bounded: oldest headlines fall
//! off once the capacity is reached.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Headline submission payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadlineSubmission {
    pub ticker: String,
    pub headline: String,
}

/// A stored headline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Headline {
    pub id: Uuid,
    pub ticker: String,
    pub headline: String,
    pub received_at: DateTime<Utc>,
}

/// Bounded in-memory headline log
pub struct NewsLog {
    capacity: usize,
    entries: RwLock<VecDeque<Headline>>,
}

impl NewsLog {
    /// Create a log holding at most `capacity` headlines
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: RwLock::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Store a submitted headline and return the stored record
    pub async fn ingest(&self, submission: HeadlineSubmission) -> Headline {
        let headline = Headline {
            id: Uuid::new_v4(),
            ticker: submission.ticker,
            headline: submission.headline,
            received_at: Utc::now(),
        };

        let mut entries = self.entries.write().await;
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(headline.clone());

        headline
    }

    /// Most recent headlines, newest first
    pub async fn latest(&self, limit: usize) -> Vec<Headline> {
        let entries = self.entries.read().await;
        entries.iter().rev().take(limit).cloned().collect()
    }

    /// Number of stored headlines
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(ticker: &str, text: &str) -> HeadlineSubmission {
        HeadlineSubmission {
            ticker: ticker.to_string(),
            headline: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_ingest_and_latest() {
        let log = NewsLog::new(10);
        log.ingest(submission("BTC", "BTC surges")).await;
        log.ingest(submission("ETH", "ETH dips")).await;

        let latest = log.latest(10).await;
        assert_eq!(latest.len(), 2);
        // Newest first
        assert_eq!(latest[0].ticker, "ETH");
        assert_eq!(latest[1].ticker, "BTC");
    }

    #[tokio::test]
    async fn test_capacity_evicts_oldest() {
        let log = NewsLog::new(3);
        for i in 0..5 {
            log.ingest(submission("BTC", &format!("headline {}", i))).await;
        }

        assert_eq!(log.len().await, 3);
        let latest = log.latest(10).await;
        assert_eq!(latest[0].headline, "headline 4");
        assert_eq!(latest[2].headline, "headline 2");
    }

    #[tokio::test]
    async fn test_latest_respects_limit() {
        let log = NewsLog::new(10);
        for i in 0..6 {
            log.ingest(submission("TSLA", &format!("headline {}", i))).await;
        }

        assert_eq!(log.latest(2).await.len(), 2);
    }
}
