//! News simulator command
//!
//! Posts randomly generated headlines to the running API at a 1-3 second
//! cadence, standing in for a real news wire.

use crate::news::HeadlineSubmission;
use clap::Args;
use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;

const TICKERS: &[&str] = &["BTC", "ETH", "AAPL", "TSLA", "GOOGL", "NVDA"];

const TEMPLATES: &[&str] = &[
    "surge hits record high",
    "faces massive lawsuit",
    "announces new product line",
    "price drops significantly",
    "CEO steps down",
    "quarterly profits exceed expectations",
    "remains stable",
    "market bulls are buying",
    "bears take control of market",
];

#[derive(Args, Debug)]
pub struct NewsArgs {
    /// Base URL of the running tradepulse API
    #[arg(long, default_value = "http://127.0.0.1:8000")]
    pub api_url: String,

    /// Shortest pause between headlines, in seconds
    #[arg(long, default_value_t = 1.0)]
    pub min_interval_secs: f64,

    /// Longest pause between headlines, in seconds
    #[arg(long, default_value_t = 3.0)]
    pub max_interval_secs: f64,
}

impl NewsArgs {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let client = reqwest::Client::new();
        let endpoint = format!("{}/ingest/news", self.api_url);

        tracing::info!(endpoint = %endpoint, "News simulator started");

        loop {
            let (submission, pause) = self.next_headline();

            match client.post(&endpoint).json(&submission).send().await {
                Ok(res) => {
                    tracing::info!(
                        status = %res.status(),
                        headline = %submission.headline,
                        "Headline sent"
                    );
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to send headline, is the server running?");
                }
            }

            tokio::select! {
                _ = sleep(pause) => {}
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("News simulator stopped");
                    break;
                }
            }
        }

        Ok(())
    }

    /// Pick a random headline and the pause before the next one
    fn next_headline(&self) -> (HeadlineSubmission, Duration) {
        let mut rng = rand::thread_rng();
        let ticker = TICKERS[rng.gen_range(0..TICKERS.len())];
        let phrase = TEMPLATES[rng.gen_range(0..TEMPLATES.len())];

        let submission = HeadlineSubmission {
            ticker: ticker.to_string(),
            headline: format!("{} {} amid market volatility.", ticker, phrase),
        };
        let pause = Duration::from_secs_f64(
            rng.gen_range(self.min_interval_secs..=self.max_interval_secs),
        );

        (submission, pause)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> NewsArgs {
        NewsArgs {
            api_url: "http://127.0.0.1:8000".to_string(),
            min_interval_secs: 1.0,
            max_interval_secs: 3.0,
        }
    }

    #[test]
    fn test_next_headline_shape() {
        let (submission, pause) = args().next_headline();

        assert!(TICKERS.contains(&submission.ticker.as_str()));
        assert!(submission.headline.starts_with(&submission.ticker));
        assert!(submission.headline.ends_with("amid market volatility."));
        assert!(pause >= Duration::from_secs_f64(1.0));
        assert!(pause <= Duration::from_secs_f64(3.0));
    }
}
