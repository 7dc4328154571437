//! In-memory portfolio ledger
//!
//! Read and written only by trade-execution requests, never by the
//! ingestion pipeline. Money arithmetic uses decimals.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    /// Wire/storage encoding
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeSide::Buy => "BUY",
            TradeSide::Sell => "SELL",
        }
    }
}

/// Errors rejecting a trade against the current balances
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortfolioError {
    #[error("insufficient funds: need {required} USD, have {available}")]
    InsufficientFunds {
        required: Decimal,
        available: Decimal,
    },

    #[error("insufficient BTC: need {required}, have {available}")]
    InsufficientAsset {
        required: Decimal,
        available: Decimal,
    },
}

/// USD/BTC balances
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Portfolio {
    pub usd: Decimal,
    pub btc: Decimal,
}

/// Snapshot of the portfolio as returned by the API
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub usd: f64,
    pub btc: f64,
}

impl Portfolio {
    /// Create a portfolio with the given starting balances
    pub fn new(usd: Decimal, btc: Decimal) -> Self {
        Self { usd, btc }
    }

    /// Apply a trade of `amount` BTC at `price` USD
    ///
    /// Rejects the trade without mutating anything when balances are
    /// insufficient.
    pub fn apply(
        &mut self,
        side: TradeSide,
        price: Decimal,
        amount: Decimal,
    ) -> Result<(), PortfolioError> {
        let notional = price * amount;

        match side {
            TradeSide::Buy => {
                if self.usd < notional {
                    return Err(PortfolioError::InsufficientFunds {
                        required: notional,
                        available: self.usd,
                    });
                }
                self.usd -= notional;
                self.btc += amount;
            }
            TradeSide::Sell => {
                if self.btc < amount {
                    return Err(PortfolioError::InsufficientAsset {
                        required: amount,
                        available: self.btc,
                    });
                }
                self.btc -= amount;
                self.usd += notional;
            }
        }

        Ok(())
    }

    /// Numeric snapshot for API responses
    pub fn snapshot(&self) -> PortfolioSnapshot {
        PortfolioSnapshot {
            usd: self.usd.to_f64().unwrap_or(f64::MAX),
            btc: self.btc.to_f64().unwrap_or(f64::MAX),
        }
    }
}
