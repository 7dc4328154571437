//! SQLite-backed trade persistence

use crate::portfolio::TradeSide;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::Serialize;
use std::path::Path;

/// Trade store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// A persisted trade row
#[derive(Debug, Clone, Serialize)]
pub struct TradeRecord {
    pub id: i64,
    pub side: String,
    pub price: f64,
    pub amount: f64,
    pub timestamp: DateTime<Utc>,
}

/// Records executed trades and serves recent history
///
/// Used on the request-handling path only; the ingestion pipeline never
/// touches it.
pub struct TradeStore {
    conn: Connection,
}

impl TradeStore {
    /// Open (and initialize) the store at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Open an in-memory store, used in tests
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS trades (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                side TEXT NOT NULL,
                price REAL NOT NULL,
                amount REAL NOT NULL,
                created_at TEXT NOT NULL
            );",
        )?;
        Ok(Self { conn })
    }

    /// Persist an executed trade and return its id
    pub fn record_trade(
        &mut self,
        side: TradeSide,
        price: f64,
        amount: f64,
    ) -> Result<i64, StoreError> {
        self.conn.execute(
            "INSERT INTO trades (side, price, amount, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![side.as_str(), price, amount, Utc::now().to_rfc3339()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Most recent trades, newest first
    pub fn recent_trades(&self, limit: usize) -> Result<Vec<TradeRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, side, price, amount, created_at
             FROM trades ORDER BY id DESC LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit as i64], |row| {
            let created_at: String = row.get(4)?;
            let timestamp = DateTime::parse_from_rfc3339(&created_at)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        4,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?;

            Ok(TradeRecord {
                id: row.get(0)?,
                side: row.get(1)?,
                price: row.get(2)?,
                amount: row.get(3)?,
                timestamp,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
