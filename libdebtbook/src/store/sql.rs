//! `sqlx` backed stores.
//!
//! Both backends run the same three statements against the `debts` table,
//! only the placeholder syntax and the amount column type differ. Amounts
//! are kept as floating point columns, the layout existing deployments
//! already have, and converted at this boundary. The pool
//! hands out one connection per statement and takes it back on every exit
//! path, so nothing here holds a connection between operations.

use crate::{amount, debt::DebtEvent, store::DebtStore, LedgerError};
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, sqlite::SqlitePoolOptions, PgPool, SqlitePool};

macro_rules! sql_store {
    ($store:ident, $pool:ty, migrate: $migrate:expr, insert: $insert:expr, select: $select:expr) => {
        #[async_trait]
        impl DebtStore for $store {
            async fn migrate(&self) -> Result<(), LedgerError> {
                sqlx::query($migrate)
                    .execute(&self.pool)
                    .await
                    .map_err(|e| LedgerError::unavailable("migrate", e))?;
                Ok(())
            }

            async fn append(&self, event: &DebtEvent) -> Result<(), LedgerError> {
                let stored = amount::to_stored(event.amount)
                    .map_err(|e| LedgerError::unavailable("append", e))?;
                sqlx::query($insert)
                    .bind(event.debtor.as_str())
                    .bind(event.creditor.as_str())
                    .bind(stored)
                    .execute(&self.pool)
                    .await
                    .map_err(|e| LedgerError::unavailable("append", e))?;
                Ok(())
            }

            async fn clear(&self) -> Result<(), LedgerError> {
                sqlx::query("DELETE FROM debts")
                    .execute(&self.pool)
                    .await
                    .map_err(|e| LedgerError::unavailable("clear", e))?;
                Ok(())
            }

            async fn events(&self) -> Result<Vec<DebtEvent>, LedgerError> {
                let rows: Vec<(String, String, f64)> = sqlx::query_as($select)
                    .fetch_all(&self.pool)
                    .await
                    .map_err(|e| LedgerError::unavailable("events", e))?;

                rows.into_iter()
                    .map(|(debtor, creditor, stored)| -> Result<DebtEvent, LedgerError> {
                        let amount = amount::from_stored(stored)
                            .map_err(|e| LedgerError::unavailable("events", e))?;
                        Ok(DebtEvent {
                            debtor,
                            creditor,
                            amount,
                        })
                    })
                    .collect()
            }
        }

        impl $store {
            pub fn from_pool(pool: $pool) -> $store {
                $store { pool }
            }
        }
    };
}

/// PostgreSQL store, the production backend.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(url: &str) -> Result<PgStore, LedgerError> {
        let pool = PgPoolOptions::new()
            .max_connections(4)
            .connect(url)
            .await
            .map_err(|e| LedgerError::unavailable("connect", e))?;
        Ok(PgStore::from_pool(pool))
    }
}

// Tables created as `REAL` by older deployments are read through a cast.
sql_store!(
    PgStore,
    PgPool,
    migrate: "CREATE TABLE IF NOT EXISTS debts (from_user TEXT NOT NULL, to_user TEXT NOT NULL, amount DOUBLE PRECISION NOT NULL)",
    insert: "INSERT INTO debts (from_user, to_user, amount) VALUES ($1, $2, $3)",
    select: "SELECT from_user, to_user, amount::DOUBLE PRECISION FROM debts"
);

/// SQLite store, for local runs.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn connect(url: &str) -> Result<SqliteStore, LedgerError> {
        // `sqlite::memory:` lives and dies with its connection, keep exactly one around.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect(url)
            .await
            .map_err(|e| LedgerError::unavailable("connect", e))?;
        Ok(SqliteStore::from_pool(pool))
    }
}

sql_store!(
    SqliteStore,
    SqlitePool,
    migrate: "CREATE TABLE IF NOT EXISTS debts (from_user TEXT NOT NULL, to_user TEXT NOT NULL, amount REAL NOT NULL)",
    insert: "INSERT INTO debts (from_user, to_user, amount) VALUES (?, ?, ?)",
    select: "SELECT from_user, to_user, amount FROM debts"
);

#[cfg(test)]
mod tests {
    use crate::debt::DebtEvent;
    use crate::ledger::{Ledger, Summary};
    use crate::store::{sql::SqliteStore, DebtStore};
    use crate::LedgerError;

    use anyhow::Result;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    async fn sqlite() -> Result<SqliteStore> {
        let store = SqliteStore::connect("sqlite::memory:").await?;
        store.migrate().await?;
        Ok(store)
    }

    #[tokio::test]
    async fn migrate_is_idempotent() -> Result<()> {
        let store = sqlite().await?;
        store.migrate().await?;
        store.migrate().await?;
        assert!(store.events().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn append_read_clear() -> Result<()> {
        let store = sqlite().await?;
        store.append(&DebtEvent::new("alice", "bob", dec!(12.5))).await?;
        store.append(&DebtEvent::new("Маша", "alice", dec!(3))).await?;

        let mut events = store.events().await?;
        events.sort_by(|a, b| a.debtor.cmp(&b.debtor));
        assert_eq!(
            events,
            vec![
                DebtEvent::new("alice", "bob", dec!(12.5)),
                DebtEvent::new("Маша", "alice", dec!(3)),
            ]
        );

        store.clear().await?;
        store.clear().await?;
        assert!(store.events().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn ledger_over_sqlite() -> Result<()> {
        let ledger = Ledger::new(Arc::new(sqlite().await?));
        ledger.append(&DebtEvent::new("a", "b", dec!(4))).await?;
        ledger.append(&DebtEvent::new("b", "a", dec!(10))).await?;

        let summary = ledger.summarize().await?;
        assert_eq!(summary.obligations().len(), 1);
        assert_eq!(summary.obligations()[0].debtor, "b");
        assert_eq!(summary.obligations()[0].amount, dec!(6));

        ledger.clear_all().await?;
        assert_eq!(ledger.summarize().await?, Summary::Settled);
        Ok(())
    }

    #[tokio::test]
    async fn fractions_survive_storage() -> Result<()> {
        let ledger = Ledger::new(Arc::new(sqlite().await?));
        ledger.append(&DebtEvent::new("a", "b", dec!(10000000))).await?;
        ledger.append(&DebtEvent::new("a", "b", dec!(0.1))).await?;
        ledger.append(&DebtEvent::new("a", "b", dec!(0.2))).await?;
        ledger.append(&DebtEvent::new("b", "a", dec!(10000000.3))).await?;
        assert_eq!(ledger.summarize().await?, Summary::Settled);
        Ok(())
    }

    #[tokio::test]
    async fn unreadable_amount_is_unavailable() -> Result<()> {
        let store = sqlite().await?;
        sqlx::query("INSERT INTO debts (from_user, to_user, amount) VALUES ('a', 'b', 1e300)")
            .execute(&store.pool)
            .await?;
        assert!(matches!(
            store.events().await,
            Err(LedgerError::StorageUnavailable { operation: "events", .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn unmigrated_table_is_unavailable() -> Result<()> {
        let store = SqliteStore::connect("sqlite::memory:").await?;
        assert!(matches!(
            store.events().await,
            Err(LedgerError::StorageUnavailable { operation: "events", .. })
        ));
        Ok(())
    }
}
