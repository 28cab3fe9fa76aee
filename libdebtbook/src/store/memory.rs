use crate::{debt::DebtEvent, store::DebtStore, LedgerError};
use async_trait::async_trait;

use std::sync::RwLock;

/// In-memory store, for tests and throwaway runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    events: RwLock<Vec<DebtEvent>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Default::default()
    }
}

#[async_trait]
impl DebtStore for MemoryStore {
    async fn migrate(&self) -> Result<(), LedgerError> {
        Ok(())
    }

    async fn append(&self, event: &DebtEvent) -> Result<(), LedgerError> {
        self.events
            .write()
            .map_err(|e| LedgerError::unavailable("append", e))?
            .push(event.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), LedgerError> {
        self.events
            .write()
            .map_err(|e| LedgerError::unavailable("clear", e))?
            .clear();
        Ok(())
    }

    async fn events(&self) -> Result<Vec<DebtEvent>, LedgerError> {
        let events = self
            .events
            .read()
            .map_err(|e| LedgerError::unavailable("events", e))?;
        Ok(events.clone())
    }
}

#[cfg(test)]
mod tests {
    use crate::debt::DebtEvent;
    use crate::store::{memory::MemoryStore, DebtStore};

    use anyhow::Result;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn append_and_clear() -> Result<()> {
        let store = MemoryStore::new();
        store.append(&DebtEvent::new("a", "b", dec!(1))).await?;
        store.append(&DebtEvent::new("a", "b", dec!(1))).await?;
        assert_eq!(
            store.events().await?,
            vec![DebtEvent::new("a", "b", dec!(1)), DebtEvent::new("a", "b", dec!(1))]
        );

        store.clear().await?;
        store.clear().await?;
        assert!(store.events().await?.is_empty());
        Ok(())
    }
}
