use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use stockwise_ai::InventorySnapshot;
use stockwise_core::{DomainError, ItemId};
use stockwise_inventory::{Item, LowStock, SaleEvent};

use super::{InventoryReader, StoreError};

#[derive(Debug, Default)]
struct State {
    items: BTreeMap<ItemId, Item>,
    sales: Vec<SaleEvent>,
}

/// In-memory inventory store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryInventoryStore {
    inner: RwLock<State>,
}

impl InMemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an item.
    pub fn upsert_item(&self, item: Item) -> Result<(), StoreError> {
        let mut state = self.write()?;
        state.items.insert(item.id, item);
        Ok(())
    }

    /// Append a sell event without touching stock (history import).
    pub fn append_sale(&self, sale: SaleEvent) -> Result<(), StoreError> {
        let mut state = self.write()?;
        state.sales.push(sale);
        Ok(())
    }

    /// Sell `quantity` units of an item: decrements stock and appends history.
    pub fn record_sale(
        &self,
        item_id: ItemId,
        quantity: u32,
        at: DateTime<Utc>,
    ) -> Result<SaleEvent, StoreError> {
        let mut state = self.write()?;
        let item = state.items.get_mut(&item_id).ok_or(DomainError::NotFound)?;
        let sale = item.sell(quantity, at)?;
        state.sales.push(sale.clone());
        Ok(sale)
    }

    pub fn item(&self, item_id: ItemId) -> Option<Item> {
        self.inner.read().ok()?.items.get(&item_id).cloned()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, State>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, State>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl InventoryReader for InMemoryInventoryStore {
    async fn load_snapshot(&self) -> Result<InventorySnapshot, StoreError> {
        let state = self.read()?;
        // Mirror the join: history rows for unknown items are not returned.
        let sales = state
            .sales
            .iter()
            .filter(|s| state.items.contains_key(&s.item_id))
            .cloned()
            .collect();
        Ok(InventorySnapshot::new(state.items.values().cloned().collect(), sales))
    }

    async fn low_stock_items(&self, threshold: u32) -> Result<Vec<Item>, StoreError> {
        let state = self.read()?;
        Ok(LowStock::below(threshold)
            .select(state.items.values())
            .into_iter()
            .cloned()
            .collect())
    }
}
