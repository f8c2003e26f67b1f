//! Read access to the shared inventory store.

pub mod in_memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use stockwise_ai::InventorySnapshot;
use stockwise_core::DomainError;
use stockwise_inventory::Item;

pub use in_memory::InMemoryInventoryStore;
pub use postgres::PostgresInventoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached (connect, pool acquire, IO).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("query failed: {0}")]
    Query(String),

    /// A row could not be turned into a domain record.
    #[error("malformed row: {0}")]
    Malformed(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Read-only queries the predictor and its callers need.
#[async_trait]
pub trait InventoryReader: Send + Sync {
    /// Every item plus every sell event, read in one unit of work.
    async fn load_snapshot(&self) -> Result<InventorySnapshot, StoreError>;

    /// Items with `remaining_stock < threshold`, ordered by id.
    async fn low_stock_items(&self, threshold: u32) -> Result<Vec<Item>, StoreError>;
}

#[async_trait]
impl<R> InventoryReader for Arc<R>
where
    R: InventoryReader + ?Sized,
{
    async fn load_snapshot(&self) -> Result<InventorySnapshot, StoreError> {
        (**self).load_snapshot().await
    }

    async fn low_stock_items(&self, threshold: u32) -> Result<Vec<Item>, StoreError> {
        (**self).low_stock_items(threshold).await
    }
}
