//! Postgres-backed inventory reader.
//!
//! Reads the `items` and `stock_history` tables. Every call acquires exactly one
//! pooled connection, runs its queries on it, and hands it back to the pool when
//! the guard drops, on success and on every error path alike.
//!
//! ## Error Mapping
//!
//! | SQLx Error | StoreError |
//! |------------|------------|
//! | PoolTimedOut, PoolClosed, Io, Tls | `Unavailable` |
//! | ColumnDecode, ColumnNotFound, Decode | `Malformed` |
//! | Database and anything else | `Query` |

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{FromRow, PgPool, Row};
use tracing::{Span, debug, instrument, warn};

use stockwise_ai::InventorySnapshot;
use stockwise_core::ItemId;
use stockwise_inventory::{Category, Item, SaleEvent, StockAction};

use super::{InventoryReader, StoreError};
use crate::config::StoreConfig;

const SALES_QUERY: &str = r#"
    SELECT sh.item_id, sh.quantity, sh.timestamp
    FROM stock_history sh
    JOIN items i ON sh.item_id = i.id
    WHERE sh.action = $1
"#;

const ITEMS_QUERY: &str = r#"
    SELECT id, name, remaining_stock, category
    FROM items
    ORDER BY id
"#;

const LOW_STOCK_QUERY: &str = r#"
    SELECT id, name, remaining_stock, category
    FROM items
    WHERE remaining_stock < $1
    ORDER BY id
"#;

/// Postgres-backed inventory reader.
///
/// `PostgresInventoryStore` is `Send + Sync` and cheap to clone; clones share the pool.
#[derive(Debug, Clone)]
pub struct PostgresInventoryStore {
    pool: Arc<PgPool>,
}

impl PostgresInventoryStore {
    /// Create a new PostgresInventoryStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Build a lazily-connecting pool from config.
    ///
    /// No connection is opened here; an unreachable database surfaces as
    /// `StoreError::Unavailable` on the first read.
    pub fn connect_lazy(config: &StoreConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect_lazy(&config.database_url)
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl InventoryReader for PostgresInventoryStore {
    #[instrument(
        skip(self),
        fields(item_count = tracing::field::Empty, sale_count = tracing::field::Empty),
        err
    )]
    async fn load_snapshot(&self) -> Result<InventorySnapshot, StoreError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| map_sqlx_error("acquire", e))?;

        let sale_rows: Vec<SaleRow> = sqlx::query_as(SALES_QUERY)
            .bind(StockAction::Sell.as_str())
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| map_sqlx_error("load_sales", e))?;

        let item_rows: Vec<ItemRow> = sqlx::query_as(ITEMS_QUERY)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| map_sqlx_error("load_items", e))?;

        let items = items_from_rows(item_rows);

        let mut sales = Vec::with_capacity(sale_rows.len());
        for row in sale_rows {
            match row.into_sale() {
                Ok(sale) => sales.push(sale),
                Err(reason) => debug!(%reason, "skipping unusable history row"),
            }
        }

        let span = Span::current();
        span.record("item_count", items.len());
        span.record("sale_count", sales.len());
        Ok(InventorySnapshot::new(items, sales))
    }

    #[instrument(skip(self), err)]
    async fn low_stock_items(&self, threshold: u32) -> Result<Vec<Item>, StoreError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| map_sqlx_error("acquire", e))?;

        let rows: Vec<ItemRow> = sqlx::query_as(LOW_STOCK_QUERY)
            .bind(i32::try_from(threshold).unwrap_or(i32::MAX))
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| map_sqlx_error("low_stock_items", e))?;

        Ok(items_from_rows(rows))
    }
}

/// Converts item rows, skipping any row that does not form a valid `Item`.
fn items_from_rows(rows: Vec<ItemRow>) -> Vec<Item> {
    rows.into_iter()
        .filter_map(|row| match Item::try_from(row) {
            Ok(item) => Some(item),
            Err(reason) => {
                warn!(%reason, "skipping unusable item row");
                None
            }
        })
        .collect()
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::PoolTimedOut => {
            StoreError::Unavailable(format!("timed out acquiring a connection in {operation}"))
        }
        sqlx::Error::PoolClosed => {
            StoreError::Unavailable(format!("connection pool closed in {operation}"))
        }
        sqlx::Error::Io(e) => StoreError::Unavailable(format!("io error in {operation}: {e}")),
        sqlx::Error::Tls(e) => StoreError::Unavailable(format!("tls error in {operation}: {e}")),
        sqlx::Error::Configuration(e) => {
            StoreError::Unavailable(format!("bad connection settings in {operation}: {e}"))
        }
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::Decode(_) => StoreError::Malformed(format!("{operation}: {err}")),
        sqlx::Error::Database(db_err) => {
            StoreError::Query(format!("database error in {}: {}", operation, db_err.message()))
        }
        other => StoreError::Query(format!("{operation}: {other}")),
    }
}

// SQLx row types

#[derive(Debug)]
struct ItemRow {
    id: i32,
    name: String,
    remaining_stock: i32,
    category: Option<String>,
}

impl<'r> FromRow<'r, PgRow> for ItemRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            remaining_stock: row.try_get("remaining_stock")?,
            category: row.try_get("category")?,
        })
    }
}

impl TryFrom<ItemRow> for Item {
    type Error = StoreError;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        let stock = u32::try_from(row.remaining_stock).map_err(|_| {
            StoreError::Malformed(format!(
                "item {} has negative stock {}",
                row.id, row.remaining_stock
            ))
        })?;
        Item::new(
            ItemId::from(row.id),
            row.name,
            stock,
            row.category.and_then(Category::parse),
        )
        .map_err(|e| StoreError::Malformed(format!("item {}: {e}", row.id)))
    }
}

#[derive(Debug)]
struct SaleRow {
    item_id: i32,
    quantity: Option<i32>,
    timestamp: Option<NaiveDateTime>,
}

impl<'r> FromRow<'r, PgRow> for SaleRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            item_id: row.try_get("item_id")?,
            quantity: row.try_get("quantity")?,
            timestamp: row.try_get("timestamp")?,
        })
    }
}

impl SaleRow {
    fn into_sale(self) -> Result<SaleEvent, String> {
        let quantity = self
            .quantity
            .and_then(|q| u32::try_from(q).ok())
            .filter(|&q| q > 0)
            .ok_or_else(|| {
                format!(
                    "item {} has non-positive quantity {:?}",
                    self.item_id, self.quantity
                )
            })?;
        let at = self
            .timestamp
            .ok_or_else(|| format!("item {} has a sale without timestamp", self.item_id))?;
        SaleEvent::new(ItemId::from(self.item_id), quantity, at.and_utc())
            .map_err(|e| e.to_string())
    }
}
