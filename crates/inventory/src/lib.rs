//! Inventory domain module.
//!
//! Plain records for items and their sale history plus the few business rules
//! that operate on them (selling stock, selecting low-stock items). No IO.

pub mod alerts;
pub mod item;
pub mod sale;

pub use alerts::{ALERT_THRESHOLD, LowStock, LowStockAlert, low_stock_alert};
pub use item::{Category, Item};
pub use sale::{SaleEvent, StockAction};
