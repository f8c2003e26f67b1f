use serde::{Deserialize, Serialize};

use stockwise_inventory::{Item, SaleEvent};

/// Point-in-time view of the catalogue and its sell history.
///
/// `items` holds every item, including those that never sold; `sales` holds only
/// sell actions. Sales are unordered as loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub items: Vec<Item>,
    pub sales: Vec<SaleEvent>,
}

impl InventorySnapshot {
    pub fn new(items: Vec<Item>, sales: Vec<SaleEvent>) -> Self {
        Self { items, sales }
    }
}
