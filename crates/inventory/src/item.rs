use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockwise_core::{DomainError, DomainResult, ItemId};

use crate::sale::SaleEvent;

/// Category name an item is filed under.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    /// Build a category from a raw column value.
    ///
    /// Blank names are treated as "no category" and yield `None`.
    pub fn parse(raw: impl AsRef<str>) -> Option<Self> {
        let name = raw.as_ref().trim();
        if name.is_empty() {
            None
        } else {
            Some(Self(name.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Inventory item as seen by readers: identity, name, current stock and category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub remaining_stock: u32,
    pub category: Option<Category>,
}

impl Item {
    pub fn new(
        id: ItemId,
        name: impl Into<String>,
        remaining_stock: u32,
        category: Option<Category>,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        Ok(Self {
            id,
            name,
            remaining_stock,
            category,
        })
    }

    /// Sell `quantity` units, returning the history record to append.
    pub fn sell(&mut self, quantity: u32, at: DateTime<Utc>) -> DomainResult<SaleEvent> {
        if quantity == 0 {
            return Err(DomainError::validation("quantity cannot be zero"));
        }
        if quantity > self.remaining_stock {
            return Err(DomainError::invariant("stock cannot go negative"));
        }

        self.remaining_stock -= quantity;
        SaleEvent::new(self.id, quantity, at)
    }
}
