use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockwise_core::{DomainError, DomainResult, ItemId};

/// Kind of stock movement recorded in the history table.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockAction {
    Add,
    Sell,
    Edit,
}

impl StockAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockAction::Add => "add",
            StockAction::Sell => "sell",
            StockAction::Edit => "edit",
        }
    }
}

impl core::fmt::Display for StockAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for StockAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "add" => Ok(StockAction::Add),
            "sell" => Ok(StockAction::Sell),
            "edit" => Ok(StockAction::Edit),
            other => Err(DomainError::validation(format!("unknown stock action: {other}"))),
        }
    }
}

/// One historical sell action for an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleEvent {
    pub item_id: ItemId,
    /// Units sold; always positive.
    pub quantity: u32,
    pub occurred_at: DateTime<Utc>,
}

impl SaleEvent {
    pub fn new(item_id: ItemId, quantity: u32, occurred_at: DateTime<Utc>) -> DomainResult<Self> {
        if quantity == 0 {
            return Err(DomainError::validation("sale quantity must be positive"));
        }
        Ok(Self {
            item_id,
            quantity,
            occurred_at,
        })
    }
}
