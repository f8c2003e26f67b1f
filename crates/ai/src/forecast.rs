use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use stockwise_core::ItemId;

/// Output of the restock predictor.
///
/// A missing key means "no suggestion available" for that item, which callers
/// must keep distinct from a suggestion of zero. An empty forecast is also what a
/// failed store read degrades to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestockForecast {
    /// Suggested restock quantity per item.
    pub predictions: BTreeMap<ItemId, u32>,
    /// Demand trend per item in units/day, rounded to 2 decimals.
    pub trends: BTreeMap<ItemId, f64>,
}

impl RestockForecast {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty() && self.trends.is_empty()
    }

    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    pub fn prediction(&self, item_id: ItemId) -> Option<u32> {
        self.predictions.get(&item_id).copied()
    }

    pub fn trend(&self, item_id: ItemId) -> Option<f64> {
        self.trends.get(&item_id).copied()
    }

    pub(crate) fn insert(&mut self, item_id: ItemId, restock: u32, trend: f64) {
        self.predictions.insert(item_id, restock);
        self.trends.insert(item_id, round_cents(trend));
    }
}

fn round_cents(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
