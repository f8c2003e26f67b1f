//! Per-item sell history, ordered by time.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use stockwise_core::ItemId;
use stockwise_inventory::SaleEvent;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Whole days between two instants, floored at 1 so it can divide.
pub(crate) fn span_days(earliest: DateTime<Utc>, latest: DateTime<Utc>) -> f64 {
    (latest - earliest).num_days().max(1) as f64
}

/// Sell events of a single item, sorted by timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemHistory<'a> {
    sales: Vec<&'a SaleEvent>,
}

impl<'a> ItemHistory<'a> {
    fn new(mut sales: Vec<&'a SaleEvent>) -> Self {
        sales.sort_by_key(|s| s.occurred_at);
        Self { sales }
    }

    pub fn len(&self) -> usize {
        self.sales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sales.is_empty()
    }

    pub fn total_sold(&self) -> f64 {
        self.sales.iter().map(|s| f64::from(s.quantity)).sum()
    }

    /// Observed span in whole days (minimum 1).
    pub fn span_days(&self) -> f64 {
        match (self.sales.first(), self.sales.last()) {
            (Some(first), Some(last)) => span_days(first.occurred_at, last.occurred_at),
            _ => 1.0,
        }
    }

    /// Units sold per day over the observed span.
    pub fn trend(&self) -> f64 {
        self.total_sold() / self.span_days()
    }

    /// `(fractional days since the first sale, quantity)` for every event.
    pub fn points(&self) -> Vec<(f64, f64)> {
        let Some(first) = self.sales.first() else {
            return vec![];
        };
        self.sales
            .iter()
            .map(|s| {
                let elapsed =
                    (s.occurred_at - first.occurred_at).num_milliseconds() as f64 / 1000.0;
                (elapsed / SECONDS_PER_DAY, f64::from(s.quantity))
            })
            .collect()
    }
}

/// Sell histories keyed by item.
#[derive(Debug, Clone, Default)]
pub struct SalesHistory<'a> {
    by_item: BTreeMap<ItemId, ItemHistory<'a>>,
}

impl<'a> SalesHistory<'a> {
    pub fn group(sales: &'a [SaleEvent]) -> Self {
        let mut grouped: BTreeMap<ItemId, Vec<&'a SaleEvent>> = BTreeMap::new();
        for sale in sales {
            grouped.entry(sale.item_id).or_default().push(sale);
        }
        Self {
            by_item: grouped
                .into_iter()
                .map(|(id, sales)| (id, ItemHistory::new(sales)))
                .collect(),
        }
    }

    pub fn get(&self, item_id: ItemId) -> Option<&ItemHistory<'a>> {
        self.by_item.get(&item_id)
    }
}
