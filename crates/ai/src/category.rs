//! Category-level aggregates: fallback demand rates and the feature encoding.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, Utc};

use stockwise_core::ItemId;
use stockwise_inventory::{Category, Item, SaleEvent};

use crate::history::span_days;

/// Code used for items without a (known) category.
pub const UNCATEGORISED_CODE: f64 = -1.0;

/// Fixed category → integer mapping for one forecasting run.
///
/// Built once from the full category set and shared by every fit and every
/// prediction row, so a category always encodes to the same value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryEncoding {
    codes: BTreeMap<Category, usize>,
}

impl CategoryEncoding {
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a Item>) -> Self {
        let names: BTreeSet<&Category> = items
            .into_iter()
            .filter_map(|i| i.category.as_ref())
            .collect();
        Self {
            codes: names
                .into_iter()
                .enumerate()
                .map(|(code, c)| (c.clone(), code))
                .collect(),
        }
    }

    pub fn code(&self, category: Option<&Category>) -> f64 {
        category
            .and_then(|c| self.codes.get(c))
            .map_or(UNCATEGORISED_CODE, |&code| code as f64)
    }
}

#[derive(Debug, Clone, Copy)]
struct CategoryTotals {
    sold: f64,
    earliest: DateTime<Utc>,
    latest: DateTime<Utc>,
}

/// Aggregate units/day per category across all of its items' sales.
///
/// Categories without any sales have no entry. Sales of uncategorised items, or
/// of items missing from the catalogue, do not contribute.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryTrends {
    rates: BTreeMap<Category, f64>,
}

impl CategoryTrends {
    pub fn compute(items: &[Item], sales: &[SaleEvent]) -> Self {
        let category_of: HashMap<ItemId, &Category> = items
            .iter()
            .filter_map(|i| i.category.as_ref().map(|c| (i.id, c)))
            .collect();

        let mut totals: BTreeMap<&Category, CategoryTotals> = BTreeMap::new();
        for sale in sales {
            let Some(category) = category_of.get(&sale.item_id) else {
                continue;
            };
            totals
                .entry(category)
                .and_modify(|t| {
                    t.sold += f64::from(sale.quantity);
                    t.earliest = t.earliest.min(sale.occurred_at);
                    t.latest = t.latest.max(sale.occurred_at);
                })
                .or_insert(CategoryTotals {
                    sold: f64::from(sale.quantity),
                    earliest: sale.occurred_at,
                    latest: sale.occurred_at,
                });
        }

        Self {
            rates: totals
                .into_iter()
                .map(|(c, t)| (c.clone(), t.sold / span_days(t.earliest, t.latest)))
                .collect(),
        }
    }

    pub fn rate(&self, category: Option<&Category>) -> Option<f64> {
        category.and_then(|c| self.rates.get(c)).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
