//! Caller-side merge of low-stock items with the restock forecast.

use serde::{Deserialize, Serialize};

use stockwise_ai::RestockForecast;
use stockwise_core::ItemId;
use stockwise_inventory::Item;

/// How the suggestions view selects items and fills gaps in the forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionPolicy {
    /// Items with stock strictly below this are shown.
    pub low_stock_threshold: u32,
    /// Stock level the fallback suggestion tops items up to.
    pub target_stock: u32,
}

impl Default for SuggestionPolicy {
    fn default() -> Self {
        Self {
            low_stock_threshold: 10,
            target_stock: 20,
        }
    }
}

/// One row of the suggestions view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestockSuggestion {
    pub item_id: ItemId,
    pub name: String,
    pub remaining_stock: u32,
    pub quantity: u32,
    /// Units/day; `0.0` when the forecast had nothing for this item.
    pub trend: f64,
    /// Whether `quantity` came from the forecast rather than the fallback.
    pub predicted: bool,
}

/// Merge `low_items` with `forecast` by item id.
///
/// Items missing from the forecast (including every item when the forecast is
/// empty because the store read failed) get `max(target_stock - stock, 0)` and
/// a trend of zero.
pub fn build_suggestions(
    low_items: &[Item],
    forecast: &RestockForecast,
    policy: &SuggestionPolicy,
) -> Vec<RestockSuggestion> {
    low_items
        .iter()
        .map(|item| {
            let predicted = forecast.prediction(item.id);
            RestockSuggestion {
                item_id: item.id,
                name: item.name.clone(),
                remaining_stock: item.remaining_stock,
                quantity: predicted
                    .unwrap_or_else(|| policy.target_stock.saturating_sub(item.remaining_stock)),
                trend: forecast.trend(item.id).unwrap_or(0.0),
                predicted: predicted.is_some(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockwise_ai::{AiJob, InventorySnapshot, RestockJob};
    use stockwise_inventory::Category;

    fn item(id: i64, name: &str, stock: u32) -> Item {
        Item::new(ItemId::new(id), name, stock, Category::parse("Stationery")).unwrap()
    }

    #[test]
    fn empty_forecast_falls_back_to_target_deficit() {
        let items = vec![item(1, "Pen", 3), item(2, "Ink", 25)];

        let rows = build_suggestions(
            &items,
            &RestockForecast::empty(),
            &SuggestionPolicy::default(),
        );

        assert_eq!(rows[0].quantity, 17);
        assert_eq!(rows[0].trend, 0.0);
        assert!(!rows[0].predicted);
        // Never negative.
        assert_eq!(rows[1].quantity, 0);
    }

    #[test]
    fn forecast_values_take_precedence() {
        let items = vec![item(1, "Pen", 3)];
        let forecast = RestockJob::new(InventorySnapshot::new(items.clone(), vec![]))
            .run()
            .unwrap();

        let rows = build_suggestions(&items, &forecast, &SuggestionPolicy::default());

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Pen");
        assert_eq!(rows[0].quantity, 5);
        assert_eq!(rows[0].trend, 1.0);
        assert!(rows[0].predicted);
    }
}
