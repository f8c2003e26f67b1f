//! Low-stock selection and the alert text sent to operators.

use crate::item::Item;

/// Items strictly below this stock level trigger an alert.
pub const ALERT_THRESHOLD: u32 = 5;

const ALERT_SUBJECT: &str = "Low Stock Alert - Inventory Manager";

/// Selection of items whose remaining stock is below a caller-chosen threshold.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LowStock {
    threshold: u32,
}

impl LowStock {
    pub fn below(threshold: u32) -> Self {
        Self { threshold }
    }

    pub fn matches(&self, item: &Item) -> bool {
        item.remaining_stock < self.threshold
    }

    /// Filter `items`, preserving their order.
    pub fn select<'a>(&self, items: impl IntoIterator<Item = &'a Item>) -> Vec<&'a Item> {
        items.into_iter().filter(|i| self.matches(i)).collect()
    }
}

/// Rendered low-stock notification. Delivery is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LowStockAlert {
    pub subject: String,
    pub body: String,
}

/// Build the alert for items below [`ALERT_THRESHOLD`], or `None` if stock is healthy.
pub fn low_stock_alert<'a>(items: impl IntoIterator<Item = &'a Item>) -> Option<LowStockAlert> {
    let low = LowStock::below(ALERT_THRESHOLD).select(items);
    if low.is_empty() {
        return None;
    }

    let listing = low
        .iter()
        .map(|i| format!("{} ({} units)", i.name, i.remaining_stock))
        .collect::<Vec<_>>()
        .join(", ");

    Some(LowStockAlert {
        subject: ALERT_SUBJECT.to_string(),
        body: format!("Low stock items detected:\n{listing}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Category;
    use stockwise_core::ItemId;

    fn item(id: i64, name: &str, stock: u32) -> Item {
        Item::new(ItemId::new(id), name, stock, Category::parse("Stationery")).unwrap()
    }

    #[test]
    fn select_is_strictly_below_threshold() {
        let items = vec![item(1, "Pen", 9), item(2, "Desk", 10), item(3, "Ink", 0)];
        let low = LowStock::below(10).select(&items);
        let ids: Vec<_> = low.iter().map(|i| i.id.get()).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn alert_lists_every_low_item() {
        let items = vec![item(1, "Laptop", 8), item(2, "Pen", 3), item(3, "Ink", 0)];
        let alert = low_stock_alert(&items).unwrap();
        assert_eq!(alert.subject, "Low Stock Alert - Inventory Manager");
        assert_eq!(alert.body, "Low stock items detected:\nPen (3 units), Ink (0 units)");
    }

    #[test]
    fn no_alert_when_stock_is_healthy() {
        let items = vec![item(1, "Laptop", 5)];
        assert_eq!(low_stock_alert(&items), None);
    }
}
