//! End-to-end tests for the prediction pipeline.
//!
//! Tests: Store → Snapshot → RestockJob → Forecast → Suggestions
//!
//! Verifies:
//! - The sample catalogue produces the expected suggestions
//! - Store failures degrade to an empty forecast and fallback rows
//! - Recorded sales feed the next forecast
//! - Low-stock alerts need only the low-stock listing

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use stockwise_ai::{InventorySnapshot, RestockForecast};
    use stockwise_core::ItemId;
    use stockwise_inventory::{ALERT_THRESHOLD, Category, Item, SaleEvent, low_stock_alert};

    use crate::predictor::{PredictError, RestockPredictor};
    use crate::store::{InMemoryInventoryStore, InventoryReader, StoreError};
    use crate::suggestions::SuggestionPolicy;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 2, 8, 0, 0).unwrap()
    }

    fn item(id: i64, name: &str, stock: u32, category: &str) -> Item {
        Item::new(ItemId::new(id), name, stock, Category::parse(category)).unwrap()
    }

    fn sale(id: i64, qty: u32, days_ago: i64) -> SaleEvent {
        SaleEvent::new(ItemId::new(id), qty, now() - Duration::days(days_ago)).unwrap()
    }

    /// The seed catalogue: Laptop, Chair, Pen with a few days of sales.
    fn seeded_store() -> Arc<InMemoryInventoryStore> {
        let store = Arc::new(InMemoryInventoryStore::new());
        store.upsert_item(item(1, "Laptop", 8, "Electronics")).unwrap();
        store.upsert_item(item(2, "Chair", 15, "Furniture")).unwrap();
        store.upsert_item(item(3, "Pen", 3, "Stationery")).unwrap();
        for s in [sale(1, 1, 1), sale(1, 2, 2), sale(2, 3, 3), sale(3, 1, 4)] {
            store.append_sale(s).unwrap();
        }
        store
    }

    /// Reader whose store is unreachable.
    struct UnreachableStore;

    #[async_trait]
    impl InventoryReader for UnreachableStore {
        async fn load_snapshot(&self) -> Result<InventorySnapshot, StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }

        async fn low_stock_items(&self, _threshold: u32) -> Result<Vec<Item>, StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
    }

    /// Reader that lists low-stock items but fails the forecast read.
    struct FlakyStore {
        items: Vec<Item>,
    }

    #[async_trait]
    impl InventoryReader for FlakyStore {
        async fn load_snapshot(&self) -> Result<InventorySnapshot, StoreError> {
            Err(StoreError::Query(
                "relation \"stock_history\" does not exist".to_string(),
            ))
        }

        async fn low_stock_items(&self, threshold: u32) -> Result<Vec<Item>, StoreError> {
            Ok(self
                .items
                .iter()
                .filter(|i| i.remaining_stock < threshold)
                .cloned()
                .collect())
        }
    }

    #[tokio::test]
    async fn seeded_catalogue_forecast() {
        let predictor = RestockPredictor::new(seeded_store());

        let forecast = predictor.predict().await;

        // Laptop: two sales (1 + 2 units over 1 day) -> trend 3, model mean 1.5:
        // floor(1.5*1.2 + 3*7 - 8) = floor(14.8) = 14
        assert_eq!(forecast.trend(ItemId::new(1)), Some(3.0));
        assert_eq!(forecast.prediction(ItemId::new(1)), Some(14));
        // Chair: one sale of 3 -> max(5, 9 - 15) = 5
        assert_eq!(forecast.trend(ItemId::new(2)), Some(3.0));
        assert_eq!(forecast.prediction(ItemId::new(2)), Some(5));
        // Pen: one sale of 1 -> max(5, 3 - 3) = 5
        assert_eq!(forecast.trend(ItemId::new(3)), Some(1.0));
        assert_eq!(forecast.prediction(ItemId::new(3)), Some(5));
    }

    #[tokio::test]
    async fn suggestions_cover_low_stock_items_only() {
        let predictor = RestockPredictor::new(seeded_store());

        let rows = predictor.suggestions(&SuggestionPolicy::default()).await.unwrap();

        let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Laptop", "Pen"]);
        assert_eq!(rows[0].quantity, 14);
        assert!(rows.iter().all(|r| r.predicted));
    }

    #[tokio::test]
    async fn unreachable_store_yields_empty_forecast() {
        let predictor = RestockPredictor::new(UnreachableStore);

        assert_eq!(predictor.predict().await, RestockForecast::empty());
        assert!(matches!(
            predictor.try_predict().await,
            Err(PredictError::Store(StoreError::Unavailable(_)))
        ));
        assert!(predictor.suggestions(&SuggestionPolicy::default()).await.is_err());
    }

    #[tokio::test]
    async fn failed_forecast_degrades_to_fallback_rows() {
        let predictor = RestockPredictor::new(FlakyStore {
            items: vec![item(1, "Laptop", 8, "Electronics"), item(3, "Pen", 3, "Stationery")],
        });

        let rows = predictor.suggestions(&SuggestionPolicy::default()).await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].quantity, 12);
        assert_eq!(rows[1].quantity, 17);
        assert!(rows.iter().all(|r| r.trend == 0.0 && !r.predicted));
    }

    #[tokio::test]
    async fn empty_store_yields_empty_forecast() {
        let predictor = RestockPredictor::new(Arc::new(InMemoryInventoryStore::new()));
        assert!(predictor.predict().await.is_empty());
    }

    #[tokio::test]
    async fn recorded_sales_feed_the_next_forecast() {
        let store = Arc::new(InMemoryInventoryStore::new());
        store.upsert_item(item(7, "Desk", 30, "Furniture")).unwrap();
        let predictor = RestockPredictor::new(store.clone());

        // No history anywhere: default 1.0/day -> max(5, 7 - 30) = 5
        let before = predictor.predict().await;
        assert_eq!(before.trend(ItemId::new(7)), Some(1.0));

        store.record_sale(ItemId::new(7), 12, now()).unwrap();

        // One sale of 12, stock now 18: max(5, 36 - 18) = 18
        let after = predictor.predict().await;
        assert_eq!(after.trend(ItemId::new(7)), Some(12.0));
        assert_eq!(after.prediction(ItemId::new(7)), Some(18));
    }

    #[tokio::test]
    async fn alert_is_built_from_the_low_stock_listing() {
        let store = seeded_store();

        let low = store.low_stock_items(ALERT_THRESHOLD).await.unwrap();
        let alert = low_stock_alert(&low).unwrap();

        assert_eq!(alert.body, "Low stock items detected:\nPen (3 units)");
    }

    #[tokio::test]
    async fn alert_does_not_depend_on_the_sales_history() {
        let store = FlakyStore {
            items: vec![item(1, "Laptop", 8, "Electronics"), item(3, "Pen", 0, "Stationery")],
        };

        assert!(store.load_snapshot().await.is_err());
        let low = store.low_stock_items(ALERT_THRESHOLD).await.unwrap();

        let alert = low_stock_alert(&low).unwrap();
        assert_eq!(alert.body, "Low stock items detected:\nPen (0 units)");
    }
}
