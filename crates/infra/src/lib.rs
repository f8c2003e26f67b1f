//! Infrastructure layer: store adapters, configuration and the request-scoped
//! restock predictor that the web layer calls into.

pub mod config;
pub mod predictor;
pub mod store;
pub mod suggestions;

#[cfg(test)]
mod integration_tests;

pub use config::{AppConfig, ConfigError, StoreConfig};
pub use predictor::{PredictError, RestockPredictor};
pub use store::{InMemoryInventoryStore, InventoryReader, PostgresInventoryStore, StoreError};
pub use suggestions::{RestockSuggestion, SuggestionPolicy, build_suggestions};
