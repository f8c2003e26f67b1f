//! `stockwise-ai`
//!
//! **Responsibility:** restock forecasting over a read-only inventory snapshot.
//!
//! This crate stays storage-agnostic:
//! - It never reads from or writes to a store; callers hand it a snapshot.
//! - It never mutates inventory state.
//! - It emits **forecasts** (suggested quantities and demand trends), not commands.

pub mod category;
pub mod forecast;
pub mod history;
pub mod job;
pub mod regression;
pub mod restock;
pub mod result;
pub mod snapshot;

pub use category::{CategoryEncoding, CategoryTrends};
pub use forecast::RestockForecast;
pub use job::AiJob;
pub use regression::{FeatureRow, GradientBoostingConfig, GradientBoostingRegressor, Regressor};
pub use restock::{RestockJob, RestockPolicy};
pub use result::AiError;
pub use snapshot::InventorySnapshot;
