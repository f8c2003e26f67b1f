//! Request-scoped restock prediction service.

use thiserror::Error;
use tracing::{info, instrument, warn};

use stockwise_ai::{
    AiError, AiJob, GradientBoostingConfig, RestockForecast, RestockJob, RestockPolicy,
};

use crate::store::{InventoryReader, StoreError};
use crate::suggestions::{RestockSuggestion, SuggestionPolicy, build_suggestions};

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("failed to read inventory: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Inference(#[from] AiError),
}

/// Reads a fresh snapshot on every call and runs the restock job over it.
///
/// Holds no state between calls, so concurrent callers need no coordination.
#[derive(Debug, Clone)]
pub struct RestockPredictor<R> {
    reader: R,
    policy: RestockPolicy,
    model: GradientBoostingConfig,
}

impl<R> RestockPredictor<R>
where
    R: InventoryReader,
{
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            policy: RestockPolicy::default(),
            model: GradientBoostingConfig::default(),
        }
    }

    pub fn with_policy(mut self, policy: RestockPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_model(mut self, model: GradientBoostingConfig) -> Self {
        self.model = model;
        self
    }

    /// Forecast every item, or return an empty forecast if anything fails.
    ///
    /// An empty result means "no prediction available", not "nothing to restock".
    #[instrument(skip(self))]
    pub async fn predict(&self) -> RestockForecast {
        match self.try_predict().await {
            Ok(forecast) => {
                info!(prediction_count = forecast.len(), "restock forecast computed");
                forecast
            }
            Err(e) => {
                warn!(error = %e, "restock forecast unavailable; returning empty forecast");
                RestockForecast::empty()
            }
        }
    }

    /// Same as [`predict`](Self::predict) but surfaces the failure.
    pub async fn try_predict(&self) -> Result<RestockForecast, PredictError> {
        let snapshot = self.reader.load_snapshot().await?;
        let job = RestockJob::new(snapshot)
            .with_policy(self.policy)
            .with_model(self.model);
        Ok(job.run()?)
    }

    /// Low-stock items merged with the forecast.
    ///
    /// Failing to list low-stock items is an error for the caller; a failed
    /// forecast only degrades the rows to their fallback values.
    #[instrument(skip(self))]
    pub async fn suggestions(
        &self,
        policy: &SuggestionPolicy,
    ) -> Result<Vec<RestockSuggestion>, StoreError> {
        let low_items = self.reader.low_stock_items(policy.low_stock_threshold).await?;
        let forecast = self.predict().await;
        Ok(build_suggestions(&low_items, &forecast, policy))
    }
}
