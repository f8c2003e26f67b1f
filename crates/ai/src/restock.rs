use tracing::debug;

use stockwise_inventory::Item;

use crate::category::{CategoryEncoding, CategoryTrends};
use crate::forecast::RestockForecast;
use crate::history::{ItemHistory, SalesHistory};
use crate::job::AiJob;
use crate::regression::{
    FeatureRow, GradientBoostingConfig, GradientBoostingRegressor, Regressor,
};
use crate::result::AiError;
use crate::snapshot::InventorySnapshot;

/// Tunables of the restock heuristic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RestockPolicy {
    /// Smallest restock ever suggested; smaller raw values are raised to this.
    pub min_restock: u32,
    /// Forecast horizon in days.
    pub horizon_days: f64,
    /// Multiplier on the model's horizon prediction.
    pub model_safety_factor: f64,
    /// Multiplier on units sold when an item has exactly one sale.
    pub single_sale_multiplier: f64,
    /// Demand rate (units/day) assumed when neither item nor category has sales.
    pub default_trend: f64,
}

impl Default for RestockPolicy {
    fn default() -> Self {
        Self {
            min_restock: 5,
            horizon_days: 7.0,
            model_safety_factor: 1.2,
            single_sale_multiplier: 3.0,
            default_trend: 1.0,
        }
    }
}

impl RestockPolicy {
    fn validate(&self) -> Result<(), AiError> {
        let finite_positive = |v: f64| v.is_finite() && v > 0.0;
        if !finite_positive(self.horizon_days) {
            return Err(AiError::InvalidInput(
                "horizon_days must be a finite positive number".to_string(),
            ));
        }
        if !finite_positive(self.model_safety_factor)
            || !finite_positive(self.single_sale_multiplier)
        {
            return Err(AiError::InvalidInput(
                "multipliers must be finite positive numbers".to_string(),
            ));
        }
        if !(self.default_trend.is_finite() && self.default_trend >= 0.0) {
            return Err(AiError::InvalidInput(
                "default_trend must be finite and non-negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Floor `raw` to whole units, never below `min_restock`.
    pub fn restock_quantity(&self, raw: f64) -> u32 {
        let units = raw.floor();
        if units.is_nan() || units < f64::from(self.min_restock) {
            self.min_restock
        } else if units >= f64::from(u32::MAX) {
            u32::MAX
        } else {
            units as u32
        }
    }
}

/// Restock forecast over a full inventory snapshot.
///
/// Per item:
/// - no sales: demand is the category's aggregate rate (or `default_trend`), and
///   the suggestion covers `horizon_days` of that demand minus current stock;
/// - one sale: demand is that sale over one day, suggestion is
///   `single_sale_multiplier * sold - stock`;
/// - two or more: demand is `sold / span_days`; a boosted regression of quantity
///   on (days since first sale, category code) predicts the quantity at
///   `horizon_days`, and the suggestion is
///   `predicted * model_safety_factor + demand * horizon_days - stock`.
///
/// Every suggestion is floored and raised to at least `min_restock`.
#[derive(Debug, Clone)]
pub struct RestockJob {
    input: InventorySnapshot,
    policy: RestockPolicy,
    model: GradientBoostingConfig,
}

impl RestockJob {
    pub fn new(input: InventorySnapshot) -> Self {
        Self {
            input,
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

    fn forecast_item(
        &self,
        item: &Item,
        history: Option<&ItemHistory<'_>>,
        category_trends: &CategoryTrends,
        encoding: &CategoryEncoding,
    ) -> Result<(u32, f64), AiError> {
        let policy = &self.policy;
        let stock = f64::from(item.remaining_stock);

        let Some(history) = history.filter(|h| !h.is_empty()) else {
            let trend = category_trends
                .rate(item.category.as_ref())
                .unwrap_or(policy.default_trend);
            debug!(item_id = %item.id, trend, "no sales history; using category trend");
            return Ok((policy.restock_quantity(trend * policy.horizon_days - stock), trend));
        };

        let trend = history.trend();
        if history.len() < 2 {
            let raw = history.total_sold() * policy.single_sale_multiplier - stock;
            return Ok((policy.restock_quantity(raw), trend));
        }

        let code = encoding.code(item.category.as_ref());
        let (x, y): (Vec<FeatureRow>, Vec<f64>) = history
            .points()
            .into_iter()
            .map(|(days, qty)| ([days, code], qty))
            .unzip();

        let mut model = GradientBoostingRegressor::new(self.model);
        model.fit(&x, &y)?;
        let predicted = model.predict(&[policy.horizon_days, code])?;
        if !predicted.is_finite() {
            return Err(AiError::InferenceFailed(format!(
                "non-finite prediction for item {}",
                item.id
            )));
        }

        let raw = predicted * policy.model_safety_factor + trend * policy.horizon_days - stock;
        debug!(item_id = %item.id, predicted, trend, raw, "fitted restock model");
        Ok((policy.restock_quantity(raw), trend))
    }
}

impl AiJob for RestockJob {
    type Input = InventorySnapshot;
    type Output = RestockForecast;

    fn input(&self) -> &Self::Input {
        &self.input
    }

    fn run(&self) -> Result<RestockForecast, AiError> {
        self.policy.validate()?;
        self.model.validate()?;

        let InventorySnapshot { items, sales } = &self.input;
        let history = SalesHistory::group(sales);
        let category_trends = CategoryTrends::compute(items, sales);
        let encoding = CategoryEncoding::from_items(items);

        let mut forecast = RestockForecast::empty();
        for item in items {
            let (restock, trend) =
                self.forecast_item(item, history.get(item.id), &category_trends, &encoding)?;
            if restock > 0 {
                forecast.insert(item.id, restock, trend);
            }
        }

        Ok(forecast)
    }
}
