//! Small deterministic regression models used by the restock forecaster.

use crate::result::AiError;

/// Number of features per training row: days since first sale, category code.
pub const FEATURES: usize = 2;

pub type FeatureRow = [f64; FEATURES];

/// Supervised regressor over fixed-width feature rows.
pub trait Regressor {
    fn fit(&mut self, x: &[FeatureRow], y: &[f64]) -> Result<(), AiError>;

    fn predict(&self, x: &FeatureRow) -> Result<f64, AiError>;
}

/// Hyper-parameters for [`GradientBoostingRegressor`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientBoostingConfig {
    pub rounds: usize,
    pub learning_rate: f64,
    /// Minimum number of training rows on each side of a split.
    pub min_samples_leaf: usize,
}

impl Default for GradientBoostingConfig {
    fn default() -> Self {
        Self {
            rounds: 100,
            learning_rate: 0.1,
            min_samples_leaf: 20,
        }
    }
}

impl GradientBoostingConfig {
    pub fn validate(&self) -> Result<(), AiError> {
        if self.rounds == 0 {
            return Err(AiError::InvalidInput("rounds must be >= 1".to_string()));
        }
        if !(self.learning_rate.is_finite()
            && self.learning_rate > 0.0
            && self.learning_rate <= 1.0)
        {
            return Err(AiError::InvalidInput(
                "learning_rate must be in (0, 1]".to_string(),
            ));
        }
        if self.min_samples_leaf == 0 {
            return Err(AiError::InvalidInput(
                "min_samples_leaf must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Depth-1 regression tree: `x[feature] <= threshold` goes left.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Stump {
    feature: usize,
    threshold: f64,
    left: f64,
    right: f64,
}

impl Stump {
    fn eval(&self, x: &FeatureRow) -> f64 {
        if x[self.feature] <= self.threshold {
            self.left
        } else {
            self.right
        }
    }
}

/// Least-squares gradient boosting over regression stumps.
///
/// Starts from the target mean and adds `rounds` stumps, each fit to the current
/// residuals and shrunk by `learning_rate`. When no split leaves at least
/// `min_samples_leaf` rows per side, boosting stops and the model predicts the
/// mean. Sparse per-item histories usually land there with the default config.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientBoostingRegressor {
    config: GradientBoostingConfig,
    baseline: Option<f64>,
    stumps: Vec<Stump>,
}

impl Default for GradientBoostingRegressor {
    fn default() -> Self {
        Self::new(GradientBoostingConfig::default())
    }
}

impl GradientBoostingRegressor {
    pub fn new(config: GradientBoostingConfig) -> Self {
        Self {
            config,
            baseline: None,
            stumps: Vec::new(),
        }
    }

    /// Number of stumps kept after fitting.
    pub fn depth(&self) -> usize {
        self.stumps.len()
    }

    fn best_stump(&self, x: &[FeatureRow], residuals: &[f64]) -> Option<Stump> {
        let n = residuals.len();
        let min_leaf = self.config.min_samples_leaf;
        if n < 2 * min_leaf {
            return None;
        }

        let total: f64 = residuals.iter().sum();
        // Score of the unsplit node; a split must beat it.
        let mut best_score = total * total / n as f64 + 1e-12;
        let mut best: Option<Stump> = None;

        for feature in 0..FEATURES {
            let mut order: Vec<usize> = (0..n).collect();
            order.sort_by(|&a, &b| x[a][feature].total_cmp(&x[b][feature]));

            let mut left_sum = 0.0;
            for split in 1..n {
                left_sum += residuals[order[split - 1]];
                let left_n = split;
                let right_n = n - split;
                if left_n < min_leaf || right_n < min_leaf {
                    continue;
                }

                let lo = x[order[split - 1]][feature];
                let hi = x[order[split]][feature];
                if lo >= hi {
                    continue;
                }

                let right_sum = total - left_sum;
                let score = left_sum * left_sum / left_n as f64
                    + right_sum * right_sum / right_n as f64;
                if score > best_score {
                    best_score = score;
                    best = Some(Stump {
                        feature,
                        threshold: lo + (hi - lo) / 2.0,
                        left: self.config.learning_rate * left_sum / left_n as f64,
                        right: self.config.learning_rate * right_sum / right_n as f64,
                    });
                }
            }
        }

        best
    }
}

impl Regressor for GradientBoostingRegressor {
    fn fit(&mut self, x: &[FeatureRow], y: &[f64]) -> Result<(), AiError> {
        self.config.validate()?;

        if x.is_empty() {
            return Err(AiError::InvalidInput("cannot fit on an empty training set".to_string()));
        }
        if x.len() != y.len() {
            return Err(AiError::InvalidInput(format!(
                "feature/target length mismatch ({} rows, {} targets)",
                x.len(),
                y.len()
            )));
        }
        if x.iter().flatten().chain(y).any(|v| !v.is_finite()) {
            return Err(AiError::InvalidInput("training data must be finite".to_string()));
        }

        let baseline = y.iter().sum::<f64>() / y.len() as f64;
        let mut fitted = vec![baseline; y.len()];
        let mut stumps = Vec::new();

        for _ in 0..self.config.rounds {
            let residuals: Vec<f64> = y.iter().zip(&fitted).map(|(t, f)| t - f).collect();
            let Some(stump) = self.best_stump(x, &residuals) else {
                break;
            };
            for (row, f) in x.iter().zip(fitted.iter_mut()) {
                *f += stump.eval(row);
            }
            stumps.push(stump);
        }

        self.baseline = Some(baseline);
        self.stumps = stumps;
        Ok(())
    }

    fn predict(&self, x: &FeatureRow) -> Result<f64, AiError> {
        let baseline = self
            .baseline
            .ok_or_else(|| AiError::InferenceFailed("model has not been fitted".to_string()))?;
        Ok(baseline + self.stumps.iter().map(|s| s.eval(x)).sum::<f64>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(days: &[f64]) -> Vec<FeatureRow> {
        days.iter().map(|&d| [d, 0.0]).collect()
    }

    #[test]
    fn sparse_history_predicts_the_mean() {
        let mut model = GradientBoostingRegressor::default();
        model.fit(&rows(&[0.0, 1.0, 2.0]), &[2.0, 4.0, 6.0]).unwrap();

        assert_eq!(model.depth(), 0);
        assert_eq!(model.predict(&[7.0, 0.0]).unwrap(), 4.0);
    }

    #[test]
    fn learns_a_step_with_small_leaves() {
        let mut model = GradientBoostingRegressor::new(GradientBoostingConfig {
            min_samples_leaf: 1,
            ..GradientBoostingConfig::default()
        });
        model
            .fit(&rows(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]), &[1.0, 1.0, 1.0, 9.0, 9.0, 9.0])
            .unwrap();

        assert!(model.depth() > 0);
        assert!((model.predict(&[0.0, 0.0]).unwrap() - 1.0).abs() < 1e-3);
        assert!((model.predict(&[7.0, 0.0]).unwrap() - 9.0).abs() < 1e-3);
    }

    #[test]
    fn constant_features_never_split() {
        let mut model = GradientBoostingRegressor::new(GradientBoostingConfig {
            min_samples_leaf: 1,
            ..GradientBoostingConfig::default()
        });
        model.fit(&[[1.0, 2.0], [1.0, 2.0]], &[3.0, 5.0]).unwrap();
        assert_eq!(model.depth(), 0);
        assert_eq!(model.predict(&[1.0, 2.0]).unwrap(), 4.0);
    }

    #[test]
    fn rejects_bad_training_data() {
        let mut model = GradientBoostingRegressor::default();
        assert!(matches!(model.fit(&[], &[]), Err(AiError::InvalidInput(_))));
        assert!(matches!(model.fit(&rows(&[0.0]), &[1.0, 2.0]), Err(AiError::InvalidInput(_))));
        assert!(matches!(
            model.fit(&rows(&[f64::NAN]), &[1.0]),
            Err(AiError::InvalidInput(_))
        ));
    }

    #[test]
    fn predicting_before_fit_fails() {
        let model = GradientBoostingRegressor::default();
        assert!(matches!(model.predict(&[0.0, 0.0]), Err(AiError::InferenceFailed(_))));
    }

    #[test]
    fn invalid_config_is_rejected_at_fit() {
        let mut model = GradientBoostingRegressor::new(GradientBoostingConfig {
            learning_rate: 0.0,
            ..GradientBoostingConfig::default()
        });
        assert!(model.fit(&rows(&[0.0]), &[1.0]).is_err());
    }
}
