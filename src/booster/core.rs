use crate::binning::bin_matrix;
use crate::booster::config::BoosterConfig;
use crate::constants::ITER_LIMIT;
use crate::data::Matrix;
use crate::errors::PlannerError;
use crate::metric::metric_callables;
use crate::sampler::{RandomSampler, Sampler};
use crate::splitter::HistogramSplitter;
use crate::tree::{Tree, TreeLimits};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Gradient boosted regression trees over the revenue feature space.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RevenueBooster {
    /// Hyperparameters used to fit the booster.
    pub cfg: BoosterConfig,
    /// Prediction before any tree is added.
    pub base_score: f64,
    /// Number of feature columns seen at fit time.
    pub n_features: usize,
    /// Fitted trees, in boosting order.
    pub trees: Vec<Tree>,
}

impl Default for RevenueBooster {
    fn default() -> Self {
        RevenueBooster::new(BoosterConfig::default())
    }
}

impl RevenueBooster {
    pub fn new(cfg: BoosterConfig) -> Self {
        RevenueBooster {
            cfg,
            base_score: 0.0,
            n_features: 0,
            trees: Vec::new(),
        }
    }

    /// Fit the booster, replacing any previously fitted trees.
    ///
    /// * `data` - Column-major feature matrix. Missing values are NaN.
    /// * `y` - Target of every row of `data`.
    pub fn fit(&mut self, data: &Matrix<f64>, y: &[f64]) -> Result<(), PlannerError> {
        self.cfg.validate()?;
        if data.rows == 0 || data.cols == 0 {
            return Err(PlannerError::Training("no rows or no columns to fit on".to_string()));
        }
        if y.len() != data.rows {
            return Err(PlannerError::Training(format!(
                "target has {} values but the data has {} rows",
                y.len(),
                data.rows
            )));
        }
        if y.iter().any(|v| !v.is_finite()) {
            return Err(PlannerError::Training("target contains non-finite values".to_string()));
        }

        let start = Instant::now();
        let objective_fn = self.cfg.objective.as_function();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.cfg.num_threads.unwrap_or(0))
            .build()
            .map_err(|e| PlannerError::Training(e.to_string()))?;

        let binned = bin_matrix(data, None, self.cfg.max_bin)?;
        let bdata = Matrix::new(&binned.binned_data, data.rows, data.cols);

        self.trees.clear();
        self.n_features = data.cols;
        self.base_score = objective_fn.initial_value(y);
        let mut yhat = vec![self.base_score; y.len()];

        let splitter = HistogramSplitter::new(
            self.cfg.learning_rate,
            self.cfg.lambda,
            self.cfg.gamma,
            self.cfg.min_child_weight,
        );
        let limits = TreeLimits {
            max_depth: self.cfg.max_depth,
            max_leaves: self.cfg.max_leaves,
            grow_policy: self.cfg.grow_policy,
        };
        let mut rng = StdRng::seed_from_u64(self.cfg.seed);
        let mut sampler = RandomSampler::new(self.cfg.subsample);
        let verbose = self.cfg.log_iterations > 0;
        let metric = objective_fn.default_metric();
        let metric_fn = metric_callables(&metric);
        let sample_weight = vec![1.0; y.len()];

        let n_rounds = self.cfg.n_estimators.min(ITER_LIMIT);
        for i in 0..n_rounds {
            let (grad, hess) = objective_fn.gradient(y, &yhat);

            let index = if self.cfg.subsample < 1.0 {
                sampler.sample(&mut rng, &data.index).0
            } else {
                data.index.clone()
            };
            if index.is_empty() {
                warn!("Round {} sampled no rows, skipping.", i);
                continue;
            }

            let mut tree = Tree::new();
            tree.fit(&bdata, &binned, index, &grad, &hess, &splitter, &pool, &limits);

            let preds = pool.install(|| tree.predict(data, true));
            yhat.iter_mut().zip(preds).for_each(|(p, v)| *p += v);

            if verbose && i % self.cfg.log_iterations == 0 {
                let loss = objective_fn.loss(y, &yhat);
                info!(
                    "round {:0?}, tree.nodes: {:1?}, tree.depth: {:2?}, loss: {:3?}, {:4?}: {:5?}",
                    i,
                    tree.nodes.len(),
                    tree.depth,
                    loss.iter().sum::<f64>() / loss.len() as f64,
                    metric,
                    metric_fn(y, &yhat, &sample_weight),
                );
            }

            let stump = tree.nodes.len() == 1;
            self.trees.push(tree);
            if stump && self.cfg.subsample >= 1.0 {
                // Gradients only change by a constant from here on, no split can appear.
                info!("Stopping at round {} since no split improves the loss.", i);
                break;
            }
        }

        if verbose {
            info!(
                "Finished training a booster with {0} trees in {1} seconds.",
                self.trees.len(),
                start.elapsed().as_secs()
            );
        }
        Ok(())
    }
}
