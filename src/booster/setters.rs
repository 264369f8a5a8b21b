use crate::booster::core::RevenueBooster;
use crate::grower::GrowPolicy;
use crate::objective::Objective;

impl RevenueBooster {
    // Set methods for parameters

    /// Set the objective on the booster.
    /// * `objective` - The objective type of the booster.
    pub fn set_objective(mut self, objective: Objective) -> Self {
        self.cfg.objective = objective;
        self
    }

    /// Set the learning rate applied to every leaf weight.
    pub fn set_learning_rate(mut self, learning_rate: f64) -> Self {
        self.cfg.learning_rate = learning_rate;
        self
    }

    /// Set the number of boosting rounds.
    pub fn set_n_estimators(mut self, n_estimators: usize) -> Self {
        self.cfg.n_estimators = n_estimators;
        self
    }

    pub fn set_max_depth(mut self, max_depth: usize) -> Self {
        self.cfg.max_depth = max_depth;
        self
    }

    pub fn set_max_leaves(mut self, max_leaves: Option<usize>) -> Self {
        self.cfg.max_leaves = max_leaves;
        self
    }

    /// Set the grow policy.
    /// * `grow_policy` - `DepthWise` expands level by level, `LossGuide` expands the best gain first.
    pub fn set_grow_policy(mut self, grow_policy: GrowPolicy) -> Self {
        self.cfg.grow_policy = grow_policy;
        self
    }

    pub fn set_lambda(mut self, lambda: f64) -> Self {
        self.cfg.lambda = lambda;
        self
    }

    pub fn set_gamma(mut self, gamma: f64) -> Self {
        self.cfg.gamma = gamma;
        self
    }

    pub fn set_min_child_weight(mut self, min_child_weight: f64) -> Self {
        self.cfg.min_child_weight = min_child_weight;
        self
    }

    /// Set the share of rows sampled for each tree.
    pub fn set_subsample(mut self, subsample: f64) -> Self {
        self.cfg.subsample = subsample;
        self
    }

    /// Set the number of bins on the booster.
    /// * `max_bin` - Number of bins to calculate to partition the data. If there are
    ///   fewer unique values in a column, all unique values will be used.
    pub fn set_max_bin(mut self, max_bin: u16) -> Self {
        self.cfg.max_bin = max_bin;
        self
    }

    /// Set the number of threads on the booster.
    /// * `num_threads` - Set the number of threads to be used during training.
    pub fn set_num_threads(mut self, num_threads: Option<usize>) -> Self {
        self.cfg.num_threads = num_threads;
        self
    }

    /// Set how often training progress is logged.
    pub fn set_log_iterations(mut self, log_iterations: usize) -> Self {
        self.cfg.log_iterations = log_iterations;
        self
    }

    pub fn set_seed(mut self, seed: u64) -> Self {
        self.cfg.seed = seed;
        self
    }
}
