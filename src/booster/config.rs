//! Booster Configuration
//!
//! Hyperparameters of the revenue booster and the JSON IO shared by every
//! configuration type of the crate.
use crate::binning::MAX_BIN_LIMIT;
use crate::constants::ITER_LIMIT;
use crate::errors::PlannerError;
use crate::grower::GrowPolicy;
use crate::objective::Objective;
use crate::utils::{validate_float_parameter, validate_positive_float_parameter};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_learning_rate() -> f64 {
    0.3
}
fn default_n_estimators() -> usize {
    100
}
fn default_max_depth() -> usize {
    6
}
fn default_lambda() -> f64 {
    1.0
}
fn default_min_child_weight() -> f64 {
    1.0
}
fn default_subsample() -> f64 {
    1.0
}
fn default_max_bin() -> u16 {
    256
}

/// Configuration for the `RevenueBooster`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BoosterConfig {
    /// Learning objective.
    #[serde(default)]
    pub objective: Objective,
    /// Step size applied to every leaf weight.
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    /// Number of boosting rounds.
    #[serde(default = "default_n_estimators")]
    pub n_estimators: usize,
    /// Maximum depth of each tree.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Maximum number of leaves of each tree.
    #[serde(default)]
    pub max_leaves: Option<usize>,
    /// Order in which tree nodes are expanded.
    #[serde(default)]
    pub grow_policy: GrowPolicy,
    /// L2 regularization on leaf weights.
    #[serde(default = "default_lambda")]
    pub lambda: f64,
    /// Minimum gain required to split a node.
    #[serde(default)]
    pub gamma: f64,
    /// Minimum hessian sum in a child node.
    #[serde(default = "default_min_child_weight")]
    pub min_child_weight: f64,
    /// Share of rows sampled for each tree.
    #[serde(default = "default_subsample")]
    pub subsample: f64,
    /// Maximum number of bins for discretization.
    #[serde(default = "default_max_bin")]
    pub max_bin: u16,
    /// Number of threads for parallel tasks.
    #[serde(default)]
    pub num_threads: Option<usize>,
    /// Logging frequency (every N iterations).
    #[serde(default)]
    pub log_iterations: usize,
    /// Seed for random number generation.
    #[serde(default)]
    pub seed: u64,
}

impl Default for BoosterConfig {
    fn default() -> Self {
        BoosterConfig {
            objective: Objective::SquaredLoss,
            learning_rate: default_learning_rate(),
            n_estimators: default_n_estimators(),
            max_depth: default_max_depth(),
            max_leaves: None,
            grow_policy: GrowPolicy::DepthWise,
            lambda: default_lambda(),
            gamma: 0.0,
            min_child_weight: default_min_child_weight(),
            subsample: default_subsample(),
            max_bin: default_max_bin(),
            num_threads: None,
            log_iterations: 0,
            seed: 0,
        }
    }
}

impl BoosterConfig {
    pub fn validate(&self) -> Result<(), PlannerError> {
        validate_float_parameter(self.learning_rate, f64::MIN_POSITIVE, 1.0, "learning_rate")?;
        validate_float_parameter(self.subsample, f64::MIN_POSITIVE, 1.0, "subsample")?;
        validate_positive_float_parameter(self.lambda, "lambda")?;
        validate_positive_float_parameter(self.gamma, "gamma")?;
        validate_positive_float_parameter(self.min_child_weight, "min_child_weight")?;
        if let Objective::HuberLoss { delta: Some(delta) } = self.objective {
            validate_float_parameter(delta, f64::MIN_POSITIVE, f64::MAX, "delta")?;
        }
        if self.n_estimators == 0 || self.n_estimators > ITER_LIMIT {
            return Err(PlannerError::InvalidParameter(
                "n_estimators".to_string(),
                format!("a value between 1 and {}", ITER_LIMIT),
                self.n_estimators.to_string(),
            ));
        }
        if self.max_depth == 0 {
            return Err(PlannerError::InvalidParameter(
                "max_depth".to_string(),
                "a positive value".to_string(),
                self.max_depth.to_string(),
            ));
        }
        if self.max_leaves.is_some_and(|m| m < 2) {
            return Err(PlannerError::InvalidParameter(
                "max_leaves".to_string(),
                "at least 2".to_string(),
                format!("{:?}", self.max_leaves),
            ));
        }
        if !(2..=MAX_BIN_LIMIT).contains(&self.max_bin) {
            return Err(PlannerError::InvalidParameter(
                "max_bin".to_string(),
                format!("a value between 2 and {}", MAX_BIN_LIMIT),
                self.max_bin.to_string(),
            ));
        }
        Ok(())
    }
}

/// JSON IO for configuration and model types.
pub trait ConfigIO: Serialize + DeserializeOwned + Sized {
    /// Save as a json object to a file.
    ///
    /// * `path` - Path to save to.
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), PlannerError> {
        fs::write(path, self.json_dump()?).map_err(|e| PlannerError::UnableToWrite(e.to_string()))
    }

    /// Dump as a json object.
    fn json_dump(&self) -> Result<String, PlannerError> {
        serde_json::to_string_pretty(self).map_err(|e| PlannerError::UnableToWrite(e.to_string()))
    }

    /// Load from a json string.
    fn from_json(json_str: &str) -> Result<Self, PlannerError> {
        serde_json::from_str::<Self>(json_str).map_err(|e| PlannerError::UnableToRead(e.to_string()))
    }

    /// Load from a path to a json object.
    ///
    /// * `path` - Path to load from.
    fn load<P: AsRef<Path>>(path: P) -> Result<Self, PlannerError> {
        let json_str = fs::read_to_string(path).map_err(|e| PlannerError::UnableToRead(e.to_string()))?;
        Self::from_json(&json_str)
    }
}

impl ConfigIO for BoosterConfig {}
