//! Configuration
//!
//! Serde configuration for the planner, loadable from JSON with field
//! defaults.
use crate::booster::config::BoosterConfig;
use crate::constants::{DEFAULT_BUDGET_OPTIONS, DEFAULT_SEED, MIN_TRAINING_ROWS, TEST_FRACTION};
use crate::errors::PlannerError;
use crate::genres::GenreSource;
use crate::utils::{validate_float_parameter, validate_positive_float_parameter};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use crate::booster::config::ConfigIO;

fn default_seed() -> u64 {
    DEFAULT_SEED
}
fn default_test_fraction() -> f64 {
    TEST_FRACTION
}
fn default_min_training_rows() -> usize {
    MIN_TRAINING_ROWS
}
fn default_movies_path() -> PathBuf {
    PathBuf::from("data/movies.csv")
}
fn default_links_path() -> PathBuf {
    PathBuf::from("data/links.csv")
}
fn default_metadata_path() -> PathBuf {
    PathBuf::from("data/movies_metadata.csv")
}
fn default_budget_options() -> Vec<f64> {
    DEFAULT_BUDGET_OPTIONS.to_vec()
}

/// Settings of a training run.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TrainerConfig {
    /// Seed of the holdout split and of row subsampling.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Share of rows held out for the report, in `[0, 1)`.
    #[serde(default = "default_test_fraction")]
    pub test_fraction: f64,
    /// Minimum number of distinct feature rows.
    #[serde(default = "default_min_training_rows")]
    pub min_training_rows: usize,
    #[serde(default)]
    pub booster: BoosterConfig,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            seed: default_seed(),
            test_fraction: default_test_fraction(),
            min_training_rows: default_min_training_rows(),
            booster: BoosterConfig::default(),
        }
    }
}

impl TrainerConfig {
    pub fn validate(&self) -> Result<(), PlannerError> {
        // Holding out every row leaves nothing to fit.
        validate_float_parameter(self.test_fraction, 0.0, 0.99, "test_fraction")?;
        if self.min_training_rows == 0 {
            return Err(PlannerError::InvalidParameter(
                "min_training_rows".to_string(),
                "a positive value".to_string(),
                self.min_training_rows.to_string(),
            ));
        }
        self.booster.validate()
    }
}

/// Everything needed to build a `RevenuePlanner`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlannerConfig {
    /// Movie table: `movieId,title,genres`.
    #[serde(default = "default_movies_path")]
    pub movies_path: PathBuf,
    /// Cross-reference table: `movieId,imdbId`.
    #[serde(default = "default_links_path")]
    pub links_path: PathBuf,
    /// Historical metadata: `imdb_id,budget,release_date,revenue,genres`.
    #[serde(default = "default_metadata_path")]
    pub metadata_path: PathBuf,
    #[serde(default)]
    pub trainer: TrainerConfig,
    #[serde(default)]
    pub genre_source: GenreSource,
    /// Budgets swept by `predict_grid`.
    #[serde(default = "default_budget_options")]
    pub budget_options: Vec<f64>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            movies_path: default_movies_path(),
            links_path: default_links_path(),
            metadata_path: default_metadata_path(),
            trainer: TrainerConfig::default(),
            genre_source: GenreSource::default(),
            budget_options: default_budget_options(),
        }
    }
}

impl PlannerConfig {
    pub fn validate(&self) -> Result<(), PlannerError> {
        if self.budget_options.is_empty() {
            return Err(PlannerError::InvalidParameter(
                "budget_options".to_string(),
                "at least one budget".to_string(),
                "none".to_string(),
            ));
        }
        for budget in &self.budget_options {
            validate_positive_float_parameter(*budget, "budget_options")?;
        }
        self.trainer.validate()
    }

    /// Same settings, reading the three sources from `dir`.
    pub fn with_data_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        let dir = dir.into();
        self.movies_path = dir.join("movies.csv");
        self.links_path = dir.join("links.csv");
        self.metadata_path = dir.join("movies_metadata.csv");
        self
    }
}

impl ConfigIO for TrainerConfig {}
impl ConfigIO for PlannerConfig {}
