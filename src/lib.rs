mod constants;

// Modules
pub mod binning;
pub mod booster;
pub mod config;
pub mod data;
pub mod dataset;
pub mod errors;
pub mod features;
pub mod genres;
pub mod grower;
pub mod histogram;
pub mod identifier;
pub mod join;
pub mod metric;
pub mod node;
pub mod objective;
pub mod pipeline;
pub mod registry;
pub mod sampler;
pub mod splitter;
pub mod sweep;
pub mod trainer;
pub mod tree;
pub mod utils;

// Individual classes, and functions
pub use booster::{BoosterConfig, RevenueBooster};
pub use config::{ConfigIO, PlannerConfig, TrainerConfig};
pub use constants::DEFAULT_BUDGET_OPTIONS;
pub use data::Matrix;
pub use errors::PlannerError;
pub use features::{build_vocabulary, GenreVocabulary};
pub use genres::GenreSource;
pub use join::{join_and_clean, DropReport, JoinOutput, JoinedTrainingRow};
pub use pipeline::{load_and_join, RevenuePlanner};
pub use registry::ModelSlot;
pub use sweep::{predict_grid, predict_months, RevenueCurve};
pub use trainer::{train, train_with_config, HoldoutReport, TrainedModel};
