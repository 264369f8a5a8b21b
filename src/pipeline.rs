//! Pipeline facade
//!
//! Load, join, build the vocabulary and train once. Queries then run against
//! the model held in a [`ModelSlot`].
use crate::config::PlannerConfig;
use crate::dataset::{load_metadata, load_movies, open_source};
use crate::errors::PlannerError;
use crate::features::{build_vocabulary, GenreVocabulary};
use crate::genres::GenreSource;
use crate::join::{join_and_clean, DropReport, JoinOutput, JoinedTrainingRow};
use crate::registry::ModelSlot;
use crate::sweep::{predict_grid, GridPoint, RevenueCurve};
use crate::trainer::{HoldoutReport, TrainedModel};
use log::{info, warn};
use std::path::Path;
use std::sync::Arc;

/// Read the three sources and join them.
///
/// * `movie_source` - Movie table.
/// * `metadata_source` - Historical metadata table.
/// * `id_join_source` - Cross-reference table between the two.
/// * `genre_source` - Which genre encoding wins when both are present.
pub fn load_and_join<P: AsRef<Path>>(
    movie_source: P,
    metadata_source: P,
    id_join_source: P,
    genre_source: GenreSource,
) -> Result<JoinOutput, PlannerError> {
    let movies = load_movies(open_source(movie_source)?, open_source(id_join_source)?)?;
    let metadata = load_metadata(open_source(metadata_source)?)?;
    let mut output = join_and_clean(&movies.records, &metadata.records, genre_source);
    output.report.malformed_source_rows = movies.malformed + metadata.malformed;
    output.report.invalid_movie_id = movies.invalid_id;
    info!("Join & clean: {}", output.report);
    Ok(output)
}

pub struct RevenuePlanner {
    config: PlannerConfig,
    report: DropReport,
    slot: ModelSlot,
}

impl RevenuePlanner {
    /// Build a planner from the sources named in `config` and train its model.
    pub fn from_config(config: &PlannerConfig) -> Result<Self, PlannerError> {
        config.validate()?;
        let output = load_and_join(
            &config.movies_path,
            &config.metadata_path,
            &config.links_path,
            config.genre_source,
        )?;
        RevenuePlanner::from_join(output, config.clone())
    }

    /// Build a planner from rows that are already joined.
    pub fn from_join(output: JoinOutput, config: PlannerConfig) -> Result<Self, PlannerError> {
        config.validate()?;
        let planner = RevenuePlanner {
            config,
            report: output.report,
            slot: ModelSlot::new(),
        };
        planner.retrain(&output.rows)?;
        Ok(planner)
    }

    /// Rebuild the vocabulary from `rows` and replace the current model.
    pub fn retrain(&self, rows: &[JoinedTrainingRow]) -> Result<Arc<TrainedModel>, PlannerError> {
        let vocabulary = build_vocabulary(rows);
        if vocabulary.is_empty() && !rows.is_empty() {
            warn!("No genre labels in {} training rows.", rows.len());
        }
        info!("Training on {} rows with {} genres.", rows.len(), vocabulary.len());
        self.slot.retrain(rows, &vocabulary, &self.config.trainer)
    }

    pub fn predict_months<S: AsRef<str>>(&self, genres: &[S], budget: f64) -> Result<RevenueCurve, PlannerError> {
        self.slot.predict_months(genres, budget)
    }

    /// Sweep every genre in `genre_options` at every configured budget.
    pub fn predict_grid<S: AsRef<str> + Sync>(&self, genre_options: &[S]) -> Result<Vec<GridPoint>, PlannerError> {
        let model = self.model()?;
        predict_grid(&model, model.vocabulary(), genre_options, &self.config.budget_options)
    }

    pub fn model(&self) -> Result<Arc<TrainedModel>, PlannerError> {
        self.slot
            .current()
            .ok_or_else(|| PlannerError::InvalidQuery("no model has been trained".to_string()))
    }

    pub fn vocabulary(&self) -> Option<GenreVocabulary> {
        self.slot.current().map(|m| m.vocabulary().clone())
    }

    pub fn holdout(&self) -> Option<HoldoutReport> {
        self.slot.current().and_then(|m| m.holdout().copied())
    }

    pub fn drop_report(&self) -> &DropReport {
        &self.report
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }
}
