//! Model Trainer
//!
//! Fits one `RevenueBooster` on the joined rows and scores it on a seeded
//! holdout partition. The holdout is only reported, never needed to predict.
use crate::booster::RevenueBooster;
use crate::config::TrainerConfig;
use crate::data::Matrix;
use crate::errors::PlannerError;
use crate::features::{build_features, feature_matrix, FeatureVector, GenreVocabulary};
use crate::join::JoinedTrainingRow;
use crate::metric::{mean_absolute_error, r_squared, root_mean_squared_error};
use crate::sampler::train_test_split;
use hashbrown::HashSet;
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Error of the trained model on the held out rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoldoutReport {
    pub n_train: usize,
    pub n_holdout: usize,
    pub rmse: f64,
    pub mae: f64,
    /// NaN when the holdout revenue has no variance.
    pub r2: f64,
}

/// A fitted model together with the vocabulary its features were built with.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    booster: RevenueBooster,
    vocabulary: GenreVocabulary,
    seed: u64,
    holdout: Option<HoldoutReport>,
}

impl TrainedModel {
    pub fn booster(&self) -> &RevenueBooster {
        &self.booster
    }

    pub fn vocabulary(&self) -> &GenreVocabulary {
        &self.vocabulary
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn holdout(&self) -> Option<&HoldoutReport> {
        self.holdout.as_ref()
    }

    /// Predict revenue for feature vectors built with this model's vocabulary.
    pub fn predict_features(&self, vectors: &[FeatureVector]) -> Result<Vec<f64>, PlannerError> {
        let n_features = self.vocabulary.n_features();
        if let Some(v) = vectors.iter().find(|v| v.genre_flags.len() + 2 != n_features) {
            return Err(PlannerError::InvalidQuery(format!(
                "feature vector has {} genre flags, model expects {}",
                v.genre_flags.len(),
                self.vocabulary.len()
            )));
        }
        let data = feature_matrix(vectors);
        let matrix = Matrix::new(&data, vectors.len(), n_features);
        Ok(self.booster.predict(&matrix, false))
    }
}

/// Train with the default settings and the given seed.
pub fn train(rows: &[JoinedTrainingRow], vocabulary: &GenreVocabulary, seed: u64) -> Result<TrainedModel, PlannerError> {
    let config = TrainerConfig {
        seed,
        ..Default::default()
    };
    train_with_config(rows, vocabulary, &config)
}

fn distinct_rows(vectors: &[FeatureVector]) -> usize {
    vectors
        .iter()
        .map(|v| (v.genre_flags.clone(), v.budget.to_bits(), v.release_month))
        .collect::<HashSet<_>>()
        .len()
}

fn subset(vectors: &[FeatureVector], y: &[f64], index: &[usize]) -> (Vec<FeatureVector>, Vec<f64>) {
    let x = index.iter().map(|i| vectors[*i].clone()).collect();
    let y = index.iter().map(|i| y[*i]).collect();
    (x, y)
}

pub fn train_with_config(
    rows: &[JoinedTrainingRow],
    vocabulary: &GenreVocabulary,
    config: &TrainerConfig,
) -> Result<TrainedModel, PlannerError> {
    config.validate()?;
    if rows.is_empty() {
        return Err(PlannerError::Training("training set is empty".to_string()));
    }
    let vectors: Vec<FeatureVector> = rows.iter().map(|r| build_features(vocabulary, r)).collect();
    let distinct = distinct_rows(&vectors);
    if distinct < config.min_training_rows {
        return Err(PlannerError::Training(format!(
            "{} distinct feature rows, at least {} required",
            distinct, config.min_training_rows
        )));
    }
    if vocabulary.is_empty() {
        warn!("Genre vocabulary is empty, the model only sees budget and month.");
    }
    let revenue: Vec<f64> = rows.iter().map(|r| r.revenue).collect();

    let (train_idx, holdout_idx) = train_test_split(rows.len(), config.test_fraction, config.seed);
    let (x_train, y_train) = subset(&vectors, &revenue, &train_idx);
    let data = feature_matrix(&x_train);
    let matrix = Matrix::new(&data, x_train.len(), vocabulary.n_features());

    let mut booster = RevenueBooster::new(config.booster.clone()).set_seed(config.seed);
    booster.fit(&matrix, &y_train)?;

    let mut model = TrainedModel {
        booster,
        vocabulary: vocabulary.clone(),
        seed: config.seed,
        holdout: None,
    };

    if holdout_idx.is_empty() {
        warn!("Holdout partition is empty, no holdout report.");
    } else {
        let (x_holdout, y_holdout) = subset(&vectors, &revenue, &holdout_idx);
        let preds = model.predict_features(&x_holdout)?;
        let weights = vec![1.0; y_holdout.len()];
        let report = HoldoutReport {
            n_train: train_idx.len(),
            n_holdout: holdout_idx.len(),
            rmse: root_mean_squared_error(&y_holdout, &preds, &weights),
            mae: mean_absolute_error(&y_holdout, &preds, &weights),
            r2: r_squared(&y_holdout, &preds, &weights),
        };
        if report.n_holdout < 2 {
            warn!("Holdout partition has a single row, r2 is undefined.");
        }
        model.holdout = Some(report);
    }

    info!(
        "Trained revenue model on {} rows ({} genres, {} trees).",
        train_idx.len(),
        vocabulary.len(),
        model.booster.trees.len()
    );
    if let Some(h) = &model.holdout {
        info!(
            "Holdout of {} rows: rmse={:.0}, mae={:.0}, r2={:.3}.",
            h.n_holdout, h.rmse, h.mae, h.r2
        );
    }
    Ok(model)
}
