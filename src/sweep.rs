//! Prediction Sweep
//!
//! Scores one hypothetical release in every calendar month and picks the
//! month with the highest predicted revenue.
use crate::constants::N_MONTHS;
use crate::errors::PlannerError;
use crate::features::{query_features, FeatureVector, GenreVocabulary};
use crate::trainer::TrainedModel;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

const MONTH_NAMES: [&str; N_MONTHS] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Predicted revenue for months 1 to 12.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueCurve {
    predictions: Vec<f64>,
    best_month: u8,
}

impl RevenueCurve {
    /// Build a curve from twelve predictions. The first maximum wins.
    pub fn new(predictions: Vec<f64>) -> Result<Self, PlannerError> {
        if predictions.len() != N_MONTHS {
            return Err(PlannerError::InvalidQuery(format!(
                "expected {} monthly predictions, got {}",
                N_MONTHS,
                predictions.len()
            )));
        }
        if let Some(p) = predictions.iter().find(|p| !p.is_finite()) {
            return Err(PlannerError::InvalidQuery(format!("non-finite prediction {}", p)));
        }
        let mut best = 0;
        for (i, p) in predictions.iter().enumerate() {
            if *p > predictions[best] {
                best = i;
            }
        }
        Ok(RevenueCurve {
            predictions,
            best_month: best as u8 + 1,
        })
    }

    pub fn predictions(&self) -> &[f64] {
        &self.predictions
    }

    /// 1-indexed month with the highest prediction.
    pub fn best_month(&self) -> u8 {
        self.best_month
    }

    pub fn best_revenue(&self) -> f64 {
        self.predictions[self.best_month as usize - 1]
    }

    pub fn revenue(&self, month: u8) -> Option<f64> {
        (month as usize).checked_sub(1).and_then(|i| self.predictions.get(i)).copied()
    }

    pub fn month_name(month: u8) -> Option<&'static str> {
        (month as usize).checked_sub(1).and_then(|i| MONTH_NAMES.get(i)).copied()
    }

    /// `(month name, revenue)` pairs in calendar order.
    pub fn points(&self) -> Vec<(&'static str, f64)> {
        MONTH_NAMES.iter().copied().zip(self.predictions.iter().copied()).collect()
    }
}

/// Predict the revenue of a release with `genres` and `budget` in every month.
///
/// * `model` - Trained model, only read.
/// * `vocabulary` - Must be the vocabulary the model was trained with.
/// * `genres` - Requested genres. Names outside the vocabulary are ignored.
/// * `budget` - Production budget, finite and non-negative.
pub fn predict_months<S: AsRef<str>>(
    model: &TrainedModel,
    vocabulary: &GenreVocabulary,
    genres: &[S],
    budget: f64,
) -> Result<RevenueCurve, PlannerError> {
    if !budget.is_finite() || budget < 0.0 {
        return Err(PlannerError::InvalidQuery(format!(
            "budget must be finite and non-negative, got {}",
            budget
        )));
    }
    if vocabulary != model.vocabulary() {
        return Err(PlannerError::InvalidQuery(
            "genre vocabulary differs from the one the model was trained with".to_string(),
        ));
    }
    let vectors: Vec<FeatureVector> = (1..=N_MONTHS as u8)
        .map(|month| query_features(vocabulary, genres, budget, month))
        .collect();
    RevenueCurve::new(model.predict_features(&vectors)?)
}

/// One cell of a genre by budget sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    pub genre: String,
    pub budget: f64,
    pub curve: RevenueCurve,
}

/// Sweep every single genre at every budget, in parallel. Results are ordered
/// by genre, then budget, as given.
pub fn predict_grid<S: AsRef<str> + Sync>(
    model: &TrainedModel,
    vocabulary: &GenreVocabulary,
    genre_options: &[S],
    budget_options: &[f64],
) -> Result<Vec<GridPoint>, PlannerError> {
    let cells: Vec<(&str, f64)> = genre_options
        .iter()
        .flat_map(|g| budget_options.iter().map(move |b| (g.as_ref(), *b)))
        .collect();
    cells
        .into_par_iter()
        .map(|(genre, budget)| {
            predict_months(model, vocabulary, &[genre], budget).map(|curve| GridPoint {
                genre: genre.to_string(),
                budget,
                curve,
            })
        })
        .collect()
}
