//! Model slot
//!
//! Holds the one current model. Readers clone an `Arc` and never wait on a
//! retrain, which builds the replacement outside the lock and swaps it in.
use crate::config::TrainerConfig;
use crate::errors::PlannerError;
use crate::features::GenreVocabulary;
use crate::join::JoinedTrainingRow;
use crate::sweep::{predict_months, RevenueCurve};
use crate::trainer::{train_with_config, TrainedModel};
use log::info;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

#[derive(Debug, Default)]
pub struct ModelSlot {
    current: RwLock<Option<Arc<TrainedModel>>>,
    writer: Mutex<()>,
}

impl ModelSlot {
    pub fn new() -> Self {
        ModelSlot::default()
    }

    pub fn with_model(model: TrainedModel) -> Self {
        ModelSlot {
            current: RwLock::new(Some(Arc::new(model))),
            writer: Mutex::new(()),
        }
    }

    /// The current model, if one has been trained.
    pub fn current(&self) -> Option<Arc<TrainedModel>> {
        self.current.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn is_trained(&self) -> bool {
        self.current().is_some()
    }

    /// Swap in `model`, returning the previous one.
    pub fn replace(&self, model: TrainedModel) -> Option<Arc<TrainedModel>> {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        self.swap(Arc::new(model))
    }

    fn swap(&self, model: Arc<TrainedModel>) -> Option<Arc<TrainedModel>> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        current.replace(model)
    }

    /// Train a fresh model and make it current. Only one retrain runs at a
    /// time. On failure the previous model stays in place.
    pub fn retrain(
        &self,
        rows: &[JoinedTrainingRow],
        vocabulary: &GenreVocabulary,
        config: &TrainerConfig,
    ) -> Result<Arc<TrainedModel>, PlannerError> {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let model = Arc::new(train_with_config(rows, vocabulary, config)?);
        if self.swap(Arc::clone(&model)).is_some() {
            info!("Replaced the current revenue model.");
        }
        Ok(model)
    }

    /// Sweep the months with the current model and its own vocabulary.
    pub fn predict_months<S: AsRef<str>>(&self, genres: &[S], budget: f64) -> Result<RevenueCurve, PlannerError> {
        let model = self
            .current()
            .ok_or_else(|| PlannerError::InvalidQuery("no model has been trained".to_string()))?;
        predict_months(&model, model.vocabulary(), genres, budget)
    }
}
