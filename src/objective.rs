//! Objective functions minimized by the booster.
use crate::metric::Metric;
use serde::{Deserialize, Serialize};

/// Residual size, in revenue units, beyond which the Huber loss turns linear.
pub const DEFAULT_HUBER_DELTA: f64 = 1e7;

/// Trait defining an objective function.
///
/// Only [`loss`](ObjectiveFunction::loss) and [`gradient`](ObjectiveFunction::gradient)
/// are required.
pub trait ObjectiveFunction: Send + Sync {
    /// Per-sample loss.
    fn loss(&self, y: &[f64], yhat: &[f64]) -> Vec<f64>;

    /// Per-sample gradient and hessian.
    fn gradient(&self, y: &[f64], yhat: &[f64]) -> (Vec<f64>, Vec<f64>);

    /// Initial prediction (base score) before any trees are added.
    ///
    /// Default: mean of `y`.
    fn initial_value(&self, y: &[f64]) -> f64 {
        if y.is_empty() {
            0.0
        } else {
            y.iter().sum::<f64>() / y.len() as f64
        }
    }

    /// Default evaluation metric for this objective.
    fn default_metric(&self) -> Metric {
        Metric::RootMeanSquaredError
    }
}

/// Squared Error loss, minimizes `(y - yhat)^2`.
#[derive(Default, Debug, Deserialize, Serialize, Clone)]
pub struct SquaredLoss {}

impl ObjectiveFunction for SquaredLoss {
    fn loss(&self, y: &[f64], yhat: &[f64]) -> Vec<f64> {
        y.iter()
            .zip(yhat)
            .map(|(y_, yhat_)| {
                let s = y_ - yhat_;
                s * s
            })
            .collect()
    }

    fn gradient(&self, y: &[f64], yhat: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let g = y.iter().zip(yhat).map(|(y_, yhat_)| yhat_ - y_).collect();
        (g, vec![1.0; y.len()])
    }
}

/// Huber loss, quadratic near zero and linear beyond `delta`.
///
/// The gradient is clipped to `delta` while the hessian is kept at one, so a
/// few blockbuster releases cannot dominate a leaf.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HuberLoss {
    pub delta: f64,
}

impl Default for HuberLoss {
    fn default() -> Self {
        HuberLoss {
            delta: DEFAULT_HUBER_DELTA,
        }
    }
}

impl ObjectiveFunction for HuberLoss {
    fn loss(&self, y: &[f64], yhat: &[f64]) -> Vec<f64> {
        let delta = self.delta;
        y.iter()
            .zip(yhat)
            .map(|(y_, yhat_)| {
                let ar = (y_ - yhat_).abs();
                if ar <= delta {
                    0.5 * ar * ar
                } else {
                    delta * (ar - 0.5 * delta)
                }
            })
            .collect()
    }

    fn gradient(&self, y: &[f64], yhat: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let g = y
            .iter()
            .zip(yhat)
            .map(|(y_, yhat_)| (yhat_ - y_).clamp(-self.delta, self.delta))
            .collect();
        (g, vec![1.0; y.len()])
    }

    fn initial_value(&self, y: &[f64]) -> f64 {
        if y.is_empty() {
            return 0.0;
        }
        let mut v = y.to_vec();
        v.sort_unstable_by(|a, b| a.total_cmp(b));
        let mid = v.len() / 2;
        if v.len() % 2 == 0 {
            (v[mid - 1] + v[mid]) / 2.0
        } else {
            v[mid]
        }
    }

    fn default_metric(&self) -> Metric {
        Metric::MeanAbsoluteError
    }
}

/// The objective function to minimize during training.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub enum Objective {
    /// Squared Error Loss for regression.
    #[default]
    SquaredLoss,
    /// Huber Loss for robust regression.
    HuberLoss {
        /// The threshold where the loss function transitions from quadratic to linear.
        delta: Option<f64>,
    },
}

impl Objective {
    pub fn as_function(&self) -> Box<dyn ObjectiveFunction> {
        match self {
            Objective::SquaredLoss => Box::new(SquaredLoss::default()),
            Objective::HuberLoss { delta } => Box::new(HuberLoss {
                delta: delta.unwrap_or(DEFAULT_HUBER_DELTA),
            }),
        }
    }
}
