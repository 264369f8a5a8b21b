use serde::{Deserialize, Serialize};

pub type MetricFn = fn(&[f64], &[f64], &[f64]) -> f64;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub enum Metric {
    RootMeanSquaredError,
    MeanAbsoluteError,
    RSquared,
}

pub fn metric_callables(metric_type: &Metric) -> MetricFn {
    match metric_type {
        Metric::RootMeanSquaredError => RootMeanSquaredErrorMetric::calculate_metric,
        Metric::MeanAbsoluteError => MeanAbsoluteErrorMetric::calculate_metric,
        Metric::RSquared => RSquaredMetric::calculate_metric,
    }
}

pub trait EvaluationMetric {
    fn calculate_metric(y: &[f64], yhat: &[f64], sample_weight: &[f64]) -> f64;
}

pub struct RootMeanSquaredErrorMetric {}
impl EvaluationMetric for RootMeanSquaredErrorMetric {
    fn calculate_metric(y: &[f64], yhat: &[f64], sample_weight: &[f64]) -> f64 {
        root_mean_squared_error(y, yhat, sample_weight)
    }
}

pub struct MeanAbsoluteErrorMetric {}
impl EvaluationMetric for MeanAbsoluteErrorMetric {
    fn calculate_metric(y: &[f64], yhat: &[f64], sample_weight: &[f64]) -> f64 {
        mean_absolute_error(y, yhat, sample_weight)
    }
}

pub struct RSquaredMetric {}
impl EvaluationMetric for RSquaredMetric {
    fn calculate_metric(y: &[f64], yhat: &[f64], sample_weight: &[f64]) -> f64 {
        r_squared(y, yhat, sample_weight)
    }
}

pub fn root_mean_squared_error(y: &[f64], yhat: &[f64], sample_weight: &[f64]) -> f64 {
    let mut w_sum = 0.;
    let res = y
        .iter()
        .zip(yhat)
        .zip(sample_weight)
        .map(|((y_, yhat_), w_)| {
            w_sum += *w_;
            (y_ - yhat_).powi(2) * *w_
        })
        .sum::<f64>();
    (res / w_sum).sqrt()
}

pub fn mean_absolute_error(y: &[f64], yhat: &[f64], sample_weight: &[f64]) -> f64 {
    let mut w_sum = 0.;
    let res = y
        .iter()
        .zip(yhat)
        .zip(sample_weight)
        .map(|((y_, yhat_), w_)| {
            w_sum += *w_;
            (y_ - yhat_).abs() * *w_
        })
        .sum::<f64>();
    res / w_sum
}

/// Weighted coefficient of determination. NaN when `y` has no variance.
pub fn r_squared(y: &[f64], yhat: &[f64], sample_weight: &[f64]) -> f64 {
    let w_sum: f64 = sample_weight.iter().sum();
    let y_mean = y.iter().zip(sample_weight).map(|(y_, w_)| y_ * w_).sum::<f64>() / w_sum;
    let ss_res: f64 = y
        .iter()
        .zip(yhat)
        .zip(sample_weight)
        .map(|((y_, yhat_), w_)| (y_ - yhat_).powi(2) * w_)
        .sum();
    let ss_tot: f64 = y.iter().zip(sample_weight).map(|(y_, w_)| (y_ - y_mean).powi(2) * w_).sum();
    if ss_tot == 0.0 {
        f64::NAN
    } else {
        1.0 - ss_res / ss_tot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_mean_squared_error() {
        let y = vec![1., 3., 4., 5., 2., 4., 6.];
        let yhat = vec![3., 2., 3., 4., 4., 4., 4.];
        let sample_weight = vec![1., 1., 1., 1., 1., 2., 2.];
        let res = root_mean_squared_error(&y, &yhat, &sample_weight);
        assert!((res - 1.452966).abs() < 1e-6);
    }

    #[test]
    fn test_mean_absolute_error_and_r2() {
        let y = vec![1., 2., 3., 4.];
        let yhat = vec![1., 2., 3., 6.];
        let w = vec![1.; 4];
        assert_eq!(mean_absolute_error(&y, &yhat, &w), 0.5);
        // ss_res = 4, ss_tot = 5
        assert!((r_squared(&y, &yhat, &w) - 0.2).abs() < 1e-12);
        assert!(r_squared(&[2., 2.], &[1., 3.], &[1., 1.]).is_nan());
    }

    #[test]
    fn test_metric_callables() {
        let f = metric_callables(&Metric::MeanAbsoluteError);
        assert_eq!(f(&[1.0], &[2.0], &[1.0]), 1.0);
        let f = metric_callables(&Metric::RootMeanSquaredError);
        assert_eq!(f(&[0.0, 0.0], &[3.0, 3.0], &[1.0, 1.0]), 3.0);
    }
}
