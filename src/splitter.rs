//! Splitter
//!
//! Exact split search over binned histograms with second order gain.
use crate::binning::BinnedData;
use crate::histogram::{Bin, FeatureHistogram, NodeHistogram};
use crate::utils::{gain, weight};

/// Gradient statistics of a node.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NodeInfo {
    pub grad: f64,
    pub hess: f64,
    pub counts: u32,
}

impl From<Bin> for NodeInfo {
    fn from(b: Bin) -> Self {
        NodeInfo {
            grad: b.gradient_sum,
            hess: b.hessian_sum,
            counts: b.counts,
        }
    }
}

/// The best split found for a node.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitInfo {
    pub split_gain: f64,
    pub split_feature: usize,
    /// Rows with a bin below this one go left.
    pub split_bin: u16,
    /// Raw threshold equivalent to `split_bin`.
    pub split_value: f64,
    pub missing_left: bool,
    pub left: NodeInfo,
    pub right: NodeInfo,
}

/// Trait for finding splits of a node.
pub trait Splitter {
    /// Learning rate applied to every leaf weight.
    fn get_eta(&self) -> f64;

    /// Leaf weight of a node before the learning rate is applied.
    fn node_weight(&self, info: &NodeInfo) -> f64;

    /// Search every feature for the split with the largest positive gain.
    fn best_split(&self, hist: &NodeHistogram, binned: &BinnedData, parent: &NodeInfo) -> Option<SplitInfo>;
}

/// Splitter using L2 regularized leaf weights, sending missing values to
/// the side with the larger gain.
#[derive(Debug, Clone)]
pub struct HistogramSplitter {
    pub eta: f64,
    pub lambda: f64,
    pub gamma: f64,
    pub min_child_weight: f64,
}

impl HistogramSplitter {
    pub fn new(eta: f64, lambda: f64, gamma: f64, min_child_weight: f64) -> Self {
        HistogramSplitter {
            eta,
            lambda,
            gamma,
            min_child_weight,
        }
    }

    fn split_gain(&self, left: &NodeInfo, right: &NodeInfo, parent_gain: f64) -> f64 {
        0.5 * (gain(left.grad, left.hess, self.lambda) + gain(right.grad, right.hess, self.lambda) - parent_gain)
            - self.gamma
    }

    fn is_valid_child(&self, info: &NodeInfo) -> bool {
        info.counts > 0 && info.hess >= self.min_child_weight
    }

    fn best_feature_split(
        &self,
        feature: usize,
        hist: &FeatureHistogram,
        binned: &BinnedData,
        parent: &NodeInfo,
    ) -> Option<SplitInfo> {
        let parent_gain = gain(parent.grad, parent.hess, self.lambda);
        let missing = hist.data[0];
        let total_present = hist.total() - missing;
        let missing_options: &[bool] = if missing.counts > 0 { &[false, true] } else { &[false] };

        let mut best: Option<SplitInfo> = None;
        let mut left_present = Bin::default();
        for split_bin in 2..hist.data.len() {
            left_present += hist.data[split_bin - 1];
            if left_present.counts == 0 {
                continue;
            }
            let right_present = total_present - left_present;
            if right_present.counts == 0 {
                break;
            }
            for missing_left in missing_options {
                let (mut left, mut right) = (left_present, right_present);
                if *missing_left {
                    left += missing;
                } else {
                    right += missing;
                }
                let (left, right) = (NodeInfo::from(left), NodeInfo::from(right));
                if !self.is_valid_child(&left) || !self.is_valid_child(&right) {
                    continue;
                }
                let split_gain = self.split_gain(&left, &right, parent_gain);
                if best.as_ref().map_or(true, |b| split_gain > b.split_gain) {
                    best = Some(SplitInfo {
                        split_gain,
                        split_feature: feature,
                        split_bin: split_bin as u16,
                        split_value: binned.split_value(feature, split_bin as u16),
                        missing_left: *missing_left,
                        left,
                        right,
                    });
                }
            }
        }
        best
    }
}

impl Splitter for HistogramSplitter {
    fn get_eta(&self) -> f64 {
        self.eta
    }

    fn node_weight(&self, info: &NodeInfo) -> f64 {
        weight(info.grad, info.hess, self.lambda)
    }

    fn best_split(&self, hist: &NodeHistogram, binned: &BinnedData, parent: &NodeInfo) -> Option<SplitInfo> {
        let mut best: Option<SplitInfo> = None;
        for (feature, feature_hist) in hist.features.iter().enumerate() {
            if let Some(s) = self.best_feature_split(feature, feature_hist, binned, parent) {
                if best.as_ref().map_or(true, |b| s.split_gain > b.split_gain) {
                    best = Some(s);
                }
            }
        }
        best.filter(|s| s.split_gain > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binning::bin_matrix;
    use crate::data::Matrix;

    #[test]
    fn test_best_split() {
        // Feature 0 is noise, feature 1 separates the gradients perfectly.
        let data_vec = vec![1., 2., 1., 2., 10., 10., 20., 20.];
        let data = Matrix::new(&data_vec, 4, 2);
        let b = bin_matrix(&data, None, 256).unwrap();
        let bdata = Matrix::new(&b.binned_data, 4, 2);
        let n_bins: Vec<usize> = (0..2).map(|c| b.n_bins(c)).collect();
        let grad = vec![-1.0, -1.0, 1.0, 1.0];
        let hess = vec![1.0; 4];
        let pool = rayon::ThreadPoolBuilder::new().num_threads(1).build().unwrap();
        let hist = NodeHistogram::from_rows(&bdata, &n_bins, &[0, 1, 2, 3], &grad, &hess, &pool);
        let parent = NodeInfo {
            grad: 0.0,
            hess: 4.0,
            counts: 4,
        };
        let splitter = HistogramSplitter::new(0.3, 0.0, 0.0, 1.0);
        let s = splitter.best_split(&hist, &b, &parent).unwrap();
        assert_eq!(s.split_feature, 1);
        assert_eq!(s.split_value, 20.0);
        assert_eq!(s.left.counts, 2);
        assert_eq!(s.right.counts, 2);
        // 0.5 * (4/2 + 4/2 - 0)
        assert!((s.split_gain - 2.0).abs() < 1e-12);
        assert_eq!(splitter.node_weight(&s.left), 1.0);
    }

    #[test]
    fn test_no_split_when_constant() {
        let data_vec = vec![5., 5., 5.];
        let data = Matrix::new(&data_vec, 3, 1);
        let b = bin_matrix(&data, None, 256).unwrap();
        let bdata = Matrix::new(&b.binned_data, 3, 1);
        let grad = vec![-1.0, 0.0, 1.0];
        let hess = vec![1.0; 3];
        let pool = rayon::ThreadPoolBuilder::new().num_threads(1).build().unwrap();
        let hist = NodeHistogram::from_rows(&bdata, &[b.n_bins(0)], &[0, 1, 2], &grad, &hess, &pool);
        let parent = NodeInfo {
            grad: 0.0,
            hess: 3.0,
            counts: 3,
        };
        let splitter = HistogramSplitter::new(0.3, 1.0, 0.0, 1.0);
        assert!(splitter.best_split(&hist, &b, &parent).is_none());
    }
}
