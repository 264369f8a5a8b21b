//! Histogram
//!
//! Gradient and hessian statistics aggregated per bin, used to search splits
//! without revisiting raw feature values.
use crate::data::Matrix;
use rayon::{prelude::*, ThreadPool};
use serde::{Deserialize, Serialize};
use std::ops::{AddAssign, Sub};

/// Statistics of the rows falling into one bin.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq)]
pub struct Bin {
    /// Sum of the gradients.
    pub gradient_sum: f64,
    /// Sum of the hessians.
    pub hessian_sum: f64,
    /// Number of rows.
    pub counts: u32,
}

impl AddAssign for Bin {
    fn add_assign(&mut self, other: Bin) {
        self.gradient_sum += other.gradient_sum;
        self.hessian_sum += other.hessian_sum;
        self.counts += other.counts;
    }
}

impl Sub for Bin {
    type Output = Bin;
    fn sub(self, other: Bin) -> Bin {
        Bin {
            gradient_sum: self.gradient_sum - other.gradient_sum,
            hessian_sum: self.hessian_sum - other.hessian_sum,
            counts: self.counts.saturating_sub(other.counts),
        }
    }
}

/// Histogram of a single feature, `data[0]` is the missing bin.
#[derive(Debug, Clone)]
pub struct FeatureHistogram {
    pub data: Vec<Bin>,
}

impl FeatureHistogram {
    /// Build the histogram of one binned column over the given rows.
    pub fn from_rows(col: &[u16], n_bins: usize, index: &[usize], grad: &[f64], hess: &[f64]) -> Self {
        let mut data = vec![Bin::default(); n_bins];
        for i in index {
            let b = &mut data[col[*i] as usize];
            b.gradient_sum += grad[*i];
            b.hessian_sum += hess[*i];
            b.counts += 1;
        }
        FeatureHistogram { data }
    }

    /// Statistics over every bin of the feature.
    pub fn total(&self) -> Bin {
        let mut t = Bin::default();
        self.data.iter().for_each(|b| t += *b);
        t
    }
}

/// Histograms of every feature for one tree node.
#[derive(Debug, Clone)]
pub struct NodeHistogram {
    pub features: Vec<FeatureHistogram>,
}

impl NodeHistogram {
    /// Build the node histogram, one feature per rayon task.
    ///
    /// * `data` - Binned feature matrix.
    /// * `n_bins` - Number of bins of each column, including the missing bin.
    /// * `index` - Rows belonging to the node.
    /// * `grad` - Gradient of every row of the data.
    /// * `hess` - Hessian of every row of the data.
    /// * `pool` - Thread pool the columns are spread over.
    pub fn from_rows(
        data: &Matrix<u16>,
        n_bins: &[usize],
        index: &[usize],
        grad: &[f64],
        hess: &[f64],
        pool: &ThreadPool,
    ) -> Self {
        let features = pool.install(|| {
            (0..data.cols)
                .into_par_iter()
                .map(|col| FeatureHistogram::from_rows(data.get_col(col), n_bins[col], index, grad, hess))
                .collect()
        });
        NodeHistogram { features }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bin_arithmetic() {
        let mut a = Bin {
            gradient_sum: 1.0,
            hessian_sum: 2.0,
            counts: 2,
        };
        let b = Bin {
            gradient_sum: 0.5,
            hessian_sum: 1.0,
            counts: 1,
        };
        a += b;
        assert_eq!(a.counts, 3);
        let c = a - b;
        assert_eq!(c.gradient_sum, 1.0);
        assert_eq!(c.hessian_sum, 2.0);
        assert_eq!(c.counts, 2);
    }

    #[test]
    fn test_node_histogram() {
        let binned = vec![1u16, 2, 2, 0, 1, 1, 3, 3];
        let data = Matrix::new(&binned, 4, 2);
        let grad = vec![1.0, -2.0, 3.0, 4.0];
        let hess = vec![1.0; 4];
        let pool = rayon::ThreadPoolBuilder::new().num_threads(2).build().unwrap();
        let index = vec![0, 1, 2, 3];
        let h = NodeHistogram::from_rows(&data, &[3, 4], &index, &grad, &hess, &pool);

        assert_eq!(h.features.len(), 2);
        assert_eq!(h.features[0].data[0].gradient_sum, 4.0);
        assert_eq!(h.features[0].data[1].gradient_sum, 1.0);
        assert_eq!(h.features[0].data[2].gradient_sum, 1.0);
        assert_eq!(h.features[0].data[2].counts, 2);
        assert_eq!(h.features[1].data[3].counts, 2);

        // Both features see the same rows.
        let t0 = h.features[0].total();
        let t1 = h.features[1].total();
        assert_eq!(t0, t1);
        assert_eq!(t0.gradient_sum, 6.0);
        assert_eq!(t0.counts, 4);

        let sub = NodeHistogram::from_rows(&data, &[3, 4], &index[..2], &grad, &hess, &pool);
        assert_eq!(sub.features[0].total().counts, 2);
    }
}
