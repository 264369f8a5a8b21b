use crate::binning::BinnedData;
use crate::data::Matrix;
use crate::grower::GrowPolicy;
use crate::histogram::NodeHistogram;
use crate::node::{Node, SplittableNode};
use crate::splitter::{NodeInfo, Splitter};
use crate::utils::pivot_on_split;
use rayon::prelude::*;
use rayon::ThreadPool;
use serde::{Deserialize, Serialize};
use std::cmp::max;
use std::fmt::{self, Display};

/// Limits on the shape of a single tree.
#[derive(Debug, Clone, Copy)]
pub struct TreeLimits {
    pub max_depth: usize,
    pub max_leaves: Option<usize>,
    pub grow_policy: GrowPolicy,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct Tree {
    pub nodes: Vec<Node>,
    pub depth: usize,
    pub n_leaves: usize,
}

impl Tree {
    pub fn new() -> Self {
        Tree::default()
    }

    /// Grow the tree on the binned rows in `index`.
    ///
    /// * `data` - Binned feature matrix.
    /// * `binned` - Cut points matching `data`.
    /// * `index` - Rows used to fit this tree.
    /// * `grad` - Gradient of every row of the data.
    /// * `hess` - Hessian of every row of the data.
    /// * `splitter` - Split search strategy.
    /// * `pool` - Thread pool used to build histograms.
    /// * `limits` - Depth, leaf, and growth policy limits.
    #[allow(clippy::too_many_arguments)]
    pub fn fit<T: Splitter>(
        &mut self,
        data: &Matrix<u16>,
        binned: &BinnedData,
        mut index: Vec<usize>,
        grad: &[f64],
        hess: &[f64],
        splitter: &T,
        pool: &ThreadPool,
        limits: &TreeLimits,
    ) {
        let eta = splitter.get_eta();
        let n_bins: Vec<usize> = (0..data.cols).map(|c| binned.n_bins(c)).collect();

        let mut root_info = NodeInfo::default();
        for i in &index {
            root_info.grad += grad[*i];
            root_info.hess += hess[*i];
            root_info.counts += 1;
        }
        let mut root = SplittableNode::new(0, 0, root_info, splitter.node_weight(&root_info), 0, index.len());
        self.nodes = vec![root.as_node(eta)];
        self.depth = 0;
        self.n_leaves = 1;

        let evaluate = |node: &mut SplittableNode, index: &[usize]| {
            if node.depth >= limits.max_depth || node.info.counts < 2 {
                return;
            }
            let hist = NodeHistogram::from_rows(data, &n_bins, &index[node.start_idx..node.stop_idx], grad, hess, pool);
            node.split = splitter.best_split(&hist, binned, &node.info);
        };

        let mut growable = limits.grow_policy.grower();
        evaluate(&mut root, &index);
        if root.split.is_some() {
            growable.add_node(root);
        }

        while let Some(node) = growable.get_next_node() {
            if limits.max_leaves.is_some_and(|m| self.n_leaves >= m) {
                break;
            }
            let split = match node.split {
                Some(ref s) => s.clone(),
                None => continue,
            };

            let n_left = pivot_on_split(
                &mut index[node.start_idx..node.stop_idx],
                data.get_col(split.split_feature),
                split.split_bin,
                split.missing_left,
            );
            debug_assert_eq!(n_left, split.left.counts as usize);
            let mid = node.start_idx + n_left;

            let left_num = self.nodes.len();
            let right_num = left_num + 1;
            let mut left = SplittableNode::new(
                left_num,
                node.depth + 1,
                split.left,
                splitter.node_weight(&split.left),
                node.start_idx,
                mid,
            );
            let mut right = SplittableNode::new(
                right_num,
                node.depth + 1,
                split.right,
                splitter.node_weight(&split.right),
                mid,
                node.stop_idx,
            );

            self.nodes[node.num].make_parent_node(&split, left_num, right_num);
            self.nodes.push(left.as_node(eta));
            self.nodes.push(right.as_node(eta));
            self.n_leaves += 1;
            self.depth = max(self.depth, node.depth + 1);

            for child in [&mut left, &mut right] {
                evaluate(child, &index);
            }
            for child in [left, right] {
                if child.split.is_some() {
                    growable.add_node(child);
                }
            }
        }
    }

    /// Predict a single row, given as an accessor from column index to value.
    #[inline]
    fn predict_with<F: Fn(usize) -> f64>(&self, value: F) -> f64 {
        let mut node = &self.nodes[0];
        while !node.is_leaf {
            node = &self.nodes[node.get_child_idx(value(node.split_feature))];
        }
        node.weight_value
    }

    pub fn predict_row(&self, row: &[f64]) -> f64 {
        self.predict_with(|f| row[f])
    }

    pub fn predict(&self, data: &Matrix<f64>, parallel: bool) -> Vec<f64> {
        if parallel {
            data.index
                .par_iter()
                .map(|i| self.predict_with(|f| *data.get(*i, f)))
                .collect()
        } else {
            data.index
                .iter()
                .map(|i| self.predict_with(|f| *data.get(*i, f)))
                .collect()
        }
    }
}

impl Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut print_buffer: Vec<usize> = vec![0];
        let mut r = String::new();
        while let Some(idx) = print_buffer.pop() {
            let node = &self.nodes[idx];
            r += format!("{}{}\n", "      ".repeat(node.depth).as_str(), node).as_str();
            if !node.is_leaf {
                print_buffer.push(node.right_child);
                print_buffer.push(node.left_child);
            }
        }
        write!(f, "{}", r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binning::bin_matrix;
    use crate::splitter::HistogramSplitter;

    fn step_data() -> (Vec<f64>, Vec<f64>) {
        // y jumps when the single feature crosses 5.
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| if *v < 5.0 { 1.0 } else { 3.0 }).collect();
        (x, y)
    }

    #[test]
    fn test_tree_fit() {
        let (x, y) = step_data();
        let data = Matrix::new(&x, 10, 1);
        let b = bin_matrix(&data, None, 256).unwrap();
        let bdata = Matrix::new(&b.binned_data, 10, 1);
        // Squared loss gradients around a prediction of 2.
        let grad: Vec<f64> = y.iter().map(|y_| 2.0 - y_).collect();
        let hess = vec![1.0; 10];
        let pool = rayon::ThreadPoolBuilder::new().num_threads(2).build().unwrap();
        let splitter = HistogramSplitter::new(1.0, 0.0, 0.0, 1.0);
        let limits = TreeLimits {
            max_depth: 3,
            max_leaves: None,
            grow_policy: GrowPolicy::DepthWise,
        };

        let mut tree = Tree::new();
        tree.fit(&bdata, &b, data.index.to_owned(), &grad, &hess, &splitter, &pool, &limits);
        println!("{}", tree);

        assert_eq!(tree.nodes[0].split_value, 5.0);
        assert_eq!(tree.n_leaves, 2);
        assert_eq!(tree.nodes.len(), 3);
        let preds = tree.predict(&data, true);
        for (p, y_) in preds.iter().zip(&y) {
            assert!((2.0 + p - y_).abs() < 1e-12);
        }
        assert_eq!(preds, tree.predict(&data, false));
        assert_eq!(tree.predict_row(&[7.0]), 1.0);
    }

    #[test]
    fn test_tree_limits() {
        let x: Vec<f64> = (0..32).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| v * v).collect();
        let data = Matrix::new(&x, 32, 1);
        let b = bin_matrix(&data, None, 256).unwrap();
        let bdata = Matrix::new(&b.binned_data, 32, 1);
        let grad: Vec<f64> = y.iter().map(|y_| -y_).collect();
        let hess = vec![1.0; 32];
        let pool = rayon::ThreadPoolBuilder::new().num_threads(2).build().unwrap();
        let splitter = HistogramSplitter::new(0.3, 1.0, 0.0, 1.0);

        let limits = TreeLimits {
            max_depth: 2,
            max_leaves: None,
            grow_policy: GrowPolicy::DepthWise,
        };
        let mut tree = Tree::new();
        tree.fit(&bdata, &b, data.index.to_owned(), &grad, &hess, &splitter, &pool, &limits);
        assert!(tree.depth <= 2);
        assert_eq!(tree.n_leaves, 4);

        let limits = TreeLimits {
            max_depth: 10,
            max_leaves: Some(3),
            grow_policy: GrowPolicy::LossGuide,
        };
        let mut tree = Tree::new();
        tree.fit(&bdata, &b, data.index.to_owned(), &grad, &hess, &splitter, &pool, &limits);
        assert_eq!(tree.n_leaves, 3);
        assert_eq!(tree.nodes.iter().filter(|n| n.is_leaf).count(), 3);
    }
}
