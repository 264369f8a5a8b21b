use crate::splitter::{NodeInfo, SplitInfo};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A node that is still part of the growing frontier of a tree.
#[derive(Debug, Clone)]
pub struct SplittableNode {
    pub num: usize,
    pub depth: usize,
    pub info: NodeInfo,
    pub weight_value: f64,
    pub start_idx: usize,
    pub stop_idx: usize,
    /// Best split found for the rows of this node, if any.
    pub split: Option<SplitInfo>,
}

/// A finished node of a fitted tree.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Node {
    pub num: usize,
    pub weight_value: f64,
    pub hessian_sum: f64,
    pub counts: u32,
    pub depth: usize,
    /// Zero on leaves, which are never routed through.
    pub split_value: f64,
    pub split_feature: usize,
    pub split_gain: f64,
    pub missing_left: bool,
    pub left_child: usize,
    pub right_child: usize,
    pub is_leaf: bool,
}

impl SplittableNode {
    pub fn new(num: usize, depth: usize, info: NodeInfo, weight_value: f64, start_idx: usize, stop_idx: usize) -> Self {
        SplittableNode {
            num,
            depth,
            info,
            weight_value,
            start_idx,
            stop_idx,
            split: None,
        }
    }

    pub fn split_gain(&self) -> f64 {
        self.split.as_ref().map_or(f64::NEG_INFINITY, |s| s.split_gain)
    }

    /// Freeze the node, scaling its weight by the learning rate.
    pub fn as_node(&self, eta: f64) -> Node {
        Node {
            num: self.num,
            weight_value: self.weight_value * eta,
            hessian_sum: self.info.hess,
            counts: self.info.counts,
            depth: self.depth,
            split_value: 0.0,
            split_feature: 0,
            split_gain: 0.0,
            missing_left: false,
            left_child: 0,
            right_child: 0,
            is_leaf: true,
        }
    }
}

// Higher split gain is popped first, earlier nodes win ties.
impl Ord for SplittableNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.split_gain()
            .total_cmp(&other.split_gain())
            .then_with(|| other.num.cmp(&self.num))
    }
}

impl PartialOrd for SplittableNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SplittableNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SplittableNode {}

impl Node {
    /// Update all the info that is needed if this node is a
    /// parent node.
    pub fn make_parent_node(&mut self, split: &SplitInfo, left_child: usize, right_child: usize) {
        self.is_leaf = false;
        self.split_feature = split.split_feature;
        self.split_value = split.split_value;
        self.split_gain = split.split_gain;
        self.missing_left = split.missing_left;
        self.left_child = left_child;
        self.right_child = right_child;
    }

    /// Get the path that should be traveled down, given a value.
    #[inline]
    pub fn get_child_idx(&self, v: f64) -> usize {
        if v.is_nan() {
            if self.missing_left {
                self.left_child
            } else {
                self.right_child
            }
        } else if v < self.split_value {
            self.left_child
        } else {
            self.right_child
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_leaf {
            write!(f, "{}:leaf={},cover={}", self.num, self.weight_value, self.hessian_sum)
        } else {
            write!(
                f,
                "{}:[{} < {}] yes={},no={},missing={},gain={},cover={}",
                self.num,
                self.split_feature,
                self.split_value,
                self.left_child,
                self.right_child,
                if self.missing_left { self.left_child } else { self.right_child },
                self.split_gain,
                self.hessian_sum
            )
        }
    }
}
