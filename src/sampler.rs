//! Sampler
//!
//! Seeded row sampling: per tree subsampling for stochastic boosting, and the
//! train/holdout partition used for reporting.
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

// A sampler can be used to subset the data prior to fitting a new tree.
pub trait Sampler {
    /// Sample the data, returning a tuple, where the first item is the samples
    /// chosen for training, and the second are the samples excluded.
    fn sample(&mut self, rng: &mut StdRng, index: &[usize]) -> (Vec<usize>, Vec<usize>);
}

pub struct RandomSampler {
    subsample: f64,
}

impl RandomSampler {
    pub fn new(subsample: f64) -> Self {
        RandomSampler { subsample }
    }
}

impl Sampler for RandomSampler {
    fn sample(&mut self, rng: &mut StdRng, index: &[usize]) -> (Vec<usize>, Vec<usize>) {
        let subsample = self.subsample;
        let mut chosen = Vec::new();
        let mut excluded = Vec::new();
        for i in index {
            if rng.gen::<f64>() < subsample {
                chosen.push(*i);
            } else {
                excluded.push(*i)
            }
        }
        (chosen, excluded)
    }
}

/// Shuffle `0..n` with a seeded generator and split it into a training and a
/// holdout partition. The holdout receives `ceil(n * test_fraction)` rows,
/// but never all of them. Both partitions are returned in ascending order.
pub fn train_test_split(n: usize, test_fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut index: Vec<usize> = (0..n).collect();
    index.shuffle(&mut rng);
    let n_test = ((n as f64) * test_fraction).ceil() as usize;
    let n_test = n_test.min(n.saturating_sub(1));
    let mut test = index[..n_test].to_vec();
    let mut train = index[n_test..].to_vec();
    test.sort_unstable();
    train.sort_unstable();
    (train, test)
}
