use crate::data::FloatData;
use crate::errors::PlannerError;
use std::collections::VecDeque;

/// Create a string of all available items.
pub fn items_to_strings(items: Vec<&str>) -> String {
    items.join(", ")
}

// Validation
pub fn validate_float_parameter<T: FloatData<T>>(
    value: T,
    min: T,
    max: T,
    parameter: &str,
) -> Result<(), PlannerError> {
    if value.is_nan() || value < min || max < value {
        Err(PlannerError::InvalidParameter(
            parameter.to_string(),
            format!("real value within range {} and {}", min, max),
            value.to_string(),
        ))
    } else {
        Ok(())
    }
}

pub fn validate_positive_float_parameter<T: FloatData<T>>(value: T, parameter: &str) -> Result<(), PlannerError> {
    validate_float_parameter(value, T::ZERO, T::MAX, parameter)
}

/// Calculate the weight of a given node, given the sum
/// of the gradients, and the hessians in a node.
#[inline]
pub fn weight(gradient_sum: f64, hessian_sum: f64, lambda: f64) -> f64 {
    -(gradient_sum / (hessian_sum + lambda))
}

/// Calculate the gain given the gradient and hessian of the node.
#[inline]
pub fn gain(gradient_sum: f64, hessian_sum: f64, lambda: f64) -> f64 {
    (gradient_sum * gradient_sum) / (hessian_sum + lambda)
}

/// Naive weighted percentiles calculation.
///
/// * `v` - A Vector of which to find percentiles for.
/// * `sample_weight` - Sample weights for the instances of the vector.
/// * `percentiles` - Percentiles to look for in the data. This should be
///   values from 0 to 1, and in sorted order.
pub fn percentiles<T>(v: &[T], sample_weight: &[T], percentiles: &[T]) -> Vec<T>
where
    T: FloatData<T>,
{
    let mut idx: Vec<usize> = (0..v.len()).collect();
    idx.sort_unstable_by(|a, b| v[*a].partial_cmp(&v[*b]).unwrap_or(std::cmp::Ordering::Equal));

    let mut pcts = VecDeque::from_iter(percentiles.iter());
    let mut current_pct = match pcts.pop_front() {
        Some(p) => *p,
        None => return Vec::new(),
    };

    let mut p = Vec::new();
    let mut cuml_pct = T::ZERO;
    let total_values: T = sample_weight.iter().copied().sum();

    for i in idx.iter() {
        cuml_pct += sample_weight[*i] / total_values;
        // The same number might satisfy several percentiles.
        while (current_pct == T::ZERO) || (cuml_pct >= current_pct) {
            p.push(v[*i]);
            match pcts.pop_front() {
                Some(p_) => current_pct = *p_,
                None => return p,
            }
        }
    }
    // Accumulated weights can fall just short of one, the remaining
    // percentiles all map to the largest value.
    if let Some(last) = idx.last() {
        p.push(v[*last]);
        p.extend(pcts.iter().map(|_| v[*last]));
    }
    p
}

/// Return the bin a value falls into, given the sorted cut points of its column.
/// Bin zero is reserved for missing values, a value lands in bin `k + 1`
/// when exactly `k` cut points are less than or equal to it.
///
/// * `cuts` - The sorted cut values.
/// * `v` - The value to bin.
#[inline]
pub fn map_bin(cuts: &[f64], v: f64) -> u16 {
    if v.is_nan() {
        return 0;
    }
    let pos = cuts.partition_point(|c| *c <= v);
    // Cuts end with f64::MAX, so pos < cuts.len() for every finite value.
    (pos.min(cuts.len().saturating_sub(1)) + 1) as u16
}

/// Provided a list of index values, pivot those values
/// around a split bin so all of the rows going to the left
/// child come first. Returns the number of rows sent left.
///
/// * `index` - The row indices of the node, reordered in place.
/// * `feature` - The binned column used for the split.
/// * `split_bin` - Rows with a bin strictly below this go left.
/// * `missing_left` - Should missing values (bin zero) go left.
pub fn pivot_on_split(index: &mut [usize], feature: &[u16], split_bin: u16, missing_left: bool) -> usize {
    let goes_left = |i: usize| {
        let b = feature[i];
        if b == 0 {
            missing_left
        } else {
            b < split_bin
        }
    };
    let mut low = 0;
    for j in 0..index.len() {
        if goes_left(index[j]) {
            index.swap(low, j);
            low += 1;
        }
    }
    low
}
