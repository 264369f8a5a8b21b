use crate::data::{JaggedMatrix, Matrix};
use crate::errors::PlannerError;
use crate::utils::{map_bin, percentiles};

/// Largest accepted bin count. A column can hold `max_bin` unique values plus
/// the closing `f64::MAX`, and bin 0 is kept for missing values, so the
/// highest bin index is `max_bin + 1`.
pub const MAX_BIN_LIMIT: u16 = u16::MAX - 1;

/// If there are fewer unique values than there are
/// percentiles, just return the unique values of the
/// vector.
///
/// * `v` - A numeric slice to calculate percentiles for.
/// * `sample_weight` - Instance weights for each row in the data.
fn percentiles_or_value(v: &[f64], sample_weight: &[f64], pcts: &[f64]) -> Vec<f64> {
    let mut v_u = v.to_owned();
    v_u.sort_unstable_by(|a, b| a.total_cmp(b));
    v_u.dedup();
    if v_u.len() <= pcts.len() + 1 {
        v_u
    } else {
        percentiles(v, sample_weight, pcts)
    }
}

// The dataset is bucketed into discrete bins per column.
// Cut points come from the unique values of a column, or from
// weighted percentiles once a column has more unique values than bins.
// f64::MAX always closes the list, so with cuts [0.0, 7.0, 31.0, MAX]
// bin 0 holds missing values, bin 1 holds [MIN, 0.0), bin 2 holds
// [0.0, 7.0), and so on. A split on bin b sends rows with a bin
// below b to the left, which is the same as `feature < cuts[b - 2]`.
#[derive(Debug)]
pub struct BinnedData {
    pub binned_data: Vec<u16>,
    pub cuts: JaggedMatrix<f64>,
    pub nunique: Vec<usize>,
}

impl BinnedData {
    /// Number of histogram bins needed for a column, including the missing bin.
    pub fn n_bins(&self, col: usize) -> usize {
        self.cuts.get_col(col).len() + 1
    }

    /// The raw threshold a split on `split_bin` corresponds to.
    pub fn split_value(&self, col: usize, split_bin: u16) -> f64 {
        self.cuts.get_col(col)[split_bin as usize - 2]
    }
}

/// Convert a matrix of data into a binned matrix.
///
/// * `data` - Numeric data to be binned.
/// * `cuts` - Cut values for each of the columns.
pub fn bin_matrix_from_cuts(data: &Matrix<f64>, cuts: &JaggedMatrix<f64>) -> Vec<u16> {
    data.data
        .iter()
        .enumerate()
        .map(|(i, v)| map_bin(cuts.get_col(i / data.rows), *v))
        .collect()
}

/// Bin a numeric matrix.
///
/// * `data` - A numeric matrix, of data to be binned.
/// * `sample_weight` - Instance weights for each row of the data.
/// * `nbins` - The number of bins each column should be binned into.
pub fn bin_matrix(data: &Matrix<f64>, sample_weight: Option<&[f64]>, nbins: u16) -> Result<BinnedData, PlannerError> {
    if !(2..=MAX_BIN_LIMIT).contains(&nbins) {
        return Err(PlannerError::InvalidParameter(
            "max_bin".to_string(),
            format!("a value between 2 and {}", MAX_BIN_LIMIT),
            nbins.to_string(),
        ));
    }
    let pcts: Vec<f64> = (1..nbins).map(|i| f64::from(i) / f64::from(nbins)).collect();

    let s_w = vec![1.0; data.rows];
    let weight = sample_weight.unwrap_or(&s_w);

    let mut cuts = JaggedMatrix::new();
    let mut nunique = Vec::with_capacity(data.cols);
    for i in 0..data.cols {
        let (no_miss, w): (Vec<f64>, Vec<f64>) = data
            .get_col(i)
            .iter()
            .zip(weight.iter())
            .filter(|(v, _)| !v.is_nan())
            .unzip();

        let mut col_cuts = if no_miss.is_empty() {
            Vec::new()
        } else {
            percentiles_or_value(&no_miss, &w, &pcts)
        };
        col_cuts.push(f64::MAX);
        col_cuts.dedup();
        nunique.push(col_cuts.len());
        cuts.push_col(col_cuts);
    }

    let binned_data = bin_matrix_from_cuts(data, &cuts);

    Ok(BinnedData {
        binned_data,
        cuts,
        nunique,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bin_data() {
        // Column 0: a genre flag, column 1: budgets, column 2: months.
        let flags = vec![0., 1., 0., 1., 1., 0., 0., 1.];
        let budgets = vec![1e6, 5e6, 2e7, 1e6, 8e7, 3e6, 5e6, 1e8];
        let months = vec![1., 6., 12., 6., 7., 11., 12., 5.];
        let data_vec: Vec<f64> = flags.iter().chain(&budgets).chain(&months).copied().collect();
        let data = Matrix::new(&data_vec, 8, 3);
        let b = bin_matrix(&data, None, 256).unwrap();
        let bdata = Matrix::new(&b.binned_data, data.rows, data.cols);

        // Every row of a bin is within the bin's cut range.
        for column in 0..data.cols {
            let cuts = b.cuts.get_col(column);
            for (bin, value) in bdata.get_col(column).iter().zip(data.get_col(column)) {
                let bin = *bin as usize;
                assert!(bin >= 1);
                if bin >= 2 {
                    assert!(cuts[bin - 2] <= *value);
                }
                assert!(*value < cuts[bin - 1]);
            }
        }
        assert_eq!(b.nunique, vec![3, 7, 7]);
    }

    #[test]
    fn test_bin_data_percentiles() {
        let data_vec: Vec<f64> = (0..1000).map(|i| i as f64).collect();
        let data = Matrix::new(&data_vec, 1000, 1);
        let b = bin_matrix(&data, None, 10).unwrap();
        // Nine percentiles plus the closing maximum.
        assert_eq!(b.cuts.get_col(0).len(), 10);
        assert!(b.binned_data.iter().all(|v| *v >= 1 && *v <= 10));
        assert_eq!(b.n_bins(0), 11);
    }

    #[test]
    fn test_bin_data_missing() {
        let data_vec = vec![1.0, f64::NAN, 3.0];
        let data = Matrix::new(&data_vec, 3, 1);
        let b = bin_matrix(&data, None, 256).unwrap();
        assert_eq!(b.binned_data[1], 0);
        assert!(bin_matrix(&data, None, 1).is_err());
    }

    #[test]
    fn test_bin_data_at_bin_limit() {
        let n = MAX_BIN_LIMIT as usize;
        let data_vec: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let data = Matrix::new(&data_vec, n, 1);
        let b = bin_matrix(&data, None, MAX_BIN_LIMIT).unwrap();
        assert_eq!(b.cuts.get_col(0).len(), n + 1);
        assert!(b.binned_data.iter().all(|v| *v >= 1));
        assert_eq!(b.binned_data[n - 1], u16::MAX);

        let data_vec: Vec<f64> = (0..=n).map(|i| i as f64).collect();
        let data = Matrix::new(&data_vec, n + 1, 1);
        assert!(matches!(
            bin_matrix(&data, None, u16::MAX),
            Err(PlannerError::InvalidParameter(..))
        ));
    }
}
