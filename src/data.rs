use std::fmt::{Debug, Display};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Sub, SubAssign};

/// Data trait used throughout the package
/// to control for floating point numbers.
pub trait FloatData<T>:
    Mul<Output = T>
    + Display
    + Add<Output = T>
    + Div<Output = T>
    + Copy
    + Debug
    + PartialEq
    + PartialOrd
    + AddAssign
    + Sub<Output = T>
    + SubAssign
    + Sum
    + std::marker::Send
    + std::marker::Sync
{
    /// Zero value.
    const ZERO: T;
    /// Maximum value.
    const MAX: T;
    /// Check if value is NaN.
    fn is_nan(self) -> bool;
}

impl FloatData<f64> for f64 {
    const ZERO: f64 = 0.0;
    const MAX: f64 = f64::MAX;

    fn is_nan(self) -> bool {
        self.is_nan()
    }
}

/// Contiguous Column Major Matrix data container.
///
/// Feature rows built by the planner are laid out column by column, so a
/// single genre flag, the budget, or the release month can be sliced out
/// without copying.
pub struct Matrix<'a, T> {
    /// The raw data stored in a single slice.
    pub data: &'a [T],
    /// Indices into the data row-wise.
    pub index: Vec<usize>,
    /// Number of rows in the matrix.
    pub rows: usize,
    /// Number of columns in the matrix.
    pub cols: usize,
}

impl<'a, T> Matrix<'a, T> {
    /// Create a new Matrix.
    pub fn new(data: &'a [T], rows: usize, cols: usize) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        Matrix {
            data,
            index: (0..rows).collect(),
            rows,
            cols,
        }
    }

    /// Get a single reference to an item in the matrix.
    ///
    /// * `i` - The ith row of the data to get.
    /// * `j` - the jth column of the data to get.
    pub fn get(&self, i: usize, j: usize) -> &T {
        &self.data[j * self.rows + i]
    }

    /// Get an entire column in the matrix.
    ///
    /// * `col` - The index of the column to get.
    pub fn get_col(&self, col: usize) -> &[T] {
        &self.data[(col * self.rows)..((col + 1) * self.rows)]
    }

    /// Get access to a row of the data, as an iterator.
    pub fn get_row_iter(&self, row: usize) -> std::iter::StepBy<std::iter::Skip<std::slice::Iter<'a, T>>> {
        self.data.iter().skip(row).step_by(self.rows)
    }
}

impl<'a, T> Matrix<'a, T>
where
    T: Copy,
{
    /// Get a row of the data as a vector.
    pub fn get_row(&self, row: usize) -> Vec<T> {
        self.get_row_iter(row).copied().collect()
    }
}

/// Column major matrix of ragged columns, used for the per feature cut points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JaggedMatrix<T> {
    /// The contents of the matrix.
    pub data: Vec<T>,
    /// The end index of each column.
    pub ends: Vec<usize>,
}

impl<T> JaggedMatrix<T> {
    /// Generate a new, empty, jagged matrix.
    pub fn new() -> Self {
        JaggedMatrix {
            data: Vec::new(),
            ends: Vec::new(),
        }
    }

    /// Append a column to the matrix.
    pub fn push_col(&mut self, col: Vec<T>) {
        self.data.extend(col);
        self.ends.push(self.data.len());
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.ends.len()
    }

    /// Get the column of a jagged array.
    pub fn get_col(&self, col: usize) -> &[T] {
        let start = if col == 0 { 0 } else { self.ends[col - 1] };
        &self.data[start..self.ends[col]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_layout() {
        // Two rows, three columns, column major.
        let v = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let m = Matrix::new(&v, 2, 3);
        assert_eq!(m.get(0, 0), &1.0);
        assert_eq!(m.get(1, 2), &6.0);
        assert_eq!(m.get_col(1), &[3.0, 4.0]);
        assert_eq!(m.get_row(1), vec![2.0, 4.0, 6.0]);
        assert_eq!(m.index, vec![0, 1]);
    }

    #[test]
    fn test_jagged_matrix() {
        let mut jm = JaggedMatrix::new();
        jm.push_col(vec![1, 2, 3]);
        jm.push_col(vec![4]);
        jm.push_col(vec![5, 6]);
        assert_eq!(jm.cols(), 3);
        assert_eq!(jm.get_col(0), &[1, 2, 3]);
        assert_eq!(jm.get_col(1), &[4]);
        assert_eq!(jm.get_col(2), &[5, 6]);
    }
}
