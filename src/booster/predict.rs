use crate::booster::core::RevenueBooster;
use crate::data::Matrix;

impl RevenueBooster {
    /// Generate predictions on data using the booster.
    ///
    /// * `data` - Column-major matrix with the same columns the booster was fit on.
    /// * `parallel` - Predict rows in parallel.
    pub fn predict(&self, data: &Matrix<f64>, parallel: bool) -> Vec<f64> {
        let mut init_preds = vec![self.base_score; data.rows];
        self.trees.iter().for_each(|tree| {
            for (p_, val) in init_preds.iter_mut().zip(tree.predict(data, parallel)) {
                *p_ += val;
            }
        });
        init_preds
    }

    /// Predict a single row given in column order.
    pub fn predict_row(&self, row: &[f64]) -> f64 {
        self.trees
            .iter()
            .fold(self.base_score, |acc, tree| acc + tree.predict_row(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predict_row_matches_matrix() {
        let x: Vec<f64> = (0..40).map(|i| (i % 10) as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| v * 3.0 + 1.0).collect();
        let data = Matrix::new(&x, 40, 1);
        let mut booster = RevenueBooster::default().set_n_estimators(10);
        booster.fit(&data, &y).unwrap();
        let preds = booster.predict(&data, false);
        for (i, p) in preds.iter().enumerate() {
            assert_eq!(*p, booster.predict_row(&data.get_row(i)));
        }
    }

    #[test]
    fn test_unfitted_predicts_base_score() {
        let booster = RevenueBooster::default();
        let x = vec![1.0, 2.0, 3.0];
        let data = Matrix::new(&x, 3, 1);
        assert_eq!(booster.predict(&data, true), vec![0.0; 3]);
    }
}
