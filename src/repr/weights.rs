//! Dense coefficient storage.

use ndarray::{Array1, Array2, ArrayView2, ArrayViewMut1, Axis};

use crate::data::FeatureRow;
use crate::error::WeightError;
use crate::utils::Parallelism;

/// Dense weight store.
///
/// Owns the coefficient matrix of a multinomial linear model as an
/// `Array2<f64>` with shape `[n_categories, n_features]`:
///
/// ```text
/// weights[[category, feature]] → coefficient
/// ```
///
/// Rows are categories, so the score of category `c` for an input row is the
/// dot product of `weights.row(c)` with that row.
///
/// The store exposes two primitives that everything else is built from:
///
/// - [`update_data`](Self::update_data): rewrite every entry through a pure
///   function of `(value, category, feature)`
/// - [`predict`](Self::predict): raw per-category dot products
///
/// # Example
///
/// ```
/// use sag_weights::repr::DenseWeights;
/// use sag_weights::FeatureRow;
/// use ndarray::array;
///
/// let mut store = DenseWeights::from_array(array![[1.0, 2.0], [3.0, 4.0]]).unwrap();
/// store.update_data(|w, category, _| w + category as f64);
///
/// let scores = store.predict(&FeatureRow::dense(&[1.0, 1.0])).unwrap();
/// assert_eq!(scores.to_vec(), vec![3.0, 9.0]);
/// ```
#[derive(Debug, Clone)]
pub struct DenseWeights {
    /// Shape `[n_categories, n_features]`.
    weights: Array2<f64>,
    parallelism: Parallelism,
}

impl DenseWeights {
    /// Create a zero-initialized store.
    ///
    /// # Errors
    ///
    /// Returns [`WeightError::EmptyDimensions`] if either dimension is zero.
    pub fn zeros(n_categories: usize, n_features: usize) -> Result<Self, WeightError> {
        check_dimensions(n_categories, n_features)?;
        Ok(Self {
            weights: Array2::zeros((n_categories, n_features)),
            parallelism: Parallelism::Sequential,
        })
    }

    /// Create a store from an existing coefficient matrix.
    ///
    /// # Arguments
    ///
    /// * `weights` - Matrix with shape `[n_categories, n_features]`
    ///
    /// # Errors
    ///
    /// Returns [`WeightError::EmptyDimensions`] if the matrix has no rows or
    /// no columns.
    pub fn from_array(weights: Array2<f64>) -> Result<Self, WeightError> {
        check_dimensions(weights.nrows(), weights.ncols())?;
        // Keep the backing buffer in standard layout so rows stay contiguous.
        let weights = if weights.is_standard_layout() {
            weights
        } else {
            weights.as_standard_layout().into_owned()
        };
        Ok(Self {
            weights,
            parallelism: Parallelism::Sequential,
        })
    }

    /// Set the parallelism used by [`update_data`](Self::update_data).
    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    #[inline]
    pub fn parallelism(&self) -> Parallelism {
        self.parallelism
    }

    /// Number of output categories.
    #[inline]
    pub fn n_categories(&self) -> usize {
        self.weights.nrows()
    }

    /// Number of input features.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.weights.ncols()
    }

    /// `(n_categories, n_features)`.
    #[inline]
    pub fn dim(&self) -> (usize, usize) {
        self.weights.dim()
    }

    /// Get a single stored coefficient.
    #[inline]
    pub fn get(&self, category: usize, feature: usize) -> f64 {
        self.weights[[category, feature]]
    }

    /// View of the stored matrix.
    #[inline]
    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.weights.view()
    }

    /// Consume the store, returning the matrix.
    #[inline]
    pub fn into_array(self) -> Array2<f64> {
        self.weights
    }

    /// Rewrite every stored entry as `f(value, category, feature)`.
    ///
    /// This is O(n_categories × n_features) and is the only way entries are
    /// mutated after construction. With [`Parallelism::Parallel`] the
    /// category rows are processed on the rayon pool; every entry is
    /// transformed independently so the result does not depend on the mode.
    pub fn update_data<F>(&mut self, f: F)
    where
        F: Fn(f64, usize, usize) -> f64 + Sync + Send,
    {
        let rows = self.weights.axis_iter_mut(Axis(0)).enumerate();
        self.parallelism.maybe_par_bridge_for_each(rows, |(category, mut row)| {
            for (feature, value) in row.iter_mut().enumerate() {
                *value = f(*value, category, feature);
            }
        });
    }

    /// Multiply every stored entry by `factor`.
    #[inline]
    pub fn scale_by(&mut self, factor: f64) {
        self.update_data(move |value, _, _| value * factor);
    }

    /// Write the raw per-category dot products with `row` into `out`.
    ///
    /// # Errors
    ///
    /// - [`WeightError::RowLengthMismatch`] if `row` does not have
    ///   `n_features()` entries
    /// - [`WeightError::OutputLengthMismatch`] if `out` does not have
    ///   `n_categories()` entries
    pub fn predict_into(
        &self,
        row: &FeatureRow<'_>,
        out: ArrayViewMut1<'_, f64>,
    ) -> Result<(), WeightError> {
        check_row(self.n_features(), row.n_features())?;
        check_output(self.n_categories(), out.len())?;
        self.scores_into(row, out);
        Ok(())
    }

    /// Raw per-category dot products with `row`.
    ///
    /// # Errors
    ///
    /// [`WeightError::RowLengthMismatch`] if `row` does not have
    /// `n_features()` entries.
    pub fn predict(&self, row: &FeatureRow<'_>) -> Result<Array1<f64>, WeightError> {
        check_row(self.n_features(), row.n_features())?;
        let mut out = Array1::zeros(self.n_categories());
        self.scores_into(row, out.view_mut());
        Ok(out)
    }

    /// Unchecked scoring. Both shapes must already be validated.
    #[inline]
    pub(crate) fn scores_into(&self, row: &FeatureRow<'_>, mut out: ArrayViewMut1<'_, f64>) {
        debug_assert_eq!(row.n_features(), self.n_features());
        debug_assert_eq!(out.len(), self.n_categories());

        match row {
            FeatureRow::Dense(_) => {
                for (score, coefficients) in out.iter_mut().zip(self.weights.outer_iter()) {
                    *score = row.dot(coefficients);
                }
            }
            FeatureRow::Sparse(_) => {
                // Feature-outer so each stored entry of the row is read once.
                out.fill(0.0);
                row.for_each_value(|feature, value| {
                    let column = self.weights.column(feature);
                    for (score, &weight) in out.iter_mut().zip(column.iter()) {
                        *score += weight * value;
                    }
                });
            }
        }
    }
}

#[inline]
pub(crate) fn check_row(expected: usize, actual: usize) -> Result<(), WeightError> {
    if expected != actual {
        return Err(WeightError::RowLengthMismatch { expected, actual });
    }
    Ok(())
}

#[inline]
pub(crate) fn check_output(expected: usize, actual: usize) -> Result<(), WeightError> {
    if expected != actual {
        return Err(WeightError::OutputLengthMismatch { expected, actual });
    }
    Ok(())
}

fn check_dimensions(n_categories: usize, n_features: usize) -> Result<(), WeightError> {
    if n_categories == 0 || n_features == 0 {
        return Err(WeightError::EmptyDimensions {
            n_categories,
            n_features,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SparseRow;
    use ndarray::array;

    #[test]
    fn zeros_has_requested_shape() {
        let store = DenseWeights::zeros(3, 5).unwrap();
        assert_eq!(store.dim(), (3, 5));
        assert_eq!(store.n_categories(), 3);
        assert_eq!(store.n_features(), 5);
        assert!(store.view().iter().all(|&w| w == 0.0));
    }

    #[test]
    fn zeros_rejects_empty_dimensions() {
        assert_eq!(
            DenseWeights::zeros(0, 4).unwrap_err(),
            WeightError::EmptyDimensions {
                n_categories: 0,
                n_features: 4
            }
        );
        assert!(DenseWeights::zeros(2, 0).is_err());
    }

    #[test]
    fn from_array_rejects_empty() {
        let empty = Array2::<f64>::zeros((2, 0));
        assert!(DenseWeights::from_array(empty).is_err());
    }

    #[test]
    fn from_array_normalizes_layout() {
        let transposed = array![[1.0, 3.0], [2.0, 4.0]].reversed_axes();
        let store = DenseWeights::from_array(transposed).unwrap();
        assert_eq!(store.view(), array![[1.0, 2.0], [3.0, 4.0]]);
        assert!(store.view().is_standard_layout());
    }

    #[test]
    fn update_data_passes_indices() {
        let mut store = DenseWeights::zeros(2, 3).unwrap();
        store.update_data(|_, category, feature| (category * 10 + feature) as f64);
        assert_eq!(store.view(), array![[0.0, 1.0, 2.0], [10.0, 11.0, 12.0]]);
    }

    #[test]
    fn update_data_parallel_matches_sequential() {
        let init = Array2::from_shape_fn((8, 16), |(c, i)| (c as f64 + 1.0) * (i as f64 - 7.5));
        let mut sequential = DenseWeights::from_array(init.clone()).unwrap();
        let mut parallel = DenseWeights::from_array(init)
            .unwrap()
            .with_parallelism(Parallelism::Parallel);

        let transform = |w: f64, c: usize, i: usize| w * 0.75 - (c * i) as f64 / 3.0;
        sequential.update_data(transform);
        parallel.update_data(transform);

        assert_eq!(sequential.view(), parallel.view());
    }

    #[test]
    fn scale_by_multiplies_every_entry() {
        let mut store = DenseWeights::from_array(array![[1.0, -2.0], [4.0, 0.5]]).unwrap();
        store.scale_by(0.5);
        assert_eq!(store.view(), array![[0.5, -1.0], [2.0, 0.25]]);
    }

    #[test]
    fn predict_dense_row() {
        let store = DenseWeights::from_array(array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
        let scores = store.predict(&FeatureRow::dense(&[1.0, 0.0, 2.0])).unwrap();
        assert_eq!(scores, array![7.0, 16.0]);
    }

    #[test]
    fn predict_sparse_row_matches_dense() {
        let store = DenseWeights::from_array(array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
        let sparse = SparseRow::new(3, &[2, 0], &[2.0, 1.0]).unwrap();
        let dense = store.predict(&FeatureRow::dense(&[1.0, 0.0, 2.0])).unwrap();
        assert_eq!(store.predict(&sparse.into()).unwrap(), dense);
    }

    #[test]
    fn predict_rejects_short_dense_row() {
        let store = DenseWeights::zeros(2, 3).unwrap();
        assert_eq!(
            store.predict(&FeatureRow::dense(&[1.0, 1.0])).unwrap_err(),
            WeightError::RowLengthMismatch {
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn predict_rejects_sparse_row_from_wider_space() {
        let store = DenseWeights::zeros(2, 3).unwrap();
        let sparse = SparseRow::new(10, &[7], &[1.0]).unwrap();
        assert_eq!(
            store.predict(&sparse.into()).unwrap_err(),
            WeightError::RowLengthMismatch {
                expected: 3,
                actual: 10
            }
        );
    }

    #[test]
    fn predict_into_checks_output_length() {
        let store = DenseWeights::from_array(array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]).unwrap();
        let row = FeatureRow::dense(&[1.0, 1.0]);

        let mut short = Array1::zeros(2);
        assert_eq!(
            store.predict_into(&row, short.view_mut()).unwrap_err(),
            WeightError::OutputLengthMismatch {
                expected: 3,
                actual: 2
            }
        );
        assert_eq!(short, array![0.0, 0.0]);

        let mut out = Array1::zeros(3);
        store.predict_into(&row, out.view_mut()).unwrap();
        assert_eq!(out, array![3.0, 7.0, 11.0]);
    }
}
