//! Dense and sparse row views.

use ndarray::ArrayView1;

use crate::error::WeightError;

/// Sparse input row: parallel `indices` / `values` slices plus the declared
/// dimension of the full row.
///
/// Features not listed are zero. Indices do not need to be sorted; a
/// repeated index contributes once per occurrence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SparseRow<'a> {
    n_features: usize,
    indices: &'a [usize],
    values: &'a [f64],
}

impl<'a> SparseRow<'a> {
    /// Create a sparse row.
    ///
    /// # Errors
    ///
    /// Returns [`WeightError::InvalidSparseRow`] if `indices` and `values`
    /// differ in length or any index is `>= n_features`.
    pub fn new(
        n_features: usize,
        indices: &'a [usize],
        values: &'a [f64],
    ) -> Result<Self, WeightError> {
        if indices.len() != values.len() {
            return Err(WeightError::InvalidSparseRow(format!(
                "{} indices but {} values",
                indices.len(),
                values.len()
            )));
        }
        if let Some(&bad) = indices.iter().find(|&&idx| idx >= n_features) {
            return Err(WeightError::InvalidSparseRow(format!(
                "feature index {bad} out of range for {n_features} features"
            )));
        }
        Ok(Self {
            n_features,
            indices,
            values,
        })
    }

    /// Declared dimension of the row.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Number of stored entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn indices(&self) -> &'a [usize] {
        self.indices
    }

    #[inline]
    pub fn values(&self) -> &'a [f64] {
        self.values
    }
}

/// One input row, borrowed from the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureRow<'a> {
    /// All `n_features` values.
    Dense(ArrayView1<'a, f64>),
    /// Only the non-zero entries.
    Sparse(SparseRow<'a>),
}

impl<'a> FeatureRow<'a> {
    /// Dense row over a slice.
    #[inline]
    pub fn dense(values: &'a [f64]) -> Self {
        FeatureRow::Dense(ArrayView1::from(values))
    }

    /// Dimension of the row (length for dense rows, declared size for sparse).
    #[inline]
    pub fn n_features(&self) -> usize {
        match self {
            FeatureRow::Dense(values) => values.len(),
            FeatureRow::Sparse(sparse) => sparse.n_features(),
        }
    }

    /// Call `f(feature, value)` for every stored entry.
    ///
    /// Dense rows visit every feature; sparse rows only the listed ones.
    #[inline]
    pub fn for_each_value<F>(&self, mut f: F)
    where
        F: FnMut(usize, f64),
    {
        match self {
            FeatureRow::Dense(values) => {
                for (feature, &value) in values.iter().enumerate() {
                    f(feature, value);
                }
            }
            FeatureRow::Sparse(sparse) => {
                for (&feature, &value) in sparse.indices.iter().zip(sparse.values) {
                    f(feature, value);
                }
            }
        }
    }

    /// Dot product against one row of coefficients.
    ///
    /// `coefficients` must have `n_features()` entries.
    #[inline]
    pub fn dot(&self, coefficients: ArrayView1<'_, f64>) -> f64 {
        debug_assert_eq!(coefficients.len(), self.n_features());
        match self {
            FeatureRow::Dense(values) => values.dot(&coefficients),
            FeatureRow::Sparse(sparse) => sparse
                .indices
                .iter()
                .zip(sparse.values)
                .map(|(&feature, &value)| coefficients[feature] * value)
                .sum(),
        }
    }
}

impl<'a> From<ArrayView1<'a, f64>> for FeatureRow<'a> {
    fn from(values: ArrayView1<'a, f64>) -> Self {
        FeatureRow::Dense(values)
    }
}

impl<'a> From<&'a [f64]> for FeatureRow<'a> {
    fn from(values: &'a [f64]) -> Self {
        FeatureRow::dense(values)
    }
}

impl<'a> From<SparseRow<'a>> for FeatureRow<'a> {
    fn from(sparse: SparseRow<'a>) -> Self {
        FeatureRow::Sparse(sparse)
    }
}
