//! Eager weight vector.

use ndarray::{Array2, ArrayView2, ArrayViewMut1};

use crate::data::FeatureRow;
use crate::error::WeightError;
use crate::repr::DenseWeights;

use super::sealed::RawScores;
use super::{WeightVector, check_update, decay_factor};

/// Weight vector that applies every operation to the whole matrix at once.
///
/// `scale` costs O(n_categories × n_features) on every call. This is the
/// reference against which [`ScaledWeightVector`](super::ScaledWeightVector)
/// is checked; it has no deferred state, so
/// [`check_normalize`](WeightVector::check_normalize) and
/// [`finalize`](WeightVector::finalize) do nothing.
#[derive(Debug, Clone)]
pub struct NaiveWeightVector {
    store: DenseWeights,
}

impl NaiveWeightVector {
    /// Zero-initialized weights.
    pub fn new(n_categories: usize, n_features: usize) -> Result<Self, WeightError> {
        Ok(Self::from_store(DenseWeights::zeros(n_categories, n_features)?))
    }

    /// Start from existing coefficients.
    pub fn from_array(weights: Array2<f64>) -> Result<Self, WeightError> {
        Ok(Self::from_store(DenseWeights::from_array(weights)?))
    }

    /// Wrap a store as is; its parallelism carries over.
    pub fn from_store(store: DenseWeights) -> Self {
        Self { store }
    }

    /// Consume and return the weight matrix.
    pub fn into_weights(self) -> Array2<f64> {
        self.store.into_array()
    }
}

impl WeightVector for NaiveWeightVector {
    fn n_categories(&self) -> usize {
        self.store.n_categories()
    }

    fn n_features(&self) -> usize {
        self.store.n_features()
    }

    fn scale(&mut self, alpha: f64, lambda: f64) {
        self.store.scale_by(decay_factor(alpha, lambda));
    }

    fn update(
        &mut self,
        alpha: f64,
        delta: ArrayView2<'_, f64>,
        n_covered: usize,
    ) -> Result<(), WeightError> {
        check_update(&self.store, delta, n_covered)?;
        let n_covered = n_covered as f64;
        self.store
            .update_data(|value, c, i| value - alpha * delta[[c, i]] / n_covered);
        Ok(())
    }

    fn check_normalize(&mut self) -> bool {
        false
    }

    fn weights(&mut self) -> ArrayView2<'_, f64> {
        self.store.view()
    }

    fn into_weights(self: Box<Self>) -> Array2<f64> {
        (*self).into_weights()
    }

    fn finalize(&mut self, _delta: ArrayView2<'_, f64>) {}
}

impl RawScores for NaiveWeightVector {
    fn scores_into(&self, row: &FeatureRow<'_>, out: ArrayViewMut1<'_, f64>) {
        self.store.scores_into(row, out);
    }
}
