//! Lazily scaled weight vector.
//!
//! The true weights are `stored * pending_scale`. A `scale` call only
//! multiplies the scalar; the matrix is rewritten when the scalar leaves
//! its [`ScaleBounds`] or when the weights have to be read back.
//!
//! An `update` written against the true weights,
//!
//! ```text
//! true'[c][i] = true[c][i] - α · d[c][i] / n
//! ```
//!
//! becomes, in stored space (divide both sides by `pending_scale`),
//!
//! ```text
//! stored'[c][i] = stored[c][i] - α · d[c][i] / (pending_scale · n)
//! ```
//!
//! so the invariant holds without touching the scalar.

use approx::ulps_eq;
use ndarray::{Array2, ArrayView2, ArrayViewMut1};

use crate::data::FeatureRow;
use crate::error::WeightError;
use crate::repr::DenseWeights;

use super::sealed::RawScores;
use super::{ScaleBounds, WeightVector, check_update, decay_factor};

/// Weight vector that defers regularization shrinks into one scalar.
///
/// `scale` is O(1). `update` is O(n_categories × n_features), like the naive
/// variant. Prediction applies the pending scale to the `n_categories`
/// scores instead of to the matrix.
///
/// # Example
///
/// ```
/// use sag_weights::{FeatureRow, ScaledWeightVector, WeightVector};
/// use ndarray::array;
///
/// let mut weights = ScaledWeightVector::from_array(array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
/// weights.scale(0.1, 1.0); // shrink by 0.9, deferred
/// assert_eq!(weights.pending_scale(), 0.9);
///
/// let scores = weights.predict(FeatureRow::dense(&[1.0, 1.0, 1.0])).unwrap();
/// assert!((scores[0] - 5.4).abs() < 1e-12);
/// assert!((scores[1] - 13.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct ScaledWeightVector {
    store: DenseWeights,
    /// Multiplier not yet applied to `store`.
    scale: f64,
    bounds: ScaleBounds,
}

impl ScaledWeightVector {
    /// Zero-initialized weights with the default [`ScaleBounds`].
    pub fn new(n_categories: usize, n_features: usize) -> Result<Self, WeightError> {
        Ok(Self::from_store(DenseWeights::zeros(n_categories, n_features)?))
    }

    /// Start from existing coefficients.
    pub fn from_array(weights: Array2<f64>) -> Result<Self, WeightError> {
        Ok(Self::from_store(DenseWeights::from_array(weights)?))
    }

    /// Wrap a store whose entries are the true weights (pending scale 1).
    pub fn from_store(store: DenseWeights) -> Self {
        Self {
            store,
            scale: 1.0,
            bounds: ScaleBounds::default(),
        }
    }

    /// Replace the drift band.
    ///
    /// # Errors
    ///
    /// [`WeightError::InvalidParams`] if `bounds` fails validation.
    pub fn with_bounds(mut self, bounds: ScaleBounds) -> Result<Self, WeightError> {
        bounds.validate()?;
        self.bounds = bounds;
        Ok(self)
    }

    /// Multiplier currently pending on the stored matrix.
    #[inline]
    pub fn pending_scale(&self) -> f64 {
        self.scale
    }

    #[inline]
    pub fn bounds(&self) -> ScaleBounds {
        self.bounds
    }

    /// Stored (not yet scaled) coefficients.
    #[inline]
    pub fn stored(&self) -> &DenseWeights {
        &self.store
    }

    /// Consume, flush and return the weight matrix.
    pub fn into_weights(mut self) -> Array2<f64> {
        self.flush();
        self.store.into_array()
    }

    /// Multiply the pending scale into the matrix and reset it to 1.
    ///
    /// A scale within one ULP of 1 is left pending.
    fn flush(&mut self) -> bool {
        if ulps_eq!(self.scale, 1.0, epsilon = 0.0, max_ulps = 1) {
            return false;
        }
        log::trace!("materializing pending scale {:e}", self.scale);
        self.store.scale_by(self.scale);
        self.scale = 1.0;
        true
    }
}

impl WeightVector for ScaledWeightVector {
    fn n_categories(&self) -> usize {
        self.store.n_categories()
    }

    fn n_features(&self) -> usize {
        self.store.n_features()
    }

    fn scale(&mut self, alpha: f64, lambda: f64) {
        self.scale *= decay_factor(alpha, lambda);
        if self.scale == 0.0 {
            // Every true weight is now exactly zero. Materialize so that the
            // next update does not divide by the scale.
            log::debug!("pending scale collapsed to zero (alpha={alpha}, lambda={lambda})");
            self.store.update_data(|_, _, _| 0.0);
            self.scale = 1.0;
        }
    }

    fn update(
        &mut self,
        alpha: f64,
        delta: ArrayView2<'_, f64>,
        n_covered: usize,
    ) -> Result<(), WeightError> {
        check_update(&self.store, delta, n_covered)?;
        let denominator = self.scale * n_covered as f64;
        self.store
            .update_data(|value, c, i| value - alpha * delta[[c, i]] / denominator);
        Ok(())
    }

    fn check_normalize(&mut self) -> bool {
        if !self.bounds.is_drifted(self.scale) {
            return false;
        }
        log::debug!(
            "pending scale {:e} left [{:e}, {:e}], materializing",
            self.scale,
            self.bounds.min_magnitude,
            self.bounds.max_magnitude
        );
        self.flush()
    }

    fn weights(&mut self) -> ArrayView2<'_, f64> {
        self.flush();
        self.store.view()
    }

    fn into_weights(self: Box<Self>) -> Array2<f64> {
        (*self).into_weights()
    }

    fn finalize(&mut self, _delta: ArrayView2<'_, f64>) {
        self.flush();
    }
}

impl RawScores for ScaledWeightVector {
    fn scores_into(&self, row: &FeatureRow<'_>, mut out: ArrayViewMut1<'_, f64>) {
        self.store.scores_into(row, out.view_mut());
        out *= self.scale;
    }
}
