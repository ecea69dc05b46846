//! Weight vectors for stochastic average gradient (SAG) training.
//!
//! A SAG driver for L2-regularized multinomial logistic regression does three
//! things to the coefficient matrix on every iteration:
//!
//! 1. [`scale`](WeightVector::scale): shrink every weight by `1 - α·λ`
//! 2. [`update`](WeightVector::update): subtract the averaged gradient,
//!    `w[c][i] -= α · d[c][i] / n_covered`
//! 3. [`check_normalize`](WeightVector::check_normalize): give the
//!    implementation a chance to settle deferred work
//!
//! and occasionally reads the weights back through
//! [`weights`](WeightVector::weights) or [`predict`](WeightVector::predict).
//!
//! Two implementations are provided:
//!
//! - [`NaiveWeightVector`]: applies every shrink to the whole matrix
//!   immediately. O(n_categories × n_features) per `scale`; the reference
//!   semantics.
//! - [`ScaledWeightVector`]: folds shrinks into one pending scalar and only
//!   multiplies it into the matrix when the scalar drifts out of a safe band
//!   or when the weights are read. O(1) per `scale`.
//!
//! Both produce the same weights up to floating-point rounding. Pick one with
//! [`WeightVectorKind`] via [`WeightVectorParams::build`].

mod naive;
mod params;
mod scaled;

use std::fmt;

use ndarray::{Array1, Array2, ArrayView2, ArrayViewMut1};

use crate::data::FeatureRow;
use crate::error::WeightError;
use crate::repr::{DenseWeights, check_output, check_row};
use crate::utils::Parallelism;

use sealed::RawScores;

pub use naive::NaiveWeightVector;
pub use params::{ParamValidationError, ScaleBounds, WeightVectorKind, WeightVectorParams};
pub use scaled::ScaledWeightVector;

mod sealed {
    use ndarray::ArrayViewMut1;

    use crate::data::FeatureRow;

    /// Unchecked scoring behind the public prediction methods.
    pub trait RawScores {
        /// `row` has `n_features` entries and `out` has `n_categories`.
        fn scores_into(&self, row: &FeatureRow<'_>, out: ArrayViewMut1<'_, f64>);
    }
}

/// Coefficient matrix maintained under SAG updates.
///
/// Mutating calls take `&mut self`, so there is exactly one writer. Reads
/// that do not need to materialize deferred state take `&self`.
///
/// The trait is sealed: [`NaiveWeightVector`] and [`ScaledWeightVector`] are
/// its only implementations.
pub trait WeightVector: RawScores + Send + Sync + fmt::Debug {
    /// Number of output categories (rows of the matrix).
    fn n_categories(&self) -> usize;

    /// Number of input features (columns of the matrix).
    fn n_features(&self) -> usize;

    /// Register one regularization step: every weight is multiplied by
    /// `1 - alpha * lambda`. Implementations may defer the multiplication.
    fn scale(&mut self, alpha: f64, lambda: f64);

    /// Subtract the averaged gradient: `w[c][i] -= alpha * delta[c][i] / n_covered`.
    ///
    /// The subtraction applies to the effective weights, whatever decay is
    /// still pending.
    ///
    /// # Errors
    ///
    /// - [`WeightError::ShapeMismatch`] if `delta` is not
    ///   `[n_categories, n_features]`
    /// - [`WeightError::ZeroCovered`] if `n_covered == 0`
    ///
    /// Nothing is mutated when an error is returned.
    fn update(
        &mut self,
        alpha: f64,
        delta: ArrayView2<'_, f64>,
        n_covered: usize,
    ) -> Result<(), WeightError>;

    /// Materialize deferred decay if it has drifted out of the safe range.
    ///
    /// Returns `true` if the stored matrix was rewritten. The check itself is
    /// O(1).
    fn check_normalize(&mut self) -> bool;

    /// The true weights, shape `[n_categories, n_features]`.
    ///
    /// Forces materialization, then returns a view of the backing store.
    /// The view is valid until the next mutating call.
    fn weights(&mut self) -> ArrayView2<'_, f64>;

    /// Owned snapshot of the true weights.
    fn to_weights(&mut self) -> Array2<f64> {
        self.weights().to_owned()
    }

    /// Consume the weight vector and return the materialized matrix.
    fn into_weights(self: Box<Self>) -> Array2<f64>;

    /// Materialize all deferred decay now, regardless of drift.
    ///
    /// `delta` is the driver's current gradient matrix. It is part of the
    /// call so that variants which defer gradient work can settle it here;
    /// the variants in this crate only flush their pending scale.
    fn finalize(&mut self, delta: ArrayView2<'_, f64>);

    /// Write the linear scores for `row` into `out` under the true weights.
    ///
    /// Does not materialize the stored matrix.
    ///
    /// # Errors
    ///
    /// - [`WeightError::RowLengthMismatch`] if the row dimension differs from
    ///   [`n_features`](Self::n_features)
    /// - [`WeightError::OutputLengthMismatch`] if `out` does not have
    ///   [`n_categories`](Self::n_categories) entries
    ///
    /// `out` is left untouched when an error is returned.
    fn predict_into(
        &self,
        row: FeatureRow<'_>,
        out: ArrayViewMut1<'_, f64>,
    ) -> Result<(), WeightError> {
        check_row(self.n_features(), row.n_features())?;
        check_output(self.n_categories(), out.len())?;
        self.scores_into(&row, out);
        Ok(())
    }

    /// Linear scores `score[c] = Σ_i w[c][i] · row[i]` under the true weights.
    ///
    /// Does not materialize the stored matrix.
    ///
    /// # Errors
    ///
    /// [`WeightError::RowLengthMismatch`] if the row dimension differs from
    /// [`n_features`](Self::n_features).
    fn predict(&self, row: FeatureRow<'_>) -> Result<Array1<f64>, WeightError> {
        check_row(self.n_features(), row.n_features())?;
        let mut out = Array1::zeros(self.n_categories());
        self.scores_into(&row, out.view_mut());
        Ok(out)
    }

    /// Scores for a batch of dense rows.
    ///
    /// # Arguments
    ///
    /// * `rows` - Matrix with shape `[n_rows, n_features]`
    /// * `parallelism` - Whether rows may be scored on the rayon pool
    ///
    /// # Returns
    ///
    /// Scores with shape `[n_rows, n_categories]`.
    fn predict_batch(
        &self,
        rows: ArrayView2<'_, f64>,
        parallelism: Parallelism,
    ) -> Result<Array2<f64>, WeightError> {
        check_row(self.n_features(), rows.ncols())?;
        let mut output = Array2::zeros((rows.nrows(), self.n_categories()));

        let pairs = output.rows_mut().into_iter().zip(rows.rows());
        parallelism.maybe_par_bridge_for_each(pairs, |(out, row)| {
            self.scores_into(&FeatureRow::Dense(row), out)
        });

        Ok(output)
    }
}

/// Regularization shrink applied by one `scale(alpha, lambda)` call.
#[inline]
pub(crate) fn decay_factor(alpha: f64, lambda: f64) -> f64 {
    1.0 - alpha * lambda
}

/// Validate the arguments of an `update` call against the store.
pub(crate) fn check_update(
    store: &DenseWeights,
    delta: ArrayView2<'_, f64>,
    n_covered: usize,
) -> Result<(), WeightError> {
    if delta.dim() != store.dim() {
        return Err(WeightError::ShapeMismatch {
            expected: store.dim(),
            actual: delta.dim(),
        });
    }
    if n_covered == 0 {
        return Err(WeightError::ZeroCovered);
    }
    Ok(())
}
