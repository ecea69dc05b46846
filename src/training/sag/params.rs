//! Weight vector configuration.

use ndarray::Array2;

use crate::error::WeightError;
use crate::repr::DenseWeights;
use crate::utils::Parallelism;

use super::{NaiveWeightVector, ScaledWeightVector, WeightVector};

// =============================================================================
// ScaleBounds
// =============================================================================

/// Safe magnitude band for a pending scale factor.
///
/// A pending scale `s` is materialized by
/// [`check_normalize`](super::WeightVector::check_normalize) when
/// `|s| > max_magnitude` or `0 < |s| < min_magnitude`. Left alone, a product
/// of many shrink factors would underflow to zero (or overflow to infinity)
/// and take every stored weight with it.
///
/// The defaults leave about 200 orders of magnitude of headroom on either
/// side of the `f64` range, so a stored weight `w / s` stays finite for any
/// reasonable true weight `w`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleBounds {
    /// Smallest magnitude a non-zero pending scale may reach.
    pub min_magnitude: f64,
    /// Largest magnitude a pending scale may reach.
    pub max_magnitude: f64,
}

impl Default for ScaleBounds {
    fn default() -> Self {
        Self {
            min_magnitude: 1e-100,
            max_magnitude: 1e100,
        }
    }
}

impl ScaleBounds {
    /// Bounds re-derived for single precision.
    ///
    /// `f32` covers roughly `1e-38..3e38`; keeping the pending scale inside
    /// `1e-30..1e30` leaves the same kind of headroom the `f64` defaults do.
    /// Use this when the stored weights are later narrowed to `f32`.
    pub fn for_f32() -> Self {
        Self {
            min_magnitude: 1e-30,
            max_magnitude: 1e30,
        }
    }

    /// Check that `0 < min_magnitude < 1 < max_magnitude`, both finite.
    pub fn validate(&self) -> Result<(), ParamValidationError> {
        let ordered = self.min_magnitude > 0.0
            && self.min_magnitude < 1.0
            && self.max_magnitude > 1.0
            && self.max_magnitude.is_finite();
        if !ordered {
            return Err(ParamValidationError::InvalidScaleBounds {
                min_magnitude: self.min_magnitude,
                max_magnitude: self.max_magnitude,
            });
        }
        Ok(())
    }

    /// Whether `scale` lies outside the safe band.
    ///
    /// Exactly zero is not drift: there is nothing left to lose precision on.
    #[inline]
    pub fn is_drifted(&self, scale: f64) -> bool {
        let magnitude = scale.abs();
        magnitude > self.max_magnitude || (magnitude > 0.0 && magnitude < self.min_magnitude)
    }
}

// =============================================================================
// WeightVectorKind / WeightVectorParams
// =============================================================================

/// Weight vector implementation selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WeightVectorKind {
    /// Apply every shrink to the whole matrix immediately.
    Naive,
    /// Defer shrinks into a pending scalar.
    #[default]
    Scaled,
}

/// Parameters for constructing a weight vector.
#[derive(Debug, Clone, Default)]
pub struct WeightVectorParams {
    /// Which implementation to build.
    pub kind: WeightVectorKind,
    /// Drift band for the scaled implementation. Ignored by `Naive`.
    pub bounds: ScaleBounds,
    /// Parallelism for whole-matrix transforms.
    pub parallelism: Parallelism,
}

impl WeightVectorParams {
    /// Validate all parameters.
    pub fn validate(&self) -> Result<(), ParamValidationError> {
        self.bounds.validate()
    }

    /// Build a zero-initialized weight vector.
    ///
    /// # Errors
    ///
    /// - [`WeightError::InvalidParams`] if validation fails
    /// - [`WeightError::EmptyDimensions`] if either dimension is zero
    pub fn build(
        &self,
        n_categories: usize,
        n_features: usize,
    ) -> Result<Box<dyn WeightVector>, WeightError> {
        self.build_from_store(DenseWeights::zeros(n_categories, n_features)?)
    }

    /// Build a weight vector starting from existing coefficients
    /// (shape `[n_categories, n_features]`).
    pub fn build_from(&self, weights: Array2<f64>) -> Result<Box<dyn WeightVector>, WeightError> {
        self.build_from_store(DenseWeights::from_array(weights)?)
    }

    fn build_from_store(&self, store: DenseWeights) -> Result<Box<dyn WeightVector>, WeightError> {
        self.validate()?;
        let store = store.with_parallelism(self.parallelism);
        Ok(match self.kind {
            WeightVectorKind::Naive => Box::new(NaiveWeightVector::from_store(store)),
            WeightVectorKind::Scaled => {
                Box::new(ScaledWeightVector::from_store(store).with_bounds(self.bounds)?)
            }
        })
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Parameter validation error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamValidationError {
    /// Scale bounds must satisfy `0 < min_magnitude < 1 < max_magnitude < inf`.
    #[error(
        "scale bounds must satisfy 0 < min < 1 < max < inf, got min={min_magnitude:e}, max={max_magnitude:e}"
    )]
    InvalidScaleBounds {
        min_magnitude: f64,
        max_magnitude: f64,
    },
}

// =============================================================================
// Tests
// =============================================================================
