//! sag-weights: coefficient matrices for stochastic average gradient solvers.
//!
//! A SAG solver for L2-regularized multinomial logistic regression shrinks
//! every coefficient by `1 - α·λ` on every iteration and then subtracts an
//! averaged gradient. Doing the shrink eagerly costs a full pass over the
//! `n_categories × n_features` matrix per step. This crate keeps the shrink
//! as a single pending scalar instead and only folds it into the matrix when
//! the scalar threatens to under- or overflow, or when the weights are read.
//!
//! # Key Types
//!
//! - [`WeightVector`] - The contract a SAG driver programs against
//! - [`ScaledWeightVector`] - Lazily scaled implementation (O(1) shrink)
//! - [`NaiveWeightVector`] - Eager reference implementation
//! - [`WeightVectorParams`] / [`ScaleBounds`] - Configuration
//! - [`DenseWeights`] - The underlying coefficient store
//! - [`FeatureRow`] - Dense or sparse input row for prediction
//!
//! # Example
//!
//! ```
//! use sag_weights::{FeatureRow, WeightVector, WeightVectorParams};
//! use ndarray::array;
//!
//! let mut weights = WeightVectorParams::default().build(2, 3).unwrap();
//!
//! // One driver iteration.
//! let delta = array![[1.0, 0.0, -1.0], [0.0, 2.0, 0.0]];
//! weights.scale(0.1, 0.5);
//! weights.update(0.1, delta.view(), 4).unwrap();
//! weights.check_normalize();
//!
//! let scores = weights.predict(FeatureRow::dense(&[1.0, 1.0, 1.0])).unwrap();
//! assert_eq!(scores.len(), 2);
//! assert_eq!(weights.weights().dim(), (2, 3));
//! ```

// Re-export approx traits for users who want to compare weight matrices
pub use approx;

pub mod data;
pub mod error;
pub mod repr;
pub mod testing;
pub mod training;
pub mod utils;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use data::{FeatureRow, SparseRow};
pub use error::WeightError;
pub use repr::DenseWeights;
pub use training::{
    NaiveWeightVector, ParamValidationError, ScaleBounds, ScaledWeightVector, WeightVector,
    WeightVectorKind, WeightVectorParams,
};
pub use utils::Parallelism;
