//! Error types.
//!
//! Every error here is a caller contract violation. Operations validate their
//! inputs before touching any state, so a returned error never leaves a
//! weight vector half-updated.

use crate::training::sag::ParamValidationError;

/// Invalid argument passed to a weight store or weight vector.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WeightError {
    /// A matrix argument does not have shape `[n_categories, n_features]`.
    #[error("shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// A row does not have `n_features` entries.
    #[error("row has {actual} features, expected {expected}")]
    RowLengthMismatch { expected: usize, actual: usize },

    /// A score buffer does not have `n_categories` entries.
    #[error("output has {actual} entries, expected {expected}")]
    OutputLengthMismatch { expected: usize, actual: usize },

    /// `n_covered` must be positive; it divides the gradient delta.
    #[error("n_covered must be > 0")]
    ZeroCovered,

    /// The weight matrix must have at least one category and one feature.
    #[error("weight matrix must be non-empty, got {n_categories} categories x {n_features} features")]
    EmptyDimensions {
        n_categories: usize,
        n_features: usize,
    },

    /// A sparse row is malformed.
    #[error("invalid sparse row: {0}")]
    InvalidSparseRow(String),

    /// Configuration failed validation.
    #[error(transparent)]
    InvalidParams(#[from] ParamValidationError),
}
