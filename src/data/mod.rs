//! Input row abstractions.
//!
//! Prediction consumes one input row at a time. Rows come either as a dense
//! view over `n_features` values or as a sparse list of `(feature, value)`
//! pairs; both are borrowed from caller-owned storage.
//!
//! - [`FeatureRow`]: dense or sparse row view
//! - [`SparseRow`]: validated sparse row

mod row;

pub use row::{FeatureRow, SparseRow};
