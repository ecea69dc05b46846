//! Canonical model representations.
//!
//! - [`DenseWeights`]: dense `[n_categories, n_features]` coefficient store

mod weights;

pub use weights::DenseWeights;
pub(crate) use weights::{check_output, check_row};
