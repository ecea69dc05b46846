//! Training infrastructure.
//!
//! - [`sag`]: weight vectors maintained by a stochastic average gradient
//!   driver, with eager ([`sag::NaiveWeightVector`]) and lazily scaled
//!   ([`sag::ScaledWeightVector`]) implementations

pub mod sag;

pub use sag::{
    NaiveWeightVector, ParamValidationError, ScaleBounds, ScaledWeightVector, WeightVector,
    WeightVectorKind, WeightVectorParams,
};
