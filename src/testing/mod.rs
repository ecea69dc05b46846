//! Testing utilities.
//!
//! Seeded data generators and a small driver loop used by the unit tests,
//! the integration tests and the benchmarks.

pub mod data;

use ndarray::ArrayView2;

use crate::error::WeightError;
use crate::training::WeightVector;

pub use data::SagStep;

/// Replay driver iterations against a weight vector.
///
/// Each step calls `scale`, `update` and `check_normalize` in that order,
/// the way a SAG driver does. Returns how many `check_normalize` calls
/// materialized.
pub fn run_steps(weights: &mut dyn WeightVector, steps: &[SagStep]) -> Result<usize, WeightError> {
    let mut materialized = 0;
    for step in steps {
        weights.scale(step.alpha, step.lambda);
        weights.update(step.alpha, step.delta.view(), step.n_covered)?;
        if weights.check_normalize() {
            materialized += 1;
        }
    }
    Ok(materialized)
}

/// Largest element-wise relative difference between two matrices.
///
/// The difference is measured against `max(|a|, |b|, floor)`, so entries
/// that are both close to zero do not blow up the ratio.
///
/// # Panics
///
/// Panics if the shapes differ.
pub fn max_relative_difference(a: ArrayView2<'_, f64>, b: ArrayView2<'_, f64>, floor: f64) -> f64 {
    assert_eq!(a.dim(), b.dim(), "shape mismatch");
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| (x - y).abs() / x.abs().max(y.abs()).max(floor))
        .fold(0.0, f64::max)
}
