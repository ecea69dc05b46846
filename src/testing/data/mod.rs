use ndarray::Array2;
use rand::prelude::*;

/// Generate a random dense matrix.
///
/// Values are uniform in `[min, max]`.
pub fn random_matrix(rows: usize, cols: usize, seed: u64, min: f64, max: f64) -> Array2<f64> {
	assert!(max >= min);
	let mut rng = StdRng::seed_from_u64(seed);
	let width = max - min;
	Array2::from_shape_simple_fn((rows, cols), || min + rng.r#gen::<f64>() * width)
}

/// Generate a random sparse gradient delta.
///
/// Each entry is non-zero with probability `density`; non-zero values are
/// uniform in `[-1, 1)`.
pub fn random_sparse_delta(rows: usize, cols: usize, density: f64, seed: u64) -> Array2<f64> {
	assert!((0.0..=1.0).contains(&density));
	let mut rng = StdRng::seed_from_u64(seed);
	Array2::from_shape_simple_fn((rows, cols), || {
		if rng.r#gen::<f64>() < density {
			rng.r#gen::<f64>() * 2.0 - 1.0
		} else {
			0.0
		}
	})
}

/// One iteration of a SAG driver: shrink by `1 - alpha * lambda`, then
/// subtract `alpha * delta / n_covered`.
#[derive(Debug, Clone)]
pub struct SagStep {
	pub alpha: f64,
	pub lambda: f64,
	pub delta: Array2<f64>,
	pub n_covered: usize,
}

/// Generate a deterministic sequence of driver iterations.
///
/// Step sizes are in `[1e-3, 0.1)`, regularization strengths in `[0, 1)`,
/// `n_covered` in `1..=64` and deltas have 30% density.
pub fn random_sag_steps(n_categories: usize, n_features: usize, n_steps: usize, seed: u64) -> Vec<SagStep> {
	let mut rng = StdRng::seed_from_u64(seed);
	(0..n_steps)
		.map(|_| SagStep {
			alpha: rng.gen_range(1e-3..0.1),
			lambda: rng.gen_range(0.0..1.0),
			delta: random_sparse_delta(n_categories, n_features, 0.3, rng.next_u64()),
			n_covered: rng.gen_range(1..=64),
		})
		.collect()
}
