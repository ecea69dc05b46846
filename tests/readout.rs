//! Readout behaviour shared by every weight vector kind.
//!
//! Each test runs against both implementations built through
//! [`WeightVectorParams`], the way a solver selects one.

use approx::assert_abs_diff_eq;
use ndarray::{Array1, Array2, array};
use rstest::rstest;
use sag_weights::{FeatureRow, SparseRow, WeightError, WeightVector, WeightVectorKind, WeightVectorParams};

fn build(kind: WeightVectorKind, init: Array2<f64>) -> Box<dyn WeightVector> {
    WeightVectorParams {
        kind,
        ..Default::default()
    }
    .build_from(init)
    .unwrap()
}

#[rstest]
fn prediction_applies_decay(
    #[values(WeightVectorKind::Naive, WeightVectorKind::Scaled)] kind: WeightVectorKind,
) {
    let mut weights = build(kind, array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    weights.scale(0.1, 1.0);

    let scores = weights.predict(FeatureRow::dense(&[1.0, 1.0, 1.0])).unwrap();
    assert_abs_diff_eq!(scores, array![0.9 * 6.0, 0.9 * 15.0], epsilon = 1e-12);
    assert_abs_diff_eq!(scores, array![5.4, 13.5], epsilon = 1e-12);
}

#[rstest]
fn single_update_from_zero(
    #[values(WeightVectorKind::Naive, WeightVectorKind::Scaled)] kind: WeightVectorKind,
) {
    let mut weights = WeightVectorParams {
        kind,
        ..Default::default()
    }
    .build(2, 2)
    .unwrap();
    let delta = array![[2.0, 0.0], [0.0, 4.0]];

    weights.update(0.5, delta.view(), 2).unwrap();

    assert_eq!(weights.weights(), array![[-0.5, 0.0], [0.0, -1.0]]);
}

#[rstest]
fn repeated_readout_is_identical(
    #[values(WeightVectorKind::Naive, WeightVectorKind::Scaled)] kind: WeightVectorKind,
) {
    let mut weights = build(kind, array![[0.3, -0.7], [1.5, 2.5]]);
    weights.scale(0.05, 2.0);
    weights
        .update(0.05, array![[1.0, -1.0], [0.5, 0.0]].view(), 3)
        .unwrap();

    let first = weights.to_weights();
    let second = weights.to_weights();
    assert_eq!(first, second);
}

#[rstest]
fn zero_lambda_then_finalize_is_noop(
    #[values(WeightVectorKind::Naive, WeightVectorKind::Scaled)] kind: WeightVectorKind,
) {
    let init = array![[0.1, 0.2, 0.3], [-4.0, 1e-8, 6e8]];
    let mut weights = build(kind, init.clone());
    let delta = Array2::zeros((2, 3));

    weights.scale(0.25, 0.0);
    weights.finalize(delta.view());

    assert_eq!(weights.weights(), init);
}

#[rstest]
fn finalize_readout_round_trip_is_bit_exact(
    #[values(WeightVectorKind::Naive, WeightVectorKind::Scaled)] kind: WeightVectorKind,
) {
    let mut weights = build(kind, array![[1.0, 2.0], [3.0, 4.0]]);
    let delta = array![[0.1, 0.2], [-0.3, 0.4]];
    weights.scale(0.1, 0.3);
    weights.update(0.1, delta.view(), 5).unwrap();

    weights.finalize(delta.view());
    let before = weights.to_weights();
    weights.scale(0.1, 0.0);
    weights.finalize(delta.view());

    assert_eq!(weights.weights(), before);
}

#[rstest]
fn invalid_arguments_are_rejected(
    #[values(WeightVectorKind::Naive, WeightVectorKind::Scaled)] kind: WeightVectorKind,
) {
    let init = array![[1.0, 2.0], [3.0, 4.0]];
    let mut weights = build(kind, init.clone());

    let wrong = Array2::<f64>::ones((1, 2));
    assert_eq!(
        weights.update(0.1, wrong.view(), 1),
        Err(WeightError::ShapeMismatch {
            expected: (2, 2),
            actual: (1, 2)
        })
    );
    assert_eq!(
        weights.update(0.1, Array2::ones((2, 2)).view(), 0),
        Err(WeightError::ZeroCovered)
    );
    assert!(matches!(
        weights.predict(FeatureRow::dense(&[1.0, 2.0, 3.0])),
        Err(WeightError::RowLengthMismatch { expected: 2, actual: 3 })
    ));

    assert_eq!(weights.weights(), init);
}

#[rstest]
fn sparse_row_from_wider_space_is_rejected(
    #[values(WeightVectorKind::Naive, WeightVectorKind::Scaled)] kind: WeightVectorKind,
) {
    let weights = build(kind, array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    let wide = SparseRow::new(10, &[7], &[1.0]).unwrap();

    assert_eq!(
        weights.predict(wide.into()),
        Err(WeightError::RowLengthMismatch {
            expected: 3,
            actual: 10
        })
    );
}

#[rstest]
fn predict_into_checks_both_shapes(
    #[values(WeightVectorKind::Naive, WeightVectorKind::Scaled)] kind: WeightVectorKind,
) {
    let mut weights = build(kind, array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]);
    weights.scale(0.5, 1.0);
    let row = FeatureRow::dense(&[1.0, 1.0]);

    let mut short = Array1::<f64>::zeros(2);
    assert_eq!(
        weights.predict_into(row, short.view_mut()),
        Err(WeightError::OutputLengthMismatch {
            expected: 3,
            actual: 2
        })
    );
    assert_eq!(short, array![0.0, 0.0]);

    let mut out = Array1::<f64>::zeros(3);
    assert_eq!(
        weights.predict_into(FeatureRow::dense(&[1.0, 1.0, 1.0]), out.view_mut()),
        Err(WeightError::RowLengthMismatch {
            expected: 2,
            actual: 3
        })
    );

    weights.predict_into(row, out.view_mut()).unwrap();
    assert_abs_diff_eq!(out, array![1.5, 3.5, 5.5], epsilon = 1e-12);
}

#[rstest]
fn into_weights_returns_true_weights(
    #[values(WeightVectorKind::Naive, WeightVectorKind::Scaled)] kind: WeightVectorKind,
) {
    let mut weights = build(kind, array![[2.0, -4.0]]);
    weights.scale(0.5, 1.0);
    weights.scale(0.5, 1.0);
    assert_eq!(weights.into_weights(), array![[0.5, -1.0]]);
}
