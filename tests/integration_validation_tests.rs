#![cfg(feature = "dev")]
//! End-to-end tests for cross-validation through the public builder.
//!
//! These tests compare the engine against direct refits:
//! - Leave-one-out shortcut vs refitting, for every decomposition
//! - K-Fold vs a naive loop over reduced designs
//! - Fold weighting with an uneven split
//! - Corrected leave-one-out, custom strategies, residual reporting
//!
//! ## Test Organization
//!
//! 1. **Leave-One-Out**
//! 2. **K-Fold**
//! 3. **Metrics Consistency**
//! 4. **Other Strategies**

use approx::assert_relative_eq;
use rand::prelude::*;
use rand_distr::Normal;

use uqstat::internals::algorithms::least_squares::{
    predict_row, DenseLeastSquares, LeastSquaresMethod,
};
use uqstat::internals::api::{CrossValidation, ValidationMethod};
use uqstat::internals::math::linalg::Decomposition;
use uqstat::internals::primitives::errors::UqError;
use uqstat::internals::primitives::partition::{FoldPartition, FoldScheme};
use uqstat::internals::primitives::sample::Sample;

const DECOMPOSITIONS: [Decomposition; 3] = [
    Decomposition::Qr,
    Decomposition::Svd,
    Decomposition::Cholesky,
];

/// `y = 3 - 2 x1 + x2 + noise` on uniform inputs, design `[1, x1, x2]`.
fn plane_scenario(n: usize, seed: u64) -> (Sample<f64>, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 0.1).unwrap();
    let mut design = Sample::with_capacity(3, n);
    let mut y = Vec::with_capacity(n);
    for _ in 0..n {
        let x1: f64 = rng.random_range(-1.0..1.0);
        let x2: f64 = rng.random_range(-1.0..1.0);
        design.push(&[1.0, x1, x2]).unwrap();
        y.push(3.0 - 2.0 * x1 + x2 + noise.sample(&mut rng));
    }
    (design, y)
}

/// Held-out MSE by refitting a fresh solver on every training set.
fn naive_mse(design: &Sample<f64>, y: &[f64], partition: &FoldPartition) -> f64 {
    let mut sum = 0.0;
    for fold in 0..partition.fold_count() {
        let train = partition.train_indices(fold);
        let train_y: Vec<f64> = train.iter().map(|&i| y[i]).collect();
        let mut method =
            DenseLeastSquares::new(design.select(&train).unwrap(), Decomposition::Qr).unwrap();
        let c = method.solve(&train_y).unwrap();
        for &i in partition.test_indices(fold) {
            let r = y[i] - predict_row(design.row(i), &c);
            sum += r * r;
        }
    }
    sum / partition.total_held_out() as f64
}

// ============================================================================
// Leave-One-Out Tests
// ============================================================================

/// Test the leverage shortcut matches refitting every observation.
#[test]
fn test_loo_shortcut_matches_refit() {
    let (design, y) = plane_scenario(40, 42);
    let expected = naive_mse(&design, &y, &FoldPartition::leave_one_out(40));

    for decomposition in DECOMPOSITIONS {
        let shortcut = CrossValidation::new()
            .leave_one_out()
            .decomposition(decomposition)
            .build()
            .unwrap()
            .fit(&design, &y)
            .unwrap();
        let refit = CrossValidation::new()
            .leave_one_out()
            .brute_force()
            .decomposition(decomposition)
            .build()
            .unwrap()
            .fit(&design, &y)
            .unwrap();

        assert!(shortcut.analytical);
        assert!(!refit.analytical);
        assert_eq!(shortcut.fold_count(), 40);
        assert_eq!(refit.fold_count(), 40);
        assert_relative_eq!(shortcut.mse, refit.mse, max_relative = 1e-7);
        assert_relative_eq!(shortcut.mse, expected, max_relative = 1e-7);
    }
}

/// Test the plane scenario recovers the noise level.
#[test]
fn test_plane_scenario() {
    let (design, y) = plane_scenario(200, 7);
    let result = CrossValidation::new()
        .leave_one_out()
        .build()
        .unwrap()
        .fit(&design, &y)
        .unwrap();

    assert_eq!(result.method, ValidationMethod::LeaveOneOut);
    assert_eq!(result.sample_size, 200);
    assert!(result.mse > 0.005 && result.mse < 0.02, "mse = {}", result.mse);
    assert!(result.r2_score > 0.99);
    assert!(result.never_held_out.is_empty());
}

/// Test a design whose only row with a given feature has unit leverage.
#[test]
fn test_loo_unit_leverage() {
    let rows = [[1.0, 0.0], [1.0, 0.0], [1.0, 0.0], [1.0, 1.0]];
    let design = Sample::from_rows(&rows).unwrap();
    let y = [1.0, 2.0, 3.0, 4.0];
    let err = CrossValidation::new()
        .leave_one_out()
        .build()
        .unwrap()
        .fit(&design, &y)
        .unwrap_err();
    assert!(matches!(err, UqError::SingularSystem(_)));
}

// ============================================================================
// K-Fold Tests
// ============================================================================

/// Test K-Fold matches a naive loop for every scheme and decomposition.
#[test]
fn test_kfold_matches_naive() {
    let (design, y) = plane_scenario(37, 3);
    for scheme in [FoldScheme::Interleaved, FoldScheme::Balanced] {
        for seed in [None, Some(11)] {
            let partition = FoldPartition::new(37, 5, scheme, seed).unwrap();
            let expected = naive_mse(&design, &y, &partition);

            for decomposition in DECOMPOSITIONS {
                let mut builder = CrossValidation::new()
                    .kfold(5)
                    .fold_scheme(scheme)
                    .decomposition(decomposition);
                if let Some(s) = seed {
                    builder = builder.seed(s);
                }
                let result = builder.build().unwrap().fit(&design, &y).unwrap();
                assert_relative_eq!(result.mse, expected, max_relative = 1e-8);
                assert_eq!(result.fold_sizes, partition.held_out_counts());
            }
        }
    }
}

/// Test fold weighting for N = 13, K = 4: twelve evaluations, index 12 unused.
#[test]
fn test_kfold_uneven_weighting() {
    let (design, y) = plane_scenario(13, 5);
    let result = CrossValidation::new()
        .kfold(4)
        .return_residuals()
        .build()
        .unwrap()
        .fit(&design, &y)
        .unwrap();

    assert_eq!(result.fold_sizes, vec![3, 3, 3, 3]);
    assert_eq!(result.never_held_out, vec![12]);
    assert_eq!(result.total_held_out(), 12);

    let sum: f64 = result.fold_squared_residuals.iter().sum();
    assert_relative_eq!(result.mse, sum / 12.0, max_relative = 1e-14);

    let indices = result.residual_indices.as_ref().unwrap();
    assert_eq!(indices.len(), 12);
    assert!(!indices.contains(&12));
    let residuals = result.residuals.as_ref().unwrap();
    let from_residuals: f64 = residuals.iter().map(|r| r * r).sum::<f64>() / 12.0;
    assert_relative_eq!(result.mse, from_residuals, max_relative = 1e-12);
}

/// Test the N = 13, K = 4 plane against brute-force refits.
#[test]
fn test_plane_scenario_13_4() {
    let (design, y) = plane_scenario(13, 21);
    let partition = FoldPartition::new(13, 4, FoldScheme::Interleaved, None).unwrap();
    let expected_kfold = naive_mse(&design, &y, &partition);
    let expected_loo = naive_mse(&design, &y, &FoldPartition::leave_one_out(13));

    for decomposition in DECOMPOSITIONS {
        let kfold = CrossValidation::new()
            .kfold(4)
            .decomposition(decomposition)
            .build()
            .unwrap()
            .fit(&design, &y)
            .unwrap();
        assert_relative_eq!(kfold.mse, expected_kfold, max_relative = 1e-7);

        let shortcut = CrossValidation::new()
            .leave_one_out()
            .decomposition(decomposition)
            .build()
            .unwrap()
            .fit(&design, &y)
            .unwrap();
        let refit = CrossValidation::new()
            .leave_one_out()
            .brute_force()
            .decomposition(decomposition)
            .build()
            .unwrap()
            .fit(&design, &y)
            .unwrap();
        assert!(shortcut.analytical);
        assert_relative_eq!(shortcut.mse, refit.mse, max_relative = 1e-12);
        assert_relative_eq!(shortcut.mse, expected_loo, max_relative = 1e-12);
    }
}

/// Test balanced folds for N = 13, K = 4 weight by held-out count.
#[test]
fn test_kfold_balanced_weighting() {
    let (design, y) = plane_scenario(13, 5);
    let result = CrossValidation::new()
        .kfold(4)
        .fold_scheme(FoldScheme::Balanced)
        .build()
        .unwrap()
        .fit(&design, &y)
        .unwrap();

    assert_eq!(result.fold_sizes, vec![4, 3, 3, 3]);
    assert!(result.never_held_out.is_empty());
    assert_eq!(result.total_held_out(), 13);

    // Weighted by fold size, not a mean of per-fold errors
    let sum: f64 = result.fold_squared_residuals.iter().sum();
    assert_relative_eq!(result.mse, sum / 13.0, max_relative = 1e-14);
    let weighted: f64 = (0..4)
        .map(|f| result.fold_sizes[f] as f64 * result.fold_mse(f).unwrap())
        .sum::<f64>()
        / 13.0;
    assert_relative_eq!(result.mse, weighted, max_relative = 1e-12);

    let partition = FoldPartition::new(13, 4, FoldScheme::Balanced, None).unwrap();
    assert_relative_eq!(
        result.mse,
        naive_mse(&design, &y, &partition),
        max_relative = 1e-7
    );
}

/// Test a caller's method keeps its filter across a K-Fold run.
#[test]
fn test_kfold_restores_caller_filter() {
    let (design, y) = plane_scenario(20, 9);
    let mut method = DenseLeastSquares::new(design, Decomposition::Cholesky).unwrap();
    method.set_row_filter(&[2, 4, 6, 8]).unwrap();

    let mut cv = CrossValidation::new().kfold(5).build().unwrap();
    cv.run(&mut method, &y).unwrap();
    assert_eq!(method.row_filter(), &[2, 4, 6, 8]);
}

// ============================================================================
// Metrics Consistency Tests
// ============================================================================

/// Test R² and relative error are complementary.
#[test]
fn test_r2_matches_relative_error() {
    let (design, y) = plane_scenario(30, 1);
    for builder in [
        CrossValidation::new().leave_one_out(),
        CrossValidation::new().kfold(3),
        CrossValidation::new().corrected_leave_one_out(),
    ] {
        let result = builder.build().unwrap().fit(&design, &y).unwrap();
        assert_relative_eq!(result.r2_score, 1.0 - result.relative_error, epsilon = 1e-14);
        assert!(result.target_variance > 0.0);
    }
}

/// Test a constant target reports zero relative error.
#[test]
fn test_constant_target() {
    let rows: Vec<[f64; 2]> = (0..8).map(|i| [1.0, i as f64]).collect();
    let design = Sample::from_rows(&rows).unwrap();
    let y = vec![2.5; 8];
    let result = CrossValidation::new()
        .kfold(4)
        .build()
        .unwrap()
        .fit(&design, &y)
        .unwrap();

    assert_eq!(result.target_variance, 0.0);
    assert_eq!(result.relative_error, 0.0);
    assert!(result.mse < 1e-20);
}

// ============================================================================
// Other Strategy Tests
// ============================================================================

/// Test the corrected leave-one-out factor against a closed form.
#[test]
fn test_corrected_loo() {
    // Columns [1, t] with t = -2..=2: XᵀX = diag(5, 10)
    let rows: Vec<[f64; 2]> = (-2..=2).map(|t| [1.0, t as f64]).collect();
    let design = Sample::from_rows(&rows).unwrap();
    let y = [0.1, 1.2, 1.9, 3.2, 3.9];

    let plain = CrossValidation::new()
        .leave_one_out()
        .build()
        .unwrap()
        .fit(&design, &y)
        .unwrap();
    let corrected = CrossValidation::new()
        .corrected_leave_one_out()
        .build()
        .unwrap()
        .fit(&design, &y)
        .unwrap();

    let factor = 5.0 / 3.0 * (1.0 + 1.0 / 5.0 + 1.0 / 10.0);
    assert_eq!(corrected.method, ValidationMethod::CorrectedLeaveOneOut);
    assert_relative_eq!(corrected.correction_factor.unwrap(), factor, epsilon = 1e-12);
    assert_relative_eq!(corrected.mse, plain.mse * factor, max_relative = 1e-12);
    assert!(plain.correction_factor.is_none());
}

/// Test corrected leave-one-out needs more observations than basis functions.
#[test]
fn test_corrected_loo_too_small() {
    let design = Sample::from_rows(&[[1.0, 0.0], [1.0, 1.0]]).unwrap();
    let result = CrossValidation::new()
        .corrected_leave_one_out()
        .brute_force()
        .build()
        .unwrap()
        .fit(&design, &[1.0, 2.0]);
    assert!(result.is_err());
}

fn constant_mse(design: &Sample<f64>, y: &[f64]) -> Result<f64, UqError> {
    if design.size() != y.len() {
        return Err(UqError::MismatchedInputs {
            design_rows: design.size(),
            observations: y.len(),
        });
    }
    Ok(0.125)
}

/// Test a custom strategy supplies the error directly.
#[test]
fn test_custom_strategy() {
    let (design, y) = plane_scenario(10, 2);
    let mut cv = CrossValidation::new().custom(constant_mse).build().unwrap();
    let result = cv.fit(&design, &y).unwrap();

    assert_eq!(cv.method(), ValidationMethod::Custom);
    assert_eq!(result.method, ValidationMethod::Custom);
    assert_eq!(result.mse, 0.125);
    assert!(result.fold_sizes.is_empty());
    assert_relative_eq!(
        result.relative_error,
        0.125 / result.target_variance,
        max_relative = 1e-14
    );
}

/// Test leave-one-out residuals are reported per observation.
#[test]
fn test_loo_residuals() {
    let (design, y) = plane_scenario(15, 4);
    let result = CrossValidation::new()
        .leave_one_out()
        .return_residuals()
        .build()
        .unwrap()
        .fit(&design, &y)
        .unwrap();

    let indices = result.residual_indices.unwrap();
    assert_eq!(indices, (0..15).collect::<Vec<_>>());
    let residuals = result.residuals.unwrap();
    let mse = residuals.iter().map(|r| r * r).sum::<f64>() / 15.0;
    assert_relative_eq!(mse, result.mse, max_relative = 1e-12);
}
