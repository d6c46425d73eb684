//! # uqstat: Streaming moments and least-squares cross-validation for Rust
//!
//! The numerical core of an uncertainty quantification workflow: summarize
//! Monte Carlo output on the fly, and measure how well a linear least-squares
//! meta-model generalizes.
//!
//! ## What is in the box?
//!
//! **Streaming statistics**
//! - Running mean, unbiased variance, adjusted skewness and unbiased kurtosis
//!   of vector streams, fed point by point or in batches
//! - Running extrema and threshold exceedance counts
//! - Bounded point histories, including a logarithmically thinned reservoir
//!
//! **Cross-validation of least-squares meta-models**
//! - K-Fold with interleaved or balanced fold assignment
//! - Leave-One-Out through the hat-matrix shortcut
//!   `r_i = (y_i - ŷ_i) / (1 - h_ii)`, or by refitting
//! - Corrected Leave-One-Out for small samples
//! - QR, SVD and Cholesky solvers; Cholesky folds reuse the Gram matrix
//!   through rank-one updates
//!
//! ## Quick Start
//!
//! ### Validating a meta-model
//!
//! ```rust
//! use uqstat::prelude::*;
//!
//! // Design matrix: intercept and one regressor
//! let rows: Vec<[f64; 2]> = (0..10).map(|i| [1.0, i as f64]).collect();
//! let design = Sample::from_rows(&rows)?;
//!
//! // y = 1 + 2x with a small alternating perturbation
//! let y: Vec<f64> = (0..10)
//!     .map(|i| 1.0 + 2.0 * i as f64 + if i % 2 == 0 { 0.1 } else { -0.1 })
//!     .collect();
//!
//! let mut cv = CrossValidation::new().leave_one_out().build()?;
//! let result = cv.fit(&design, &y)?;
//!
//! assert!(result.mse > 0.0);
//! assert!(result.r2_score > 0.99);
//! println!("{}", result);
//! # Result::<(), UqError>::Ok(())
//! ```
//!
//! ```text
//! Summary:
//!   Method:          Leave-One-Out
//!   Observations:    10
//!   Folds:           10
//!   Held out:        10
//!
//! Errors:
//!   MSE:             ...
//!   Relative error:  ...
//!   R²:              ...
//! ```
//!
//! ### Streaming moments
//!
//! ```rust
//! use uqstat::prelude::*;
//!
//! let mut moments = MomentAccumulator::new(2);
//! moments.increment(&[1.0, 10.0])?;
//! moments.increment(&[2.0, 20.0])?;
//! moments.increment(&[3.0, 30.0])?;
//!
//! assert_eq!(moments.mean()?, vec![2.0, 20.0]);
//! assert_eq!(moments.variance()?, vec![1.0, 100.0]);
//!
//! // Skewness needs three points, kurtosis four
//! assert!(moments.kurtosis().is_err());
//! # Result::<(), UqError>::Ok(())
//! ```
//!
//! ## Builder
//!
//! | Method                       | Effect                                        | Default        |
//! |------------------------------|-----------------------------------------------|----------------|
//! | `.kfold(k)`                  | K-Fold cross-validation                       |                |
//! | `.leave_one_out()`           | Leave-One-Out                                 | ✓              |
//! | `.corrected_leave_one_out()` | Leave-One-Out times `N/(N-P)(1+tr((XᵀX)⁻¹))`  |                |
//! | `.custom(f)`                 | Delegate to `f(&design, &y) -> mse`           |                |
//! | `.fold_scheme(s)`            | `Interleaved` or `Balanced` folds             | `Interleaved`  |
//! | `.seed(s)`                   | Shuffle before fold assignment                | no shuffle     |
//! | `.brute_force()`             | Refit every LOO fold                          | shortcut       |
//! | `.decomposition(d)`          | `Qr`, `Svd` or `Cholesky` for `fit`           | `Qr`           |
//! | `.return_residuals()`        | Keep held-out residuals in the result         | off            |
//!
//! Setting a parameter twice is reported by `.build()` as
//! `UqError::DuplicateParameter`.
//!
//! ### Fold schemes
//!
//! `Interleaved` assigns position `j` to fold `j mod K` over the first
//! `K * (N / K)` positions; the `N mod K` trailing observations are only ever
//! used for training and are listed in `ValidationResult::never_held_out`.
//! `Balanced` tests every observation exactly once with fold sizes differing
//! by at most one.
//!
//! ## Bring your own solver
//!
//! `CrossValidator::run` accepts anything implementing `LeastSquaresMethod`.
//! The method's row filter is the same before and after the call, also when
//! a fold fails.
//!
//! ```rust
//! use uqstat::prelude::*;
//!
//! let rows: Vec<[f64; 2]> = (0..12).map(|i| [1.0, (i as f64).sin()]).collect();
//! let y: Vec<f64> = rows.iter().map(|r| 0.5 + 3.0 * r[1]).collect();
//!
//! let mut method = DenseLeastSquares::new(Sample::from_rows(&rows)?, Decomposition::Cholesky)?;
//! let mut cv = CrossValidation::new().kfold(4).build()?;
//! let result = cv.run(&mut method, &y)?;
//!
//! assert!(result.mse < 1e-12);
//! assert_eq!(method.row_filter().len(), 12);
//! # Result::<(), UqError>::Ok(())
//! ```
//!
//! ## Logging
//!
//! The crate logs through the `log` facade: run and fold summaries at
//! `debug`, phase transitions and index deltas at `trace`, degenerate targets
//! at `warn`. No logger is installed by the library.
//!
//! ## Minimal Usage (no_std)
//!
//! Disable default features to build on `alloc` only:
//!
//! ```toml
//! [dependencies]
//! uqstat = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]

#[cfg(not(feature = "std"))]
#[macro_use]
extern crate alloc;

// ============================================================================
// Internal Modules
// ============================================================================

// Layer 1: Primitives - data structures and basic utilities.
//
// Contains the error type, the `Sample` container, fold partitions,
// point histories and scratch buffers.
mod primitives;

// Layer 2: Math - pure mathematical functions.
//
// Contains the nalgebra factorization bridge, central moment formulas and
// hat matrix statistics.
mod math;

// Layer 3: Algorithms - stateful building blocks.
//
// Contains the streaming accumulators, the least-squares method abstraction
// and the basis function design proxy.
mod algorithms;

// Layer 4: Evaluation - validation strategies and metrics.
mod evaluation;

// Layer 5: Engine - orchestration and execution control.
//
// Contains the validator, the row-filter guard and the fold-loop executor.
mod engine;

// High-level fluent API for cross-validation.
//
// Provides the `CrossValidation` builder and the `CrossValidator` runner.
mod api;

// ============================================================================
// Prelude
// ============================================================================

/// Standard uqstat prelude.
///
/// This module is intended to be wildcard-imported for convenient access
/// to the most commonly used types:
///
/// ```
/// use uqstat::prelude::*;
/// ```
pub mod prelude {
    pub use crate::api::{
        CVKind, CentralSums, CompactHistory, ComparisonOperator, CrossValidation,
        CrossValidationBuilder, CrossValidator, Decomposition, DenseLeastSquares, DesignProxy,
        ExtremaAccumulator, FloatLinalg, FoldPartition, FoldScheme, HistoryStrategy,
        LeastSquaresMethod, MomentAccumulator, Sample, StreamAccumulator, ThresholdExceedance,
        UqError, ValidationMethod, ValidationPhase, ValidationResult,
    };
}

// ============================================================================
// Public API
// ============================================================================

pub use api::*;

// ============================================================================
// Internal API (dev feature)
// ============================================================================

/// Internal modules for development and testing.
///
/// This module is only available with the `dev` feature enabled.
#[cfg(feature = "dev")]
pub mod internals {
    /// Internal primitive types and utilities.
    pub mod primitives {
        pub use crate::primitives::*;
    }
    /// Internal math functions.
    pub mod math {
        pub use crate::math::*;
    }
    /// Internal core algorithms.
    pub mod algorithms {
        pub use crate::algorithms::*;
    }
    /// Internal execution engine.
    pub mod engine {
        pub use crate::engine::*;
    }
    /// Internal evaluation and metrics.
    pub mod evaluation {
        pub use crate::evaluation::*;
    }
    /// Internal API.
    pub mod api {
        pub use crate::api::*;
    }
}
