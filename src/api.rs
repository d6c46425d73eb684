//! High-level API for cross-validating least-squares meta-models.
//!
//! ## Purpose
//!
//! This module provides the primary user-facing entry point for validation.
//! It implements a fluent builder for choosing a strategy and its options,
//! and a runner that applies the strategy to a least-squares method.
//!
//! ## Design notes
//!
//! * **Ergonomic**: Fluent builder with sensible defaults for all parameters.
//! * **Validated**: Parameters are checked when `.build()` is called; data
//!   dependent checks (fold count against sample size) happen at `run`.
//! * **Type-Safe**: Generic over `Float` types for flexible precision.
//!
//! ## Key concepts
//!
//! ### Configuration Flow
//!
//! 1. Create a [`CrossValidationBuilder`] via `CrossValidation::new()`.
//! 2. Choose a strategy (`.kfold(k)`, `.leave_one_out()`, ...).
//! 3. Chain options (`.seed()`, `.fold_scheme()`, `.brute_force()`, ...).
//! 4. Call `.build()` and run the resulting [`CrossValidator`].

// External dependencies
use core::fmt::Debug;

// Internal dependencies
use crate::engine::executor::ValidationExecutor;
use crate::engine::validator::Validator;
use crate::evaluation::cv::{CVConfig, LooMode};

// Publicly re-exported types
pub use crate::algorithms::accumulator::{
    ComparisonOperator, ExtremaAccumulator, MomentAccumulator, StreamAccumulator,
    ThresholdExceedance,
};
pub use crate::algorithms::design::{BasisFunction, DesignProxy};
pub use crate::algorithms::least_squares::{
    predict_row, DenseLeastSquares, Factorization, LeastSquaresMethod,
};
pub use crate::engine::executor::ValidationPhase;
pub use crate::evaluation::cv::{CVKind, CustomValidation, ValidationMethod};
pub use crate::evaluation::metrics::ValidationResult;
pub use crate::math::linalg::{Decomposition, Factors, FloatLinalg};
pub use crate::math::moments::CentralSums;
pub use crate::primitives::errors::UqError;
pub use crate::primitives::history::{CompactHistory, HistoryStrategy};
pub use crate::primitives::partition::{FoldPartition, FoldScheme, IndexDelta};
pub use crate::primitives::sample::Sample;

/// Fluent builder for configuring a cross-validation run.
#[derive(Debug, Clone)]
pub struct CrossValidationBuilder<T> {
    /// Validation strategy.
    pub kind: Option<CVKind<T>>,

    /// Fold assignment scheme (K-Fold only).
    pub fold_scheme: Option<FoldScheme>,

    /// Shuffle seed (K-Fold only).
    pub seed: Option<u64>,

    /// Refit every leave-one-out fold instead of using leverages.
    pub brute_force: Option<bool>,

    /// Factorization used by `fit`.
    pub decomposition: Option<Decomposition>,

    /// Keep per-observation residuals in the result.
    pub return_residuals: Option<bool>,

    /// Tracks if any parameter was set multiple times (for validation).
    #[doc(hidden)]
    pub duplicate_param: Option<&'static str>,
}

impl<T: FloatLinalg> Default for CrossValidationBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FloatLinalg> CrossValidationBuilder<T> {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            kind: None,
            fold_scheme: None,
            seed: None,
            brute_force: None,
            decomposition: None,
            return_residuals: None,
            duplicate_param: None,
        }
    }

    fn set_kind(mut self, kind: CVKind<T>) -> Self {
        if self.kind.is_some() {
            self.duplicate_param = Some("method");
        }
        self.kind = Some(kind);
        self
    }

    /// K-fold cross-validation with `k` folds.
    pub fn kfold(self, k: usize) -> Self {
        self.set_kind(CVKind::KFold(k))
    }

    /// Leave-one-out cross-validation (the default).
    pub fn leave_one_out(self) -> Self {
        self.set_kind(CVKind::LeaveOneOut)
    }

    /// Leave-one-out scaled by `N / (N - P) * (1 + tr((XᵀX)⁻¹))`.
    pub fn corrected_leave_one_out(self) -> Self {
        self.set_kind(CVKind::CorrectedLeaveOneOut)
    }

    /// Validation delegated to a caller function returning a mean squared error.
    pub fn custom(self, validation: CustomValidation<T>) -> Self {
        self.set_kind(CVKind::Custom(validation))
    }

    /// Set how observations are assigned to folds.
    pub fn fold_scheme(mut self, scheme: FoldScheme) -> Self {
        if self.fold_scheme.is_some() {
            self.duplicate_param = Some("fold_scheme");
        }
        self.fold_scheme = Some(scheme);
        self
    }

    /// Shuffle observations with `seed` before assigning folds.
    ///
    /// Leave-one-out is deterministic and ignores the seed.
    pub fn seed(mut self, seed: u64) -> Self {
        if self.seed.is_some() {
            self.duplicate_param = Some("seed");
        }
        self.seed = Some(seed);
        self
    }

    /// Refit every leave-one-out fold even when leverages are available.
    pub fn brute_force(mut self) -> Self {
        if self.brute_force.is_some() {
            self.duplicate_param = Some("brute_force");
        }
        self.brute_force = Some(true);
        self
    }

    /// Set the factorization used by [`CrossValidator::fit`].
    pub fn decomposition(mut self, decomposition: Decomposition) -> Self {
        if self.decomposition.is_some() {
            self.duplicate_param = Some("decomposition");
        }
        self.decomposition = Some(decomposition);
        self
    }

    /// Keep the held-out residuals in the result.
    pub fn return_residuals(mut self) -> Self {
        if self.return_residuals.is_some() {
            self.duplicate_param = Some("return_residuals");
        }
        self.return_residuals = Some(true);
        self
    }

    /// Validate the configuration and build a runner.
    pub fn build(self) -> Result<CrossValidator<T>, UqError> {
        Validator::validate_no_duplicates(self.duplicate_param)?;

        let kind = self.kind.unwrap_or_default();
        if let CVKind::KFold(k) = kind {
            Validator::validate_min_fold_count(k)?;
        }

        let config = CVConfig {
            kind,
            scheme: self.fold_scheme.unwrap_or_default(),
            seed: self.seed,
            loo_mode: if self.brute_force.unwrap_or(false) {
                LooMode::BruteForce
            } else {
                LooMode::Analytical
            },
            return_residuals: self.return_residuals.unwrap_or(false),
        };

        Ok(CrossValidator {
            executor: ValidationExecutor::new(config),
            decomposition: self.decomposition.unwrap_or_default(),
        })
    }
}

/// Entry point for building a cross-validation run.
pub struct CrossValidation;

impl CrossValidation {
    /// Start configuring a run.
    #[allow(clippy::new_ret_no_self)]
    pub fn new<T: FloatLinalg>() -> CrossValidationBuilder<T> {
        CrossValidationBuilder::new()
    }
}

// ============================================================================
// Runner
// ============================================================================

/// A validated cross-validation configuration, ready to run.
#[derive(Debug, Clone)]
pub struct CrossValidator<T> {
    executor: ValidationExecutor<T>,
    decomposition: Decomposition,
}

impl<T: FloatLinalg + Debug> CrossValidator<T> {
    /// Validate `method` against observations `y`.
    ///
    /// The method's row filter is the same before and after the call.
    pub fn run<M>(&mut self, method: &mut M, y: &[T]) -> Result<ValidationResult<T>, UqError>
    where
        M: LeastSquaresMethod<T> + ?Sized,
    {
        self.executor.run(method, y)
    }

    /// Validate a dense least-squares fit of `design` against `y`.
    pub fn fit(&mut self, design: &Sample<T>, y: &[T]) -> Result<ValidationResult<T>, UqError> {
        Validator::validate_design(design.as_slice())?;
        let mut method = DenseLeastSquares::new(design.clone(), self.decomposition)?;
        self.executor.run(&mut method, y)
    }

    /// Phase reached by the last run.
    pub fn phase(&self) -> ValidationPhase {
        self.executor.phase()
    }

    /// Strategy label.
    pub fn method(&self) -> ValidationMethod {
        self.executor.config().kind.method()
    }

    /// Factorization used by `fit`.
    pub fn decomposition(&self) -> Decomposition {
        self.decomposition
    }
}
