//! Execution engine for cross-validation runs.
//!
//! ## Purpose
//!
//! This module drives a least-squares method through the folds of a
//! validation strategy and aggregates the held-out error. It owns the fold
//! loop, the leave-one-out shortcut, the corrected leave-one-out factor and
//! the scratch buffers reused across folds.
//!
//! ## Design notes
//!
//! * **Scoped training views**: Every run works through a `RowFilterGuard`,
//!   so the method's filter is restored on all exit paths.
//! * **Incremental filters**: Consecutive training sets are passed to the
//!   method as `(added, conserved, removed)` deltas.
//! * **Immutable held-out rows**: Predictions read rows of the full design,
//!   never the filtered view.
//! * **Phase tracking**: The executor records the phase it reached; the last
//!   phase of a failed run stays queryable.
//!
//! ## Key concepts
//!
//! * **Fold weighting**: `mse = Σ squared residual / Σ held-out count`.
//! * **Leave-one-out shortcut**: `r_i = (y_i - ŷ_i) / (1 - h_ii)` from one fit.
//!
//! ## Invariants
//!
//! * The method's row filter is unchanged after `run` returns.
//! * Fold errors are reported as `FoldFailed` with the failing fold index.
//!
//! ## Non-goals
//!
//! * This module does not validate builder parameters (handled by `validator`).

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::{format, vec::Vec};
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use log::{debug, trace, warn};

// Internal dependencies
use crate::algorithms::least_squares::{predict_row, LeastSquaresMethod};
use crate::engine::guard::RowFilterGuard;
use crate::engine::validator::Validator;
use crate::evaluation::cv::{gather, loo_correction_factor, CVConfig, CVKind, LooMode};
use crate::evaluation::metrics::{mean_squared_error, relative_error, r2_score, ValidationResult};
use crate::math::hat_matrix::HatMatrixStats;
use crate::math::linalg::FloatLinalg;
use crate::math::moments::sample_variance;
use crate::primitives::buffer::ValidationBuffer;
use crate::primitives::errors::UqError;
use crate::primitives::partition::{FoldPartition, IndexDelta};

// ============================================================================
// Validation Phase
// ============================================================================

/// Progress of a validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationPhase {
    /// No run started.
    #[default]
    Idle,

    /// Fold boundaries computed.
    PartitionReady,

    /// The method's row filter selects the current training rows.
    TrainingViewActive,

    /// Coefficients of the current fold are available.
    Solved,

    /// Held-out residuals of the current fold were accumulated.
    ResidualAccumulated,

    /// Aggregated metrics computed.
    Finalized,
}

// ============================================================================
// Fold Totals
// ============================================================================

/// Per-fold sums gathered by a run before finalization.
#[derive(Debug, Clone, Default)]
struct FoldTotals<T> {
    sizes: Vec<usize>,
    squared_residuals: Vec<T>,
    never_held_out: Vec<usize>,
    analytical: bool,
}

fn fold_failed(fold: usize, e: UqError) -> UqError {
    UqError::FoldFailed {
        fold,
        reason: format!("{}", e),
    }
}

// ============================================================================
// Executor
// ============================================================================

/// Runs one validation strategy against least-squares methods.
#[derive(Debug, Clone)]
pub struct ValidationExecutor<T> {
    config: CVConfig<T>,
    phase: ValidationPhase,
    buffer: ValidationBuffer<T>,
}

impl<T: FloatLinalg> ValidationExecutor<T> {
    /// Create an executor for `config`.
    pub fn new(config: CVConfig<T>) -> Self {
        Self {
            config,
            phase: ValidationPhase::Idle,
            buffer: ValidationBuffer::new(0),
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &CVConfig<T> {
        &self.config
    }

    /// Last phase reached.
    pub fn phase(&self) -> ValidationPhase {
        self.phase
    }

    fn transition(&mut self, next: ValidationPhase) {
        trace!("validation phase {:?} -> {:?}", self.phase, next);
        self.phase = next;
    }

    /// Validate `method` against observations `y` (one per design row).
    pub fn run<M>(&mut self, method: &mut M, y: &[T]) -> Result<ValidationResult<T>, UqError>
    where
        M: LeastSquaresMethod<T> + ?Sized,
    {
        self.phase = ValidationPhase::Idle;
        let n = method.design().size();
        Validator::validate_observations(n, y)?;

        let variance = sample_variance(y);
        if variance <= T::zero() {
            warn!("target has zero variance; relative error reported as 0");
        }

        self.buffer.clear();
        self.buffer.ensure_capacity(n);

        let (totals, correction) = match self.config.kind {
            CVKind::Custom(f) => {
                let mse = f(method.design(), y)?;
                self.transition(ValidationPhase::Finalized);
                debug!("custom validation: mse = {:?}", mse);
                return Ok(ValidationResult::from_mse(
                    self.config.kind.method(),
                    mse,
                    variance,
                    n,
                ));
            }
            CVKind::KFold(k) => {
                Validator::validate_fold_count(k, n)?;
                let partition = self.fold_partition(n)?;
                (self.run_folds(method, y, &partition)?, None)
            }
            CVKind::LeaveOneOut | CVKind::CorrectedLeaveOneOut => {
                Validator::validate_leave_one_out(n)?;
                let totals = self.run_leave_one_out(method, y)?;
                let correction = if let CVKind::CorrectedLeaveOneOut = self.config.kind {
                    Some(self.correction_factor(method, n)?)
                } else {
                    None
                };
                (totals, correction)
            }
        };

        Ok(self.finalize(totals, correction, variance, n))
    }

    // ========================================================================
    // Fold Loop
    // ========================================================================

    fn fold_partition(&self, n: usize) -> Result<FoldPartition, UqError> {
        self.config.partition(n)?.ok_or_else(|| {
            UqError::InternalError("custom strategies have no fold partition".into())
        })
    }

    fn run_folds<M>(
        &mut self,
        method: &mut M,
        y: &[T],
        partition: &FoldPartition,
    ) -> Result<FoldTotals<T>, UqError>
    where
        M: LeastSquaresMethod<T> + ?Sized,
    {
        self.transition(ValidationPhase::PartitionReady);
        let k = partition.fold_count();
        let keep = self.config.return_residuals;
        let mut totals = FoldTotals {
            sizes: Vec::with_capacity(k),
            squared_residuals: Vec::with_capacity(k),
            never_held_out: partition.never_held_out(),
            analytical: false,
        };
        if !totals.never_held_out.is_empty() {
            debug!(
                "{} observations are never held out with {} folds",
                totals.never_held_out.len(),
                k
            );
        }

        let mut guard = RowFilterGuard::new(method);
        let mut current: Option<Vec<usize>> = None;

        for fold in 0..k {
            let train = partition.train_indices(fold);
            let moved = match &current {
                None => guard.set_row_filter(&train),
                Some(previous) => {
                    let delta = IndexDelta::between(previous, &train);
                    trace!(
                        "fold {}: {} added, {} conserved, {} removed",
                        fold,
                        delta.added.len(),
                        delta.conserved.len(),
                        delta.removed.len()
                    );
                    guard.update(&delta.added, &delta.conserved, &delta.removed)
                }
            };
            moved.map_err(|e| fold_failed(fold, e))?;
            self.transition(ValidationPhase::TrainingViewActive);

            gather(y, &train, &mut self.buffer.train_y);
            let coefficients = guard
                .solve(&self.buffer.train_y)
                .map_err(|e| fold_failed(fold, e))?;
            self.transition(ValidationPhase::Solved);

            let test = partition.test_indices(fold);
            let design = guard.design();
            let mut squared = T::zero();
            for &i in test {
                let residual = y[i] - predict_row(design.row(i), &coefficients);
                squared = squared + residual * residual;
                if keep {
                    self.buffer.residuals.push(residual);
                    self.buffer.residual_indices.push(i);
                }
            }
            totals.sizes.push(test.len());
            totals.squared_residuals.push(squared);
            self.transition(ValidationPhase::ResidualAccumulated);
            debug!(
                "fold {}/{}: {} held out, squared error {:?}",
                fold + 1,
                k,
                test.len(),
                squared
            );

            current = Some(train);
        }

        Ok(totals)
    }

    // ========================================================================
    // Leave-One-Out
    // ========================================================================

    fn run_leave_one_out<M>(&mut self, method: &mut M, y: &[T]) -> Result<FoldTotals<T>, UqError>
    where
        M: LeastSquaresMethod<T> + ?Sized,
    {
        if self.config.loo_mode == LooMode::Analytical {
            if let Some(totals) = self.run_loo_analytical(method, y)? {
                return Ok(totals);
            }
            debug!("method exposes no leverages, refitting each observation");
        }
        let partition = self.fold_partition(y.len())?;
        self.run_folds(method, y, &partition)
    }

    fn run_loo_analytical<M>(
        &mut self,
        method: &mut M,
        y: &[T],
    ) -> Result<Option<FoldTotals<T>>, UqError>
    where
        M: LeastSquaresMethod<T> + ?Sized,
    {
        let n = y.len();
        self.transition(ValidationPhase::PartitionReady);
        let mut guard = RowFilterGuard::new(method);
        let all: Vec<usize> = (0..n).collect();
        guard.set_row_filter(&all)?;
        self.transition(ValidationPhase::TrainingViewActive);

        let leverage = match guard.h_diag()? {
            Some(h) => h,
            None => return Ok(None),
        };
        let coefficients = guard.solve(y)?;
        self.transition(ValidationPhase::Solved);

        let design = guard.design();
        self.buffer.predictions.clear();
        self.buffer
            .predictions
            .extend(design.rows().map(|row| predict_row(row, &coefficients)));

        let stats = HatMatrixStats::from_leverage(leverage);
        let residuals = stats.loo_residuals(y, &self.buffer.predictions)?;
        debug!(
            "leave-one-out shortcut: trace(H) = {:?}, max leverage {:?}",
            stats.trace,
            stats.max_leverage()
        );

        let mut totals = FoldTotals {
            sizes: Vec::with_capacity(n),
            squared_residuals: Vec::with_capacity(n),
            never_held_out: Vec::new(),
            analytical: true,
        };
        for (i, &r) in residuals.iter().enumerate() {
            totals.sizes.push(1);
            totals.squared_residuals.push(r * r);
            if self.config.return_residuals {
                self.buffer.residuals.push(r);
                self.buffer.residual_indices.push(i);
            }
        }
        self.transition(ValidationPhase::ResidualAccumulated);
        Ok(Some(totals))
    }

    fn correction_factor<M>(&mut self, method: &mut M, n: usize) -> Result<T, UqError>
    where
        M: LeastSquaresMethod<T> + ?Sized,
    {
        let mut guard = RowFilterGuard::new(method);
        let all: Vec<usize> = (0..n).collect();
        guard.set_row_filter(&all)?;
        let diagonal = guard.gram_inverse_diag()?.ok_or_else(|| {
            UqError::InvalidArgument(
                "corrected leave-one-out needs the diagonal of the inverse Gram matrix".into(),
            )
        })?;
        let factor = loo_correction_factor(n, guard.basis_size(), &diagonal)?;
        debug!("corrected leave-one-out factor {:?}", factor);
        Ok(factor)
    }

    // ========================================================================
    // Finalization
    // ========================================================================

    fn finalize(
        &mut self,
        totals: FoldTotals<T>,
        correction: Option<T>,
        variance: T,
        n: usize,
    ) -> ValidationResult<T> {
        let held_out: usize = totals.sizes.iter().sum();
        let sum = totals
            .squared_residuals
            .iter()
            .fold(T::zero(), |acc, &s| acc + s);
        let mut mse = mean_squared_error(sum, held_out);
        if let Some(factor) = correction {
            mse = mse * factor;
        }
        self.transition(ValidationPhase::Finalized);
        debug!(
            "{}: {} folds, {} held out, mse = {:?}",
            self.config.kind.method(),
            totals.sizes.len(),
            held_out,
            mse
        );

        let keep = self.config.return_residuals;
        ValidationResult {
            method: self.config.kind.method(),
            mse,
            relative_error: relative_error(mse, variance),
            r2_score: r2_score(mse, variance),
            target_variance: variance,
            sample_size: n,
            fold_sizes: totals.sizes,
            fold_squared_residuals: totals.squared_residuals,
            never_held_out: totals.never_held_out,
            correction_factor: correction,
            analytical: totals.analytical,
            residuals: keep.then(|| self.buffer.residuals.to_vec()),
            residual_indices: keep.then(|| self.buffer.residual_indices.to_vec()),
        }
    }
}
