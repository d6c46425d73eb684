//! Validation results and error metrics.
//!
//! ## Purpose
//!
//! This module defines `ValidationResult`, the output of a cross-validation
//! run, and the scalar metrics derived from the aggregated held-out error.
//!
//! ## Key concepts
//!
//! * **MSE**: `Σ squared held-out residual / Σ held-out count`; each fold is
//!   weighted by its own size.
//! * **Relative error**: `mse / var(y)` with the unbiased sample variance of
//!   the whole target; 0 for a constant target.
//! * **R²**: `1 - mse / var(y)`, so `r2 == 1 - relative_error` whenever the
//!   target varies.
//!
//! ## Invariants
//!
//! * `fold_sizes.len() == fold_squared_residuals.len()`.
//! * `residuals` and `residual_indices`, when kept, have equal length.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// External dependencies
use core::fmt::{Display, Formatter, Result};
use num_traits::Float;

// Internal dependencies
use crate::evaluation::cv::ValidationMethod;

// ============================================================================
// Metrics
// ============================================================================

/// Mean squared error from a residual sum and an evaluation count.
#[inline]
pub fn mean_squared_error<T: Float>(sum_squares: T, count: usize) -> T {
    if count == 0 {
        return T::zero();
    }
    sum_squares / T::from(count).unwrap_or_else(T::one)
}

/// `mse / variance`; 0 when the target has no variance.
#[inline]
pub fn relative_error<T: Float>(mse: T, variance: T) -> T {
    if variance > T::zero() {
        mse / variance
    } else {
        T::zero()
    }
}

/// `1 - mse / variance`.
///
/// A constant target scores 1 when predicted exactly, `-inf` otherwise.
#[inline]
pub fn r2_score<T: Float>(mse: T, variance: T) -> T {
    if variance > T::zero() {
        T::one() - mse / variance
    } else if mse == T::zero() {
        T::one()
    } else {
        T::neg_infinity()
    }
}

// ============================================================================
// Validation Result
// ============================================================================

/// Outcome of a cross-validation run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ValidationResult<T> {
    /// Strategy that produced the result.
    pub method: ValidationMethod,

    /// Held-out mean squared error (corrected for corrected LOO).
    pub mse: T,

    /// Mean squared error divided by the target variance.
    pub relative_error: T,

    /// Coefficient of determination of the held-out predictions.
    pub r2_score: T,

    /// Unbiased sample variance of the target.
    pub target_variance: T,

    /// Number of observations.
    pub sample_size: usize,

    /// Held-out count of each fold.
    pub fold_sizes: Vec<usize>,

    /// Sum of squared held-out residuals of each fold.
    pub fold_squared_residuals: Vec<T>,

    /// Observations never held out by any fold.
    pub never_held_out: Vec<usize>,

    /// Corrected LOO scaling factor, when applied.
    pub correction_factor: Option<T>,

    /// Whether leave-one-out residuals came from the leverage shortcut.
    pub analytical: bool,

    /// Held-out residuals `y_i - ŷ_i`, in evaluation order.
    pub residuals: Option<Vec<T>>,

    /// Observation index of each held-out residual.
    pub residual_indices: Option<Vec<usize>>,
}

impl<T: Float> ValidationResult<T> {
    /// Result built from a bare mean squared error.
    pub fn from_mse(method: ValidationMethod, mse: T, target_variance: T, sample_size: usize) -> Self {
        Self {
            method,
            mse,
            relative_error: relative_error(mse, target_variance),
            r2_score: r2_score(mse, target_variance),
            target_variance,
            sample_size,
            fold_sizes: Vec::new(),
            fold_squared_residuals: Vec::new(),
            never_held_out: Vec::new(),
            correction_factor: None,
            analytical: false,
            residuals: None,
            residual_indices: None,
        }
    }

    /// Root mean squared error.
    pub fn rmse(&self) -> T {
        self.mse.sqrt()
    }

    /// Number of folds evaluated.
    pub fn fold_count(&self) -> usize {
        self.fold_sizes.len()
    }

    /// Total number of held-out evaluations.
    pub fn total_held_out(&self) -> usize {
        self.fold_sizes.iter().sum()
    }

    /// Mean squared error of fold `fold`.
    pub fn fold_mse(&self, fold: usize) -> Option<T> {
        let size = *self.fold_sizes.get(fold)?;
        let sum = *self.fold_squared_residuals.get(fold)?;
        Some(mean_squared_error(sum, size))
    }
}

impl<T: Float + Display> Display for ValidationResult<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(f, "Summary:")?;
        writeln!(f, "  Method:          {}", self.method)?;
        writeln!(f, "  Observations:    {}", self.sample_size)?;
        if !self.fold_sizes.is_empty() {
            writeln!(f, "  Folds:           {}", self.fold_sizes.len())?;
            writeln!(f, "  Held out:        {}", self.total_held_out())?;
        }
        if !self.never_held_out.is_empty() {
            writeln!(f, "  Never held out:  {}", self.never_held_out.len())?;
        }
        writeln!(f)?;
        writeln!(f, "Errors:")?;
        writeln!(f, "  MSE:             {:.6}", self.mse)?;
        writeln!(f, "  Relative error:  {:.6}", self.relative_error)?;
        writeln!(f, "  R²:              {:.6}", self.r2_score)?;
        if let Some(factor) = self.correction_factor {
            writeln!(f, "  Correction:      {:.6}", factor)?;
        }
        Ok(())
    }
}
