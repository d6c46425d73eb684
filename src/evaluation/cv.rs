//! Cross-validation strategies for least-squares meta-models.
//!
//! ## Purpose
//!
//! This module describes *which* held-out error to compute: K-Fold,
//! Leave-One-Out, corrected Leave-One-Out, or a caller-supplied function.
//! The fold loop itself lives in the engine.
//!
//! ## Design notes
//!
//! * **Tagged strategy**: `CVKind` is a plain enum; the executor matches on it.
//! * **Partitioning**: K-Fold delegates to `FoldPartition` with the configured
//!   scheme and optional shuffle seed.
//! * **LOO path**: Leave-One-Out uses the hat-diagonal shortcut unless brute
//!   force is requested or the method exposes no leverages.
//!
//! ## Key concepts
//!
//! * **K-Fold**: Partitions data into K subsamples (train on K-1, test on 1).
//! * **Leave-One-Out**: N folds of one observation each.
//! * **Corrected LOO**: LOO error scaled by `N / (N - P) * (1 + tr((XᵀX)⁻¹))`.
//!
//! ## Invariants
//!
//! * Training and test sets are disjoint in each fold.
//!
//! ## Non-goals
//!
//! * This module does not fit models or accumulate residuals.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// External dependencies
use core::fmt;
use num_traits::Float;

// Internal dependencies
use crate::primitives::errors::UqError;
use crate::primitives::partition::{FoldPartition, FoldScheme};
use crate::primitives::sample::Sample;

/// Caller-supplied validation returning a mean squared error.
pub type CustomValidation<T> = fn(&Sample<T>, &[T]) -> Result<T, UqError>;

// ============================================================================
// CV Kind
// ============================================================================

/// Cross-validation strategy.
#[derive(Debug, Clone, Copy)]
pub enum CVKind<T> {
    /// K-fold cross-validation with K folds.
    KFold(usize),

    /// Leave-one-out cross-validation.
    LeaveOneOut,

    /// Leave-one-out scaled by the small-sample correction factor.
    CorrectedLeaveOneOut,

    /// External validation over the design and observations.
    Custom(CustomValidation<T>),
}

impl<T> CVKind<T> {
    /// Label of the strategy, without its parameters.
    pub fn method(&self) -> ValidationMethod {
        match self {
            CVKind::KFold(_) => ValidationMethod::KFold,
            CVKind::LeaveOneOut => ValidationMethod::LeaveOneOut,
            CVKind::CorrectedLeaveOneOut => ValidationMethod::CorrectedLeaveOneOut,
            CVKind::Custom(_) => ValidationMethod::Custom,
        }
    }

    /// Whether the strategy is a leave-one-out variant.
    pub fn is_leave_one_out(&self) -> bool {
        matches!(self, CVKind::LeaveOneOut | CVKind::CorrectedLeaveOneOut)
    }
}

impl<T> Default for CVKind<T> {
    fn default() -> Self {
        CVKind::LeaveOneOut
    }
}

/// Strategy label carried by validation results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ValidationMethod {
    /// K-fold cross-validation.
    KFold,
    /// Leave-one-out cross-validation.
    LeaveOneOut,
    /// Corrected leave-one-out cross-validation.
    CorrectedLeaveOneOut,
    /// Caller-supplied validation.
    Custom,
}

impl fmt::Display for ValidationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValidationMethod::KFold => "K-Fold",
            ValidationMethod::LeaveOneOut => "Leave-One-Out",
            ValidationMethod::CorrectedLeaveOneOut => "Corrected Leave-One-Out",
            ValidationMethod::Custom => "Custom",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Leave-One-Out Mode
// ============================================================================

/// How leave-one-out residuals are obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LooMode {
    /// Use the hat-diagonal shortcut when the method provides leverages.
    #[default]
    Analytical,

    /// Refit N times.
    BruteForce,
}

// ============================================================================
// Cross-Validation Configuration
// ============================================================================

/// Resolved cross-validation settings.
#[derive(Debug, Clone, Copy)]
pub struct CVConfig<T> {
    /// The CV strategy kind.
    pub kind: CVKind<T>,
    /// Fold assignment scheme (K-Fold only).
    pub scheme: FoldScheme,
    /// Random seed for fold shuffling (K-Fold only).
    pub seed: Option<u64>,
    /// Leave-one-out residual path.
    pub loo_mode: LooMode,
    /// Keep per-observation residuals in the result.
    pub return_residuals: bool,
}

impl<T> Default for CVConfig<T> {
    fn default() -> Self {
        Self {
            kind: CVKind::default(),
            scheme: FoldScheme::default(),
            seed: None,
            loo_mode: LooMode::default(),
            return_residuals: false,
        }
    }
}

impl<T: Float> CVConfig<T> {
    /// Fold partition for a sample of `n` observations.
    ///
    /// Leave-one-out variants yield one singleton fold per observation;
    /// custom strategies have no partition.
    pub fn partition(&self, n: usize) -> Result<Option<FoldPartition>, UqError> {
        match self.kind {
            CVKind::KFold(k) => FoldPartition::new(n, k, self.scheme, self.seed).map(Some),
            CVKind::LeaveOneOut | CVKind::CorrectedLeaveOneOut => {
                Ok(Some(FoldPartition::leave_one_out(n)))
            }
            CVKind::Custom(_) => Ok(None),
        }
    }
}

/// Small-sample correction `N / (N - P) * (1 + tr((XᵀX)⁻¹))`.
pub fn loo_correction_factor<T: Float>(n: usize, p: usize, gram_inverse_diag: &[T]) -> Result<T, UqError> {
    if n <= p {
        return Err(UqError::InvalidArgument(
            "corrected leave-one-out needs more observations than basis functions".into(),
        ));
    }
    let trace = gram_inverse_diag.iter().fold(T::zero(), |acc, &d| acc + d);
    let nf = T::from(n).unwrap_or_else(T::zero);
    let pf = T::from(p).unwrap_or_else(T::zero);
    Ok(nf / (nf - pf) * (T::one() + trace))
}

/// Observations at `indices`, in order.
pub fn gather<T: Copy>(values: &[T], indices: &[usize], out: &mut Vec<T>) {
    out.clear();
    out.extend(indices.iter().map(|&i| values[i]));
}
