//! Error types for moment estimation and cross-validation.
//!
//! ## Purpose
//!
//! This module defines the single error type returned by every fallible
//! operation of the crate, from accumulator updates to validation runs.
//!
//! ## Design notes
//!
//! * **One enum**: Each failure condition is its own variant carrying the
//!   values needed to diagnose it.
//! * **Display**: Messages name the failure first, then the offending values.
//! * **no_std**: `std::error::Error` is only implemented with the `std` feature.
//!
//! ## Key concepts
//!
//! * **Argument errors**: Bad fold counts, dimension mismatches, malformed
//!   partitions. Reported synchronously, never retried.
//! * **Undefined statistics**: Requesting a moment before enough points
//!   were accumulated.
//! * **Internal errors**: Solver failures, reported with the failing fold.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::string::String;
#[cfg(feature = "std")]
use std::string::String;

use core::fmt;

/// Error type for all `uqstat` operations.
#[derive(Debug, Clone, PartialEq)]
pub enum UqError {
    /// An input container was empty.
    EmptyInput,

    /// A generic invalid argument.
    InvalidArgument(String),

    /// A point or row does not have the expected number of components.
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Dimension actually provided.
        got: usize,
    },

    /// The observation vector does not match the design matrix.
    MismatchedInputs {
        /// Number of rows of the design matrix.
        design_rows: usize,
        /// Number of observations.
        observations: usize,
    },

    /// The fold count is outside `[2, sample_size)`.
    InvalidFoldCount {
        /// Requested number of folds.
        k: usize,
        /// Number of observations.
        sample_size: usize,
    },

    /// A compact history was requested with a zero half size.
    InvalidHalfMaximumSize(usize),

    /// A statistic needs more accumulated points than are available.
    NotDefined {
        /// Name of the requested statistic.
        statistic: &'static str,
        /// Points accumulated so far.
        got: usize,
        /// Points required.
        min: usize,
    },

    /// A least-squares system could not be factorized or solved.
    SingularSystem(String),

    /// An unexpected numerical failure.
    InternalError(String),

    /// A cross-validation fold failed.
    FoldFailed {
        /// Index of the failing fold.
        fold: usize,
        /// Description of the underlying failure.
        reason: String,
    },

    /// A builder parameter was set more than once.
    DuplicateParameter {
        /// Name of the duplicated parameter.
        parameter: &'static str,
    },
}

impl UqError {
    /// Whether the error belongs to the invalid-argument family.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            UqError::EmptyInput
                | UqError::InvalidArgument(_)
                | UqError::DimensionMismatch { .. }
                | UqError::MismatchedInputs { .. }
                | UqError::InvalidFoldCount { .. }
                | UqError::InvalidHalfMaximumSize(_)
                | UqError::DuplicateParameter { .. }
        )
    }
}

impl fmt::Display for UqError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UqError::EmptyInput => write!(f, "Input is empty"),
            UqError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            UqError::DimensionMismatch { expected, got } => {
                write!(f, "Dimension mismatch: expected {}, got {}", expected, got)
            }
            UqError::MismatchedInputs {
                design_rows,
                observations,
            } => write!(
                f,
                "Length mismatch: design has {} rows, observations have {} values",
                design_rows, observations
            ),
            UqError::InvalidFoldCount { k, sample_size } => write!(
                f,
                "Invalid fold count: {} (must be in [2, {}))",
                k, sample_size
            ),
            UqError::InvalidHalfMaximumSize(h) => {
                write!(f, "Invalid half maximum size: {} (must be at least 1)", h)
            }
            UqError::NotDefined {
                statistic,
                got,
                min,
            } => write!(
                f,
                "{} is not defined: got {} points, need at least {}",
                statistic, got, min
            ),
            UqError::SingularSystem(msg) => write!(f, "Singular system: {}", msg),
            UqError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            UqError::FoldFailed { fold, reason } => {
                write!(f, "Fold {} failed: {}", fold, reason)
            }
            UqError::DuplicateParameter { parameter } => write!(
                f,
                "Parameter '{}' was set multiple times. Each parameter can only be configured once.",
                parameter
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for UqError {}
