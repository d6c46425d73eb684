//! Input validation for cross-validation configuration and data.
//!
//! ## Purpose
//!
//! This module checks validation parameters and input data before any fold
//! is evaluated: observation counts against the design, finite values, fold
//! counts and builder misuse.
//!
//! ## Design notes
//!
//! * **Fail-Fast**: Validation stops at the first error encountered.
//! * **Efficiency**: Checks are ordered from cheap to expensive.
//! * **Generics**: Validation is generic over `Float` types.
//!
//! ## Invariants
//!
//! * Validation logic is deterministic and side-effect free.
//!
//! ## Non-goals
//!
//! * This module does not repair invalid inputs.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::format;

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::primitives::errors::UqError;

// ============================================================================
// Validator
// ============================================================================

/// Validation utility for cross-validation configuration and input data.
///
/// All methods return `Result<(), UqError>` and fail fast upon identifying
/// the first violation.
pub struct Validator;

impl Validator {
    // ========================================================================
    // Core Input Validation
    // ========================================================================

    /// Validate observations against a design of `design_rows` rows.
    pub fn validate_observations<T: Float>(design_rows: usize, y: &[T]) -> Result<(), UqError> {
        if design_rows == 0 || y.is_empty() {
            return Err(UqError::EmptyInput);
        }
        if y.len() != design_rows {
            return Err(UqError::MismatchedInputs {
                design_rows,
                observations: y.len(),
            });
        }
        if let Some(i) = y.iter().position(|v| !v.is_finite()) {
            return Err(UqError::InvalidArgument(format!(
                "observation {} is not finite",
                i
            )));
        }
        Ok(())
    }

    /// Validate the design values.
    pub fn validate_design<T: Float>(data: &[T]) -> Result<(), UqError> {
        if data.is_empty() {
            return Err(UqError::EmptyInput);
        }
        if let Some(i) = data.iter().position(|v| !v.is_finite()) {
            return Err(UqError::InvalidArgument(format!(
                "design value {} is not finite",
                i
            )));
        }
        Ok(())
    }

    // ========================================================================
    // Parameter Validation
    // ========================================================================

    /// Validate a fold count for `sample_size` observations: `2 <= k < n`.
    pub fn validate_fold_count(k: usize, sample_size: usize) -> Result<(), UqError> {
        if k < 2 || k >= sample_size {
            return Err(UqError::InvalidFoldCount { k, sample_size });
        }
        Ok(())
    }

    /// Validate a fold count before the sample size is known.
    pub fn validate_min_fold_count(k: usize) -> Result<(), UqError> {
        if k < 2 {
            return Err(UqError::InvalidArgument(format!(
                "fold count must be at least 2, got {}",
                k
            )));
        }
        Ok(())
    }

    /// Leave-one-out needs at least two observations.
    pub fn validate_leave_one_out(sample_size: usize) -> Result<(), UqError> {
        if sample_size < 2 {
            return Err(UqError::InvalidArgument(format!(
                "leave-one-out needs at least 2 observations, got {}",
                sample_size
            )));
        }
        Ok(())
    }

    /// Validate that no builder parameter was set twice.
    pub fn validate_no_duplicates(duplicate_param: Option<&'static str>) -> Result<(), UqError> {
        if let Some(parameter) = duplicate_param {
            return Err(UqError::DuplicateParameter { parameter });
        }
        Ok(())
    }
}
