//! Hat matrix statistics for linear least squares.
//!
//! ## Purpose
//!
//! This module turns the diagonal of the hat matrix `H = X (XᵀX)⁻¹ Xᵀ` into
//! the quantities needed for leave-one-out validation:
//! - Leverage values (diagonal of H)
//! - Trace of H (effective number of parameters)
//! - Leave-one-out residuals from a single full fit
//!
//! ## Background
//!
//! For a linear least-squares fit `ŷ = H y`, removing observation `i` and
//! refitting gives the prediction error
//!
//! ```text
//! r_i = (y_i - ŷ_i) / (1 - h_ii)
//! ```
//!
//! so the N refits of leave-one-out collapse to one factorization.
//!
//! ## Invariants
//!
//! * `0 <= h_ii <= 1` for a full-rank design.
//! * `trace == P` (number of basis functions) for a full-rank design.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::{format, vec::Vec};
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::primitives::errors::UqError;

// ============================================================================
// Hat Matrix Statistics
// ============================================================================

/// Statistics derived from the hat matrix diagonal.
#[derive(Debug, Clone, PartialEq)]
pub struct HatMatrixStats<T> {
    /// Leverage values (diagonal of H) at each observation.
    pub leverage: Vec<T>,

    /// Trace of H = sum of leverage values.
    pub trace: T,
}

impl<T: Float> HatMatrixStats<T> {
    /// Create stats from leverage values.
    pub fn from_leverage(leverage: Vec<T>) -> Self {
        let trace = leverage.iter().fold(T::zero(), |acc, &l| acc + l);
        Self { leverage, trace }
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.leverage.len()
    }

    /// Whether no leverage values are held.
    pub fn is_empty(&self) -> bool {
        self.leverage.is_empty()
    }

    /// Largest leverage value.
    pub fn max_leverage(&self) -> T {
        self.leverage.iter().copied().fold(T::zero(), T::max)
    }

    /// Leave-one-out residuals `(y_i - ŷ_i) / (1 - h_ii)`.
    ///
    /// Fails when an observation has leverage numerically equal to one: its
    /// removal makes the reduced system singular.
    pub fn loo_residuals(&self, y: &[T], fitted: &[T]) -> Result<Vec<T>, UqError> {
        let n = self.len();
        if y.len() != n || fitted.len() != n {
            return Err(UqError::MismatchedInputs {
                design_rows: n,
                observations: y.len().min(fitted.len()),
            });
        }
        let tol = T::epsilon().sqrt();
        self.leverage
            .iter()
            .zip(y.iter().zip(fitted.iter()))
            .enumerate()
            .map(|(i, (&h, (&yi, &fi)))| {
                let denom = T::one() - h;
                if denom <= tol {
                    Err(UqError::SingularSystem(format!(
                        "observation {} has leverage {:.6} and cannot be left out",
                        i,
                        h.to_f64().unwrap_or(f64::NAN)
                    )))
                } else {
                    Ok((yi - fi) / denom)
                }
            })
            .collect()
    }
}
