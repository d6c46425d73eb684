//! Least-squares method abstraction and its dense implementation.
//!
//! ## Purpose
//!
//! This module defines `LeastSquaresMethod`, the interface the validation
//! engine drives: a full design matrix, a mutable row filter selecting the
//! active observations, and a solver over the active rows. `DenseLeastSquares`
//! implements it with nalgebra factorizations.
//!
//! ## Design notes
//!
//! * **Row filter**: The filter lists active design rows in increasing order.
//!   Observations passed to `solve` are aligned with it.
//! * **Two-phase cache**: `Factorization` is either `Uncomputed` or
//!   `Computed`; any filter change resets it, the next solve or leverage query
//!   computes it.
//! * **Incremental Cholesky**: `update` adjusts the cached Gram matrix by
//!   rank-one downdates/updates for the removed and added rows, then refactors
//!   the `P × P` system without touching the `N × P` design.
//!
//! ## Key concepts
//!
//! * **Hat diagonal**: Leverages of the active rows, in filter order.
//! * **Gram inverse diagonal**: `diag((XᵀX)⁻¹)` over the active rows.
//!
//! ## Invariants
//!
//! * Every filter index is `< design().size()`.
//! * A `Computed` factorization always matches the current filter.
//!
//! ## Non-goals
//!
//! * Sparse or weighted least squares.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::{format, vec::Vec};
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use core::mem;
use log::trace;

// Internal dependencies
use crate::math::linalg::{Decomposition, Factors, FloatLinalg};
use crate::primitives::errors::UqError;
use crate::primitives::sample::Sample;

// ============================================================================
// Least-Squares Method Trait
// ============================================================================

/// A linear least-squares solver over a row-filtered design matrix.
pub trait LeastSquaresMethod<T: FloatLinalg> {
    /// The full, unfiltered design (samples × basis functions).
    fn design(&self) -> &Sample<T>;

    /// Active design rows, in increasing order.
    fn row_filter(&self) -> &[usize];

    /// Replace the active rows.
    fn set_row_filter(&mut self, indices: &[usize]) -> Result<(), UqError>;

    /// Move the filter by a delta: the new filter is `conserved ∪ added`.
    fn update(
        &mut self,
        added: &[usize],
        conserved: &[usize],
        removed: &[usize],
    ) -> Result<(), UqError> {
        let _ = removed;
        let mut filter: Vec<usize> = conserved.iter().chain(added).copied().collect();
        filter.sort_unstable();
        self.set_row_filter(&filter)
    }

    /// Coefficients fitting `observations`, aligned with the row filter.
    fn solve(&mut self, observations: &[T]) -> Result<Vec<T>, UqError>;

    /// Leverages of the active rows, if the method can provide them.
    fn h_diag(&mut self) -> Result<Option<Vec<T>>, UqError> {
        Ok(None)
    }

    /// Diagonal of `(XᵀX)⁻¹` over the active rows, if available.
    fn gram_inverse_diag(&mut self) -> Result<Option<Vec<T>>, UqError> {
        Ok(None)
    }

    /// Number of basis functions.
    fn basis_size(&self) -> usize {
        self.design().dimension()
    }
}

/// Prediction `x · c` for one design row.
#[inline]
pub fn predict_row<T: FloatLinalg>(row: &[T], coefficients: &[T]) -> T {
    row.iter()
        .zip(coefficients)
        .fold(T::zero(), |acc, (&x, &c)| acc + x * c)
}

// ============================================================================
// Factorization Cache
// ============================================================================

/// Cached factorization of the active design rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Factorization<T> {
    /// Nothing computed for the current filter.
    #[default]
    Uncomputed,

    /// Factors of the current filter.
    Computed(Factors<T>),
}

// ============================================================================
// Dense Least Squares
// ============================================================================

/// Dense least-squares solver over an in-memory design.
#[derive(Debug, Clone)]
pub struct DenseLeastSquares<T> {
    design: Sample<T>,
    filter: Vec<usize>,
    decomposition: Decomposition,
    factorization: Factorization<T>,
    active: Vec<T>,
}

impl<T: FloatLinalg> DenseLeastSquares<T> {
    /// Create a solver with every design row active.
    pub fn new(design: Sample<T>, decomposition: Decomposition) -> Result<Self, UqError> {
        if design.is_empty() || design.dimension() == 0 {
            return Err(UqError::EmptyInput);
        }
        let filter: Vec<usize> = (0..design.size()).collect();
        let mut method = Self {
            active: Vec::with_capacity(design.as_slice().len()),
            design,
            filter,
            decomposition,
            factorization: Factorization::Uncomputed,
        };
        method.rebuild_active();
        Ok(method)
    }

    /// Factorization in use.
    pub fn decomposition(&self) -> Decomposition {
        self.decomposition
    }

    /// Current state of the factorization cache.
    pub fn factorization(&self) -> &Factorization<T> {
        &self.factorization
    }

    /// Compute the factors of the active rows if not cached.
    pub fn ensure_factorized(&mut self) -> Result<(), UqError> {
        if let Factorization::Uncomputed = self.factorization {
            let factors = T::factorize(
                &self.active,
                self.filter.len(),
                self.design.dimension(),
                self.decomposition,
            )?;
            self.factorization = Factorization::Computed(factors);
        }
        Ok(())
    }

    fn factors(&self) -> Result<&Factors<T>, UqError> {
        match &self.factorization {
            Factorization::Computed(f) => Ok(f),
            Factorization::Uncomputed => Err(UqError::InternalError(
                "factorization requested before it was computed".into(),
            )),
        }
    }

    fn rebuild_active(&mut self) {
        self.active.clear();
        for &i in &self.filter {
            self.active.extend_from_slice(self.design.row(i));
        }
    }

    fn check_indices(&self, indices: &[usize]) -> Result<(), UqError> {
        let n = self.design.size();
        match indices.iter().find(|&&i| i >= n) {
            Some(&i) => Err(UqError::InvalidArgument(format!(
                "row index {} out of range for a design of {} rows",
                i, n
            ))),
            None => Ok(()),
        }
    }
}

impl<T: FloatLinalg> LeastSquaresMethod<T> for DenseLeastSquares<T> {
    fn design(&self) -> &Sample<T> {
        &self.design
    }

    fn row_filter(&self) -> &[usize] {
        &self.filter
    }

    fn set_row_filter(&mut self, indices: &[usize]) -> Result<(), UqError> {
        self.check_indices(indices)?;
        self.filter.clear();
        self.filter.extend_from_slice(indices);
        self.rebuild_active();
        self.factorization = Factorization::Uncomputed;
        Ok(())
    }

    fn update(
        &mut self,
        added: &[usize],
        conserved: &[usize],
        removed: &[usize],
    ) -> Result<(), UqError> {
        self.check_indices(added)?;
        self.check_indices(removed)?;

        let gram = match &mut self.factorization {
            Factorization::Computed(Factors::Cholesky { gram, .. }) => {
                let mut gram = mem::take(gram);
                for &i in removed {
                    T::rank_update(&mut gram, self.design.row(i), -T::one());
                }
                for &i in added {
                    T::rank_update(&mut gram, self.design.row(i), T::one());
                }
                Some(gram)
            }
            _ => None,
        };

        self.filter.clear();
        self.filter.extend(conserved.iter().chain(added).copied());
        self.filter.sort_unstable();
        self.rebuild_active();
        self.factorization = Factorization::Uncomputed;

        if let Some(gram) = gram {
            trace!(
                "Cholesky update: {} added, {} removed, {} conserved",
                added.len(),
                removed.len(),
                conserved.len()
            );
            match T::factorize_gram(gram, self.design.dimension()) {
                Ok(factors) => self.factorization = Factorization::Computed(factors),
                Err(_) => trace!("updated Gram matrix not positive definite, refactorizing"),
            }
        }
        Ok(())
    }

    fn solve(&mut self, observations: &[T]) -> Result<Vec<T>, UqError> {
        if observations.len() != self.filter.len() {
            return Err(UqError::MismatchedInputs {
                design_rows: self.filter.len(),
                observations: observations.len(),
            });
        }
        self.ensure_factorized()?;
        T::solve_factored(self.factors()?, &self.active, observations)
    }

    fn h_diag(&mut self) -> Result<Option<Vec<T>>, UqError> {
        self.ensure_factorized()?;
        T::hat_diagonal(self.factors()?, &self.active).map(Some)
    }

    fn gram_inverse_diag(&mut self) -> Result<Option<Vec<T>>, UqError> {
        self.ensure_factorized()?;
        T::gram_inverse_diagonal(self.factors()?).map(Some)
    }
}
