//! Design matrix evaluation from basis functions.
//!
//! ## Purpose
//!
//! `DesignProxy` evaluates a list of scalar basis functions over an input
//! sample and assembles the design matrix for any subset of them. Columns are
//! evaluated once and cached, so model selection loops that try many subsets
//! pay for each basis function only once.
//!
//! ## Invariants
//!
//! * Column `k` of a returned design holds basis `active[k]` at every input
//!   point, in input order.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, format, vec::Vec};
#[cfg(feature = "std")]
use std::{boxed::Box, vec::Vec};

// External dependencies
use core::fmt;
use num_traits::Float;

// Internal dependencies
use crate::primitives::errors::UqError;
use crate::primitives::sample::Sample;

/// A scalar function of one input point.
pub type BasisFunction<T> = Box<dyn Fn(&[T]) -> T>;

/// Evaluates basis functions over a fixed input sample.
pub struct DesignProxy<T> {
    input: Sample<T>,
    basis: Vec<BasisFunction<T>>,
    columns: Vec<Option<Vec<T>>>,
}

impl<T: Float> DesignProxy<T> {
    /// Create a proxy over `input` for the given basis.
    pub fn new(input: Sample<T>, basis: Vec<BasisFunction<T>>) -> Result<Self, UqError> {
        if basis.is_empty() {
            return Err(UqError::EmptyInput);
        }
        let columns = (0..basis.len()).map(|_| None).collect();
        Ok(Self {
            input,
            basis,
            columns,
        })
    }

    /// The input sample.
    pub fn input(&self) -> &Sample<T> {
        &self.input
    }

    /// Number of basis functions.
    pub fn basis_size(&self) -> usize {
        self.basis.len()
    }

    /// Design matrix restricted to the `active` basis functions.
    pub fn compute_design(&mut self, active: &[usize]) -> Result<Sample<T>, UqError> {
        if active.is_empty() {
            return Err(UqError::EmptyInput);
        }
        for &k in active {
            self.evaluate_column(k)?;
        }
        let n = self.input.size();
        let mut data = Vec::with_capacity(n * active.len());
        for i in 0..n {
            for &k in active {
                // evaluate_column filled every active slot above
                let value = match &self.columns[k] {
                    Some(column) => column[i],
                    None => return Err(UqError::InternalError(format!("basis {} not evaluated", k))),
                };
                data.push(value);
            }
        }
        Sample::from_flat(data, active.len())
    }

    /// Design matrix over the whole basis.
    pub fn full_design(&mut self) -> Result<Sample<T>, UqError> {
        let all: Vec<usize> = (0..self.basis.len()).collect();
        self.compute_design(&all)
    }

    fn evaluate_column(&mut self, k: usize) -> Result<(), UqError> {
        if k >= self.basis.len() {
            return Err(UqError::InvalidArgument(format!(
                "basis index {} out of range for a basis of size {}",
                k,
                self.basis.len()
            )));
        }
        if self.columns[k].is_none() {
            let f = &self.basis[k];
            self.columns[k] = Some(self.input.rows().map(|x| f(x)).collect());
        }
        Ok(())
    }
}

impl<T: fmt::Debug> fmt::Debug for DesignProxy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DesignProxy")
            .field("input", &self.input)
            .field("basis_size", &self.basis.len())
            .field(
                "cached_columns",
                &self.columns.iter().filter(|c| c.is_some()).count(),
            )
            .finish()
    }
}
