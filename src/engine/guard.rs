//! Scoped row-filter guard.
//!
//! ## Purpose
//!
//! The fold loop moves a shared least-squares method through a sequence of
//! training views. `RowFilterGuard` records the filter the method had on
//! entry and restores it when dropped, on success, on an early `?` return and
//! while unwinding.
//!
//! ## Invariants
//!
//! * After the guard is dropped, `method.row_filter()` equals the filter
//!   observed when the guard was created.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use core::marker::PhantomData;
use core::ops::{Deref, DerefMut};
use log::warn;

// Internal dependencies
use crate::algorithms::least_squares::LeastSquaresMethod;
use crate::math::linalg::FloatLinalg;

/// Restores a method's row filter on drop.
pub struct RowFilterGuard<'a, T, M>
where
    T: FloatLinalg,
    M: LeastSquaresMethod<T> + ?Sized,
{
    method: &'a mut M,
    saved: Vec<usize>,
    _marker: PhantomData<T>,
}

impl<'a, T, M> RowFilterGuard<'a, T, M>
where
    T: FloatLinalg,
    M: LeastSquaresMethod<T> + ?Sized,
{
    /// Snapshot the current filter of `method`.
    pub fn new(method: &'a mut M) -> Self {
        let saved = method.row_filter().to_vec();
        Self {
            method,
            saved,
            _marker: PhantomData,
        }
    }

    /// Filter that will be restored.
    pub fn saved_filter(&self) -> &[usize] {
        &self.saved
    }
}

impl<T, M> Deref for RowFilterGuard<'_, T, M>
where
    T: FloatLinalg,
    M: LeastSquaresMethod<T> + ?Sized,
{
    type Target = M;

    fn deref(&self) -> &M {
        self.method
    }
}

impl<T, M> DerefMut for RowFilterGuard<'_, T, M>
where
    T: FloatLinalg,
    M: LeastSquaresMethod<T> + ?Sized,
{
    fn deref_mut(&mut self) -> &mut M {
        self.method
    }
}

impl<T, M> Drop for RowFilterGuard<'_, T, M>
where
    T: FloatLinalg,
    M: LeastSquaresMethod<T> + ?Sized,
{
    fn drop(&mut self) {
        if self.method.row_filter() == self.saved.as_slice() {
            return;
        }
        if let Err(e) = self.method.set_row_filter(&self.saved) {
            warn!("failed to restore row filter: {}", e);
        }
    }
}
