//! Reusable scratch space for validation runs.
//!
//! ## Purpose
//!
//! Cross-validation repeats the same gather / predict / compare steps for
//! every fold. `ValidationBuffer` owns the vectors those steps need so they
//! are allocated once per run instead of once per fold.
//!
//! ## Design notes
//!
//! * **Slot**: A thin `Vec` wrapper that only grows and is cleared logically.
//! * **Ownership**: The executor owns one buffer per run; nothing is shared
//!   between runs.
//!
//! ## Invariants
//!
//! * Buffers are cleared with `clear()`, never deallocated between folds.
//! * Capacity is monotonically increasing.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use core::ops::{Deref, DerefMut};

// ============================================================================
// Slot
// ============================================================================

/// A reusable vector slot with automatic capacity management.
#[derive(Debug, Clone)]
pub struct Slot<T>(Vec<T>);

impl<T> Slot<T> {
    /// Create a new slot with the given initial capacity.
    #[inline]
    pub fn new(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// Grow the slot to at least `capacity`; never shrinks.
    #[inline]
    pub fn ensure_capacity(&mut self, capacity: usize) {
        if self.0.capacity() < capacity {
            self.0.reserve(capacity - self.0.len());
        }
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> Deref for Slot<T> {
    type Target = Vec<T>;
    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for Slot<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

// ============================================================================
// Validation Buffer
// ============================================================================

/// Per-run scratch vectors for the fold loop.
#[derive(Debug, Clone, Default)]
pub struct ValidationBuffer<T> {
    /// Observations gathered in training-filter order.
    pub train_y: Slot<T>,
    /// Predictions at the held-out rows.
    pub predictions: Slot<T>,
    /// Held-out residuals of the whole run, in evaluation order.
    pub residuals: Slot<T>,
    /// Observation index of each entry of `residuals`.
    pub residual_indices: Slot<usize>,
}

impl<T> ValidationBuffer<T> {
    /// Allocate for a run over `n` observations.
    pub fn new(n: usize) -> Self {
        Self {
            train_y: Slot::new(n),
            predictions: Slot::new(n),
            residuals: Slot::new(n),
            residual_indices: Slot::new(n),
        }
    }

    /// Grow every slot to hold `n` observations.
    pub fn ensure_capacity(&mut self, n: usize) {
        self.train_y.ensure_capacity(n);
        self.predictions.ensure_capacity(n);
        self.residuals.ensure_capacity(n);
        self.residual_indices.ensure_capacity(n);
    }

    /// Logically empty every slot.
    pub fn clear(&mut self) {
        self.train_y.clear();
        self.predictions.clear();
        self.residuals.clear();
        self.residual_indices.clear();
    }
}
