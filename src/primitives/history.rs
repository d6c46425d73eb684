//! Bounded and unbounded point histories.
//!
//! ## Purpose
//!
//! This module records the points of a stream for later inspection, with a
//! choice of memory policies: nothing, everything, a sliding window of the
//! latest points, or a logarithmically thinned reservoir.
//!
//! ## Design notes
//!
//! * **Compact reservoir**: Stores every `step`-th point into a buffer of
//!   `2H` slots. When the buffer fills, the points at odd slots are kept,
//!   `step` doubles and storage resumes at slot `H`.
//! * **Even spacing**: The skip counter is restarted at the new `step` on
//!   compaction, so retained points are always `step` stream positions apart.
//! * **Strategy enum**: `HistoryStrategy` wraps the four policies behind one
//!   `store`/`sample` pair.
//!
//! ## Invariants
//!
//! * A compact history never holds more than `2H` points.
//! * Retained points keep their original relative order.
//! * The skip counter never goes negative.
//!
//! ## Non-goals
//!
//! * This module does not compute statistics over the stored points.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::collections::VecDeque;
#[cfg(feature = "std")]
use std::collections::VecDeque;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// Internal dependencies
use crate::primitives::errors::UqError;
use crate::primitives::sample::Sample;

// ============================================================================
// Compact History
// ============================================================================

/// Bounded, order-preserving, logarithmically thinned history.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CompactHistory<T> {
    half_maximum_size: usize,
    step: usize,
    throwing_counter: usize,
    storage: Sample<T>,
}

impl<T: Copy> CompactHistory<T> {
    /// Create a history retaining at most `2 * half_maximum_size` points.
    ///
    /// A zero half size is rejected.
    pub fn new(half_maximum_size: usize) -> Result<Self, UqError> {
        if half_maximum_size == 0 {
            return Err(UqError::InvalidHalfMaximumSize(half_maximum_size));
        }
        Ok(Self {
            half_maximum_size,
            step: 1,
            throwing_counter: 0,
            storage: Sample::with_capacity(0, 2 * half_maximum_size),
        })
    }

    /// Offer a point to the history.
    ///
    /// The first stored point fixes the dimension.
    pub fn store(&mut self, point: &[T]) -> Result<(), UqError> {
        if self.throwing_counter == 0 {
            self.storage.push(point)?;
            self.throwing_counter = self.step;
            if self.storage.size() == 2 * self.half_maximum_size {
                self.compact();
            }
        } else if !self.storage.is_empty() && point.len() != self.storage.dimension() {
            return Err(UqError::DimensionMismatch {
                expected: self.storage.dimension(),
                got: point.len(),
            });
        }
        self.throwing_counter -= 1;
        Ok(())
    }

    /// Keep the odd slots, double the stride, resume at slot `H`.
    fn compact(&mut self) {
        let h = self.half_maximum_size;
        let d = self.storage.dimension();
        for i in 0..h {
            let src = 2 * i + 1;
            for j in 0..d {
                let v = self.storage.get(src, j);
                self.storage.row_mut(i)[j] = v;
            }
        }
        self.storage.truncate(h);
        self.step *= 2;
        self.throwing_counter = self.step;
    }

    /// Copy of the retained points, oldest first.
    pub fn sample(&self) -> Sample<T> {
        self.storage.clone()
    }

    /// Half of the maximum number of retained points.
    pub fn half_maximum_size(&self) -> usize {
        self.half_maximum_size
    }

    /// Next free storage slot, i.e. the number of retained points.
    pub fn index(&self) -> usize {
        self.storage.size()
    }

    /// Current decimation stride.
    pub fn step(&self) -> usize {
        self.step
    }
}

// ============================================================================
// History Strategy
// ============================================================================

/// Memory policy for recording a stream of points.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HistoryStrategy<T> {
    /// Store nothing.
    Null,

    /// Store every point.
    Full(Sample<T>),

    /// Keep the `capacity` most recent points.
    Last {
        /// Maximum number of retained points.
        capacity: usize,
        /// Point width, fixed by the first stored point.
        dimension: usize,
        /// Flat row-major window, oldest first.
        window: VecDeque<T>,
    },

    /// Logarithmically thinned reservoir.
    Compact(CompactHistory<T>),
}

impl<T: Copy> HistoryStrategy<T> {
    /// History that discards everything.
    pub fn null() -> Self {
        HistoryStrategy::Null
    }

    /// History that keeps everything.
    pub fn full() -> Self {
        HistoryStrategy::Full(Sample::new(0))
    }

    /// Sliding window of the `capacity` latest points.
    pub fn last(capacity: usize) -> Result<Self, UqError> {
        if capacity == 0 {
            return Err(UqError::InvalidArgument(
                "last-points history needs a capacity of at least 1".into(),
            ));
        }
        Ok(HistoryStrategy::Last {
            capacity,
            dimension: 0,
            window: VecDeque::new(),
        })
    }

    /// Compact reservoir of at most `2 * half_maximum_size` points.
    pub fn compact(half_maximum_size: usize) -> Result<Self, UqError> {
        CompactHistory::new(half_maximum_size).map(HistoryStrategy::Compact)
    }

    /// Record a point according to the policy.
    pub fn store(&mut self, point: &[T]) -> Result<(), UqError> {
        match self {
            HistoryStrategy::Null => Ok(()),
            HistoryStrategy::Full(sample) => sample.push(point),
            HistoryStrategy::Last {
                capacity,
                dimension,
                window,
            } => {
                if point.is_empty() {
                    return Err(UqError::InvalidArgument(
                        "points must have at least one component".into(),
                    ));
                }
                if window.is_empty() && *dimension == 0 {
                    *dimension = point.len();
                }
                if point.len() != *dimension {
                    return Err(UqError::DimensionMismatch {
                        expected: *dimension,
                        got: point.len(),
                    });
                }
                window.extend(point.iter().copied());
                while window.len() > *capacity * *dimension {
                    window.drain(..*dimension);
                }
                Ok(())
            }
            HistoryStrategy::Compact(history) => history.store(point),
        }
    }

    /// Copy of the retained points, oldest first.
    pub fn sample(&self) -> Sample<T> {
        match self {
            HistoryStrategy::Null => Sample::new(0),
            HistoryStrategy::Full(sample) => sample.clone(),
            HistoryStrategy::Last {
                dimension, window, ..
            } => {
                let flat = window.iter().copied().collect();
                Sample::from_flat(flat, *dimension).unwrap_or_else(|_| Sample::new(*dimension))
            }
            HistoryStrategy::Compact(history) => history.sample(),
        }
    }
}
