//! Rectangular sample container.
//!
//! ## Purpose
//!
//! This module provides `Sample`, a row-major matrix of `size` points with
//! `dimension` components each. It backs input samples, design matrices,
//! batch increments and history snapshots.
//!
//! ## Design notes
//!
//! * **Flat storage**: A single contiguous `Vec`, row `i` lives at
//!   `data[i * dimension..(i + 1) * dimension]`.
//! * **Cheap rows**: `row(i)` borrows a slice, no copy.
//! * **Selection**: `select(indices)` materializes a sub-sample; callers
//!   that only need to read rows should prefer `rows_at`.
//!
//! ## Invariants
//!
//! * `data.len() == size * dimension` at all times.
//! * Dimension is fixed at construction (or by the first pushed point of a
//!   zero-dimension sample).

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::{format, vec::Vec};
#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// Internal dependencies
use crate::primitives::errors::UqError;

/// Row-major collection of fixed-width points.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sample<T> {
    data: Vec<T>,
    dimension: usize,
}

impl<T: Copy> Sample<T> {
    /// Create an empty sample of the given dimension.
    pub fn new(dimension: usize) -> Self {
        Self {
            data: Vec::new(),
            dimension,
        }
    }

    /// Create an empty sample with room for `capacity` points.
    pub fn with_capacity(dimension: usize, capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(dimension * capacity),
            dimension,
        }
    }

    /// Build a sample from a flat row-major buffer.
    pub fn from_flat(data: Vec<T>, dimension: usize) -> Result<Self, UqError> {
        if dimension == 0 {
            if data.is_empty() {
                return Ok(Self::new(0));
            }
            return Err(UqError::InvalidArgument(format!(
                "{} values cannot form rows of dimension 0",
                data.len()
            )));
        }
        if data.len() % dimension != 0 {
            return Err(UqError::InvalidArgument(format!(
                "{} values cannot form rows of dimension {}",
                data.len(),
                dimension
            )));
        }
        Ok(Self { data, dimension })
    }

    /// Build a sample from a list of rows; all rows must share one width.
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self, UqError> {
        let dimension = rows.first().map_or(0, |r| r.as_ref().len());
        let mut sample = Self::with_capacity(dimension, rows.len());
        for row in rows {
            sample.push(row.as_ref())?;
        }
        Ok(sample)
    }

    /// Number of points.
    #[inline]
    pub fn size(&self) -> usize {
        if self.dimension == 0 {
            0
        } else {
            self.data.len() / self.dimension
        }
    }

    /// Number of components per point.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Whether the sample holds no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrow row `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= size()`.
    #[inline]
    pub fn row(&self, i: usize) -> &[T] {
        &self.data[i * self.dimension..(i + 1) * self.dimension]
    }

    /// Mutably borrow row `i`.
    #[inline]
    pub fn row_mut(&mut self, i: usize) -> &mut [T] {
        let d = self.dimension;
        &mut self.data[i * d..(i + 1) * d]
    }

    /// Value at row `i`, component `j`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> T {
        self.data[i * self.dimension + j]
    }

    /// Copy out component `j` of every point.
    pub fn column(&self, j: usize) -> Vec<T> {
        self.rows().map(|r| r[j]).collect()
    }

    /// Append a point.
    ///
    /// A sample created with dimension 0 adopts the width of its first point.
    /// Zero-width points are rejected.
    pub fn push(&mut self, point: &[T]) -> Result<(), UqError> {
        if point.is_empty() {
            return Err(UqError::InvalidArgument(
                "points must have at least one component".into(),
            ));
        }
        if self.dimension == 0 && self.data.is_empty() {
            self.dimension = point.len();
        }
        if point.len() != self.dimension {
            return Err(UqError::DimensionMismatch {
                expected: self.dimension,
                got: point.len(),
            });
        }
        self.data.extend_from_slice(point);
        Ok(())
    }

    /// Iterate over rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        // chunks_exact panics on a zero chunk size
        let d = self.dimension.max(1);
        self.data.chunks_exact(d).take(self.size())
    }

    /// Iterate over the rows at `indices`, in the order given.
    pub fn rows_at<'a>(&'a self, indices: &'a [usize]) -> impl Iterator<Item = &'a [T]> + 'a {
        indices.iter().map(move |&i| self.row(i))
    }

    /// Copy the rows at `indices` into a new sample.
    pub fn select(&self, indices: &[usize]) -> Result<Self, UqError> {
        let size = self.size();
        let mut out = Self::with_capacity(self.dimension, indices.len());
        for &i in indices {
            if i >= size {
                return Err(UqError::InvalidArgument(format!(
                    "row index {} out of range for a sample of size {}",
                    i, size
                )));
            }
            out.data.extend_from_slice(self.row(i));
        }
        Ok(out)
    }

    /// Flat row-major view of the data.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Keep only the first `size` points.
    pub fn truncate(&mut self, size: usize) {
        self.data.truncate(size * self.dimension);
    }

    /// Remove all points, keeping the dimension and capacity.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Consume the sample and return the flat row-major buffer.
    pub fn into_inner(self) -> Vec<T> {
        self.data
    }
}
