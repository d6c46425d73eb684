//! Streaming accumulators over vector-valued samples.
//!
//! ## Purpose
//!
//! This module summarizes a stream of fixed-width points without storing
//! them: running moments (mean, variance, skewness, kurtosis), running
//! extrema and threshold exceedance counts.
//!
//! ## Design notes
//!
//! * **Common trait**: `StreamAccumulator` gives every accumulator the same
//!   `increment` / `increment_batch` / `clear` surface so a caller can feed
//!   several of them from one loop.
//! * **Lazy dimension**: An accumulator built with dimension 0 adopts the
//!   width of its first point; later points must match.
//! * **Batch path**: `MomentAccumulator` summarizes a batch on its own
//!   (two-pass) and merges it in, giving the same result as point-wise feeding
//!   up to rounding.
//!
//! ## Key concepts
//!
//! * **Iteration**: Number of points consumed; only `clear` resets it.
//! * **Undefined statistics**: Accessors return `NotDefined` until enough
//!   points were seen (1 for the mean, 2 for the variance, 3 for the
//!   skewness, 4 for the kurtosis).
//!
//! ## Invariants
//!
//! * Accessors never mutate.
//! * Per-component variances are non-negative up to rounding.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::math::moments::{
    adjusted_skewness, column_sums, unbiased_kurtosis, unbiased_variance, CentralSums,
};
use crate::primitives::errors::UqError;
use crate::primitives::sample::Sample;

// ============================================================================
// Accumulator Trait
// ============================================================================

/// Common surface of streaming accumulators.
pub trait StreamAccumulator<T: Float> {
    /// Fold one point into the summary.
    fn increment(&mut self, point: &[T]) -> Result<(), UqError>;

    /// Fold every row of `batch`, in order.
    fn increment_batch(&mut self, batch: &Sample<T>) -> Result<(), UqError> {
        for row in batch.rows() {
            self.increment(row)?;
        }
        Ok(())
    }

    /// Number of points consumed so far.
    fn iteration(&self) -> usize;

    /// Width of the accumulated points (0 while unset).
    fn dimension(&self) -> usize;

    /// Forget everything, keeping the dimension.
    fn clear(&mut self);
}

/// Adopt `got` when `dimension` is unset, otherwise require equality.
///
/// Zero-width points are rejected so `iteration` always counts real points.
#[inline]
fn check_dimension(dimension: &mut usize, got: usize) -> Result<bool, UqError> {
    if got == 0 {
        return Err(UqError::InvalidArgument(
            "points must have at least one component".into(),
        ));
    }
    if *dimension == 0 {
        *dimension = got;
        return Ok(true);
    }
    if got != *dimension {
        return Err(UqError::DimensionMismatch {
            expected: *dimension,
            got,
        });
    }
    Ok(false)
}

#[inline]
fn require<T>(
    statistic: &'static str,
    got: usize,
    min: usize,
    value: impl FnOnce() -> T,
) -> Result<T, UqError> {
    if got < min {
        Err(UqError::NotDefined {
            statistic,
            got,
            min,
        })
    } else {
        Ok(value())
    }
}

// ============================================================================
// Moment Accumulator
// ============================================================================

/// Running mean, variance, skewness and kurtosis per component.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MomentAccumulator<T> {
    dimension: usize,
    iteration: usize,
    sums: Vec<CentralSums<T>>,
}

impl<T: Float> Default for MomentAccumulator<T> {
    fn default() -> Self {
        Self::new(0)
    }
}

impl<T: Float> MomentAccumulator<T> {
    /// Create an accumulator for points of `dimension` components.
    ///
    /// Passing 0 defers the dimension to the first increment.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            iteration: 0,
            sums: vec![CentralSums::default(); dimension],
        }
    }

    /// Combine another accumulator into this one.
    pub fn merge(&mut self, other: &Self) -> Result<(), UqError> {
        if other.iteration == 0 {
            return Ok(());
        }
        if check_dimension(&mut self.dimension, other.dimension)? && self.sums.is_empty() {
            self.sums = vec![CentralSums::default(); self.dimension];
        }
        for (mine, theirs) in self.sums.iter_mut().zip(other.sums.iter()) {
            mine.merge(theirs);
        }
        self.iteration += other.iteration;
        Ok(())
    }

    /// Per-component mean.
    pub fn mean(&self) -> Result<Vec<T>, UqError> {
        require("mean", self.iteration, 1, || {
            self.sums.iter().map(|s| s.mean).collect()
        })
    }

    /// Per-component unbiased variance.
    pub fn variance(&self) -> Result<Vec<T>, UqError> {
        let n = self.iteration;
        require("variance", n, 2, || {
            self.sums.iter().map(|s| unbiased_variance(n, s.m2)).collect()
        })
    }

    /// Per-component adjusted Fisher-Pearson skewness.
    pub fn skewness(&self) -> Result<Vec<T>, UqError> {
        let n = self.iteration;
        require("skewness", n, 3, || {
            self.sums
                .iter()
                .map(|s| adjusted_skewness(n, s.m2, s.m3))
                .collect()
        })
    }

    /// Per-component unbiased kurtosis (non-excess, normal = 3).
    pub fn kurtosis(&self) -> Result<Vec<T>, UqError> {
        let n = self.iteration;
        require("kurtosis", n, 4, || {
            self.sums
                .iter()
                .map(|s| unbiased_kurtosis(n, s.m2, s.m4))
                .collect()
        })
    }

    /// Per-component standard deviation.
    pub fn standard_deviation(&self) -> Result<Vec<T>, UqError> {
        self.variance()
            .map(|v| v.into_iter().map(|x| x.sqrt()).collect())
    }

    /// Per-component standard error of the mean, `sqrt(variance / n)`.
    ///
    /// This is the Monte Carlo error of the running mean.
    pub fn standard_error_of_mean(&self) -> Result<Vec<T>, UqError> {
        let n = T::from(self.iteration).unwrap_or_else(T::one);
        self.variance()
            .map(|v| v.into_iter().map(|x| (x / n).sqrt()).collect())
    }

    /// Per-component coefficient of variation, `std / |mean|`.
    pub fn coefficient_of_variation(&self) -> Result<Vec<T>, UqError> {
        let sd = self
            .standard_deviation()
            .map_err(|_| UqError::NotDefined {
                statistic: "coefficient of variation",
                got: self.iteration,
                min: 2,
            })?;
        Ok(sd
            .into_iter()
            .zip(self.sums.iter())
            .map(|(s, c)| s / c.mean.abs())
            .collect())
    }

    /// Raw per-component central sums.
    pub fn central_sums(&self) -> &[CentralSums<T>] {
        &self.sums
    }
}

impl<T: Float> StreamAccumulator<T> for MomentAccumulator<T> {
    fn increment(&mut self, point: &[T]) -> Result<(), UqError> {
        if check_dimension(&mut self.dimension, point.len())? {
            self.sums = vec![CentralSums::default(); self.dimension];
        }
        for (s, &x) in self.sums.iter_mut().zip(point.iter()) {
            s.push(x);
        }
        self.iteration += 1;
        Ok(())
    }

    fn increment_batch(&mut self, batch: &Sample<T>) -> Result<(), UqError> {
        if batch.is_empty() {
            return Ok(());
        }
        if check_dimension(&mut self.dimension, batch.dimension())? {
            self.sums = vec![CentralSums::default(); self.dimension];
        }
        let partial = column_sums(batch.as_slice(), batch.dimension());
        for (mine, theirs) in self.sums.iter_mut().zip(partial.iter()) {
            mine.merge(theirs);
        }
        self.iteration += batch.size();
        Ok(())
    }

    fn iteration(&self) -> usize {
        self.iteration
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn clear(&mut self) {
        self.iteration = 0;
        for s in &mut self.sums {
            *s = CentralSums::default();
        }
    }
}

// ============================================================================
// Extrema Accumulator
// ============================================================================

/// Running per-component minimum and maximum.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExtremaAccumulator<T> {
    dimension: usize,
    iteration: usize,
    min: Vec<T>,
    max: Vec<T>,
}

impl<T: Float> ExtremaAccumulator<T> {
    /// Create an accumulator; 0 defers the dimension to the first point.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            iteration: 0,
            min: Vec::new(),
            max: Vec::new(),
        }
    }

    /// Per-component minimum.
    pub fn min(&self) -> Result<Vec<T>, UqError> {
        require("minimum", self.iteration, 1, || self.min.clone())
    }

    /// Per-component maximum.
    pub fn max(&self) -> Result<Vec<T>, UqError> {
        require("maximum", self.iteration, 1, || self.max.clone())
    }

    /// Combine another accumulator into this one.
    pub fn merge(&mut self, other: &Self) -> Result<(), UqError> {
        if other.iteration == 0 {
            return Ok(());
        }
        check_dimension(&mut self.dimension, other.dimension)?;
        if self.iteration == 0 {
            self.min = other.min.clone();
            self.max = other.max.clone();
        } else {
            for j in 0..self.dimension {
                self.min[j] = self.min[j].min(other.min[j]);
                self.max[j] = self.max[j].max(other.max[j]);
            }
        }
        self.iteration += other.iteration;
        Ok(())
    }
}

impl<T: Float> StreamAccumulator<T> for ExtremaAccumulator<T> {
    fn increment(&mut self, point: &[T]) -> Result<(), UqError> {
        check_dimension(&mut self.dimension, point.len())?;
        if self.iteration == 0 {
            self.min = point.to_vec();
            self.max = point.to_vec();
        } else {
            for (j, &x) in point.iter().enumerate() {
                if x < self.min[j] {
                    self.min[j] = x;
                }
                if x > self.max[j] {
                    self.max[j] = x;
                }
            }
        }
        self.iteration += 1;
        Ok(())
    }

    fn iteration(&self) -> usize {
        self.iteration
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn clear(&mut self) {
        self.iteration = 0;
        self.min.clear();
        self.max.clear();
    }
}

// ============================================================================
// Threshold Exceedance
// ============================================================================

/// Comparison applied between a value and its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ComparisonOperator {
    /// `value < threshold`
    Less,
    /// `value <= threshold`
    LessOrEqual,
    /// `value > threshold`
    #[default]
    Greater,
    /// `value >= threshold`
    GreaterOrEqual,
}

impl ComparisonOperator {
    /// Evaluate `value <op> threshold`.
    #[inline]
    pub fn compare<T: PartialOrd>(self, value: T, threshold: T) -> bool {
        match self {
            ComparisonOperator::Less => value < threshold,
            ComparisonOperator::LessOrEqual => value <= threshold,
            ComparisonOperator::Greater => value > threshold,
            ComparisonOperator::GreaterOrEqual => value >= threshold,
        }
    }
}

/// Per-component count of points satisfying `value <op> threshold`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ThresholdExceedance<T> {
    operator: ComparisonOperator,
    threshold: Vec<T>,
    counts: Vec<usize>,
    iteration: usize,
}

impl<T: Float> ThresholdExceedance<T> {
    /// Create a counter; the threshold fixes the dimension.
    pub fn new(threshold: Vec<T>, operator: ComparisonOperator) -> Result<Self, UqError> {
        if threshold.is_empty() {
            return Err(UqError::EmptyInput);
        }
        Ok(Self {
            operator,
            counts: vec![0; threshold.len()],
            threshold,
            iteration: 0,
        })
    }

    /// Comparison in use.
    pub fn operator(&self) -> ComparisonOperator {
        self.operator
    }

    /// Per-component thresholds.
    pub fn threshold(&self) -> &[T] {
        &self.threshold
    }

    /// Per-component number of points satisfying the comparison.
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Per-component fraction of points satisfying the comparison.
    pub fn ratio(&self) -> Result<Vec<T>, UqError> {
        let n = T::from(self.iteration).unwrap_or_else(T::one);
        require("exceedance ratio", self.iteration, 1, || {
            self.counts
                .iter()
                .map(|&c| T::from(c).unwrap_or_else(T::zero) / n)
                .collect()
        })
    }
}

impl<T: Float> StreamAccumulator<T> for ThresholdExceedance<T> {
    fn increment(&mut self, point: &[T]) -> Result<(), UqError> {
        if point.len() != self.threshold.len() {
            return Err(UqError::DimensionMismatch {
                expected: self.threshold.len(),
                got: point.len(),
            });
        }
        for ((count, &x), &t) in self.counts.iter_mut().zip(point).zip(&self.threshold) {
            if self.operator.compare(x, t) {
                *count += 1;
            }
        }
        self.iteration += 1;
        Ok(())
    }

    fn iteration(&self) -> usize {
        self.iteration
    }

    fn dimension(&self) -> usize {
        self.threshold.len()
    }

    fn clear(&mut self) {
        self.iteration = 0;
        self.counts.iter_mut().for_each(|c| *c = 0);
    }
}
