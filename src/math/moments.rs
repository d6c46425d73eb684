//! Central moment sums and their combination rules.
//!
//! ## Purpose
//!
//! This module holds the scalar arithmetic behind streaming moment
//! estimation: one-pass updates of the mean and of the central sums
//! `M2 = Σ(x - mean)²`, `M3 = Σ(x - mean)³`, `M4 = Σ(x - mean)⁴`, and the
//! pairwise merge of two partial summaries.
//!
//! ## Key concepts
//!
//! * **Point update**: Welford's recurrence extended to the third and fourth
//!   sums (Terriberry).
//! * **Pairwise merge**: Chan et al. for `M2`, Pébay for `M3`/`M4`. Exact in
//!   real arithmetic, so batch and point-wise feeds agree to rounding.
//! * **Two-pass batch**: A batch is summarized from its own mean first, then
//!   merged; no catastrophic cancellation from raw power sums.
//!
//! ## Invariants
//!
//! * `M2 >= 0` up to rounding.
//! * An empty summary (`count == 0`) is the identity of `merge`.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// External dependencies
use num_traits::Float;

// ============================================================================
// Central Sums
// ============================================================================

/// Mean and central moment sums of one component.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CentralSums<T> {
    /// Number of values summarized.
    pub count: usize,
    /// Arithmetic mean.
    pub mean: T,
    /// Sum of squared deviations.
    pub m2: T,
    /// Sum of cubed deviations.
    pub m3: T,
    /// Sum of fourth-power deviations.
    pub m4: T,
}

impl<T: Float> Default for CentralSums<T> {
    fn default() -> Self {
        Self {
            count: 0,
            mean: T::zero(),
            m2: T::zero(),
            m3: T::zero(),
            m4: T::zero(),
        }
    }
}

impl<T: Float> CentralSums<T> {
    /// Fold one value into the summary.
    #[inline]
    pub fn push(&mut self, x: T) {
        let n1 = T::from(self.count).unwrap_or_else(T::zero);
        self.count += 1;
        let n = n1 + T::one();
        let two = T::one() + T::one();
        let three = two + T::one();
        let four = two + two;
        let six = three + three;

        let delta = x - self.mean;
        let delta_n = delta / n;
        let delta_n2 = delta_n * delta_n;
        let term1 = delta * delta_n * n1;

        self.mean = self.mean + delta_n;
        self.m4 = self.m4 + term1 * delta_n2 * (n * n - three * n + three) + six * delta_n2 * self.m2
            - four * delta_n * self.m3;
        self.m3 = self.m3 + term1 * delta_n * (n - two) - three * delta_n * self.m2;
        self.m2 = self.m2 + term1;
    }

    /// Summarize a slice with a two-pass scheme.
    pub fn from_values(values: &[T]) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        let n = T::from(values.len()).unwrap_or_else(T::one);
        let mean = values.iter().fold(T::zero(), |acc, &v| acc + v) / n;
        let mut sums = Self {
            count: values.len(),
            mean,
            ..Self::default()
        };
        for &v in values {
            let d = v - mean;
            let d2 = d * d;
            sums.m2 = sums.m2 + d2;
            sums.m3 = sums.m3 + d2 * d;
            sums.m4 = sums.m4 + d2 * d2;
        }
        sums
    }

    /// Combine `other` into `self`.
    pub fn merge(&mut self, other: &Self) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = *other;
            return;
        }
        let na = T::from(self.count).unwrap_or_else(T::zero);
        let nb = T::from(other.count).unwrap_or_else(T::zero);
        let n = na + nb;
        let two = T::one() + T::one();
        let three = two + T::one();
        let four = two + two;
        let six = three + three;

        let delta = other.mean - self.mean;
        let d2 = delta * delta;
        let d3 = d2 * delta;
        let d4 = d2 * d2;

        let m4 = self.m4
            + other.m4
            + d4 * na * nb * (na * na - na * nb + nb * nb) / (n * n * n)
            + six * d2 * (na * na * other.m2 + nb * nb * self.m2) / (n * n)
            + four * delta * (na * other.m3 - nb * self.m3) / n;
        let m3 = self.m3
            + other.m3
            + d3 * na * nb * (na - nb) / (n * n)
            + three * delta * (na * other.m2 - nb * self.m2) / n;
        let m2 = self.m2 + other.m2 + d2 * na * nb / n;

        self.mean = self.mean + delta * nb / n;
        self.m2 = m2;
        self.m3 = m3;
        self.m4 = m4;
        self.count += other.count;
    }
}

// ============================================================================
// Standardized Moments
// ============================================================================

/// Unbiased variance `M2 / (n - 1)`; requires `n >= 2`.
#[inline]
pub fn unbiased_variance<T: Float>(n: usize, m2: T) -> T {
    m2 / T::from(n - 1).unwrap_or_else(T::one)
}

/// Adjusted Fisher-Pearson skewness `G1`; requires `n >= 3`.
pub fn adjusted_skewness<T: Float>(n: usize, m2: T, m3: T) -> T {
    let nf = T::from(n).unwrap_or_else(T::zero);
    let one = T::one();
    let two = one + one;
    let s = unbiased_variance(n, m2).sqrt();
    nf / ((nf - one) * (nf - two)) * m3 / (s * s * s)
}

/// Unbiased non-excess kurtosis `G2 + 3`; requires `n >= 4`.
pub fn unbiased_kurtosis<T: Float>(n: usize, m2: T, m4: T) -> T {
    let nf = T::from(n).unwrap_or_else(T::zero);
    let one = T::one();
    let two = one + one;
    let three = two + one;
    let five = three + two;
    let var = unbiased_variance(n, m2);
    nf * (nf + one) / ((nf - one) * (nf - two) * (nf - three)) * m4 / (var * var)
        - three * (three * nf - five) / ((nf - two) * (nf - three))
}

/// Unbiased sample variance of a slice; zero for fewer than two values.
pub fn sample_variance<T: Float>(values: &[T]) -> T {
    if values.len() < 2 {
        return T::zero();
    }
    unbiased_variance(values.len(), CentralSums::from_values(values).m2)
}

/// Per-component summaries of the rows of a flat row-major buffer.
pub fn column_sums<T: Float>(data: &[T], dimension: usize) -> Vec<CentralSums<T>> {
    let mut out = Vec::with_capacity(dimension);
    if dimension == 0 {
        return out;
    }
    let rows = data.len() / dimension;
    let mut column = Vec::with_capacity(rows);
    for j in 0..dimension {
        column.clear();
        column.extend(data.chunks_exact(dimension).map(|r| r[j]));
        out.push(CentralSums::from_values(&column));
    }
    out
}

