//! Fold partitions for cross-validation.
//!
//! ## Purpose
//!
//! This module splits the index range `[0, n)` into held-out (test) sets
//! and their complementary training sets, and computes the index deltas
//! between the training sets of consecutive folds.
//!
//! ## Design notes
//!
//! * **Schemes**: `Interleaved` assigns position `j` to fold `j mod k` over the
//!   first `k * (n / k)` positions; `Balanced` cuts contiguous blocks whose
//!   sizes differ by at most one and covers every index.
//! * **Shuffling**: An optional seed permutes the index order before
//!   assignment, through a small LCG so the module stays `no_std`.
//! * **Sorted sets**: Test and training sets are kept in ascending order so
//!   deltas are computed by a linear merge.
//!
//! ## Key concepts
//!
//! * **Held-out count**: Size of a fold's test set, the weight of that fold
//!   in the aggregated error.
//! * **Tail**: Under `Interleaved`, the `n mod k` last positions are never
//!   held out and stay in every training set.
//! * **IndexDelta**: `added`/`conserved`/`removed` indices between two
//!   training sets, used for incremental refactorization.
//!
//! ## Invariants
//!
//! * Test sets of one partition are pairwise disjoint.
//! * `Balanced` test sets cover `[0, n)` exactly once.
//! * `Interleaved` test sets all have `n / k` elements.
//!
//! ## Non-goals
//!
//! * This module does not evaluate models or aggregate errors.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// Internal dependencies
use crate::primitives::errors::UqError;

// ============================================================================
// Internal PRNG
// ============================================================================

/// Minimal PRNG for no-std shuffling.
///
/// Uses an LCG (Linear Congruential Generator) with constants from PCG/MQL.
#[derive(Debug, Clone)]
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u32(&mut self) -> u32 {
        // LCG constants for 64-bit state
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
}

// ============================================================================
// Fold Scheme
// ============================================================================

/// Rule used to assign observations to folds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FoldScheme {
    /// Position `j < k * (n / k)` is tested in fold `j mod k`; the remaining
    /// `n mod k` positions are always used for training.
    #[default]
    Interleaved,

    /// Contiguous blocks of sizes `ceil(n / k)` or `floor(n / k)`; every
    /// observation is held out exactly once.
    Balanced,
}

// ============================================================================
// Fold Partition
// ============================================================================

/// Assignment of held-out indices to folds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldPartition {
    sample_size: usize,
    test_sets: Vec<Vec<usize>>,
}

impl FoldPartition {
    /// Partition `[0, sample_size)` into `k` folds.
    ///
    /// Fails with `InvalidFoldCount` unless `2 <= k < sample_size`.
    pub fn new(
        sample_size: usize,
        k: usize,
        scheme: FoldScheme,
        seed: Option<u64>,
    ) -> Result<Self, UqError> {
        if k < 2 || k >= sample_size {
            return Err(UqError::InvalidFoldCount { k, sample_size });
        }

        let order = Self::ordering(sample_size, seed);
        let mut test_sets: Vec<Vec<usize>> = (0..k).map(|_| Vec::new()).collect();

        match scheme {
            FoldScheme::Interleaved => {
                let test_size = sample_size / k;
                for (position, &index) in order.iter().enumerate().take(k * test_size) {
                    test_sets[position % k].push(index);
                }
            }
            FoldScheme::Balanced => {
                let base = sample_size / k;
                let extra = sample_size % k;
                let mut start = 0;
                for (fold, set) in test_sets.iter_mut().enumerate() {
                    let len = base + usize::from(fold < extra);
                    set.extend_from_slice(&order[start..start + len]);
                    start += len;
                }
            }
        }

        for set in test_sets.iter_mut() {
            set.sort_unstable();
        }

        Ok(Self {
            sample_size,
            test_sets,
        })
    }

    /// One fold per observation.
    pub fn leave_one_out(sample_size: usize) -> Self {
        Self {
            sample_size,
            test_sets: (0..sample_size).map(|i| vec![i]).collect(),
        }
    }

    /// Identity order, or a Fisher-Yates shuffle of it when seeded.
    fn ordering(n: usize, seed: Option<u64>) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..n).collect();
        if let Some(s) = seed {
            let mut rng = SimpleRng::new(s);
            for i in (1..n).rev() {
                let j = (rng.next_u32() as usize) % (i + 1);
                indices.swap(i, j);
            }
        }
        indices
    }

    /// Number of folds.
    #[inline]
    pub fn fold_count(&self) -> usize {
        self.test_sets.len()
    }

    /// Number of observations partitioned.
    #[inline]
    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// Held-out indices of fold `fold`, ascending.
    #[inline]
    pub fn test_indices(&self, fold: usize) -> &[usize] {
        &self.test_sets[fold]
    }

    /// Training indices of fold `fold`, ascending.
    pub fn train_indices(&self, fold: usize) -> Vec<usize> {
        let test = &self.test_sets[fold];
        let mut train = Vec::with_capacity(self.sample_size - test.len());
        let mut t = 0;
        for i in 0..self.sample_size {
            if t < test.len() && test[t] == i {
                t += 1;
            } else {
                train.push(i);
            }
        }
        train
    }

    /// Held-out count of every fold.
    pub fn held_out_counts(&self) -> Vec<usize> {
        self.test_sets.iter().map(Vec::len).collect()
    }

    /// Total number of held-out evaluations over all folds.
    pub fn total_held_out(&self) -> usize {
        self.test_sets.iter().map(Vec::len).sum()
    }

    /// Indices that no fold holds out.
    pub fn never_held_out(&self) -> Vec<usize> {
        let mut seen = vec![false; self.sample_size];
        for &i in self.test_sets.iter().flatten() {
            seen[i] = true;
        }
        (0..self.sample_size).filter(|&i| !seen[i]).collect()
    }
}

// ============================================================================
// Index Delta
// ============================================================================

/// Difference between two ascending index sets.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndexDelta {
    /// Indices present only in the new set.
    pub added: Vec<usize>,
    /// Indices present in both sets.
    pub conserved: Vec<usize>,
    /// Indices present only in the old set.
    pub removed: Vec<usize>,
}

impl IndexDelta {
    /// Compute the delta from `previous` to `next`; both must be ascending.
    pub fn between(previous: &[usize], next: &[usize]) -> Self {
        let mut delta = Self::default();
        let (mut i, mut j) = (0, 0);
        while i < previous.len() && j < next.len() {
            let (a, b) = (previous[i], next[j]);
            if a == b {
                delta.conserved.push(a);
                i += 1;
                j += 1;
            } else if a < b {
                delta.removed.push(a);
                i += 1;
            } else {
                delta.added.push(b);
                j += 1;
            }
        }
        delta.removed.extend_from_slice(&previous[i..]);
        delta.added.extend_from_slice(&next[j..]);
        delta
    }

    /// Whether the two sets were identical.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}
