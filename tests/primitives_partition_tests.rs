#![cfg(feature = "dev")]
//! Tests for fold partitions and index deltas.
//!
//! These tests verify the fold assignment used by K-Fold and Leave-One-Out:
//! - FoldScheme (Interleaved, Balanced)
//! - FoldPartition construction, test/train sets, coverage
//! - IndexDelta between consecutive training sets
//!
//! ## Test Organization
//!
//! 1. **Validation** - Fold count bounds
//! 2. **Interleaved** - Fold membership and the never-held-out tail
//! 3. **Balanced** - Contiguous blocks and full coverage
//! 4. **Shuffling** - Seeded determinism
//! 5. **Index Deltas** - Merge of sorted training sets

use uqstat::internals::primitives::errors::UqError;
use uqstat::internals::primitives::partition::{FoldPartition, FoldScheme, IndexDelta};

// ============================================================================
// Validation Tests
// ============================================================================

/// Test fold count bounds `2 <= k < n`.
#[test]
fn test_fold_count_bounds() {
    for k in [0, 1, 13, 20] {
        let err = FoldPartition::new(13, k, FoldScheme::Interleaved, None).unwrap_err();
        assert_eq!(err, UqError::InvalidFoldCount { k, sample_size: 13 });
        assert!(err.is_invalid_argument());
    }
    assert!(FoldPartition::new(13, 2, FoldScheme::Interleaved, None).is_ok());
    assert!(FoldPartition::new(13, 12, FoldScheme::Balanced, None).is_ok());
}

/// Test FoldScheme default.
#[test]
fn test_fold_scheme_default() {
    assert_eq!(FoldScheme::default(), FoldScheme::Interleaved);
    assert_ne!(FoldScheme::Interleaved, FoldScheme::Balanced);
}

// ============================================================================
// Interleaved Tests
// ============================================================================

/// Test interleaved membership for N = 13, K = 4.
#[test]
fn test_interleaved_membership() {
    let p = FoldPartition::new(13, 4, FoldScheme::Interleaved, None).unwrap();

    assert_eq!(p.fold_count(), 4);
    assert_eq!(p.sample_size(), 13);
    assert_eq!(p.test_indices(0), &[0, 4, 8]);
    assert_eq!(p.test_indices(1), &[1, 5, 9]);
    assert_eq!(p.test_indices(2), &[2, 6, 10]);
    assert_eq!(p.test_indices(3), &[3, 7, 11]);
    assert_eq!(p.held_out_counts(), vec![3, 3, 3, 3]);
    assert_eq!(p.total_held_out(), 12);
}

/// Test the interleaved tail is never held out and always trained on.
#[test]
fn test_interleaved_tail() {
    let p = FoldPartition::new(13, 4, FoldScheme::Interleaved, None).unwrap();
    assert_eq!(p.never_held_out(), vec![12]);
    for fold in 0..4 {
        assert!(p.train_indices(fold).contains(&12));
    }

    let even = FoldPartition::new(12, 4, FoldScheme::Interleaved, None).unwrap();
    assert!(even.never_held_out().is_empty());
}

/// Test train and test sets are complementary and sorted.
#[test]
fn test_train_complements_test() {
    let p = FoldPartition::new(13, 4, FoldScheme::Interleaved, None).unwrap();
    for fold in 0..4 {
        let test = p.test_indices(fold);
        let train = p.train_indices(fold);
        assert_eq!(test.len() + train.len(), 13);
        assert!(train.windows(2).all(|w| w[0] < w[1]));
        assert!(train.iter().all(|i| !test.contains(i)));
    }
    assert_eq!(p.train_indices(0), vec![1, 2, 3, 5, 6, 7, 9, 10, 11, 12]);
}

// ============================================================================
// Balanced Tests
// ============================================================================

/// Test balanced blocks for N = 13, K = 4.
#[test]
fn test_balanced_blocks() {
    let p = FoldPartition::new(13, 4, FoldScheme::Balanced, None).unwrap();

    assert_eq!(p.held_out_counts(), vec![4, 3, 3, 3]);
    assert_eq!(p.test_indices(0), &[0, 1, 2, 3]);
    assert_eq!(p.test_indices(1), &[4, 5, 6]);
    assert_eq!(p.test_indices(2), &[7, 8, 9]);
    assert_eq!(p.test_indices(3), &[10, 11, 12]);
    assert!(p.never_held_out().is_empty());
    assert_eq!(p.total_held_out(), 13);
}

/// Test balanced partitions cover every index exactly once.
#[test]
fn test_balanced_coverage() {
    for (n, k) in [(10, 3), (17, 5), (100, 7), (5, 4)] {
        let p = FoldPartition::new(n, k, FoldScheme::Balanced, None).unwrap();
        let mut seen = vec![0usize; n];
        for fold in 0..k {
            for &i in p.test_indices(fold) {
                seen[i] += 1;
            }
        }
        assert!(seen.iter().all(|&c| c == 1), "n={} k={}", n, k);

        let counts = p.held_out_counts();
        let max = *counts.iter().max().unwrap();
        let min = *counts.iter().min().unwrap();
        assert!(max - min <= 1);
    }
}

/// Test leave-one-out partition.
#[test]
fn test_leave_one_out_partition() {
    let p = FoldPartition::leave_one_out(5);
    assert_eq!(p.fold_count(), 5);
    for i in 0..5 {
        assert_eq!(p.test_indices(i), &[i]);
        assert_eq!(p.train_indices(i).len(), 4);
    }
    assert!(p.never_held_out().is_empty());
}

// ============================================================================
// Shuffling Tests
// ============================================================================

/// Test seeded partitions are reproducible and keep their shape.
#[test]
fn test_seeded_shuffle() {
    let a = FoldPartition::new(13, 4, FoldScheme::Interleaved, Some(42)).unwrap();
    let b = FoldPartition::new(13, 4, FoldScheme::Interleaved, Some(42)).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.held_out_counts(), vec![3, 3, 3, 3]);
    assert_eq!(a.never_held_out().len(), 1);

    let balanced = FoldPartition::new(13, 4, FoldScheme::Balanced, Some(7)).unwrap();
    assert_eq!(balanced.held_out_counts(), vec![4, 3, 3, 3]);
    assert!(balanced.never_held_out().is_empty());
    for fold in 0..4 {
        let test = balanced.test_indices(fold);
        assert!(test.windows(2).all(|w| w[0] < w[1]));
    }
}

// ============================================================================
// Index Delta Tests
// ============================================================================

/// Test delta between two consecutive interleaved training sets.
#[test]
fn test_index_delta_between_folds() {
    let p = FoldPartition::new(13, 4, FoldScheme::Interleaved, None).unwrap();
    let delta = IndexDelta::between(&p.train_indices(0), &p.train_indices(1));

    assert_eq!(delta.added, vec![0, 4, 8]);
    assert_eq!(delta.removed, vec![1, 5, 9]);
    assert_eq!(delta.conserved, vec![2, 3, 6, 7, 10, 11, 12]);
    assert!(!delta.is_empty());
}

/// Test delta edge cases.
#[test]
fn test_index_delta_edges() {
    let same = IndexDelta::between(&[1, 2, 3], &[1, 2, 3]);
    assert!(same.is_empty());
    assert_eq!(same.conserved, vec![1, 2, 3]);

    let from_empty = IndexDelta::between(&[], &[0, 1]);
    assert_eq!(from_empty.added, vec![0, 1]);
    assert!(from_empty.removed.is_empty());

    let to_empty = IndexDelta::between(&[4, 9], &[]);
    assert_eq!(to_empty.removed, vec![4, 9]);
    assert!(to_empty.conserved.is_empty());
}
