//! Layer 2: Math
//!
//! # Purpose
//!
//! This layer provides pure mathematical functions used throughout the crate:
//! - Dense factorizations behind the least-squares solvers
//! - Central moment update and merge formulas
//! - Hat matrix statistics for leave-one-out shortcuts
//!
//! These are reusable mathematical building blocks with no algorithm-specific logic.
//!
//! # Architecture
//!
//! ```text
//! Layer 6: API
//!   ↓
//! Layer 5: Engine
//!   ↓
//! Layer 4: Evaluation
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math ← You are here
//!   ↓
//! Layer 1: Primitives
//! ```

/// Linear algebra backend (QR, SVD, Cholesky).
pub mod linalg;

/// Central moment sums.
pub mod moments;

/// Hat matrix statistics.
pub mod hat_matrix;
