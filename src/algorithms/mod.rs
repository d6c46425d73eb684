//! Layer 3: Algorithms
//!
//! # Purpose
//!
//! This layer provides the stateful building blocks of the crate:
//! - Streaming accumulators (moments, extrema, threshold exceedance)
//! - The least-squares method abstraction and its dense implementation
//! - Design matrix evaluation from basis functions
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
//! Layer 3: Algorithms ← You are here
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Streaming accumulators.
pub mod accumulator;

/// Least-squares methods.
pub mod least_squares;

/// Basis function evaluation.
pub mod design;
