//! Layer 1: Primitives
//!
//! # Purpose
//!
//! This layer provides the data structures every other layer builds on:
//! - The error type
//! - The rectangular `Sample` container
//! - Fold partitions and index deltas
//! - Point histories
//! - Reusable scratch buffers
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
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives ← You are here
//! ```

/// Error type.
pub mod errors;

/// Row-major sample container.
pub mod sample;

/// Fold partitions for cross-validation.
pub mod partition;

/// Point histories and the compact reservoir.
pub mod history;

/// Scratch buffers for validation runs.
pub mod buffer;
