//! Layer 4: Evaluation
//!
//! # Purpose
//!
//! This layer describes what a validation run measures:
//! - Cross-validation strategies and their configuration
//! - The validation result and its error metrics
//!
//! # Architecture
//!
//! ```text
//! Layer 6: API
//!   ↓
//! Layer 5: Engine
//!   ↓
//! Layer 4: Evaluation ← You are here
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Cross-validation strategies.
pub mod cv;

/// Validation results and metrics.
pub mod metrics;
