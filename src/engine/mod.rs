//! Layer 5: Engine
//!
//! # Purpose
//!
//! This layer orchestrates validation runs:
//! - Parameter and input validation
//! - The scoped row-filter guard
//! - The fold-loop executor
//!
//! # Architecture
//!
//! ```text
//! Layer 6: API
//!   ↓
//! Layer 5: Engine ← You are here
//!   ↓
//! Layer 4: Evaluation
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Input and parameter validation.
pub mod validator;

/// Row-filter restoration guard.
pub mod guard;

/// Fold-loop executor.
pub mod executor;
