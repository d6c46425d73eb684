//! Linear algebra backend for least-squares fitting.
//!
//! ## Purpose
//!
//! This module provides a trait-based abstraction over the dense
//! factorizations used by least-squares meta-models: QR, SVD and Cholesky of
//! the Gram matrix. It also exposes the quantities derived from those
//! factors: coefficients, hat-matrix diagonal (leverages) and the diagonal
//! of the Gram inverse.
//!
//! ## Design notes
//!
//! * Factors are stored as flat column-major buffers inside [`Factors`], so
//!   callers stay generic over `Float` while the arithmetic runs on nalgebra.
//! * QR (Householder) is the default: it never forms `XᵀX` and keeps the
//!   condition number of `X`.
//! * SVD truncates singular values below `eps * max(n, p) * sigma_max`,
//!   giving the minimum-norm solution for rank-deficient designs.
//! * Cholesky works on `XᵀX`, which can be updated row by row; the f64 rank-one
//!   update runs on `f64x2` lanes.
//!
//! ## Invariants
//!
//! * Design buffers handed to this module are row-major `rows × cols`.
//! * Factor buffers are column-major.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::{format, vec::Vec};
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use core::fmt::Debug;
use nalgebra::{DMatrix, DVector};
use num_traits::Float;
use wide::f64x2;

// Internal dependencies
use crate::primitives::errors::UqError;

// ============================================================================
// Decomposition
// ============================================================================

/// Factorization used to solve the least-squares problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Decomposition {
    /// Householder QR of the design matrix.
    #[default]
    Qr,

    /// Singular value decomposition of the design matrix.
    Svd,

    /// Cholesky factorization of the Gram matrix `XᵀX`.
    Cholesky,
}

/// Factors of a design matrix restricted to its active rows.
#[derive(Debug, Clone, PartialEq)]
pub enum Factors<T> {
    /// Thin QR: `q` is `rows × cols`, `r` is `cols × cols`.
    Qr {
        /// Number of active rows.
        rows: usize,
        /// Number of basis functions.
        cols: usize,
        /// Orthonormal factor.
        q: Vec<T>,
        /// Upper triangular factor.
        r: Vec<T>,
    },

    /// Cholesky of the Gram matrix: `gram = l * lᵀ`.
    Cholesky {
        /// Number of basis functions.
        cols: usize,
        /// Gram matrix `XᵀX`, kept for incremental updates.
        gram: Vec<T>,
        /// Lower triangular factor.
        l: Vec<T>,
    },

    /// Thin SVD: `x = u * diag(singular_values) * v_t`.
    Svd {
        /// Number of active rows.
        rows: usize,
        /// Number of basis functions.
        cols: usize,
        /// Left singular vectors, `rows × min(rows, cols)`.
        u: Vec<T>,
        /// Singular values.
        singular_values: Vec<T>,
        /// Right singular vectors, `min(rows, cols) × cols`.
        v_t: Vec<T>,
        /// Singular values at or below this are treated as zero.
        tolerance: T,
    },
}

// ============================================================================
// FloatLinalg Trait
// ============================================================================

/// Helper trait to bridge generic Float types to the nalgebra backend.
pub trait FloatLinalg: Float + Debug + Send + Sync + 'static {
    /// Factorize the row-major `rows × cols` design `x`.
    fn factorize(
        x: &[Self],
        rows: usize,
        cols: usize,
        method: Decomposition,
    ) -> Result<Factors<Self>, UqError>;

    /// Cholesky-factorize a column-major Gram matrix.
    fn factorize_gram(gram: Vec<Self>, cols: usize) -> Result<Factors<Self>, UqError>;

    /// Least-squares coefficients for observations `y`.
    ///
    /// `x` is the same row-major design the factors were built from.
    fn solve_factored(factors: &Factors<Self>, x: &[Self], y: &[Self])
        -> Result<Vec<Self>, UqError>;

    /// Diagonal of the hat matrix `X (XᵀX)⁻¹ Xᵀ`.
    fn hat_diagonal(factors: &Factors<Self>, x: &[Self]) -> Result<Vec<Self>, UqError>;

    /// Diagonal of `(XᵀX)⁻¹`.
    fn gram_inverse_diagonal(factors: &Factors<Self>) -> Result<Vec<Self>, UqError>;

    /// `gram += weight * row * rowᵀ` on a square `row.len()` matrix.
    fn rank_update(gram: &mut [Self], row: &[Self], weight: Self);
}

// ============================================================================
// Gram Accumulation
// ============================================================================

/// Scalar rank-one update of a symmetric matrix.
pub fn rank_update_scalar<T: Float>(gram: &mut [T], row: &[T], weight: T) {
    let p = row.len();
    for a in 0..p {
        let s = weight * row[a];
        if s == T::zero() {
            continue;
        }
        let col = &mut gram[a * p..(a + 1) * p];
        for (g, &xb) in col.iter_mut().zip(row.iter()) {
            *g = *g + s * xb;
        }
    }
}

/// Rank-one update of a symmetric f64 matrix, two columns at a time.
pub fn rank_update_f64(gram: &mut [f64], row: &[f64], weight: f64) {
    let p = row.len();
    for a in 0..p {
        let s = weight * row[a];
        if s == 0.0 {
            continue;
        }
        let sv = f64x2::splat(s);
        let col = &mut gram[a * p..(a + 1) * p];
        let mut b = 0;
        while b + 2 <= p {
            let acc = f64x2::new([col[b], col[b + 1]]) + sv * f64x2::new([row[b], row[b + 1]]);
            let out = acc.to_array();
            col[b] = out[0];
            col[b + 1] = out[1];
            b += 2;
        }
        if b < p {
            col[b] += s * row[b];
        }
    }
}

// ============================================================================
// Nalgebra Backend Implementation
// ============================================================================

macro_rules! impl_float_linalg {
    ($t:ident, $rank_update:path) => {
        impl FloatLinalg for $t {
            fn factorize(
                x: &[$t],
                rows: usize,
                cols: usize,
                method: Decomposition,
            ) -> Result<Factors<$t>, UqError> {
                if rows == 0 || cols == 0 {
                    return Err(UqError::EmptyInput);
                }
                if x.len() != rows * cols {
                    return Err(UqError::InvalidArgument(format!(
                        "design buffer has {} values, expected {} x {}",
                        x.len(),
                        rows,
                        cols
                    )));
                }
                let tol_scale = $t::EPSILON * (rows.max(cols) as $t);

                match method {
                    Decomposition::Qr => {
                        if rows < cols {
                            return Err(UqError::SingularSystem(format!(
                                "{} rows cannot determine {} coefficients",
                                rows, cols
                            )));
                        }
                        let qr = DMatrix::<$t>::from_row_slice(rows, cols, x).qr();
                        let r = qr.r();
                        let max_diag = (0..cols).map(|i| r[(i, i)].abs()).fold(0.0, $t::max);
                        let tol = tol_scale * max_diag;
                        if max_diag == 0.0 || (0..cols).any(|i| r[(i, i)].abs() <= tol) {
                            return Err(UqError::SingularSystem(format!(
                                "rank-deficient {} x {} design",
                                rows, cols
                            )));
                        }
                        Ok(Factors::Qr {
                            rows,
                            cols,
                            q: qr.q().as_slice().to_vec(),
                            r: r.as_slice().to_vec(),
                        })
                    }
                    Decomposition::Cholesky => {
                        let mut gram = vec![0.0; cols * cols];
                        for row in x.chunks_exact(cols) {
                            $rank_update(&mut gram, row, 1.0);
                        }
                        Self::factorize_gram(gram, cols)
                    }
                    Decomposition::Svd => {
                        let svd = DMatrix::<$t>::from_row_slice(rows, cols, x).svd(true, true);
                        let (u, v_t) = match (svd.u, svd.v_t) {
                            (Some(u), Some(v_t)) => (u, v_t),
                            _ => {
                                return Err(UqError::InternalError(
                                    "SVD did not return singular vectors".into(),
                                ))
                            }
                        };
                        let singular_values = svd.singular_values.as_slice().to_vec();
                        let max_sigma = singular_values.iter().copied().fold(0.0, $t::max);
                        if max_sigma <= 0.0 {
                            return Err(UqError::SingularSystem(format!(
                                "zero {} x {} design",
                                rows, cols
                            )));
                        }
                        Ok(Factors::Svd {
                            rows,
                            cols,
                            u: u.as_slice().to_vec(),
                            singular_values,
                            v_t: v_t.as_slice().to_vec(),
                            tolerance: tol_scale * max_sigma,
                        })
                    }
                }
            }

            fn factorize_gram(gram: Vec<$t>, cols: usize) -> Result<Factors<$t>, UqError> {
                let matrix = DMatrix::<$t>::from_column_slice(cols, cols, &gram);
                match matrix.cholesky() {
                    Some(chol) => Ok(Factors::Cholesky {
                        cols,
                        l: chol.l().as_slice().to_vec(),
                        gram,
                    }),
                    None => Err(UqError::SingularSystem(format!(
                        "Gram matrix of size {} is not positive definite",
                        cols
                    ))),
                }
            }

            fn solve_factored(
                factors: &Factors<$t>,
                x: &[$t],
                y: &[$t],
            ) -> Result<Vec<$t>, UqError> {
                match factors {
                    Factors::Qr { rows, cols, q, r } => {
                        if y.len() != *rows {
                            return Err(UqError::MismatchedInputs {
                                design_rows: *rows,
                                observations: y.len(),
                            });
                        }
                        let q = DMatrix::from_column_slice(*rows, *cols, q);
                        let r = DMatrix::from_column_slice(*cols, *cols, r);
                        let rhs = q.transpose() * DVector::from_column_slice(y);
                        r.solve_upper_triangular(&rhs)
                            .map(|c| c.as_slice().to_vec())
                            .ok_or_else(|| UqError::SingularSystem("singular R factor".into()))
                    }
                    Factors::Cholesky { cols, l, .. } => {
                        if x.len() != y.len() * *cols {
                            return Err(UqError::MismatchedInputs {
                                design_rows: x.len() / *cols,
                                observations: y.len(),
                            });
                        }
                        let m = DMatrix::from_row_slice(y.len(), *cols, x);
                        let rhs = m.transpose() * DVector::from_column_slice(y);
                        let l = DMatrix::from_column_slice(*cols, *cols, l);
                        let z = l
                            .solve_lower_triangular(&rhs)
                            .ok_or_else(|| UqError::SingularSystem("singular L factor".into()))?;
                        l.transpose()
                            .solve_upper_triangular(&z)
                            .map(|c| c.as_slice().to_vec())
                            .ok_or_else(|| UqError::SingularSystem("singular L factor".into()))
                    }
                    Factors::Svd {
                        rows,
                        cols,
                        u,
                        singular_values,
                        v_t,
                        tolerance,
                    } => {
                        if y.len() != *rows {
                            return Err(UqError::MismatchedInputs {
                                design_rows: *rows,
                                observations: y.len(),
                            });
                        }
                        let k = singular_values.len();
                        let u = DMatrix::from_column_slice(*rows, k, u);
                        let v_t = DMatrix::from_column_slice(k, *cols, v_t);
                        let uty = u.transpose() * DVector::from_column_slice(y);
                        let mut coefficients = vec![0.0; *cols];
                        for (s, &sigma) in singular_values.iter().enumerate() {
                            if sigma > *tolerance {
                                let w = uty[s] / sigma;
                                for (j, c) in coefficients.iter_mut().enumerate() {
                                    *c += w * v_t[(s, j)];
                                }
                            }
                        }
                        Ok(coefficients)
                    }
                }
            }

            fn hat_diagonal(factors: &Factors<$t>, x: &[$t]) -> Result<Vec<$t>, UqError> {
                match factors {
                    Factors::Qr { rows, cols, q, .. } => {
                        let q = DMatrix::from_column_slice(*rows, *cols, q);
                        Ok((0..*rows).map(|i| q.row(i).norm_squared()).collect())
                    }
                    Factors::Cholesky { cols, l, .. } => {
                        let rows = x.len() / *cols;
                        let xt = DMatrix::from_row_slice(rows, *cols, x).transpose();
                        let l = DMatrix::from_column_slice(*cols, *cols, l);
                        let z = l
                            .solve_lower_triangular(&xt)
                            .ok_or_else(|| UqError::SingularSystem("singular L factor".into()))?;
                        Ok((0..rows).map(|i| z.column(i).norm_squared()).collect())
                    }
                    Factors::Svd {
                        rows,
                        u,
                        singular_values,
                        tolerance,
                        ..
                    } => {
                        let k = singular_values.len();
                        let u = DMatrix::from_column_slice(*rows, k, u);
                        Ok((0..*rows)
                            .map(|i| {
                                singular_values
                                    .iter()
                                    .enumerate()
                                    .filter(|(_, &sigma)| sigma > *tolerance)
                                    .map(|(s, _)| u[(i, s)] * u[(i, s)])
                                    .sum()
                            })
                            .collect())
                    }
                }
            }

            fn gram_inverse_diagonal(factors: &Factors<$t>) -> Result<Vec<$t>, UqError> {
                match factors {
                    Factors::Qr { cols, r, .. } => {
                        let r = DMatrix::from_column_slice(*cols, *cols, r);
                        let r_inv = r
                            .solve_upper_triangular(&DMatrix::identity(*cols, *cols))
                            .ok_or_else(|| UqError::SingularSystem("singular R factor".into()))?;
                        Ok((0..*cols).map(|j| r_inv.row(j).norm_squared()).collect())
                    }
                    Factors::Cholesky { cols, l, .. } => {
                        let l = DMatrix::from_column_slice(*cols, *cols, l);
                        let l_inv = l
                            .solve_lower_triangular(&DMatrix::identity(*cols, *cols))
                            .ok_or_else(|| UqError::SingularSystem("singular L factor".into()))?;
                        Ok((0..*cols).map(|j| l_inv.column(j).norm_squared()).collect())
                    }
                    Factors::Svd {
                        cols,
                        singular_values,
                        v_t,
                        tolerance,
                        ..
                    } => {
                        let k = singular_values.len();
                        let v_t = DMatrix::from_column_slice(k, *cols, v_t);
                        Ok((0..*cols)
                            .map(|j| {
                                singular_values
                                    .iter()
                                    .enumerate()
                                    .filter(|(_, &sigma)| sigma > *tolerance)
                                    .map(|(s, &sigma)| v_t[(s, j)] * v_t[(s, j)] / (sigma * sigma))
                                    .sum()
                            })
                            .collect())
                    }
                }
            }

            #[inline]
            fn rank_update(gram: &mut [$t], row: &[$t], weight: $t) {
                $rank_update(gram, row, weight)
            }
        }
    };
}

impl_float_linalg!(f64, rank_update_f64);
impl_float_linalg!(f32, rank_update_scalar);
