//! Dense linear-algebra kernels
//!
//! The centerpiece is the eigenvalue pipeline: Householder reduction to
//! Hessenberg form, shifted implicit QR sweeps built from Givens rotation
//! chains, a deflating Schur driver, and the eigenvalue walk over the
//! resulting quasi-triangular factor. Cholesky factorization stands on its
//! own next to it.

pub mod chain;
pub mod cholesky;
pub mod eigen;
pub mod givens;
pub mod hessenberg;
pub mod qr_step;
pub mod schur;

pub use chain::{ApplyMode, RotationBatch, RotationChain};
pub use cholesky::{cholesky, cholesky_tridiagonal};
pub use eigen::{eigenvalues, eigenvalues_with, Eigenvalues};
pub use givens::GivensRotation;
pub use hessenberg::hessenberg_reduce;
pub use qr_step::{wilkinson_shift, QrStep, ShiftStrategy};
pub use schur::{schur_decompose, SchurForm, SchurOptions};

use crate::error::{Error, Result};
use crate::matrix::Matrix;

/// Check that `m` is square and return its order.
pub(crate) fn validate_square(m: &Matrix) -> Result<usize> {
    if !m.is_square() {
        return Err(Error::NotSquare {
            rows: m.rows(),
            cols: m.cols(),
        });
    }
    Ok(m.rows())
}
