//! Cholesky factorization for symmetric positive-definite matrices
//!
//! A failed radicand is an expected outcome, not an exception: both entry
//! points report "not positive definite" as `Ok(None)` and leave the error
//! channel to genuine precondition violations.

use super::validate_square;
use crate::error::{Error, Result};
use crate::matrix::Matrix;

/// Cholesky factorization `A = L @ L^T` (Cholesky–Banachiewicz, row by row).
///
/// Only the lower triangle of `a` is read; symmetry of the upper triangle is
/// the caller's contract.
///
/// # Errors
///
/// `NotSquare` for non-square input. A non-positive-definite matrix is
/// reported as `Ok(None)`.
pub fn cholesky(a: &Matrix) -> Result<Option<Matrix>> {
    let n = validate_square(a)?;
    let mut l = Matrix::zeros(n, n);

    for i in 0..n {
        // Off-diagonal entries of row i by forward substitution.
        for j in 0..i {
            let mut sum = 0.0;
            for k in 0..j {
                sum += l.get(i, k) * l.get(j, k);
            }
            l.set(i, j, (a.get(i, j) - sum) / l.get(j, j));
        }

        let mut sum_sq = 0.0;
        for k in 0..i {
            let v = l.get(i, k);
            sum_sq += v * v;
        }
        let radicand = a.get(i, i) - sum_sq;
        if radicand <= 0.0 {
            return Ok(None);
        }
        l.set(i, i, radicand.sqrt());
    }

    Ok(Some(l))
}

/// Cholesky factorization of a symmetric tridiagonal matrix, in compressed
/// form.
///
/// Takes the main diagonal and the off-diagonal and returns the **squared**
/// entries of `L`: `(diag(L)^2, offdiag(L)^2)`. Squares are what the usual
/// downstream consumers (determinants, inertia counts) need, and returning
/// them skips a square root per entry.
///
/// # Errors
///
/// `ShapeMismatch` unless `off_diag.len() + 1 == diag.len()` (a length-0
/// diagonal with empty off-diagonal is allowed). A non-positive-definite
/// input is reported as `Ok(None)`.
pub fn cholesky_tridiagonal(diag: &[f64], off_diag: &[f64]) -> Result<Option<(Vec<f64>, Vec<f64>)>> {
    let n = diag.len();
    if off_diag.len() + 1 != n && !(n == 0 && off_diag.is_empty()) {
        return Err(Error::shape_mismatch(
            &[n.saturating_sub(1)],
            &[off_diag.len()],
        ));
    }

    let mut diag_sq = vec![0.0; n];
    let mut off_sq = vec![0.0; off_diag.len()];

    for i in 0..n {
        let mut radicand = diag[i];
        if i > 0 {
            // off_sq[i-1] = off[i-1]^2 / diag_sq[i-1]
            off_sq[i - 1] = off_diag[i - 1] * off_diag[i - 1] / diag_sq[i - 1];
            radicand -= off_sq[i - 1];
        }
        if radicand <= 0.0 {
            return Ok(None);
        }
        diag_sq[i] = radicand;
    }

    Ok(Some((diag_sq, off_sq)))
}
