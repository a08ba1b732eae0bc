//! Eigenvalue extraction from the real Schur form
//!
//! Eigenvalues are emitted in the order their diagonal blocks appear after
//! Schur reduction — never sorted by magnitude or any canonical order. That
//! ordering is a documented property of the API: reference fixtures are
//! recorded against it.

use super::schur::{schur_decompose, SchurOptions};
use super::validate_square;
use crate::error::Result;
use crate::matrix::Matrix;
use crate::parallel::WorkerPool;

/// The spectrum of a real square matrix.
///
/// `re` and `im` have the same length as the matrix order. A complex pair
/// occupies two adjacent slots with identical real parts and opposite-signed
/// imaginary parts (positive first).
#[derive(Clone, Debug, PartialEq)]
pub struct Eigenvalues {
    /// Real parts, in diagonal-block order
    pub re: Vec<f64>,
    /// Imaginary parts, in diagonal-block order
    pub im: Vec<f64>,
}

impl Eigenvalues {
    /// Number of eigenvalues
    pub fn len(&self) -> usize {
        self.re.len()
    }

    /// Whether the spectrum is empty (0x0 input)
    pub fn is_empty(&self) -> bool {
        self.re.is_empty()
    }
}

/// Compute all eigenvalues of a square matrix with default options.
///
/// # Errors
///
/// - `NotSquare` for non-square input.
/// - `NonConvergence` if the QR iteration exhausts its sweep budget.
pub fn eigenvalues(a: &Matrix) -> Result<Eigenvalues> {
    eigenvalues_with(a, &SchurOptions::default(), &WorkerPool::new())
}

/// Compute all eigenvalues with explicit options and worker pool.
///
/// Sizes 0..=2 are dispatched directly; anything larger goes through
/// Hessenberg reduction and the Schur driver, then a walk over the diagonal
/// blocks of the quasi-triangular factor.
pub fn eigenvalues_with(
    a: &Matrix,
    options: &SchurOptions,
    pool: &WorkerPool,
) -> Result<Eigenvalues> {
    let n = validate_square(a)?;

    match n {
        0 => {
            return Ok(Eigenvalues {
                re: Vec::new(),
                im: Vec::new(),
            })
        }
        1 => {
            return Ok(Eigenvalues {
                re: vec![a.get(0, 0)],
                im: vec![0.0],
            })
        }
        2 => {
            let ((re1, im1), (re2, im2)) =
                solve_two_by_two(a.get(0, 0), a.get(0, 1), a.get(1, 0), a.get(1, 1));
            return Ok(Eigenvalues {
                re: vec![re1, re2],
                im: vec![im1, im2],
            });
        }
        _ => {}
    }

    // The partner matrix is only needed for eigenvectors; skip it here.
    let schur_options = SchurOptions {
        vectors: false,
        ..*options
    };
    let t = schur_decompose(a, &schur_options, pool)?.t;

    let mut re = vec![0.0; n];
    let mut im = vec![0.0; n];
    let mut k = 0;
    while k < n {
        let last = k == n - 1;
        if last || block_boundary(&t, k, options.epsilon) {
            // 1x1 block: real eigenvalue.
            re[k] = t.get(k, k);
            k += 1;
        } else {
            // 2x2 block: real pair or complex-conjugate pair.
            let ((re1, im1), (re2, im2)) = solve_two_by_two(
                t.get(k, k),
                t.get(k, k + 1),
                t.get(k + 1, k),
                t.get(k + 1, k + 1),
            );
            re[k] = re1;
            im[k] = im1;
            re[k + 1] = re2;
            im[k + 1] = im2;
            k += 2;
        }
    }

    Ok(Eigenvalues { re, im })
}

/// Whether the sub-diagonal entry below position `k` is negligible, i.e. the
/// diagonal blocks separate between rows `k` and `k + 1`.
fn block_boundary(t: &Matrix, k: usize, epsilon: f64) -> bool {
    let scale = (t.get(k, k).abs() + t.get(k + 1, k + 1).abs()).max(1.0);
    t.get(k + 1, k).abs() <= epsilon * scale
}

/// Closed-form eigenvalues of `[[a, b], [c, d]]` via the double-shift
/// discriminant: `disc = (trace/2)^2 - det`.
///
/// Non-negative discriminant yields two real eigenvalues `trace/2 ±
/// sqrt(disc)`; a negative one yields the conjugate pair `trace/2 ±
/// i*sqrt(-disc)`, positive imaginary part first.
pub fn solve_two_by_two(a: f64, b: f64, c: f64, d: f64) -> ((f64, f64), (f64, f64)) {
    let half_trace = (a + d) / 2.0;
    let det = a * d - b * c;
    let disc = half_trace * half_trace - det;

    if disc >= 0.0 {
        let sqrt_disc = disc.sqrt();
        ((half_trace + sqrt_disc, 0.0), (half_trace - sqrt_disc, 0.0))
    } else {
        let imag = (-disc).sqrt();
        ((half_trace, imag), (half_trace, -imag))
    }
}
