//! Reduction to upper-Hessenberg form via Householder reflections
//!
//! The Schur driver requires its input in Hessenberg form (everything below
//! the first sub-diagonal zero); this module establishes that postcondition,
//! optionally accumulating the applied reflections into a partner matrix.

use crate::matrix::Matrix;

/// Reduce `h` to upper-Hessenberg form in place.
///
/// Applies the similarity transform `H = Q0^T @ A @ Q0`. When `partner` is
/// supplied it is multiplied by every reflection on the right, so starting it
/// at the identity leaves it holding `Q0`.
///
/// # Panics
///
/// Panics in debug builds if `h` is not square or `partner` has a different
/// order.
pub fn hessenberg_reduce(h: &mut Matrix, mut partner: Option<&mut Matrix>) {
    debug_assert!(h.is_square());
    let n = h.rows();
    if let Some(p) = partner.as_deref() {
        debug_assert!(p.rows() == n && p.cols() == n);
    }
    if n < 3 {
        return;
    }
    let h = h.as_mut_slice();

    for k in 0..(n - 2) {
        // Householder vector for column k, rows k+1..n
        let mut v = vec![0.0; n - k - 1];
        let mut norm_sq = 0.0;
        for i in (k + 1)..n {
            let val = h[i * n + k];
            v[i - k - 1] = val;
            norm_sq += val * val;
        }
        if norm_sq < f64::EPSILON {
            continue;
        }

        let norm = norm_sq.sqrt();
        let alpha = if v[0] >= 0.0 { -norm } else { norm };
        v[0] -= alpha;

        let v_norm_sq: f64 = v.iter().map(|vi| vi * vi).sum();
        if v_norm_sq < f64::EPSILON {
            continue;
        }
        let v_norm = v_norm_sq.sqrt();
        for vi in &mut v {
            *vi /= v_norm;
        }

        // Left image: H[k+1:n, :] -= 2 * v @ (v^T @ H[k+1:n, :])
        for j in 0..n {
            let mut dot = 0.0;
            for (i, vi) in v.iter().enumerate() {
                dot += vi * h[(k + 1 + i) * n + j];
            }
            for (i, vi) in v.iter().enumerate() {
                h[(k + 1 + i) * n + j] -= 2.0 * vi * dot;
            }
        }

        // Right image: H[:, k+1:n] -= 2 * (H[:, k+1:n] @ v) @ v^T
        for i in 0..n {
            let mut dot = 0.0;
            for (j, vj) in v.iter().enumerate() {
                dot += h[i * n + (k + 1 + j)] * vj;
            }
            for (j, vj) in v.iter().enumerate() {
                h[i * n + (k + 1 + j)] -= 2.0 * dot * vj;
            }
        }

        // Partner picks up the reflection on the right: P = P @ H_k
        if let Some(p) = partner.as_deref_mut() {
            let p = p.as_mut_slice();
            for i in 0..n {
                let mut dot = 0.0;
                for (j, vj) in v.iter().enumerate() {
                    dot += p[i * n + (k + 1 + j)] * vj;
                }
                for (j, vj) in v.iter().enumerate() {
                    p[i * n + (k + 1 + j)] -= 2.0 * dot * vj;
                }
            }
        }
    }
}
