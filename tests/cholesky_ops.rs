//! Integration tests for Cholesky factorization
//!
//! Tests verify:
//! - Round trip: L @ L^T ≈ A within 1e-10 for SPD input
//! - L is lower triangular with a strictly positive diagonal
//! - Indefinite and semi-definite inputs yield None, not an error
//! - Tridiagonal compressed form agrees with the dense factorization

use linr::linalg::{cholesky, cholesky_tridiagonal};
use linr::matrix::Matrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ============================================================================
// Helper Functions
// ============================================================================

fn assert_allclose(a: &[f64], b: &[f64], tol: f64, msg: &str) {
    assert_eq!(a.len(), b.len(), "{msg}: length mismatch");
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        assert!(
            (x - y).abs() <= tol,
            "{msg}: element {i} differs: {x} vs {y}"
        );
    }
}

/// Build a well-conditioned SPD matrix as B^T @ B + n*I from seeded noise.
fn random_spd(n: usize, seed: u64) -> Matrix {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut b = Matrix::zeros(n, n);
    for i in 0..n {
        for j in 0..n {
            b.set(i, j, rng.gen_range(-1.0..1.0));
        }
    }
    let mut a = b.transpose().matmul(&b).unwrap();
    for i in 0..n {
        let v = a.get(i, i);
        a.set(i, i, v + n as f64);
    }
    a
}

// ============================================================================
// Dense Factorization
// ============================================================================

#[test]
fn spd_round_trip_within_tolerance() {
    for (n, seed) in [(3, 1u64), (5, 2), (8, 3)] {
        let a = random_spd(n, seed);
        let l = cholesky(&a)
            .unwrap()
            .unwrap_or_else(|| panic!("{n}x{n} SPD matrix rejected as indefinite"));

        let reconstructed = l.matmul(&l.transpose()).unwrap();
        assert_allclose(
            reconstructed.as_slice(),
            a.as_slice(),
            1e-10,
            &format!("{n}x{n} round trip"),
        );
    }
}

#[test]
fn factor_is_lower_triangular_with_positive_diagonal() {
    let a = random_spd(6, 7);
    let l = cholesky(&a).unwrap().expect("SPD");
    for i in 0..6 {
        assert!(l.get(i, i) > 0.0, "diagonal entry [{i},{i}] must be positive");
        for j in (i + 1)..6 {
            assert_eq!(l.get(i, j), 0.0, "upper entry [{i},{j}] must stay zero");
        }
    }
}

#[test]
fn indefinite_input_yields_none() {
    // Eigenvalues 3 and -1: symmetric but indefinite.
    let a = Matrix::from_slice(&[1.0, 2.0, 2.0, 1.0], 2, 2).unwrap();
    assert!(cholesky(&a).unwrap().is_none());
}

#[test]
fn semi_definite_input_yields_none() {
    // Rank-1: the second radicand is exactly zero, which does not factor.
    let a = Matrix::from_slice(&[1.0, 1.0, 1.0, 1.0], 2, 2).unwrap();
    assert!(cholesky(&a).unwrap().is_none());
}

#[test]
fn non_square_input_is_an_error() {
    assert!(cholesky(&Matrix::zeros(3, 4)).is_err());
}

#[test]
fn empty_matrix_factors_trivially() {
    let l = cholesky(&Matrix::zeros(0, 0)).unwrap().expect("vacuously SPD");
    assert_eq!(l.rows(), 0);
}

// ============================================================================
// Tridiagonal Compressed Form
// ============================================================================

#[test]
fn tridiagonal_squares_match_the_dense_factor() {
    // Diagonally dominant, hence SPD.
    let diag = [4.0, 5.0, 4.5, 6.0, 5.5];
    let off = [1.0, -1.5, 2.0, -0.5];

    let (d_sq, e_sq) = cholesky_tridiagonal(&diag, &off)
        .unwrap()
        .expect("dominant tridiagonal is SPD");

    let n = diag.len();
    let mut dense = Matrix::zeros(n, n);
    for i in 0..n {
        dense.set(i, i, diag[i]);
    }
    for i in 0..off.len() {
        dense.set(i + 1, i, off[i]);
        dense.set(i, i + 1, off[i]);
    }
    let l = cholesky(&dense).unwrap().expect("SPD");

    for i in 0..n {
        let expected = l.get(i, i) * l.get(i, i);
        assert!(
            (d_sq[i] - expected).abs() < 1e-12,
            "diagonal square {i}: {} vs {expected}",
            d_sq[i]
        );
    }
    for i in 0..off.len() {
        let expected = l.get(i + 1, i) * l.get(i + 1, i);
        assert!(
            (e_sq[i] - expected).abs() < 1e-12,
            "off-diagonal square {i}: {} vs {expected}",
            e_sq[i]
        );
    }
}

#[test]
fn tridiagonal_indefinite_yields_none() {
    // Second pivot: 1 - 4/2 < 0.
    assert!(cholesky_tridiagonal(&[2.0, 1.0], &[2.0]).unwrap().is_none());
}

#[test]
fn tridiagonal_length_mismatch_is_an_error() {
    assert!(cholesky_tridiagonal(&[1.0, 2.0, 3.0], &[0.5]).is_err());
}
