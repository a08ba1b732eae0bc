//! Schur decomposition driver: shifted QR iteration with deflation
//!
//! Walks a worklist of active ranges, running one implicit QR sweep at a
//! time until every range has collapsed to 1x1 or 2x2 diagonal blocks
//! (quasi-upper-triangular form). Deflation splits a range in two; a stalled
//! range gets periodic exceptional sweeps, and a range that exhausts its
//! sweep budget is a hard error rather than a silent wrong answer.

use super::hessenberg::hessenberg_reduce;
use super::qr_step::{QrStep, ShiftStrategy};
use super::validate_square;
use crate::error::{Error, Result};
use crate::matrix::Matrix;
use crate::parallel::WorkerPool;

/// Tuning knobs for the Schur iteration.
///
/// The defaults match the convergence behaviour the test suite is calibrated
/// against; override them only with care.
#[derive(Clone, Copy, Debug)]
pub struct SchurOptions {
    /// Negligibility threshold for sub-diagonal entries, scaled by the
    /// neighbouring diagonal magnitudes
    pub epsilon: f64,
    /// Sweep budget per active range: `max_sweeps_per_eigenvalue * range size`
    /// sweeps without a deflation is reported as non-convergence
    pub max_sweeps_per_eigenvalue: usize,
    /// Number of consecutive sweeps without deflation before an exceptional
    /// (ad-hoc shifted) sweep is forced to break symmetry
    pub stall_limit: usize,
    /// Shift strategy used by regular sweeps
    pub shift: ShiftStrategy,
    /// Whether to accumulate the orthogonal partner matrix `Z`
    pub vectors: bool,
}

impl Default for SchurOptions {
    fn default() -> Self {
        Self {
            epsilon: f64::EPSILON,
            max_sweeps_per_eigenvalue: 30,
            stall_limit: 10,
            shift: ShiftStrategy::Wilkinson,
            vectors: true,
        }
    }
}

/// Result of a Schur decomposition: `A = Z @ T @ Z^T`.
#[derive(Clone, Debug)]
pub struct SchurForm {
    /// Quasi-upper-triangular factor: 1x1 blocks are real eigenvalues, 2x2
    /// blocks carry eigenvalue pairs
    pub t: Matrix,
    /// Orthogonal partner accumulating every applied transform; `None` when
    /// `SchurOptions::vectors` was false
    pub z: Option<Matrix>,
}

/// Compute the real Schur form of a square matrix.
///
/// # Errors
///
/// - `NotSquare` for non-square input.
/// - `NonConvergence` if some active range exhausts its sweep budget.
pub fn schur_decompose(a: &Matrix, options: &SchurOptions, pool: &WorkerPool) -> Result<SchurForm> {
    let n = validate_square(a)?;

    let mut t = a.clone();
    let mut z = options.vectors.then(|| Matrix::identity(n));

    if n > 2 {
        hessenberg_reduce(&mut t, z.as_mut());
        iterate(&mut t, z.as_mut(), options, pool)?;
    }

    // Flush negligible sub-diagonals so T is exactly quasi-triangular, and
    // clear the fill-in below them.
    for i in 0..n.saturating_sub(1) {
        let scale = (t.get(i, i).abs() + t.get(i + 1, i + 1).abs()).max(1.0);
        if t.get(i + 1, i).abs() <= options.epsilon * scale {
            t.set(i + 1, i, 0.0);
        }
    }
    for i in 2..n {
        for j in 0..(i - 1) {
            t.set(i, j, 0.0);
        }
    }

    Ok(SchurForm { t, z })
}

/// Drive the worklist of active ranges down to 1x1/2x2 blocks.
fn iterate(
    t: &mut Matrix,
    mut z: Option<&mut Matrix>,
    options: &SchurOptions,
    pool: &WorkerPool,
) -> Result<()> {
    let n = t.rows();
    let step = QrStep::new(options.shift, options.epsilon);
    let stall_limit = options.stall_limit.max(1);

    let mut ranges: Vec<(usize, usize)> = vec![(0, n)];
    while let Some((range_begin, range_end)) = ranges.pop() {
        let mut begin = range_begin;
        let mut end = range_end;
        let mut stalled = 0usize;

        while end - begin > 2 {
            let budget = options.max_sweeps_per_eigenvalue * (end - begin);
            if stalled >= budget {
                return Err(Error::NonConvergence {
                    order: n,
                    iterations: stalled,
                });
            }

            let boundary = if stalled > 0 && stalled % stall_limit == 0 {
                // Exceptional sweep: ad-hoc shift from the trailing
                // sub-diagonal magnitudes breaks shift-symmetric stalls.
                let exceptional =
                    t.get(end - 1, end - 2).abs() + t.get(end - 2, end - 3).abs();
                step.sweep(t, begin, end, exceptional, z.as_mut().map(|p| &mut **p), pool)
            } else {
                step.step(t, begin, end, z.as_mut().map(|p| &mut **p), pool)
            };
            stalled += 1;

            if let Some(k) = boundary {
                stalled = 0;
                // Keep iterating the smaller (more converged) side; queue
                // the other. Order affects performance only.
                if k - begin <= end - k {
                    ranges.push((k, end));
                    end = k;
                } else {
                    ranges.push((begin, k));
                    begin = k;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_quasi_triangular(t: &Matrix, epsilon: f64) {
        let n = t.rows();
        for i in 2..n {
            for j in 0..(i - 1) {
                assert_eq!(t.get(i, j), 0.0, "fill below subdiagonal at [{i},{j}]");
            }
        }
        // No two consecutive nonzero sub-diagonal entries: blocks are <= 2x2.
        for i in 0..n.saturating_sub(2) {
            let lower = t.get(i + 1, i).abs();
            let next = t.get(i + 2, i + 1).abs();
            assert!(
                lower <= epsilon.sqrt() || next <= epsilon.sqrt(),
                "3x3 or larger block at row {i}: {lower}, {next}"
            );
        }
    }

    #[test]
    fn symmetric_matrix_reduces_to_triangular_form() {
        let a = Matrix::from_slice(
            &[
                4.0, 1.0, 1.0, 0.5, //
                1.0, 3.0, 0.2, 0.1, //
                1.0, 0.2, 2.0, 0.3, //
                0.5, 0.1, 0.3, 1.0,
            ],
            4,
            4,
        )
        .unwrap();
        let options = SchurOptions::default();
        let schur = schur_decompose(&a, &options, &WorkerPool::new()).unwrap();
        assert_quasi_triangular(&schur.t, options.epsilon);
        assert!(
            (schur.t.trace().unwrap() - a.trace().unwrap()).abs() < 1e-10,
            "similarity transforms must preserve the trace"
        );
    }

    #[test]
    fn partner_satisfies_similarity_invariant() {
        let a = Matrix::from_slice(
            &[
                1.0, 2.0, 0.0, //
                3.0, 2.0, 1.0, //
                0.5, 1.0, 4.0,
            ],
            3,
            3,
        )
        .unwrap();
        let schur = schur_decompose(&a, &SchurOptions::default(), &WorkerPool::new()).unwrap();
        let z = schur.z.as_ref().expect("vectors requested by default");

        // A = Z @ T @ Z^T
        let back = z.matmul(&schur.t).unwrap().matmul(&z.transpose()).unwrap();
        for (x, y) in back.as_slice().iter().zip(a.as_slice()) {
            assert!((x - y).abs() < 1e-9, "reconstruction drifted: {x} vs {y}");
        }

        // Z^T @ Z = I
        let ztz = z.transpose().matmul(z).unwrap();
        let identity = Matrix::identity(3);
        for (x, y) in ztz.as_slice().iter().zip(identity.as_slice()) {
            assert!((x - y).abs() < 1e-10, "partner lost orthogonality");
        }
    }

    #[test]
    fn vectors_false_skips_the_partner() {
        let a = Matrix::identity(3);
        let options = SchurOptions {
            vectors: false,
            ..Default::default()
        };
        let schur = schur_decompose(&a, &options, &WorkerPool::new()).unwrap();
        assert!(schur.z.is_none());
    }

    #[test]
    fn exhausted_sweep_budget_is_a_hard_error() {
        let a = Matrix::from_slice(
            &[
                1.0, 2.0, 0.5, -1.0, //
                3.0, 2.0, 1.0, 0.25, //
                0.5, 1.0, 4.0, 2.0, //
                -0.3, 0.7, 1.2, -1.0,
            ],
            4,
            4,
        )
        .unwrap();
        // A zero per-eigenvalue allowance exhausts the budget before the
        // first sweep, so the driver must fail instead of looping.
        let options = SchurOptions {
            max_sweeps_per_eigenvalue: 0,
            ..Default::default()
        };
        let err = schur_decompose(&a, &options, &WorkerPool::new());
        assert!(
            matches!(
                err,
                Err(Error::NonConvergence {
                    order: 4,
                    iterations: 0
                })
            ),
            "expected NonConvergence with order and sweep count, got {err:?}"
        );
    }

    #[test]
    fn non_square_input_is_rejected() {
        let a = Matrix::zeros(2, 3);
        let err = schur_decompose(&a, &SchurOptions::default(), &WorkerPool::new());
        assert!(matches!(err, Err(Error::NotSquare { rows: 2, cols: 3 })));
    }

    #[test]
    fn small_orders_pass_through() {
        let a = Matrix::from_slice(&[0.0, -1.0, 1.0, 0.0], 2, 2).unwrap();
        let schur = schur_decompose(&a, &SchurOptions::default(), &WorkerPool::new()).unwrap();
        // A 2x2 block encoding a complex pair is already quasi-triangular.
        assert_eq!(schur.t, a);
    }
}
