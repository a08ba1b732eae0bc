//! One iteration of the implicit QR algorithm on a Hessenberg active range
//!
//! A step factors the active block `A = Q R` with a single Givens sweep and
//! immediately forms `R Q` (plus the shift bookkeeping), which is similar to
//! `A` and one step closer to Schur form. The rotations are recorded in a
//! [`RotationChain`] so the exact same sequence can be replayed on a partner
//! matrix.

use super::chain::{ApplyMode, RotationChain};
use super::givens::GivensRotation;
use crate::matrix::Matrix;
use crate::parallel::WorkerPool;

/// Shift selection for a QR sweep, fixed once per decomposition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ShiftStrategy {
    /// Unshifted sweep (`A -> R Q`); slow but unconditionally safe
    None,
    /// Wilkinson shift: the eigenvalue of the trailing 2x2 block closest to
    /// the bottom-right entry
    #[default]
    Wilkinson,
}

/// One implicit QR iteration over an active sub-block of a Hessenberg matrix.
#[derive(Clone, Copy, Debug)]
pub struct QrStep {
    strategy: ShiftStrategy,
    epsilon: f64,
}

impl QrStep {
    /// Step with the given shift strategy and deflation epsilon
    pub fn new(strategy: ShiftStrategy, epsilon: f64) -> Self {
        Self { strategy, epsilon }
    }

    /// Deflation threshold for the sub-diagonal entry at `(k + 1, k)`.
    ///
    /// Scaled by the neighbouring diagonal magnitudes, floored at the raw
    /// epsilon, matching the working precision of the iterate.
    fn negligible(&self, h: &Matrix, k: usize) -> bool {
        let scale = (h.get(k, k).abs() + h.get(k + 1, k + 1).abs()).max(1.0);
        h.get(k + 1, k).abs() <= self.epsilon * scale
    }

    /// Run one sweep on the active range `[begin, end)`.
    ///
    /// The working matrix is updated in `Upper`/`Deflate` mode; `partner`, if
    /// present, receives the identical rotation sequence in `Full` mode.
    /// Returns the deflation boundary `k` (`begin < k < end`) where a
    /// sub-diagonal entry became negligible, or `None` if no deflation
    /// occurred this iteration.
    ///
    /// Ranges of size <= 2 are the driver's job and must not be passed here.
    pub fn step(
        &self,
        h: &mut Matrix,
        begin: usize,
        end: usize,
        partner: Option<&mut Matrix>,
        pool: &WorkerPool,
    ) -> Option<usize> {
        // A non-finite shift estimate means the trailing block is already
        // degenerate; recover locally by falling back to an unshifted sweep.
        let shift = match self.strategy {
            ShiftStrategy::None => 0.0,
            ShiftStrategy::Wilkinson => wilkinson_shift(h, begin, end).unwrap_or(0.0),
        };
        self.sweep(h, begin, end, shift, partner, pool)
    }

    /// Run one sweep with an explicit shift (the driver uses this for its
    /// exceptional ad-hoc shifts).
    pub(crate) fn sweep(
        &self,
        h: &mut Matrix,
        begin: usize,
        end: usize,
        shift: f64,
        partner: Option<&mut Matrix>,
        pool: &WorkerPool,
    ) -> Option<usize> {
        debug_assert!(end - begin > 2, "trivial range [{begin}, {end})");
        debug_assert!(end <= h.rows());

        if shift != 0.0 {
            for i in begin..end {
                let v = h.get(i, i);
                h.set(i, i, v - shift);
            }
        }

        // Serial QR sweep: one rotation per adjacent row pair, folded into
        // the rows immediately so the next rotation sees the updated pivot.
        // Rotation parameters for pair k+1 depend on the result of pair k,
        // which is why this pre-pass can never be parallel.
        let cols = h.cols();
        let mut chain = RotationChain::with_capacity(end - begin - 1);
        for k in begin..(end - 1) {
            let rot = GivensRotation::new(h.get(k, k), h.get(k + 1, k));
            let (upper, lower) = h.two_rows_mut(k, k + 1);
            rot.apply_left(&mut upper[k..cols], &mut lower[k..cols]);
            chain.push(k, rot);
        }

        // R @ Q: replay the fixed chain on the columns.
        chain.apply_right_parallel(h, ApplyMode::Deflate, pool);

        if shift != 0.0 {
            for i in begin..end {
                let v = h.get(i, i);
                h.set(i, i, v + shift);
            }
        }

        if let Some(p) = partner {
            chain.apply_right_parallel(p, ApplyMode::Full, pool);
        }

        // Deflate mode: scan the active sub-diagonal, bottom first (the
        // trailing eigenvalue converges soonest under the Wilkinson shift).
        for k in (begin..(end - 1)).rev() {
            if self.negligible(h, k) {
                h.set(k + 1, k, 0.0);
                return Some(k + 1);
            }
        }
        None
    }
}

/// Wilkinson shift from the trailing 2x2 block of `[begin, end)`.
///
/// Picks the eigenvalue of the block closest to the bottom-right entry; for a
/// complex pair the shared real part is used. Returns `None` when the
/// estimate is non-finite.
pub fn wilkinson_shift(h: &Matrix, begin: usize, end: usize) -> Option<f64> {
    debug_assert!(end - begin >= 2 && end >= 2);
    let a = h.get(end - 2, end - 2);
    let b = h.get(end - 2, end - 1);
    let c = h.get(end - 1, end - 2);
    let d = h.get(end - 1, end - 1);

    let trace = a + d;
    let det = a * d - b * c;
    let disc = trace * trace - 4.0 * det;

    let shift = if disc >= 0.0 {
        let sqrt_disc = disc.sqrt();
        let lambda1 = (trace + sqrt_disc) / 2.0;
        let lambda2 = (trace - sqrt_disc) / 2.0;
        if (lambda1 - d).abs() < (lambda2 - d).abs() {
            lambda1
        } else {
            lambda2
        }
    } else {
        trace / 2.0
    };

    shift.is_finite().then_some(shift)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::hessenberg::hessenberg_reduce;

    fn hessenberg_fixture() -> Matrix {
        let mut h = Matrix::from_slice(
            &[
                3.0, 1.0, 0.5, -1.0, //
                2.0, -1.0, 0.25, 1.5, //
                0.7, 0.3, 2.0, 1.0, //
                -0.4, 1.1, 0.6, 0.5,
            ],
            4,
            4,
        )
        .unwrap();
        hessenberg_reduce(&mut h, None);
        h
    }

    fn assert_hessenberg(h: &Matrix) {
        let n = h.rows();
        for i in 2..n {
            for j in 0..(i - 1) {
                assert!(
                    h.get(i, j).abs() < 1e-10,
                    "fill-in below subdiagonal at [{i},{j}]: {}",
                    h.get(i, j)
                );
            }
        }
    }

    #[test]
    fn step_preserves_hessenberg_structure_and_trace() {
        let mut h = hessenberg_fixture();
        let trace_before = h.trace().unwrap();
        let step = QrStep::new(ShiftStrategy::Wilkinson, f64::EPSILON);
        step.step(&mut h, 0, 4, None, &WorkerPool::new());
        assert_hessenberg(&h);
        assert!(
            (h.trace().unwrap() - trace_before).abs() < 1e-10,
            "similarity transform changed the trace"
        );
    }

    #[test]
    fn unshifted_step_also_preserves_structure() {
        let mut h = hessenberg_fixture();
        let step = QrStep::new(ShiftStrategy::None, f64::EPSILON);
        step.step(&mut h, 0, 4, None, &WorkerPool::new());
        assert_hessenberg(&h);
    }

    #[test]
    fn partner_receives_the_same_rotations() {
        let mut h = hessenberg_fixture();
        let original = h.clone();
        let mut z = Matrix::identity(4);
        let step = QrStep::new(ShiftStrategy::Wilkinson, f64::EPSILON);
        step.step(&mut h, 0, 4, Some(&mut z), &WorkerPool::new());

        // H_before = Z @ H_after @ Z^T
        let back = z.matmul(&h).unwrap().matmul(&z.transpose()).unwrap();
        for (x, y) in back.as_slice().iter().zip(original.as_slice()) {
            assert!((x - y).abs() < 1e-10, "partner drifted: {x} vs {y}");
        }
    }

    #[test]
    fn wilkinson_shift_prefers_eigenvalue_near_corner() {
        // Trailing block diag(5, 1): eigenvalues 5 and 1, corner entry 1.
        let h = Matrix::from_slice(
            &[
                2.0, 1.0, 0.0, //
                1.0, 5.0, 0.0, //
                0.0, 0.0, 1.0,
            ],
            3,
            3,
        )
        .unwrap();
        let shift = wilkinson_shift(&h, 0, 3).unwrap();
        assert!((shift - 1.0).abs() < 1e-12, "expected 1, got {shift}");
    }

    #[test]
    fn non_finite_shift_estimate_is_rejected() {
        let h = Matrix::from_slice(
            &[1.0, 0.0, 0.0, f64::NAN],
            2,
            2,
        )
        .unwrap();
        assert!(wilkinson_shift(&h, 0, 2).is_none());
    }
}
