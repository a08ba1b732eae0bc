//! Givens plane-rotation primitive
//!
//! A rotation is constructed from the `(a, b)` pair it should annihilate:
//! applied on the left to the two-vector `[a, b]` it produces `[r, 0]` with
//! `r = hypot(a, b)`. The same `(cos, sin)` pair is reused for row and
//! column images, raw `(x, y)` pairs, and (transposed) for exact inversion.

/// A 2x2 plane rotation `[[c, s], [-s, c]]`.
///
/// Invariant: `c^2 + s^2 == 1` up to floating tolerance. The degenerate
/// `a == b == 0` construction yields the identity rotation. NaN and infinity
/// propagate per IEEE semantics; nothing is guarded.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GivensRotation {
    c: f64,
    s: f64,
}

impl GivensRotation {
    /// Rotation annihilating `b` against `a`: maps `[a, b]` to `[hypot(a, b), 0]`
    ///
    /// `b == 0` short-circuits to the identity so that repeated construction
    /// over an already-reduced pair cannot flip signs back and forth.
    pub fn new(a: f64, b: f64) -> Self {
        if b == 0.0 {
            return Self::identity();
        }
        let r = a.hypot(b);
        Self { c: a / r, s: b / r }
    }

    /// The identity rotation
    pub fn identity() -> Self {
        Self { c: 1.0, s: 0.0 }
    }

    /// Cosine component
    pub fn c(&self) -> f64 {
        self.c
    }

    /// Sine component
    pub fn s(&self) -> f64 {
        self.s
    }

    /// Whether this rotation is exactly the identity
    pub fn is_identity(&self) -> bool {
        self.c == 1.0 && self.s == 0.0
    }

    /// Exact inverse: the transposed rotation (sign of sin swapped)
    pub fn transpose(&self) -> Self {
        Self {
            c: self.c,
            s: -self.s,
        }
    }

    /// Apply to a raw `(x, y)` pair, returning the rotated pair
    pub fn rotate(&self, x: f64, y: f64) -> (f64, f64) {
        (self.c * x + self.s * y, -self.s * x + self.c * y)
    }

    /// Rotate two equal-length row slices in place (left application)
    ///
    /// # Panics
    ///
    /// Panics if the slices differ in length.
    pub fn apply_left(&self, upper: &mut [f64], lower: &mut [f64]) {
        assert_eq!(upper.len(), lower.len(), "row length mismatch");
        let (c, s) = (self.c, self.s);
        for (u, l) in upper.iter_mut().zip(lower.iter_mut()) {
            let x = *u;
            let y = *l;
            *u = c * x + s * y;
            *l = -s * x + c * y;
        }
    }
}
