//! Ordered Givens rotation chains and their application modes
//!
//! A QR sweep produces one rotation per adjacent row pair; the rotations fold
//! into each other, so a chain must always be applied in push order (and its
//! inverse in reverse order). Reordering changes the numerical result.
//!
//! Parallel application never re-derives rotation parameters: the chain is
//! fixed in a serial pre-pass, then applied to disjoint column blocks (row
//! image) or disjoint row chunks (column image) of a single matrix. Each
//! worker owns non-overlapping ranges, so no locking is involved, and the
//! per-element arithmetic is identical to the serial path.

use super::givens::GivensRotation;
use crate::matrix::Matrix;
use crate::parallel::WorkerPool;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Column/row coverage when applying a chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyMode {
    /// Only the ranges that matter for continued Hessenberg iteration:
    /// rotation `k` touches columns `k..` (row image) or rows `..k+2`
    /// (column image). Entries outside those ranges are structurally zero.
    Upper,
    /// Complete ranges. Required for a partner/accumulator matrix, whose
    /// entries carry no structural zeros.
    Full,
    /// Same coverage as `Upper`, and signals that the caller must run a
    /// deflation scan once the application completes.
    Deflate,
}

/// An ordered sequence of rotations, each tagged with the index of the
/// adjacent row/column pair `(k, k + 1)` it acts on.
#[derive(Clone, Debug, Default)]
pub struct RotationChain {
    rotations: Vec<(usize, GivensRotation)>,
}

impl RotationChain {
    /// Empty chain
    pub fn new() -> Self {
        Self {
            rotations: Vec::new(),
        }
    }

    /// Empty chain with room for `capacity` rotations
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rotations: Vec::with_capacity(capacity),
        }
    }

    /// Append a rotation acting on rows/columns `(pair, pair + 1)`
    pub fn push(&mut self, pair: usize, rotation: GivensRotation) {
        self.rotations.push((pair, rotation));
    }

    /// Number of rotations in the chain
    pub fn len(&self) -> usize {
        self.rotations.len()
    }

    /// Whether the chain is empty
    pub fn is_empty(&self) -> bool {
        self.rotations.is_empty()
    }

    /// Tagged rotations in application order
    pub fn iter(&self) -> impl Iterator<Item = &(usize, GivensRotation)> {
        self.rotations.iter()
    }

    /// The exact inverse chain: reversed order, each rotation transposed.
    ///
    /// Applying a chain and then its transpose restores the original matrix
    /// up to floating roundoff.
    pub fn transposed(&self) -> RotationChain {
        Self {
            rotations: self
                .rotations
                .iter()
                .rev()
                .map(|&(pair, rot)| (pair, rot.transpose()))
                .collect(),
        }
    }

    /// Apply the chain on the left: rotation `k` mixes rows `k` and `k + 1`.
    pub fn apply_left(&self, m: &mut Matrix, mode: ApplyMode) {
        let cols = m.cols();
        for &(k, rot) in &self.rotations {
            let start = match mode {
                ApplyMode::Upper | ApplyMode::Deflate => k.min(cols),
                ApplyMode::Full => 0,
            };
            let (upper, lower) = m.two_rows_mut(k, k + 1);
            rot.apply_left(&mut upper[start..], &mut lower[start..]);
        }
    }

    /// Apply the chain on the right: rotation `k` mixes columns `k` and `k + 1`.
    pub fn apply_right(&self, m: &mut Matrix, mode: ApplyMode) {
        let rows = m.rows();
        let cols = m.cols();
        let data = m.as_mut_slice();
        for &(k, rot) in &self.rotations {
            let row_limit = match mode {
                ApplyMode::Upper | ApplyMode::Deflate => (k + 2).min(rows),
                ApplyMode::Full => rows,
            };
            for r in 0..row_limit {
                let base = r * cols;
                let (x, y) = rot.rotate(data[base + k], data[base + k + 1]);
                data[base + k] = x;
                data[base + k + 1] = y;
            }
        }
    }

    /// Parallel left application over disjoint column blocks.
    ///
    /// Falls back to the serial path when the pool decides the matrix is too
    /// small to split, and always when the `rayon` feature is off. Output is
    /// identical to [`RotationChain::apply_left`] in every case.
    pub fn apply_left_parallel(&self, m: &mut Matrix, mode: ApplyMode, pool: &WorkerPool) {
        #[cfg(feature = "rayon")]
        {
            let block_count = pool.block_count(m.cols());
            if block_count > 1 && !self.is_empty() {
                self.apply_left_blocks(m, mode, pool, block_count);
                return;
            }
        }
        #[cfg(not(feature = "rayon"))]
        let _ = pool;

        self.apply_left(m, mode);
    }

    /// Parallel right application over disjoint row chunks.
    ///
    /// Output is identical to [`RotationChain::apply_right`] in every case.
    pub fn apply_right_parallel(&self, m: &mut Matrix, mode: ApplyMode, pool: &WorkerPool) {
        #[cfg(feature = "rayon")]
        {
            let rows = m.rows();
            let cols = m.cols();
            let rows_per_chunk = pool.min_chunk().div_ceil(cols.max(1)).max(1);
            if pool.threads() > 1 && rows / rows_per_chunk > 1 && !self.is_empty() {
                let rotations = &self.rotations;
                pool.install(|| {
                    m.as_mut_slice()
                        .par_chunks_mut(cols)
                        .enumerate()
                        .with_min_len(rows_per_chunk)
                        .for_each(|(r, row)| {
                            for &(k, rot) in rotations {
                                let row_limit = match mode {
                                    ApplyMode::Upper | ApplyMode::Deflate => (k + 2).min(rows),
                                    ApplyMode::Full => rows,
                                };
                                if r < row_limit {
                                    let (x, y) = rot.rotate(row[k], row[k + 1]);
                                    row[k] = x;
                                    row[k + 1] = y;
                                }
                            }
                        });
                });
                return;
            }
        }
        #[cfg(not(feature = "rayon"))]
        let _ = pool;

        self.apply_right(m, mode);
    }

    #[cfg(feature = "rayon")]
    fn apply_left_blocks(
        &self,
        m: &mut Matrix,
        mode: ApplyMode,
        pool: &WorkerPool,
        block_count: usize,
    ) {
        let rows = m.rows();
        let cols = m.cols();
        let block_width = cols.div_ceil(block_count);

        // Carve every row into the same column blocks, regrouped per block so
        // each worker owns a full-height, non-overlapping vertical stripe.
        let mut blocks: Vec<Vec<&mut [f64]>> = (0..block_count)
            .map(|_| Vec::with_capacity(rows))
            .collect();
        for row in m.as_mut_slice().chunks_mut(cols) {
            let mut rest = row;
            for block in blocks.iter_mut() {
                let width = block_width.min(rest.len());
                let (head, tail) = std::mem::take(&mut rest).split_at_mut(width);
                block.push(head);
                rest = tail;
            }
        }

        let rotations = &self.rotations;
        pool.install(|| {
            blocks
                .into_par_iter()
                .enumerate()
                .for_each(|(b, mut stripe)| {
                    let col_offset = b * block_width;
                    let width = stripe.first().map_or(0, |row| row.len());
                    for &(k, rot) in rotations {
                        let start_global = match mode {
                            ApplyMode::Upper | ApplyMode::Deflate => k,
                            ApplyMode::Full => 0,
                        };
                        let start = start_global.saturating_sub(col_offset);
                        if start >= width {
                            continue;
                        }
                        let (head, tail) = stripe.split_at_mut(k + 1);
                        rot.apply_left(&mut head[k][start..], &mut tail[0][start..]);
                    }
                });
        });
    }
}

/// A rotation sequence with a distinguished head and tail, as produced by
/// three-point butterfly updates: the head and tail have a different update
/// shape from the interior, which always comes in pairs.
///
/// The sequence is applied in exact order — head, each interior pair in turn,
/// tail — because every rotation folds into the next.
#[derive(Clone, Debug)]
pub struct RotationBatch {
    /// Opening rotation
    pub first: GivensRotation,
    /// Interior rotations, applied pairwise in order
    pub pairs: Vec<(GivensRotation, GivensRotation)>,
    /// Closing rotation
    pub last: GivensRotation,
}

impl RotationBatch {
    /// Apply the full sequence to a raw `(x, y)` pair in place
    pub fn apply(&self, x: &mut f64, y: &mut f64) {
        let (nx, ny) = self.first.rotate(*x, *y);
        let (mut cx, mut cy) = (nx, ny);
        for (p, q) in &self.pairs {
            let (px, py) = p.rotate(cx, cy);
            let (qx, qy) = q.rotate(px, py);
            cx = qx;
            cy = qy;
        }
        let (fx, fy) = self.last.rotate(cx, cy);
        *x = fx;
        *y = fy;
    }

    /// The exact inverse sequence
    pub fn transposed(&self) -> RotationBatch {
        RotationBatch {
            first: self.last.transpose(),
            pairs: self
                .pairs
                .iter()
                .rev()
                .map(|(p, q)| (q.transpose(), p.transpose()))
                .collect(),
            last: self.first.transpose(),
        }
    }
}
