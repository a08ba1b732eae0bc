//! Row-major dense matrix over `f64`
//!
//! `Matrix` is the storage layer every algorithm in this crate mutates in
//! place: a single flat buffer indexed `i * cols + j`, with bounds-checked
//! element accessors and live row slices.
//!
//! # Row access contract
//!
//! `row` / `row_mut` return slices that alias the owned buffer directly, so
//! mutating through `row_mut` is immediately visible to every other accessor.
//! No defensive copies are made anywhere. `set_row` exists as a checked bulk
//! replacement for callers that assembled a row elsewhere.

use crate::error::{Error, Result};

/// Dense row-major matrix of `f64` values.
///
/// Invariant: `data.len() == rows * cols`, every row has the same length.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl Matrix {
    /// Create a matrix of zeros
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0.0; rows * cols],
            rows,
            cols,
        }
    }

    /// Create the n x n identity matrix
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.data[i * n + i] = 1.0;
        }
        m
    }

    /// Create a matrix from a flat row-major slice
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` if `data.len() != rows * cols`.
    pub fn from_slice(data: &[f64], rows: usize, cols: usize) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::shape_mismatch(&[rows, cols], &[data.len()]));
        }
        Ok(Self {
            data: data.to_vec(),
            rows,
            cols,
        })
    }

    /// Create a matrix from per-row vectors
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` if the rows do not all have the same length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(nrows * ncols);
        for row in rows {
            if row.len() != ncols {
                return Err(Error::shape_mismatch(&[nrows, ncols], &[nrows, row.len()]));
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            data,
            rows: nrows,
            cols: ncols,
        })
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Whether the matrix is square
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Element at `(i, j)`
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is out of bounds.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.rows && j < self.cols, "index ({i}, {j}) out of bounds");
        self.data[i * self.cols + j]
    }

    /// Set element at `(i, j)`
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is out of bounds.
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        assert!(i < self.rows && j < self.cols, "index ({i}, {j}) out of bounds");
        self.data[i * self.cols + j] = value;
    }

    /// Live view of row `i`
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Live mutable view of row `i`
    pub fn row_mut(&mut self, i: usize) -> &mut [f64] {
        &mut self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Replace row `i` with `values`
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` if `values.len() != cols`.
    pub fn set_row(&mut self, i: usize, values: &[f64]) -> Result<()> {
        if values.len() != self.cols {
            return Err(Error::shape_mismatch(&[self.cols], &[values.len()]));
        }
        self.row_mut(i).copy_from_slice(values);
        Ok(())
    }

    /// Simultaneous mutable views of rows `i` and `j`
    ///
    /// # Panics
    ///
    /// Panics unless `i < j < rows`.
    pub fn two_rows_mut(&mut self, i: usize, j: usize) -> (&mut [f64], &mut [f64]) {
        assert!(i < j && j < self.rows, "row pair ({i}, {j}) out of bounds");
        let cols = self.cols;
        let (head, tail) = self.data.split_at_mut(j * cols);
        (
            &mut head[i * cols..(i + 1) * cols],
            &mut tail[..cols],
        )
    }

    /// Flat row-major view of the whole buffer
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Flat mutable row-major view of the whole buffer
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Transposed copy
    pub fn transpose(&self) -> Matrix {
        let mut out = Matrix::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                out.data[j * self.rows + i] = self.data[i * self.cols + j];
            }
        }
        out
    }

    /// Matrix product `self @ other`
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` if the inner dimensions disagree.
    pub fn matmul(&self, other: &Matrix) -> Result<Matrix> {
        if self.cols != other.rows {
            return Err(Error::shape_mismatch(
                &[self.cols, other.cols],
                &[other.rows, other.cols],
            ));
        }
        let mut out = Matrix::zeros(self.rows, other.cols);
        for i in 0..self.rows {
            for k in 0..self.cols {
                let lhs = self.data[i * self.cols + k];
                if lhs == 0.0 {
                    continue;
                }
                for j in 0..other.cols {
                    out.data[i * other.cols + j] += lhs * other.data[k * other.cols + j];
                }
            }
        }
        Ok(out)
    }

    /// Sum of diagonal elements
    ///
    /// # Errors
    ///
    /// `NotSquare` for non-square input.
    pub fn trace(&self) -> Result<f64> {
        if !self.is_square() {
            return Err(Error::NotSquare {
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok((0..self.rows).map(|i| self.data[i * self.cols + i]).sum())
    }

    /// Frobenius norm: `sqrt(sum(A[i,j]^2))`
    pub fn frobenius_norm(&self) -> f64 {
        self.data.iter().map(|x| x * x).sum::<f64>().sqrt()
    }
}
