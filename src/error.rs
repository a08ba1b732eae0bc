//! Error types for linr

use thiserror::Error;

/// Result type alias using linr's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in linr operations
#[derive(Error, Debug)]
pub enum Error {
    /// Operation requires a square matrix
    #[error("Expected square matrix, got {rows}x{cols}")]
    NotSquare {
        /// Number of rows
        rows: usize,
        /// Number of columns
        cols: usize,
    },

    /// Shape mismatch in an operation
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape
        expected: Vec<usize>,
        /// Actual shape
        got: Vec<usize>,
    },

    /// Invalid argument provided to an operation
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// QR iteration exhausted its sweep budget without deflating
    #[error("Eigenvalue iteration did not converge for order-{order} matrix after {iterations} sweeps")]
    NonConvergence {
        /// Order of the input matrix
        order: usize,
        /// Sweeps spent on the stalled active range
        iterations: usize,
    },

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a shape mismatch error
    pub fn shape_mismatch(expected: &[usize], got: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            got: got.to_vec(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(arg: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            arg,
            reason: reason.into(),
        }
    }
}
