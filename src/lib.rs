//! # linr
//!
//! **Dense linear algebra and statistics kernels in pure Rust.**
//!
//! linr computes eigenvalues of real square matrices through the classic
//! QR-algorithm pipeline - Householder reduction to Hessenberg form, shifted
//! implicit QR sweeps built from Givens rotation chains, and a deflating
//! Schur driver - plus Cholesky factorization and a handful of descriptive
//! statistics.
//!
//! ## Why linr?
//!
//! - **Replayable rotations**: every QR sweep records its Givens chain, so
//!   the exact transform can be applied to a partner matrix for `A = Z T Zᵀ`
//! - **Deterministic parallelism**: rotation chains replay across a worker
//!   pool with bit-identical results to the serial path
//! - **No silent failures**: non-convergence is an error, not a wrong answer;
//!   "not positive definite" is a value, not a panic
//! - **Pure Rust**: no BLAS/LAPACK linkage, single binary deployment
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use linr::prelude::*;
//!
//! let a = Matrix::from_slice(&[0.0, -1.0, 1.0, 0.0], 2, 2)?;
//! let eig = eigenvalues(&a)?;
//! assert_eq!(eig.im, vec![1.0, -1.0]);
//! ```
//!
//! ## Feature Flags
//!
//! - `rayon` (default): multi-threaded rotation-chain application and
//!   statistics via a shared [`parallel::WorkerPool`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod linalg;
pub mod matrix;
pub mod parallel;
pub mod stats;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::linalg::{
        cholesky, eigenvalues, eigenvalues_with, schur_decompose, Eigenvalues, GivensRotation,
        RotationChain, SchurForm, SchurOptions, ShiftStrategy,
    };
    pub use crate::matrix::Matrix;
    pub use crate::parallel::WorkerPool;
}
