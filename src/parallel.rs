//! Worker-pool context for data-parallel row/column sweeps
//!
//! Parallel operations in this crate never reach for global mutable state:
//! callers own a [`WorkerPool`] and pass it down. The pool is only used
//! "horizontally" — applying an already-fixed rotation chain to disjoint
//! blocks, or sweeping independent rows — never inside the sequential QR
//! dependency chain.
//!
//! With the `rayon` feature disabled every operation that accepts a pool
//! degrades to its serial path and produces identical results.

use crate::error::Result;

#[cfg(feature = "rayon")]
use std::sync::Arc;

/// Minimum number of elements a worker should own before splitting pays off.
const DEFAULT_MIN_CHUNK: usize = 64;

/// Explicit parallel execution context.
///
/// `WorkerPool::new()` borrows rayon's global pool; [`WorkerPool::with_threads`]
/// builds a dedicated fixed-size pool owned by this value. Submitted work runs
/// to completion (join semantics, no cancellation).
#[derive(Clone, Debug)]
pub struct WorkerPool {
    #[cfg(feature = "rayon")]
    pool: Option<Arc<rayon::ThreadPool>>,
    min_chunk: usize,
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkerPool {
    /// Context backed by the shared global thread pool
    pub fn new() -> Self {
        Self {
            #[cfg(feature = "rayon")]
            pool: None,
            min_chunk: DEFAULT_MIN_CHUNK,
        }
    }

    /// Context backed by a dedicated pool of `threads` workers
    ///
    /// # Errors
    ///
    /// `Internal` if the pool cannot be constructed.
    #[cfg(feature = "rayon")]
    pub fn with_threads(threads: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| crate::error::Error::Internal(e.to_string()))?;
        Ok(Self {
            pool: Some(Arc::new(pool)),
            min_chunk: DEFAULT_MIN_CHUNK,
        })
    }

    /// Context backed by a dedicated pool of `threads` workers
    ///
    /// Without the `rayon` feature the hint is ignored and work runs serially.
    #[cfg(not(feature = "rayon"))]
    pub fn with_threads(_threads: usize) -> Result<Self> {
        Ok(Self::new())
    }

    /// Override the minimum per-worker chunk length
    pub fn with_min_chunk(mut self, min_chunk: usize) -> Self {
        self.min_chunk = min_chunk.max(1);
        self
    }

    /// Minimum per-worker chunk length
    pub fn min_chunk(&self) -> usize {
        self.min_chunk.max(1)
    }

    /// Number of worker threads available to this context
    #[cfg(feature = "rayon")]
    pub fn threads(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    /// Number of worker threads available to this context
    #[cfg(not(feature = "rayon"))]
    pub fn threads(&self) -> usize {
        1
    }

    /// Run `f` inside this context's pool and wait for it to finish
    #[cfg(feature = "rayon")]
    pub fn install<R, F>(&self, f: F) -> R
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        match &self.pool {
            Some(pool) => pool.install(f),
            None => f(),
        }
    }

    /// Run `f` inside this context's pool and wait for it to finish
    #[cfg(not(feature = "rayon"))]
    pub fn install<R, F>(&self, f: F) -> R
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        f()
    }

    /// How many disjoint blocks a sweep over `len` elements should use
    pub fn block_count(&self, len: usize) -> usize {
        if len == 0 {
            return 1;
        }
        len.div_ceil(self.min_chunk()).clamp(1, self.threads())
    }
}
