//! Descriptive statistics over slices and matrix rows
//!
//! Small by intent: the summaries the numerical pipeline actually consumes,
//! with the heavier per-element work routed through the shared [`WorkerPool`].

use crate::error::{Error, Result};
use crate::matrix::Matrix;
use crate::parallel::WorkerPool;

/// Arithmetic mean of `data`.
///
/// # Errors
///
/// `InvalidArgument` for an empty slice.
pub fn mean(data: &[f64]) -> Result<f64> {
    if data.is_empty() {
        return Err(Error::invalid_argument("data", "cannot be empty"));
    }
    Ok(data.iter().sum::<f64>() / data.len() as f64)
}

/// Sample variance of `data` (Bessel-corrected, `n - 1` denominator).
///
/// # Errors
///
/// `InvalidArgument` for fewer than two observations.
pub fn variance(data: &[f64]) -> Result<f64> {
    if data.len() < 2 {
        return Err(Error::invalid_argument(
            "data",
            "needs at least two observations",
        ));
    }
    let m = mean(data)?;
    let sum_sq: f64 = data.iter().map(|x| (x - m) * (x - m)).sum();
    Ok(sum_sq / (data.len() - 1) as f64)
}

/// Simple moving average with the given window, one output per full window.
///
/// The output has `data.len() - window + 1` entries; windows never wrap or
/// shrink at the edges. Each window sum is independent of the others, so the
/// windows are evaluated through `pool`.
///
/// # Errors
///
/// `InvalidArgument` for a zero window or one longer than the data.
pub fn moving_average(data: &[f64], window: usize, pool: &WorkerPool) -> Result<Vec<f64>> {
    if window == 0 {
        return Err(Error::invalid_argument("window", "must be positive"));
    }
    if window > data.len() {
        return Err(Error::invalid_argument(
            "window",
            "cannot exceed the data length",
        ));
    }

    let count = data.len() - window + 1;
    let inv = 1.0 / window as f64;

    #[cfg(feature = "rayon")]
    {
        use rayon::prelude::*;
        let min_len = pool.min_chunk();
        let out = pool.install(|| {
            (0..count)
                .into_par_iter()
                .with_min_len(min_len)
                .map(|i| data[i..i + window].iter().sum::<f64>() * inv)
                .collect()
        });
        Ok(out)
    }
    #[cfg(not(feature = "rayon"))]
    {
        let _ = pool;
        Ok((0..count)
            .map(|i| data[i..i + window].iter().sum::<f64>() * inv)
            .collect())
    }
}

/// Euclidean norm of every row of `m`, computed through `pool`.
///
/// Rows are independent, so this is embarrassingly parallel; tiny matrices
/// stay on the calling thread via the pool's chunking floor.
pub fn row_norms(m: &Matrix, pool: &WorkerPool) -> Vec<f64> {
    let cols = m.cols();
    if cols == 0 {
        return vec![0.0; m.rows()];
    }

    #[cfg(feature = "rayon")]
    {
        use rayon::prelude::*;
        let min_len = (pool.min_chunk() / cols).max(1);
        pool.install(|| {
            m.as_slice()
                .par_chunks(cols)
                .with_min_len(min_len)
                .map(|row| row.iter().map(|x| x * x).sum::<f64>().sqrt())
                .collect()
        })
    }
    #[cfg(not(feature = "rayon"))]
    {
        let _ = pool;
        m.as_slice()
            .chunks(cols)
            .map(|row| row.iter().map(|x| x * x).sum::<f64>().sqrt())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_and_variance_of_a_known_sample() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&data).unwrap() - 5.0).abs() < 1e-14);
        // Sum of squared deviations is 32; 32 / 7 with Bessel's correction.
        assert!((variance(&data).unwrap() - 32.0 / 7.0).abs() < 1e-14);
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(mean(&[]).is_err());
        assert!(variance(&[1.0]).is_err());
    }

    #[test]
    fn moving_average_window_arithmetic() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0];
        let out = moving_average(&data, 3, &WorkerPool::new()).unwrap();
        assert_eq!(out, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn moving_average_rejects_bad_windows() {
        let pool = WorkerPool::new();
        assert!(moving_average(&[1.0, 2.0], 0, &pool).is_err());
        assert!(moving_average(&[1.0, 2.0], 3, &pool).is_err());
    }

    #[test]
    fn full_window_collapses_to_the_mean() {
        let data = [1.0, 3.0, 5.0, 7.0];
        let out = moving_average(&data, 4, &WorkerPool::new()).unwrap();
        assert_eq!(out.len(), 1);
        assert!((out[0] - mean(&data).unwrap()).abs() < 1e-14);
    }

    #[test]
    fn row_norms_of_a_small_matrix() {
        let m = Matrix::from_slice(&[3.0, 4.0, 0.0, 0.0, 5.0, 12.0], 3, 2).unwrap();
        let norms = row_norms(&m, &WorkerPool::new());
        assert_eq!(norms.len(), 3);
        assert!((norms[0] - 5.0).abs() < 1e-14);
        assert!((norms[1] - 0.0).abs() < 1e-14);
        assert!((norms[2] - 13.0).abs() < 1e-14);
    }
}
