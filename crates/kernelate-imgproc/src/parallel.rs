use rayon::prelude::*;
use thiserror::Error;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// The row stride must be valid.
    #[error("row stride must be > 0, got {0}")]
    InvalidRowStride(usize),

    /// The buffer is not made of whole rows.
    #[error("buffer length {0} is not a multiple of the row stride {1}")]
    RaggedRows(usize, usize),
}

/// Controls how row-wise operations are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Run sequentially on the current thread.
    ///
    /// Useful for small images, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Use the global Rayon thread pool to process rows in parallel.
    #[default]
    ParallelRows,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    Fixed(usize),
}

impl ExecutionStrategy {
    /// Strategy for a user supplied thread count, `0` meaning serial.
    pub fn from_threads(threads: usize) -> Self {
        match threads {
            0 => ExecutionStrategy::Serial,
            n => ExecutionStrategy::Fixed(n),
        }
    }

    /// Check the strategy can be run.
    ///
    /// # Errors
    ///
    /// [`ParallelError::InvalidThreadCount`] for `Fixed(0)`.
    pub fn validate(&self) -> Result<(), ParallelError> {
        match self {
            ExecutionStrategy::Fixed(0) => Err(ParallelError::InvalidThreadCount(0)),
            _ => Ok(()),
        }
    }
}

/// Trait to run a per-row operation over a row-major buffer.
///
/// Each row is handed out exactly once, so rows can be written without any
/// synchronization. The call returns once every row has been processed.
pub trait ExecuteRowsExt<T> {
    /// Execute `op(row_index, row)` for every row with the given strategy.
    ///
    /// # Arguments
    ///
    /// * `row_stride` - Number of elements in one row.
    /// * `strategy` - The execution strategy.
    /// * `op` - The operation to perform on each row.
    ///
    /// # Errors
    ///
    /// If the stride or thread count is zero, the buffer is not made of whole
    /// rows, or the thread pool cannot be built.
    fn execute_rows<F>(
        &mut self,
        row_stride: usize,
        strategy: ExecutionStrategy,
        op: F,
    ) -> Result<(), ParallelError>
    where
        F: Fn(usize, &mut [T]) + Sync + Send;
}

impl<T: Send> ExecuteRowsExt<T> for [T] {
    fn execute_rows<F>(
        &mut self,
        row_stride: usize,
        strategy: ExecutionStrategy,
        op: F,
    ) -> Result<(), ParallelError>
    where
        F: Fn(usize, &mut [T]) + Sync + Send,
    {
        strategy.validate()?;

        if row_stride == 0 {
            return Err(ParallelError::InvalidRowStride(row_stride));
        }

        if self.len() % row_stride != 0 {
            return Err(ParallelError::RaggedRows(self.len(), row_stride));
        }

        match strategy {
            ExecutionStrategy::Serial => {
                self.chunks_exact_mut(row_stride)
                    .enumerate()
                    .for_each(|(y, row)| op(y, row));
            }
            ExecutionStrategy::ParallelRows => {
                self.par_chunks_exact_mut(row_stride)
                    .enumerate()
                    .for_each(|(y, row)| op(y, row));
            }
            ExecutionStrategy::Fixed(n) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| ParallelError::BuildError(e.to_string()))?;

                pool.install(|| {
                    self.par_chunks_exact_mut(row_stride)
                        .enumerate()
                        .for_each(|(y, row)| op(y, row));
                });
            }
        }
        Ok(())
    }
}
