//! Rayon thread pool configuration for per-champion merge work.
//!
//! Use [WorkerPool::install] to run a parallel merge with a fixed number of threads, or
//! rely on Rayon's global pool (all CPU cores).

use rayon::ThreadPoolBuilder;

use crate::error::{MergeError, Result};

/// Configures how many worker threads are used for parallel merging.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkerPool {
    /// Number of worker threads. If 0, use the global Rayon pool (num_cpus).
    pub workers: usize,
}

impl WorkerPool {
    /// Use exactly `n` worker threads.
    pub fn with_workers(n: usize) -> Self {
        Self { workers: n }
    }

    /// Run a closure on a pool of this size. With [workers](WorkerPool::workers) == 0 the closure
    /// runs directly and its parallel iterators use the global pool.
    pub fn install<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        if self.workers == 0 {
            return Ok(f());
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .map_err(|err| MergeError::ThreadPool(err.to_string()))?;
        Ok(pool.install(f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn install_runs_closure_on_sized_pool() {
        let threads = WorkerPool::with_workers(2)
            .install(rayon::current_num_threads)
            .unwrap();
        assert_eq!(threads, 2);
    }

    #[test]
    fn install_preserves_parallel_collect_order() {
        let squares = WorkerPool::default()
            .install(|| (0..100u32).into_par_iter().map(|n| n * n).collect::<Vec<_>>())
            .unwrap();
        assert_eq!(squares[10], 100);
        assert_eq!(squares.len(), 100);
    }
}
