//! Common utilities used across the crate.
//!
//! Currently this is the parallelism flag threaded through the weight store
//! and batch prediction.

use rayon::prelude::*;

// =============================================================================
// Parallelism Configuration
// =============================================================================

/// Whether parallel execution is allowed.
///
/// This is a simple flag passed through components. When `Parallel`,
/// components may use `rayon` parallel iterators. When `Sequential`,
/// components must use sequential iteration.
///
/// Parallelism only ever applies *inside* a single call. A weight vector
/// still has exactly one writer; the flag just lets one `update` or one
/// batch prediction spread its rows over the rayon pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Parallelism {
    #[default]
    Sequential,
    Parallel,
}

impl Parallelism {
    /// Create from thread count semantics.
    ///
    /// - 0 = auto (parallel if rayon pool has multiple threads, sequential otherwise)
    /// - 1 = sequential
    /// - >1 = parallel
    #[inline]
    pub fn from_threads(n_threads: usize) -> Self {
        if n_threads == 1 || (n_threads == 0 && rayon::current_num_threads() == 1) {
            Parallelism::Sequential
        } else {
            Parallelism::Parallel
        }
    }

    /// Returns `true` if parallel execution is allowed.
    #[inline]
    pub fn is_parallel(self) -> bool {
        matches!(self, Parallelism::Parallel)
    }

    /// Run `f` on every item, on the rayon pool when parallel.
    ///
    /// Takes a plain iterator and bridges it, so ndarray lane and axis
    /// iterators can be used after `zip` or `enumerate`. Items are visited
    /// in no particular order in parallel mode.
    #[inline]
    pub fn maybe_par_bridge_for_each<T, I, F>(self, iter: I, f: F)
    where
        T: Send,
        I: Iterator<Item = T> + Send,
        F: Fn(T) + Sync + Send,
    {
        if self.is_parallel() {
            iter.par_bridge().for_each(f);
        } else {
            iter.for_each(f);
        }
    }
}
