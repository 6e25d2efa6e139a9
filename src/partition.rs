//! Static, contiguous partition of a batch into per-worker blocks.
//!
//! Block `t` covers rows `[t * b, min(n, (t + 1) * b))` with `b = ⌈n / ncores⌉`.
//! The plan is fixed before any work starts, and each block owns a disjoint slice of
//! the output buffer, so results never depend on scheduling.

use crate::MvnError;
use crate::util::checked_len;
use core::any::Any;
use core::ops::Range;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// The split of `n_rows` rows over at most `ncores` workers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Partition {
    n_rows: usize,
    ncores: usize,
    block_rows: usize,
}

impl Partition {
    /// Plan a batch of `n_rows` rows over `ncores` workers.
    ///
    /// Fails with [`MvnError::InvalidParameter`] if `ncores == 0`.
    pub fn new(n_rows: usize, ncores: usize) -> Result<Self, MvnError> {
        if ncores == 0 {
            return Err(MvnError::invalid("ncores", "must be at least 1"));
        }
        Ok(Self {
            n_rows,
            ncores,
            block_rows: n_rows.div_ceil(ncores).max(1),
        })
    }

    /// Number of nonempty blocks. At most `ncores`, fewer when `n_rows < ncores`.
    #[inline]
    pub fn n_blocks(&self) -> usize {
        self.n_rows.div_ceil(self.block_rows)
    }

    /// Rows covered by block `t`
    #[inline]
    pub fn block(&self, t: usize) -> Range<usize> {
        let start = (t * self.block_rows).min(self.n_rows);
        let end = (start + self.block_rows).min(self.n_rows);
        start..end
    }

    #[cfg(test)]
    pub fn blocks(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        (0..self.n_blocks()).map(|t| self.block(t))
    }

    /// Call `f(t, rows, out_block)` once for every block `t`.
    ///
    /// `out` holds `row_len` elements per row, and `out_block` is exactly the part of it
    /// belonging to `rows`. With the `parallel` feature and more than one block, blocks
    /// run on a pool of `n_blocks()` threads; otherwise they run in order on the calling
    /// thread. Either way, `f` sees the same `(t, rows)` pairs.
    ///
    /// A panic in `f` is reported as [`MvnError::Computation`], after every block has stopped.
    pub fn run<T, F>(&self, out: &mut [T], row_len: usize, f: F) -> Result<(), MvnError>
    where
        T: Send,
        F: Fn(usize, Range<usize>, &mut [T]) + Sync + Send,
    {
        let expected = checked_len(self.n_rows, row_len)?;
        if out.len() != expected {
            return Err(MvnError::dims("output length", expected, out.len()));
        }
        if out.is_empty() {
            return Ok(());
        }
        debug!(
            n_rows = self.n_rows,
            ncores = self.ncores,
            n_blocks = self.n_blocks(),
            block_rows = self.block_rows,
            "partitioned batch"
        );

        panic::catch_unwind(AssertUnwindSafe(|| self.dispatch(out, row_len, &f))).map_err(
            |payload| MvnError::Computation(format!("worker panicked: {}", panic_message(&*payload))),
        )?
    }

    fn dispatch<T, F>(&self, out: &mut [T], row_len: usize, f: &F) -> Result<(), MvnError>
    where
        T: Send,
        F: Fn(usize, Range<usize>, &mut [T]) + Sync,
    {
        #[cfg(feature = "parallel")]
        if self.n_blocks() > 1 {
            return self.run_parallel(out, row_len, f);
        }

        self.run_sequential(out, row_len, f);
        Ok(())
    }

    pub(crate) fn run_sequential<T, F>(&self, out: &mut [T], row_len: usize, f: &F)
    where
        F: Fn(usize, Range<usize>, &mut [T]),
    {
        out.chunks_mut(self.block_rows * row_len)
            .enumerate()
            .for_each(|(t, out_block)| {
                trace!(block = t, "running block");
                f(t, self.block(t), out_block)
            });
    }

    #[cfg(feature = "parallel")]
    pub(crate) fn run_parallel<T, F>(
        &self,
        out: &mut [T],
        row_len: usize,
        f: &F,
    ) -> Result<(), MvnError>
    where
        T: Send,
        F: Fn(usize, Range<usize>, &mut [T]) + Sync,
    {
        let threads = self.n_blocks();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|err| {
                MvnError::Computation(format!("could not start {threads} worker threads: {err}"))
            })?;

        pool.install(|| {
            out.par_chunks_mut(self.block_rows * row_len)
                .enumerate()
                .for_each(|(t, out_block)| {
                    trace!(block = t, "running block");
                    f(t, self.block(t), out_block)
                })
        });
        Ok(())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown reason")
}
