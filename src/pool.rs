//! Fixed-size worker pool owned by a single transform instance.
//!
//! Work is dispatched as fan-out/fan-in rounds: [`WorkerPool::fan_out`]
//! spawns one task per part inside a Rayon scope and returns only when
//! every task has finished. Releasing the pool waits a bounded time for
//! the worker threads to exit; threads still alive after the grace period
//! are detached and whatever they were doing is discarded.

use std::format;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Duration;

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::fft::{ArgumentError, FftError};
use crate::logging::{fft_debug, fft_warn};

/// Outcome of releasing a [`WorkerPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolShutdown {
    /// Every worker thread exited within the grace period.
    Graceful,
    /// `abandoned` workers were still running when the grace period ran out.
    Forced { abandoned: usize },
}

#[derive(Default)]
struct ExitCounter {
    exited: Mutex<usize>,
    cond: Condvar,
}

impl ExitCounter {
    fn record_exit(&self) {
        let mut exited = self.exited.lock().unwrap_or_else(PoisonError::into_inner);
        *exited += 1;
        self.cond.notify_all();
    }

    /// Wait until `expected` exits were recorded or `grace` elapses.
    fn wait_for(&self, expected: usize, grace: Duration) -> usize {
        let exited = self.exited.lock().unwrap_or_else(PoisonError::into_inner);
        let (exited, _) = self
            .cond
            .wait_timeout_while(exited, grace, |exited| *exited < expected)
            .unwrap_or_else(PoisonError::into_inner);
        *exited
    }
}

pub(crate) struct WorkerPool {
    pool: Option<ThreadPool>,
    threads: usize,
    grace: Duration,
    exits: Arc<ExitCounter>,
}

impl WorkerPool {
    pub(crate) fn new(threads: usize, grace: Duration) -> Result<Self, FftError> {
        if threads == 0 {
            return Err(ArgumentError::ZeroThreads.into());
        }
        let exits = Arc::new(ExitCounter::default());
        let counter = Arc::clone(&exits);
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("specfft-worker-{i}"))
            .exit_handler(move |_| counter.record_exit())
            .build()
            .map_err(|_| FftError::PoolBuild)?;
        fft_debug!("worker pool started with {} threads", threads);
        Ok(Self {
            pool: Some(pool),
            threads,
            grace,
            exits,
        })
    }

    pub(crate) fn threads(&self) -> usize {
        self.threads
    }

    /// Run `task(0..parts)` on the pool and block until all parts finish.
    ///
    /// A panic in any part fails the whole round with
    /// [`FftError::WorkerFailed`] once the remaining parts have finished.
    pub(crate) fn fan_out<F>(&self, parts: usize, task: F) -> Result<(), FftError>
    where
        F: Fn(usize) + Sync,
    {
        // `shutdown` consumes the pool only on the way out of its owner.
        let pool = self.pool.as_ref().ok_or(FftError::PoolBuild)?;
        let task = &task;
        catch_unwind(AssertUnwindSafe(|| {
            pool.scope(|scope| {
                for part in 0..parts {
                    scope.spawn(move |_| task(part));
                }
            })
        }))
        .map_err(|_| FftError::WorkerFailed)
    }

    /// Stop the workers, waiting at most `grace` for them to exit.
    pub(crate) fn shutdown(&mut self, grace: Duration) -> PoolShutdown {
        let Some(pool) = self.pool.take() else {
            return PoolShutdown::Graceful;
        };
        // Dropping a Rayon pool asks its threads to exit once idle.
        drop(pool);
        let exited = self.exits.wait_for(self.threads, grace);
        if exited >= self.threads {
            fft_debug!("worker pool released ({} threads)", self.threads);
            PoolShutdown::Graceful
        } else {
            let abandoned = self.threads - exited;
            fft_warn!(
                "worker pool grace period of {:?} expired, abandoning {} worker(s)",
                grace,
                abandoned
            );
            PoolShutdown::Forced { abandoned }
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        let grace = self.grace;
        self.shutdown(grace);
    }
}
