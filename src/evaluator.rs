//! Fork-join elementwise evaluation over a striped index partition.
//!
//! Every call spawns exactly `workers` scoped OS threads, hands each one the
//! exclusive result slots of its stripe, and joins all of them before
//! returning. Nothing is pooled or shared between calls, so concurrent calls
//! on one evaluator are independent.

use crate::config::EvaluatorConfig;
use crate::error::EvalError;
use crate::op::BinaryOp;
use crate::partition::StripePartition;
use log::{debug, trace, warn};
use std::io;
use std::num::NonZeroUsize;
use std::ops::{Add, Div, Mul, Sub};
use std::thread::{self, Scope, ScopedJoinHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelBinaryEvaluator {
    workers: NonZeroUsize,
}

impl Default for ParallelBinaryEvaluator {
    /// One worker per logical CPU.
    fn default() -> Self {
        let workers = EvaluatorConfig::default()
            .worker_count()
            .unwrap_or(NonZeroUsize::MIN);
        Self::new(workers)
    }
}

impl ParallelBinaryEvaluator {
    pub fn new(workers: NonZeroUsize) -> Self {
        Self { workers }
    }

    pub fn with_workers(workers: usize) -> Result<Self, EvalError> {
        NonZeroUsize::new(workers)
            .map(Self::new)
            .ok_or(EvalError::InvalidWorkerCount)
    }

    pub fn from_config(config: &EvaluatorConfig) -> Result<Self, EvalError> {
        Ok(Self::new(config.worker_count()?))
    }

    pub fn workers(&self) -> usize {
        self.workers.get()
    }

    pub fn add<T>(&self, a: &[T], b: &[T]) -> Result<Vec<T>, EvalError>
    where
        T: Add<Output = T> + Copy + Default + Send + Sync,
    {
        self.apply(a, b, |x, y| x + y)
    }

    pub fn sub<T>(&self, a: &[T], b: &[T]) -> Result<Vec<T>, EvalError>
    where
        T: Sub<Output = T> + Copy + Default + Send + Sync,
    {
        self.apply(a, b, |x, y| x - y)
    }

    pub fn mult<T>(&self, a: &[T], b: &[T]) -> Result<Vec<T>, EvalError>
    where
        T: Mul<Output = T> + Copy + Default + Send + Sync,
    {
        self.apply(a, b, |x, y| x * y)
    }

    pub fn div<T>(&self, a: &[T], b: &[T]) -> Result<Vec<T>, EvalError>
    where
        T: Div<Output = T> + Copy + Default + Send + Sync,
    {
        self.apply(a, b, |x, y| x / y)
    }

    /// Runs an operator chosen at runtime.
    pub fn evaluate<T>(&self, a: &[T], b: &[T], op: BinaryOp) -> Result<Vec<T>, EvalError>
    where
        T: Add<Output = T>
            + Sub<Output = T>
            + Mul<Output = T>
            + Div<Output = T>
            + Copy
            + Default
            + Send
            + Sync,
    {
        self.apply(a, b, |x, y| op.apply(x, y))
    }

    /// Computes `op(a[i], b[i])` for every index, worker `i % workers`
    /// owning slot `i`.
    ///
    /// Fails with [`EvalError::LengthMismatch`] before anything is spawned
    /// when the operands differ in length. A worker that panics (integer
    /// division by zero, overflow in debug builds) fails the whole call with
    /// [`EvalError::WorkerPanicked`]; no partial result is returned.
    pub fn apply<T, F>(&self, a: &[T], b: &[T], op: F) -> Result<Vec<T>, EvalError>
    where
        T: Copy + Default + Send + Sync,
        F: Fn(T, T) -> T + Sync,
    {
        self.fork_join(a, b, op, &OsThreads)
    }

    fn fork_join<T, F, S>(&self, a: &[T], b: &[T], op: F, spawner: &S) -> Result<Vec<T>, EvalError>
    where
        T: Copy + Default + Send + Sync,
        F: Fn(T, T) -> T + Sync,
        S: WorkerSpawner,
    {
        if a.len() != b.len() {
            return Err(EvalError::length_mismatch(a.len(), b.len()));
        }

        let partition = StripePartition::new(a.len(), self.workers);
        let mut result = vec![T::default(); a.len()];
        let buckets = partition.distribute(&mut result);
        let op = &op;

        debug!(
            "forking {} workers over {} elements",
            partition.workers(),
            partition.len()
        );

        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(buckets.len());

            for (worker, bucket) in buckets.into_iter().enumerate() {
                let spawned = spawner.spawn(scope, worker, move || {
                    trace!("worker {worker} owns {} slots", bucket.len());
                    for (i, slot) in bucket {
                        *slot = op(a[i], b[i]);
                    }
                });

                match spawned {
                    Ok(handle) => handles.push((worker, handle)),
                    Err(source) => {
                        warn!("failed to spawn worker {worker}: {source}");
                        // A panic among the running workers outranks the spawn failure.
                        join_all(handles)?;
                        return Err(EvalError::Spawn { worker, source });
                    }
                }
            }

            join_all(handles)
        })?;

        debug!("joined {} workers", partition.workers());
        Ok(result)
    }
}

/// Starts one worker thread inside a fork-join scope.
trait WorkerSpawner: Sync {
    fn spawn<'scope, 'env, W>(
        &self,
        scope: &'scope Scope<'scope, 'env>,
        worker: usize,
        body: W,
    ) -> io::Result<ScopedJoinHandle<'scope, ()>>
    where
        W: FnOnce() + Send + 'scope;
}

struct OsThreads;

impl WorkerSpawner for OsThreads {
    fn spawn<'scope, 'env, W>(
        &self,
        scope: &'scope Scope<'scope, 'env>,
        worker: usize,
        body: W,
    ) -> io::Result<ScopedJoinHandle<'scope, ()>>
    where
        W: FnOnce() + Send + 'scope,
    {
        thread::Builder::new()
            .name(format!("stripe-worker-{worker}"))
            .spawn_scoped(scope, body)
    }
}

/// Joins every handle, then reports the first panic seen. A handle that is
/// dropped unjoined would make the enclosing scope re-raise its panic.
fn join_all(handles: Vec<(usize, ScopedJoinHandle<'_, ()>)>) -> Result<(), EvalError> {
    let mut first_error = None;

    for (worker, handle) in handles {
        if let Err(payload) = handle.join() {
            let err = EvalError::worker_panicked(worker, payload);
            warn!("{err}");
            first_error.get_or_insert(err);
        }
    }

    first_error.map_or(Ok(()), Err)
}
