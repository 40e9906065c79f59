use super::error::{PoolError, TaskError};
use super::handle::{TaskHandle, task_channel};
use super::queue::ConcurrentQueue;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// State shared between the pool handle and its worker threads
struct Shared {
    queue: ConcurrentQueue<Job>,
    stopping: AtomicBool,
    active: AtomicUsize,
    /// Submitted but not yet finished; guards `stopping` transitions too
    outstanding: Mutex<usize>,
    idle: Condvar,
}

impl Shared {
    fn outstanding(&self) -> MutexGuard<'_, usize> {
        self.outstanding
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn finish_one(&self) {
        let mut outstanding = self.outstanding();
        *outstanding -= 1;
        if *outstanding == 0 {
            self.idle.notify_all();
        }
    }
}

/// Fixed-size pool of OS worker threads pulling from one shared queue
///
/// Work items are arbitrary `FnOnce() -> R` closures. Each submission returns
/// a [`TaskHandle`] that resolves to the closure's value, or to
/// [`TaskError::Panicked`] if it panicked. A panicking item never takes its
/// worker down.
///
/// Shutdown drains: items queued before [`WorkerPool::shutdown`] still run,
/// so every handle returned by a successful `submit` is eventually resolved.
pub struct WorkerPool {
    shared: Arc<Shared>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    size: usize,
}

impl WorkerPool {
    /// Start a pool with `num_threads` workers (at least one)
    pub fn new(num_threads: usize) -> Result<Self, PoolError> {
        let size = num_threads.max(1);
        tracing::info!("Creating worker pool with {} threads", size);

        let shared = Arc::new(Shared {
            queue: ConcurrentQueue::new(),
            stopping: AtomicBool::new(false),
            active: AtomicUsize::new(0),
            outstanding: Mutex::new(0),
            idle: Condvar::new(),
        });

        let mut workers = Vec::with_capacity(size);
        for index in 0..size {
            let worker_shared = shared.clone();
            let spawned = thread::Builder::new()
                .name(format!("fileflow-worker-{index}"))
                .spawn(move || worker_loop(index, worker_shared));

            match spawned {
                Ok(handle) => workers.push(handle),
                Err(source) => {
                    shared.stopping.store(true, Ordering::SeqCst);
                    shared.queue.close();
                    for handle in workers {
                        let _ = handle.join();
                    }
                    return Err(PoolError::Spawn { index, source });
                }
            }
        }

        Ok(Self {
            shared,
            workers: Mutex::new(workers),
            size,
        })
    }

    /// Queue a work item and return a handle to its eventual result
    ///
    /// Never blocks on the work itself. Fails with [`PoolError::Stopped`]
    /// once shutdown has begun.
    pub fn submit<F, R>(&self, work: F) -> Result<TaskHandle<R>, PoolError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let (completer, handle) = task_channel();
        let job: Job = Box::new(move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(work)).map_err(|payload| {
                let err = TaskError::from_panic(payload);
                tracing::error!("Task execution failed: {}", err);
                err
            });
            completer.complete(outcome);
        });

        // Holding the counter lock orders this push before any shutdown's close().
        let mut outstanding = self.shared.outstanding();
        if self.shared.stopping.load(Ordering::SeqCst) {
            return Err(PoolError::Stopped);
        }
        *outstanding += 1;
        self.shared.queue.push(job);
        Ok(handle)
    }

    /// Block until the queue is empty and no item is executing
    ///
    /// Must not be called from inside a work item of the same pool.
    pub fn wait_for_all(&self) {
        let mut outstanding = self.shared.outstanding();
        while *outstanding > 0 {
            outstanding = self
                .shared
                .idle
                .wait(outstanding)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
    }

    /// Stop accepting work, drain the queue and join every worker
    ///
    /// Idempotent; later calls return immediately.
    pub fn shutdown(&self) {
        {
            let _outstanding = self.shared.outstanding();
            if self.shared.stopping.swap(true, Ordering::SeqCst) {
                return;
            }
        }

        tracing::info!("Shutting down worker pool");
        self.shared.queue.close();

        let workers = std::mem::take(
            &mut *self
                .workers
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        );
        for handle in workers {
            if handle.join().is_err() {
                tracing::error!("Worker thread exited abnormally");
            }
        }
    }

    /// Number of worker threads
    pub fn size(&self) -> usize {
        self.size
    }

    /// Items currently executing
    pub fn active_count(&self) -> usize {
        self.shared.active.load(Ordering::SeqCst)
    }

    /// Items queued but not yet picked up
    pub fn pending_count(&self) -> usize {
        self.shared.queue.len()
    }

    pub fn is_stopped(&self) -> bool {
        self.shared.stopping.load(Ordering::SeqCst)
    }

    /// Calculate a worker count from CPU cores and configuration limits
    ///
    /// ```text
    /// cores * thread_percentage / 100, at least 1,
    /// capped by max_threads when max_threads > 0
    /// ```
    pub fn optimal_size(max_threads: usize, thread_percentage: u8) -> usize {
        let available_cores = num_cpus::get();
        let by_percentage = std::cmp::max(1, (available_cores * thread_percentage as usize) / 100);

        if max_threads > 0 {
            std::cmp::min(max_threads, by_percentage)
        } else {
            by_percentage
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(index: usize, shared: Arc<Shared>) {
    tracing::trace!("worker {} polling", index);

    while let Some(job) = shared.queue.pop_blocking() {
        shared.active.fetch_add(1, Ordering::SeqCst);
        job();
        shared.active.fetch_sub(1, Ordering::SeqCst);
        shared.finish_one();
    }

    tracing::trace!("worker {} stopped", index);
}
