//! Generic concurrent execution engine
//!
//! This module provides the worker-thread infrastructure used by the file
//! pipeline, but it knows nothing about files: any `FnOnce() -> R` closure can
//! be submitted.
//!
//! # Architecture Responsibilities
//!
//! ## What This Module Does:
//! - **Work Queue**: An unbounded FIFO shared by all workers ([`ConcurrentQueue`])
//! - **Worker Management**: A fixed set of named OS threads started up front
//! - **Result Delivery**: One [`TaskHandle`] per submission, resolved exactly once
//! - **Fault Isolation**: A panicking work item resolves its own handle with
//!   [`TaskError::Panicked`]; the worker keeps running
//! - **Lifecycle**: `wait_for_all()` quiescence barrier and a one-time,
//!   draining `shutdown()`
//!
//! ## What This Module Does NOT Do:
//! - **Scheduling Policy**: No priorities, no work stealing
//! - **Cancellation**: Once submitted, an item runs to completion or panic
//! - **Backpressure**: The queue is unbounded
//!
//! ```text
//! ┌─────────────────┐  submit   ┌──────────────────┐  pop_blocking  ┌─────────────────┐
//! │   Caller        │──────────▶│ ConcurrentQueue  │───────────────▶│ worker-0..N     │
//! │                 │           └──────────────────┘                │                 │
//! │ TaskHandle<R> ◀─┼───────────────── outcome (value / panic) ─────┤ catch_unwind    │
//! └─────────────────┘                                               └─────────────────┘
//! ```
//!
//! # Example Usage
//!
//! ```rust
//! use fileflow::parallel::WorkerPool;
//!
//! let pool = WorkerPool::new(4)?;
//! let handle = pool.submit(|| 21 * 2)?;
//! assert_eq!(handle.wait(), Ok(42));
//!
//! pool.wait_for_all();
//! pool.shutdown();
//! # Ok::<(), fileflow::parallel::PoolError>(())
//! ```

pub mod error;
pub mod handle;
pub mod pool;
pub mod queue;

// Re-export main types for easier access
pub use error::{PoolError, TaskError};
pub use handle::{TaskHandle, TaskOutcome};
pub use pool::WorkerPool;
pub use queue::ConcurrentQueue;
