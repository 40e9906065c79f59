use super::error::TaskError;
use crossbeam::channel::{Receiver, RecvTimeoutError, Sender, bounded};
use std::time::Duration;

/// Outcome carried from a worker to the submitting thread
pub type TaskOutcome<R> = Result<R, TaskError>;

/// One-shot handle to the eventual result of a submitted work item
///
/// The worker resolves it exactly once, with a value or a [`TaskError`].
/// If the work item is dropped without running, the handle resolves to
/// [`TaskError::Abandoned`] instead of blocking forever.
#[derive(Debug)]
pub struct TaskHandle<R> {
    rx: Receiver<TaskOutcome<R>>,
}

/// Sending half kept alongside the work item
#[derive(Debug)]
pub(crate) struct Completer<R> {
    tx: Sender<TaskOutcome<R>>,
}

pub(crate) fn task_channel<R>() -> (Completer<R>, TaskHandle<R>) {
    let (tx, rx) = bounded(1);
    (Completer { tx }, TaskHandle { rx })
}

impl<R> Completer<R> {
    /// Resolve the handle; a handle that was already dropped is ignored
    pub(crate) fn complete(self, outcome: TaskOutcome<R>) {
        let _ = self.tx.send(outcome);
    }
}

impl<R> TaskHandle<R> {
    /// Block until the work item finishes and return its outcome
    pub fn wait(self) -> TaskOutcome<R> {
        self.rx.recv().unwrap_or(Err(TaskError::Abandoned))
    }

    /// Wait up to `timeout` for the outcome
    ///
    /// Consumes the handle when the outcome arrives; on timeout the handle
    /// comes back in `Err` so the caller can keep waiting.
    pub fn wait_timeout(self, timeout: Duration) -> Result<TaskOutcome<R>, Self> {
        match self.rx.recv_timeout(timeout) {
            Ok(outcome) => Ok(outcome),
            Err(RecvTimeoutError::Timeout) => Err(self),
            Err(RecvTimeoutError::Disconnected) => Ok(Err(TaskError::Abandoned)),
        }
    }

    /// Whether an outcome is waiting to be collected
    pub fn is_ready(&self) -> bool {
        !self.rx.is_empty()
    }
}
