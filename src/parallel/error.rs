use thiserror::Error;

/// Errors reported synchronously by the worker pool itself
#[derive(Debug, Error)]
pub enum PoolError {
    /// Submission attempted after `shutdown()` started
    #[error("worker pool is stopped; no new work is accepted")]
    Stopped,

    /// The OS refused to start a worker thread
    #[error("failed to spawn worker thread {index}: {source}")]
    Spawn {
        index: usize,
        #[source]
        source: std::io::Error,
    },
}

/// Failure delivered through a task handle instead of a value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    /// The work item panicked while executing
    #[error("task panicked: {message}")]
    Panicked { message: String },

    /// The work item was dropped before it produced a value
    #[error("task was abandoned before completion")]
    Abandoned,
}

impl TaskError {
    /// Build a `Panicked` error from a `catch_unwind` payload
    pub(crate) fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        Self::Panicked {
            message: panic_message(payload.as_ref()),
        }
    }
}

/// Extract a readable message from a panic payload
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
