use crate::parallel::error::panic_message;
use anyhow::Result;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

/// Receiver of events published by a [`Subject`]
///
/// Callbacks run on the publishing thread while the subject's lock is held:
/// keep them short and never publish to the same subject from inside one.
pub trait Observer<E>: Send + Sync {
    fn notify(&self, event: &E) -> Result<()>;
}

/// Publisher holding non-owning references to its observers
///
/// Observers are stored as `Weak`, so attaching never extends their
/// lifetime. Entries whose observer has been dropped are pruned during the
/// next [`Subject::notify_all`].
pub struct Subject<E> {
    observers: Mutex<Vec<Weak<dyn Observer<E>>>>,
}

impl<E> Default for Subject<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Subject<E> {
    pub fn new() -> Self {
        Self {
            observers: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Weak<dyn Observer<E>>>> {
        self.observers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register an observer; attaching the same one twice delivers twice
    pub fn attach<O>(&self, observer: &Arc<O>)
    where
        O: Observer<E> + 'static,
    {
        let weak: Weak<O> = Arc::downgrade(observer);
        self.lock().push(weak);
    }

    /// Remove every entry for `observer` (and any expired entries)
    pub fn detach<O>(&self, observer: &Arc<O>)
    where
        O: Observer<E> + 'static,
    {
        let target = Arc::as_ptr(observer);
        self.lock().retain(|weak| {
            weak.strong_count() > 0 && !std::ptr::addr_eq(weak.as_ptr(), target)
        });
    }

    /// Deliver `event` to every live observer in attachment order
    ///
    /// An observer returning an error or panicking is logged and skipped;
    /// delivery continues with the rest.
    pub fn notify_all(&self, event: &E) {
        self.lock().retain(|weak| {
            let Some(observer) = weak.upgrade() else {
                return false;
            };

            match panic::catch_unwind(AssertUnwindSafe(|| observer.notify(event))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::error!("Observer notification failed: {:#}", e),
                Err(payload) => tracing::error!(
                    "Observer panicked during notification: {}",
                    panic_message(payload.as_ref())
                ),
            }
            true
        });
    }

    /// Number of attached observers that are still alive
    pub fn observer_count(&self) -> usize {
        self.lock().iter().filter(|weak| weak.strong_count() > 0).count()
    }
}
