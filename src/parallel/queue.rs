//! Unbounded multi-producer / multi-consumer FIFO queue
//!
//! A single mutex guards the items and the closed flag; a condition variable
//! wakes consumers blocked in [`ConcurrentQueue::wait_and_pop`] or
//! [`ConcurrentQueue::pop_blocking`].

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard};

struct QueueState<T> {
    items: VecDeque<T>,
    closed: bool,
}

/// Thread-safe FIFO queue with blocking and non-blocking pop
pub struct ConcurrentQueue<T> {
    state: Mutex<QueueState<T>>,
    available: Condvar,
}

impl<T> Default for ConcurrentQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ConcurrentQueue<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::new(),
                closed: false,
            }),
            available: Condvar::new(),
        }
    }

    // No user code runs under this lock, so a poisoned guard still holds consistent data.
    fn lock(&self) -> MutexGuard<'_, QueueState<T>> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Enqueue an item and wake one waiting consumer
    pub fn push(&self, item: T) {
        let mut state = self.lock();
        state.items.push_back(item);
        drop(state);
        self.available.notify_one();
    }

    /// Pop the front item without blocking
    pub fn try_pop(&self) -> Option<T> {
        self.lock().items.pop_front()
    }

    /// Block until an item is available and return it
    ///
    /// Spurious wakeups are absorbed; this only returns with an actual item.
    pub fn wait_and_pop(&self) -> T {
        let mut state = self.lock();
        loop {
            if let Some(item) = state.items.pop_front() {
                return item;
            }
            state = self
                .available
                .wait(state)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
    }

    /// Block until an item is available or the queue is closed and drained
    ///
    /// Items pushed before `close()` are still handed out; `None` means the
    /// queue is closed and empty.
    pub fn pop_blocking(&self) -> Option<T> {
        let mut state = self.lock();
        loop {
            if let Some(item) = state.items.pop_front() {
                return Some(item);
            }
            if state.closed {
                return None;
            }
            state = self
                .available
                .wait(state)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
    }

    /// Mark the queue closed and wake every blocked consumer
    pub fn close(&self) {
        self.lock().closed = true;
        self.available.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Snapshot; may be stale under concurrent mutation
    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    /// Snapshot; may be stale under concurrent mutation
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_push_and_pop_in_order() {
        let queue = ConcurrentQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.len(), 0);

        queue.push(1);
        queue.push(2);
        queue.push(3);
        assert!(!queue.is_empty());
        assert_eq!(queue.len(), 3);

        assert_eq!(queue.try_pop(), Some(1));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.wait_and_pop(), 2);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.try_pop(), Some(3));
        assert_eq!(queue.try_pop(), None);
    }

    #[test]
    fn test_wait_and_pop_blocks_until_push() {
        let queue = Arc::new(ConcurrentQueue::new());
        let consumer = {
            let queue = queue.clone();
            thread::spawn(move || queue.wait_and_pop())
        };

        thread::sleep(Duration::from_millis(50));
        assert!(!consumer.is_finished());
        queue.push("ready");
        assert_eq!(consumer.join().unwrap(), "ready");
    }

    #[test]
    fn test_concurrent_producers_single_consumer() {
        let queue = Arc::new(ConcurrentQueue::new());
        let sum = Arc::new(AtomicUsize::new(0));

        let producers: Vec<_> = (0..4)
            .map(|i| {
                let queue = queue.clone();
                thread::spawn(move || {
                    for j in 0..100 {
                        queue.push(i * 100 + j);
                    }
                })
            })
            .collect();

        let consumer = {
            let queue = queue.clone();
            let sum = sum.clone();
            thread::spawn(move || {
                for _ in 0..400 {
                    sum.fetch_add(queue.wait_and_pop(), Ordering::Relaxed);
                }
            })
        };

        for producer in producers {
            producer.join().unwrap();
        }
        consumer.join().unwrap();

        let expected: usize = (0..400).sum();
        assert_eq!(sum.load(Ordering::Relaxed), expected);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_close_drains_then_returns_none() {
        let queue = ConcurrentQueue::new();
        queue.push('a');
        queue.close();

        assert!(queue.is_closed());
        assert_eq!(queue.pop_blocking(), Some('a'));
        assert_eq!(queue.pop_blocking(), None);
    }

    #[test]
    fn test_close_wakes_blocked_consumers() {
        let queue: Arc<ConcurrentQueue<u8>> = Arc::new(ConcurrentQueue::new());
        let waiters: Vec<_> = (0..3)
            .map(|_| {
                let queue = queue.clone();
                thread::spawn(move || queue.pop_blocking())
            })
            .collect();

        thread::sleep(Duration::from_millis(20));
        queue.close();

        for waiter in waiters {
            assert_eq!(waiter.join().unwrap(), None);
        }
    }
}
