//! Library-level behaviour of the pool, the event bus and the pipeline

use anyhow::Result;
use fileflow::events::{Observer, ProgressEvent, ProgressStatus, Subject};
use fileflow::parallel::{PoolError, TaskError, WorkerPool};
use fileflow::pipeline::{FileProcessor, ProcessorKind, ProcessorRegistry};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<ProgressEvent>>,
}

impl Recorder {
    fn statuses(&self) -> Vec<ProgressStatus> {
        self.events.lock().unwrap().iter().map(|e| e.status()).collect()
    }
}

impl Observer<ProgressEvent> for Recorder {
    fn notify(&self, event: &ProgressEvent) -> Result<()> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

#[derive(Default)]
struct Counter(AtomicUsize);

impl Observer<u32> for Counter {
    fn notify(&self, _event: &u32) -> Result<()> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn text_pipeline(output: &Path) -> FileProcessor {
    let registry = ProcessorRegistry::standard(output, 64).unwrap();
    FileProcessor::new(registry.resolve(ProcessorKind::Auto, Path::new("x.txt")))
}

#[test]
fn test_every_submission_resolves_once_even_when_items_panic() {
    let pool = WorkerPool::new(4).unwrap();

    let handles: Vec<_> = (0..50)
        .map(|i| {
            pool.submit(move || {
                if i % 7 == 0 {
                    panic!("item {i} failed");
                }
                i * 2
            })
            .unwrap()
        })
        .collect();

    let mut values = 0;
    let mut panics = 0;
    for (i, handle) in handles.into_iter().enumerate() {
        match handle.wait() {
            Ok(value) => {
                assert_eq!(value, i * 2);
                values += 1;
            }
            Err(TaskError::Panicked { message }) => {
                assert!(message.contains(&format!("item {i} failed")));
                panics += 1;
            }
            Err(other) => panic!("unexpected outcome {other:?}"),
        }
    }

    assert_eq!(panics, 8); // 0, 7, 14, ..., 49
    assert_eq!(values + panics, 50);
}

#[test]
fn test_wait_for_all_sees_every_item_finish() {
    let pool = WorkerPool::new(3).unwrap();
    let done = Arc::new(AtomicUsize::new(0));
    const K: usize = 20;

    for _ in 0..K {
        let done = Arc::clone(&done);
        pool.submit(move || {
            thread::sleep(Duration::from_millis(5));
            done.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
    }

    pool.wait_for_all();
    assert_eq!(done.load(Ordering::SeqCst), K);
    assert_eq!(pool.pending_count(), 0);
    assert_eq!(pool.active_count(), 0);
}

#[test]
fn test_wait_for_all_while_another_thread_submits() {
    const ROUNDS: usize = 300;
    let pool = WorkerPool::new(4).unwrap();
    let done = Arc::new(AtomicUsize::new(0));
    let submitted = AtomicUsize::new(0);
    let submitting = AtomicBool::new(true);

    let handles = thread::scope(|scope| {
        let submitter = scope.spawn(|| {
            let handles: Vec<_> = (0..ROUNDS)
                .map(|i| {
                    let done = Arc::clone(&done);
                    let handle = pool
                        .submit(move || {
                            done.fetch_add(1, Ordering::SeqCst);
                            i
                        })
                        .unwrap();
                    submitted.fetch_add(1, Ordering::SeqCst);
                    handle
                })
                .collect();
            submitting.store(false, Ordering::SeqCst);
            handles
        });

        while submitting.load(Ordering::SeqCst) {
            let before = submitted.load(Ordering::SeqCst);
            pool.wait_for_all();
            // everything submitted before the wait has finished
            assert!(done.load(Ordering::SeqCst) >= before);
        }
        submitter.join().unwrap()
    });

    pool.wait_for_all();
    assert_eq!(done.load(Ordering::SeqCst), ROUNDS);
    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.wait().unwrap(), i);
    }
}

#[test]
fn test_no_lost_updates_under_contention() {
    const THREADS: usize = 8;
    const ITEMS: usize = 64;
    const INCREMENTS: usize = 1_000;

    let pool = WorkerPool::new(THREADS).unwrap();
    let counter = Arc::new(Mutex::new(0usize));

    for _ in 0..THREADS * ITEMS {
        let counter = Arc::clone(&counter);
        pool.submit(move || {
            for _ in 0..INCREMENTS {
                *counter.lock().unwrap() += 1;
            }
        })
        .unwrap();
    }

    pool.wait_for_all();
    assert_eq!(*counter.lock().unwrap(), THREADS * ITEMS * INCREMENTS);
}

#[test]
fn test_submit_after_shutdown_fails_fast() {
    let pool = WorkerPool::new(2).unwrap();
    pool.shutdown();

    let result = pool.submit(|| 1);
    assert!(matches!(result, Err(PoolError::Stopped)));
}

#[test]
fn test_shutdown_drains_queued_items() {
    let pool = WorkerPool::new(1).unwrap();
    let handles: Vec<_> = (0..10)
        .map(|i| {
            pool.submit(move || {
                thread::sleep(Duration::from_millis(1));
                i
            })
            .unwrap()
        })
        .collect();

    pool.shutdown();
    let results: Vec<_> = handles.into_iter().map(|h| h.wait().unwrap()).collect();
    assert_eq!(results, (0..10).collect::<Vec<_>>());
}

#[test]
fn test_detached_and_dropped_observers_stop_receiving() {
    let subject = Subject::<u32>::new();
    let kept = Arc::new(Counter::default());
    let detached = Arc::new(Counter::default());
    let dropped = Arc::new(Counter::default());

    subject.attach(&kept);
    subject.attach(&detached);
    subject.attach(&dropped);
    subject.notify_all(&1);

    subject.detach(&detached);
    drop(dropped);
    subject.notify_all(&2);

    assert_eq!(kept.0.load(Ordering::SeqCst), 2);
    assert_eq!(detached.0.load(Ordering::SeqCst), 1);
    assert_eq!(subject.observer_count(), 1);
}

#[test]
fn test_attach_and_detach_while_notifying() {
    const PUBLISHERS: usize = 4;
    const EVENTS: u32 = 500;

    let subject = Subject::<u32>::new();
    let steady = Arc::new(Counter::default());
    subject.attach(&steady);

    thread::scope(|scope| {
        for _ in 0..PUBLISHERS {
            scope.spawn(|| {
                for i in 0..EVENTS {
                    subject.notify_all(&i);
                }
            });
        }
        for _ in 0..2 {
            scope.spawn(|| {
                for _ in 0..200 {
                    let detached = Arc::new(Counter::default());
                    subject.attach(&detached);
                    subject.detach(&detached);

                    let dropped = Arc::new(Counter::default());
                    subject.attach(&dropped);
                }
            });
        }
    });

    assert_eq!(steady.0.load(Ordering::SeqCst), PUBLISHERS * EVENTS as usize);
    subject.notify_all(&0);
    assert_eq!(subject.observer_count(), 1);
}

#[test]
fn test_missing_file_reports_failure_without_started_event() {
    let dir = TempDir::new().unwrap();
    let pipeline = text_pipeline(&dir.path().join("out"));
    let recorder = Arc::new(Recorder::default());
    pipeline.attach_progress_observer(&recorder);

    let result = pipeline.process(Path::new("nonexistent.file"));

    assert!(!result.success);
    assert!(!result.message.is_empty());
    assert!(!recorder.statuses().contains(&ProgressStatus::Started));
}

#[test]
fn test_existing_file_has_one_started_and_one_terminal_event() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("notes.txt");
    let content = "alpha beta gamma\n".repeat(40);
    std::fs::write(&input, &content).unwrap();

    let pipeline = text_pipeline(&dir.path().join("out"));
    let recorder = Arc::new(Recorder::default());
    pipeline.attach_progress_observer(&recorder);

    let result = pipeline.process(&input);
    assert!(result.success, "{}", result.message);
    assert_eq!(result.bytes_processed, content.len() as u64);

    let statuses = recorder.statuses();
    assert_eq!(statuses.iter().filter(|s| **s == ProgressStatus::Started).count(), 1);
    assert_eq!(statuses.iter().filter(|s| s.is_terminal()).count(), 1);
    assert_eq!(statuses.first(), Some(&ProgressStatus::Started));
    assert_eq!(statuses.last(), Some(&ProgressStatus::Completed));

    let events = recorder.events.lock().unwrap();
    let terminal = events.last().unwrap();
    assert_eq!(terminal.bytes_processed(), terminal.total_bytes());
    assert_eq!(terminal.total_bytes(), content.len() as u64);
}

#[test]
fn test_pipelines_on_the_pool_share_one_observer() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out");
    let registry = ProcessorRegistry::standard(&output, 128).unwrap();
    let recorder = Arc::new(Recorder::default());
    let pool = WorkerPool::new(4).unwrap();

    let mut expected_bytes = Vec::new();
    let handles: Vec<_> = (0..12)
        .map(|i| {
            let path = dir.path().join(format!("file{i}.md"));
            let body = "word ".repeat(10 * (i + 1));
            std::fs::write(&path, &body).unwrap();
            expected_bytes.push(body.len() as u64);

            let pipeline = FileProcessor::new(registry.resolve(ProcessorKind::Auto, &path));
            pipeline.attach_progress_observer(&recorder);
            pool.submit(move || pipeline.process(&path)).unwrap()
        })
        .collect();

    for (handle, expected) in handles.into_iter().zip(expected_bytes) {
        let result = handle.wait().unwrap();
        assert!(result.success);
        assert_eq!(result.bytes_processed, expected);
    }

    let statuses = recorder.statuses();
    assert_eq!(statuses.iter().filter(|s| **s == ProgressStatus::Started).count(), 12);
    assert_eq!(statuses.iter().filter(|s| **s == ProgressStatus::Completed).count(), 12);
    assert_eq!(std::fs::read_dir(&output).unwrap().count(), 12);
}
