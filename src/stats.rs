use crate::monitor::throughput_mbps;
use crate::pipeline::ProcessResult;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Run totals shared across worker threads
#[derive(Debug)]
pub struct ProcessingStats {
    pub files_processed: AtomicUsize,
    pub bytes_processed: AtomicU64,
    pub errors: AtomicUsize,
    start: Instant,
    end: OnceLock<Instant>,
}

impl Default for ProcessingStats {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self {
            files_processed: AtomicUsize::new(0),
            bytes_processed: AtomicU64::new(0),
            errors: AtomicUsize::new(0),
            start: Instant::now(),
            end: OnceLock::new(),
        }
    }

    /// Successful results count as processed, the rest as errors
    pub fn record(&self, result: &ProcessResult) {
        if result.success {
            self.files_processed.fetch_add(1, Ordering::Relaxed);
            self.bytes_processed
                .fetch_add(result.bytes_processed, Ordering::Relaxed);
        } else {
            self.errors.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// A work item that never produced a result
    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Freeze the end time; later calls keep the first one
    pub fn finish(&self) {
        let _ = self.end.set(Instant::now());
    }

    pub fn duration(&self) -> Duration {
        let end = self.end.get().copied().unwrap_or_else(Instant::now);
        end.duration_since(self.start)
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration().as_secs_f64()
    }

    pub fn throughput_mbps(&self) -> f64 {
        throughput_mbps(self.bytes_processed.load(Ordering::Relaxed), self.duration())
    }

    pub fn get_counts(&self) -> (usize, u64, usize) {
        (
            self.files_processed.load(Ordering::Relaxed),
            self.bytes_processed.load(Ordering::Relaxed),
            self.errors.load(Ordering::Relaxed),
        )
    }
}
