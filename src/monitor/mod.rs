//! Progress observer for a batch run
//!
//! [`ProgressMonitor`] is attached to every file pipeline of a run. It counts
//! finished files and processed bytes from the terminal events only, so a
//! file contributes its size exactly once however many intermediate events
//! it publishes. Display is either an `indicatif` bar, one `tracing` line per
//! event, or nothing.

pub mod format;

pub use format::{format_bytes, format_duration, throughput_mbps};

use crate::events::{Observer, ProgressEvent, ProgressStatus};
use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

const BAR_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] {wide_bar:.cyan/blue} {pos}/{len} files {msg}";

/// How a [`ProgressMonitor`] renders events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorMode {
    /// Single progress bar over the file count
    Bar,
    /// One log line per event
    Verbose,
    /// Count only
    Silent,
}

/// Snapshot of a monitor's counters
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorSummary {
    pub completed_files: usize,
    pub failed_files: usize,
    pub total_files: usize,
    pub processed_bytes: u64,
    pub total_bytes: u64,
    pub duration: Duration,
}

impl MonitorSummary {
    pub fn throughput_mbps(&self) -> f64 {
        throughput_mbps(self.processed_bytes, self.duration)
    }
}

pub struct ProgressMonitor {
    mode: MonitorMode,
    total_files: AtomicUsize,
    total_bytes: AtomicU64,
    completed_files: AtomicUsize,
    failed_files: AtomicUsize,
    processed_bytes: AtomicU64,
    start: Instant,
    bar: Option<ProgressBar>,
}

impl ProgressMonitor {
    pub fn new(mode: MonitorMode) -> Self {
        let bar = (mode == MonitorMode::Bar).then(|| {
            let bar = ProgressBar::new(0);
            bar.set_style(
                ProgressStyle::with_template(BAR_TEMPLATE)
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("█▉▊▋▌▍▎▏  "),
            );
            bar
        });

        Self {
            mode,
            total_files: AtomicUsize::new(0),
            total_bytes: AtomicU64::new(0),
            completed_files: AtomicUsize::new(0),
            failed_files: AtomicUsize::new(0),
            processed_bytes: AtomicU64::new(0),
            start: Instant::now(),
            bar,
        }
    }

    pub fn set_totals(&self, files: usize, bytes: u64) {
        self.total_files.store(files, Ordering::Relaxed);
        self.total_bytes.store(bytes, Ordering::Relaxed);
        if let Some(bar) = &self.bar {
            bar.set_length(files as u64);
        }
    }

    /// Clear the bar; counting continues if more events arrive
    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }

    pub fn summary(&self) -> MonitorSummary {
        MonitorSummary {
            completed_files: self.completed_files.load(Ordering::Relaxed),
            failed_files: self.failed_files.load(Ordering::Relaxed),
            total_files: self.total_files.load(Ordering::Relaxed),
            processed_bytes: self.processed_bytes.load(Ordering::Relaxed),
            total_bytes: self.total_bytes.load(Ordering::Relaxed),
            duration: self.start.elapsed(),
        }
    }

    fn record_terminal(&self, event: &ProgressEvent) {
        let counter = if event.status() == ProgressStatus::Completed {
            &self.completed_files
        } else {
            &self.failed_files
        };
        counter.fetch_add(1, Ordering::Relaxed);
        self.processed_bytes
            .fetch_add(event.total_bytes(), Ordering::Relaxed);
    }

    fn render(&self, event: &ProgressEvent) {
        match self.mode {
            MonitorMode::Silent => {}
            MonitorMode::Verbose => {
                tracing::info!(
                    "{}: {} ({:.1}%)",
                    event.status(),
                    event.filename(),
                    event.percentage()
                );
            }
            MonitorMode::Bar => {
                let Some(bar) = &self.bar else { return };
                if event.status().is_terminal() {
                    bar.inc(1);
                }
                bar.set_message(format!(
                    "{} / {}",
                    format_bytes(self.processed_bytes.load(Ordering::Relaxed)),
                    format_bytes(self.total_bytes.load(Ordering::Relaxed))
                ));
            }
        }
    }
}

impl Observer<ProgressEvent> for ProgressMonitor {
    fn notify(&self, event: &ProgressEvent) -> Result<()> {
        if event.status().is_terminal() {
            self.record_terminal(event);
        }
        self.render(event);
        Ok(())
    }
}
