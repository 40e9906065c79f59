use super::types::ProcessResult;
use crate::events::{Observer, ProgressEvent, ProgressStatus, Subject};
use crate::parallel::error::panic_message;
use anyhow::Result;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// A pluggable "process one file" step
///
/// Implementations fill in `success`, `message` and `metadata`; the pipeline
/// stamps size and timing afterwards. Returning `Err` (or panicking) is
/// turned into a failed [`ProcessResult`] by the pipeline.
pub trait ItemProcessor: Send + Sync {
    fn process_item(&self, path: &Path, progress: &ProgressNotifier<'_>) -> Result<ProcessResult>;

    /// `extension` is lowercase, without the leading dot
    fn can_process(&self, extension: &str) -> bool;

    fn name(&self) -> &'static str;
}

/// Lets a step publish intermediate events on its pipeline's bus
pub struct ProgressNotifier<'a> {
    subject: &'a Subject<ProgressEvent>,
}

impl ProgressNotifier<'_> {
    pub fn notify_progress(&self, path: &Path, processed: u64, total: u64, status: ProgressStatus) {
        self.subject
            .notify_all(&ProgressEvent::new(path.display().to_string(), processed, total, status));
    }
}

/// Per-file pipeline wrapping an [`ItemProcessor`]
///
/// Checks the input exists, measures its size, publishes `started` and a
/// terminal `completed`/`failed` event, times the step and normalizes every
/// outcome into a [`ProcessResult`]. Nothing escapes [`FileProcessor::process`]
/// as an error.
pub struct FileProcessor {
    step: Arc<dyn ItemProcessor>,
    progress: Subject<ProgressEvent>,
}

impl FileProcessor {
    pub fn new(step: Arc<dyn ItemProcessor>) -> Self {
        Self {
            step,
            progress: Subject::new(),
        }
    }

    pub fn attach_progress_observer<O>(&self, observer: &Arc<O>)
    where
        O: Observer<ProgressEvent> + 'static,
    {
        self.progress.attach(observer);
    }

    pub fn detach_progress_observer<O>(&self, observer: &Arc<O>)
    where
        O: Observer<ProgressEvent> + 'static,
    {
        self.progress.detach(observer);
    }

    pub fn processor_name(&self) -> &'static str {
        self.step.name()
    }

    pub fn process(&self, path: &Path) -> ProcessResult {
        let start = Instant::now();
        let filename = path.display().to_string();

        if !path.exists() {
            tracing::debug!("Skipping missing input {}", filename);
            return ProcessResult {
                message: format!("File does not exist: {filename}"),
                processing_time: start.elapsed(),
                ..Default::default()
            };
        }

        let file_size = match std::fs::metadata(path) {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                self.publish(&filename, 0, 0, ProgressStatus::Failed);
                return ProcessResult {
                    message: format!("Cannot read metadata for {filename}: {e}"),
                    processing_time: start.elapsed(),
                    ..Default::default()
                };
            }
        };

        self.publish(&filename, 0, file_size, ProgressStatus::Started);

        let notifier = ProgressNotifier {
            subject: &self.progress,
        };
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.step.process_item(path, &notifier)));

        let mut result = match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => ProcessResult::failure(format!("Processing failed: {e:#}")),
            Err(payload) => ProcessResult::failure(format!(
                "Processing failed: {}",
                panic_message(payload.as_ref())
            )),
        };
        if !result.success && result.message.is_empty() {
            result.message = format!("Processing failed: {filename}");
        }

        result.bytes_processed = file_size;
        result.processing_time = start.elapsed();

        let status = if result.success {
            ProgressStatus::Completed
        } else {
            ProgressStatus::Failed
        };
        self.publish(&filename, file_size, file_size, status);

        tracing::debug!(
            "{} {} in {:?} ({} bytes)",
            self.step.name(),
            status,
            result.processing_time,
            file_size
        );
        result
    }

    fn publish(&self, filename: &str, processed: u64, total: u64, status: ProgressStatus) {
        self.progress
            .notify_all(&ProgressEvent::new(filename, processed, total, status));
    }
}

/// `<output_dir>/<stem><suffix><.ext>` for an input path
pub fn output_path(output_dir: &Path, input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = input
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    output_dir.join(format!("{stem}{suffix}{extension}"))
}

/// [`output_path`] under the input's directory relative to `input_root`
///
/// Keeps reports for same-named files in different subdirectories apart.
/// Inputs outside `input_root` land directly in `output_dir`.
pub fn mirrored_output_path(output_dir: &Path, input_root: &Path, input: &Path, suffix: &str) -> PathBuf {
    match input.strip_prefix(input_root).ok().and_then(Path::parent) {
        Some(subdir) if !subdir.as_os_str().is_empty() => output_path(&output_dir.join(subdir), input, suffix),
        _ => output_path(output_dir, input, suffix),
    }
}
