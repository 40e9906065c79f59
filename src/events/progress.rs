use std::fmt;
use std::time::Instant;

/// Lifecycle tag carried by every progress event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgressStatus {
    Started,
    Processing,
    Completed,
    Failed,
}

impl ProgressStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressStatus::Started => "started",
            ProgressStatus::Processing => "processing",
            ProgressStatus::Completed => "completed",
            ProgressStatus::Failed => "failed",
        }
    }

    /// `completed` and `failed` end an invocation
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProgressStatus::Completed | ProgressStatus::Failed)
    }
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable snapshot of one file's processing status
#[derive(Debug, Clone)]
pub struct ProgressEvent {
    filename: String,
    bytes_processed: u64,
    total_bytes: u64,
    percentage: f64,
    status: ProgressStatus,
    timestamp: Instant,
}

impl ProgressEvent {
    pub fn new(
        filename: impl Into<String>,
        bytes_processed: u64,
        total_bytes: u64,
        status: ProgressStatus,
    ) -> Self {
        let percentage = if total_bytes > 0 {
            (bytes_processed as f64 / total_bytes as f64 * 100.0).min(100.0)
        } else {
            0.0
        };

        Self {
            filename: filename.into(),
            bytes_processed,
            total_bytes,
            percentage,
            status,
            timestamp: Instant::now(),
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn bytes_processed(&self) -> u64 {
        self.bytes_processed
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    /// `bytes_processed / total_bytes * 100`, clamped to [0, 100]; 0 for empty files
    pub fn percentage(&self) -> f64 {
        self.percentage
    }

    pub fn status(&self) -> ProgressStatus {
        self.status
    }

    pub fn timestamp(&self) -> Instant {
        self.timestamp
    }
}
