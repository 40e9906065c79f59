use std::collections::HashMap;
use std::time::Duration;

/// Outcome of running the pipeline over one file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessResult {
    pub success: bool,
    pub message: String,
    pub bytes_processed: u64,
    pub processing_time: Duration,
    /// Computed facts such as line/word counts and the output path
    pub metadata: HashMap<String, String>,
}

impl ProcessResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.metadata.insert(key.into(), value.to_string());
        self
    }

    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }
}
