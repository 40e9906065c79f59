use crate::parallel::WorkerPool;
use crate::pipeline::ProcessorKind;
use crate::processors::DEFAULT_CHUNK_SIZE;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings for one `process` run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Worker threads; 0 sizes the pool from the CPU count
    pub threads: usize,
    /// Share of CPU cores used when `threads` is 0
    pub thread_percentage: u8,
    pub output_dir: PathBuf,
    pub processor: ProcessorKind,
    /// Bytes read between `processing` events
    pub chunk_size: usize,
    pub verbose: bool,
    pub stats: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            threads: 4,
            thread_percentage: 75,
            output_dir: PathBuf::from("output"),
            processor: ProcessorKind::Auto,
            chunk_size: DEFAULT_CHUNK_SIZE,
            verbose: false,
            stats: false,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.thread_percentage) {
            anyhow::bail!(
                "thread_percentage must be between 1 and 100, got {}",
                self.thread_percentage
            );
        }
        if self.chunk_size == 0 {
            anyhow::bail!("chunk_size must be greater than 0");
        }
        Ok(())
    }

    pub fn worker_count(&self) -> usize {
        if self.threads > 0 {
            self.threads
        } else {
            WorkerPool::optimal_size(0, self.thread_percentage)
        }
    }
}
