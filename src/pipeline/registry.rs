use super::core::ItemProcessor;
use crate::processors::TextProcessor;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Type tag choosing which step handles a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProcessorKind {
    /// Always use the text analyzer
    Text,
    /// Pick by file extension, falling back to text
    #[default]
    Auto,
}

/// Registered processing steps, looked up by name or file extension
pub struct ProcessorRegistry {
    processors: Vec<Arc<dyn ItemProcessor>>,
    fallback: Arc<dyn ItemProcessor>,
}

impl ProcessorRegistry {
    pub fn new(fallback: Arc<dyn ItemProcessor>) -> Self {
        Self {
            processors: vec![fallback.clone()],
            fallback,
        }
    }

    /// Registry with every built-in processor, writing reports to `output_dir`
    pub fn standard(output_dir: &Path, chunk_size: usize) -> Result<Self> {
        let text: Arc<dyn ItemProcessor> = Arc::new(TextProcessor::new(output_dir, chunk_size)?);
        Ok(Self::new(text))
    }

    /// Like [`standard`](Self::standard), with reports laid out like the
    /// directories under `input_root`
    pub fn standard_mirrored(output_dir: &Path, chunk_size: usize, input_root: &Path) -> Result<Self> {
        let text = TextProcessor::new(output_dir, chunk_size)?.with_input_root(input_root);
        Ok(Self::new(Arc::new(text)))
    }

    pub fn register(&mut self, processor: Arc<dyn ItemProcessor>) {
        self.processors.push(processor);
    }

    pub fn by_name(&self, name: &str) -> Option<Arc<dyn ItemProcessor>> {
        self.processors.iter().find(|p| p.name() == name).cloned()
    }

    /// First processor accepting the file's extension, or the fallback
    pub fn for_path(&self, path: &Path) -> Arc<dyn ItemProcessor> {
        let extension = extension_of(path);
        self.processors
            .iter()
            .find(|p| p.can_process(&extension))
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }

    pub fn resolve(&self, kind: ProcessorKind, path: &Path) -> Arc<dyn ItemProcessor> {
        match kind {
            ProcessorKind::Text => self
                .by_name(TextProcessor::NAME)
                .unwrap_or_else(|| self.fallback.clone()),
            ProcessorKind::Auto => self.for_path(path),
        }
    }
}

/// Lowercase extension without the dot; empty when there is none
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}
