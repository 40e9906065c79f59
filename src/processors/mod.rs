//! Built-in [`ItemProcessor`](crate::pipeline::ItemProcessor) implementations

pub mod text;

pub use text::{DEFAULT_CHUNK_SIZE, TextProcessor, TextStats};
