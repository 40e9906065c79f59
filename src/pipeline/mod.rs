//! Per-file processing pipeline
//!
//! [`FileProcessor`] is the template every file goes through; the actual work
//! is delegated to an [`ItemProcessor`] picked from a [`ProcessorRegistry`].

pub mod core;
pub mod registry;
pub mod types;

pub use self::core::{FileProcessor, ItemProcessor, ProgressNotifier, mirrored_output_path, output_path};
pub use registry::{ProcessorKind, ProcessorRegistry, extension_of};
pub use types::ProcessResult;
