//! # fileflow - concurrent file processing
//!
//! Runs a batch of files through a pluggable processing pipeline on a fixed
//! pool of worker threads, publishing progress on an observer bus.
//!
//! ## Building blocks
//!
//! - [`parallel`]: blocking FIFO queue, worker pool and per-task result handles
//! - [`events`]: `Subject`/`Observer` bus holding weak observer references
//! - [`pipeline`]: per-file template and the `ItemProcessor` step trait
//! - [`processors`]: built-in steps (text analysis)
//! - [`monitor`] and [`stats`]: progress display and run totals
//! - [`config`] and [`cli`]: layered settings and the `fileflow` binary
//!
//! ## Quick Start
//!
//! ```bash
//! # Analyze every file under data/ with 8 workers
//! fileflow process -i data/ -o results/ -t 8 --stats
//!
//! # Inspect the merged configuration
//! fileflow config show
//! ```

pub mod cli;
pub mod config;
pub mod events;
pub mod monitor;
pub mod parallel;
pub mod pipeline;
pub mod processors;
pub mod stats;

pub use cli::{Cli, Output};
pub use config::{AppConfig, FileflowConfig};
