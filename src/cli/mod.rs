//! Command-line interface
//!
//! `clap` derive parsing lives in [`commands`]; [`Output`] handles styled
//! terminal output.

pub mod commands;
mod output;

pub use commands::Cli;
pub use output::Output;
