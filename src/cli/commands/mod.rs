use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

pub mod config;
pub mod process;

#[derive(Parser)]
#[command(
    name = "fileflow",
    version = env!("CARGO_PKG_VERSION"),
    about = "Multi-threaded file processing with live progress",
    long_about = "fileflow runs every input file through a processing pipeline on a fixed pool \
                  of worker threads and reports progress, per-file results and throughput."
)]
pub struct Cli {
    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use custom configuration file
    #[arg(short, long, value_name = "FILE", env = "FILEFLOW_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Process a file or every file under a directory
    Process(process::ProcessArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    pub fn run(self) -> Result<ExitCode> {
        match self.command {
            // logging waits for the merged config, which can turn on verbose
            Some(Commands::Process(args)) => {
                process::execute(args, self.verbose, self.quiet, self.config.as_deref())
            }
            Some(Commands::Config(args)) => {
                setup_logging(self.verbose, self.quiet);
                config::execute(args, self.quiet, self.config.as_deref())
            }
            None => {
                Cli::command().print_help()?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

pub(crate) fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info,ignore=warn"),
            2 => tracing_subscriber::EnvFilter::new("debug,ignore=warn"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    // Logs share stderr with the progress bar, leaving stdout for results
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
