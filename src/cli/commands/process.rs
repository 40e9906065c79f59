use crate::cli::Output;
use crate::config::{CliOverrides, FileflowConfig};
use crate::monitor::{MonitorMode, ProgressMonitor, format_bytes, format_duration};
use crate::parallel::{TaskHandle, WorkerPool};
use crate::pipeline::{FileProcessor, ProcessResult, ProcessorKind, ProcessorRegistry};
use crate::stats::ProcessingStats;
use anyhow::{Context, Result};
use clap::Args;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::Ordering;

#[derive(Args)]
pub struct ProcessArgs {
    /// Input file or directory
    #[arg(short, long, value_name = "PATH")]
    pub input: PathBuf,

    /// Output directory for reports [default: output]
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Number of worker threads, 0 for one per available core share
    #[arg(short, long, value_name = "NUM")]
    pub threads: Option<usize>,

    /// Processor type
    #[arg(long = "type", value_enum, value_name = "TYPE")]
    pub processor: Option<ProcessorKind>,

    /// Bytes read between progress updates
    #[arg(long, value_name = "BYTES")]
    pub chunk_size: Option<usize>,

    /// Show performance statistics
    #[arg(short, long)]
    pub stats: bool,
}

pub fn execute(args: ProcessArgs, verbose: u8, quiet: bool, config_path: Option<&Path>) -> Result<ExitCode> {
    let overrides = CliOverrides {
        threads: args.threads,
        output_dir: args.output.clone(),
        processor: args.processor,
        chunk_size: args.chunk_size,
        verbose: CliOverrides::flag(verbose > 0),
        stats: CliOverrides::flag(args.stats),
    };
    let config = FileflowConfig::load(config_path, Some(overrides))?.app_config()?;
    super::setup_logging(verbose.max(u8::from(config.verbose)), quiet);
    let output = Output::new(config.verbose, quiet);
    let threads = config.worker_count();

    tracing::info!("Starting file processing");
    tracing::info!("Input: {}", args.input.display());
    tracing::info!("Output: {}", config.output_dir.display());
    tracing::info!("Threads: {}", threads);

    let files = collect_files(&args.input);
    if files.is_empty() {
        output.error(&format!("No files found to process in {}", args.input.display()));
        return Ok(ExitCode::FAILURE);
    }
    output.verbose(&format!("Found {} files to process", files.len()));

    let total_bytes = calculate_total_size(&files);
    let mode = if quiet {
        MonitorMode::Silent
    } else if config.verbose {
        MonitorMode::Verbose
    } else if console::Term::stderr().is_term() {
        MonitorMode::Bar
    } else {
        MonitorMode::Silent
    };
    let monitor = Arc::new(ProgressMonitor::new(mode));
    monitor.set_totals(files.len(), total_bytes);

    let registry = ProcessorRegistry::standard_mirrored(&config.output_dir, config.chunk_size, &args.input)?;
    let pool = WorkerPool::new(threads).context("Failed to start worker pool")?;
    let stats = ProcessingStats::new();

    let mut handles: Vec<(PathBuf, TaskHandle<ProcessResult>)> = Vec::with_capacity(files.len());
    for file in files {
        let pipeline = FileProcessor::new(registry.resolve(config.processor, &file));
        pipeline.attach_progress_observer(&monitor);

        let target = file.clone();
        let handle = pool.submit(move || pipeline.process(&target))?;
        handles.push((file, handle));
    }

    for (file, handle) in handles {
        match handle.wait() {
            Ok(result) => {
                if !result.success {
                    tracing::error!("Processing failed: {}", result.message);
                }
                stats.record(&result);
            }
            Err(e) => {
                tracing::error!("Task execution failed for {}: {}", file.display(), e);
                stats.record_error();
            }
        }
    }

    pool.shutdown();
    stats.finish();
    monitor.finish();

    print_summary(&output, &monitor);
    if config.stats {
        print_statistics(&output, &stats, total_bytes, threads);
    }

    let errors = stats.errors.load(Ordering::Relaxed);
    if errors > 0 {
        output.error(&format!("{errors} file(s) failed"));
        Ok(ExitCode::FAILURE)
    } else {
        output.success("File processing completed");
        Ok(ExitCode::SUCCESS)
    }
}

/// Every regular file under `input`, or `input` itself when it is a file
///
/// Hidden files are included and no ignore files are honoured. Paths are
/// sorted so submission order is stable.
pub fn collect_files(input: &Path) -> Vec<PathBuf> {
    if input.is_file() {
        return vec![input.to_path_buf()];
    }
    if !input.is_dir() {
        return Vec::new();
    }

    let walker = WalkBuilder::new(input)
        .standard_filters(false)
        .follow_links(false)
        .build();

    let mut files: Vec<PathBuf> = walker
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Walk error: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    files
}

pub fn calculate_total_size(files: &[PathBuf]) -> u64 {
    files
        .iter()
        .map(|file| match std::fs::metadata(file) {
            Ok(metadata) => metadata.len(),
            Err(_) => {
                tracing::warn!("Cannot get size of file: {}", file.display());
                0
            }
        })
        .sum()
}

fn print_summary(output: &Output, monitor: &ProgressMonitor) {
    let summary = monitor.summary();

    output.header("Processing Summary");
    output.table_row(
        "Files processed",
        &format!("{}/{}", summary.completed_files, summary.total_files),
    );
    output.status_row("Files failed", &summary.failed_files.to_string(), summary.failed_files == 0);
    output.table_row(
        "Bytes processed",
        &format!(
            "{}/{}",
            format_bytes(summary.processed_bytes),
            format_bytes(summary.total_bytes)
        ),
    );
    output.table_row("Duration", &format_duration(summary.duration));
    output.table_row("Throughput", &format!("{:.2} MB/s", summary.throughput_mbps()));
}

fn print_statistics(output: &Output, stats: &ProcessingStats, total_bytes: u64, threads: usize) {
    let (processed, _, errors) = stats.get_counts();

    output.header("Performance Statistics");
    output.table_row("Total files", &(processed + errors).to_string());
    output.table_row("Successfully processed", &processed.to_string());
    output.status_row("Errors", &errors.to_string(), errors == 0);
    output.table_row("Total bytes", &total_bytes.to_string());
    output.table_row("Processing time", &format!("{:.3} seconds", stats.duration_seconds()));
    output.table_row("Throughput", &format!("{:.2} MB/s", stats.throughput_mbps()));
    output.table_row("Threads used", &threads.to_string());
}
