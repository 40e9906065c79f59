use crate::cli::Output;
use crate::config::core::{DEFAULT_CONFIG, REPO_CONFIG_FILE};
use crate::config::{CliOverrides, FileflowConfig};
use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use std::path::Path;
use std::process::ExitCode;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Create a fileflow.toml with the default settings
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
    /// Display current merged configuration
    Show {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = ShowFormat::Toml)]
        format: ShowFormat,
    },
    /// Check that the merged configuration is valid
    Validate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShowFormat {
    Toml,
    Json,
}

pub fn execute(args: ConfigArgs, quiet: bool, custom_config: Option<&Path>) -> Result<ExitCode> {
    let output = Output::new(false, quiet);

    match args.command {
        ConfigCommand::Init { force } => init(&output, force),
        ConfigCommand::Show { format } => {
            let config = FileflowConfig::load(custom_config, None::<CliOverrides>)?.app_config()?;
            let rendered = match format {
                ShowFormat::Toml => toml::to_string_pretty(&config).context("Failed to render TOML")?,
                ShowFormat::Json => serde_json::to_string_pretty(&config).context("Failed to render JSON")?,
            };
            output.plain(rendered.trim_end());
            Ok(ExitCode::SUCCESS)
        }
        ConfigCommand::Validate => {
            let loaded = FileflowConfig::load(custom_config, None::<CliOverrides>)
                .and_then(|config| config.app_config());
            match loaded {
                Ok(config) => {
                    output.success("Configuration is valid");
                    output.table_row("Worker threads", &config.worker_count().to_string());
                    output.table_row("Output directory", &config.output_dir.display().to_string());
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    output.error(&format!("{e:#}"));
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}

fn init(output: &Output, force: bool) -> Result<ExitCode> {
    let path = Path::new(REPO_CONFIG_FILE);
    if path.exists() && !force {
        output.warning(&format!("{REPO_CONFIG_FILE} already exists, use --force to overwrite"));
        return Ok(ExitCode::FAILURE);
    }

    std::fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    output.success(&format!("Created {REPO_CONFIG_FILE} with default settings"));
    Ok(ExitCode::SUCCESS)
}
