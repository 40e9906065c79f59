use super::settings::AppConfig;
use super::smart_load;
use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::Serialize;
use std::path::{Path, PathBuf};

// Embed the default config at compile time
pub(crate) const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

pub const ENV_PREFIX: &str = "FILEFLOW_";
pub const REPO_CONFIG_FILE: &str = "fileflow.toml";

pub struct FileflowConfig {
    figment: Figment,
}

impl FileflowConfig {
    pub fn load<T: Serialize>(custom_config: Option<&Path>, cli_overrides: Option<T>) -> Result<Self> {
        tracing::trace!("CONFIG LOAD: Starting");

        if let Some(path) = custom_config {
            if !path.is_file() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
        }

        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG)); // 1. Defaults (lowest)

        if let Some(user_config) = Self::user_config_path() {
            figment = figment.merge(Toml::file(user_config)); // 2. User config
        }
        figment = figment.merge(Toml::file(REPO_CONFIG_FILE)); // 3. Repo config

        if let Some(path) = custom_config {
            tracing::trace!("CONFIG LOAD: Custom config {}", path.display());
            figment = figment.merge(smart_load::auto(path)); // 4. --config FILE
        }

        // 5. Environment; FILEFLOW_CONFIG names the file and is not a setting
        figment = figment.merge(Env::prefixed(ENV_PREFIX).ignore(&["config"]));

        if let Some(cli) = cli_overrides {
            tracing::trace!("CONFIG LOAD: Applying CLI overrides");
            figment = figment.merge(Serialized::defaults(cli)); // 6. CLI (highest)
        }

        Ok(FileflowConfig { figment })
    }

    /// Typed, validated view of the merged layers
    pub fn app_config(&self) -> Result<AppConfig> {
        let config: AppConfig = self
            .figment
            .extract()
            .context("Invalid configuration value")?;
        config.validate()?;
        Ok(config)
    }

    fn user_config_path() -> Option<PathBuf> {
        std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config/fileflow/config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CliOverrides;
    use crate::pipeline::ProcessorKind;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_defaults_load() {
        let config = FileflowConfig::load(None, None::<CliOverrides>)
            .unwrap()
            .app_config()
            .unwrap();
        assert_eq!(config.chunk_size, 1024);
        assert_eq!(config.processor, ProcessorKind::Auto);
    }

    #[test]
    fn test_custom_toml_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "custom.toml", "chunk_size = 4096\nprocessor = \"text\"\n");

        let config = FileflowConfig::load(Some(&path), None::<CliOverrides>)
            .unwrap()
            .app_config()
            .unwrap();
        assert_eq!(config.chunk_size, 4096);
        assert_eq!(config.processor, ProcessorKind::Text);
    }

    #[test]
    fn test_custom_json_is_detected_by_extension() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "custom.json", r#"{"thread_percentage": 50}"#);

        let config = FileflowConfig::load(Some(&path), None::<CliOverrides>)
            .unwrap()
            .app_config()
            .unwrap();
        assert_eq!(config.thread_percentage, 50);
    }

    #[test]
    fn test_cli_overrides_win() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "custom.toml", "chunk_size = 4096\nstats = true\n");
        let overrides = CliOverrides {
            chunk_size: Some(16),
            ..Default::default()
        };

        let config = FileflowConfig::load(Some(&path), Some(overrides))
            .unwrap()
            .app_config()
            .unwrap();
        assert_eq!(config.chunk_size, 16);
        // not given on the command line, so the file value survives
        assert!(config.stats);
    }

    #[test]
    fn test_missing_custom_config_is_an_error() {
        let result = FileflowConfig::load(Some(Path::new("does-not-exist.toml")), None::<CliOverrides>);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bad.toml", "chunk_size = 0\n");

        let config = FileflowConfig::load(Some(&path), None::<CliOverrides>).unwrap();
        let err = config.app_config().unwrap_err();
        assert!(err.to_string().contains("chunk_size"));
    }
}
