//! Layered configuration
//!
//! Sources, lowest priority first:
//!
//! 1. embedded `default-config.toml`
//! 2. `~/.config/fileflow/config.toml`
//! 3. `./fileflow.toml`
//! 4. `--config FILE` (TOML, JSON or YAML)
//! 5. `FILEFLOW_*` environment variables
//! 6. command line flags that were actually given
//!
//! [`FileflowConfig`] holds the merged `figment`; [`AppConfig`] is the typed,
//! validated result handed to the rest of the program.

pub mod core;
pub mod overrides;
pub mod settings;
pub mod smart_load;

pub use self::core::FileflowConfig;
pub use overrides::CliOverrides;
pub use settings::AppConfig;
