use figment::providers::{Data, Format, Json, Toml, Yaml};
use figment::value::{Dict, Map};
use figment::{Error, Metadata, Profile, Provider};
use std::path::Path;

/// Configuration format of a file on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Format implied by the file extension, if it names one
    pub fn from_extension(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// Best guess from file content
    pub fn detect(content: &str) -> Option<Self> {
        let trimmed = content.trim();

        if (trimmed.starts_with('{') && trimmed.ends_with('}'))
            || (trimmed.starts_with('[') && trimmed.ends_with(']') && !trimmed.contains('='))
        {
            return Some(Self::Json);
        }

        let mut lines = trimmed
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'));

        if lines.clone().any(|l| {
            (l.starts_with('[') && l.ends_with(']')) || (l.contains('=') && !l.contains(':'))
        }) {
            return Some(Self::Toml);
        }

        if trimmed.starts_with("---") || lines.any(|l| l.contains(':')) {
            return Some(Self::Yaml);
        }

        None
    }
}

/// Provider for a config file, choosing the parser by extension and then by
/// content. Unknown formats fall back to TOML.
pub fn auto<P: AsRef<Path>>(path: P) -> SmartProvider {
    let path = path.as_ref();

    let format = ConfigFormat::from_extension(path).unwrap_or_else(|| {
        let detected = std::fs::read_to_string(path)
            .ok()
            .and_then(|content| ConfigFormat::detect(&content));
        tracing::debug!(
            "Config {} has no known extension, using {:?}",
            path.display(),
            detected.unwrap_or(ConfigFormat::Toml)
        );
        detected.unwrap_or(ConfigFormat::Toml)
    });

    match format {
        ConfigFormat::Toml => SmartProvider::Toml(Toml::file(path)),
        ConfigFormat::Json => SmartProvider::Json(Json::file(path)),
        ConfigFormat::Yaml => SmartProvider::Yaml(Yaml::file(path)),
    }
}

pub enum SmartProvider {
    Toml(Data<Toml>),
    Json(Data<Json>),
    Yaml(Data<Yaml>),
}

impl Provider for SmartProvider {
    fn metadata(&self) -> Metadata {
        match self {
            SmartProvider::Toml(p) => p.metadata(),
            SmartProvider::Json(p) => p.metadata(),
            SmartProvider::Yaml(p) => p.metadata(),
        }
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        match self {
            SmartProvider::Toml(p) => p.data(),
            SmartProvider::Json(p) => p.data(),
            SmartProvider::Yaml(p) => p.data(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_extension(Path::new("a.TOML")), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_extension(Path::new("a.json")), Some(ConfigFormat::Json));
        assert_eq!(ConfigFormat::from_extension(Path::new("a.yml")), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::from_extension(Path::new("a.conf")), None);
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(ConfigFormat::detect(r#"{"threads": 2}"#), Some(ConfigFormat::Json));
        assert_eq!(ConfigFormat::detect("threads: 2"), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::detect("[section]\nkey = 1"), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::detect("# comment\nthreads = 2"), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::detect(""), None);
    }
}
