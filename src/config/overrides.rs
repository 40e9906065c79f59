use crate::pipeline::ProcessorKind;
use serde::Serialize;
use std::path::PathBuf;

/// Values given on the command line
///
/// Only fields that are `Some` are serialized, so flags the user did not pass
/// never mask values from config files or the environment.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processor: Option<ProcessorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<bool>,
}

impl CliOverrides {
    /// `true` flags become overrides; an absent flag leaves the layer below alone
    pub fn flag(set: bool) -> Option<bool> {
        set.then_some(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_fields_are_skipped() {
        let overrides = CliOverrides {
            threads: Some(8),
            verbose: CliOverrides::flag(false),
            stats: CliOverrides::flag(true),
            ..Default::default()
        };

        let value = serde_json::to_value(&overrides).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert_eq!(object["threads"], 8);
        assert_eq!(object["stats"], true);
    }
}
