use std::path::PathBuf;

use serde::Deserialize;

/// Where the fitted pipeline lives unless told otherwise, relative to the
/// working directory.
pub const DEFAULT_MODEL_PATH: &str = "models/lr_cv_tuned.json";

/// Settings used when loading a classifier.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassifierConfig {
    /// Path to the JSON artifact
    pub artifact_path: PathBuf,
    /// Hex SHA-256 the artifact must match before it is parsed
    pub expected_sha256: Option<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            artifact_path: PathBuf::from(DEFAULT_MODEL_PATH),
            expected_sha256: None,
        }
    }
}

impl ClassifierConfig {
    pub fn new(artifact_path: impl Into<PathBuf>) -> Self {
        Self {
            artifact_path: artifact_path.into(),
            ..Self::default()
        }
    }

    pub fn with_expected_sha256(mut self, hash: impl Into<String>) -> Self {
        self.expected_sha256 = Some(hash.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_at_fixed_path() {
        let config = ClassifierConfig::default();
        assert_eq!(config.artifact_path, PathBuf::from("models/lr_cv_tuned.json"));
        assert!(config.expected_sha256.is_none());
    }

    #[test]
    fn test_partial_config_deserializes() {
        let config: ClassifierConfig =
            serde_json::from_str(r#"{ "expected_sha256": "abcd" }"#).unwrap();
        assert_eq!(config.artifact_path, PathBuf::from(DEFAULT_MODEL_PATH));
        assert_eq!(config.expected_sha256.as_deref(), Some("abcd"));
    }
}
