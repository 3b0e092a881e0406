//! Analyzer configuration
//!
//! Loaded from a JSON file such as:
//!
//! ```json
//! { "maxFileLines": 20000, "languages": ["java", "rust"], "trackArgumentCounts": true }
//! ```
//!
//! A missing file means defaults. Unknown keys are ignored.

use anyhow::Context;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::{AnalysisError, Result};
use crate::language::canonical_language;

pub const DEFAULT_MAX_FILE_LINES: usize = 20_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyzerConfig {
    /// Files with more lines than this are rejected before parsing; zero or negative means the default
    #[serde(deserialize_with = "positive_or_default")]
    pub max_file_lines: usize,
    /// Allow-list of language tags; `None` enables every supported language
    pub languages: Option<Vec<String>>,
    /// Whether argument counts take part in call-site identity
    pub track_argument_counts: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_file_lines: DEFAULT_MAX_FILE_LINES,
            languages: None,
            track_argument_counts: true,
        }
    }
}

fn positive_or_default<'de, D>(deserializer: D) -> std::result::Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let value = i64::deserialize(deserializer)?;
    Ok(usize::try_from(value)
        .ok()
        .filter(|limit| *limit > 0)
        .unwrap_or(DEFAULT_MAX_FILE_LINES))
}

impl AnalyzerConfig {
    /// Parse configuration from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .context("config is not valid JSON")
            .map_err(AnalysisError::Config)
    }

    /// Load configuration from `path`, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| AnalysisError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Whether `language` passes the allow-list, either by its own tag or its canonical one
    pub fn is_enabled(&self, language: &str) -> bool {
        let canonical = canonical_language(language);
        match &self.languages {
            Some(allowed) => allowed.iter().any(|l| l == language || l == canonical),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = AnalyzerConfig::load(&dir.path().join("codeframe.json")).unwrap();
        assert_eq!(config, AnalyzerConfig::default());
        assert_eq!(config.max_file_lines, 20_000);
        assert!(config.is_enabled("ruby"));
    }

    #[test]
    fn test_load_partial_config_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "maxFileLines": 500, "languages": ["java"] }}"#).unwrap();

        let config = AnalyzerConfig::load(file.path()).unwrap();
        assert_eq!(config.max_file_lines, 500);
        assert!(config.track_argument_counts, "unset keys keep defaults");
        assert!(config.is_enabled("java"));
        assert!(!config.is_enabled("python"));
    }

    #[test]
    fn test_zero_limit_falls_back_to_default() {
        let config = AnalyzerConfig::from_json_str(r#"{ "maxFileLines": 0 }"#).unwrap();
        assert_eq!(config.max_file_lines, DEFAULT_MAX_FILE_LINES);
    }

    #[test]
    fn test_negative_limit_falls_back_to_default() {
        let config = AnalyzerConfig::from_json_str(r#"{ "maxFileLines": -5 }"#).unwrap();
        assert_eq!(config.max_file_lines, DEFAULT_MAX_FILE_LINES);
    }

    #[test]
    fn test_allow_list_matches_canonical_language() {
        let config = AnalyzerConfig::from_json_str(r#"{ "languages": ["typescript"] }"#).unwrap();
        assert!(config.is_enabled("typescript"));
        assert!(config.is_enabled("tsx"));
        assert!(!config.is_enabled("javascript"));
    }

    #[test]
    fn test_invalid_json_is_a_config_error() {
        let err = AnalyzerConfig::from_json_str("{ nope").unwrap_err();
        assert!(matches!(err, AnalysisError::Config(_)));
    }
}
