//! ExtractorManager - Public API for turning source files into SourceUnits
//!
//! Handles language detection, size limits and parsing, then delegates to the
//! language-specific extractors through the factory.

use crate::config::AnalyzerConfig;
use crate::error::{AnalysisError, Result};
use crate::extractors::base::SourceUnit;
use crate::extractors::factory::analyze_with_config;
use crate::language::{detect_language_from_extension, get_tree_sitter_language, SUPPORTED_LANGUAGES};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};
use tree_sitter::Parser;

/// Result of analyzing one file in a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum FileOutcome {
    #[serde(rename = "unit")]
    Analyzed(SourceUnit),
    #[serde(rename = "error")]
    Failed {
        file: String,
        language: Option<String>,
        error: String,
    },
}

impl FileOutcome {
    pub fn unit(&self) -> Option<&SourceUnit> {
        match self {
            FileOutcome::Analyzed(unit) => Some(unit),
            FileOutcome::Failed { .. } => None,
        }
    }
}

/// Manager for all language extractors
pub struct ExtractorManager {
    config: AnalyzerConfig,
}

impl Default for ExtractorManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractorManager {
    pub fn new() -> Self {
        Self::with_config(AnalyzerConfig::default())
    }

    pub fn with_config(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Language tags enabled by the current configuration
    pub fn supported_languages(&self) -> Vec<&'static str> {
        SUPPORTED_LANGUAGES
            .iter()
            .copied()
            .filter(|language| self.config.is_enabled(language))
            .collect()
    }

    /// Analyze in-memory content, detecting the language from the path's extension
    pub fn analyze_source(&self, file_path: &str, content: &str) -> Result<SourceUnit> {
        let language = self.get_language_from_extension(file_path)?;
        if !self.config.is_enabled(language) {
            return Err(AnalysisError::UnsupportedLanguage {
                language: language.to_string(),
                file: file_path.to_string(),
            });
        }

        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let lines = content.lines().count();
        if lines > self.config.max_file_lines {
            return Err(AnalysisError::TooLarge {
                file: file_path.to_string(),
                lines,
                limit: self.config.max_file_lines,
            });
        }

        let mut parser = Parser::new();
        let tree_sitter_language = get_tree_sitter_language(language)?;
        parser
            .set_language(&tree_sitter_language)
            .map_err(|e| AnalysisError::Grammar {
                language: language.to_string(),
                reason: e.to_string(),
            })?;

        let tree = parser
            .parse(content, None)
            .ok_or_else(|| AnalysisError::Unparseable {
                file: file_path.to_string(),
            })?;

        analyze_with_config(&tree, file_path, content, language, &self.config)
    }

    /// Read `path` from disk and analyze it
    pub fn analyze_file(&self, path: &Path) -> Result<SourceUnit> {
        let content = std::fs::read_to_string(path).map_err(|source| AnalysisError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.analyze_source(&path.to_string_lossy(), &content)
    }

    /// Analyze many files in parallel; outcomes come back in input order
    pub fn analyze_batch<P: AsRef<Path> + Sync>(&self, files: &[P]) -> Vec<FileOutcome> {
        let outcomes: Vec<FileOutcome> = files
            .par_iter()
            .map(|path| {
                let path = path.as_ref();
                match self.analyze_file(path) {
                    Ok(unit) => FileOutcome::Analyzed(unit),
                    Err(e) => {
                        warn!("Skipping {}: {}", path.display(), e);
                        FileOutcome::Failed {
                            file: path.to_string_lossy().into_owned(),
                            language: language_of(path).map(str::to_string),
                            error: e.to_string(),
                        }
                    }
                }
            })
            .collect();

        let failed = outcomes.iter().filter(|o| o.unit().is_none()).count();
        debug!(
            "Analyzed batch of {} files ({} failed)",
            outcomes.len(),
            failed
        );
        outcomes
    }

    fn get_language_from_extension(&self, file_path: &str) -> Result<&'static str> {
        language_of(Path::new(file_path)).ok_or_else(|| AnalysisError::UnsupportedExtension {
            extension: Path::new(file_path)
                .extension()
                .map(|ext| ext.to_string_lossy().into_owned())
                .unwrap_or_default(),
            file: file_path.to_string(),
        })
    }
}

fn language_of(path: &Path) -> Option<&'static str> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(detect_language_from_extension)
}
