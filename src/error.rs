//! Error types for per-file analysis failures
//!
//! Problems inside a parseable file never surface here; they become diagnostics on
//! the returned SourceUnit. These errors are for files that cannot be analyzed at all.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("No extractor available for language '{language}' (file: {file})")]
    UnsupportedLanguage { language: String, file: String },

    #[error("Unsupported file extension: '{extension}' (file: {file})")]
    UnsupportedExtension { extension: String, file: String },

    #[error("Failed to parse file: {file}")]
    Unparseable { file: String },

    #[error("File {file} has {lines} lines, above the configured limit of {limit}")]
    TooLarge {
        file: String,
        lines: usize,
        limit: usize,
    },

    #[error("Failed to set parser language for {language}: {reason}")]
    Grammar { language: String, reason: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
