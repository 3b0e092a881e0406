// Codeframe Core - tree-sitter structural model extraction
//
// One parsed file in, one SourceUnit out: type declarations, members and the
// deduplicated call sites of every body, for Java, C#, Python, TypeScript/JavaScript,
// Rust, Ruby and PHP. The library only emits `tracing` events; the host installs a subscriber.

pub mod config;
pub mod error;
pub mod extractors;
pub mod language;

pub use config::AnalyzerConfig;
pub use error::{AnalysisError, Result};
pub use extractors::{analyze, analyze_with_config, ExtractorManager, FileOutcome, SourceUnit};
pub use language::{detect_language_from_extension, get_tree_sitter_language, SUPPORTED_LANGUAGES};
