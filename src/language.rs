//! Language Support - Shared tree-sitter language configuration
//!
//! All grammar lookup and extension mapping lives here so the manager and the
//! factory agree on which tags exist.

use crate::error::{AnalysisError, Result};

/// Every tag `get_tree_sitter_language` accepts
pub const SUPPORTED_LANGUAGES: &[&str] = &[
    "java",
    "csharp",
    "python",
    "typescript",
    "tsx",
    "javascript",
    "rust",
    "ruby",
    "php",
];

/// Get tree-sitter language parser for a given language name
///
/// # Supported Languages
///
/// **Backend**: Java, C#, Python, Ruby, PHP
/// **Web**: TypeScript (plus TSX), JavaScript
/// **Systems**: Rust
pub fn get_tree_sitter_language(language: &str) -> Result<tree_sitter::Language> {
    match language {
        "java" => Ok(tree_sitter_java::LANGUAGE.into()),
        "csharp" => Ok(tree_sitter_c_sharp::LANGUAGE.into()),
        "python" => Ok(tree_sitter_python::LANGUAGE.into()),
        "typescript" => Ok(tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()),
        "tsx" => Ok(tree_sitter_typescript::LANGUAGE_TSX.into()),
        "javascript" => Ok(tree_sitter_javascript::LANGUAGE.into()),
        "rust" => Ok(tree_sitter_rust::LANGUAGE.into()),
        "ruby" => Ok(tree_sitter_ruby::LANGUAGE.into()),
        "php" => Ok(tree_sitter_php::LANGUAGE_PHP.into()),
        _ => Err(AnalysisError::UnsupportedLanguage {
            language: language.to_string(),
            file: String::new(),
        }),
    }
}

/// Detect language from file extension
///
/// Returns the language name that can be passed to `get_tree_sitter_language()`.
/// Matching is case-insensitive.
pub fn detect_language_from_extension(extension: &str) -> Option<&'static str> {
    match extension.to_ascii_lowercase().as_str() {
        "java" => Some("java"),
        "cs" => Some("csharp"),
        "py" | "pyi" => Some("python"),
        "ts" | "mts" | "cts" => Some("typescript"),
        "tsx" => Some("tsx"),
        "js" | "jsx" | "mjs" | "cjs" => Some("javascript"),
        "rs" => Some("rust"),
        "rb" | "rake" => Some("ruby"),
        "php" => Some("php"),
        _ => None,
    }
}

/// The tag reported in `SourceUnit::language` for a grammar tag
pub fn canonical_language(language: &str) -> &str {
    match language {
        "tsx" => "typescript",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_supported_language_has_a_grammar() {
        for language in SUPPORTED_LANGUAGES {
            assert!(
                get_tree_sitter_language(language).is_ok(),
                "missing grammar for {}",
                language
            );
        }
        assert!(get_tree_sitter_language("cobol").is_err());
    }

    #[test]
    fn test_extension_detection() {
        assert_eq!(detect_language_from_extension("java"), Some("java"));
        assert_eq!(detect_language_from_extension("CS"), Some("csharp"));
        assert_eq!(detect_language_from_extension("tsx"), Some("tsx"));
        assert_eq!(detect_language_from_extension("jsx"), Some("javascript"));
        assert_eq!(detect_language_from_extension("rb"), Some("ruby"));
        assert_eq!(detect_language_from_extension("php"), Some("php"));
        assert_eq!(detect_language_from_extension("phtml"), None);
        assert_eq!(canonical_language("tsx"), "typescript");
    }
}
