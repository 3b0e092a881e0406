//! Shared extractor factory - single dispatch point for every supported language
//!
//! Both the manager and direct callers with their own parsed trees go through
//! [`analyze`], so a language added here is available everywhere.

use crate::config::AnalyzerConfig;
use crate::error::{AnalysisError, Result};
use crate::extractors::base::{BaseExtractor, SourceUnit};
use crate::extractors::typescript::Dialect;
use crate::language::canonical_language;
use tracing::debug;

/// Languages whose call-site identity includes the argument count
const ARITY_LANGUAGES: &[&str] = &["java", "csharp", "rust", "ruby", "php"];

/// Build the structural model of one parsed file with default configuration
///
/// # Parameters
/// - `tree`: tree-sitter tree produced by the grammar for `language`
/// - `file_path`: path recorded on the SourceUnit, not read
/// - `content`: the exact text the tree was parsed from
/// - `language`: language tag (`java`, `csharp`, `python`, `typescript`, `tsx`,
///   `javascript`, `rust`, `ruby`, `php`)
///
/// # Returns
/// The SourceUnit, with diagnostics for any declaration that failed in isolation.
/// An unknown tag or a tree with nothing but parse errors is a per-file failure.
///
/// # Example
/// ```ignore
/// let unit = analyze(&tree, "src/Order.java", &content, "java")?;
/// ```
pub fn analyze(
    tree: &tree_sitter::Tree,
    file_path: &str,
    content: &str,
    language: &str,
) -> Result<SourceUnit> {
    analyze_with_config(tree, file_path, content, language, &AnalyzerConfig::default())
}

/// [`analyze`] honoring `config.track_argument_counts`
pub fn analyze_with_config(
    tree: &tree_sitter::Tree,
    file_path: &str,
    content: &str,
    language: &str,
    config: &AnalyzerConfig,
) -> Result<SourceUnit> {
    if is_unparseable(tree) {
        return Err(AnalysisError::Unparseable {
            file: file_path.to_string(),
        });
    }

    let mut base = BaseExtractor::new(
        canonical_language(language).to_string(),
        file_path.to_string(),
        content.to_string(),
    );
    base.track_arg_counts = config.track_argument_counts && ARITY_LANGUAGES.contains(&language);

    // Single match statement for every language
    let unit = match language {
        "java" => crate::extractors::java::JavaExtractor::new(base).analyze(tree),
        "csharp" => crate::extractors::csharp::CSharpExtractor::new(base).analyze(tree),
        "python" => crate::extractors::python::PythonExtractor::new(base).analyze(tree),
        "typescript" | "tsx" => {
            crate::extractors::typescript::TypeScriptExtractor::new(base, Dialect::TypeScript)
                .analyze(tree)
        }
        "javascript" => {
            crate::extractors::typescript::TypeScriptExtractor::new(base, Dialect::JavaScript)
                .analyze(tree)
        }
        "rust" => crate::extractors::rust::RustExtractor::new(base).analyze(tree),
        "ruby" => crate::extractors::ruby::RubyExtractor::new(base).analyze(tree),
        "php" => crate::extractors::php::PhpExtractor::new(base).analyze(tree),
        _ => {
            return Err(AnalysisError::UnsupportedLanguage {
                language: language.to_string(),
                file: file_path.to_string(),
            })
        }
    };

    debug!(
        "Analyzed {} as {}: {} types, {} diagnostics",
        file_path,
        unit.language,
        unit.types.len(),
        unit.diagnostics.len()
    );
    Ok(unit)
}

/// A root that is itself an error, or whose every top-level node is one
fn is_unparseable(tree: &tree_sitter::Tree) -> bool {
    let root = tree.root_node();
    if root.kind() == "ERROR" {
        return true;
    }
    let mut cursor = root.walk();
    let mut children = root.named_children(&mut cursor).peekable();
    children.peek().is_some() && children.all(|child| child.is_error())
}

#[cfg(test)]
mod factory_consistency_tests {
    use super::*;
    use crate::language::{get_tree_sitter_language, SUPPORTED_LANGUAGES};
    use tree_sitter::Parser;

    fn parse(language: &str, code: &str) -> tree_sitter::Tree {
        let mut parser = Parser::new();
        parser
            .set_language(&get_tree_sitter_language(language).unwrap())
            .unwrap();
        parser.parse(code, None).unwrap()
    }

    /// Every supported tag must reach an extractor
    #[test]
    fn test_all_languages_in_factory() {
        for language in SUPPORTED_LANGUAGES {
            let tree = parse(language, "");
            let unit = analyze(&tree, "empty", "", language)
                .unwrap_or_else(|e| panic!("{} is missing from the factory: {}", language, e));
            assert_eq!(unit.language, canonical_language(language));
            assert!(unit.types.is_empty());
            assert!(unit.method_calls.is_empty());
        }
    }

    #[test]
    fn test_factory_rejects_unknown_language() {
        let tree = parse("rust", "fn main() {}");
        let result = analyze(&tree, "main.cob", "fn main() {}", "cobol");
        assert!(matches!(
            result,
            Err(AnalysisError::UnsupportedLanguage { ref language, .. }) if language == "cobol"
        ));
    }

    #[test]
    fn test_tsx_reports_typescript() {
        let code = "export function App() { return <div />; }";
        let tree = parse("tsx", code);
        let unit = analyze(&tree, "App.tsx", code, "tsx").unwrap();
        assert_eq!(unit.language, "typescript");
        assert_eq!(unit.methods[0].name, "App");
    }

    #[test]
    fn test_arity_follows_language_and_config() {
        let java = "class A { void m() { f(1); f(1, 2); } void f(int... x) {} }";
        let tree = parse("java", java);
        let unit = analyze(&tree, "A.java", java, "java").unwrap();
        let calls = &unit.types[0].methods[0].method_calls;
        assert_eq!(calls.len(), 2, "different arity, different call site");
        assert_eq!(calls[0].arg_count, Some(1));

        let config = AnalyzerConfig {
            track_argument_counts: false,
            ..Default::default()
        };
        let unit = analyze_with_config(&tree, "A.java", java, "java", &config).unwrap();
        let calls = &unit.types[0].methods[0].method_calls;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].arg_count, None);
        assert_eq!(calls[0].count, 2);

        let python = "def m():\n    f(1)\n    f(1, 2)\n";
        let tree = parse("python", python);
        let unit = analyze(&tree, "m.py", python, "python").unwrap();
        let calls = &unit.methods[0].method_calls;
        assert_eq!(calls.len(), 1, "python call sites ignore arity");
        assert_eq!(calls[0].count, 2);
    }

    #[test]
    fn test_tree_of_only_errors_is_unparseable() {
        let code = ")))";
        let tree = parse("python", code);
        let result = analyze(&tree, "broken.py", code, "python");
        assert!(matches!(
            result,
            Err(AnalysisError::Unparseable { ref file }) if file == "broken.py"
        ));
    }

    #[test]
    fn test_partial_parse_still_yields_a_unit() {
        let code = "class A { void ok() {} int x = ; }";
        let tree = parse("java", code);
        let unit = analyze(&tree, "A.java", code, "java");
        assert!(unit.is_ok(), "a parse error inside one member is not fatal");
    }
}
