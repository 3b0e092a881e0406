// BaseExtractor implementation for codeframe
//
// Holds the source text of one file and the per-file diagnostic channel.
// Language extractors wrap a BaseExtractor and borrow it for text access.

use std::cell::RefCell;
use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::warn;
use tree_sitter::Node;

use super::calls::CallSiteCollector;
use super::types::Diagnostic;

/// Shared state and text utilities for language extractors
///
/// Everything here lives for exactly one `analyze` call.
pub struct BaseExtractor {
    pub language: String,
    pub file_path: String,
    pub content: String,
    /// Whether argument counts take part in call-site identity
    pub track_arg_counts: bool,
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl BaseExtractor {
    pub fn new(language: String, file_path: String, content: String) -> Self {
        Self {
            language,
            file_path,
            content,
            track_arg_counts: true,
            diagnostics: RefCell::new(Vec::new()),
        }
    }

    /// Get text from a tree-sitter node
    ///
    /// Node positions are byte offsets into the UTF-8 source. Offsets are clamped to the
    /// content length, and line endings are normalized to `\n`.
    pub fn get_node_text(&self, node: &Node) -> String {
        let content_bytes = self.content.as_bytes();
        let end_byte = node.end_byte().min(content_bytes.len());
        let start_byte = node.start_byte().min(end_byte);
        if start_byte == end_byte {
            return String::new();
        }

        let text = String::from_utf8_lossy(&content_bytes[start_byte..end_byte]);
        if text.contains('\r') {
            text.replace("\r\n", "\n").replace('\r', "\n")
        } else {
            text.into_owned()
        }
    }

    /// Node text with all whitespace runs collapsed to one space and trimmed
    ///
    /// Used for annotation, attribute and decorator text.
    pub fn normalize_inline(&self, node: &Node) -> String {
        normalize_whitespace(&self.get_node_text(node))
    }

    /// Get field text safely
    pub fn get_field_text(&self, node: &Node, field_name: &str) -> Option<String> {
        node.child_by_field_name(field_name)
            .map(|field_node| self.get_node_text(&field_node))
    }

    /// Type text, extended through an adjacent type-argument clause when the grammar
    /// keeps the arguments as a sibling of the base type node
    pub fn get_type_text(&self, type_node: &Node) -> String {
        let mut end = *type_node;
        if let Some(next) = type_node.next_named_sibling() {
            if matches!(next.kind(), "type_arguments" | "type_argument_list") {
                end = next;
            }
        }
        if end == *type_node {
            return normalize_whitespace(&self.get_node_text(type_node));
        }

        let content_bytes = self.content.as_bytes();
        let end_byte = end.end_byte().min(content_bytes.len());
        let start_byte = type_node.start_byte().min(end_byte);
        normalize_whitespace(&String::from_utf8_lossy(&content_bytes[start_byte..end_byte]))
    }

    /// A fresh call-site collector honoring this file's identity settings
    pub fn call_collector(&self) -> CallSiteCollector {
        CallSiteCollector::new(self.track_arg_counts)
    }

    /// Run one extraction step, isolating any panic to this step
    ///
    /// A failure is recorded as a diagnostic for `scope` and `None` is returned, so the
    /// caller can carry on with sibling declarations.
    pub fn isolate<T>(&self, scope: impl FnOnce() -> String, step: impl FnOnce() -> T) -> Option<T> {
        match catch_unwind(AssertUnwindSafe(step)) {
            Ok(value) => Some(value),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                let scope = scope();
                warn!(
                    "Extraction of {} in {} failed: {}",
                    scope, self.file_path, message
                );
                self.report(scope, message);
                None
            }
        }
    }

    /// Record a non-fatal problem for this file
    pub fn report(&self, scope: impl Into<String>, message: impl Into<String>) {
        self.diagnostics.borrow_mut().push(Diagnostic {
            scope: scope.into(),
            message: message.into(),
        });
    }

    /// Drain the diagnostics collected so far
    pub fn take_diagnostics(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.diagnostics.borrow_mut())
    }
}

pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Parser;

    fn parse_java(code: &str) -> tree_sitter::Tree {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_java::LANGUAGE.into())
            .unwrap();
        parser.parse(code, None).unwrap()
    }

    #[test]
    fn test_node_text_uses_byte_offsets_for_multibyte_source() {
        let code = "class Ünïcødé { String s = \"日本\"; }";
        let tree = parse_java(code);
        let base = BaseExtractor::new("java".into(), "A.java".into(), code.into());

        let class_node = tree.root_node().named_child(0).unwrap();
        let name = class_node.child_by_field_name("name").unwrap();
        assert_eq!(base.get_node_text(&name), "Ünïcødé");
    }

    #[test]
    fn test_node_text_clamps_out_of_range_offsets() {
        let code = "class A { int x; }";
        let tree = parse_java(code);
        // Content shorter than what the tree was built from
        let base = BaseExtractor::new("java".into(), "A.java".into(), "class A".into());

        let class_node = tree.root_node().named_child(0).unwrap();
        assert_eq!(base.get_node_text(&class_node), "class A");
        let body = class_node.child_by_field_name("body").unwrap();
        assert_eq!(base.get_node_text(&body), "");
    }

    #[test]
    fn test_normalize_inline_collapses_whitespace() {
        assert_eq!(
            normalize_whitespace("  @Retry(\n    times = 3,\n\tdelay = 10)  "),
            "@Retry( times = 3, delay = 10)"
        );
    }

    #[test]
    fn test_isolate_records_diagnostic_and_continues() {
        let base = BaseExtractor::new("java".into(), "A.java".into(), String::new());
        let ok = base.isolate(|| "method ok".to_string(), || 42);
        let failed: Option<i32> =
            base.isolate(|| "method broken".to_string(), || panic!("bad node shape"));

        assert_eq!(ok, Some(42));
        assert_eq!(failed, None);
        let diagnostics = base.take_diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].scope, "method broken");
        assert_eq!(diagnostics[0].message, "bad node shape");
        assert!(base.take_diagnostics().is_empty(), "diagnostics should be drained");
    }
}
