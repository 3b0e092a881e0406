/// Python extractor: classes, module-level functions, attributes and call sites
///
/// This module is organized into focused sub-modules:
/// - helpers: naming-convention visibility, base classes, initializer inference
/// - decorators: decorator text and the modifiers it implies
/// - types: class extraction with class and instance attributes
/// - functions: functions, methods and parameters
/// - calls: body analysis (assigned locals, call sites)
mod calls;
mod decorators;
mod functions;
mod helpers;
mod types;

use crate::extractors::base::{BaseExtractor, SourceUnit};
use tracing::debug;
use tree_sitter::{Node, Tree};

const IMPORT_KINDS: &[&str] = &[
    "import_statement",
    "import_from_statement",
    "future_import_statement",
];

pub struct PythonExtractor {
    base: BaseExtractor,
}

impl PythonExtractor {
    pub fn new(base: BaseExtractor) -> Self {
        Self { base }
    }

    /// Analyze the whole file
    pub fn analyze(&self, tree: &Tree) -> SourceUnit {
        let base = &self.base;
        let root = tree.root_node();
        let mut unit = SourceUnit::new(&base.file_path, "python");

        unit.imports = base
            .find_all_descendants_of_types(&root, IMPORT_KINDS)
            .iter()
            .map(|import| base.normalize_inline(import))
            .collect();

        for class in base.top_level_declarations(&root, &["class_definition"], &["block"]) {
            let extracted = base
                .isolate(
                    || format!("class at byte {}", class.start_byte()),
                    || types::extract_class(base, &class),
                )
                .flatten();
            if let Some(type_declaration) = extracted {
                unit.types.push(type_declaration);
            }
        }

        let module_context = calls::ClassContext::default();
        for function in base.find_all_descendants(&root, "function_definition") {
            if !is_standalone(&function) {
                continue;
            }
            let extracted = base
                .isolate(
                    || format!("function at byte {}", function.start_byte()),
                    || functions::extract_function(base, &function, &module_context),
                )
                .flatten();
            if let Some(method) = extracted {
                unit.methods.push(method);
            }
        }

        let mut cursor = root.walk();
        for statement in root
            .named_children(&mut cursor)
            .filter(|s| s.kind() == "expression_statement")
        {
            if let Some(field) = types::class_attribute(base, &statement) {
                unit.fields.push(field);
            }
        }

        unit.method_calls = base
            .isolate(|| "module-level calls".to_string(), || calls::module_calls(base, root))
            .unwrap_or_default();

        unit.diagnostics = base.take_diagnostics();
        debug!(
            "Extracted {} classes and {} functions from {}",
            unit.types.len(),
            unit.methods.len(),
            base.file_path
        );
        unit
    }
}

/// A function not nested in any class or other function
fn is_standalone(function: &Node) -> bool {
    let mut current = function.parent();
    while let Some(parent) = current {
        if matches!(parent.kind(), "class_definition" | "function_definition") {
            return false;
        }
        current = parent.parent();
    }
    true
}
