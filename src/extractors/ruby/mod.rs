/// Ruby extractor: classes, modules, file-level methods and call sites
///
/// This module is organized into focused sub-modules:
/// - helpers: call names, symbol arguments, argument counting, parameters, inference
/// - types: classes and modules with visibility sections, mixins, properties and DSL macros
/// - methods: instance, singleton and endless methods
/// - calls: body analysis (assigned locals, call sites)
///
/// Ruby has no visibility keywords on declarations; methods are public until a
/// `private`/`protected` section or list says otherwise.
mod calls;
mod helpers;
mod methods;
mod types;

use crate::extractors::base::{BaseExtractor, SourceUnit};
use calls::TypeContext;
use tracing::debug;
use tree_sitter::Tree;

pub struct RubyExtractor {
    base: BaseExtractor,
}

impl RubyExtractor {
    pub fn new(base: BaseExtractor) -> Self {
        Self { base }
    }

    /// Analyze the whole file
    pub fn analyze(&self, tree: &Tree) -> SourceUnit {
        let base = &self.base;
        let root = tree.root_node();
        let mut unit = SourceUnit::new(&base.file_path, "ruby");

        unit.imports = base
            .find_all_descendants(&root, "call")
            .iter()
            .filter(|call| calls::is_require(base, call))
            .map(|call| base.normalize_inline(call))
            .collect();

        for declaration in
            base.top_level_declarations(&root, &["class", "module"], &["body_statement"])
        {
            let extracted = base
                .isolate(
                    || format!("{} at byte {}", declaration.kind(), declaration.start_byte()),
                    || types::extract_type(base, &declaration),
                )
                .flatten();
            if let Some(type_declaration) = extracted {
                unit.types.push(type_declaration);
            }
        }

        let file_context = TypeContext::default();
        for method in base.find_all_descendants(&root, "method") {
            if !calls::is_file_level(&method) {
                continue;
            }
            let extracted = base
                .isolate(
                    || format!("method at byte {}", method.start_byte()),
                    || methods::extract_method(base, &method, &file_context, "public", false),
                )
                .flatten();
            if let Some(method) = extracted {
                unit.methods.push(method);
            }
        }

        unit.fields = types::constant_fields(base, &root);
        unit.method_calls = base
            .isolate(|| "file-level calls".to_string(), || calls::file_calls(base, root))
            .unwrap_or_default();

        unit.diagnostics = base.take_diagnostics();
        debug!(
            "Extracted {} types and {} methods from {}",
            unit.types.len(),
            unit.methods.len(),
            base.file_path
        );
        unit
    }
}
