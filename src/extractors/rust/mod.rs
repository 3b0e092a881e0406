/// Rust extractor: builds the structural model of one Rust source file
///
/// - helpers: visibility, attributes, pattern bindings, initializer inference, macro arity
/// - types: modules, structs, unions, enums, traits, impl blocks, aliases, const/static items
/// - functions: free functions, methods, trait signatures and parameters
/// - calls: body analysis (let bindings, calls, path calls, macro invocations)
///
/// Items are owned by the item that declares them: an inline `mod` holds its items,
/// an `impl` block holds its methods. Rust has no statements outside functions, so the
/// file itself never carries call sites.
mod calls;
mod functions;
mod helpers;
mod types;

use crate::extractors::base::{BaseExtractor, SourceUnit};
use tracing::debug;
use tree_sitter::Tree;
use types::ItemExtractor;

pub struct RustExtractor {
    base: BaseExtractor,
}

impl RustExtractor {
    pub fn new(base: BaseExtractor) -> Self {
        Self { base }
    }

    /// Analyze the whole file
    pub fn analyze(&self, tree: &Tree) -> SourceUnit {
        let base = &self.base;
        let root = tree.root_node();
        let mut unit = SourceUnit::new(&base.file_path, "rust");

        unit.imports = base
            .find_all_descendants_of_types(&root, &["use_declaration", "extern_crate_declaration"])
            .iter()
            .map(|import| base.normalize_inline(import))
            .collect();

        let items = ItemExtractor::new(base, &root).collect_items(root);
        unit.types = items.types;
        unit.methods = items.methods;
        unit.fields = items.fields;

        unit.diagnostics = base.take_diagnostics();
        debug!(
            "Extracted {} items and {} functions from {}",
            unit.types.len(),
            unit.methods.len(),
            base.file_path
        );
        unit
    }
}
