// Base extractor types and shared machinery
//
// - types.rs: the structural model (SourceUnit, TypeDeclaration, CallSite, ...)
// - extractor.rs: BaseExtractor (text access, isolation guard, diagnostics)
// - tree_methods.rs: named-child and descendant search primitives
// - nesting.rs: nested-declaration resolver
// - calls.rs: call-site aggregation and canonical ordering
// - symbols.rs: per-body symbol type map

pub mod calls;
pub mod extractor;
pub mod nesting;
pub mod symbols;
pub mod tree_methods;
pub mod types;

// Re-export key types for external use
pub use calls::{compare_call_sites, sort_call_sites, CallSiteCollector};
pub use extractor::{normalize_whitespace, BaseExtractor};
pub use symbols::SymbolTypeMap;
pub use tree_methods::{is_comment, span_contains};
pub use types::{
    AccessorDeclaration, AccessorKind, CallSite, Diagnostic, FieldDeclaration,
    MethodDeclaration, ParameterDeclaration, PropertyDeclaration, SourceUnit, TypeDeclaration,
    TypeKind,
};
