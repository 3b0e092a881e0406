//! Language extractors
//!
//! Tree-sitter based extractors that turn one parsed file into a `SourceUnit`:
//! type declarations, members, and the deduplicated call sites of every body.
//!
//! # Architecture
//!
//! - `base` - shared model types, tree helpers, call-site collection, isolation
//! - `factory` - single dispatch from language tag to extractor
//! - `manager` - ExtractorManager public API (detection, parsing, batches)
//! - Language modules (java, csharp, python, typescript, rust, ruby, php)

pub mod base;
pub mod factory;
pub mod manager;

// Language extractors (TypeScript also covers TSX and JavaScript)
pub mod csharp;
pub mod java;
pub mod php;
pub mod python;
pub mod ruby;
pub mod rust;
pub mod typescript;

// Re-export the public API
pub use base::{
    AccessorDeclaration, AccessorKind, CallSite, Diagnostic, FieldDeclaration, MethodDeclaration,
    ParameterDeclaration, PropertyDeclaration, SourceUnit, TypeDeclaration, TypeKind,
};
pub use factory::{analyze, analyze_with_config};
pub use manager::{ExtractorManager, FileOutcome};
