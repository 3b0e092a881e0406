// Structural model types for codeframe
//
// One SourceUnit per analyzed file. Every nested collection is owned by value, so the
// whole unit is a self-contained tree that serializes without back-references.
// Optional fields serialize as explicit nulls.

use serde::{Deserialize, Serialize};

/// The structural model of one source file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SourceUnit {
    /// File path as given by the caller
    pub file_path: String,
    /// Language tag (java, csharp, python, typescript, javascript, rust, ruby)
    pub language: String,
    /// Package / namespace / crate-module path, when the language declares one
    pub package_name: Option<String>,
    /// Raw import/use/require statements in source order
    pub imports: Vec<String>,
    /// Top-level type declarations (nested ones live under their parent)
    pub types: Vec<TypeDeclaration>,
    /// Standalone functions declared outside any type
    pub methods: Vec<MethodDeclaration>,
    /// File-level fields (module constants, statics, globals)
    pub fields: Vec<FieldDeclaration>,
    /// Call sites found at file scope, outside any method body
    pub method_calls: Vec<CallSite>,
    /// Failures isolated during extraction; empty for a clean run
    pub diagnostics: Vec<Diagnostic>,
}

impl SourceUnit {
    pub fn new(file_path: &str, language: &str) -> Self {
        Self {
            file_path: file_path.to_string(),
            language: language.to_string(),
            ..Default::default()
        }
    }

    /// Serialize with serde_json (explicit nulls for absent values)
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Kinds of type-like declarations across the supported grammars
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Struct,
    Trait,
    Module,
    Record,
    TypeAlias,
    Impl,
    Union,
}

impl std::fmt::Display for TypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeKind::Class => write!(f, "class"),
            TypeKind::Interface => write!(f, "interface"),
            TypeKind::Enum => write!(f, "enum"),
            TypeKind::Struct => write!(f, "struct"),
            TypeKind::Trait => write!(f, "trait"),
            TypeKind::Module => write!(f, "module"),
            TypeKind::Record => write!(f, "record"),
            TypeKind::TypeAlias => write!(f, "type_alias"),
            TypeKind::Impl => write!(f, "impl"),
            TypeKind::Union => write!(f, "union"),
        }
    }
}

/// A class / interface / enum / struct / trait / module / record / alias / impl block
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TypeDeclaration {
    pub kind: TypeKind,
    /// Name including any raw type-parameter suffix, e.g. `Box<T>`
    pub name: String,
    pub visibility: Option<String>,
    pub modifiers: Vec<String>,
    pub annotations: Vec<String>,
    pub extends_type: Option<String>,
    pub implements_interfaces: Vec<String>,
    pub mixins: Vec<String>,
    pub fields: Vec<FieldDeclaration>,
    pub properties: Vec<PropertyDeclaration>,
    pub methods: Vec<MethodDeclaration>,
    /// Nested declarations, owned here and nowhere else
    pub types: Vec<TypeDeclaration>,
}

impl TypeDeclaration {
    pub fn new(kind: TypeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            visibility: None,
            modifiers: Vec::new(),
            annotations: Vec::new(),
            extends_type: None,
            implements_interfaces: Vec::new(),
            mixins: Vec::new(),
            fields: Vec::new(),
            properties: Vec::new(),
            methods: Vec::new(),
            types: Vec::new(),
        }
    }
}

/// Methods, constructors and standalone functions
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MethodDeclaration {
    pub name: String,
    pub return_type: Option<String>,
    pub visibility: Option<String>,
    pub modifiers: Vec<String>,
    pub annotations: Vec<String>,
    pub parameters: Vec<ParameterDeclaration>,
    pub local_variables: Vec<String>,
    pub method_calls: Vec<CallSite>,
}

impl MethodDeclaration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Accessor-based property (C# `{ get; set; }`, Ruby `attr_accessor`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDeclaration {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    pub visibility: Option<String>,
    pub modifiers: Vec<String>,
    pub annotations: Vec<String>,
    pub accessors: Vec<AccessorDeclaration>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AccessorKind {
    Get,
    Set,
}

impl std::fmt::Display for AccessorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessorKind::Get => write!(f, "get"),
            AccessorKind::Set => write!(f, "set"),
        }
    }
}

/// One get/set accessor with its own body analysis
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccessorDeclaration {
    pub kind: AccessorKind,
    pub visibility: Option<String>,
    pub modifiers: Vec<String>,
    pub annotations: Vec<String>,
    pub local_variables: Vec<String>,
    pub method_calls: Vec<CallSite>,
}

impl AccessorDeclaration {
    pub fn new(kind: AccessorKind) -> Self {
        Self {
            kind,
            visibility: None,
            modifiers: Vec::new(),
            annotations: Vec::new(),
            local_variables: Vec::new(),
            method_calls: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FieldDeclaration {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    pub visibility: Option<String>,
    pub modifiers: Vec<String>,
    pub annotations: Vec<String>,
}

impl FieldDeclaration {
    pub fn new(name: impl Into<String>, type_name: Option<String>) -> Self {
        Self {
            name: name.into(),
            type_name,
            ..Default::default()
        }
    }
}

/// A parameter; the name may carry a variadic marker (`...rest`, `*args`, `&block`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParameterDeclaration {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: Option<String>,
}

impl ParameterDeclaration {
    pub fn new(name: impl Into<String>, type_name: Option<String>) -> Self {
        Self {
            name: name.into(),
            type_name,
        }
    }
}

/// One aggregated call or property-access site
///
/// Identity is (name, receiver type, receiver name, argument count). `count` is the only
/// field mutated after creation; see `CallSiteCollector`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallSite {
    #[serde(rename = "methodName")]
    pub name: String,
    #[serde(rename = "objectType")]
    pub receiver_type: Option<String>,
    #[serde(rename = "objectName")]
    pub receiver_name: Option<String>,
    #[serde(rename = "parameterCount")]
    pub arg_count: Option<usize>,
    #[serde(rename = "callCount")]
    pub count: usize,
}

impl CallSite {
    pub fn new(
        name: impl Into<String>,
        receiver_type: Option<String>,
        receiver_name: Option<String>,
        arg_count: Option<usize>,
    ) -> Self {
        Self {
            name: name.into(),
            receiver_type,
            receiver_name,
            arg_count,
            count: 1,
        }
    }

    /// Same call site for aggregation purposes
    pub fn same_site(
        &self,
        name: &str,
        receiver_type: Option<&str>,
        receiver_name: Option<&str>,
        arg_count: Option<usize>,
    ) -> bool {
        self.name == name
            && self.receiver_type.as_deref() == receiver_type
            && self.receiver_name.as_deref() == receiver_name
            && self.arg_count == arg_count
    }
}

/// A failure isolated to one declaration, member or statement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Diagnostic {
    /// What was being extracted, e.g. `method Foo.bar`
    pub scope: String,
    pub message: String,
}
