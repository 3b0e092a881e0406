/// Item extraction: modules, structs, unions, enums, traits, impl blocks,
/// type aliases, functions and `const`/`static` items
use super::calls::ImplContext;
use super::functions;
use super::helpers;
use crate::extractors::base::{
    BaseExtractor, FieldDeclaration, MethodDeclaration, SymbolTypeMap, TypeDeclaration, TypeKind,
};
use std::collections::HashMap;
use tracing::trace;
use tree_sitter::Node;

/// Items declared directly in a source file, inline module or extern block
#[derive(Default)]
pub(super) struct Items {
    pub types: Vec<TypeDeclaration>,
    pub methods: Vec<MethodDeclaration>,
    pub fields: Vec<FieldDeclaration>,
}

pub(super) struct ItemExtractor<'a> {
    pub base: &'a BaseExtractor,
    /// Named struct fields by bare struct name, for `self.field` receivers in impl blocks
    pub struct_fields: HashMap<String, SymbolTypeMap>,
}

impl<'a> ItemExtractor<'a> {
    /// Index the named fields of every struct in the file
    pub fn new(base: &'a BaseExtractor, root: &Node) -> Self {
        let mut struct_fields = HashMap::new();
        for item in base.find_all_descendants(root, "struct_item") {
            let Some(name) = base.get_field_text(&item, "name") else {
                continue;
            };
            let mut fields = SymbolTypeMap::new();
            for field in named_fields(base, &item) {
                fields.declare(field.name, field.type_name);
            }
            struct_fields.insert(name, fields);
        }
        Self {
            base,
            struct_fields,
        }
    }

    pub fn collect_items(&self, container: Node) -> Items {
        let base = self.base;
        let mut items = Items::default();
        let mut cursor = container.walk();
        for item in container.named_children(&mut cursor) {
            match item.kind() {
                "mod_item" | "struct_item" | "union_item" | "enum_item" | "trait_item"
                | "impl_item" | "type_item" => {
                    let extracted = base
                        .isolate(
                            || format!("{} at byte {}", item.kind(), item.start_byte()),
                            || self.extract_type(&item),
                        )
                        .flatten();
                    if let Some(declaration) = extracted {
                        items.types.push(declaration);
                    }
                }
                "function_item" | "function_signature_item" => {
                    let context = ImplContext::default();
                    let extracted = base
                        .isolate(
                            || format!("function at byte {}", item.start_byte()),
                            || functions::extract_function(base, &item, &context),
                        )
                        .flatten();
                    if let Some(method) = extracted {
                        items.methods.push(method);
                    }
                }
                "const_item" | "static_item" => {
                    if let Some(field) = item_field(base, &item) {
                        items.fields.push(field);
                    }
                }
                "foreign_mod_item" => {
                    if let Some(body) = item.child_by_field_name("body") {
                        let foreign = self.collect_items(body);
                        items.methods.extend(foreign.methods);
                        items.fields.extend(foreign.fields);
                    }
                }
                _ => {}
            }
        }
        items
    }

    fn extract_type(&self, node: &Node) -> Option<TypeDeclaration> {
        match node.kind() {
            "mod_item" => self.extract_module(node),
            "struct_item" => extract_struct(self.base, node, TypeKind::Struct),
            "union_item" => extract_struct(self.base, node, TypeKind::Union),
            "enum_item" => extract_enum(self.base, node),
            "trait_item" => self.extract_trait(node),
            "impl_item" => self.extract_impl(node),
            _ => extract_type_alias(self.base, node),
        }
    }

    /// `mod name { ... }` owns its items; `mod name;` is recorded without members
    fn extract_module(&self, node: &Node) -> Option<TypeDeclaration> {
        let base = self.base;
        let name = base.get_field_text(node, "name")?;
        trace!("Extracting Rust module {}", name);
        let mut declaration = declaration_header(base, node, TypeKind::Module, name);
        if let Some(body) = node.child_by_field_name("body") {
            let items = self.collect_items(body);
            declaration.types = items.types;
            declaration.methods = items.methods;
            declaration.fields = items.fields;
        }
        Some(declaration)
    }

    /// Supertraits go to implemented interfaces; default methods and required
    /// signatures both become methods
    fn extract_trait(&self, node: &Node) -> Option<TypeDeclaration> {
        let base = self.base;
        let name = helpers::name_with_type_parameters(base, node)?;
        let bare_name = base.get_field_text(node, "name")?;
        let mut declaration = declaration_header(base, node, TypeKind::Trait, name);

        if let Some(bounds) = node.child_by_field_name("bounds") {
            let mut cursor = bounds.walk();
            declaration.implements_interfaces = bounds
                .named_children(&mut cursor)
                .filter(|b| b.kind() != "lifetime")
                .map(|b| base.normalize_inline(&b))
                .collect();
        }

        let context = ImplContext {
            self_type: Some(bare_name),
            ..Default::default()
        };
        if let Some(body) = node.child_by_field_name("body") {
            self.collect_members(&body, &context, &mut declaration);
        }
        Some(declaration)
    }

    /// `impl<T> Trait for Type<T>`: named after the implemented-for type, the trait
    /// listed as implemented
    fn extract_impl(&self, node: &Node) -> Option<TypeDeclaration> {
        let base = self.base;
        let type_node = node.child_by_field_name("type")?;
        let name = base.normalize_inline(&type_node);
        let bare_name = helpers::bare_type_name(&name).to_string();
        trace!("Extracting impl block for {}", name);

        let mut declaration = TypeDeclaration::new(TypeKind::Impl, name);
        declaration.annotations = helpers::preceding_attributes(base, node);
        let mut cursor = node.walk();
        let is_unsafe = node.children(&mut cursor).any(|c| c.kind() == "unsafe");
        if is_unsafe {
            declaration.modifiers.push("unsafe".to_string());
        }
        if let Some(trait_name) = node
            .child_by_field_name("trait")
            .and_then(|t| helpers::trait_name(base, &t))
        {
            declaration.implements_interfaces.push(trait_name);
        }

        let context = ImplContext {
            fields: self
                .struct_fields
                .get(&bare_name)
                .cloned()
                .unwrap_or_default(),
            self_type: Some(bare_name),
        };
        if let Some(body) = node.child_by_field_name("body") {
            self.collect_members(&body, &context, &mut declaration);
        }
        Some(declaration)
    }

    /// Methods and associated constants of a trait or impl body
    fn collect_members(
        &self,
        body: &Node,
        context: &ImplContext,
        declaration: &mut TypeDeclaration,
    ) {
        let base = self.base;
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            match member.kind() {
                "function_item" | "function_signature_item" => {
                    let method = base
                        .isolate(
                            || format!("method in {}", declaration.name),
                            || functions::extract_function(base, &member, context),
                        )
                        .flatten();
                    if let Some(method) = method {
                        declaration.methods.push(method);
                    }
                }
                "const_item" => {
                    if let Some(field) = item_field(base, &member) {
                        declaration.fields.push(field);
                    }
                }
                _ => {}
            }
        }
    }
}

/// Visibility (also as the first modifier) and attributes shared by every item
fn declaration_header(
    base: &BaseExtractor,
    node: &Node,
    kind: TypeKind,
    name: String,
) -> TypeDeclaration {
    let mut declaration = TypeDeclaration::new(kind, name);
    declaration.visibility = helpers::extract_visibility(base, node);
    declaration.modifiers.extend(declaration.visibility.clone());
    declaration.annotations = helpers::preceding_attributes(base, node);
    declaration
}

/// Structs and unions: named fields, or positional fields named `0`, `1`, ...
fn extract_struct(base: &BaseExtractor, node: &Node, kind: TypeKind) -> Option<TypeDeclaration> {
    let name = helpers::name_with_type_parameters(base, node)?;
    trace!("Extracting Rust {} {}", kind, name);
    let mut declaration = declaration_header(base, node, kind, name);
    declaration.fields = named_fields(base, node);
    if declaration.fields.is_empty() {
        declaration.fields = positional_fields(base, node);
    }
    Some(declaration)
}

fn named_fields(base: &BaseExtractor, node: &Node) -> Vec<FieldDeclaration> {
    let Some(body) = node
        .child_by_field_name("body")
        .filter(|b| b.kind() == "field_declaration_list")
    else {
        return Vec::new();
    };
    let mut cursor = body.walk();
    let fields = body
        .named_children(&mut cursor)
        .filter(|f| f.kind() == "field_declaration")
        .filter_map(|f| {
            let name = base.get_field_text(&f, "name")?;
            let type_name = f
                .child_by_field_name("type")
                .map(|t| base.normalize_inline(&t));
            let mut field = FieldDeclaration::new(name, type_name);
            field.visibility = helpers::extract_visibility(base, &f);
            field.modifiers.extend(field.visibility.clone());
            field.annotations = helpers::preceding_attributes(base, &f);
            Some(field)
        })
        .collect();
    fields
}

/// `struct Meters(pub f64, u32)`
fn positional_fields(base: &BaseExtractor, node: &Node) -> Vec<FieldDeclaration> {
    let Some(body) = node
        .child_by_field_name("body")
        .filter(|b| b.kind() == "ordered_field_declaration_list")
    else {
        return Vec::new();
    };
    let mut cursor = body.walk();
    let types: Vec<Node> = body.children_by_field_name("type", &mut cursor).collect();
    types
        .iter()
        .enumerate()
        .map(|(index, type_node)| {
            let mut field =
                FieldDeclaration::new(index.to_string(), Some(base.normalize_inline(type_node)));
            field.visibility = type_node
                .prev_named_sibling()
                .filter(|s| s.kind() == "visibility_modifier")
                .map(|s| base.normalize_inline(&s));
            field.modifiers.extend(field.visibility.clone());
            field
        })
        .collect()
}

/// Variants become fields typed with the enum's bare name
fn extract_enum(base: &BaseExtractor, node: &Node) -> Option<TypeDeclaration> {
    let name = helpers::name_with_type_parameters(base, node)?;
    let bare_name = base.get_field_text(node, "name")?;
    let mut declaration = declaration_header(base, node, TypeKind::Enum, name);

    if let Some(body) = node.child_by_field_name("body") {
        let mut cursor = body.walk();
        for variant in body
            .named_children(&mut cursor)
            .filter(|v| v.kind() == "enum_variant")
        {
            let Some(variant_name) = base.get_field_text(&variant, "name") else {
                continue;
            };
            let mut field = FieldDeclaration::new(variant_name, Some(bare_name.clone()));
            field.annotations = helpers::preceding_attributes(base, &variant);
            declaration.fields.push(field);
        }
    }
    Some(declaration)
}

fn extract_type_alias(base: &BaseExtractor, node: &Node) -> Option<TypeDeclaration> {
    let name = helpers::name_with_type_parameters(base, node)?;
    Some(declaration_header(base, node, TypeKind::TypeAlias, name))
}

/// `const` and `static` items; `static mut` adds `mut`
pub(super) fn item_field(base: &BaseExtractor, node: &Node) -> Option<FieldDeclaration> {
    let name = base.get_field_text(node, "name")?;
    let type_name = node
        .child_by_field_name("type")
        .map(|t| base.normalize_inline(&t));
    let mut field = FieldDeclaration::new(name, type_name);
    field.visibility = helpers::extract_visibility(base, node);
    field.modifiers.extend(field.visibility.clone());
    if node.kind() == "static_item" {
        field.modifiers.push("static".to_string());
        if base.find_first_child(node, "mutable_specifier").is_some() {
            field.modifiers.push("mut".to_string());
        }
    } else {
        field.modifiers.push("const".to_string());
    }
    field.annotations = helpers::preceding_attributes(base, node);
    Some(field)
}
