/// Class and module extraction
///
/// A body is walked statement by statement so that visibility sections
/// (`private` on its own line) apply to the methods that follow them. Class-body
/// calls are declarations, not call sites: mixins, `attr_*` properties,
/// visibility lists, aliases and Rails-style DSL macros.
use super::calls::TypeContext;
use super::helpers;
use super::methods;
use crate::extractors::base::{
    AccessorDeclaration, AccessorKind, BaseExtractor, FieldDeclaration, PropertyDeclaration,
    SymbolTypeMap, TypeDeclaration, TypeKind,
};
use tracing::trace;
use tree_sitter::Node;

const VISIBILITY_KEYWORDS: &[&str] = &["public", "protected", "private"];
const ASSOCIATIONS: &[&str] = &["has_many", "has_one", "belongs_to", "has_and_belongs_to_many"];
const CALLBACK_PREFIXES: &[&str] = &["before_", "after_", "around_"];

/// A `class` or `module` node, with its nested classes and modules
pub(super) fn extract_type(base: &BaseExtractor, node: &Node) -> Option<TypeDeclaration> {
    let name = base.get_field_text(node, "name")?;
    let kind = if node.kind() == "module" {
        TypeKind::Module
    } else {
        TypeKind::Class
    };
    trace!("Extracting Ruby {} {}", kind, name);

    let mut declaration = TypeDeclaration::new(kind, name.clone());
    declaration.visibility = Some("public".to_string());
    declaration.extends_type = node
        .child_by_field_name("superclass")
        .and_then(|superclass| superclass.named_child(0))
        .filter(|parent| matches!(parent.kind(), "constant" | "scope_resolution"))
        .map(|parent| base.normalize_inline(&parent));

    let Some(body) = node
        .child_by_field_name("body")
        .or_else(|| base.find_first_child(node, "body_statement"))
    else {
        return Some(declaration);
    };

    declaration.fields = variable_fields(base, node, &body);
    let mut instance_variables = SymbolTypeMap::new();
    for field in declaration.fields.iter().filter(|f| !f.name.starts_with("@@")) {
        instance_variables.declare(field.name.clone(), field.type_name.clone());
    }
    declaration.fields.extend(constant_fields(base, &body));

    let context = TypeContext {
        type_name: Some(name),
        instance_variables,
    };
    let mut walker = BodyWalker {
        base,
        context: &context,
        declaration: &mut declaration,
        visibility_lists: Vec::new(),
    };
    walker.walk(&body, false);
    walker.apply_visibility_lists();
    Some(declaration)
}

/// Instance variables first, then class variables, each in order of first appearance
///
/// Types come from the first assignment whose value has a recognizable shape.
/// Nested classes and modules own their variables.
fn variable_fields(base: &BaseExtractor, owner: &Node, body: &Node) -> Vec<FieldDeclaration> {
    let mut instance_fields: Vec<FieldDeclaration> = Vec::new();
    let mut class_fields: Vec<FieldDeclaration> = Vec::new();
    let kinds = ["instance_variable", "class_variable"];
    for variable in base.find_all_descendants_of_types(body, &kinds) {
        if !owned_by(&variable, owner) {
            continue;
        }
        let name = base.get_node_text(&variable);
        let fields = if variable.kind() == "class_variable" {
            &mut class_fields
        } else {
            &mut instance_fields
        };
        let assigned_type = variable
            .parent()
            .filter(|p| matches!(p.kind(), "assignment" | "operator_assignment"))
            .filter(|p| p.child_by_field_name("left") == Some(variable))
            .and_then(|p| p.child_by_field_name("right"))
            .and_then(|value| helpers::infer_expression_type(base, &value));

        match fields.iter_mut().find(|f| f.name == name) {
            Some(existing) => {
                if existing.type_name.is_none() {
                    existing.type_name = assigned_type;
                }
            }
            None => {
                let mut field = FieldDeclaration::new(name, assigned_type);
                field.visibility = Some("private".to_string());
                fields.push(field);
            }
        }
    }
    instance_fields.extend(class_fields);
    instance_fields
}

/// True when the closest enclosing class or module of `node` is `owner`
fn owned_by(node: &Node, owner: &Node) -> bool {
    let mut current = node.parent();
    while let Some(parent) = current {
        if matches!(parent.kind(), "class" | "module") {
            return parent.id() == owner.id();
        }
        current = parent.parent();
    }
    false
}

/// `NAME = value` statements directly in the body
pub(super) fn constant_fields(base: &BaseExtractor, body: &Node) -> Vec<FieldDeclaration> {
    let mut constants: Vec<FieldDeclaration> = Vec::new();
    let mut cursor = body.walk();
    for statement in body
        .named_children(&mut cursor)
        .filter(|s| s.kind() == "assignment")
    {
        let Some(left) = statement
            .child_by_field_name("left")
            .filter(|l| l.kind() == "constant")
        else {
            continue;
        };
        let name = base.get_node_text(&left);
        if constants.iter().any(|c| c.name == name) {
            continue;
        }
        let type_name = statement
            .child_by_field_name("right")
            .and_then(|value| helpers::infer_expression_type(base, &value));
        let mut field = FieldDeclaration::new(name, type_name);
        field.visibility = Some("public".to_string());
        field.modifiers.push("const".to_string());
        constants.push(field);
    }
    constants
}

/// Applies `private :a, :b` style lists once every method is known
struct VisibilityList {
    names: Vec<String>,
    visibility: &'static str,
    class_level: bool,
}

struct BodyWalker<'a, 'b> {
    base: &'a BaseExtractor,
    context: &'a TypeContext,
    declaration: &'b mut TypeDeclaration,
    visibility_lists: Vec<VisibilityList>,
}

impl BodyWalker<'_, '_> {
    /// Members of a class/module body, or of a `class << self` body when `singleton`
    fn walk(&mut self, body: &Node, singleton: bool) {
        let base = self.base;
        let mut section = "public";
        let mut cursor = body.walk();
        for statement in body.named_children(&mut cursor) {
            match statement.kind() {
                "identifier" => {
                    let text = base.get_node_text(&statement);
                    if let Some(keyword) = visibility_keyword(&text) {
                        section = keyword;
                    }
                }
                "method" => self.add_method(&statement, section, singleton),
                // `private` does not reach `def self.x`
                "singleton_method" => self.add_method(&statement, "public", true),
                "singleton_class" => {
                    let on_self = statement
                        .child_by_field_name("value")
                        .is_some_and(|v| v.kind() == "self");
                    let singleton_body = statement
                        .child_by_field_name("body")
                        .or_else(|| base.find_first_child(&statement, "body_statement"));
                    if let (true, Some(singleton_body)) = (on_self, singleton_body) {
                        self.walk(&singleton_body, true);
                    }
                }
                "call" => {
                    if let Some(keyword) = self.handle_call(&statement, section, singleton) {
                        section = keyword;
                    }
                }
                "alias" => {
                    let aliased = statement
                        .named_child(0)
                        .zip(statement.named_child(1))
                        .map(|(new, old)| (alias_name(base, &new), alias_name(base, &old)));
                    if let Some((new, old)) = aliased {
                        self.declaration
                            .annotations
                            .push(format!("@alias({}={})", new, old));
                    }
                }
                "class" | "module" if !singleton => {
                    let nested = base
                        .isolate(
                            || format!("nested type in {}", self.declaration.name),
                            || extract_type(base, &statement),
                        )
                        .flatten();
                    if let Some(nested) = nested {
                        self.declaration.types.push(nested);
                    }
                }
                _ => {}
            }
        }
    }

    fn add_method(&mut self, node: &Node, visibility: &str, is_static: bool) {
        let base = self.base;
        let context = self.context;
        let method = base
            .isolate(
                || format!("method in {}", self.declaration.name),
                || methods::extract_method(base, node, context, visibility, is_static),
            )
            .flatten();
        if let Some(method) = method {
            self.declaration.methods.push(method);
        }
    }

    /// Class-body macros; returns a new section visibility for an argument-less
    /// `private()`
    fn handle_call(
        &mut self,
        call: &Node,
        section: &'static str,
        singleton: bool,
    ) -> Option<&'static str> {
        let base = self.base;
        if helpers::has_receiver(call) {
            return None;
        }
        let name = helpers::call_name(base, call)?;
        let arguments = helpers::call_arguments(call);

        if let Some(keyword) = visibility_keyword(&name) {
            if arguments.is_empty() {
                return Some(keyword);
            }
            for argument in &arguments {
                if argument.kind() == "method" {
                    // `private def helper ... end`
                    self.add_method(argument, keyword, singleton);
                }
            }
            self.visibility_lists.push(VisibilityList {
                names: helpers::symbol_arguments(base, call),
                visibility: keyword,
                class_level: singleton,
            });
            return None;
        }

        match name.as_str() {
            "private_class_method" | "public_class_method" => {
                let visibility = if name.starts_with("private") {
                    "private"
                } else {
                    "public"
                };
                self.visibility_lists.push(VisibilityList {
                    names: helpers::symbol_arguments(base, call),
                    visibility,
                    class_level: true,
                });
            }
            "private_constant" => {
                for constant in helpers::symbol_arguments(base, call) {
                    for field in self
                        .declaration
                        .fields
                        .iter_mut()
                        .filter(|f| f.name == constant)
                    {
                        field.visibility = Some("private".to_string());
                    }
                }
            }
            "attr_reader" | "attr_writer" | "attr_accessor" => {
                self.add_properties(call, &name, section, singleton);
            }
            "include" | "extend" | "prepend" => {
                for module in arguments
                    .iter()
                    .filter(|a| matches!(a.kind(), "constant" | "scope_resolution"))
                {
                    self.declaration.mixins.push(base.normalize_inline(module));
                }
            }
            "alias_method" => {
                if let [new, old, ..] = helpers::symbol_arguments(base, call).as_slice() {
                    self.declaration
                        .annotations
                        .push(format!("@alias_method({}={})", new, old));
                }
            }
            _ => self.add_dsl_annotations(call, &name),
        }
        None
    }

    /// `attr_accessor :a, :b`: one property per symbol with get and/or set accessors
    ///
    /// Properties take the visibility of the section they are declared in.
    fn add_properties(
        &mut self,
        call: &Node,
        macro_name: &str,
        section: &'static str,
        singleton: bool,
    ) {
        let base = self.base;
        for name in helpers::symbol_arguments(base, call) {
            let mut property = PropertyDeclaration {
                name,
                visibility: Some(section.to_string()),
                ..Default::default()
            };
            if singleton {
                property.modifiers.push("static".to_string());
            }
            if macro_name != "attr_writer" {
                property
                    .accessors
                    .push(AccessorDeclaration::new(AccessorKind::Get));
            }
            if macro_name != "attr_reader" {
                property
                    .accessors
                    .push(AccessorDeclaration::new(AccessorKind::Set));
            }
            self.declaration.properties.push(property);
        }
    }

    /// Rails-style macros recorded as annotations: associations, validations,
    /// callbacks and scopes
    fn add_dsl_annotations(&mut self, call: &Node, name: &str) {
        let base = self.base;
        let symbols = helpers::symbol_arguments(base, call);
        let annotations = &mut self.declaration.annotations;
        if ASSOCIATIONS.contains(&name) {
            if let Some(target) = symbols.first() {
                annotations.push(format!("@{}({})", name, target));
            }
        } else if name == "validates"
            || CALLBACK_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
        {
            for symbol in &symbols {
                annotations.push(format!("@{}({})", name, symbol));
            }
        } else if name == "scope" {
            if let Some(scope) = helpers::call_arguments(call)
                .first()
                .and_then(|first| helpers::symbol_name(base, first))
            {
                annotations.push(format!("@scope({})", scope));
            }
        }
    }

    /// `private :a, :b` lists apply to methods declared anywhere in the body
    fn apply_visibility_lists(&mut self) {
        for list in &self.visibility_lists {
            for method in self.declaration.methods.iter_mut().filter(|m| {
                list.names.contains(&m.name)
                    && m.modifiers.iter().any(|modifier| modifier == "static") == list.class_level
            }) {
                method.visibility = Some(list.visibility.to_string());
            }
        }
    }
}

/// `alias new old` operands are bare method names or symbols
fn alias_name(base: &BaseExtractor, node: &Node) -> String {
    helpers::symbol_name(base, node).unwrap_or_else(|| base.get_node_text(node))
}

fn visibility_keyword(text: &str) -> Option<&'static str> {
    VISIBILITY_KEYWORDS
        .iter()
        .find(|keyword| **keyword == text.trim())
        .copied()
}
