//! Class extraction: heritage, decorators, fields, constructor parameter
//! properties and methods

use super::calls::ClassContext;
use super::functions;
use super::helpers;
use super::inference;
use super::Dialect;
use crate::extractors::base::{
    BaseExtractor, FieldDeclaration, MethodDeclaration, TypeDeclaration, TypeKind,
};
use tracing::trace;
use tree_sitter::Node;

/// Class body members that declare fields
const FIELD_KINDS: &[&str] = &["public_field_definition", "field_definition"];

/// Class body members that declare methods
const METHOD_KINDS: &[&str] = &[
    "method_definition",
    "method_signature",
    "abstract_method_signature",
];

/// `class` and `abstract class` declarations
pub(super) fn extract_class(
    base: &BaseExtractor,
    dialect: Dialect,
    node: &Node,
) -> Option<TypeDeclaration> {
    let name = helpers::name_with_type_parameters(base, node)?;
    let class_name = base.get_field_text(node, "name")?;
    trace!("Extracting class {}", name);

    let mut declaration = TypeDeclaration::new(TypeKind::Class, name);
    let mut modifiers = helpers::extract_modifiers(base, node);
    if node.kind() == "abstract_class_declaration" {
        modifiers.imply("abstract");
    }
    declaration.visibility = modifiers.visibility;
    declaration.modifiers = modifiers.keywords;
    declaration.annotations = helpers::extract_decorators(base, node);

    let (extends_type, implements) = heritage(base, node);
    declaration.extends_type = extends_type;
    declaration.implements_interfaces = implements;

    let Some(body) = node.child_by_field_name("body") else {
        return Some(declaration);
    };
    let members: Vec<Node> = {
        let mut cursor = body.walk();
        body.named_children(&mut cursor).collect()
    };

    for member in members.iter().filter(|m| FIELD_KINDS.contains(&m.kind())) {
        if let Some(field) = extract_field(base, dialect, member) {
            declaration.fields.push(field);
        }
    }
    let constructor = members.iter().find(|m| {
        m.kind() == "method_definition"
            && base.get_field_text(m, "name").as_deref() == Some("constructor")
    });
    if let Some(params) = constructor.and_then(|c| c.child_by_field_name("parameters")) {
        for field in constructor_fields(base, &params) {
            if !declaration.fields.iter().any(|f| f.name == field.name) {
                declaration.fields.push(field);
            }
        }
    }

    let mut context = ClassContext {
        class_name: Some(class_name.clone()),
        superclass: declaration.extends_type.clone(),
        ..Default::default()
    };
    for field in &declaration.fields {
        context
            .fields
            .declare(field.name.clone(), field.type_name.clone());
    }

    for member in members.iter().filter(|m| METHOD_KINDS.contains(&m.kind())) {
        let method = base
            .isolate(
                || format!("method in {}", class_name),
                || extract_method(base, dialect, &context, member, &class_name),
            )
            .flatten();
        if let Some(method) = method {
            declaration.methods.push(method);
        }
    }
    Some(declaration)
}

/// Superclass and implemented interfaces from `class_heritage`
///
/// TypeScript wraps them in `extends_clause` and `implements_clause`; JavaScript
/// puts the superclass expression directly under the heritage node.
fn heritage(base: &BaseExtractor, node: &Node) -> (Option<String>, Vec<String>) {
    let mut extends_type = None;
    let mut implements = Vec::new();
    let Some(heritage) = base.find_first_child(node, "class_heritage") else {
        return (extends_type, implements);
    };

    let mut cursor = heritage.walk();
    for clause in heritage.named_children(&mut cursor) {
        match clause.kind() {
            "extends_clause" => {
                extends_type = clause.child_by_field_name("value").map(|value| {
                    let mut text = base.normalize_inline(&value);
                    if let Some(arguments) = value
                        .next_named_sibling()
                        .filter(|s| s.kind() == "type_arguments")
                    {
                        text.push_str(&base.normalize_inline(&arguments));
                    }
                    text
                });
            }
            "implements_clause" => {
                let mut inner = clause.walk();
                implements = clause
                    .named_children(&mut inner)
                    .map(|t| base.normalize_inline(&t))
                    .collect();
            }
            _ if extends_type.is_none() => extends_type = Some(base.normalize_inline(&clause)),
            _ => {}
        }
    }
    (extends_type, implements)
}

fn extract_field(
    base: &BaseExtractor,
    dialect: Dialect,
    member: &Node,
) -> Option<FieldDeclaration> {
    let name = base
        .get_field_text(member, "name")
        .or_else(|| base.get_field_text(member, "property"))?;
    let type_name = helpers::annotated_type(base, member, "type").or_else(|| {
        member
            .child_by_field_name("value")
            .and_then(|value| inference::infer_expression_type(base, dialect, &value))
    });

    let modifiers = helpers::extract_modifiers(base, member);
    let mut field = FieldDeclaration::new(name, type_name);
    field.visibility = modifiers.visibility;
    field.modifiers = modifiers.keywords;
    field.annotations = helpers::extract_decorators(base, member);
    Some(field)
}

/// `constructor(private readonly repo: Repo)` declares the field `repo`
fn constructor_fields(base: &BaseExtractor, params: &Node) -> Vec<FieldDeclaration> {
    functions::parameter_properties(params)
        .iter()
        .filter_map(|param| {
            let name = param
                .child_by_field_name("pattern")
                .filter(|p| p.kind() == "identifier")
                .map(|p| base.get_node_text(&p))?;
            let modifiers = helpers::extract_modifiers(base, param);
            let mut field =
                FieldDeclaration::new(name, helpers::annotated_type(base, param, "type"));
            field.visibility = modifiers.visibility;
            field.modifiers = modifiers.keywords;
            field.annotations = helpers::extract_decorators(base, param);
            Some(field)
        })
        .collect()
}

/// Methods, accessors, overload signatures and abstract signatures
///
/// The constructor is named after its class and has no return type.
fn extract_method(
    base: &BaseExtractor,
    dialect: Dialect,
    context: &ClassContext,
    member: &Node,
    class_name: &str,
) -> Option<MethodDeclaration> {
    let mut name = base.get_field_text(member, "name")?;
    let mut modifiers = helpers::extract_modifiers(base, member);
    if member.kind() == "abstract_method_signature" {
        modifiers.imply("abstract");
    }
    let is_constructor = member.kind() == "method_definition" && name == "constructor";
    if is_constructor {
        name = class_name.to_string();
    }

    let mut method = functions::build_method(base, dialect, context, member, name, modifiers);
    method.annotations = helpers::extract_decorators(base, member);
    if is_constructor {
        method.return_type = None;
    }
    Some(method)
}
