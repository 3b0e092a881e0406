/// Class extraction: bases, decorators, class and instance attributes, methods and
/// nested classes
use super::calls::ClassContext;
use super::decorators;
use super::functions;
use super::helpers;
use crate::extractors::base::{BaseExtractor, FieldDeclaration, TypeDeclaration, TypeKind};
use tracing::trace;
use tree_sitter::Node;

/// Extract one `class_definition` and, recursively, the classes declared directly in its body
pub(super) fn extract_class(base: &BaseExtractor, node: &Node) -> Option<TypeDeclaration> {
    let bare_name = base.get_field_text(node, "name")?;
    let type_parameters = node
        .child_by_field_name("type_parameters")
        .map(|tp| base.normalize_inline(&tp))
        .unwrap_or_default();
    trace!("Extracting Python class {}", bare_name);

    let name = format!("{}{}", bare_name, type_parameters);
    let mut declaration = TypeDeclaration::new(TypeKind::Class, name);
    declaration.visibility = Some(helpers::convention_visibility(&bare_name).to_string());
    declaration.annotations = decorators::extract_decorators(base, node);

    let mut bases = helpers::extract_superclasses(base, node).into_iter();
    declaration.extends_type = bases.next();
    declaration.implements_interfaces = bases.collect();

    let Some(body) = node.child_by_field_name("body") else {
        return Some(declaration);
    };
    let members: Vec<Node> = body
        .named_children(&mut body.walk())
        .filter_map(helpers::unwrap_decorated)
        .collect();

    for statement in members.iter().filter(|m| m.kind() == "expression_statement") {
        if let Some(field) = class_attribute(base, statement) {
            declaration.fields.push(field);
        }
    }
    for function in members.iter().filter(|m| m.kind() == "function_definition") {
        let is_init = base.get_field_text(function, "name").as_deref() == Some("__init__");
        if !is_init {
            continue;
        }
        for field in instance_attributes(base, function) {
            if !declaration.fields.iter().any(|f| f.name == field.name) {
                declaration.fields.push(field);
            }
        }
    }

    let mut context = ClassContext {
        class_name: Some(bare_name.clone()),
        ..Default::default()
    };
    for field in &declaration.fields {
        context
            .attributes
            .declare(field.name.clone(), field.type_name.clone());
    }

    for member in &members {
        match member.kind() {
            "function_definition" => {
                let method = base
                    .isolate(
                        || format!("method in {}", bare_name),
                        || functions::extract_function(base, member, &context),
                    )
                    .flatten();
                if let Some(method) = method {
                    declaration.methods.push(method);
                }
            }
            "class_definition" => {
                let nested = base
                    .isolate(
                        || format!("class nested in {}", bare_name),
                        || extract_class(base, member),
                    )
                    .flatten();
                if let Some(nested) = nested {
                    declaration.types.push(nested);
                }
            }
            _ => {}
        }
    }

    Some(declaration)
}

/// `name = value` or `name: Type = value` directly in a class or module body
pub(super) fn class_attribute(base: &BaseExtractor, statement: &Node) -> Option<FieldDeclaration> {
    let assignment = statement
        .named_child(0)
        .filter(|child| child.kind() == "assignment")?;
    let left = assignment
        .child_by_field_name("left")
        .filter(|left| left.kind() == "identifier")?;
    let name = base.get_node_text(&left);
    Some(attribute_field(base, name, &assignment))
}

/// `self.x = ...` assignments anywhere in `__init__`
fn instance_attributes(base: &BaseExtractor, init: &Node) -> Vec<FieldDeclaration> {
    let Some(body) = init.child_by_field_name("body") else {
        return Vec::new();
    };
    let parameter_types: Vec<(String, Option<String>)> = init
        .child_by_field_name("parameters")
        .map(|params| functions::extract_parameters(base, &params, true))
        .unwrap_or_default()
        .into_iter()
        .map(|p| (p.name, p.type_name))
        .collect();

    let mut fields: Vec<FieldDeclaration> = Vec::new();
    for assignment in base.find_all_descendants(&body, "assignment") {
        let Some(left) = assignment
            .child_by_field_name("left")
            .filter(|left| left.kind() == "attribute")
        else {
            continue;
        };
        let on_self = left
            .child_by_field_name("object")
            .is_some_and(|o| o.kind() == "identifier" && base.get_node_text(&o) == "self");
        let Some(name) = base.get_field_text(&left, "attribute").filter(|_| on_self) else {
            continue;
        };
        if fields.iter().any(|f| f.name == name) {
            continue;
        }
        let mut field = attribute_field(base, name, &assignment);
        // `self.repo = repo` takes the annotated parameter type
        if field.type_name.is_none() {
            field.type_name = assignment
                .child_by_field_name("right")
                .filter(|right| right.kind() == "identifier")
                .and_then(|right| {
                    let source = base.get_node_text(&right);
                    parameter_types
                        .iter()
                        .find(|(param, _)| *param == source)
                        .and_then(|(_, type_name)| type_name.clone())
                });
        }
        fields.push(field);
    }
    fields
}

fn attribute_field(base: &BaseExtractor, name: String, assignment: &Node) -> FieldDeclaration {
    let type_name = assignment
        .child_by_field_name("type")
        .map(|t| base.normalize_inline(&t))
        .or_else(|| {
            assignment
                .child_by_field_name("right")
                .and_then(|right| helpers::infer_expression_type(base, &right))
        });
    let mut field = FieldDeclaration::new(name, type_name);
    field.visibility = Some(helpers::convention_visibility(&field.name).to_string());
    field
}
