/// Decorator extraction and the modifiers some decorators imply
/// Supports @staticmethod, @classmethod, @property, @abstractmethod and custom decorators
use crate::extractors::base::BaseExtractor;
use tree_sitter::Node;

/// Normalized decorator text from the enclosing `decorated_definition`, if any
pub(super) fn extract_decorators(base: &BaseExtractor, definition: &Node) -> Vec<String> {
    let Some(decorated) = definition
        .parent()
        .filter(|parent| parent.kind() == "decorated_definition")
    else {
        return Vec::new();
    };
    let mut cursor = decorated.walk();
    let decorators = decorated
        .children(&mut cursor)
        .filter(|child| child.kind() == "decorator")
        .map(|decorator| base.normalize_inline(&decorator))
        .collect();
    decorators
}

/// Modifiers implied by well-known decorators
pub(super) fn decorator_modifiers(decorators: &[String]) -> Vec<String> {
    let mut modifiers = Vec::new();
    for decorator in decorators {
        // `@functools.cache` -> `cache`, `@lru_cache(maxsize=1)` -> `lru_cache`
        let head = decorator.trim_start_matches('@');
        let head = head.split('(').next().unwrap_or(head);
        let name = head.rsplit('.').next().unwrap_or(head);
        let implied = match name {
            "staticmethod" => "static",
            "classmethod" => "classmethod",
            "property" => "property",
            "abstractmethod" => "abstract",
            _ => continue,
        };
        if !modifiers.iter().any(|m| m == implied) {
            modifiers.push(implied.to_string());
        }
    }
    modifiers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decorator_modifiers() {
        let decorators = vec![
            "@staticmethod".to_string(),
            "@abc.abstractmethod".to_string(),
            "@lru_cache(maxsize=1)".to_string(),
        ];
        assert_eq!(decorator_modifiers(&decorators), vec!["static", "abstract"]);
    }
}
