// In-scope name -> type lookup for one body analysis
//
// Seeded with known fields, overlaid with parameters, then with locals. A later
// declaration shadows an earlier one, even when its type is unknown.

use std::collections::HashMap;

#[derive(Debug, Default, Clone)]
pub struct SymbolTypeMap {
    entries: HashMap<String, Option<String>>,
}

impl SymbolTypeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare (or shadow) a name
    pub fn declare(&mut self, name: impl Into<String>, type_name: Option<String>) {
        self.entries.insert(name.into(), type_name);
    }

    /// Declare a name only when it is not in scope yet
    pub fn declare_weak(&mut self, name: impl Into<String>, type_name: Option<String>) {
        self.entries.entry(name.into()).or_insert(type_name);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// The known type of an in-scope name
    pub fn type_of(&self, name: &str) -> Option<&str> {
        self.entries.get(name).and_then(|t| t.as_deref())
    }
}
