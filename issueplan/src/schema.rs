//! Name-keyed index over a project's field definitions.

use std::collections::HashMap;

use crate::types::FieldDefinition;

/// Read-only lookup of a project's fields by name, built once per project and run.
#[derive(Debug, Clone, Default)]
pub struct SchemaIndex {
    fields: HashMap<String, FieldDefinition>,
}

impl SchemaIndex {
    /// Builds the index in input order.
    ///
    /// Field names are expected to be unique within a project. If they are not,
    /// the definition that appears last in `fields` replaces earlier ones.
    pub fn build<I>(fields: I) -> Self
    where
        I: IntoIterator<Item = FieldDefinition>,
    {
        let mut index = HashMap::new();
        for field in fields {
            index.insert(field.name.clone(), field);
        }
        Self { fields: index }
    }

    pub fn lookup(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.get(name)
    }

    /// All field names, sorted alphabetically.
    pub fn field_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.fields.keys().cloned().collect();
        names.sort();
        names
    }

    /// Definitions sorted by field name.
    pub fn sorted(&self) -> Vec<&FieldDefinition> {
        let mut fields: Vec<&FieldDefinition> = self.fields.values().collect();
        fields.sort_by(|a, b| a.name.cmp(&b.name));
        fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<FieldDefinition> for SchemaIndex {
    fn from_iter<I: IntoIterator<Item = FieldDefinition>>(iter: I) -> Self {
        Self::build(iter)
    }
}
