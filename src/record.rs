use indexmap::{IndexMap, IndexSet};

use crate::history::SelectionProfile;

/// One parsed source line: free-text prefix plus the ordered key=value fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub prefix: String,
    pub fields: IndexMap<String, String>,
    /// 0-based line position in the source file
    pub sequence_index: usize,
}

impl Record {
    pub fn new(prefix: String, fields: IndexMap<String, String>, sequence_index: usize) -> Self {
        Record {
            prefix,
            fields,
            sequence_index,
        }
    }

    /// Case-insensitive substring search over the prefix and every field value.
    /// `needle` must already be lowercased.
    pub fn contains_lowercase(&self, needle: &str) -> bool {
        self.prefix.to_lowercase().contains(needle)
            || self
                .fields
                .values()
                .any(|value| value.to_lowercase().contains(needle))
    }
}

/// Distinct field names in first-seen order across a whole file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldCatalog {
    names: IndexSet<String>,
}

impl FieldCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the name had not been seen before
    pub fn insert(&mut self, name: &str) -> bool {
        if self.names.contains(name) {
            return false;
        }
        self.names.insert(name.to_string())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Default selection for a freshly loaded file: every catalog field,
    /// checked only where the given profile marks it selected.
    pub fn suggest_profile(&self, latest: Option<&SelectionProfile>) -> SelectionProfile {
        self.iter()
            .map(|name| {
                let selected = latest.map(|p| p.is_selected(name)).unwrap_or(false);
                (name.to_string(), selected)
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a FieldCatalog {
    type Item = &'a String;
    type IntoIter = indexmap::set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}
