// Canonical tag set and the first-non-empty-wins assembler

use std::collections::BTreeMap;

use serde::Serialize;

use crate::field_mapping::StandardField;
use crate::utils::encoding::trim_text;

/// Title/artist/album values recovered from a file.
///
/// An absent key means "not found"; empty values are never stored. Once a
/// key holds a value, later inserts and merges leave it alone, so the order
/// in which sources are merged is the precedence order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TagSet {
    fields: BTreeMap<StandardField, String>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: StandardField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.get(StandardField::Title)
    }

    pub fn artist(&self) -> Option<&str> {
        self.get(StandardField::Artist)
    }

    pub fn album(&self) -> Option<&str> {
        self.get(StandardField::Album)
    }

    pub fn contains(&self, field: StandardField) -> bool {
        self.fields.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Store `value` unless the field is already set or the value is blank.
    /// Returns whether the value was stored.
    pub fn insert_if_absent(&mut self, field: StandardField, value: impl Into<String>) -> bool {
        if self.fields.contains_key(&field) {
            return false;
        }
        let value = value.into();
        if trim_text(&value).is_empty() {
            return false;
        }
        self.fields.insert(field, value);
        true
    }

    /// Fill absent fields from `other`.
    pub fn merge(&mut self, other: TagSet) {
        for (field, value) in other.fields {
            self.fields.entry(field).or_insert(value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (StandardField, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }
}
