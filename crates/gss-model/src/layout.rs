use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};
use crate::field::FieldDescriptor;

/// Ordered set of fields covering a fixed-width record.
///
/// Built once by the dictionary parser and read-only afterwards. Field names
/// are lower-cased and unique, and every bounded span is non-empty.
/// Deserialization goes through the same validation as [`ColumnLayout::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLayout")]
pub struct ColumnLayout {
    fields: Vec<FieldDescriptor>,
    record_length: Option<usize>,
}

#[derive(Deserialize)]
struct RawLayout {
    fields: Vec<FieldDescriptor>,
    #[serde(default)]
    record_length: Option<usize>,
}

impl TryFrom<RawLayout> for ColumnLayout {
    type Error = LayoutError;

    fn try_from(raw: RawLayout) -> Result<Self> {
        Ok(Self::new(raw.fields)?.with_record_length(raw.record_length))
    }
}

impl ColumnLayout {
    /// Validate `fields` and build a layout.
    ///
    /// Names are lower-cased first, so `AGE` and `age` collide.
    pub fn new(mut fields: Vec<FieldDescriptor>) -> Result<Self> {
        for field in &mut fields {
            field.name = field.name.to_lowercase();
        }
        let mut seen = BTreeSet::new();
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(LayoutError::DuplicateField {
                    name: field.name.clone(),
                });
            }
            if let Some(end) = field.end
                && end <= field.start
            {
                return Err(LayoutError::InvalidSpan {
                    name: field.name.clone(),
                    start: field.start,
                    end,
                });
            }
        }
        Ok(Self {
            fields,
            record_length: None,
        })
    }

    /// Record the declared record length (`_lrecl`).
    #[must_use]
    pub fn with_record_length(mut self, record_length: Option<usize>) -> Self {
        self.record_length = record_length;
        self
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }

    /// Look up a field by name (names are stored lower-cased).
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.position(name).map(|idx| &self.fields[idx])
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        let needle = name.to_lowercase();
        self.fields.iter().position(|field| field.name == needle)
    }

    /// Largest bounded end offset, i.e. the shortest line that holds every
    /// bounded field in full.
    pub fn max_end(&self) -> Option<usize> {
        self.fields.iter().filter_map(|field| field.end).max()
    }

    pub fn record_length(&self) -> Option<usize> {
        self.record_length
    }
}

impl<'a> IntoIterator for &'a ColumnLayout {
    type Item = &'a FieldDescriptor;
    type IntoIter = std::slice::Iter<'a, FieldDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
