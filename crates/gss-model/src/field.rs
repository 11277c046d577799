use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage type declared for a dictionary field.
///
/// Stata dictionaries name a storage type per variable; the decoder carries
/// it forward so callers know how a text token should be coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// `byte`, `int`, `long`
    Integer,
    /// `float`, `double`, `numeric`
    Real,
    /// `str`, `strN`, `strL`
    Text,
}

impl FieldType {
    /// Map a declared type token to a field type.
    ///
    /// Any token starting with `str` is text. Returns `None` for tokens
    /// outside the recognized set.
    ///
    /// # Examples
    ///
    /// ```
    /// use gss_model::FieldType;
    ///
    /// assert_eq!(FieldType::from_declared("long"), Some(FieldType::Integer));
    /// assert_eq!(FieldType::from_declared("str244"), Some(FieldType::Text));
    /// assert_eq!(FieldType::from_declared("date"), None);
    /// ```
    pub fn from_declared(token: &str) -> Option<Self> {
        if token.starts_with("str") {
            return Some(FieldType::Text);
        }
        match token {
            "byte" | "int" | "long" => Some(FieldType::Integer),
            "float" | "double" | "numeric" => Some(FieldType::Real),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Integer => "integer",
            FieldType::Real => "real",
            FieldType::Text => "text",
        }
    }

    /// Whether values of this type are numbers once coerced.
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Integer | FieldType::Real)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named field of a fixed-width record.
///
/// Offsets are 0-based byte positions. `end` is exclusive; `None` means the
/// field runs to the end of the line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub start: usize,
    pub end: Option<usize>,
    pub field_type: FieldType,
    /// Display format such as `%8.0g`; informational only.
    pub format: String,
    pub description: String,
}

impl FieldDescriptor {
    pub fn new(
        name: impl Into<String>,
        start: usize,
        end: Option<usize>,
        field_type: FieldType,
    ) -> Self {
        Self {
            name: name.into(),
            start,
            end,
            field_type,
            format: String::new(),
            description: String::new(),
        }
    }

    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Field width in bytes, or `None` for an open-ended field.
    pub fn width(&self) -> Option<usize> {
        self.end.map(|end| end.saturating_sub(self.start))
    }

    /// Byte range of this field within a line of `line_len` bytes.
    ///
    /// Returns `None` when the field starts at or past the end of the line.
    /// The returned range is clipped to the line.
    pub fn clipped_range(&self, line_len: usize) -> Option<std::ops::Range<usize>> {
        if self.start >= line_len {
            return None;
        }
        let end = self.end.map_or(line_len, |end| end.min(line_len));
        Some(self.start..end)
    }

    /// Whether the full span of this field fits in a line of `line_len` bytes.
    pub fn fits(&self, line_len: usize) -> bool {
        match self.end {
            Some(end) => end <= line_len,
            None => self.start < line_len,
        }
    }
}
