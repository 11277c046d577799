//! Fixed-width record encoder.
//!
//! Lays values out at the byte spans of a [`ColumnLayout`]. Used to build
//! fixtures and subsets of an extract in the same format the decoder reads.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use gss_model::ColumnLayout;

use crate::error::{DctError, Result};

/// Writer emitting one fixed-width line per record.
pub struct FixedWidthWriter<'a, W: Write> {
    writer: BufWriter<W>,
    layout: &'a ColumnLayout,
    records: usize,
}

impl<'a, W: Write> FixedWidthWriter<'a, W> {
    pub fn new(writer: W, layout: &'a ColumnLayout) -> Self {
        Self {
            writer: BufWriter::new(writer),
            layout,
            records: 0,
        }
    }

    /// Encode and write one record.
    pub fn write_record<S: AsRef<str>>(&mut self, values: &[S]) -> Result<()> {
        let line = encode_record(self.layout, values)?;
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.records += 1;
        Ok(())
    }

    /// Flush and return the number of records written.
    pub fn finish(mut self) -> Result<usize> {
        self.writer.flush()?;
        Ok(self.records)
    }
}

impl<'a> FixedWidthWriter<'a, File> {
    /// Create a data file at `path`.
    pub fn create(path: &Path, layout: &'a ColumnLayout) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(file, layout))
    }
}

/// Encode one record as a fixed-width line (without line terminator).
///
/// Values are right-aligned within their field and gaps between fields are
/// filled with spaces. An empty value leaves the field blank, which the
/// decoder reads back as missing. The open-ended last field is written
/// verbatim.
pub fn encode_record<S: AsRef<str>>(layout: &ColumnLayout, values: &[S]) -> Result<String> {
    if values.len() != layout.len() {
        return Err(DctError::RowLengthMismatch {
            expected: layout.len(),
            actual: values.len(),
        });
    }

    let base_len = layout
        .record_length()
        .into_iter()
        .chain(layout.max_end())
        .max()
        .unwrap_or(0);
    let mut line = vec![b' '; base_len];

    for (field, value) in layout.fields().iter().zip(values) {
        let value = value.as_ref();
        match field.width() {
            Some(width) => {
                if value.len() > width {
                    return Err(DctError::ValueTooWide {
                        name: field.name.clone(),
                        value: value.to_string(),
                        width,
                    });
                }
                let offset = field.start + width - value.len();
                line[offset..offset + value.len()].copy_from_slice(value.as_bytes());
            }
            None => {
                if line.len() < field.start {
                    line.resize(field.start, b' ');
                }
                line.truncate(field.start);
                line.extend_from_slice(value.as_bytes());
            }
        }
    }

    Ok(String::from_utf8_lossy(&line).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gss_model::{FieldDescriptor, FieldType};

    fn layout() -> ColumnLayout {
        ColumnLayout::new(vec![
            FieldDescriptor::new("year", 0, Some(4), FieldType::Integer),
            FieldDescriptor::new("age", 5, Some(8), FieldType::Integer),
            FieldDescriptor::new("wtssall", 8, None, FieldType::Real),
        ])
        .unwrap()
    }

    #[test]
    fn test_encode_right_aligns_and_fills_gaps() {
        let line = encode_record(&layout(), &["1972", "23", "0.4446"]).unwrap();
        assert_eq!(line, "1972  230.4446");
    }

    #[test]
    fn test_encode_blank_value() {
        let line = encode_record(&layout(), &["1972", "", "1"]).unwrap();
        assert_eq!(line, "1972    1");
    }

    #[test]
    fn test_encode_rejects_wide_values() {
        let err = encode_record(&layout(), &["19720", "1", "1"]).unwrap_err();
        assert!(matches!(err, DctError::ValueTooWide { width: 4, .. }));
    }

    #[test]
    fn test_encode_rejects_wrong_arity() {
        let err = encode_record(&layout(), &["1972"]).unwrap_err();
        assert!(matches!(
            err,
            DctError::RowLengthMismatch {
                expected: 3,
                actual: 1
            }
        ));
    }
}
