//! Fixed-width record decoder.
//!
//! Slices every line of a data file into the byte spans of a
//! [`ColumnLayout`] and collects the tokens into a Polars `DataFrame` with
//! one `String` column per field. Missing tokens are null. Empty lines are
//! skipped; a line of spaces is a record whose fields are all null.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::bufread::MultiGzDecoder;
use gss_model::{ColumnLayout, FieldDescriptor, FieldType};
use polars::prelude::{Column, DataFrame, DataType};
use tracing::{debug, info};

use crate::dictionary::read_dictionary;
use crate::error::{DctError, Result};
use crate::options::{Compression, DecodeOptions, PartialFieldPolicy};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Fixed-width data reader.
///
/// Reads the source once, front to back.
pub struct FixedWidthReader<R: Read> {
    reader: BufReader<R>,
    options: DecodeOptions,
}

impl<R: Read> FixedWidthReader<R> {
    /// Create a new reader over plain text.
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            options: DecodeOptions::default(),
        }
    }

    /// Create a new reader with options.
    pub fn with_options(reader: R, options: DecodeOptions) -> Self {
        Self {
            reader: BufReader::new(reader),
            options,
        }
    }

    /// Decode every record into a dataframe laid out by `layout`.
    pub fn read_dataframe(self, layout: &ColumnLayout) -> Result<DataFrame> {
        let options = self.options.clone();
        let mut source = self.into_source()?;
        let mut columns: Vec<Vec<Option<String>>> = vec![Vec::new(); layout.len()];
        let mut stats = DecodeStats::default();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if source.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = strip_line_ending(&buf);
            if line.is_empty() {
                stats.empty_lines += 1;
                continue;
            }
            stats.rows += 1;
            if layout.fields().iter().any(|field| !field.fits(line.len())) {
                stats.short_lines += 1;
            }
            for (field, values) in layout.fields().iter().zip(columns.iter_mut()) {
                values.push(decode_field(line, field, options.partial_fields));
            }
        }

        if stats.short_lines > 0 {
            debug!(
                short_lines = stats.short_lines,
                "records shorter than the layout; out-of-range fields decoded as null"
            );
        }
        debug!(
            rows = stats.rows,
            empty_lines = stats.empty_lines,
            "finished fixed-width pass"
        );

        let columns: Vec<Column> = layout
            .fields()
            .iter()
            .zip(columns)
            .map(|(field, values)| Column::new(field.name.as_str().into(), values))
            .collect();
        let df = DataFrame::new(columns)?;
        if options.coerce_types {
            coerce_declared_types(&df, layout)
        } else {
            Ok(df)
        }
    }

    /// Wrap the underlying reader in a gzip decoder when required.
    fn into_source<'a>(mut self) -> Result<Box<dyn BufRead + 'a>>
    where
        R: 'a,
    {
        let gzip = match self.options.compression {
            Compression::None => false,
            Compression::Gzip => true,
            Compression::Auto => self.reader.fill_buf()?.starts_with(&GZIP_MAGIC),
        };
        if gzip {
            Ok(Box::new(BufReader::new(MultiGzDecoder::new(self.reader))))
        } else {
            Ok(Box::new(self.reader))
        }
    }
}

impl FixedWidthReader<File> {
    /// Open a plain-text data file.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_options(path, DecodeOptions::default())
    }

    /// Open a data file with options.
    pub fn open_with_options(path: &Path, options: DecodeOptions) -> Result<Self> {
        let file = File::open(path).map_err(|e| DctError::open(path, e))?;
        Ok(Self::with_options(file, options))
    }
}

#[derive(Debug, Default)]
struct DecodeStats {
    rows: usize,
    short_lines: usize,
    empty_lines: usize,
}

/// Decode a data file with the given layout.
///
/// `compressed` selects gzip decoding. Tokens are left as text.
pub fn decode_fixed_width(
    layout: &ColumnLayout,
    path: &Path,
    compressed: bool,
) -> Result<DataFrame> {
    let options = DecodeOptions::default().with_compression(Compression::from_flag(compressed));
    decode_fixed_width_with_options(layout, path, &options)
}

/// Decode a data file with explicit options.
pub fn decode_fixed_width_with_options(
    layout: &ColumnLayout,
    path: &Path,
    options: &DecodeOptions,
) -> Result<DataFrame> {
    let df = FixedWidthReader::open_with_options(path, options.clone())?.read_dataframe(layout)?;
    info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "decoded fixed-width data"
    );
    Ok(df)
}

/// Decode fixed-width records from any reader.
pub fn decode_reader<R: Read>(
    layout: &ColumnLayout,
    reader: R,
    options: &DecodeOptions,
) -> Result<DataFrame> {
    FixedWidthReader::with_options(reader, options.clone()).read_dataframe(layout)
}

/// Parse a dictionary and decode its data file.
pub fn load_dataset(
    dictionary_path: &Path,
    data_path: &Path,
    compressed: bool,
) -> Result<DataFrame> {
    let options = DecodeOptions::default().with_compression(Compression::from_flag(compressed));
    load_dataset_with_options(dictionary_path, data_path, &options)
}

/// Parse a dictionary and decode its data file with explicit options.
pub fn load_dataset_with_options(
    dictionary_path: &Path,
    data_path: &Path,
    options: &DecodeOptions,
) -> Result<DataFrame> {
    let layout = read_dictionary(dictionary_path)?;
    decode_fixed_width_with_options(&layout, data_path, options)
}

/// Cast integer and real fields to `Int64` / `Float64`.
///
/// The cast is non-strict: tokens that do not parse become null. Text fields
/// and columns absent from `df` are left alone.
pub fn coerce_declared_types(df: &DataFrame, layout: &ColumnLayout) -> Result<DataFrame> {
    let mut out = df.clone();
    for field in layout {
        let target = match field.field_type {
            FieldType::Integer => DataType::Int64,
            FieldType::Real => DataType::Float64,
            FieldType::Text => continue,
        };
        let Ok(column) = df.column(&field.name) else {
            continue;
        };
        out.with_column(column.cast(&target)?)?;
    }
    Ok(out)
}

/// Slice one field out of a line.
fn decode_field(
    line: &[u8],
    field: &FieldDescriptor,
    policy: PartialFieldPolicy,
) -> Option<String> {
    if policy == PartialFieldPolicy::Missing && !field.fits(line.len()) {
        return None;
    }
    let range = field.clipped_range(line.len())?;
    decode_token(&line[range])
}

/// Decode a token, trimming surrounding whitespace; blank tokens are missing.
fn decode_token(bytes: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(bytes);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn strip_line_ending(buf: &[u8]) -> &[u8] {
    let line = buf.strip_suffix(b"\n").unwrap_or(buf);
    line.strip_suffix(b"\r").unwrap_or(line)
}
