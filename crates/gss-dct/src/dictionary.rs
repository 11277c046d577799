//! Stata dictionary (`.dct`) parser.
//!
//! A GSS extract ships with a dictionary whose field lines look like
//!
//! ```text
//!   _column(1)   int     year     %8.0g  "GSS year for this respondent"
//! ```
//!
//! Only lines carrying a `_column(N)` marker describe fields; headers, braces
//! and blank lines are skipped. Declared columns are 1-based and a field ends
//! where the next one starts.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use gss_model::{ColumnLayout, FieldDescriptor, FieldType};
use tracing::{debug, warn};

use crate::error::{DctError, Result};

const COLUMN_MARKER: &str = "_column(";
const LRECL_MARKER: &str = "_lrecl(";

/// A field line before end offsets are known.
#[derive(Debug)]
struct PendingField {
    declared_start: usize,
    field_type: FieldType,
    name: String,
    format: String,
    description: String,
}

/// Read and parse a dictionary file.
///
/// Bytes that are not valid UTF-8 (Latin-1 descriptions, for instance) are
/// replaced rather than rejected.
pub fn read_dictionary(path: &Path) -> Result<ColumnLayout> {
    let file = File::open(path).map_err(|e| DctError::open(path, e))?;
    let mut reader = BufReader::new(file);
    let mut lines = Vec::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = buf.strip_suffix(b"\n").unwrap_or(&buf);
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        lines.push(String::from_utf8_lossy(line).into_owned());
    }
    let layout = parse_dictionary_lines(&lines)?;
    debug!(
        path = %path.display(),
        fields = layout.len(),
        record_length = ?layout.record_length(),
        "parsed dictionary"
    );
    Ok(layout)
}

/// Parse dictionary text held in memory.
pub fn parse_dictionary_str(text: &str) -> Result<ColumnLayout> {
    parse_dictionary_lines(text.lines())
}

/// Parse dictionary lines into a column layout.
///
/// Fields must be listed in ascending column order. The last field ends at
/// the declared record length (`_lrecl`) when there is one, otherwise it
/// runs to the end of each line.
pub fn parse_dictionary_lines<I, S>(lines: I) -> Result<ColumnLayout>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut pending = Vec::new();
    let mut record_length = None;

    for (idx, line) in lines.into_iter().enumerate() {
        let line = line.as_ref();
        let line_no = idx + 1;

        if let Some(content) = marker_content(line, LRECL_MARKER) {
            match content.trim().parse::<usize>() {
                Ok(len) if len > 0 => record_length = Some(len),
                _ => warn!(line = line_no, content, "ignoring unreadable _lrecl marker"),
            }
        }

        if let Some(field) = parse_field_line(line, line_no)? {
            pending.push(field);
        }
    }

    let layout = build_layout(pending, record_length)?;
    Ok(layout.with_record_length(record_length))
}

/// Parse a single line; `Ok(None)` when the line does not describe a field.
fn parse_field_line(line: &str, line_no: usize) -> Result<Option<PendingField>> {
    let Some(content) = marker_content(line, COLUMN_MARKER) else {
        return Ok(None);
    };
    let declared_start = match content.trim().parse::<usize>() {
        Ok(start) if start >= 1 => start,
        _ => return Err(DctError::malformed_column_marker(line_no, content)),
    };

    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 4 {
        debug!(line = line_no, "skipping _column line with too few tokens");
        return Ok(None);
    }

    let field_type = FieldType::from_declared(tokens[1])
        .ok_or_else(|| DctError::unknown_type(line_no, tokens[1]))?;
    let description = tokens[4..].join(" ").trim_matches('"').to_string();

    Ok(Some(PendingField {
        declared_start,
        field_type,
        name: tokens[2].to_lowercase(),
        format: tokens[3].to_string(),
        description,
    }))
}

/// Text between `marker` and the next closing parenthesis.
fn marker_content<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    let open = line.find(marker)? + marker.len();
    let close = line[open..].find(')')?;
    Some(&line[open..open + close])
}

/// Derive 0-based half-open spans from declared 1-based starts.
fn build_layout(pending: Vec<PendingField>, record_length: Option<usize>) -> Result<ColumnLayout> {
    let starts: Vec<usize> = pending.iter().map(|f| f.declared_start - 1).collect();
    let mut fields = Vec::with_capacity(pending.len());
    for (idx, field) in pending.into_iter().enumerate() {
        let end = starts.get(idx + 1).copied().or(record_length);
        fields.push(
            FieldDescriptor::new(field.name, starts[idx], end, field.field_type)
                .with_format(field.format)
                .with_description(field.description),
        );
    }
    Ok(ColumnLayout::new(fields)?)
}
