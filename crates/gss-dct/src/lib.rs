//! Stata dictionary parser and fixed-width decoder for GSS extracts.
//!
//! A GSS extract is a `.dct` dictionary plus a fixed-width `.dat` payload
//! (often gzip-compressed). The dictionary gives each variable's storage
//! type and 1-based start column; this crate turns it into a
//! [`ColumnLayout`](gss_model::ColumnLayout) and decodes the payload into a
//! Polars `DataFrame`.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use gss_dct::{load_dataset, read_dictionary};
//!
//! let layout = read_dictionary(Path::new("GSS.dct")).unwrap();
//! println!("{} fields", layout.len());
//!
//! let gss = load_dataset(Path::new("GSS.dct"), Path::new("GSS.dat.gz"), true).unwrap();
//! println!("{} respondents", gss.height());
//! ```
//!
//! # Missing values
//!
//! Decoded cells are text. A field that lies beyond the end of a short line,
//! or that holds only spaces, is null regardless of its declared type.

mod dictionary;
mod error;
mod options;
mod reader;
mod writer;

pub use error::{DctError, Result};

pub use dictionary::{parse_dictionary_lines, parse_dictionary_str, read_dictionary};

pub use options::{Compression, DecodeOptions, PartialFieldPolicy};

pub use reader::{
    FixedWidthReader, coerce_declared_types, decode_fixed_width, decode_fixed_width_with_options,
    decode_reader, load_dataset, load_dataset_with_options,
};

pub use writer::{FixedWidthWriter, encode_record};
