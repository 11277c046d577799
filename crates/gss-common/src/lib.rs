//! Shared utilities for GSS preparation crates.
//!
//! This crate provides the Polars cell conversions used across the
//! workspace.

pub mod polars;

pub use polars::{
    any_to_f64, any_to_i64, any_to_string, any_to_string_non_empty, compare_cell_text,
    format_numeric, parse_f64, parse_i64,
};
