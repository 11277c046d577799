//! Missing-value recoding.
//!
//! Survey fields encode "not applicable" and "no answer" as in-band integer
//! codes. Recoding replaces those codes with null so that downstream
//! statistics treat them as missing.

use std::collections::{BTreeMap, BTreeSet};

use gss_common::any_to_i64;
use polars::prelude::*;
use tracing::{debug, info};

use crate::error::{Result, TransformError};
use crate::frame::{regather, require_column};
use crate::sentinel::SentinelTable;

/// What to do with table entries for fields the dataset lacks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AbsentFieldPolicy {
    /// Fail with `UnknownField` before touching any column.
    #[default]
    Error,
    /// Ignore the entry.
    Skip,
}

/// Outcome of applying a sentinel table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecodeSummary {
    /// Values replaced per field.
    pub replaced: BTreeMap<String, usize>,
    /// Table fields missing from the dataset.
    pub skipped: Vec<String>,
}

impl RecodeSummary {
    pub fn total_replaced(&self) -> usize {
        self.replaced.values().sum()
    }
}

/// Replace every value of `field` equal to one of `sentinels` with null.
///
/// Values are compared numerically, so the text token `"98"` and the float
/// `98.0` both match the code `98`. Nulls and other values are untouched and
/// the column keeps its dtype. Returns the number of values replaced.
pub fn recode_missing(df: &mut DataFrame, field: &str, sentinels: &[i64]) -> Result<usize> {
    let codes: BTreeSet<i64> = sentinels.iter().copied().collect();
    recode_codes(df, field, &codes)
}

/// Recode every field listed in `table`.
pub fn apply_sentinel_table(
    df: &mut DataFrame,
    table: &SentinelTable,
    policy: AbsentFieldPolicy,
) -> Result<RecodeSummary> {
    let mut summary = RecodeSummary::default();
    let mut present = Vec::with_capacity(table.len());
    for (field, codes) in table.iter() {
        if df.column(field).is_ok() {
            present.push((field, codes));
            continue;
        }
        match policy {
            AbsentFieldPolicy::Error => return Err(TransformError::unknown_field(field)),
            AbsentFieldPolicy::Skip => summary.skipped.push(field.to_string()),
        }
    }

    for (field, codes) in present {
        let replaced = recode_codes(df, field, codes)?;
        summary.replaced.insert(field.to_string(), replaced);
    }

    info!(
        fields = summary.replaced.len(),
        skipped = summary.skipped.len(),
        replaced = summary.total_replaced(),
        "applied sentinel table"
    );
    Ok(summary)
}

/// Row flags: true where the cell holds one of `codes`.
pub(crate) fn sentinel_mask(column: &Column, codes: &BTreeSet<i64>) -> Result<Vec<bool>> {
    (0..column.len())
        .map(|row| {
            let value = column.get(row)?;
            Ok(any_to_i64(value).is_some_and(|v| codes.contains(&v)))
        })
        .collect()
}

fn recode_codes(df: &mut DataFrame, field: &str, codes: &BTreeSet<i64>) -> Result<usize> {
    let column = require_column(df, field)?;
    let mask = sentinel_mask(column, codes)?;
    let replaced = mask.iter().filter(|hit| **hit).count();
    if replaced == 0 {
        return Ok(0);
    }
    let rows = mask
        .iter()
        .enumerate()
        .map(|(row, hit)| (!hit).then_some(row));
    let recoded = regather(column, rows)?;
    df.with_column(recoded)?;
    debug!(field, replaced, "recoded sentinel codes to null");
    Ok(replaced)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recode_text_and_numeric() {
        let mut df = df!(
            "educ" => ["12", "98", " 99", "16"],
            "realinc" => [0.0f64, 25_000.0, 0.0, 13_500.5],
        )
        .unwrap();
        assert_eq!(recode_missing(&mut df, "educ", &[97, 98, 99]).unwrap(), 2);
        assert_eq!(recode_missing(&mut df, "realinc", &[0]).unwrap(), 2);
        assert_eq!(df.column("educ").unwrap().null_count(), 2);
        assert_eq!(df.column("realinc").unwrap().dtype(), &DataType::Float64);
        assert_eq!(
            df.column("realinc").unwrap().get(3).unwrap(),
            AnyValue::Float64(13_500.5)
        );
    }

    #[test]
    fn test_fractional_values_never_match() {
        let mut df = df!("age" => [98.5f64, 98.0]).unwrap();
        assert_eq!(recode_missing(&mut df, "age", &[98]).unwrap(), 1);
        assert_eq!(
            df.column("age").unwrap().get(0).unwrap(),
            AnyValue::Float64(98.5)
        );
    }

    #[test]
    fn test_unknown_field_leaves_frame_alone() {
        let mut df = df!("age" => [98i64]).unwrap();
        let before = df.clone();
        let err = recode_missing(&mut df, "agewed", &[98]).unwrap_err();
        assert!(matches!(err, TransformError::UnknownField { .. }));
        assert!(df.equals_missing(&before));
    }
}
