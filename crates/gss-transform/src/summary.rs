//! Tabulation helpers for exploring a prepared extract.

use std::collections::{BTreeSet, HashMap};

use gss_common::{any_to_f64, any_to_string_non_empty, compare_cell_text};
use polars::prelude::*;
use serde::Serialize;

use crate::error::{Result, TransformError};
use crate::frame::require_column;

/// One distinct value and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Count the distinct non-null values of `field`, in ascending value order.
pub fn value_counts(df: &DataFrame, field: &str) -> Result<Vec<ValueCount>> {
    let column = require_column(df, field)?;
    let mut counts: HashMap<String, usize> = HashMap::new();
    for row in 0..column.len() {
        if let Some(value) = any_to_string_non_empty(column.get(row)?) {
            *counts.entry(value).or_default() += 1;
        }
    }
    let mut out: Vec<ValueCount> = counts
        .into_iter()
        .map(|(value, count)| ValueCount { value, count })
        .collect();
    out.sort_by(|a, b| compare_cell_text(&a.value, &b.value));
    Ok(out)
}

/// Cross-tabulate `field` by `group_key`.
///
/// The result has a `group_key` column followed by one `UInt32` count column
/// per category of `field`. Groups in which some category never occurs are
/// dropped: in the cumulative file that means the question was not asked
/// that year, and partial rows would distort trends.
pub fn count_by_group(df: &DataFrame, field: &str, group_key: &str) -> Result<DataFrame> {
    let values = require_column(df, field)?;
    let keys = require_column(df, group_key)?;

    let mut counts: HashMap<(String, String), u32> = HashMap::new();
    let mut groups: BTreeSet<String> = BTreeSet::new();
    let mut categories: BTreeSet<String> = BTreeSet::new();
    for row in 0..df.height() {
        let (Some(group), Some(category)) = (
            any_to_string_non_empty(keys.get(row)?),
            any_to_string_non_empty(values.get(row)?),
        ) else {
            continue;
        };
        groups.insert(group.clone());
        categories.insert(category.clone());
        *counts.entry((group, category)).or_default() += 1;
    }

    let mut groups: Vec<String> = groups.into_iter().collect();
    groups.sort_by(|a, b| compare_cell_text(a, b));
    let mut categories: Vec<String> = categories.into_iter().collect();
    categories.sort_by(|a, b| compare_cell_text(a, b));

    let count = |group: &str, category: &str| {
        counts
            .get(&(group.to_string(), category.to_string()))
            .copied()
            .unwrap_or(0)
    };
    groups.retain(|group| categories.iter().all(|category| count(group, category) > 0));

    let mut columns = Vec::with_capacity(categories.len() + 1);
    columns.push(Column::new(group_key.into(), &groups));
    for category in &categories {
        let tally: Vec<u32> = groups.iter().map(|group| count(group, category)).collect();
        columns.push(Column::new(category.as_str().into(), tally));
    }
    Ok(DataFrame::new(columns)?)
}

/// Round each value of `field` down to the lower edge of its bin.
///
/// Bin edges run from `low` in steps of `bin_width` up to the first edge past
/// `high` (default: the column maximum). Values below `low` and nulls map to
/// null; values beyond the last edge map to the last edge.
pub fn round_into_bins(
    df: &DataFrame,
    field: &str,
    bin_width: f64,
    low: f64,
    high: Option<f64>,
) -> Result<Series> {
    if !(bin_width.is_finite() && bin_width > 0.0) {
        return Err(TransformError::InvalidBinWidth { width: bin_width });
    }
    let column = require_column(df, field)?;
    let values: Vec<Option<f64>> = (0..column.len())
        .map(|row| column.get(row).map(any_to_f64))
        .collect::<PolarsResult<_>>()?;

    let high = high.or_else(|| values.iter().flatten().copied().reduce(f64::max));
    let edges = high.map_or(0, |high| edge_count(low, high, bin_width));
    let binned: Vec<Option<f64>> = values
        .into_iter()
        .map(|value| {
            let value = value?;
            if edges == 0 || value < low {
                return None;
            }
            let bin = ((value - low) / bin_width).floor() as usize;
            Some(low + bin.min(edges - 1) as f64 * bin_width)
        })
        .collect();
    Ok(Series::new(field.into(), binned))
}

/// Number of edges in `low, low + width, ...` strictly below `high + width`.
fn edge_count(low: f64, high: f64, width: f64) -> usize {
    let span = (high + width - low) / width;
    if span > 0.0 { span.ceil() as usize } else { 0 }
}
