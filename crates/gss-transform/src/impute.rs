//! Hot-deck imputation.

use std::collections::BTreeSet;

use polars::prelude::*;
use rand::Rng;
use tracing::debug;

use crate::error::{Result, TransformError};
use crate::frame::{regather, require_column};
use crate::recode::sentinel_mask;

/// Recode `sentinels` in `field` to null, then replace every null with a
/// value drawn uniformly from the field's observed values.
///
/// Each missing row draws independently, so the filled column keeps the
/// marginal distribution of the observed values but loses any relation
/// between the imputed rows and the other fields. Returns the number of
/// values filled. Fails with `NoObservedValues`, leaving `df` untouched,
/// when values are missing and none are observed.
pub fn fill_missing<R: Rng + ?Sized>(
    df: &mut DataFrame,
    field: &str,
    sentinels: &[i64],
    rng: &mut R,
) -> Result<usize> {
    let column = require_column(df, field)?;
    let codes: BTreeSet<i64> = sentinels.iter().copied().collect();
    let mask = sentinel_mask(column, &codes)?;

    let mut missing = Vec::new();
    let mut donors = Vec::new();
    for (row, is_sentinel) in mask.iter().enumerate() {
        if *is_sentinel || column.get(row)?.is_null() {
            missing.push(row);
        } else {
            donors.push(row);
        }
    }

    if missing.is_empty() {
        return Ok(0);
    }
    if donors.is_empty() {
        return Err(TransformError::NoObservedValues {
            name: field.to_string(),
            missing: missing.len(),
        });
    }

    let mut rows: Vec<usize> = (0..column.len()).collect();
    for &row in &missing {
        rows[row] = donors[rng.random_range(0..donors.len())];
    }
    let filled = regather(column, rows.into_iter().map(Some))?;
    df.with_column(filled)?;
    debug!(
        field,
        filled = missing.len(),
        donors = donors.len(),
        "filled missing values"
    );
    Ok(missing.len())
}
