//! Weighted and uniform row resampling.
//!
//! GSS respondents are not a simple random sample: each carries a sampling
//! weight. Resampling rows with probability proportional to weight yields a
//! dataset that can be analysed as if it were representative. The cumulative
//! file pools many survey years whose weights are normalized per year, so
//! [`resample_grouped`] resamples each year on its own.

use std::collections::HashMap;

use gss_common::{any_to_f64, any_to_string_non_empty, compare_cell_text};
use polars::prelude::*;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::error::{Result, TransformError, WeightError};
use crate::frame::{require_column, take_rows};

/// Draws indices with probability proportional to their weight.
#[derive(Debug, Clone)]
pub struct WeightedSampler {
    cumulative: Vec<f64>,
    total: f64,
    last_positive: usize,
}

impl WeightedSampler {
    /// Build a sampler; every weight must be finite and non-negative and at
    /// least one must be positive.
    pub fn new(weights: &[f64]) -> std::result::Result<Self, WeightError> {
        if weights.is_empty() {
            return Err(WeightError::Empty);
        }
        let mut cumulative = Vec::with_capacity(weights.len());
        let mut total = 0.0;
        let mut last_positive = None;
        for (index, &weight) in weights.iter().enumerate() {
            if !weight.is_finite() {
                return Err(WeightError::NonFinite { index });
            }
            if weight < 0.0 {
                return Err(WeightError::Negative {
                    index,
                    value: weight,
                });
            }
            if weight > 0.0 {
                last_positive = Some(index);
            }
            total += weight;
            cumulative.push(total);
        }
        let Some(last_positive) = last_positive else {
            return Err(WeightError::ZeroTotal);
        };
        if !total.is_finite() {
            return Err(WeightError::Overflow);
        }
        Ok(Self {
            cumulative,
            total,
            last_positive,
        })
    }

    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }

    /// Draw one index.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let target = rng.random::<f64>() * self.total;
        // First cumulative sum strictly above the target: zero-weight rows
        // share their predecessor's sum and are never selected.
        let index = self.cumulative.partition_point(|&sum| sum <= target);
        index.min(self.last_positive)
    }

    /// Draw `n` indices with replacement.
    pub fn sample_n<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<usize> {
        (0..n).map(|_| self.sample(rng)).collect()
    }
}

/// Resample `df` with replacement, weighting rows by `weight_column`.
///
/// The result has as many rows as the input. Weights need not sum to one.
pub fn resample<R: Rng + ?Sized>(
    df: &DataFrame,
    weight_column: &str,
    rng: &mut R,
) -> Result<DataFrame> {
    let weights = require_column(df, weight_column)?;
    if df.height() == 0 {
        return Ok(df.clone());
    }
    let rows: Vec<usize> = (0..df.height()).collect();
    let sampler = sampler_for(weights, &rows).map_err(|source| TransformError::InvalidWeights {
        column: weight_column.to_string(),
        source,
    })?;
    let draws = sampler.sample_n(df.height(), rng);
    let out = take_rows(df, &draws)?;
    debug!(rows = out.height(), weight_column, "weighted resample");
    Ok(out)
}

/// Resample each group of `group_key` separately and stack the results.
///
/// Every group keeps its size and is renormalized by its own weight total, so
/// a group with large raw weights cannot crowd out another. Groups appear in
/// ascending key order. Rows with a null key are dropped.
pub fn resample_grouped<R: Rng + ?Sized>(
    df: &DataFrame,
    weight_column: &str,
    group_key: &str,
    rng: &mut R,
) -> Result<DataFrame> {
    let weights = require_column(df, weight_column)?;
    let keys = require_column(df, group_key)?;
    let groups = partition_rows(keys)?;

    let mut samplers = Vec::with_capacity(groups.len());
    for group in &groups {
        let sampler = sampler_for(weights, &group.rows).map_err(|source| {
            TransformError::InvalidGroupWeights {
                column: weight_column.to_string(),
                group: group.key.clone(),
                source,
            }
        })?;
        samplers.push(sampler);
    }

    let mut draws = Vec::with_capacity(groups.iter().map(|g| g.rows.len()).sum());
    for (group, sampler) in groups.iter().zip(&samplers) {
        for local in sampler.sample_n(group.rows.len(), rng) {
            draws.push(group.rows[local]);
        }
        debug!(group = %group.key, rows = group.rows.len(), "resampled group");
    }

    let out = take_rows(df, &draws)?;
    info!(
        groups = groups.len(),
        rows = out.height(),
        weight_column,
        group_key,
        "grouped weighted resample"
    );
    Ok(out)
}

/// Draw `n` rows uniformly, with or without replacement.
pub fn sample_rows<R: Rng + ?Sized>(
    df: &DataFrame,
    n: usize,
    replace: bool,
    rng: &mut R,
) -> Result<DataFrame> {
    let available = df.height();
    if n == 0 {
        return Ok(df.head(Some(0)));
    }
    let draws: Vec<usize> = if replace {
        if available == 0 {
            return Err(TransformError::SampleTooLarge {
                requested: n,
                available,
            });
        }
        (0..n).map(|_| rng.random_range(0..available)).collect()
    } else {
        if n > available {
            return Err(TransformError::SampleTooLarge {
                requested: n,
                available,
            });
        }
        rand::seq::index::sample(rng, available, n).into_vec()
    };
    take_rows(df, &draws)
}

/// Bootstrap resample: `len(df)` rows drawn uniformly with replacement.
pub fn resample_rows<R: Rng + ?Sized>(df: &DataFrame, rng: &mut R) -> Result<DataFrame> {
    sample_rows(df, df.height(), true, rng)
}

#[derive(Debug)]
struct Group {
    key: String,
    rows: Vec<usize>,
}

/// Split row positions by key, in ascending key order.
fn partition_rows(keys: &Column) -> Result<Vec<Group>> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();
    let mut null_keys = 0usize;
    for row in 0..keys.len() {
        let Some(key) = any_to_string_non_empty(keys.get(row)?) else {
            null_keys += 1;
            continue;
        };
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(Group {
                key,
                rows: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].rows.push(row);
    }
    if null_keys > 0 {
        warn!(
            group_key = keys.name().as_str(),
            rows = null_keys,
            "rows with missing group key excluded from resample"
        );
    }
    groups.sort_by(|a, b| compare_cell_text(&a.key, &b.key));
    Ok(groups)
}

fn sampler_for(
    weights: &Column,
    rows: &[usize],
) -> std::result::Result<WeightedSampler, WeightError> {
    let mut values = Vec::with_capacity(rows.len());
    for &row in rows {
        let weight = weights
            .get(row)
            .ok()
            .and_then(any_to_f64)
            .ok_or(WeightError::Missing { index: row })?;
        values.push(weight);
    }
    WeightedSampler::new(&values).map_err(|err| relocate(err, rows))
}

/// Map a group-local row index in a weight error back to the dataset row.
fn relocate(err: WeightError, rows: &[usize]) -> WeightError {
    let at = |index: usize| rows.get(index).copied().unwrap_or(index);
    match err {
        WeightError::NonFinite { index } => WeightError::NonFinite { index: at(index) },
        WeightError::Negative { index, value } => WeightError::Negative {
            index: at(index),
            value,
        },
        other => other,
    }
}
