//! Column lookup and row gathering shared by the transforms.

use polars::prelude::*;

use crate::error::{Result, TransformError};

pub(crate) fn require_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name)
        .map_err(|_| TransformError::unknown_field(name))
}

/// Row positions to a gather index; `None` yields a null cell.
pub(crate) fn gather_index<I>(name: &str, rows: I) -> IdxCa
where
    I: IntoIterator<Item = Option<usize>>,
{
    IdxCa::from_iter_options(
        name.into(),
        rows.into_iter().map(|row| row.map(|r| r as IdxSize)),
    )
}

/// Rebuild `column` from the given rows of itself, keeping name and dtype.
pub(crate) fn regather<I>(column: &Column, rows: I) -> Result<Column>
where
    I: IntoIterator<Item = Option<usize>>,
{
    let indices = gather_index(column.name().as_str(), rows);
    Ok(column.take(&indices)?)
}

/// Gather whole rows, with replacement allowed.
pub(crate) fn take_rows(df: &DataFrame, rows: &[usize]) -> Result<DataFrame> {
    let indices = gather_index("row", rows.iter().copied().map(Some));
    Ok(df.take(&indices)?)
}
