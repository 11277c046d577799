//! Cleaning and resampling transforms for decoded GSS extracts.
//!
//! - [`recode_missing`] and [`apply_sentinel_table`] turn in-band sentinel
//!   codes into nulls.
//! - [`fill_missing`] fills nulls by hot-deck draws from observed values.
//! - [`resample`] and [`resample_grouped`] draw a weighted bootstrap sample.
//! - [`value_counts`], [`count_by_group`] and [`round_into_bins`] tabulate.
//!
//! Every random operation takes the generator explicitly, so a seeded
//! `StdRng` makes a run reproducible.

mod error;
mod frame;
mod impute;
mod recode;
mod resample;
mod sentinel;
mod summary;

pub use error::{Result, TransformError, WeightError};
pub use impute::fill_missing;
pub use recode::{AbsentFieldPolicy, RecodeSummary, apply_sentinel_table, recode_missing};
pub use resample::{WeightedSampler, resample, resample_grouped, resample_rows, sample_rows};
pub use sentinel::SentinelTable;
pub use summary::{ValueCount, count_by_group, round_into_bins, value_counts};
