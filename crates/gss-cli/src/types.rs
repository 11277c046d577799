use std::path::PathBuf;

use gss_transform::RecodeSummary;

/// What a `load` or `resample` run produced.
#[derive(Debug)]
pub struct DatasetSummary {
    pub source: PathBuf,
    pub rows: usize,
    pub columns: usize,
    pub recode: Option<RecodeSummary>,
    pub resample: Option<ResampleInfo>,
    pub output: Option<PathBuf>,
}

#[derive(Debug)]
pub struct ResampleInfo {
    pub weight: String,
    pub group_by: Option<String>,
    pub seed: Option<u64>,
}
