use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::{CsvWriter, DataFrame, SerWriter};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, info_span};

use gss_dct::{Compression, DecodeOptions, load_dataset_with_options, read_dictionary};
use gss_transform::{
    AbsentFieldPolicy, RecodeSummary, SentinelTable, ValueCount, apply_sentinel_table, resample,
    resample_grouped, value_counts,
};

use crate::cli::{DataArgs, LayoutArgs, LoadArgs, ResampleArgs, ValuesArgs};
use crate::summary::render_layout;
use crate::types::{DatasetSummary, ResampleInfo};

/// A decoded (and possibly recoded) extract.
pub struct LoadedData {
    pub frame: DataFrame,
    pub recode: Option<RecodeSummary>,
}

pub fn run_layout(args: &LayoutArgs) -> Result<String> {
    let layout = read_dictionary(&args.dictionary)
        .with_context(|| format!("read dictionary {}", args.dictionary.display()))?;
    render_layout(&layout, args.format)
}

pub fn run_load(args: &LoadArgs) -> Result<DatasetSummary> {
    let LoadedData { mut frame, recode } = load_data(&args.data)?;
    if let Some(path) = &args.output {
        write_csv(&mut frame, path)?;
    }
    Ok(DatasetSummary {
        source: args.data.data.clone(),
        rows: frame.height(),
        columns: frame.width(),
        recode,
        resample: None,
        output: args.output.clone(),
    })
}

pub fn run_values(args: &ValuesArgs) -> Result<Vec<ValueCount>> {
    let loaded = load_data(&args.data)?;
    value_counts(&loaded.frame, &args.field)
        .with_context(|| format!("count values of {}", args.field))
}

pub fn run_resample(args: &ResampleArgs) -> Result<DatasetSummary> {
    let LoadedData { frame, recode } = load_data(&args.data)?;
    let span = info_span!("resample", weight = %args.weight);
    let _guard = span.enter();

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut sample = match &args.group_by {
        Some(group_key) => resample_grouped(&frame, &args.weight, group_key, &mut rng)
            .with_context(|| format!("resample by {group_key}"))?,
        None => resample(&frame, &args.weight, &mut rng).context("resample")?,
    };
    info!(rows = sample.height(), "drew weighted sample");

    if let Some(path) = &args.output {
        write_csv(&mut sample, path)?;
    }
    Ok(DatasetSummary {
        source: args.data.data.clone(),
        rows: sample.height(),
        columns: sample.width(),
        recode,
        resample: Some(ResampleInfo {
            weight: args.weight.clone(),
            group_by: args.group_by.clone(),
            seed: args.seed,
        }),
        output: args.output.clone(),
    })
}

/// Decode the extract named by `args` and apply the requested recoding.
pub fn load_data(args: &DataArgs) -> Result<LoadedData> {
    let span = info_span!("load", data = %args.data.display());
    let _guard = span.enter();

    let options = decode_options(args);
    let mut frame = load_dataset_with_options(&args.dictionary, &args.data, &options)
        .with_context(|| format!("load {}", args.data.display()))?;

    let recode = match sentinel_table(args)? {
        Some(table) => Some(
            apply_sentinel_table(&mut frame, &table, AbsentFieldPolicy::Skip)
                .context("recode sentinel codes")?,
        ),
        None => None,
    };
    Ok(LoadedData { frame, recode })
}

pub fn decode_options(args: &DataArgs) -> DecodeOptions {
    let compression = if args.gzip {
        Compression::Gzip
    } else if args.no_gzip {
        Compression::None
    } else {
        Compression::Auto
    };
    DecodeOptions::default()
        .with_compression(compression)
        .with_coerce_types(args.typed)
}

fn sentinel_table(args: &DataArgs) -> Result<Option<SentinelTable>> {
    if let Some(path) = &args.sentinels {
        let table = SentinelTable::load(path)
            .with_context(|| format!("load sentinel table {}", path.display()))?;
        return Ok(Some(table));
    }
    if args.recode {
        let table = SentinelTable::gss_default().context("parse built-in sentinel table")?;
        return Ok(Some(table));
    }
    Ok(None)
}

fn write_csv(frame: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("create {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(frame)
        .with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), rows = frame.height(), "wrote csv");
    Ok(())
}
