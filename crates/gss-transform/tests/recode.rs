use std::fs;

use gss_transform::{
    AbsentFieldPolicy, SentinelTable, TransformError, apply_sentinel_table, fill_missing,
    recode_missing,
};
use polars::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn sample_frame() -> DataFrame {
    df!(
        "educ" => [Some("12"), Some("98"), Some("99"), None, Some("16")],
        "age" => [Some(23i64), Some(0), Some(98), Some(89), None],
        "realinc" => [0.0f64, 25_926.0, 0.0, 13_500.0, 41_000.0],
    )
    .unwrap()
}

#[test]
fn recode_counts_and_nulls_matches() {
    let mut df = sample_frame();
    let replaced = recode_missing(&mut df, "educ", &[97, 98, 99]).expect("recode");
    assert_eq!(replaced, 2);
    let educ = df.column("educ").unwrap();
    assert_eq!(educ.null_count(), 3);
    assert_eq!(educ.dtype(), &DataType::String);
    assert_eq!(educ.get(0).unwrap(), AnyValue::String("12"));
}

#[test]
fn recode_is_idempotent() {
    let mut df = sample_frame();
    recode_missing(&mut df, "age", &[0, 98, 99]).unwrap();
    let once = df.clone();
    assert_eq!(recode_missing(&mut df, "age", &[0, 98, 99]).unwrap(), 0);
    assert!(df.equals_missing(&once));
}

#[test]
fn recode_with_no_sentinels_changes_nothing() {
    let mut df = sample_frame();
    let before = df.clone();
    assert_eq!(recode_missing(&mut df, "realinc", &[]).unwrap(), 0);
    assert!(df.equals_missing(&before));
}

#[test]
fn sentinel_table_applies_every_field() {
    let mut df = sample_frame();
    let mut table = SentinelTable::new();
    table.insert("educ", [97, 98, 99]);
    table.insert("realinc", [0]);
    let summary = apply_sentinel_table(&mut df, &table, AbsentFieldPolicy::Error).unwrap();
    assert_eq!(summary.replaced.get("educ"), Some(&2));
    assert_eq!(summary.replaced.get("realinc"), Some(&2));
    assert_eq!(summary.total_replaced(), 4);
    assert!(summary.skipped.is_empty());
}

#[test]
fn absent_fields_fail_or_skip() {
    let mut df = sample_frame();
    let before = df.clone();
    let mut table = SentinelTable::new();
    table.insert("educ", [98]);
    table.insert("partyid", [8, 9]);

    let err = apply_sentinel_table(&mut df, &table, AbsentFieldPolicy::Error).unwrap_err();
    assert!(matches!(err, TransformError::UnknownField { ref name } if name == "partyid"));
    assert!(df.equals_missing(&before));

    let summary = apply_sentinel_table(&mut df, &table, AbsentFieldPolicy::Skip).unwrap();
    assert_eq!(summary.skipped, vec!["partyid".to_string()]);
    assert_eq!(summary.replaced.get("educ"), Some(&1));
}

#[test]
fn gss_table_recodes_a_decoded_extract() {
    let mut df = sample_frame();
    let table = SentinelTable::gss_default().expect("built-in table");
    let summary = apply_sentinel_table(&mut df, &table, AbsentFieldPolicy::Skip).unwrap();
    assert_eq!(summary.replaced.get("educ"), Some(&2));
    assert_eq!(summary.replaced.get("age"), Some(&2));
    assert_eq!(summary.replaced.get("realinc"), Some(&2));
    assert!(summary.skipped.contains(&"cohort".to_string()));
}

#[test]
fn loads_sentinel_table_from_toml() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("sentinels.toml");
    fs::write(&path, "[fields]\nage = [0, 98, 99]\nrealinc = [0]\n").unwrap();
    let table = SentinelTable::load(&path).expect("load table");
    assert_eq!(table.len(), 2);

    let broken = dir.path().join("broken.toml");
    fs::write(&broken, "[fields]\nage = \"ninety-eight\"\n").unwrap();
    assert!(matches!(
        SentinelTable::load(&broken),
        Err(TransformError::SentinelToml { .. })
    ));
    assert!(matches!(
        SentinelTable::load(&dir.path().join("absent.toml")),
        Err(TransformError::SentinelIo { .. })
    ));
}

#[test]
fn fill_missing_returns_number_filled() {
    let mut df = sample_frame();
    // Two sentinels plus one null already present.
    let mut rng = StdRng::seed_from_u64(17);
    let filled = fill_missing(&mut df, "educ", &[97, 98, 99], &mut rng).unwrap();
    assert_eq!(filled, 3);
    let educ = df.column("educ").unwrap();
    assert_eq!(educ.null_count(), 0);
    for row in 0..educ.len() {
        let value = educ.get(row).unwrap();
        assert!(matches!(value, AnyValue::String("12") | AnyValue::String("16")));
    }
}

#[test]
fn fill_missing_then_nothing_left() {
    let mut df = sample_frame();
    let mut rng = StdRng::seed_from_u64(17);
    fill_missing(&mut df, "age", &[0, 98, 99], &mut rng).unwrap();
    assert_eq!(fill_missing(&mut df, "age", &[0, 98, 99], &mut rng).unwrap(), 0);
}
