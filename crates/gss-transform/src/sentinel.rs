//! Sentinel recode tables.
//!
//! A table maps a field name to the integer codes that mean "not
//! applicable", "don't know" or "no answer" for that field. Tables are
//! written in TOML:
//!
//! ```toml
//! [fields]
//! educ = [97, 98, 99]
//! realinc = [0]
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TransformError};

const GSS_SENTINELS: &str = include_str!("../data/gss_sentinels.toml");

/// Field name to sentinel codes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentinelTable {
    #[serde(default)]
    fields: BTreeMap<String, BTreeSet<i64>>,
}

impl SentinelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the embedded table for the cumulative GSS extract.
    pub fn gss_default() -> std::result::Result<Self, toml::de::Error> {
        Self::from_toml_str(GSS_SENTINELS)
    }

    pub fn from_toml_str(text: &str) -> std::result::Result<Self, toml::de::Error> {
        let table: Self = toml::from_str(text)?;
        Ok(table.normalized())
    }

    /// Load a table from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|source| TransformError::SentinelIo {
                path: path.to_path_buf(),
                source,
            })?;
        let table = Self::from_toml_str(&contents).map_err(|source| {
            TransformError::SentinelToml {
                path: path.to_path_buf(),
                source,
            }
        })?;
        debug!(path = %path.display(), fields = table.len(), "loaded sentinel table");
        Ok(table)
    }

    /// Add codes for a field, merging with any already present.
    pub fn insert<I>(&mut self, field: &str, codes: I)
    where
        I: IntoIterator<Item = i64>,
    {
        self.fields
            .entry(field.to_lowercase())
            .or_default()
            .extend(codes);
    }

    /// Union `other` into this table.
    pub fn merge(&mut self, other: &SentinelTable) {
        for (field, codes) in &other.fields {
            self.insert(field, codes.iter().copied());
        }
    }

    pub fn codes(&self, field: &str) -> Option<&BTreeSet<i64>> {
        self.fields.get(&field.to_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<i64>)> {
        self.fields
            .iter()
            .map(|(field, codes)| (field.as_str(), codes))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Lowercase keys, unioning fields that differ only in case.
    fn normalized(self) -> Self {
        let mut out = Self::new();
        for (field, codes) in self.fields {
            out.insert(&field, codes);
        }
        out
    }
}
