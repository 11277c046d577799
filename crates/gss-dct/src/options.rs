//! Decoder options.

/// Compression applied to a fixed-width data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// Plain text.
    #[default]
    None,
    /// gzip (single or multi-member).
    Gzip,
    /// gzip when the source starts with the gzip magic bytes, plain otherwise.
    Auto,
}

impl Compression {
    /// `true` → gzip, `false` → plain.
    pub fn from_flag(compressed: bool) -> Self {
        if compressed { Self::Gzip } else { Self::None }
    }
}

/// How to treat a field whose span runs past the end of a short line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PartialFieldPolicy {
    /// The field is missing (null) on that row.
    #[default]
    Missing,
    /// Keep whatever bytes of the field the line does hold.
    Truncate,
}

/// Options for decoding fixed-width records.
#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    pub compression: Compression,
    pub partial_fields: PartialFieldPolicy,
    /// Cast integer and real fields to `Int64` / `Float64` after decoding.
    pub coerce_types: bool,
}

impl DecodeOptions {
    #[must_use]
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    #[must_use]
    pub fn with_partial_fields(mut self, policy: PartialFieldPolicy) -> Self {
        self.partial_fields = policy;
        self
    }

    #[must_use]
    pub fn with_coerce_types(mut self, enable: bool) -> Self {
        self.coerce_types = enable;
        self
    }
}
