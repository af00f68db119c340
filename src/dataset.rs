//! Dataset descriptor extraction: turns raw uploaded text into row/column
//! and feature metadata.
//!
//! The extractor is deliberately permissive: uploads are arbitrary text
//! (nominally CSV or ARFF), no schema validation happens here, and empty
//! input yields an empty descriptor instead of an error. Field splitting is
//! a naive comma split; quoted fields are not recognised.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Sentinel target name used when the header cannot supply one.
pub const DEFAULT_TARGET: &str = "target";

/// Metadata describing an uploaded dataset: file facts plus table shape.
///
/// `extract` fills the shape fields; the file fields (`name`, `size_bytes`,
/// `format`) are stamped by whoever owns the upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetDescriptor {
    pub name: String,
    pub size_bytes: u64,
    /// Mime type when the upload carries one, otherwise the uppercased
    /// file extension.
    pub format: String,
    /// Non-blank lines minus the header, clamped at zero.
    pub row_count: usize,
    pub column_count: usize,
    /// All header fields except the last.
    pub feature_names: Vec<String>,
    /// Last header field, or [`DEFAULT_TARGET`] when the header has a single
    /// field or an empty trailing field.
    pub target_name: String,
}

/// Extracts table-shape metadata from raw uploaded text.
///
/// Blank and whitespace-only lines are discarded. Line 0 of what remains is
/// the header; every later line counts as one data row. Input with no
/// non-blank lines returns an all-empty descriptor.
pub fn extract(raw: &str) -> DatasetDescriptor {
    let lines: Vec<&str> = raw.lines().filter(|line| !line.trim().is_empty()).collect();

    let Some(header) = lines.first() else {
        debug!("upload has no non-blank lines, returning empty descriptor");
        return DatasetDescriptor::default();
    };

    let fields: Vec<&str> = header.split(',').collect();
    let column_count = fields.len();
    let feature_names: Vec<String> = fields[..column_count.saturating_sub(1)]
        .iter()
        .map(|field| (*field).to_string())
        .collect();
    let target_name = match fields.last() {
        Some(last) if column_count > 1 && !last.is_empty() => (*last).to_string(),
        _ => DEFAULT_TARGET.to_string(),
    };
    let row_count = lines.len().saturating_sub(1);

    debug!(
        rows = row_count,
        columns = column_count,
        target = %target_name,
        "Extracted dataset descriptor"
    );

    DatasetDescriptor {
        name: String::new(),
        size_bytes: 0,
        format: String::new(),
        row_count,
        column_count,
        feature_names,
        target_name,
    }
}

/// File format tag: the supplied mime type when present, otherwise the
/// uppercased extension of the file name.
pub fn format_of(name: &str, mime: Option<&str>) -> String {
    match mime {
        Some(mime) if !mime.is_empty() => mime.to_string(),
        _ => name
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_uppercase(),
    }
}
