//! # Dataset Ingest
//!
//! Format detection and column-metadata extraction for uploaded reference
//! datasets. The service does not parse tabular data in full — that is the
//! workers' job — it only sniffs enough structure to answer "which columns
//! does this dataset have, and which category values appear in them".
//!
//! CSV and JSON (array-of-objects) are inspected natively. Excel and Parquet
//! uploads are recognized by extension but rejected: their binary layouts
//! need a real parser on the worker side.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Cap on distinct values remembered per column. Numeric columns would
/// otherwise make the metadata as large as the dataset itself.
const MAX_DISTINCT_VALUES: usize = 100;

/// Errors raised while inspecting an uploaded dataset.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Unsupported file format: {extension}: supported formats are CSV and JSON")]
    UnsupportedFormat { extension: String },

    #[error("Unrecognized file format: {filename}")]
    UnknownFormat { filename: String },

    #[error("Malformed dataset: {message}")]
    Malformed { message: String },

    #[error("Dataset is empty")]
    Empty,
}

impl DataError {
    fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}

/// Tabular formats the service recognizes by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Csv,
    Json,
    Excel,
    Parquet,
}

impl DataFormat {
    /// Detect the format from a filename's extension.
    pub fn from_filename(filename: &str) -> Result<Self, DataError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .ok_or_else(|| DataError::UnknownFormat {
                filename: filename.to_string(),
            })?;

        match extension.as_str() {
            "csv" => Ok(DataFormat::Csv),
            "json" => Ok(DataFormat::Json),
            "xls" | "xlsx" => Ok(DataFormat::Excel),
            "parquet" => Ok(DataFormat::Parquet),
            _ => Err(DataError::UnknownFormat {
                filename: filename.to_string(),
            }),
        }
    }

    /// Whether the service can extract metadata from this format itself.
    pub fn is_inspectable(&self) -> bool {
        matches!(self, DataFormat::Csv | DataFormat::Json)
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            DataFormat::Csv => "text/csv",
            DataFormat::Json => "application/json",
            DataFormat::Excel => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            DataFormat::Parquet => "application/vnd.apache.parquet",
        }
    }

    fn extension(&self) -> &'static str {
        match self {
            DataFormat::Csv => "csv",
            DataFormat::Json => "json",
            DataFormat::Excel => "xlsx",
            DataFormat::Parquet => "parquet",
        }
    }
}

/// Column structure sniffed from an uploaded dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetMetadata {
    /// Column names in dataset order.
    pub columns: Vec<String>,
    /// Distinct values per column, capped per column; columns that blow the
    /// cap are omitted.
    pub categories: BTreeMap<String, Vec<String>>,
}

/// Extract column metadata from raw upload bytes.
pub fn extract_metadata(format: DataFormat, bytes: &[u8]) -> Result<DatasetMetadata, DataError> {
    match format {
        DataFormat::Csv => extract_csv(bytes),
        DataFormat::Json => extract_json(bytes),
        other => Err(DataError::UnsupportedFormat {
            extension: other.extension().to_string(),
        }),
    }
}

/// Header-line sniff of a CSV upload. Values are split on plain commas;
/// quoted separators are the workers' concern, not this sniff's.
fn extract_csv(bytes: &[u8]) -> Result<DatasetMetadata, DataError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| DataError::malformed("CSV is not valid UTF-8"))?;
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());

    let header = lines.next().ok_or(DataError::Empty)?;
    let columns: Vec<String> = header
        .split(',')
        .map(|c| c.trim().trim_matches('"').to_string())
        .collect();
    if columns.iter().any(String::is_empty) {
        return Err(DataError::malformed("CSV header contains an empty column name"));
    }

    let mut distinct: Vec<BTreeSet<String>> = vec![BTreeSet::new(); columns.len()];
    for line in lines {
        for (i, value) in line.split(',').enumerate().take(columns.len()) {
            let set = &mut distinct[i];
            if set.len() <= MAX_DISTINCT_VALUES {
                set.insert(value.trim().trim_matches('"').to_string());
            }
        }
    }

    Ok(DatasetMetadata {
        categories: collect_categories(&columns, distinct),
        columns,
    })
}

/// Sniff of a JSON array-of-objects upload. Columns are the union of object
/// keys, ordered by first appearance.
fn extract_json(bytes: &[u8]) -> Result<DatasetMetadata, DataError> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| DataError::malformed(format!("invalid JSON: {e}")))?;
    let rows = value
        .as_array()
        .ok_or_else(|| DataError::malformed("expected a JSON array of records"))?;
    if rows.is_empty() {
        return Err(DataError::Empty);
    }

    let mut columns: Vec<String> = Vec::new();
    let mut distinct: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for row in rows {
        let object = row
            .as_object()
            .ok_or_else(|| DataError::malformed("expected every record to be a JSON object"))?;
        for (key, field) in object {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
            let set = distinct.entry(key.clone()).or_default();
            if set.len() <= MAX_DISTINCT_VALUES {
                set.insert(scalar_to_string(field));
            }
        }
    }

    let distinct_in_order: Vec<BTreeSet<String>> = columns
        .iter()
        .map(|c| distinct.remove(c).unwrap_or_default())
        .collect();

    Ok(DatasetMetadata {
        categories: collect_categories(&columns, distinct_in_order),
        columns,
    })
}

fn collect_categories(
    columns: &[String],
    distinct: Vec<BTreeSet<String>>,
) -> BTreeMap<String, Vec<String>> {
    columns
        .iter()
        .zip(distinct)
        .filter(|(_, set)| !set.is_empty() && set.len() <= MAX_DISTINCT_VALUES)
        .map(|(column, set)| (column.clone(), set.into_iter().collect()))
        .collect()
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_detection_by_extension() {
        assert_eq!(DataFormat::from_filename("adult.csv").unwrap(), DataFormat::Csv);
        assert_eq!(DataFormat::from_filename("data.JSON").unwrap(), DataFormat::Json);
        assert_eq!(DataFormat::from_filename("wb.xlsx").unwrap(), DataFormat::Excel);
        assert_eq!(DataFormat::from_filename("t.parquet").unwrap(), DataFormat::Parquet);
        assert!(DataFormat::from_filename("notes.txt").is_err());
        assert!(DataFormat::from_filename("no_extension").is_err());
    }

    #[test]
    fn test_csv_metadata() {
        let csv = b"age,workclass,income\n39,Private,<=50K\n50,Local-gov,>50K\n39,Private,<=50K\n";
        let meta = extract_metadata(DataFormat::Csv, csv).unwrap();

        assert_eq!(meta.columns, vec!["age", "workclass", "income"]);
        assert_eq!(meta.categories["workclass"], vec!["Local-gov", "Private"]);
        assert_eq!(meta.categories["income"], vec!["<=50K", ">50K"]);
        assert_eq!(meta.categories["age"], vec!["39", "50"]);
    }

    #[test]
    fn test_csv_quoted_header() {
        let csv = b"\"hours-per-week\",\"native-country\"\n40,United-States\n";
        let meta = extract_metadata(DataFormat::Csv, csv).unwrap();
        assert_eq!(meta.columns, vec!["hours-per-week", "native-country"]);
    }

    #[test]
    fn test_empty_csv_rejected() {
        assert!(matches!(
            extract_metadata(DataFormat::Csv, b"").unwrap_err(),
            DataError::Empty
        ));
    }

    #[test]
    fn test_json_metadata() {
        let json = br#"[
            {"age": 39, "workclass": "Private"},
            {"age": 50, "workclass": "Local-gov", "income": ">50K"}
        ]"#;
        let meta = extract_metadata(DataFormat::Json, json).unwrap();

        assert_eq!(meta.columns, vec!["age", "workclass", "income"]);
        assert_eq!(meta.categories["workclass"], vec!["Local-gov", "Private"]);
        assert_eq!(meta.categories["income"], vec![">50K"]);
    }

    #[test]
    fn test_json_must_be_array_of_objects() {
        assert!(extract_metadata(DataFormat::Json, br#"{"age": 39}"#).is_err());
        assert!(extract_metadata(DataFormat::Json, br#"[1, 2, 3]"#).is_err());
        assert!(matches!(
            extract_metadata(DataFormat::Json, b"[]").unwrap_err(),
            DataError::Empty
        ));
    }

    #[test]
    fn test_binary_formats_are_rejected() {
        let err = extract_metadata(DataFormat::Excel, b"PK...").unwrap_err();
        assert!(matches!(err, DataError::UnsupportedFormat { .. }));
        assert!(!DataFormat::Parquet.is_inspectable());
    }

    #[test]
    fn test_high_cardinality_columns_dropped_from_categories() {
        let mut csv = String::from("id\n");
        for i in 0..200 {
            csv.push_str(&format!("{i}\n"));
        }
        let meta = extract_metadata(DataFormat::Csv, csv.as_bytes()).unwrap();
        assert_eq!(meta.columns, vec!["id"]);
        assert!(meta.categories.is_empty());
    }
}
