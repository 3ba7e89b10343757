use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::common::error::{HarvestError, Result};
use crate::common::types::{FieldSpec, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "csv" => Some(OutputFormat::Csv),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Project a record onto the schema: schema order, sentinel for missing fields
fn project(record: &Record, schema: &[FieldSpec]) -> Record {
    schema
        .iter()
        .map(|spec| {
            let value = record
                .get(&spec.name)
                .cloned()
                .unwrap_or_else(|| spec.field_type.sentinel());
            (spec.name.clone(), value)
        })
        .collect()
}

fn render_csv(records: &[Record], schema: &[FieldSpec]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(schema.iter().map(|spec| spec.name.as_str()))?;
    for record in records {
        let row = project(record, schema);
        writer.write_record(row.fields().map(|(_, value)| value.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| HarvestError::Io(e.into_error()))
}

fn render_json(records: &[Record], schema: &[FieldSpec]) -> Result<Vec<u8>> {
    let rows: Vec<Record> = records.iter().map(|r| project(r, schema)).collect();
    let mut bytes = serde_json::to_vec_pretty(&rows)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Serialize records in memory. Output depends only on its inputs.
pub fn render(records: &[Record], schema: &[FieldSpec], format: OutputFormat) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Csv => render_csv(records, schema),
        OutputFormat::Json => render_json(records, schema),
    }
}

/// Serialize and write in one pass, creating the destination directory if needed
#[instrument(skip(records, schema))]
pub fn write(
    records: &[Record],
    schema: &[FieldSpec],
    destination: &Path,
    format: OutputFormat,
) -> Result<PathBuf> {
    let payload = render(records, schema, format)?;

    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| HarvestError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(destination, &payload).map_err(|source| HarvestError::Write {
        path: destination.to_path_buf(),
        source,
    })?;

    info!(
        "Wrote {} record(s), {} bytes to {}",
        records.len(),
        payload.len(),
        destination.display()
    );
    Ok(destination.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::{FieldType, FieldValue};

    fn schema() -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("First Name", FieldType::String, "first_name", &["small.author"]),
            FieldSpec::new("Last Name", FieldType::String, "last_name", &["small.author"]),
            FieldSpec::new("Score", FieldType::Float, "decimal", &[".score"]),
            FieldSpec::new("Active", FieldType::Bool, "in_stock", &[".status"]),
        ]
    }

    fn leads() -> Vec<Record> {
        vec![
            vec![
                ("Last Name", FieldValue::from("Brontë")),
                ("First Name", FieldValue::from("Charlotte")),
                ("Score", FieldValue::Float(12.5)),
                ("Active", FieldValue::Bool(true)),
            ]
            .into_iter()
            .collect(),
            vec![
                ("First Name", FieldValue::from("Dr. Seuss, \"Ted\"")),
                ("Last Name", FieldValue::from("")),
            ]
            .into_iter()
            .collect(),
        ]
    }

    #[test]
    fn test_csv_header_and_rows_follow_schema() {
        let bytes = render(&leads(), &schema(), OutputFormat::Csv).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            "First Name,Last Name,Score,Active\n\
             Charlotte,Brontë,12.5,true\n\
             \"Dr. Seuss, \"\"Ted\"\"\",,0,false\n"
        );
    }

    #[test]
    fn test_json_is_ordered_and_keeps_unicode() {
        let bytes = render(&leads(), &schema(), OutputFormat::Json).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.contains("Brontë"));
        let first = text.find("\"First Name\"").unwrap();
        let last = text.find("\"Last Name\"").unwrap();
        assert!(first < last);

        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed[0]["Score"], serde_json::json!(12.5));
        assert_eq!(parsed[0]["Active"], serde_json::json!(true));
        assert_eq!(parsed[1]["Score"], serde_json::json!(0.0));
    }

    #[test]
    fn test_empty_batch() {
        let csv = render(&[], &schema(), OutputFormat::Csv).unwrap();
        assert_eq!(csv, b"First Name,Last Name,Score,Active\n");
        let json = render(&[], &schema(), OutputFormat::Json).unwrap();
        assert_eq!(json, b"[]\n");
    }

    #[test]
    fn test_write_creates_directory_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs").join("crm").join("results.csv");

        write(&leads(), &schema(), &path, OutputFormat::Csv).unwrap();
        let first = fs::read(&path).unwrap();
        write(&leads(), &schema(), &path, OutputFormat::Csv).unwrap();
        let second = fs::read(&path).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unwritable_destination_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();

        let result = write(&leads(), &schema(), &blocker.join("out.json"), OutputFormat::Json);
        assert!(matches!(result, Err(HarvestError::Write { .. })));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("a/b.CSV")), Some(OutputFormat::Csv));
        assert_eq!(OutputFormat::from_path(Path::new("b.json")), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_path(Path::new("b")), None);
    }
}
