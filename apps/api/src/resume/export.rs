//! Presentation helpers: text preview and the CSV / JSON downloads.

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::models::record::Record;

pub const PREVIEW_CHARS: usize = 500;
const TRUNCATION_MARKER: &str = "...";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV writer could not be flushed: {0}")]
    Flush(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn file_name(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "parsed_resume.csv",
            ExportFormat::Json => "parsed_resume.json",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Json => "application/json",
        }
    }

    pub fn render(&self, record: &Record) -> Result<Vec<u8>, ExportError> {
        match self {
            ExportFormat::Csv => to_csv(record),
            ExportFormat::Json => to_json(record),
        }
    }
}

/// First 500 characters of `text`, with `...` appended when it was cut.
pub fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}{TRUNCATION_MARKER}", &text[..cut]),
        None => text.to_string(),
    }
}

/// One header row of keys in record order, one data row; list values are
/// joined with `", "`.
pub fn to_csv(record: &Record) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(record.fields().map(|f| f.as_str()))?;
    writer.write_record(record.iter().map(|(_, v)| v.flatten()))?;

    writer
        .into_inner()
        .map_err(|e| ExportError::Flush(e.error().to_string()))
}

/// Pretty-printed JSON with 4-space indentation.
pub fn to_json(record: &Record) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    record.serialize(&mut serializer)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::{Field, FieldValue};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn full_record() -> Record {
        Record::new()
            .with(Field::Skills, "Python, SQL")
            .with(Field::Education, strings(&["B.Tech Computer Science", "MBA"]))
            .with(Field::Email, "jane@example.com")
            .with(Field::Phone, "9876543210")
            .with(Field::Name, "Jane Doe")
            .with(Field::Organizations, strings(&["Acme Corp", "Globex"]))
            .with(Field::Dates, Vec::<String>::new())
    }

    #[test]
    fn test_preview_short_text_unchanged() {
        assert_eq!(preview("Jane Doe"), "Jane Doe");
        assert_eq!(preview(""), "");
    }

    #[test]
    fn test_preview_exactly_limit_has_no_marker() {
        let text = "a".repeat(PREVIEW_CHARS);
        assert_eq!(preview(&text), text);
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let text = "é".repeat(PREVIEW_CHARS + 10);
        let p = preview(&text);
        assert!(p.ends_with("..."));
        assert_eq!(p.chars().count(), PREVIEW_CHARS + 3);
    }

    #[test]
    fn test_csv_two_columns() {
        let record = Record::new()
            .with(Field::Skills, "Python, SQL")
            .with(Field::Email, "a@b.com");
        let csv = String::from_utf8(to_csv(&record).unwrap()).unwrap();
        assert_eq!(csv, "Skills,Email\n\"Python, SQL\",a@b.com\n");

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), vec!["Skills", "Email"]);
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].iter().collect::<Vec<_>>(), vec!["Python, SQL", "a@b.com"]);
    }

    #[test]
    fn test_csv_flattens_lists() {
        let csv = String::from_utf8(to_csv(&full_record()).unwrap()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("Skills,Education,Email,Phone,Name,Organizations,Dates")
        );
        assert_eq!(
            lines.next(),
            Some("\"Python, SQL\",\"B.Tech Computer Science, MBA\",jane@example.com,9876543210,Jane Doe,\"Acme Corp, Globex\",")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_json_uses_four_space_indent() {
        let record = Record::new()
            .with(Field::Email, "a@b.com")
            .with(Field::Dates, strings(&["2020"]));
        let json = String::from_utf8(to_json(&record).unwrap()).unwrap();
        assert_eq!(
            json,
            "{\n    \"Email\": \"a@b.com\",\n    \"Dates\": [\n        \"2020\"\n    ]\n}"
        );
    }

    #[test]
    fn test_json_round_trip() {
        let record = full_record();
        let json = to_json(&record).unwrap();
        let back: Record = serde_json::from_slice(&json).unwrap();
        assert_eq!(back, record);
        assert_eq!(
            back.get(Field::Dates),
            Some(&FieldValue::List(Vec::new()))
        );
    }

    #[test]
    fn test_json_keeps_non_ascii() {
        let record = Record::new().with(Field::Name, "José Müller");
        let json = String::from_utf8(to_json(&record).unwrap()).unwrap();
        assert!(json.contains("José Müller"));
    }

    #[test]
    fn test_format_metadata() {
        assert_eq!(ExportFormat::Csv.file_name(), "parsed_resume.csv");
        assert_eq!(ExportFormat::Json.file_name(), "parsed_resume.json");
        let format: ExportFormat = serde_json::from_str(r#""csv""#).unwrap();
        assert_eq!(format, ExportFormat::Csv);
    }
}
