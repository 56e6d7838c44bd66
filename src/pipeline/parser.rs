use std::collections::HashMap;

use csv::ReaderBuilder;
use tracing::{debug, warn};

use crate::error::Result;

/// A single row of a delimited source file, keyed by normalized header name.
///
/// Header names are trimmed and internal runs of whitespace collapsed to a
/// single space before being used as keys, so `" Country  with data from "`
/// and `"Country with data from"` address the same field.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    fields: HashMap<String, String>,
}

impl RawRecord {
    pub fn new(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }

    /// Raw value of a field, if the header exists in this dataset.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Raw value of a field, with absent headers reading as empty.
    pub fn get_or_empty(&self, field: &str) -> &str {
        self.get(field).unwrap_or("")
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

/// Collapses irregular whitespace in a header name.
pub fn normalize_header(header: &str) -> String {
    header.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parses raw CSV text with a header row into an ordered sequence of records.
///
/// Tolerates ragged rows (missing trailing fields read as empty strings) and
/// skips blank lines and rows that fail to parse. An absent or empty header
/// row yields an empty sequence rather than an error.
pub fn parse_csv(text: &str) -> Result<Vec<RawRecord>> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = match reader.headers() {
        Ok(headers) => headers.iter().map(normalize_header).collect(),
        Err(e) => {
            warn!("Failed to read CSV header row: {}", e);
            return Ok(Vec::new());
        }
    };

    if headers.iter().all(|h| h.is_empty()) {
        debug!("CSV header row absent or empty; yielding no records");
        return Ok(Vec::new());
    }

    let mut out = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                // Malformed rows are dropped; no partial-row data propagates
                warn!("Dropping malformed CSV row {}: {}", index + 1, e);
                continue;
            }
        };

        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let fields = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.clone(), record.get(i).unwrap_or("").to_string()))
            .collect();
        out.push(RawRecord::new(fields));
    }

    debug!("Parsed {} records from CSV text", out.len());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_rows_in_order() {
        let records = parse_csv("Country,Year\nChad,2020\nNiger,2021\n").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("Country"), Some("Chad"));
        assert_eq!(records[1].get("Country"), Some("Niger"));
    }

    #[test]
    fn test_header_whitespace_is_collapsed() {
        let records = parse_csv(" Country  with data from ,Score\nChad,42\n").unwrap();
        assert_eq!(records[0].get("Country with data from"), Some("Chad"));
    }

    #[test]
    fn test_ragged_row_pads_with_empty_strings() {
        let records = parse_csv("a,b,c\n1,2\n").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("b"), Some("2"));
        assert_eq!(records[0].get("c"), Some(""));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let records = parse_csv("a,b\n1,2\n\n,\n3,4\n\n").unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_empty_input_yields_no_records() {
        assert!(parse_csv("").unwrap().is_empty());
        assert!(parse_csv("\n\n").unwrap().is_empty());
    }

    #[test]
    fn test_absent_field_reads_as_empty() {
        let records = parse_csv("a\n1\n").unwrap();
        assert_eq!(records[0].get("missing"), None);
        assert_eq!(records[0].get_or_empty("missing"), "");
    }
}
