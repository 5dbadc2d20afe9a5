use crate::adapters::csv::delimiter::{self, DEFAULT_DELIMITERS};
use crate::domain::model::Row;
use crate::utils::error::{EtlError, Result};
use serde_json::Value;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Reads a whole delimited source into memory.
pub fn read_source(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|source| EtlError::from_open_error(path, source))?;

    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|source| EtlError::FileNotReadable {
            path: path.display().to_string(),
            source,
        })?;

    tracing::debug!("Read {} bytes from {}", content.len(), path.display());
    Ok(content)
}

/// Splits a `--fields` style list ("id, name" or "id;name") into trimmed names.
pub fn parse_field_list(raw: &str) -> Result<Vec<String>> {
    let delimiter = delimiter::detect(raw, &DEFAULT_DELIMITERS);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter as u8)
        .from_reader(raw.as_bytes());

    let mut fields = Vec::new();
    if let Some(record) = reader.records().next() {
        for field in record?.iter() {
            let field = field.trim();
            if !field.is_empty() {
                fields.push(field.to_string());
            }
        }
    }

    Ok(fields)
}

#[derive(Debug, Clone)]
pub struct CsvExtractor {
    delimiters: Vec<char>,
}

impl Default for CsvExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITERS.to_vec())
    }
}

impl CsvExtractor {
    pub fn new(delimiters: Vec<char>) -> Self {
        Self { delimiters }
    }

    pub fn detect_delimiter(&self, source: &str) -> char {
        delimiter::detect_in_source(source, &self.delimiters)
    }

    /// Returns the fields of the first physical row.
    pub fn extract_headers(&self, source: &str) -> Result<Vec<String>> {
        let delimiter = self.detect_delimiter(source);
        let section = data_section(source, delimiter)?;
        let mut reader = self.reader(section, delimiter)?;

        match reader.records().next() {
            Some(record) => Ok(record?.iter().map(str::to_string).collect()),
            None => Err(empty_source_error()),
        }
    }

    /// Keeps the requested fields the header actually defines, in request
    /// order. An empty request selects every header.
    pub fn select_fields(&self, headers: &[String], requested: &[String]) -> Vec<String> {
        if requested.is_empty() {
            return headers.to_vec();
        }

        let (known, unknown): (Vec<String>, Vec<String>) = requested
            .iter()
            .cloned()
            .partition(|field| headers.contains(field));

        if !unknown.is_empty() {
            tracing::warn!(
                "Ignoring fields missing from the CSV headers: {}",
                unknown.join(", ")
            );
        }

        known
    }

    /// Reads every data row after the header, keeping only `wanted` fields
    /// (`None` keeps them all).
    ///
    /// Values map to headers by position. Short rows simply lack their
    /// trailing fields and values past the last header are dropped. A blank
    /// line ends the data.
    pub fn extract_rows(&self, source: &str, wanted: Option<&[String]>) -> Result<Vec<Row>> {
        let delimiter = self.detect_delimiter(source);
        tracing::debug!("Using delimiter {:?}", delimiter);
        let section = data_section(source, delimiter)?;

        let mut records = self.reader(section, delimiter)?.into_records();

        let headers: Vec<String> = match records.next() {
            Some(record) => record?.iter().map(str::to_string).collect(),
            None => return Err(empty_source_error()),
        };

        let wanted: HashSet<&str> = match wanted {
            Some(fields) => fields.iter().map(String::as_str).collect(),
            None => headers.iter().map(String::as_str).collect(),
        };

        let mut rows = Vec::new();
        for record in records {
            let record = record?;
            let mut row = Row::new();

            for (header, value) in headers.iter().zip(record.iter()) {
                if wanted.contains(header.as_str()) {
                    row.insert(header.clone(), Value::String(value.to_string()));
                }
            }

            rows.push(row);
        }

        tracing::debug!("Extracted {} rows", rows.len());
        Ok(rows)
    }

    fn reader<'a>(&self, section: &'a str, delimiter: char) -> Result<csv::Reader<&'a [u8]>> {
        let delimiter = u8::try_from(delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| EtlError::CsvFileFormat {
                message: format!("Delimiter {:?} is not a single ASCII character", delimiter),
            })?;

        Ok(csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(section.as_bytes()))
    }
}

fn empty_source_error() -> EtlError {
    EtlError::CsvFileFormat {
        message: "We could not read the first line of the file as a CSV row, maybe the file is empty"
            .to_string(),
    }
}

/// Cuts `source` at the first blank physical line that sits outside a quoted
/// value. The first line must hold the headers.
///
/// Quotes are tracked like the `csv` reader does: a `"` only opens a quoted
/// value at the start of a field, `""` inside it is an escaped quote, and any
/// other `"` is plain text.
fn data_section(source: &str, delimiter: char) -> Result<&str> {
    let mut offset = 0;
    let mut in_quotes = false;

    for (index, line) in source.split_inclusive('\n').enumerate() {
        let content = line.trim_end_matches(['\n', '\r']);

        if content.is_empty() && !in_quotes {
            if index == 0 {
                return Err(empty_source_error());
            }
            return Ok(&source[..offset]);
        }

        in_quotes = scan_quotes(content, delimiter, in_quotes);
        offset += line.len();
    }

    if source.is_empty() {
        return Err(empty_source_error());
    }

    Ok(source)
}

/// Returns whether a quoted value is still open at the end of `line`.
fn scan_quotes(line: &str, delimiter: char, mut in_quotes: bool) -> bool {
    let mut at_field_start = !in_quotes;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            continue;
        }

        if c == '"' && at_field_start {
            in_quotes = true;
            at_field_start = false;
        } else {
            at_field_start = c == delimiter;
        }
    }

    in_quotes
}
