//! Raw table ingestion with format, encoding and delimiter auto-detection.
//!
//! Input is a single in-memory byte stream that may be a spreadsheet
//! (xls/xlsx/xlsb/ods) or delimited text. Parsing is an ordered strategy
//! list: the spreadsheet reader first, then — over a fresh cursor — the
//! delimited reader with detected encoding and delimiter. Only when both
//! strategies reject the input does parsing fail.
//!
//! No cleaning happens here beyond header trimming; cells come out exactly
//! as typed in the source.

use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use serde::{Deserialize, Serialize};

use crate::error::{ParseError, ParseResult};
use crate::models::{RawCell, RawTable};

/// Which parser strategy accepted the input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Spreadsheet,
    Delimited,
}

/// Result of parsing with source metadata.
#[derive(Debug, Clone)]
pub struct ParsedTable {
    /// The table, untyped and uncleaned.
    pub table: RawTable,
    /// Strategy that accepted the input.
    pub format: SourceFormat,
    /// Detected text encoding (delimited inputs only).
    pub encoding: Option<String>,
    /// Detected delimiter (delimited inputs only).
    pub delimiter: Option<char>,
}

/// Parse raw bytes, trying the spreadsheet reader then delimited text.
pub fn parse_bytes(bytes: &[u8]) -> ParseResult<ParsedTable> {
    if bytes.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let spreadsheet_err = match parse_spreadsheet(bytes) {
        Ok(table) => {
            return Ok(ParsedTable {
                table,
                format: SourceFormat::Spreadsheet,
                encoding: None,
                delimiter: None,
            })
        }
        Err(e) => e,
    };

    // Rewind: the delimited attempt starts over from the original bytes.
    match parse_delimited(bytes) {
        Ok((table, encoding, delimiter)) => Ok(ParsedTable {
            table,
            format: SourceFormat::Delimited,
            encoding: Some(encoding),
            delimiter: Some(delimiter),
        }),
        Err(delimited_err) => Err(ParseError::UnrecognizedFormat {
            spreadsheet: spreadsheet_err.to_string(),
            delimited: delimited_err.to_string(),
        }),
    }
}

/// Parse a file on disk.
pub fn parse_path<P: AsRef<Path>>(path: P) -> ParseResult<ParsedTable> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes(&bytes)
}

// =============================================================================
// Spreadsheet strategy
// =============================================================================

fn parse_spreadsheet(bytes: &[u8]) -> ParseResult<RawTable> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| ParseError::Spreadsheet(e.to_string()))?;

    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ParseError::Spreadsheet("workbook has no sheets".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| ParseError::Spreadsheet(e.to_string()))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or(ParseError::NoHeaders)?
        .iter()
        .map(header_text)
        .collect();

    let data = rows
        .map(|row| row.iter().map(raw_cell).collect())
        .collect();

    Ok(RawTable::new(headers, data))
}

/// Render a header cell as text. Date-typed headers become ISO text so the
/// date-inference strategy downstream can read them.
fn header_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Empty => String::new(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(s) => s.clone(),
        other => format!("{other}"),
    }
}

fn raw_cell(cell: &Data) -> RawCell {
    match cell {
        Data::Empty | Data::Error(_) => RawCell::Empty,
        Data::String(s) => RawCell::Text(s.clone()),
        Data::Int(i) => RawCell::Int(*i),
        Data::Float(f) => RawCell::Float(*f),
        Data::Bool(b) => RawCell::Text(b.to_string()),
        Data::DateTime(dt) => RawCell::Text(
            dt.as_datetime()
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        ),
        Data::DateTimeIso(s) | Data::DurationIso(s) => RawCell::Text(s.clone()),
    }
}

// =============================================================================
// Delimited strategy
// =============================================================================

/// Detect the encoding of raw bytes using chardet, normalized to the
/// charset names [`decode_content`] understands.
pub fn detect_encoding(bytes: &[u8]) -> String {
    let (charset, _, _) = chardet::detect(bytes);
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes to a string using the detected encoding.
pub fn decode_content(bytes: &[u8], encoding: &str) -> ParseResult<String> {
    match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => Ok(String::from_utf8(bytes.to_vec())
            .unwrap_or_else(|_| String::from_utf8_lossy(bytes).into_owned())),
        // encoding_rs follows WHATWG: latin-1 labels decode as windows-1252.
        "iso-8859-1" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            Ok(encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned())
        }
        _ => Ok(String::from_utf8_lossy(bytes).into_owned()),
    }
}

/// Detect the delimiter by counting candidates in the first line.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let candidates = [';', ',', '\t', '|'];
    let mut best = ';';
    let mut best_count = 0;

    for &sep in &candidates {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best = sep;
        }
    }

    best
}

fn parse_delimited(bytes: &[u8]) -> ParseResult<(RawTable, String, char)> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;

    if content.trim().is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let delimiter = detect_delimiter(&content);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ParseError::Delimited(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(ParseError::NoHeaders);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ParseError::Delimited(e.to_string()))?;
        if record.iter().all(|f| f.is_empty()) {
            continue;
        }
        rows.push(
            record
                .iter()
                .map(|f| {
                    if f.is_empty() {
                        RawCell::Empty
                    } else {
                        RawCell::Text(f.to_string())
                    }
                })
                .collect(),
        );
    }

    Ok((RawTable::new(headers, rows), encoding, delimiter))
}
