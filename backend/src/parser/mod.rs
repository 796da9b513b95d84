//! Employee CSV parser with encoding auto-detection.
//!
//! Splits raw text into rows with standard CSV quoting rules, maps recognized
//! columns through [`crate::validation::validate_row`] and collects
//! [`ParseError`]s instead of failing on bad rows.
//!
//! Row numbers count the header as row 1, so the first data row is row 2.
//! Rows are counted as CSV records: blank lines are skipped and not
//! counted, and a quoted field spanning several lines is still one row.

use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::models::{ParseError, ParseOutcome};
use crate::validation::{validate_row, RawRow, RECOGNIZED_FIELDS};

/// Limits on how many errors a single parse may report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Field violations kept per data row.
    pub max_errors_per_row: usize,
    /// Tokenizer-level errors kept per file.
    pub max_structural_errors: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_errors_per_row: 3,
            max_structural_errors: 10,
        }
    }
}

/// Result of parsing with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Valid records and collected errors
    pub outcome: ParseOutcome,
    /// Detected or used encoding
    pub encoding: String,
    /// Column headers as found in the file
    pub headers: Vec<String>,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to a string using the specified encoding.
///
/// Unknown encodings and invalid UTF-8 fall back to lossy UTF-8.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    match encoding.to_lowercase().as_str() {
        "iso-8859-1" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned()
        }
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// Parse employee CSV text with the default error limits.
///
/// # Example
/// ```ignore
/// use paygap::parse_employees;
///
/// let csv = "employeeCode,gender\nE1,invalid";
/// let outcome = parse_employees(csv);
/// assert!(outcome.records.is_empty());
/// ```
pub fn parse_employees(text: &str) -> ParseOutcome {
    parse_employees_with(text, &ParseOptions::default())
}

/// Parse employee CSV text with explicit error limits.
pub fn parse_employees_with(text: &str, options: &ParseOptions) -> ParseOutcome {
    parse_text(text, options).0
}

/// Parse CSV bytes with encoding auto-detection.
///
/// Valid UTF-8 is used as is; chardet only runs on other bytes.
pub fn parse_bytes_auto(bytes: &[u8], options: &ParseOptions) -> ParseResult {
    let (content, encoding) = match std::str::from_utf8(bytes) {
        Ok(text) => (text.to_string(), "utf-8".to_string()),
        Err(_) => {
            let encoding = detect_encoding(bytes);
            (decode_content(bytes, &encoding), encoding)
        }
    };
    let (outcome, headers) = parse_text(&content, options);

    ParseResult {
        outcome,
        encoding,
        headers,
    }
}

/// Read and parse a CSV file with encoding auto-detection.
pub fn parse_file_auto<P: AsRef<Path>>(path: P, options: &ParseOptions) -> CsvResult<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    if bytes.is_empty() {
        return Err(CsvError::EmptyFile);
    }
    Ok(parse_bytes_auto(&bytes, options))
}

fn parse_text(text: &str, options: &ParseOptions) -> (ParseOutcome, Vec<String>) {
    let mut outcome = ParseOutcome::default();
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    if text.trim().is_empty() {
        outcome.errors.push(ParseError::new(1, "CSV file is empty"));
        return (outcome, Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = match reader.headers() {
        Ok(record) => record.iter().map(|h| h.trim().to_string()).collect(),
        Err(err) => {
            outcome.errors.push(structural_error(&err));
            return (outcome, Vec::new());
        }
    };

    let columns: Vec<Option<&'static str>> = headers.iter().map(|h| recognize(h)).collect();
    let mut structural = StructuralErrors::new(options.max_structural_errors);
    let mut last_record: Option<(usize, usize)> = None;

    for (index, result) in reader.records().enumerate() {
        let row = index + 2;

        let record = match result {
            Ok(record) => record,
            Err(err) => {
                structural.push(&mut outcome.errors, structural_error(&err));
                continue;
            }
        };

        if let Some(position) = record.position() {
            last_record = Some((row, position.byte() as usize));
        }

        if record.len() != headers.len() {
            structural.push(
                &mut outcome.errors,
                ParseError::new(
                    row,
                    format!("Expected {} fields but found {}", headers.len(), record.len()),
                ),
            );
        }

        let raw: RawRow = columns
            .iter()
            .zip(record.iter())
            .filter_map(|(column, value)| column.map(|name| (name, value)))
            .collect();

        match validate_row(&raw) {
            Ok(employee) => outcome.records.push(employee),
            Err(violations) => outcome.errors.extend(
                violations
                    .into_iter()
                    .take(options.max_errors_per_row)
                    .map(|v| v.into_parse_error(row)),
            ),
        }
    }

    // An open quote swallows everything up to EOF into the last record.
    if let Some((row, start)) = last_record {
        if text.get(start..).is_some_and(has_unterminated_quote) {
            structural.push(
                &mut outcome.errors,
                ParseError::new(row, "Invalid CSV format: unterminated quote"),
            );
        }
    }

    (outcome, headers)
}

fn recognize(header: &str) -> Option<&'static str> {
    RECOGNIZED_FIELDS.iter().copied().find(|field| *field == header)
}

/// True when `raw` ends inside a quoted field.
fn has_unterminated_quote(raw: &str) -> bool {
    let mut in_quotes = false;
    let mut field_start = true;
    let mut chars = raw.chars().peekable();

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

        match c {
            '"' if field_start => {
                in_quotes = true;
                field_start = false;
            }
            ',' | '\n' | '\r' => field_start = true,
            _ => field_start = false,
        }
    }

    in_quotes
}

/// Tokenizer error tagged with its record index (header = 0) plus one.
fn structural_error(err: &csv::Error) -> ParseError {
    let row = err.position().map(|p| p.record() as usize + 1).unwrap_or(1);
    ParseError::new(row, format!("Invalid CSV format: {}", err))
}

/// Counter enforcing the per-file cap on structural errors.
struct StructuralErrors {
    limit: usize,
    seen: usize,
}

impl StructuralErrors {
    fn new(limit: usize) -> Self {
        Self { limit, seen: 0 }
    }

    fn push(&mut self, errors: &mut Vec<ParseError>, error: ParseError) {
        if self.seen < self.limit {
            errors.push(error);
        }
        self.seen += 1;
    }
}
