use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::config::DEFAULT_MARKER;
use crate::error::{Result, SiftError};
use crate::record::{FieldCatalog, Record};

/// `key=value` or `key="quoted value"`
static PAIR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\b(\w+)=("[^"]*"|\S+)"#).expect("valid pair pattern"));

/// Records of one loaded file together with its field vocabulary
#[derive(Debug, Clone, Default)]
pub struct ParsedLog {
    pub records: Vec<Record>,
    pub catalog: FieldCatalog,
}

/// Splits lines at the payload marker and extracts key=value pairs from the payload
#[derive(Debug, Clone)]
pub struct RecordParser {
    marker: String,
}

impl Default for RecordParser {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER)
    }
}

impl RecordParser {
    pub fn new(marker: &str) -> Self {
        RecordParser {
            marker: marker.to_string(),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Split a line into (prefix, payload). The payload keeps the marker itself.
    pub fn split_line<'a>(&self, line: &'a str) -> (&'a str, &'a str) {
        if self.marker.is_empty() {
            return (line.trim(), "");
        }
        match line.find(&self.marker) {
            Some(pos) => (line[..pos].trim(), line[pos..].trim()),
            None => (line.trim(), ""),
        }
    }

    /// Extract pairs left to right; a repeated key keeps its first position
    /// but takes the last value.
    pub fn parse_pairs(&self, payload: &str) -> IndexMap<String, String> {
        let mut fields = IndexMap::new();
        for caps in PAIR_PATTERN.captures_iter(payload) {
            let key = caps[1].to_string();
            let raw = &caps[2];
            let value = if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
                &raw[1..raw.len() - 1]
            } else {
                raw
            };
            fields.insert(key, value.to_string());
        }
        fields
    }

    pub fn parse_line(&self, sequence_index: usize, line: &str) -> Record {
        let (prefix, payload) = self.split_line(line);
        let fields = if payload.is_empty() {
            IndexMap::new()
        } else {
            self.parse_pairs(payload)
        };
        Record::new(prefix.to_string(), fields, sequence_index)
    }

    /// Parse every line; never fails, malformed lines become prefix-only records
    pub fn parse_lines<I, S>(&self, lines: I) -> ParsedLog
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parsed = ParsedLog::default();
        for (index, line) in lines.into_iter().enumerate() {
            let record = self.parse_line(index, line.as_ref());
            for key in record.fields.keys() {
                parsed.catalog.insert(key);
            }
            parsed.records.push(record);
        }
        tracing::debug!(
            records = parsed.records.len(),
            fields = parsed.catalog.len(),
            "parsed log"
        );
        parsed
    }

    /// Read all lines from a reader. Invalid UTF-8 is replaced rather than rejected.
    pub fn parse_reader<R: BufRead>(&self, mut reader: R) -> std::io::Result<ParsedLog> {
        let mut lines = Vec::new();
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            lines.push(String::from_utf8_lossy(&buf).into_owned());
        }
        Ok(self.parse_lines(lines))
    }

    pub fn load_file(&self, path: &Path) -> Result<ParsedLog> {
        let to_input_error = |source| SiftError::Input {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(to_input_error)?;
        self.parse_reader(BufReader::new(file))
            .map_err(to_input_error)
    }
}
