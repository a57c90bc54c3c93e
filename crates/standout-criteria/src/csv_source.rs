//! CSV data source.
//!
//! [`CsvSource`] adapts a [`csv::Reader`] to [`TabularDataSource`]. Parsing
//! stays with the `csv` crate; this module only decides which rows are
//! records and how their fields are named.

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::record::Record;
use crate::source::TabularDataSource;
use crate::value::{Number, Value};

/// Options for reading CSV input.
///
/// # Example
///
/// ```
/// use standout_criteria::CsvOptions;
///
/// let options = CsvOptions::default().delimiter(b';').header_offset(0);
/// assert_eq!(options.header_offset, Some(0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    /// Field delimiter.
    pub delimiter: u8,
    /// Quote character.
    pub quote: u8,
    /// Row holding the column names. Rows before it are skipped.
    pub header_offset: Option<usize>,
    /// Accept rows with differing field counts.
    pub flexible: bool,
    /// Parse numeric-looking fields as numbers instead of strings.
    pub infer_numbers: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions {
            delimiter: b',',
            quote: b'"',
            header_offset: None,
            flexible: false,
            infer_numbers: false,
        }
    }
}

impl CsvOptions {
    /// Sets the field delimiter.
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets the quote character.
    pub fn quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self
    }

    /// Names columns after the row at `offset`.
    pub fn header_offset(mut self, offset: usize) -> Self {
        self.header_offset = Some(offset);
        self
    }

    /// Accepts rows with differing field counts.
    pub fn flexible(mut self, yes: bool) -> Self {
        self.flexible = yes;
        self
    }

    /// Parses numeric-looking fields as numbers.
    pub fn infer_numbers(mut self, yes: bool) -> Self {
        self.infer_numbers = yes;
        self
    }
}

/// Single-pass CSV record source.
///
/// # Example
///
/// ```
/// use standout_criteria::{CsvOptions, CsvSource, TabularDataSource, Value};
///
/// let data = "prenoms;annee\nAdam;2004\nEve;2005\n";
/// let mut source = CsvSource::from_reader(data.as_bytes(), &CsvOptions::default().delimiter(b';').header_offset(0));
///
/// let records: Vec<_> = source.records().collect::<Result<_, _>>().unwrap();
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[1].get("prenoms"), Some(&Value::from("Eve")));
/// ```
pub struct CsvSource<R> {
    reader: csv::Reader<R>,
    header_offset: Option<usize>,
    infer_numbers: bool,
    header: Option<Arc<[String]>>,
    position: usize,
}

impl<R: io::Read> CsvSource<R> {
    /// Reads CSV from any reader.
    pub fn from_reader(reader: R, options: &CsvOptions) -> Self {
        let reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .flexible(options.flexible)
            .has_headers(false)
            .from_reader(reader);
        CsvSource {
            reader,
            header_offset: options.header_offset,
            infer_numbers: options.infer_numbers,
            header: None,
            position: 0,
        }
    }

    /// Returns the column names, once the header row has been read.
    pub fn header(&self) -> Option<&[String]> {
        self.header.as_deref()
    }
}

impl CsvSource<File> {
    /// Opens a CSV file.
    pub fn from_path(path: impl AsRef<Path>, options: &CsvOptions) -> Result<Self> {
        let file = File::open(path)?;
        Ok(CsvSource::from_reader(file, options))
    }
}

impl<R: io::Read + Send> TabularDataSource for CsvSource<R> {
    fn records(&mut self) -> Box<dyn Iterator<Item = Result<Record>> + '_> {
        let header_offset = self.header_offset;
        let infer_numbers = self.infer_numbers;
        let header = &mut self.header;
        let position = &mut self.position;

        Box::new(self.reader.records().filter_map(move |row| {
            let row = match row {
                Ok(row) => row,
                Err(err) => return Some(Err(err.into())),
            };
            let offset = *position;
            *position += 1;

            match header_offset {
                Some(h) if offset < h => None,
                Some(h) if offset == h => {
                    *header = Some(row.iter().map(str::to_string).collect());
                    None
                }
                _ => {
                    let values = row.iter().map(|field| parse_field(field, infer_numbers));
                    Some(Ok(match header.as_ref() {
                        Some(names) => Record::with_header(Arc::clone(names), values),
                        None => Record::new(values),
                    }))
                }
            }
        }))
    }
}

fn parse_field(field: &str, infer_numbers: bool) -> Value {
    if infer_numbers {
        if let Ok(n) = field.parse::<i64>() {
            return Value::Number(Number::I64(n));
        }
        if let Ok(n) = field.parse::<f64>() {
            return Value::Number(Number::F64(n));
        }
    }
    Value::from(field)
}
