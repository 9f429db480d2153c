//! Reading loosely structured spreadsheet exports.
//!
//! The header line decides which column is mapped onto which
//! [`AddressField`]. Headers are matched case-insensitively
//! against a table of aliases, unknown columns are passed through.

use crate::error::{ImportError, ParseError};
use doorlist_core::{text::collapse_whitespace, usecases::{AddressField, RawRow}};
use std::collections::HashMap;
use strum::IntoEnumIterator;

/// Delimiters that are recognized automatically, by priority.
pub const DELIMITER_CANDIDATES: [u8; 4] = [b';', b',', b'\t', b'|'];

/// Count the candidates within the header line, quoted names excluded.
///
/// The most frequent candidate wins, ties are resolved by
/// the order of [`DELIMITER_CANDIDATES`].
pub fn detect_delimiter(header_line: &str) -> u8 {
    let mut counts = [0usize; DELIMITER_CANDIDATES.len()];
    let mut quoted = false;
    for b in header_line.bytes() {
        if b == b'"' {
            quoted = !quoted;
            continue;
        }
        if quoted {
            continue;
        }
        if let Some(i) = DELIMITER_CANDIDATES.iter().position(|c| *c == b) {
            counts[i] += 1;
        }
    }
    let mut best = (DELIMITER_CANDIDATES[0], 0);
    for (candidate, count) in DELIMITER_CANDIDATES.into_iter().zip(counts) {
        if count > best.1 {
            best = (candidate, count);
        }
    }
    best.0
}

/// Maps header names onto logical fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderAliases(HashMap<String, AddressField>);

#[rustfmt::skip]
const DEFAULT_ALIASES: &[(AddressField, &[&str])] = &[
    (AddressField::Street,       &["straße", "strasse", "str", "street", "streetname"]),
    (AddressField::HouseNumber,  &["hausnummer", "hausnr", "hnr", "nr", "number", "housenumber", "housenr", "no"]),
    (AddressField::PostalCode,   &["plz", "postleitzahl", "postalcode", "postcode", "zip", "zipcode"]),
    (AddressField::City,         &["ort", "stadt", "gemeinde", "city", "town"]),
    (AddressField::Locality,     &["ortsteil", "stadtteil", "bezirk", "locality", "district"]),
    (AddressField::Latitude,     &["lat", "breitengrad", "breite", "latitude"]),
    (AddressField::Longitude,    &["lng", "lon", "längengrad", "laengengrad", "länge", "longitude"]),
    (AddressField::WeCount,      &["we", "anzahlwe", "weanzahl", "wohneinheiten", "units", "unitcount", "wecount"]),
    (AddressField::Etage,        &["etage", "stockwerk", "geschoss", "floor"]),
    (AddressField::Lage,         &["lage", "position", "side"]),
    (AddressField::NotizAdresse, &["notiz", "notizadresse", "adressnotiz", "note", "addressnote"]),
    (AddressField::NotizWe,      &["notizwe", "wenotiz", "unitnote"]),
    (AddressField::Status,       &["status", "zustand"]),
];

impl Default for HeaderAliases {
    fn default() -> Self {
        let mut aliases = Self::empty();
        for field in AddressField::iter() {
            let name: &'static str = field.into();
            aliases.insert(field, name);
        }
        for (field, names) in DEFAULT_ALIASES {
            for name in *names {
                aliases.insert(*field, name);
            }
        }
        aliases
    }
}

impl HeaderAliases {
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// An existing alias is reassigned.
    pub fn insert(&mut self, field: AddressField, alias: &str) {
        self.0.insert(canonical_header(alias), field);
    }

    pub fn with<'a>(mut self, field: AddressField, aliases: impl IntoIterator<Item = &'a str>) -> Self {
        for alias in aliases {
            self.insert(field, alias);
        }
        self
    }

    pub fn resolve(&self, header: &str) -> Option<AddressField> {
        self.0.get(&canonical_header(header)).copied()
    }
}

// "WE-Anzahl", "we_anzahl" and "WE Anzahl" are the same header.
fn canonical_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| !(c.is_whitespace() || matches!(c, '_' | '-' | '.')))
        .flat_map(char::to_lowercase)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Column {
    Field(AddressField),
    Extra(String),
}

/// A lazy, single-pass iterator over the data rows of a CSV text.
///
/// Rows with a different number of columns than the header
/// are reported as [`ParseError`] and iteration continues.
pub struct RowReader<'a> {
    records: ::csv::StringRecordsIntoIter<&'a [u8]>,
    columns: Vec<Column>,
    // Blank lines in front of the header
    line_offset: u64,
}

impl std::fmt::Debug for RowReader<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowReader")
            .field("columns", &self.columns)
            .finish_non_exhaustive()
    }
}

impl<'a> RowReader<'a> {
    /// Read and map the header line.
    ///
    /// The delimiter is detected from the header if not given.
    pub fn new(
        text: &'a str,
        delimiter: Option<u8>,
        aliases: &HeaderAliases,
    ) -> Result<Self, ImportError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut header_start = 0;
        let mut line_offset = 0;
        for line in text.split_inclusive('\n') {
            if !line.trim().is_empty() {
                break;
            }
            header_start += line.len();
            line_offset += 1;
        }
        let text = &text[header_start..];
        let Some(header_line) = text.lines().next() else {
            return Err(ImportError::EmptyInput);
        };
        let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(header_line));
        log::debug!("Reading CSV with delimiter '{}'", char::from(delimiter).escape_default());

        let mut reader = ::csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());
        let headers = reader.headers()?.clone();

        let mut columns = Vec::with_capacity(headers.len());
        for header in headers.iter() {
            let header = collapse_whitespace(header);
            let column = match aliases.resolve(&header) {
                Some(field) if columns.contains(&Column::Field(field)) => {
                    log::warn!("Column '{header}' is mapped onto {field} twice, keeping it as extra column");
                    Column::Extra(header)
                }
                Some(field) => Column::Field(field),
                None => Column::Extra(header),
            };
            columns.push(column);
        }
        if !columns.iter().any(|c| matches!(c, Column::Field(_))) {
            let headers = headers.iter().map(str::to_owned).collect();
            return Err(ImportError::NoKnownColumns(headers));
        }
        Ok(Self {
            records: reader.into_records(),
            columns,
            line_offset,
        })
    }

    fn to_raw_row(&self, line: u64, record: &::csv::StringRecord) -> RawRow {
        let mut row = RawRow::new(line);
        for (column, value) in self.columns.iter().zip(record.iter()) {
            match column {
                Column::Field(field) => {
                    row.values.insert(*field, value.to_owned());
                }
                Column::Extra(header) => row.extra.push((header.clone(), value.to_owned())),
            }
        }
        row
    }
}

impl Iterator for RowReader<'_> {
    type Item = Result<RawRow, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let record = match self.records.next()? {
                Ok(record) => record,
                Err(err) => {
                    let line = err
                        .position()
                        .map(|p| p.line() + self.line_offset)
                        .unwrap_or_default();
                    return Some(Err(ParseError {
                        line,
                        message: err.to_string(),
                    }));
                }
            };
            let line = record
                .position()
                .map(|p| p.line() + self.line_offset)
                .unwrap_or_default();
            if record.iter().all(|value| value.trim().is_empty()) {
                continue;
            }
            if record.len() != self.columns.len() {
                return Some(Err(ParseError {
                    line,
                    message: format!(
                        "Expected {} columns but found {}",
                        self.columns.len(),
                        record.len()
                    ),
                }));
            }
            return Some(Ok(self.to_raw_row(line, &record)));
        }
    }
}
