use std::collections::HashMap;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// The logical fields a CSV column can be mapped onto.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "camelCase")]
pub enum AddressField {
    Street,
    HouseNumber,
    PostalCode,
    City,
    Locality,
    Latitude,
    Longitude,
    WeCount,
    Etage,
    Lage,
    NotizAdresse,
    #[strum(serialize = "notizWE")]
    NotizWe,
    Status,
}

/// A single data row of an import, keyed by logical field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawRow {
    /// 1-based line number within the input
    pub line: u64,
    pub values: HashMap<AddressField, String>,
    /// Unrecognized columns as (header, value), passed through untouched.
    pub extra: Vec<(String, String)>,
}

impl RawRow {
    pub fn new(line: u64) -> Self {
        Self {
            line,
            ..Default::default()
        }
    }

    pub fn with(mut self, field: AddressField, value: impl Into<String>) -> Self {
        self.values.insert(field, value.into());
        self
    }

    /// Missing columns read as empty text.
    pub fn get(&self, field: AddressField) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or_default()
    }
}
