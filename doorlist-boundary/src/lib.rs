use serde::{Deserialize, Serialize};

#[cfg(feature = "entity-conversions")]
mod conv;

#[cfg(feature = "entity-conversions")]
pub use conv::ConversionError;

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, Copy, PartialEq))]
pub struct MapPoint {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Serialize, Deserialize, Default)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, Copy, PartialEq, Eq))]
#[serde(rename_all = "kebab-case")]
pub enum UnitStatus {
    #[default]
    NotProcessed,
    NotReached,
    NotInterested,
    Interested,
    Written,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct Unit {
    #[serde(default)]
    pub status: UnitStatus,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub etage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub lage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub notiz: Option<String>,
}

#[rustfmt::skip]
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub normalized_key : String,
    pub street         : String,
    pub house_number   : String,
    pub postal_code    : String,
    pub city           : String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub locality       : Option<String>,
    pub coordinates    : Option<MapPoint>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub notiz          : Option<String>,
    pub units          : Vec<Unit>,
}

/// A record of the persisted address inventory.
#[rustfmt::skip]
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
#[serde(rename_all = "camelCase")]
pub struct AddressSummary {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id           : Option<String>,
    pub street       : String,
    pub house_number : String,
    pub postal_code  : String,
    pub city         : String,
    #[serde(default)]
    pub coordinates  : Option<MapPoint>,
    #[serde(default)]
    pub units        : Vec<Unit>,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
#[serde(rename_all = "camelCase")]
pub struct UnitAddition {
    pub normalized_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_id: Option<String>,
    pub units: Vec<Unit>,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct ParseError {
    pub line: u64,
    pub message: String,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct ValidationError {
    pub line: u64,
    pub field: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
#[serde(rename_all = "camelCase")]
pub struct DuplicateConflict {
    pub normalized_key: String,
    pub line: u64,
    pub field: String,
    pub kept: String,
    pub discarded: String,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
#[serde(rename_all = "camelCase")]
pub struct GeocodeFailure {
    pub normalized_key: String,
    pub reason: String,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct CityLookupFailure {
    pub city: String,
    pub reason: String,
}

#[derive(Serialize, Deserialize, Default)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, Copy, PartialEq, Eq))]
#[serde(rename_all = "camelCase")]
pub struct ImportStats {
    pub parsed: usize,
    pub skipped_invalid: usize,
    pub skipped_geocode: usize,
    pub geocoded: usize,
    pub failed: usize,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub addresses: Vec<Address>,
    pub unit_additions: Vec<UnitAddition>,
    pub parse_errors: Vec<ParseError>,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<DuplicateConflict>,
    pub city_lookup_failures: Vec<CityLookupFailure>,
    pub geocode_failures: Vec<GeocodeFailure>,
    pub stats: ImportStats,
    pub cancelled: bool,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
#[serde(rename_all = "camelCase")]
pub struct CityMatch {
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<MapPoint>,
    /// Sorted
    pub postal_codes: Vec<String>,
}
