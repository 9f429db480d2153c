use super::prelude::*;
use crate::{
    text::{collapse_whitespace, non_empty},
    util::{normalize::normalize, validate::*},
};

/// Best-effort interpretation of a single import row.
#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedAddress {
    pub line          : u64,
    pub key           : AddressKey,
    pub street        : String,
    pub house_number  : String,
    pub postal_code   : String,
    pub city          : String,
    pub locality      : Option<String>,
    pub coordinates   : Option<MapPoint>,
    pub we_count      : u32,
    pub etage         : Option<String>,
    pub lage          : Option<String>,
    pub notiz_adresse : Option<String>,
    pub notiz_we      : Option<String>,
    pub status        : UnitStatus,
    pub extra         : Vec<(String, String)>,
}

impl ParsedAddress {
    pub fn unit(&self) -> Unit {
        Unit {
            status: self.status,
            etage: self.etage.clone(),
            lage: self.lage.clone(),
            notiz: self.notiz_we.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub line: u64,
    pub field: AddressField,
    pub message: String,
    /// A corrected value the user might want to apply.
    pub suggestion: Option<String>,
}

impl ValidationError {
    fn new(line: u64, field: AddressField, err: FieldInvalidation) -> Self {
        Self {
            line,
            field,
            message: err.to_string(),
            suggestion: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRow {
    pub address: ParsedAddress,
    /// All violations in field order
    pub errors: Vec<ValidationError>,
}

impl ValidatedRow {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

pub fn validate_rows(rows: &[RawRow]) -> Vec<ValidatedRow> {
    rows.iter().map(validate_row).collect()
}

/// Check all fields of a row without stopping at the first failure.
pub fn validate_row(row: &RawRow) -> ValidatedRow {
    use AddressField as F;

    let mut errors = vec![];
    let mut check = |field, res: std::result::Result<(), FieldInvalidation>| {
        if let Err(err) = res {
            errors.push(ValidationError::new(row.line, field, err));
        }
    };

    check(F::Street, validate_street(row.get(F::Street)));
    check(F::HouseNumber, validate_house_number(row.get(F::HouseNumber)));
    check(F::PostalCode, validate_postal_code(row.get(F::PostalCode)));
    check(F::City, validate_city(row.get(F::City)));

    let coordinates = match parse_coordinates(row.get(F::Latitude), row.get(F::Longitude)) {
        Ok(pos) => pos,
        Err((field, err)) => {
            check(field, Err(err));
            None
        }
    };

    let we_count = parse_unit_count(row.get(F::WeCount)).unwrap_or_else(|err| {
        check(F::WeCount, Err(err));
        1
    });

    let status_label = row.get(F::Status);
    let status = UnitStatus::from_label(status_label).unwrap_or_else(|| {
        check(
            F::Status,
            Err(FieldInvalidation::UnitStatus(status_label.trim().to_owned())),
        );
        UnitStatus::default()
    });

    let street = collapse_whitespace(row.get(F::Street));
    let house_number = collapse_whitespace(row.get(F::HouseNumber));
    let postal_code = collapse_whitespace(row.get(F::PostalCode));
    let city = collapse_whitespace(row.get(F::City));
    let key = normalize(&street, &house_number, &postal_code, &city);

    let address = ParsedAddress {
        line: row.line,
        key,
        street,
        house_number,
        postal_code,
        city,
        locality: non_empty(row.get(F::Locality)),
        coordinates,
        we_count,
        etage: non_empty(row.get(F::Etage)),
        lage: non_empty(row.get(F::Lage)),
        notiz_adresse: non_empty(row.get(F::NotizAdresse)),
        notiz_we: non_empty(row.get(F::NotizWe)),
        status,
        extra: row.extra.clone(),
    };
    ValidatedRow { address, errors }
}

type CoordinatesResult = std::result::Result<Option<MapPoint>, (AddressField, FieldInvalidation)>;

// Spreadsheets often contain 0/0 for "unknown", which is not an error.
fn parse_coordinates(lat: &str, lng: &str) -> CoordinatesResult {
    let (lat, lng) = (lat.trim(), lng.trim());
    match (lat.is_empty(), lng.is_empty()) {
        (true, true) => return Ok(None),
        (false, true) => {
            return Err((
                AddressField::Longitude,
                FieldInvalidation::IncompleteCoordinates,
            ))
        }
        (true, false) => {
            return Err((
                AddressField::Latitude,
                FieldInvalidation::IncompleteCoordinates,
            ))
        }
        (false, false) => {}
    }
    let pos = MapPoint::parse_lat_lng_deg(lat, lng).map_err(|err| match err {
        MapPointParseError::Longitude(x) => {
            (AddressField::Longitude, FieldInvalidation::Coordinate(x))
        }
        MapPointParseError::Latitude(x) | MapPointParseError::Format(x) => {
            (AddressField::Latitude, FieldInvalidation::Coordinate(x))
        }
    })?;
    Ok(Some(pos).filter(|pos| pos.is_located()))
}
