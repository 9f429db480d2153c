use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

pub const MAX_STREET_LEN: usize = 100;
pub const MAX_CITY_LEN: usize = 100;
/// Units of a single address.
pub const MAX_UNIT_COUNT: u32 = 999;

lazy_static! {
    // Letters (including diacritics), spaces, hyphens, apostrophes
    // and periods of abbreviations like "Str.".
    static ref STREET_REGEX: Regex = Regex::new(r"^[\p{L}\p{M} '’\-.]+$").unwrap();
    // Additionally parentheses and slashes: "Frankfurt (Oder)", "Halle/Saale"
    static ref CITY_REGEX: Regex = Regex::new(r"^[\p{L}\p{M} '’\-.()/]+$").unwrap();
    static ref HOUSE_NUMBER_REGEX: Regex =
        Regex::new(r"^\d{1,5}( ?[a-zA-Z])?([ /-]+\d{1,5}( ?[a-zA-Z])?| [a-zA-Z])?$").unwrap();
    static ref POSTAL_CODE_REGEX: Regex = Regex::new(r"^\d{5}$").unwrap();
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldInvalidation {
    #[error("The field is required")]
    Missing,
    #[error("The text is longer than {max} characters")]
    TooLong { max: usize },
    #[error("The text contains invalid characters")]
    InvalidCharacters,
    #[error("Expected a house number like '37', '37a' or '37 A'")]
    HouseNumber,
    #[error("Expected a postal code of 5 digits")]
    PostalCode,
    #[error("Expected a positive integer")]
    PositiveInteger,
    #[error("Expected at most {max}")]
    TooLarge { max: u32 },
    #[error("Unknown unit status '{0}'")]
    UnitStatus(String),
    #[error("Invalid coordinate '{0}'")]
    Coordinate(String),
    #[error("Latitude and longitude must be given together")]
    IncompleteCoordinates,
}

type Result = std::result::Result<(), FieldInvalidation>;

fn required(s: &str) -> std::result::Result<&str, FieldInvalidation> {
    let s = s.trim();
    if s.is_empty() {
        Err(FieldInvalidation::Missing)
    } else {
        Ok(s)
    }
}

fn bounded(s: &str, max: usize) -> Result {
    if s.chars().count() > max {
        return Err(FieldInvalidation::TooLong { max });
    }
    Ok(())
}

pub fn validate_street(s: &str) -> Result {
    let s = required(s)?;
    bounded(s, MAX_STREET_LEN)?;
    if !STREET_REGEX.is_match(s) {
        return Err(FieldInvalidation::InvalidCharacters);
    }
    Ok(())
}

pub fn validate_city(s: &str) -> Result {
    let s = required(s)?;
    bounded(s, MAX_CITY_LEN)?;
    if !CITY_REGEX.is_match(s) {
        return Err(FieldInvalidation::InvalidCharacters);
    }
    Ok(())
}

pub fn validate_house_number(s: &str) -> Result {
    let s = required(s)?;
    if !HOUSE_NUMBER_REGEX.is_match(s) {
        return Err(FieldInvalidation::HouseNumber);
    }
    Ok(())
}

pub fn is_valid_postal_code(s: &str) -> bool {
    POSTAL_CODE_REGEX.is_match(s.trim())
}

pub fn validate_postal_code(s: &str) -> Result {
    let s = required(s)?;
    if !is_valid_postal_code(s) {
        return Err(FieldInvalidation::PostalCode);
    }
    Ok(())
}

/// An absent unit count means a single unit.
pub fn parse_unit_count(s: &str) -> std::result::Result<u32, FieldInvalidation> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(1);
    }
    match s.parse::<u32>() {
        Ok(n) if n > MAX_UNIT_COUNT => Err(FieldInvalidation::TooLarge {
            max: MAX_UNIT_COUNT,
        }),
        Ok(n) if n > 0 => Ok(n),
        Err(err) if *err.kind() == std::num::IntErrorKind::PosOverflow => {
            Err(FieldInvalidation::TooLarge {
                max: MAX_UNIT_COUNT,
            })
        }
        _ => Err(FieldInvalidation::PositiveInteger),
    }
}
