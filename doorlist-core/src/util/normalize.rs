//! Derivation of the canonical deduplication key of an address.

use crate::{
    entities::AddressKey,
    text::{collapse_whitespace, fold_diacritics},
};
use std::borrow::Cow;

/// Joins the canonical fields of a key.
///
/// It is removed from the fields beforehand and
/// never accepted by the validation of street or city names.
pub const KEY_SEPARATOR: char = '|';

const CANONICAL_STREET: &str = "strasse";
const CANONICAL_SQUARE: &str = "platz";

pub fn normalize(street: &str, house_number: &str, postal_code: &str, city: &str) -> AddressKey {
    let key = [
        canonical_street(street),
        canonical_code(house_number),
        canonical_code(postal_code),
        canonical_name(city),
    ]
    .join(&KEY_SEPARATOR.to_string());
    AddressKey::new_unchecked(key)
}

/// Re-derive a key from an already normalized key.
///
/// Returns `None` if the text is not made of four fields.
pub fn normalize_key(key: &str) -> Option<AddressKey> {
    let mut parts = key.split(KEY_SEPARATOR);
    let street = parts.next()?;
    let house_number = parts.next()?;
    let postal_code = parts.next()?;
    let city = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some(normalize(street, house_number, postal_code, city))
}

fn without_separator(s: &str) -> Cow<'_, str> {
    if s.contains(KEY_SEPARATOR) {
        Cow::Owned(s.replace(KEY_SEPARATOR, " "))
    } else {
        Cow::Borrowed(s)
    }
}

fn canonical_name(s: &str) -> String {
    let s = collapse_whitespace(&without_separator(s)).to_lowercase();
    fold_diacritics(&s)
}

fn canonical_street(s: &str) -> String {
    let s = collapse_whitespace(&without_separator(s)).to_lowercase();
    let s = s
        .split(' ')
        .map(standardize_street_type)
        .collect::<Vec<_>>()
        .join(" ");
    fold_diacritics(&s)
}

// House numbers and postal codes are compared without any inner spacing,
// i.e. "37 A" and "37a" are the same house.
fn canonical_code(s: &str) -> String {
    let s: String = without_separator(s)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    fold_diacritics(&s.to_lowercase())
}

// Expects a lower case word without surrounding whitespace.
fn standardize_street_type(word: &str) -> Cow<'_, str> {
    match word {
        "str" | "str." | "straße" | "strasse" => return Cow::Borrowed(CANONICAL_STREET),
        "pl" | "pl." | "platz" => return Cow::Borrowed(CANONICAL_SQUARE),
        _ => {}
    }
    for suffix in ["straße", "str.", "str"] {
        if let Some(prefix) = word.strip_suffix(suffix) {
            if !prefix.is_empty() {
                return Cow::Owned(format!("{prefix}{CANONICAL_STREET}"));
            }
        }
    }
    if let Some(prefix) = word.strip_suffix("pl.") {
        if !prefix.is_empty() {
            return Cow::Owned(format!("{prefix}{CANONICAL_SQUARE}"));
        }
    }
    Cow::Borrowed(word)
}
