use crate::{geo::MapPoint, unit::Unit};
use std::{borrow::Borrow, fmt};

/// Canonical identity of an address used for deduplication.
///
/// The key is derived from street, house number, postal code
/// and city. It is never supplied by the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AddressKey(String);

impl AddressKey {
    /// Wrap an already canonicalized key without any checks.
    pub fn new_unchecked(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for AddressKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for AddressKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<AddressKey> for String {
    fn from(from: AddressKey) -> Self {
        from.0
    }
}

impl fmt::Display for AddressKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    pub key          : AddressKey,
    pub street       : String,
    pub house_number : String,
    pub postal_code  : String,
    pub city         : String,
    pub locality     : Option<String>,
    pub coordinates  : Option<MapPoint>,
    pub notiz        : Option<String>,
    pub units        : Vec<Unit>,
}

impl Address {
    pub fn is_located(&self) -> bool {
        self.coordinates.map(MapPoint::is_located).unwrap_or(false)
    }
}

/// What is known about an already persisted address.
#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AddressSummary {
    pub id          : Option<String>,
    pub street      : String,
    pub house_number: String,
    pub postal_code : String,
    pub city        : String,
    pub coordinates : Option<MapPoint>,
    pub units       : Vec<Unit>,
}

impl From<Address> for AddressSummary {
    fn from(from: Address) -> Self {
        let Address {
            street,
            house_number,
            postal_code,
            city,
            coordinates,
            units,
            ..
        } = from;
        Self {
            id: None,
            street,
            house_number,
            postal_code,
            city,
            coordinates,
            units,
        }
    }
}
