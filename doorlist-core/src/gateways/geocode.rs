use crate::entities::{Address, MapPoint};

/// The address fields a geocoder gets to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressQuery<'a> {
    pub street: &'a str,
    pub house_number: &'a str,
    pub postal_code: &'a str,
    pub city: &'a str,
}

impl<'a> From<&'a Address> for AddressQuery<'a> {
    fn from(from: &'a Address) -> Self {
        Self {
            street: &from.street,
            house_number: &from.house_number,
            postal_code: &from.postal_code,
            city: &from.city,
        }
    }
}

/// Outcome of a single lookup. Never retried.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeocodeResult {
    pub coordinates: Option<MapPoint>,
    pub display_name: Option<String>,
    /// An error reported by the provider itself.
    pub error: Option<String>,
}

pub trait GeoCodingGateway {
    /// Transport failures and timeouts are returned as `Err`.
    fn geocode_address(&self, addr: &AddressQuery) -> anyhow::Result<GeocodeResult>;
}
