use crate::entities::CityCandidate;

/// Free-text city search, e.g. a forward geocoder.
pub trait CityLookupGateway {
    /// Up to `limit` candidates, best match first.
    fn lookup_city_candidates(&self, city: &str, limit: usize)
        -> anyhow::Result<Vec<CityCandidate>>;
}

/// Authoritative directory of the postal codes of a locality.
pub trait PostalCodeDirectory {
    /// An empty list is a valid answer.
    fn lookup_postal_codes(&self, state: &str, city: &str) -> anyhow::Result<Vec<String>>;
}
