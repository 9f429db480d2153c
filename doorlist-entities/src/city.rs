use crate::geo::MapPoint;
use std::collections::BTreeSet;

/// A single hit of a free-text city search.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CityCandidate {
    pub city: String,
    pub state: Option<String>,
    pub coordinates: Option<MapPoint>,
    /// The (only) postal code the city search could
    /// extract from its result, if any.
    pub postal_code: Option<String>,
}

/// A city candidate with the postal codes of all sources merged.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CityMatch {
    pub city: String,
    pub state: Option<String>,
    pub coordinates: Option<MapPoint>,
    pub postal_codes: BTreeSet<String>,
}

impl From<CityCandidate> for CityMatch {
    fn from(from: CityCandidate) -> Self {
        let CityCandidate {
            city,
            state,
            coordinates,
            postal_code,
        } = from;
        Self {
            city,
            state,
            coordinates,
            postal_codes: postal_code.into_iter().collect(),
        }
    }
}
