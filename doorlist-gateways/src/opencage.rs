use crate::timeout::with_timeout;
use anyhow::{anyhow, Result};
use doorlist_core::gateways::{
    city::CityLookupGateway,
    geocode::{AddressQuery, GeoCodingGateway, GeocodeResult},
};
use doorlist_entities::{city::CityCandidate, geo::MapPoint};
use geocoding::{
    opencage::OpencageResponse,
    InputBounds, Opencage,
};

// crates.io geocoding 0.4.0 does not export `opencage::NOBOUNDS`.
const NOBOUNDS: Option<InputBounds<f64>> = None;
use itertools::Itertools;
use std::{collections::HashMap, time::Duration};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// Keys of the address components that name a locality, by priority.
const LOCALITY_COMPONENTS: [&str; 5] = ["city", "town", "village", "municipality", "hamlet"];

/// Forward geocoding and city search with <https://opencagedata.com>.
#[derive(Debug, Clone)]
pub struct OpenCage {
    api_key: String,
    timeout: Duration,
    /// Appended to every query, e.g. "Deutschland"
    country: Option<String>,
}

impl OpenCage {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            timeout: DEFAULT_TIMEOUT,
            country: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_country(mut self, country: Option<String>) -> Self {
        self.country = country.filter(|c| !c.trim().is_empty());
        self
    }

    fn query(&self, parts: &[&str]) -> String {
        parts
            .iter()
            .map(|p| p.trim())
            .chain(self.country.as_deref())
            .filter(|p| !p.is_empty())
            .join(", ")
    }

    fn forward(&self, query: String) -> Result<Vec<Hit>> {
        let api_key = self.api_key.clone();
        with_timeout(self.timeout, move || {
            let oc = Opencage::new(api_key);
            let res: OpencageResponse<f64> = oc.forward_full(&query, NOBOUNDS)?;
            if res.status.code != 200 {
                return Err(anyhow!(
                    "OpenCage responded with {}: {}",
                    res.status.code,
                    res.status.message
                ));
            }
            let hits = res
                .results
                .into_iter()
                .map(|r| Hit {
                    formatted: r.formatted,
                    lat: r.geometry.get("lat").copied(),
                    lng: r.geometry.get("lng").copied(),
                    components: r
                        .components
                        .into_iter()
                        .filter_map(|(k, v)| v.as_str().map(|v| (k, v.to_owned())))
                        .collect(),
                })
                .collect();
            Ok(hits)
        })
    }
}

/// The parts of a search result that are used.
#[derive(Debug, Clone, Default)]
struct Hit {
    formatted: String,
    lat: Option<f64>,
    lng: Option<f64>,
    components: HashMap<String, String>,
}

impl Hit {
    fn pos(&self) -> Option<MapPoint> {
        let (lat, lng) = (self.lat?, self.lng?);
        MapPoint::try_from_lat_lng_deg(lat, lng)
    }

    fn locality(&self) -> Option<&str> {
        LOCALITY_COMPONENTS
            .iter()
            .find_map(|key| self.components.get(*key))
            .map(String::as_str)
    }

    fn into_city_candidate(self) -> Option<CityCandidate> {
        let city = self.locality()?.to_owned();
        let coordinates = self.pos();
        let mut components = self.components;
        Some(CityCandidate {
            city,
            state: components.remove("state"),
            coordinates,
            postal_code: components.remove("postcode"),
        })
    }
}

impl GeoCodingGateway for OpenCage {
    fn geocode_address(&self, addr: &AddressQuery) -> Result<GeocodeResult> {
        let street = format!("{} {}", addr.street, addr.house_number);
        let city = format!("{} {}", addr.postal_code, addr.city);
        let query = self.query(&[&street, &city]);
        log::debug!("Geocoding '{query}'");
        let Some(hit) = self.forward(query)?.into_iter().next() else {
            return Ok(GeocodeResult::default());
        };
        Ok(GeocodeResult {
            coordinates: hit.pos(),
            display_name: Some(hit.formatted).filter(|s| !s.is_empty()),
            error: None,
        })
    }
}

impl CityLookupGateway for OpenCage {
    fn lookup_city_candidates(&self, city: &str, limit: usize) -> Result<Vec<CityCandidate>> {
        let query = self.query(&[city]);
        log::debug!("Searching cities for '{query}'");
        let hits = self.forward(query)?;
        Ok(city_candidates(hits, limit))
    }
}

fn city_candidates(hits: Vec<Hit>, limit: usize) -> Vec<CityCandidate> {
    hits.into_iter()
        .filter_map(Hit::into_city_candidate)
        .unique_by(|c| (c.city.clone(), c.state.clone()))
        .take(limit)
        .collect()
}
