use super::prelude::*;
use std::collections::HashMap;

pub const MIN_CITY_CANDIDATES: usize = 1;
pub const MAX_CITY_CANDIDATES: usize = 10;

/// Reconciles a free-text city name with the postal codes of
/// a city search and an independent postal code directory.
pub struct CityResolver<'a> {
    pub city_lookup: &'a dyn CityLookupGateway,
    pub city_lookup_limiter: &'a RateLimiter,
    pub postal_codes: &'a dyn PostalCodeDirectory,
    pub postal_codes_limiter: &'a RateLimiter,
}

impl CityResolver<'_> {
    /// The candidates keep the order of the city search.
    pub fn resolve_city_candidates(&self, city: &str, limit: usize) -> Result<Vec<CityMatch>> {
        let city = city.trim();
        if city.is_empty() {
            return Err(Error::EmptyCityName);
        }
        let limit = limit.clamp(MIN_CITY_CANDIDATES, MAX_CITY_CANDIDATES);

        self.city_lookup_limiter.wait();
        let candidates = self
            .city_lookup
            .lookup_city_candidates(city, limit)
            .map_err(|cause| Error::CityLookup {
                city: city.to_owned(),
                cause,
            })?;
        log::debug!("Found {} candidates for city '{}'", candidates.len(), city);

        let mut directory_cache: HashMap<(String, String), Vec<String>> = HashMap::new();
        let matches = candidates
            .into_iter()
            .take(limit)
            .map(|candidate| self.merge_postal_codes(candidate, &mut directory_cache))
            .collect();
        Ok(matches)
    }

    fn merge_postal_codes(
        &self,
        candidate: CityCandidate,
        directory_cache: &mut HashMap<(String, String), Vec<String>>,
    ) -> CityMatch {
        let state = candidate
            .state
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let city = candidate.city.trim();
        let directory_codes = match state {
            Some(state) if !city.is_empty() => {
                let cache_key = (state.to_owned(), city.to_owned());
                directory_cache
                    .entry(cache_key)
                    .or_insert_with(|| self.lookup_postal_codes(state, city))
                    .clone()
            }
            _ => vec![],
        };
        let mut city_match = CityMatch::from(candidate);
        if directory_codes.is_empty() {
            if city_match.postal_codes.is_empty() {
                log::debug!("No postal codes known for '{}'", city_match.city);
            }
        } else {
            city_match.postal_codes.extend(directory_codes);
        }
        city_match
    }

    // Failures must not remove the candidate.
    fn lookup_postal_codes(&self, state: &str, city: &str) -> Vec<String> {
        self.postal_codes_limiter.wait();
        match self.postal_codes.lookup_postal_codes(state, city) {
            Ok(codes) => codes
                .into_iter()
                .map(|code| code.trim().to_owned())
                .filter(|code| !code.is_empty())
                .collect(),
            Err(err) => {
                log::warn!("Could not look up postal codes of {city} ({state}): {err}");
                vec![]
            }
        }
    }
}
