use super::*;
use crate::import_csv::Limiters;
use doorlist_core::{
    gateways::city::{CityLookupGateway, PostalCodeDirectory},
    usecases::CityResolver,
};

pub fn lookup_cities(
    city_lookup: &dyn CityLookupGateway,
    postal_codes: &dyn PostalCodeDirectory,
    rate_limits: &RateLimits,
    city: &str,
    limit: usize,
) -> Result<Vec<CityMatch>> {
    let limiters = Limiters::new(rate_limits);
    let resolver = CityResolver {
        city_lookup,
        city_lookup_limiter: limiters.city_lookup(),
        postal_codes,
        postal_codes_limiter: limiters.postal_codes(),
    };
    let matches = resolver.resolve_city_candidates(city, limit)?;
    debug!("Resolved {} candidates for '{}'", matches.len(), city);
    Ok(matches)
}
