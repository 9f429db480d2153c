use crate::config::{Config, GeocodingGateway, PostalCodeGateway};
use anyhow::Result;
use doorlist_gateways::{opencage::OpenCage, openplz::OpenPlz};

/// The OpenCage gateway serves geocoding and the city search.
pub fn geocoding_gateway(cfg: &Config) -> Option<OpenCage> {
    match &cfg.geocoding.gateway {
        Some(GeocodingGateway::OpenCage { api_key }) => {
            log::info!("Use OpenCage geocoding gateway");
            let gw = OpenCage::new(api_key.clone())
                .with_timeout(cfg.geocoding.timeout)
                .with_country(cfg.import.country.clone());
            Some(gw)
        }
        None => {
            log::warn!("No geocoding gateway configured");
            None
        }
    }
}

pub fn postal_code_gateway(cfg: &Config) -> Result<Option<OpenPlz>> {
    match &cfg.postal_codes.gateway {
        Some(PostalCodeGateway::OpenPlz { base_url }) => {
            log::info!("Use OpenPLZ postal code directory ({base_url})");
            Ok(Some(OpenPlz::new(base_url.as_str(), cfg.postal_codes.timeout)?))
        }
        None => {
            log::warn!("No postal code directory configured");
            Ok(None)
        }
    }
}
