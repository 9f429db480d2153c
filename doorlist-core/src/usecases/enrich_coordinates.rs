use super::prelude::*;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeFailureReason {
    #[error("no result")]
    NoResult,
    #[error("provider error: {0}")]
    Provider(String),
    #[error("request failed: {0}")]
    Request(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodeFailure {
    pub key: AddressKey,
    pub reason: GeocodeFailureReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentReport {
    /// Addresses that already had valid coordinates
    pub skipped: usize,
    pub geocoded: usize,
    pub failures: Vec<GeocodeFailure>,
    /// Not all addresses have been processed
    pub cancelled: bool,
}

/// Look up the missing coordinates of all addresses one after another.
///
/// Valid coordinates are never replaced. A failed lookup is
/// recorded and never retried.
pub fn enrich_coordinates(
    gateway: &dyn GeoCodingGateway,
    limiter: &RateLimiter,
    cancel: &CancelToken,
    addresses: &mut [Address],
) -> EnrichmentReport {
    let mut report = EnrichmentReport::default();
    for addr in addresses.iter_mut() {
        if addr.is_located() {
            report.skipped += 1;
            continue;
        }
        if cancel.is_cancelled() {
            log::info!("Geocoding cancelled");
            report.cancelled = true;
            break;
        }
        limiter.wait();
        match geocode(gateway, addr) {
            Ok(pos) => {
                log::debug!("Geocoded {} at {}", addr.key, pos);
                addr.coordinates = Some(pos);
                report.geocoded += 1;
            }
            Err(reason) => {
                log::warn!("Could not geocode {}: {}", addr.key, reason);
                report.failures.push(GeocodeFailure {
                    key: addr.key.clone(),
                    reason,
                });
            }
        }
    }
    log::info!(
        "Geocoded {} addresses, {} failed, {} skipped",
        report.geocoded,
        report.failures.len(),
        report.skipped
    );
    report
}

fn geocode(
    gateway: &dyn GeoCodingGateway,
    addr: &Address,
) -> std::result::Result<MapPoint, GeocodeFailureReason> {
    let res = gateway
        .geocode_address(&AddressQuery::from(addr))
        .map_err(|err| GeocodeFailureReason::Request(err.to_string()))?;
    if let Some(err) = res.error {
        return Err(GeocodeFailureReason::Provider(err));
    }
    res.coordinates
        .filter(|pos| pos.is_valid() && pos.is_located())
        .ok_or(GeocodeFailureReason::NoResult)
}
