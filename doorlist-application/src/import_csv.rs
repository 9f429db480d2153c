use crate::{
    csv::{HeaderAliases, RowReader},
    error::{ImportError, ParseError},
};
use doorlist_core::{
    entities::*,
    gateways::{city::*, geocode::GeoCodingGateway},
    repositories::{AddressIndex, AddressIndexSnapshot},
    usecases::{self, *},
    util::{cancel::CancelToken, throttle::RateLimiter},
};
use std::time::Duration;
use strum::{Display, EnumString};

/// What happens with rows that have validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum InvalidRowPolicy {
    /// Import the best-effort interpretation and report the errors.
    #[default]
    Keep,
    /// Only report the errors.
    Skip,
}

#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Detected from the header line if missing.
    pub delimiter: Option<u8>,
    pub header_aliases: HeaderAliases,
    pub suggest_postal_codes: bool,
    pub geocode: bool,
    pub invalid_rows: InvalidRowPolicy,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            header_aliases: HeaderAliases::default(),
            suggest_postal_codes: true,
            geocode: true,
            invalid_rows: InvalidRowPolicy::default(),
        }
    }
}

/// Minimum delays between the calls to each provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RateLimits {
    pub geocoding: Duration,
    pub city_lookup: Duration,
    pub postal_codes: Duration,
    /// The city search runs on the geocoding provider and
    /// is throttled by the geocoding limiter.
    pub city_lookup_on_geocoder: bool,
}

/// One limiter per provider, shared by all of its calls.
pub(crate) struct Limiters {
    geocoding: RateLimiter,
    city_lookup: Option<RateLimiter>,
    postal_codes: RateLimiter,
}

impl Limiters {
    pub fn new(limits: &RateLimits) -> Self {
        Self {
            geocoding: RateLimiter::new(limits.geocoding),
            city_lookup: (!limits.city_lookup_on_geocoder)
                .then(|| RateLimiter::new(limits.city_lookup)),
            postal_codes: RateLimiter::new(limits.postal_codes),
        }
    }

    pub fn geocoding(&self) -> &RateLimiter {
        &self.geocoding
    }

    pub fn city_lookup(&self) -> &RateLimiter {
        self.city_lookup.as_ref().unwrap_or(&self.geocoding)
    }

    pub fn postal_codes(&self) -> &RateLimiter {
        &self.postal_codes
    }
}

/// The collaborators of a single import.
pub struct ImportContext<'a> {
    pub index: &'a dyn AddressIndex,
    pub geocoder: Option<&'a dyn GeoCodingGateway>,
    pub city_lookup: Option<&'a dyn CityLookupGateway>,
    pub postal_codes: Option<&'a dyn PostalCodeDirectory>,
    pub rate_limits: RateLimits,
    pub cancel: CancelToken,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportStats {
    /// Rows that could be read
    pub parsed: usize,
    /// Rows with validation errors that have not been imported
    pub skipped_invalid: usize,
    /// Addresses that already had coordinates
    pub skipped_geocode: usize,
    pub geocoded: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    /// Ready to be persisted
    pub addresses: Vec<Address>,
    pub unit_additions: Vec<UnitAddition>,
    pub parse_errors: Vec<ParseError>,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<DuplicateConflict>,
    pub city_lookup_failures: Vec<CityLookupFailure>,
    pub geocode_failures: Vec<GeocodeFailure>,
    pub stats: ImportStats,
    pub cancelled: bool,
}

/// An empty directory, the city search codes are used instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPostalCodeDirectory;

impl PostalCodeDirectory for NoPostalCodeDirectory {
    fn lookup_postal_codes(&self, _: &str, _: &str) -> anyhow::Result<Vec<String>> {
        Ok(vec![])
    }
}

/// Turn a CSV text into a batch of new addresses and units.
///
/// Only unreadable input fails the import, all other problems
/// are collected in the report.
pub fn import_csv(
    text: &str,
    options: &ImportOptions,
    ctx: &ImportContext,
) -> Result<ImportReport, ImportError> {
    let reader = RowReader::new(text, options.delimiter, &options.header_aliases)?;
    let index = ctx.index.read_address_index()?;
    import_rows(reader, options, ctx, &index)
}

/// Import a CSV text and merge the batch into the same
/// snapshot of the index that it was reconciled with.
pub fn import_csv_and_merge(
    text: &str,
    options: &ImportOptions,
    ctx: &ImportContext,
) -> Result<(ImportReport, AddressIndexSnapshot), ImportError> {
    let reader = RowReader::new(text, options.delimiter, &options.header_aliases)?;
    let index = ctx.index.read_address_index()?;
    let report = import_rows(reader, options, ctx, &index)?;
    let merged = merge_into_index(index, &report);
    Ok((report, merged))
}

fn import_rows(
    reader: RowReader<'_>,
    options: &ImportOptions,
    ctx: &ImportContext,
    index: &AddressIndexSnapshot,
) -> Result<ImportReport, ImportError> {
    info!("Importing addresses ({} already known)", index.len());

    let mut report = ImportReport::default();
    let mut rows = vec![];
    for row in reader {
        match row {
            Ok(row) => rows.push(row),
            Err(err) => {
                warn!("Skipping unreadable row: {err}");
                report.parse_errors.push(err);
            }
        }
    }
    report.stats.parsed = rows.len();

    let limiters = Limiters::new(&ctx.rate_limits);
    let mut rows = usecases::validate_rows(&rows);
    if options.suggest_postal_codes {
        if let Some(city_lookup) = ctx.city_lookup {
            let resolver = CityResolver {
                city_lookup,
                city_lookup_limiter: limiters.city_lookup(),
                postal_codes: ctx.postal_codes.unwrap_or(&NoPostalCodeDirectory),
                postal_codes_limiter: limiters.postal_codes(),
            };
            report.city_lookup_failures =
                usecases::suggest_postal_codes(&resolver, &mut rows, &ctx.cancel);
        }
    }
    report.errors = rows.iter().flat_map(|r| r.errors.iter().cloned()).collect();

    let accepted: Vec<_> = rows
        .iter()
        .filter(|r| options.invalid_rows == InvalidRowPolicy::Keep || r.is_valid())
        .map(|r| &r.address)
        .collect();
    report.stats.skipped_invalid = rows.len() - accepted.len();

    let Aggregation {
        mut addresses,
        unit_additions,
        conflicts,
    } = usecases::aggregate_units(accepted, index);

    if options.geocode {
        if let Some(geocoder) = ctx.geocoder {
            let enrichment = usecases::enrich_coordinates(
                geocoder,
                limiters.geocoding(),
                &ctx.cancel,
                &mut addresses,
            );
            report.stats.skipped_geocode = enrichment.skipped;
            report.stats.geocoded = enrichment.geocoded;
            report.stats.failed = enrichment.failures.len();
            report.geocode_failures = enrichment.failures;
        }
    }
    report.cancelled = ctx.cancel.is_cancelled();
    report.addresses = addresses;
    report.unit_additions = unit_additions;
    report.warnings = conflicts;

    info!(
        "Imported {} new addresses and {} unit additions from {} rows",
        report.addresses.len(),
        report.unit_additions.len(),
        report.stats.parsed
    );
    if !report.errors.is_empty() {
        info!("Found {} validation errors", report.errors.len());
    }
    Ok(report)
}

/// The inventory after the imported batch has been persisted.
pub fn merge_into_index(mut index: AddressIndexSnapshot, report: &ImportReport) -> AddressIndexSnapshot {
    for addr in &report.addresses {
        index.insert(addr.key.clone(), AddressSummary::from(addr.clone()));
    }
    for addition in &report.unit_additions {
        if let Some(summary) = index.get_mut(&addition.key) {
            summary.units.extend(addition.units.iter().cloned());
        }
    }
    index
}
