use super::prelude::*;

const ROUTE: &str = "\
Straße;Hausnummer;PLZ;Ort;WE;Etage;Lat;Lng;Bemerkung
Niederwall;1;33602;Bielefeld;2;EG;;;Eingang hinten
niederwall ;1;33602;Bielefeld;1;1. OG;;;
Jahnplatz;5;33602;Bielefeld;1;;52.03;8.53;
Unter den Linden;1;1234;Berlin;1;;;;
";

fn streets(report: &ImportReport) -> Vec<&str> {
    report.addresses.iter().map(|a| a.street.as_str()).collect()
}

#[test]
fn import_a_route() {
    let _ = env_logger::builder().is_test(true).try_init();
    let geocoder = FakeGeocoder::default();
    let ctx = context(&EmptyAddressIndex, &geocoder);
    let report = import_csv(ROUTE, &ImportOptions::default(), &ctx).unwrap();

    assert!(report.parse_errors.is_empty());
    assert_eq!(streets(&report), vec!["Niederwall", "Jahnplatz", "Unter den Linden"]);
    assert_eq!(report.addresses[0].units.len(), 3);
    assert_eq!(
        report.addresses[0].units[2].etage.as_deref(),
        Some("1. OG")
    );

    // The duplicate row spells the street differently
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].line, 3);
    assert_eq!(report.warnings[0].field, AddressField::Street);

    assert_eq!(report.errors.len(), 1);
    let err = &report.errors[0];
    assert_eq!(err.line, 5);
    assert_eq!(err.field, AddressField::PostalCode);
    assert_eq!(err.suggestion.as_deref(), Some("12345"));
    assert_eq!(report.addresses[2].postal_code, "1234");

    assert_eq!(
        *geocoder.requests.borrow(),
        vec!["Niederwall".to_string(), "Unter den Linden".to_string()]
    );
    assert_eq!(
        report.addresses[1].coordinates,
        Some(MapPoint::from_lat_lng_deg(52.03, 8.53))
    );
    assert!(report.addresses.iter().all(Address::is_located));
    assert_eq!(
        report.stats,
        ImportStats {
            parsed: 4,
            skipped_invalid: 0,
            skipped_geocode: 1,
            geocoded: 2,
            failed: 0,
        }
    );
    assert!(!report.cancelled);
}

#[test]
fn reimport_into_the_merged_index() {
    let geocoder = FakeGeocoder::default();
    let first = import_csv(
        ROUTE,
        &ImportOptions::default(),
        &context(&EmptyAddressIndex, &geocoder),
    )
    .unwrap();
    let index = merge_into_index(AddressIndexSnapshot::default(), &first);
    assert_eq!(index.len(), 3);

    let geocoder = FakeGeocoder::default();
    let second = import_csv(ROUTE, &ImportOptions::default(), &context(&index, &geocoder)).unwrap();
    assert!(second.addresses.is_empty());
    assert!(second.unit_additions.is_empty());
    assert!(geocoder.requests.borrow().is_empty());

    let more = format!("{ROUTE}Niederwall;1;33602;Bielefeld;1;2. OG;;;\n");
    let third = import_csv(&more, &ImportOptions::default(), &context(&index, &geocoder)).unwrap();
    assert!(third.addresses.is_empty());
    assert_eq!(third.unit_additions.len(), 1);
    assert_eq!(third.unit_additions[0].units.len(), 1);
    assert_eq!(third.unit_additions[0].units[0].etage.as_deref(), Some("2. OG"));
}

#[test]
fn skip_invalid_rows() {
    let geocoder = FakeGeocoder::default();
    let options = ImportOptions {
        invalid_rows: InvalidRowPolicy::Skip,
        ..Default::default()
    };
    let report = import_csv(ROUTE, &options, &context(&EmptyAddressIndex, &geocoder)).unwrap();
    assert_eq!(streets(&report), vec!["Niederwall", "Jahnplatz"]);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.stats.skipped_invalid, 1);
}

#[test]
fn without_lookups() {
    let geocoder = FakeGeocoder::default();
    let options = ImportOptions {
        geocode: false,
        suggest_postal_codes: false,
        ..Default::default()
    };
    let report = import_csv(ROUTE, &options, &context(&EmptyAddressIndex, &geocoder)).unwrap();
    assert!(geocoder.requests.borrow().is_empty());
    assert_eq!(report.errors[0].suggestion, None);
    assert_eq!(report.stats.geocoded, 0);
    assert!(!report.addresses[0].is_located());
}

#[test]
fn report_unreadable_rows_and_failed_lookups() {
    let geocoder = FakeGeocoder {
        unknown_streets: vec!["Feldweg".into()],
        ..Default::default()
    };
    let csv = "street,number,zip,city\nFeldweg,3,33602,Bielefeld\nBroken,1\nNiederwall,1,1,Kleinstadt\n";
    let report = import_csv(csv, &ImportOptions::default(), &context(&EmptyAddressIndex, &geocoder))
        .unwrap();
    assert_eq!(report.parse_errors.len(), 1);
    assert_eq!(report.parse_errors[0].line, 3);
    assert_eq!(report.stats.parsed, 2);

    assert_eq!(report.geocode_failures.len(), 1);
    assert_eq!(report.geocode_failures[0].reason, GeocodeFailureReason::NoResult);
    assert_eq!(report.stats.failed, 1);
    assert_eq!(report.stats.geocoded, 1);

    assert_eq!(report.city_lookup_failures.len(), 1);
    assert_eq!(report.city_lookup_failures[0].city, "Kleinstadt");
}

#[test]
fn cancelled_import_keeps_the_batch() {
    let geocoder = FakeGeocoder::default();
    let ctx = context(&EmptyAddressIndex, &geocoder);
    ctx.cancel.cancel();
    let report = import_csv(ROUTE, &ImportOptions::default(), &ctx).unwrap();
    assert!(report.cancelled);
    assert_eq!(report.addresses.len(), 3);
    assert!(geocoder.requests.borrow().is_empty());
    assert_eq!(report.errors[0].suggestion, None);
}

#[test]
fn unreadable_input() {
    let geocoder = FakeGeocoder::default();
    let ctx = context(&EmptyAddressIndex, &geocoder);
    assert!(matches!(
        import_csv("", &ImportOptions::default(), &ctx),
        Err(ImportError::EmptyInput)
    ));
    assert!(matches!(
        import_csv("a;b;c\n1;2;3\n", &ImportOptions::default(), &ctx),
        Err(ImportError::NoKnownColumns(_))
    ));
}

#[test]
fn look_up_cities() {
    let matches = lookup_cities(
        &FakeCityLookup,
        &FakeDirectory,
        &RateLimits::default(),
        "Berlin",
        3,
    )
    .unwrap();
    assert_eq!(matches.len(), 1);
    let codes: Vec<_> = matches[0].postal_codes.iter().map(String::as_str).collect();
    assert_eq!(codes, vec!["10115", "10117", "12345", "12349"]);
    assert!(matches!(
        lookup_cities(&FakeCityLookup, &FakeDirectory, &RateLimits::default(), "", 3),
        Err(AppError::Business(_))
    ));
}

/// Serves the city search and the geocoding like a single
/// provider and records the time of every request.
#[derive(Default)]
struct SingleProvider {
    requests: std::cell::RefCell<Vec<std::time::Instant>>,
}

impl GeoCodingGateway for SingleProvider {
    fn geocode_address(&self, addr: &AddressQuery) -> anyhow::Result<GeocodeResult> {
        self.requests.borrow_mut().push(std::time::Instant::now());
        FakeGeocoder::default().geocode_address(addr)
    }
}

impl CityLookupGateway for SingleProvider {
    fn lookup_city_candidates(&self, city: &str, limit: usize) -> anyhow::Result<Vec<CityCandidate>> {
        self.requests.borrow_mut().push(std::time::Instant::now());
        FakeCityLookup.lookup_city_candidates(city, limit)
    }
}

fn requests_of_a_single_provider(limits: RateLimits) -> Vec<std::time::Instant> {
    let provider = SingleProvider::default();
    let ctx = ImportContext {
        index: &EmptyAddressIndex,
        geocoder: Some(&provider),
        city_lookup: Some(&provider),
        postal_codes: Some(&FakeDirectory),
        rate_limits: limits,
        cancel: CancelToken::new(),
    };
    let csv = "Straße;Hausnummer;PLZ;Ort\nUnter den Linden;1;1234;Berlin\n";
    let report = import_csv(csv, &ImportOptions::default(), &ctx).unwrap();
    assert_eq!(report.errors[0].suggestion.as_deref(), Some("12345"));
    assert_eq!(report.stats.geocoded, 1);
    provider.requests.into_inner()
}

#[test]
fn city_search_and_geocoding_share_the_provider_limit() {
    let interval = std::time::Duration::from_millis(200);
    let requests = requests_of_a_single_provider(RateLimits {
        geocoding: interval,
        city_lookup: std::time::Duration::ZERO,
        postal_codes: std::time::Duration::ZERO,
        city_lookup_on_geocoder: true,
    });
    assert_eq!(requests.len(), 2);
    assert!(requests[1] - requests[0] >= interval - std::time::Duration::from_millis(20));
}

#[test]
fn separate_providers_are_limited_independently() {
    let interval = std::time::Duration::from_secs(5);
    let requests = requests_of_a_single_provider(RateLimits {
        geocoding: interval,
        city_lookup: interval,
        postal_codes: interval,
        city_lookup_on_geocoder: false,
    });
    assert_eq!(requests.len(), 2);
    assert!(requests[1] - requests[0] < std::time::Duration::from_secs(1));
}

/// The index file gets unreadable after the first read.
#[derive(Default)]
struct ChangingIndex {
    reads: std::cell::Cell<usize>,
}

impl AddressIndex for ChangingIndex {
    fn read_address_index(
        &self,
    ) -> Result<AddressIndexSnapshot, doorlist_core::repositories::Error> {
        self.reads.set(self.reads.get() + 1);
        if self.reads.get() > 1 {
            return Err(doorlist_core::repositories::Error::Decode(
                "changed meanwhile".into(),
            ));
        }
        Ok(AddressIndexSnapshot::default())
    }
}

#[test]
fn merge_into_the_snapshot_of_the_import() {
    let index = ChangingIndex::default();
    let geocoder = FakeGeocoder::default();
    let (report, merged) =
        import_csv_and_merge(ROUTE, &ImportOptions::default(), &context(&index, &geocoder))
            .unwrap();
    assert_eq!(index.reads.get(), 1);
    assert_eq!(report.addresses.len(), 3);
    assert_eq!(merged.len(), 3);
    assert!(report.addresses.iter().all(|a| merged.contains_key(&a.key)));
}
