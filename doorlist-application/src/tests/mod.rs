mod import;

pub mod prelude {
    use std::cell::RefCell;

    pub use crate::prelude::*;
    pub use doorlist_core::{
        entities::*,
        gateways::{city::*, geocode::*},
        repositories::*,
        usecases::{AddressField, GeocodeFailureReason},
        util::cancel::CancelToken,
    };

    /// Locates every address in the middle of Bielefeld,
    /// except for the streets that are registered as unknown.
    #[derive(Default)]
    pub struct FakeGeocoder {
        pub unknown_streets: Vec<String>,
        pub requests: RefCell<Vec<String>>,
    }

    impl GeoCodingGateway for FakeGeocoder {
        fn geocode_address(&self, addr: &AddressQuery) -> anyhow::Result<GeocodeResult> {
            self.requests.borrow_mut().push(addr.street.to_owned());
            if self.unknown_streets.iter().any(|s| s == addr.street) {
                return Ok(GeocodeResult::default());
            }
            Ok(GeocodeResult {
                coordinates: Some(MapPoint::from_lat_lng_deg(52.0211, 8.5325)),
                display_name: Some(format!("{} {}, {}", addr.street, addr.house_number, addr.city)),
                error: None,
            })
        }
    }

    pub struct FakeCityLookup;

    impl CityLookupGateway for FakeCityLookup {
        fn lookup_city_candidates(&self, city: &str, _: usize) -> anyhow::Result<Vec<CityCandidate>> {
            if city != "Berlin" {
                anyhow::bail!("Unknown city {city}");
            }
            Ok(vec![CityCandidate {
                city: "Berlin".into(),
                state: Some("Berlin".into()),
                coordinates: Some(MapPoint::from_lat_lng_deg(52.517, 13.389)),
                postal_code: Some("10117".into()),
            }])
        }
    }

    pub struct FakeDirectory;

    impl PostalCodeDirectory for FakeDirectory {
        fn lookup_postal_codes(&self, _: &str, city: &str) -> anyhow::Result<Vec<String>> {
            if city == "Berlin" {
                Ok(vec!["10115".into(), "12345".into(), "12349".into()])
            } else {
                Ok(vec![])
            }
        }
    }

    pub fn context<'a>(
        index: &'a dyn AddressIndex,
        geocoder: &'a FakeGeocoder,
    ) -> ImportContext<'a> {
        ImportContext {
            index,
            geocoder: Some(geocoder),
            city_lookup: Some(&FakeCityLookup),
            postal_codes: Some(&FakeDirectory),
            rate_limits: RateLimits::default(),
            cancel: CancelToken::new(),
        }
    }
}
