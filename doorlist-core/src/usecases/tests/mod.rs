use super::{prelude::*, CityResolver};
use anyhow::anyhow;
use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    time::Instant,
};

#[derive(Default)]
pub struct MockCityLookup {
    candidates: HashMap<String, Vec<CityCandidate>>,
    fail: bool,
    limits: RefCell<Vec<usize>>,
}

impl MockCityLookup {
    pub fn with(mut self, city: &str, candidates: Vec<CityCandidate>) -> Self {
        self.candidates.insert(city.to_lowercase(), candidates);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// The limits of all requests so far.
    pub fn limits(&self) -> Vec<usize> {
        self.limits.borrow().clone()
    }
}

impl CityLookupGateway for MockCityLookup {
    fn lookup_city_candidates(&self, city: &str, limit: usize) -> anyhow::Result<Vec<CityCandidate>> {
        self.limits.borrow_mut().push(limit);
        if self.fail {
            return Err(anyhow!("Service unavailable"));
        }
        Ok(self
            .candidates
            .get(&city.trim().to_lowercase())
            .cloned()
            .unwrap_or_default())
    }
}

#[derive(Default)]
pub struct MockPostalCodeDirectory {
    codes: HashMap<(String, String), Vec<String>>,
    failing_states: HashSet<String>,
    calls: RefCell<Vec<(String, String)>>,
}

impl MockPostalCodeDirectory {
    pub fn with(mut self, state: &str, city: &str, codes: &[&str]) -> Self {
        self.codes.insert(
            (state.into(), city.into()),
            codes.iter().map(|c| c.to_string()).collect(),
        );
        self
    }

    pub fn failing(mut self, state: &str) -> Self {
        self.failing_states.insert(state.into());
        self
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.borrow().clone()
    }
}

impl PostalCodeDirectory for MockPostalCodeDirectory {
    fn lookup_postal_codes(&self, state: &str, city: &str) -> anyhow::Result<Vec<String>> {
        self.calls.borrow_mut().push((state.into(), city.into()));
        if self.failing_states.contains(state) {
            return Err(anyhow!("Timeout"));
        }
        Ok(self
            .codes
            .get(&(state.to_owned(), city.to_owned()))
            .cloned()
            .unwrap_or_default())
    }
}

pub fn resolver<'a>(
    city_lookup: &'a MockCityLookup,
    postal_codes: &'a MockPostalCodeDirectory,
    limiter: &'a RateLimiter,
) -> CityResolver<'a> {
    CityResolver {
        city_lookup,
        city_lookup_limiter: limiter,
        postal_codes,
        postal_codes_limiter: limiter,
    }
}

pub enum MockGeocodeOutcome {
    Found(MapPoint),
    NotFound,
    Reported(String),
    Failed(String),
}

/// Answers every request with a fixed position unless
/// a different outcome is registered for the n-th call.
pub struct MockGeocoder {
    pos: MapPoint,
    outcomes: HashMap<usize, MockGeocodeOutcome>,
    calls: RefCell<Vec<(String, Instant)>>,
    cancel: Option<(usize, CancelToken)>,
}

impl Default for MockGeocoder {
    fn default() -> Self {
        Self {
            pos: MapPoint::from_lat_lng_deg(48.137, 11.575),
            outcomes: Default::default(),
            calls: Default::default(),
            cancel: None,
        }
    }
}

impl MockGeocoder {
    /// `call` is 1-based.
    pub fn on_call(mut self, call: usize, outcome: MockGeocodeOutcome) -> Self {
        self.outcomes.insert(call, outcome);
        self
    }

    /// Trigger the token during the n-th call.
    pub fn cancel_on_call(mut self, call: usize, token: CancelToken) -> Self {
        self.cancel = Some((call, token));
        self
    }

    /// The streets of all requests.
    pub fn streets(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(s, _)| s.clone()).collect()
    }

    pub fn call_times(&self) -> Vec<Instant> {
        self.calls.borrow().iter().map(|(_, t)| *t).collect()
    }
}

impl GeoCodingGateway for MockGeocoder {
    fn geocode_address(&self, addr: &AddressQuery) -> anyhow::Result<GeocodeResult> {
        self.calls
            .borrow_mut()
            .push((addr.street.to_owned(), Instant::now()));
        let call = self.calls.borrow().len();
        if let Some((n, token)) = &self.cancel {
            if *n == call {
                token.cancel();
            }
        }
        let found = |pos: MapPoint| GeocodeResult {
            coordinates: Some(pos),
            display_name: Some(format!("{} {}", addr.street, addr.house_number)),
            error: None,
        };
        match self.outcomes.get(&call) {
            None => Ok(found(self.pos)),
            Some(MockGeocodeOutcome::Found(pos)) => Ok(found(*pos)),
            Some(MockGeocodeOutcome::NotFound) => Ok(GeocodeResult::default()),
            Some(MockGeocodeOutcome::Reported(msg)) => Ok(GeocodeResult {
                error: Some(msg.clone()),
                ..Default::default()
            }),
            Some(MockGeocodeOutcome::Failed(msg)) => Err(anyhow!("{msg}")),
        }
    }
}
