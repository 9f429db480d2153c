use anyhow::Result;
use doorlist_core::gateways::city::PostalCodeDirectory;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://openplzapi.org";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const PAGE_SIZE: usize = 50;
const MAX_PAGES: usize = 20;

/// The postal code directory of <https://www.openplzapi.org>.
#[derive(Debug, Clone)]
pub struct OpenPlz {
    client: Client,
    base_url: String,
}

impl OpenPlz {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("doorlist/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Ok(Self { client, base_url })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Locality {
    postal_code: String,
    name: String,
    federal_state: FederalState,
}

#[derive(Debug, Deserialize)]
struct FederalState {
    name: String,
}

#[derive(Debug, Deserialize, thiserror::Error)]
#[error("{title}")]
struct JsonError {
    title: String,
}

impl OpenPlz {
    fn fetch_localities(&self, city: &str, page: usize) -> Result<Vec<Locality>> {
        let url = format!("{}/de/Localities", self.base_url);
        let page = page.to_string();
        let page_size = PAGE_SIZE.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("name", city),
                ("page", page.as_str()),
                ("pageSize", page_size.as_str()),
            ])
            .send()?;
        if !response.status().is_success() {
            let status = response.status();
            let json_error: JsonError = response
                .json()
                .map_err(|_| anyhow::anyhow!("OpenPLZ responded with {status}"))?;
            return Err(json_error.into());
        }
        Ok(response.json()?)
    }
}

impl PostalCodeDirectory for OpenPlz {
    fn lookup_postal_codes(&self, state: &str, city: &str) -> Result<Vec<String>> {
        let localities = all_pages(|page| self.fetch_localities(city, page))?;
        log::debug!("OpenPLZ found {} localities named '{city}'", localities.len());
        Ok(postal_codes_of(localities, state, city))
    }
}

// Pages are counted from 1, a short page is the last one.
fn all_pages<T>(mut fetch_page: impl FnMut(usize) -> Result<Vec<T>>) -> Result<Vec<T>> {
    let mut items = vec![];
    for page in 1..=MAX_PAGES {
        let mut page_items = fetch_page(page)?;
        let last = page_items.len() < PAGE_SIZE;
        items.append(&mut page_items);
        if last {
            return Ok(items);
        }
    }
    log::warn!("Stopped reading OpenPLZ results after {MAX_PAGES} pages");
    Ok(items)
}

// The name search also returns localities of other states.
fn postal_codes_of(localities: Vec<Locality>, state: &str, city: &str) -> Vec<String> {
    let same_name = |a: &str, b: &str| a.trim().to_lowercase() == b.trim().to_lowercase();
    let mut codes: Vec<_> = localities
        .into_iter()
        .filter(|l| same_name(&l.federal_state.name, state) && same_name(&l.name, city))
        .map(|l| l.postal_code)
        .collect();
    codes.sort();
    codes.dedup();
    codes
}
