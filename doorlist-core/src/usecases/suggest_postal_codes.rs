use super::{prelude::*, CityResolver, ValidatedRow};
use crate::text::{collapse_whitespace, common_prefix_len, fold_diacritics};
use std::collections::HashMap;

/// Only the best ranked candidate is considered.
const SUGGESTION_CANDIDATES: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityLookupFailure {
    pub city: String,
    pub reason: String,
}

/// Attach postal code suggestions to the postal code errors of all rows.
///
/// Each distinct city is looked up at most once.
/// The suggestions are never applied to the rows.
pub fn suggest_postal_codes(
    resolver: &CityResolver,
    rows: &mut [ValidatedRow],
    cancel: &CancelToken,
) -> Vec<CityLookupFailure> {
    let mut failures = vec![];
    let mut best_matches: HashMap<String, Option<CityMatch>> = HashMap::new();

    for row in rows.iter_mut() {
        if !needs_postal_code_suggestion(row) {
            continue;
        }
        let city = &row.address.city;
        let cache_key = fold_diacritics(&collapse_whitespace(city).to_lowercase());
        if !best_matches.contains_key(&cache_key) {
            if cancel.is_cancelled() {
                log::info!("Postal code suggestions cancelled");
                break;
            }
            let best_match = match resolver.resolve_city_candidates(city, SUGGESTION_CANDIDATES) {
                Ok(matches) => matches.into_iter().next(),
                Err(err) => {
                    log::warn!("No postal code suggestion for '{city}': {err}");
                    failures.push(CityLookupFailure {
                        city: city.clone(),
                        reason: err.to_string(),
                    });
                    None
                }
            };
            best_matches.insert(cache_key.clone(), best_match);
        }
        let Some(best_match) = best_matches.get(&cache_key).and_then(Option::as_ref) else {
            continue;
        };
        let given = row.address.postal_code.clone();
        let suggestion = closest_postal_code(&given, &best_match.postal_codes).map(str::to_owned);
        if let Some(err) = row
            .errors
            .iter_mut()
            .find(|err| err.field == AddressField::PostalCode)
        {
            err.suggestion = suggestion;
        }
    }
    failures
}

fn needs_postal_code_suggestion(row: &ValidatedRow) -> bool {
    let mut postal_code_invalid = false;
    for err in &row.errors {
        match err.field {
            // Without a valid city there is nothing to look up.
            AddressField::City => return false,
            AddressField::PostalCode => postal_code_invalid = err.suggestion.is_none(),
            _ => {}
        }
    }
    postal_code_invalid
}

/// The valid code that shares the longest prefix with the given one.
///
/// Ties are resolved by lexicographic order.
pub fn closest_postal_code<'a, I>(given: &str, codes: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a String>,
{
    let given: String = given.chars().filter(|c| !c.is_whitespace()).collect();
    let mut best: Option<(usize, &str)> = None;
    for code in codes {
        if !is_valid_postal_code(code) {
            continue;
        }
        let prefix_len = common_prefix_len(&given, code);
        best = match best {
            Some((best_len, best_code))
                if best_len > prefix_len || (best_len == prefix_len && best_code <= code.as_str()) =>
            {
                Some((best_len, best_code))
            }
            _ => Some((prefix_len, code.as_str())),
        };
    }
    best.map(|(_, code)| code)
}
