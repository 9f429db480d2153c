mod aggregate_units;
mod enrich_coordinates;
mod error;
mod raw_row;
mod resolve_city_candidates;
mod suggest_postal_codes;
mod validate_rows;

#[cfg(test)]
pub mod tests;

pub use self::{
    aggregate_units::*, enrich_coordinates::*, error::Error, raw_row::*,
    resolve_city_candidates::*, suggest_postal_codes::*, validate_rows::*,
};

mod prelude {
    pub use super::error::Error;
    pub type Result<T> = std::result::Result<T, Error>;
    pub use super::raw_row::*;
    pub use crate::{
        entities::*,
        gateways::{city::*, geocode::*},
        repositories::*,
        util::{cancel::CancelToken, throttle::RateLimiter, validate::is_valid_postal_code},
    };
}
