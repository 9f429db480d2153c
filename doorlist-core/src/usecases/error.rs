use crate::repositories;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("The city name is empty")]
    EmptyCityName,
    #[error("Failed to look up city '{city}': {cause}")]
    CityLookup { city: String, cause: anyhow::Error },
    #[error(transparent)]
    Repo(#[from] repositories::Error),
}
