// Read access to the inventory of already persisted addresses.
// Writing is the job of the persistence layer, the core only
// produces ready-to-persist records.

use crate::entities::*;
use std::{collections::HashMap, io};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("The address index could not be decoded: {0}")]
    Decode(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

type Result<T> = std::result::Result<T, Error>;

pub type AddressIndexSnapshot = HashMap<AddressKey, AddressSummary>;

pub trait AddressIndex {
    /// A consistent snapshot, taken once at the start of an import.
    fn read_address_index(&self) -> Result<AddressIndexSnapshot>;
}

/// No addresses have been persisted yet.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyAddressIndex;

impl AddressIndex for EmptyAddressIndex {
    fn read_address_index(&self) -> Result<AddressIndexSnapshot> {
        Ok(Default::default())
    }
}

impl AddressIndex for AddressIndexSnapshot {
    fn read_address_index(&self) -> Result<AddressIndexSnapshot> {
        Ok(self.clone())
    }
}
