pub trait Builder {
    type Build;
    fn build() -> Self::Build;
}

pub use self::{address_builder::*, city_candidate_builder::*};

pub mod address_builder {

    use super::*;
    use crate::{address::*, geo::*, unit::*};

    #[derive(Debug)]
    pub struct AddressBuild {
        addr: Address,
    }

    impl AddressBuild {
        pub fn key(mut self, key: &str) -> Self {
            self.addr.key = AddressKey::new_unchecked(key);
            self
        }
        pub fn street(mut self, x: &str) -> Self {
            self.addr.street = x.into();
            self
        }
        pub fn house_number(mut self, x: &str) -> Self {
            self.addr.house_number = x.into();
            self
        }
        pub fn postal_code(mut self, x: &str) -> Self {
            self.addr.postal_code = x.into();
            self
        }
        pub fn city(mut self, x: &str) -> Self {
            self.addr.city = x.into();
            self
        }
        pub fn locality(mut self, x: &str) -> Self {
            self.addr.locality = Some(x.into());
            self
        }
        pub fn pos(mut self, pos: MapPoint) -> Self {
            self.addr.coordinates = Some(pos);
            self
        }
        pub fn units(mut self, units: Vec<Unit>) -> Self {
            self.addr.units = units;
            self
        }
        pub fn finish(self) -> Address {
            self.addr
        }
    }

    impl Builder for Address {
        type Build = AddressBuild;
        fn build() -> Self::Build {
            AddressBuild {
                addr: Address {
                    key: AddressKey::new_unchecked(""),
                    street: Default::default(),
                    house_number: Default::default(),
                    postal_code: Default::default(),
                    city: Default::default(),
                    locality: None,
                    coordinates: None,
                    notiz: None,
                    units: vec![Unit::default()],
                },
            }
        }
    }

    #[test]
    fn default_address_has_one_unit() {
        let addr = Address::build().street("Hauptstraße").finish();
        assert_eq!(addr.units.len(), 1);
        assert_eq!(addr.street, "Hauptstraße");
        assert!(!addr.is_located());
    }
}

pub mod city_candidate_builder {

    use super::*;
    use crate::{city::*, geo::*};

    #[derive(Debug)]
    pub struct CityCandidateBuild {
        candidate: CityCandidate,
    }

    impl CityCandidateBuild {
        pub fn city(mut self, x: &str) -> Self {
            self.candidate.city = x.into();
            self
        }
        pub fn state(mut self, x: &str) -> Self {
            self.candidate.state = Some(x.into());
            self
        }
        pub fn pos(mut self, pos: MapPoint) -> Self {
            self.candidate.coordinates = Some(pos);
            self
        }
        pub fn postal_code(mut self, x: &str) -> Self {
            self.candidate.postal_code = Some(x.into());
            self
        }
        pub fn finish(self) -> CityCandidate {
            self.candidate
        }
    }

    impl Builder for CityCandidate {
        type Build = CityCandidateBuild;
        fn build() -> Self::Build {
            CityCandidateBuild {
                candidate: CityCandidate::default(),
            }
        }
    }
}
