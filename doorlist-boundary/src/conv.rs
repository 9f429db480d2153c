use super::*;
use doorlist_entities as e;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Invalid coordinates: {lat},{lng}")]
    Coordinates { lat: f64, lng: f64 },
}

impl From<e::geo::MapPoint> for MapPoint {
    fn from(from: e::geo::MapPoint) -> Self {
        let (lat, lng) = from.to_lat_lng_deg();
        Self { lat, lng }
    }
}

impl TryFrom<MapPoint> for e::geo::MapPoint {
    type Error = ConversionError;

    fn try_from(from: MapPoint) -> Result<Self, Self::Error> {
        let MapPoint { lat, lng } = from;
        e::geo::MapPoint::try_from_lat_lng_deg(lat, lng)
            .ok_or(ConversionError::Coordinates { lat, lng })
    }
}

impl From<e::unit::UnitStatus> for UnitStatus {
    fn from(from: e::unit::UnitStatus) -> Self {
        use e::unit::UnitStatus as E;
        match from {
            E::NotProcessed => Self::NotProcessed,
            E::NotReached => Self::NotReached,
            E::NotInterested => Self::NotInterested,
            E::Interested => Self::Interested,
            E::Written => Self::Written,
        }
    }
}

impl From<UnitStatus> for e::unit::UnitStatus {
    fn from(from: UnitStatus) -> Self {
        use UnitStatus as B;
        match from {
            B::NotProcessed => Self::NotProcessed,
            B::NotReached => Self::NotReached,
            B::NotInterested => Self::NotInterested,
            B::Interested => Self::Interested,
            B::Written => Self::Written,
        }
    }
}

impl From<e::unit::Unit> for Unit {
    fn from(from: e::unit::Unit) -> Self {
        let e::unit::Unit {
            status,
            etage,
            lage,
            notiz,
        } = from;
        Self {
            status: status.into(),
            etage,
            lage,
            notiz,
        }
    }
}

impl From<Unit> for e::unit::Unit {
    fn from(from: Unit) -> Self {
        let Unit {
            status,
            etage,
            lage,
            notiz,
        } = from;
        Self {
            status: status.into(),
            etage,
            lage,
            notiz,
        }
    }
}

impl From<e::address::Address> for Address {
    fn from(from: e::address::Address) -> Self {
        let e::address::Address {
            key,
            street,
            house_number,
            postal_code,
            city,
            locality,
            coordinates,
            notiz,
            units,
        } = from;
        Self {
            normalized_key: key.into(),
            street,
            house_number,
            postal_code,
            city,
            locality,
            coordinates: coordinates.map(Into::into),
            notiz,
            units: units.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<e::address::AddressSummary> for AddressSummary {
    fn from(from: e::address::AddressSummary) -> Self {
        let e::address::AddressSummary {
            id,
            street,
            house_number,
            postal_code,
            city,
            coordinates,
            units,
        } = from;
        Self {
            id,
            street,
            house_number,
            postal_code,
            city,
            coordinates: coordinates.map(Into::into),
            units: units.into_iter().map(Into::into).collect(),
        }
    }
}

impl TryFrom<AddressSummary> for e::address::AddressSummary {
    type Error = ConversionError;

    fn try_from(from: AddressSummary) -> Result<Self, Self::Error> {
        let AddressSummary {
            id,
            street,
            house_number,
            postal_code,
            city,
            coordinates,
            units,
        } = from;
        Ok(Self {
            id,
            street,
            house_number,
            postal_code,
            city,
            coordinates: coordinates.map(e::geo::MapPoint::try_from).transpose()?,
            units: units.into_iter().map(Into::into).collect(),
        })
    }
}

impl From<e::city::CityMatch> for CityMatch {
    fn from(from: e::city::CityMatch) -> Self {
        let e::city::CityMatch {
            city,
            state,
            coordinates,
            postal_codes,
        } = from;
        Self {
            city,
            state,
            coordinates: coordinates.map(Into::into),
            postal_codes: postal_codes.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_summary_from_json() {
        let json = r#"{
            "id": "a1",
            "street": "Niederwall",
            "houseNumber": "1",
            "postalCode": "33602",
            "city": "Bielefeld",
            "coordinates": { "lat": 52.0211, "lng": 8.5325 },
            "units": [{ "status": "interested", "etage": "EG" }, {}]
        }"#;
        let summary: AddressSummary = serde_json::from_str(json).unwrap();
        let summary = e::address::AddressSummary::try_from(summary).unwrap();
        assert_eq!(summary.id.as_deref(), Some("a1"));
        assert_eq!(summary.house_number, "1");
        assert!(summary.coordinates.unwrap().is_located());
        assert_eq!(summary.units.len(), 2);
        assert_eq!(summary.units[0].status, e::unit::UnitStatus::Interested);
        assert_eq!(summary.units[1].status, e::unit::UnitStatus::NotProcessed);
    }

    #[test]
    fn reject_invalid_coordinates() {
        let summary = AddressSummary {
            id: None,
            street: "A".into(),
            house_number: "1".into(),
            postal_code: "12345".into(),
            city: "B".into(),
            coordinates: Some(MapPoint {
                lat: 91.0,
                lng: 8.0,
            }),
            units: vec![],
        };
        assert!(e::address::AddressSummary::try_from(summary).is_err());
    }

    #[test]
    fn address_to_json() {
        let addr = e::address::Address {
            key: e::address::AddressKey::new_unchecked("niederwall|1|33602|bielefeld"),
            street: "Niederwall".into(),
            house_number: "1".into(),
            postal_code: "33602".into(),
            city: "Bielefeld".into(),
            locality: None,
            coordinates: None,
            notiz: None,
            units: vec![e::unit::Unit::default()],
        };
        let json = serde_json::to_value(Address::from(addr)).unwrap();
        assert_eq!(json["normalizedKey"], "niederwall|1|33602|bielefeld");
        assert_eq!(json["houseNumber"], "1");
        assert!(json["coordinates"].is_null());
        assert!(json.get("locality").is_none());
        assert_eq!(json["units"][0]["status"], "not-processed");
    }
}
