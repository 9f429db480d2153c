use anyhow::Result;
use doorlist_boundary as json;
use doorlist_core::{
    entities::AddressSummary,
    repositories::{self, AddressIndex, AddressIndexSnapshot},
    util::normalize::normalize,
};
use std::{
    collections::hash_map::Entry,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

/// The inventory of persisted addresses as a JSON file.
///
/// The keys are always derived from the stored fields.
#[derive(Debug, Clone)]
pub struct JsonFileIndex {
    path: PathBuf,
}

impl JsonFileIndex {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, snapshot: &AddressIndexSnapshot) -> Result<()> {
        let mut records: Vec<_> = snapshot.iter().collect();
        records.sort_by(|(a, _), (b, _)| a.cmp(b));
        let records: Vec<json::AddressSummary> = records
            .into_iter()
            .map(|(_, summary)| summary.clone().into())
            .collect();
        let json = serde_json::to_string_pretty(&records)?;
        fs::write(&self.path, json)?;
        log::info!(
            "Wrote {} addresses to {}",
            records.len(),
            self.path.display()
        );
        Ok(())
    }
}

impl AddressIndex for JsonFileIndex {
    fn read_address_index(&self) -> Result<AddressIndexSnapshot, repositories::Error> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::info!("{} not found => no addresses are known", self.path.display());
                return Ok(Default::default());
            }
            Err(err) => return Err(err.into()),
        };
        let records: Vec<json::AddressSummary> = serde_json::from_str(&json)
            .map_err(|err| repositories::Error::Decode(err.to_string()))?;
        snapshot_from_records(records)
    }
}

fn snapshot_from_records(
    records: Vec<json::AddressSummary>,
) -> Result<AddressIndexSnapshot, repositories::Error> {
    let mut snapshot = AddressIndexSnapshot::with_capacity(records.len());
    for record in records {
        let summary = AddressSummary::try_from(record)
            .map_err(|err| repositories::Error::Decode(err.to_string()))?;
        let key = normalize(
            &summary.street,
            &summary.house_number,
            &summary.postal_code,
            &summary.city,
        );
        match snapshot.entry(key) {
            Entry::Occupied(entry) => {
                log::warn!("Ignoring duplicate record of address '{}'", entry.key());
            }
            Entry::Vacant(entry) => {
                entry.insert(summary);
            }
        }
    }
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use doorlist_core::entities::{MapPoint, Unit};
    use std::env;

    fn temp_file(name: &str) -> PathBuf {
        env::temp_dir().join(format!("doorlist-{}-{name}.json", std::process::id()))
    }

    #[test]
    fn missing_file_is_an_empty_index() {
        let index = JsonFileIndex::new(temp_file("missing"));
        assert!(index.read_address_index().unwrap().is_empty());
    }

    #[test]
    fn keys_are_derived_from_the_fields() {
        let records: Vec<json::AddressSummary> = serde_json::from_str(
            r#"[
                { "id": "a1", "street": "Niederwall", "houseNumber": "1", "postalCode": "33602", "city": "Bielefeld",
                  "coordinates": { "lat": 52.0211, "lng": 8.5325 },
                  "units": [ { "status": "written", "etage": "EG" } ] },
                { "street": "Hauptstr.", "houseNumber": "2 a", "postalCode": "12345", "city": "Köln" },
                { "id": "a3", "street": "niederwall ", "houseNumber": "1", "postalCode": "33602", "city": "BIELEFELD" }
            ]"#,
        )
        .unwrap();
        let snapshot = snapshot_from_records(records).unwrap();
        assert_eq!(snapshot.len(), 2);
        let first = &snapshot[&normalize("Niederwall", "1", "33602", "Bielefeld")];
        assert_eq!(first.id.as_deref(), Some("a1"));
        assert_eq!(first.units.len(), 1);
        assert!(first.coordinates.is_some());
        let second = &snapshot[&normalize("Hauptstraße", "2A", "12345", "KÖLN")];
        assert!(second.units.is_empty());
    }

    #[test]
    fn reject_invalid_records() {
        let records: Vec<json::AddressSummary> = serde_json::from_str(
            r#"[{ "street": "A", "houseNumber": "1", "postalCode": "12345", "city": "B",
                  "coordinates": { "lat": 120.0, "lng": 8.0 } }]"#,
        )
        .unwrap();
        assert!(matches!(
            snapshot_from_records(records),
            Err(repositories::Error::Decode(_))
        ));

        let path = temp_file("broken");
        fs::write(&path, "{").unwrap();
        let res = JsonFileIndex::new(&path).read_address_index();
        fs::remove_file(&path).unwrap();
        assert!(matches!(res, Err(repositories::Error::Decode(_))));
    }

    #[test]
    fn write_and_read_again() {
        let path = temp_file("written");
        let summary = AddressSummary {
            id: Some("x".into()),
            street: "Jahnplatz".into(),
            house_number: "5".into(),
            postal_code: "33602".into(),
            city: "Bielefeld".into(),
            coordinates: Some(MapPoint::from_lat_lng_deg(52.03, 8.53)),
            units: vec![Unit::default(), Unit::default()],
        };
        let key = normalize("Jahnplatz", "5", "33602", "Bielefeld");
        let snapshot: AddressIndexSnapshot = [(key.clone(), summary.clone())].into_iter().collect();
        let index = JsonFileIndex::new(&path);
        index.write(&snapshot).unwrap();
        let read = index.read_address_index().unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(read.len(), 1);
        assert_eq!(read[&key].units.len(), 2);
        assert_eq!(read[&key].id, summary.id);
    }
}
