use super::{prelude::*, ParsedAddress};
use std::collections::HashMap;

/// Positions closer than this are considered equal.
const MAX_COORDINATE_DEVIATION: Distance = Distance::from_meters(1.0);

/// New units for an address that is already persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitAddition {
    pub key: AddressKey,
    pub existing_id: Option<String>,
    pub units: Vec<Unit>,
}

/// A duplicate row disagrees with the first row of its address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateConflict {
    pub key: AddressKey,
    pub line: u64,
    pub field: AddressField,
    pub kept: String,
    pub discarded: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    /// Addresses that are not yet persisted, in order of first appearance.
    pub addresses: Vec<Address>,
    pub unit_additions: Vec<UnitAddition>,
    pub conflicts: Vec<DuplicateConflict>,
}

/// Merge all rows with the same key into a single address.
///
/// Every row contributes `we_count` units. The address fields
/// are taken from the first row of each key.
pub fn aggregate_units<'a, I>(rows: I, index: &AddressIndexSnapshot) -> Aggregation
where
    I: IntoIterator<Item = &'a ParsedAddress>,
{
    let mut addresses: Vec<Address> = vec![];
    let mut positions: HashMap<AddressKey, usize> = HashMap::new();
    let mut conflicts = vec![];

    for row in rows {
        let units = (0..row.we_count).map(|_| row.unit());
        match positions.get(&row.key) {
            Some(&pos) => {
                let addr = &mut addresses[pos];
                conflicts.extend(address_conflicts(addr, row));
                addr.units.extend(units);
            }
            None => {
                positions.insert(row.key.clone(), addresses.len());
                let mut addr = new_address(row);
                addr.units.extend(units);
                addresses.push(addr);
            }
        }
    }
    for c in &conflicts {
        log::warn!(
            "Line {}: ignoring {} '{}' of {}, keeping '{}'",
            c.line,
            c.field,
            c.discarded,
            c.key,
            c.kept
        );
    }

    let mut aggregation = Aggregation {
        conflicts,
        ..Default::default()
    };
    for addr in addresses {
        match index.get(&addr.key) {
            Some(existing) => {
                let units = excess_units(&existing.units, addr.units);
                if units.is_empty() {
                    log::debug!("{} is already known", addr.key);
                    continue;
                }
                aggregation.unit_additions.push(UnitAddition {
                    key: addr.key,
                    existing_id: existing.id.clone(),
                    units,
                });
            }
            None => aggregation.addresses.push(addr),
        }
    }
    log::debug!(
        "Aggregated {} new addresses and {} unit additions",
        aggregation.addresses.len(),
        aggregation.unit_additions.len()
    );
    aggregation
}

fn new_address(row: &ParsedAddress) -> Address {
    Address {
        key: row.key.clone(),
        street: row.street.clone(),
        house_number: row.house_number.clone(),
        postal_code: row.postal_code.clone(),
        city: row.city.clone(),
        locality: row.locality.clone(),
        coordinates: row.coordinates,
        notiz: row.notiz_adresse.clone(),
        units: vec![],
    }
}

fn address_conflicts(addr: &Address, row: &ParsedAddress) -> Vec<DuplicateConflict> {
    use AddressField as F;

    let mut conflicts = vec![];
    let mut check = |field, kept: Option<&str>, discarded: Option<&str>| {
        let discarded = discarded.unwrap_or_default();
        let kept = kept.unwrap_or_default();
        if discarded.is_empty() || discarded == kept {
            return;
        }
        conflicts.push(DuplicateConflict {
            key: row.key.clone(),
            line: row.line,
            field,
            kept: kept.to_owned(),
            discarded: discarded.to_owned(),
        });
    };
    check(F::Street, Some(addr.street.as_str()), Some(row.street.as_str()));
    check(
        F::HouseNumber,
        Some(addr.house_number.as_str()),
        Some(row.house_number.as_str()),
    );
    check(
        F::PostalCode,
        Some(addr.postal_code.as_str()),
        Some(row.postal_code.as_str()),
    );
    check(F::City, Some(addr.city.as_str()), Some(row.city.as_str()));
    check(F::Locality, addr.locality.as_deref(), row.locality.as_deref());
    check(F::NotizAdresse, addr.notiz.as_deref(), row.notiz_adresse.as_deref());

    if let Some(pos) = row.coordinates {
        let deviates = match addr.coordinates {
            Some(kept_pos) => MapPoint::distance(kept_pos, pos)
                .map(|d| d > MAX_COORDINATE_DEVIATION)
                .unwrap_or(true),
            None => true,
        };
        if deviates {
            let kept_pos = addr.coordinates.map(|p| p.to_string());
            let discarded_pos = pos.to_string();
            check(F::Latitude, kept_pos.as_deref(), Some(discarded_pos.as_str()));
        }
    }
    conflicts
}

// Persisted units are matched by floor and position, regardless of their order.
fn excess_units(persisted: &[Unit], imported: Vec<Unit>) -> Vec<Unit> {
    let mut remaining: HashMap<UnitSignature, usize> = HashMap::new();
    for unit in persisted {
        *remaining.entry(unit.signature()).or_default() += 1;
    }
    imported
        .into_iter()
        .filter(|unit| match remaining.get_mut(&unit.signature()) {
            Some(count) if *count > 0 => {
                *count -= 1;
                false
            }
            _ => true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::validate_row;
    use AddressField as F;

    fn row(line: u64, street: &str, nr: &str) -> RawRow {
        RawRow::new(line)
            .with(F::Street, street)
            .with(F::HouseNumber, nr)
            .with(F::PostalCode, "80331")
            .with(F::City, "München")
    }

    fn parse(rows: Vec<RawRow>) -> Vec<ParsedAddress> {
        rows.iter().map(|r| validate_row(r).address).collect()
    }

    fn index_of(addresses: &[Address]) -> AddressIndexSnapshot {
        addresses
            .iter()
            .cloned()
            .map(|addr| (addr.key.clone(), AddressSummary::from(addr)))
            .collect()
    }

    #[test]
    fn aggregate_rows_of_the_same_address_in_file_order() {
        let rows = parse(vec![
            row(2, "Hauptstraße", "1").with(F::Etage, "EG"),
            row(3, "Nebenweg", "2"),
            row(4, " hauptstrasse ", "1").with(F::Etage, "1. OG"),
            row(5, "Hauptstr.", "1").with(F::Etage, "2. OG").with(F::WeCount, "2"),
        ]);
        let aggr = aggregate_units(&rows, &Default::default());
        assert_eq!(aggr.addresses.len(), 2);
        let addr = &aggr.addresses[0];
        assert_eq!(addr.street, "Hauptstraße");
        let floors: Vec<_> = addr.units.iter().map(|u| u.etage.as_deref().unwrap()).collect();
        assert_eq!(floors, vec!["EG", "1. OG", "2. OG", "2. OG"]);
        assert_eq!(aggr.addresses[1].units.len(), 1);
        // Differing spellings of the street are reported
        let lines: Vec<_> = aggr.conflicts.iter().map(|c| (c.line, c.field)).collect();
        assert_eq!(lines, vec![(4, F::Street), (5, F::Street)]);
        assert_eq!(aggr.conflicts[0].kept, "Hauptstraße");
        assert_eq!(aggr.conflicts[0].discarded, "hauptstrasse");
    }

    #[test]
    fn we_count_creates_units() {
        let rows = parse(vec![row(2, "Hauptstraße", "1")
            .with(F::WeCount, "3")
            .with(F::Status, "Interesse")]);
        let aggr = aggregate_units(&rows, &Default::default());
        let units = &aggr.addresses[0].units;
        assert_eq!(units.len(), 3);
        assert!(units.iter().all(|u| u.status == UnitStatus::Interested));
    }

    #[test]
    fn first_value_wins() {
        let rows = parse(vec![
            row(2, "Hauptstraße", "1")
                .with(F::Latitude, "48.137")
                .with(F::Longitude, "11.575"),
            row(3, "Hauptstraße", "1")
                .with(F::Locality, "Altstadt")
                .with(F::Latitude, "48.13700001")
                .with(F::Longitude, "11.575"),
            row(4, "Hauptstraße", "1")
                .with(F::Latitude, "48.2")
                .with(F::Longitude, "11.6")
                .with(F::NotizAdresse, "Hinterhaus"),
        ]);
        let aggr = aggregate_units(&rows, &Default::default());
        let addr = &aggr.addresses[0];
        assert_eq!(addr.locality, None);
        assert_eq!(addr.notiz, None);
        assert_eq!(addr.coordinates, rows[0].coordinates);
        let fields: Vec<_> = aggr.conflicts.iter().map(|c| (c.line, c.field)).collect();
        assert_eq!(
            fields,
            vec![(3, F::Locality), (4, F::NotizAdresse), (4, F::Latitude)]
        );
    }

    #[test]
    fn reimport_converges() {
        let rows = parse(vec![
            row(2, "Hauptstraße", "1").with(F::WeCount, "2"),
            row(3, "Nebenweg", "2"),
        ]);
        let first = aggregate_units(&rows, &Default::default());
        assert_eq!(first.addresses.len(), 2);

        let index = index_of(&first.addresses);
        let second = aggregate_units(&rows, &index);
        assert!(second.addresses.is_empty());
        assert!(second.unit_additions.is_empty());
    }

    #[test]
    fn add_only_new_units_to_persisted_addresses() {
        let first = aggregate_units(
            &parse(vec![row(2, "Hauptstraße", "1").with(F::Etage, "EG")]),
            &Default::default(),
        );
        let mut index = index_of(&first.addresses);
        index.values_mut().for_each(|s| s.id = Some("42".into()));

        let rows = parse(vec![
            row(2, "Hauptstraße", "1").with(F::Etage, "eg"),
            row(3, "Hauptstraße", "1").with(F::Etage, "EG"),
            row(4, "Hauptstraße", "1").with(F::Etage, "1. OG"),
        ]);
        let aggr = aggregate_units(&rows, &index);
        assert!(aggr.addresses.is_empty());
        assert_eq!(aggr.unit_additions.len(), 1);
        let addition = &aggr.unit_additions[0];
        assert_eq!(addition.existing_id.as_deref(), Some("42"));
        let floors: Vec<_> = addition
            .units
            .iter()
            .map(|u| u.etage.as_deref().unwrap())
            .collect();
        assert_eq!(floors, vec!["EG", "1. OG"]);
    }
}
