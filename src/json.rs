//! Conversions of import results into their JSON representation.

use doorlist_application::prelude as app;
use doorlist_boundary as json;
use doorlist_core::usecases as uc;

pub fn import_report(from: app::ImportReport) -> json::ImportReport {
    let app::ImportReport {
        addresses,
        unit_additions,
        parse_errors,
        errors,
        warnings,
        city_lookup_failures,
        geocode_failures,
        stats,
        cancelled,
    } = from;
    json::ImportReport {
        addresses: addresses.into_iter().map(Into::into).collect(),
        unit_additions: unit_additions.into_iter().map(unit_addition).collect(),
        parse_errors: parse_errors.into_iter().map(parse_error).collect(),
        errors: errors.into_iter().map(validation_error).collect(),
        warnings: warnings.into_iter().map(duplicate_conflict).collect(),
        city_lookup_failures: city_lookup_failures
            .into_iter()
            .map(city_lookup_failure)
            .collect(),
        geocode_failures: geocode_failures.into_iter().map(geocode_failure).collect(),
        stats: import_stats(stats),
        cancelled,
    }
}

fn unit_addition(from: uc::UnitAddition) -> json::UnitAddition {
    let uc::UnitAddition {
        key,
        existing_id,
        units,
    } = from;
    json::UnitAddition {
        normalized_key: key.into(),
        existing_id,
        units: units.into_iter().map(Into::into).collect(),
    }
}

fn parse_error(from: app::ParseError) -> json::ParseError {
    let app::ParseError { line, message } = from;
    json::ParseError { line, message }
}

fn validation_error(from: uc::ValidationError) -> json::ValidationError {
    let uc::ValidationError {
        line,
        field,
        message,
        suggestion,
    } = from;
    json::ValidationError {
        line,
        field: field.to_string(),
        message,
        suggestion,
    }
}

fn duplicate_conflict(from: uc::DuplicateConflict) -> json::DuplicateConflict {
    let uc::DuplicateConflict {
        key,
        line,
        field,
        kept,
        discarded,
    } = from;
    json::DuplicateConflict {
        normalized_key: key.into(),
        line,
        field: field.to_string(),
        kept,
        discarded,
    }
}

fn city_lookup_failure(from: uc::CityLookupFailure) -> json::CityLookupFailure {
    let uc::CityLookupFailure { city, reason } = from;
    json::CityLookupFailure { city, reason }
}

fn geocode_failure(from: uc::GeocodeFailure) -> json::GeocodeFailure {
    let uc::GeocodeFailure { key, reason } = from;
    json::GeocodeFailure {
        normalized_key: key.into(),
        reason: reason.to_string(),
    }
}

fn import_stats(from: app::ImportStats) -> json::ImportStats {
    let app::ImportStats {
        parsed,
        skipped_invalid,
        skipped_geocode,
        geocoded,
        failed,
    } = from;
    json::ImportStats {
        parsed,
        skipped_invalid,
        skipped_geocode,
        geocoded,
        failed,
    }
}
