use duration_str::deserialize_option_duration;
use serde::Deserialize;
use std::{collections::HashMap, path::PathBuf, time::Duration};

const DEFAULT_CONFIG_FILE: &str = include_str!("doorlist.default.toml");

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub import: Option<Import>,
    pub geocoding: Option<Geocoding>,
    pub postal_codes: Option<PostalCodes>,
    pub index: Option<Index>,
    pub gateway: Option<Gateway>,
}

impl Config {
    pub fn embedded_default() -> Result<Self, toml::de::Error> {
        toml::from_str(DEFAULT_CONFIG_FILE)
    }

    /// Fill everything that is missing with the values of `defaults`.
    pub fn or(self, defaults: Self) -> Self {
        Self {
            import: merge(self.import, defaults.import, Import::or),
            geocoding: merge(self.geocoding, defaults.geocoding, Geocoding::or),
            postal_codes: merge(self.postal_codes, defaults.postal_codes, PostalCodes::or),
            index: merge(self.index, defaults.index, Index::or),
            gateway: merge(self.gateway, defaults.gateway, Gateway::or),
        }
    }
}

fn merge<T>(section: Option<T>, defaults: Option<T>, or: fn(T, T) -> T) -> Option<T> {
    match (section, defaults) {
        (Some(s), Some(d)) => Some(or(s, d)),
        (s, d) => s.or(d),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Import {
    pub delimiter: Option<String>,
    pub country: Option<String>,
    pub suggest_postal_codes: Option<bool>,
    pub invalid_rows: Option<String>,
    pub header_aliases: Option<HashMap<String, Vec<String>>>,
}

impl Import {
    fn or(self, d: Self) -> Self {
        Self {
            delimiter: self.delimiter.or(d.delimiter),
            country: self.country.or(d.country),
            suggest_postal_codes: self.suggest_postal_codes.or(d.suggest_postal_codes),
            invalid_rows: self.invalid_rows.or(d.invalid_rows),
            header_aliases: self.header_aliases.or(d.header_aliases),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Geocoding {
    pub gateway: Option<GeocodingGateway>,
    #[serde(default, deserialize_with = "deserialize_option_duration")]
    pub min_interval: Option<Duration>,
    #[serde(default, deserialize_with = "deserialize_option_duration")]
    pub timeout: Option<Duration>,
}

impl Geocoding {
    fn or(self, d: Self) -> Self {
        Self {
            gateway: self.gateway.or(d.gateway),
            min_interval: self.min_interval.or(d.min_interval),
            timeout: self.timeout.or(d.timeout),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeocodingGateway {
    Opencage,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PostalCodes {
    pub gateway: Option<PostalCodeGateway>,
    #[serde(default, deserialize_with = "deserialize_option_duration")]
    pub min_interval: Option<Duration>,
    #[serde(default, deserialize_with = "deserialize_option_duration")]
    pub timeout: Option<Duration>,
}

impl PostalCodes {
    fn or(self, d: Self) -> Self {
        Self {
            gateway: self.gateway.or(d.gateway),
            min_interval: self.min_interval.or(d.min_interval),
            timeout: self.timeout.or(d.timeout),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PostalCodeGateway {
    Openplz,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Index {
    pub file: Option<PathBuf>,
}

impl Index {
    fn or(self, d: Self) -> Self {
        Self {
            file: self.file.or(d.file),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Gateway {
    pub opencage: Option<OpenCage>,
    pub openplz: Option<OpenPlz>,
}

impl Gateway {
    fn or(self, d: Self) -> Self {
        Self {
            opencage: self.opencage.or(d.opencage),
            openplz: self.openplz.or(d.openplz),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OpenCage {
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OpenPlz {
    pub base_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_default_config_from_file() {
        let cfg = Config::embedded_default().unwrap();
        assert!(cfg.import.is_some());
        assert!(cfg.index.is_some());
        let geocoding = cfg.geocoding.unwrap();
        assert_eq!(geocoding.gateway, Some(GeocodingGateway::Opencage));
        assert_eq!(geocoding.min_interval, Some(Duration::from_secs(1)));
        assert_eq!(geocoding.timeout, Some(Duration::from_secs(10)));
        let postal_codes = cfg.postal_codes.unwrap();
        assert_eq!(postal_codes.gateway, Some(PostalCodeGateway::Openplz));
        assert!(cfg.gateway.unwrap().openplz.unwrap().base_url.is_some());
    }

    #[test]
    fn missing_values_are_taken_from_the_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            [import]
            delimiter = ","

            [geocoding]
            min-interval = "250ms"
            "#,
        )
        .unwrap();
        let cfg = cfg.or(Config::embedded_default().unwrap());
        let import = cfg.import.unwrap();
        assert_eq!(import.delimiter.as_deref(), Some(","));
        assert_eq!(import.country.as_deref(), Some("Deutschland"));
        assert_eq!(import.invalid_rows.as_deref(), Some("keep"));
        let geocoding = cfg.geocoding.unwrap();
        assert_eq!(geocoding.min_interval, Some(Duration::from_millis(250)));
        assert_eq!(geocoding.timeout, Some(Duration::from_secs(10)));
        assert!(cfg.postal_codes.is_some());
    }
}
