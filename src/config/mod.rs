use anyhow::{anyhow, bail, Result};
use doorlist_application::prelude::{HeaderAliases, InvalidRowPolicy, RateLimits};
use doorlist_core::usecases::AddressField;
use std::{
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};

mod raw;

const DEFAULT_CONFIG_FILE_NAME: &str = "doorlist.toml";

const ENV_NAME_OPENCAGE_API_KEY: &str = "OPENCAGE_API_KEY";
const ENV_NAME_INDEX_FILE: &str = "DOORLIST_INDEX_FILE";

pub struct Config {
    pub import: Import,
    pub geocoding: Geocoding,
    pub postal_codes: PostalCodes,
    pub index: Index,
}

impl Config {
    pub fn try_load_from_file_or_default<P: AsRef<Path>>(file_path: Option<P>) -> Result<Self> {
        let file_path: &Path = file_path.as_ref().map(|p| p.as_ref()).unwrap_or_else(|| {
            log::info!("No configuration file specified. load {DEFAULT_CONFIG_FILE_NAME}");
            Path::new(DEFAULT_CONFIG_FILE_NAME)
        });

        let raw_config = match fs::read_to_string(file_path) {
            Ok(cfg_string) => toml::from_str(&cfg_string)?,
            Err(err) => match err.kind() {
                ErrorKind::NotFound => {
                    log::info!("{} not found => load default configuration.", file_path.display());
                    Ok(raw::Config::default())
                }
                _ => Err(err),
            }?,
        };
        let mut cfg = Self::try_from(raw_config)?;
        if let Ok(api_key) = env::var(ENV_NAME_OPENCAGE_API_KEY) {
            cfg.geocoding.gateway = Some(GeocodingGateway::OpenCage { api_key });
        }
        if let Ok(file) = env::var(ENV_NAME_INDEX_FILE) {
            cfg.index.file = Some(file.into());
        }
        if matches!(&cfg.geocoding.gateway, Some(GeocodingGateway::OpenCage { api_key }) if api_key.trim().is_empty())
        {
            log::warn!("No OpenCage API key configured => geocoding is disabled");
            cfg.geocoding.gateway = None;
        }
        Ok(cfg)
    }

    pub fn rate_limits(&self) -> RateLimits {
        RateLimits {
            geocoding: self.geocoding.min_interval,
            // Cities are searched with the geocoding provider
            city_lookup: self.geocoding.min_interval,
            postal_codes: self.postal_codes.min_interval,
            city_lookup_on_geocoder: true,
        }
    }
}

pub struct Import {
    /// Detected from the header line if missing.
    pub delimiter: Option<u8>,
    /// Appended to every geocoding query.
    pub country: Option<String>,
    pub suggest_postal_codes: bool,
    pub invalid_rows: InvalidRowPolicy,
    pub header_aliases: HeaderAliases,
}

pub struct Geocoding {
    pub gateway: Option<GeocodingGateway>,
    pub min_interval: Duration,
    pub timeout: Duration,
}

pub enum GeocodingGateway {
    OpenCage { api_key: String },
}

pub struct PostalCodes {
    pub gateway: Option<PostalCodeGateway>,
    pub min_interval: Duration,
    pub timeout: Duration,
}

pub enum PostalCodeGateway {
    OpenPlz { base_url: String },
}

pub struct Index {
    /// JSON file with the already persisted addresses.
    pub file: Option<PathBuf>,
}

pub fn parse_delimiter(s: &str) -> Result<u8> {
    match s {
        "\t" | "tab" => return Ok(b'\t'),
        _ => {}
    }
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() && !c.is_ascii_alphanumeric() && c != '"' => Ok(c as u8),
        _ => bail!("Invalid delimiter '{s}'"),
    }
}

impl TryFrom<raw::Config> for Config {
    type Error = anyhow::Error;
    fn try_from(from: raw::Config) -> Result<Self> {
        let raw::Config {
            import,
            geocoding,
            postal_codes,
            index,
            gateway,
        } = from.or(raw::Config::embedded_default()?);

        let raw::Import {
            delimiter,
            country,
            suggest_postal_codes,
            invalid_rows,
            header_aliases,
        } = import.unwrap_or_default();

        let delimiter = delimiter.as_deref().map(parse_delimiter).transpose()?;
        let invalid_rows = match invalid_rows {
            Some(policy) => policy
                .parse::<InvalidRowPolicy>()
                .map_err(|_| anyhow!("Invalid policy for invalid rows: '{policy}'"))?,
            None => InvalidRowPolicy::default(),
        };
        let mut aliases = HeaderAliases::default();
        for (field, names) in header_aliases.unwrap_or_default() {
            let field: AddressField = field
                .parse()
                .map_err(|_| anyhow!("Unknown address field '{field}' in header aliases"))?;
            aliases = aliases.with(field, names.iter().map(String::as_str));
        }
        let import = Import {
            delimiter,
            country: country.filter(|c| !c.trim().is_empty()),
            suggest_postal_codes: suggest_postal_codes.unwrap_or(true),
            invalid_rows,
            header_aliases: aliases,
        };

        let gateway = gateway.unwrap_or_default();

        let raw::Geocoding {
            gateway: geo_gateway,
            min_interval,
            timeout,
        } = geocoding.unwrap_or_default();
        let geo_gateway = match geo_gateway {
            Some(raw::GeocodingGateway::Opencage) => {
                let raw::OpenCage { api_key } = gateway
                    .opencage
                    .ok_or_else(|| anyhow!("Missing 'opencage' gateway configuration"))?;
                Some(GeocodingGateway::OpenCage { api_key })
            }
            None => None,
        };
        let geocoding = Geocoding {
            gateway: geo_gateway,
            min_interval: min_interval.unwrap_or_default(),
            timeout: timeout.unwrap_or(doorlist_gateways::opencage::DEFAULT_TIMEOUT),
        };

        let raw::PostalCodes {
            gateway: postal_code_gateway,
            min_interval,
            timeout,
        } = postal_codes.unwrap_or_default();
        let postal_code_gateway = match postal_code_gateway {
            Some(raw::PostalCodeGateway::Openplz) => {
                let base_url = gateway
                    .openplz
                    .and_then(|gw| gw.base_url)
                    .unwrap_or_else(|| doorlist_gateways::openplz::DEFAULT_BASE_URL.to_string());
                Some(PostalCodeGateway::OpenPlz { base_url })
            }
            None => None,
        };
        let postal_codes = PostalCodes {
            gateway: postal_code_gateway,
            min_interval: min_interval.unwrap_or_default(),
            timeout: timeout.unwrap_or(doorlist_gateways::openplz::DEFAULT_TIMEOUT),
        };

        let raw::Index { file } = index.unwrap_or_default();
        let index = Index { file };

        Ok(Self {
            import,
            geocoding,
            postal_codes,
            index,
        })
    }
}
