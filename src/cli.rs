use crate::{
    config::{self, Config},
    gateways,
    index::JsonFileIndex,
    json,
};
use anyhow::{anyhow, Context as _, Result};
use clap::{Args, Parser, Subcommand};
use doorlist_application::prelude::*;
use doorlist_boundary as boundary;
use doorlist_core::{
    gateways::{city::*, geocode::GeoCodingGateway},
    repositories::{AddressIndex, EmptyAddressIndex},
    util::{cancel::CancelToken, normalize::normalize},
};
use std::{fs, path::PathBuf};

#[derive(Debug, Parser)]
#[command(version, about = "Import and reconcile address lists for door-to-door canvassing")]
pub struct Cli {
    /// Configuration file [default: doorlist.toml]
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Import a CSV file and print the report as JSON
    Import(ImportArgs),
    /// Search cities and their postal codes
    Cities {
        name: String,
        #[arg(short, long, default_value_t = 5)]
        limit: usize,
    },
    /// Print the normalized key of an address
    Key {
        street: String,
        house_number: String,
        postal_code: String,
        city: String,
    },
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// Column delimiter, e.g. ";" or "tab" [default: detected]
    #[arg(short, long)]
    pub delimiter: Option<String>,

    /// JSON file with the already persisted addresses
    #[arg(long, value_name = "FILE")]
    pub index: Option<PathBuf>,

    /// Write the report into a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Don't resolve missing coordinates
    #[arg(long)]
    pub no_geocode: bool,

    /// Don't suggest postal codes
    #[arg(long)]
    pub no_suggest: bool,

    /// Don't import rows with validation errors
    #[arg(long)]
    pub skip_invalid: bool,

    /// Merge the imported addresses into the index file
    #[arg(long)]
    pub write_index: bool,
}

pub fn run(cli: Cli) -> Result<()> {
    let Cli { config, command } = cli;
    let cfg = Config::try_load_from_file_or_default(config)?;
    match command {
        Command::Import(args) => import(args, &cfg),
        Command::Cities { name, limit } => cities(&name, limit, &cfg),
        Command::Key {
            street,
            house_number,
            postal_code,
            city,
        } => {
            println!("{}", normalize(&street, &house_number, &postal_code, &city));
            Ok(())
        }
    }
}

fn import(args: ImportArgs, cfg: &Config) -> Result<()> {
    let ImportArgs {
        csv,
        delimiter,
        index,
        output,
        no_geocode,
        no_suggest,
        skip_invalid,
        write_index,
    } = args;

    let text = fs::read_to_string(&csv)
        .with_context(|| format!("Unable to read {}", csv.display()))?;

    let delimiter = match delimiter {
        Some(d) => Some(config::parse_delimiter(&d)?),
        None => cfg.import.delimiter,
    };
    let invalid_rows = if skip_invalid {
        InvalidRowPolicy::Skip
    } else {
        cfg.import.invalid_rows
    };
    let options = ImportOptions {
        delimiter,
        header_aliases: cfg.import.header_aliases.clone(),
        suggest_postal_codes: cfg.import.suggest_postal_codes && !no_suggest,
        geocode: !no_geocode,
        invalid_rows,
    };

    let index_file = index.or_else(|| cfg.index.file.clone());
    let address_index: Box<dyn AddressIndex> = match &index_file {
        Some(path) => {
            log::info!("Reading known addresses from {}", path.display());
            Box::new(JsonFileIndex::new(path))
        }
        None => Box::new(EmptyAddressIndex),
    };
    let opencage = gateways::geocoding_gateway(cfg);
    let openplz = gateways::postal_code_gateway(cfg)?;

    let ctx = ImportContext {
        index: address_index.as_ref(),
        geocoder: opencage.as_ref().map(|gw| gw as &dyn GeoCodingGateway),
        city_lookup: opencage.as_ref().map(|gw| gw as &dyn CityLookupGateway),
        postal_codes: openplz.as_ref().map(|gw| gw as &dyn PostalCodeDirectory),
        rate_limits: cfg.rate_limits(),
        cancel: CancelToken::new(),
    };
    let report = if write_index {
        let path = index_file.ok_or_else(|| anyhow!("No index file to write into"))?;
        let (report, merged) = import_csv_and_merge(&text, &options, &ctx)?;
        JsonFileIndex::new(path).write(&merged)?;
        report
    } else {
        import_csv(&text, &options, &ctx)?
    };

    let report = serde_json::to_string_pretty(&json::import_report(report))?;
    match output {
        Some(path) => {
            fs::write(&path, report)?;
            log::info!("Wrote the report to {}", path.display());
        }
        None => println!("{report}"),
    }
    Ok(())
}

fn cities(name: &str, limit: usize, cfg: &Config) -> Result<()> {
    let city_lookup =
        gateways::geocoding_gateway(cfg).ok_or_else(|| anyhow!("City search is not configured"))?;
    let postal_codes = gateways::postal_code_gateway(cfg)?;
    let postal_codes: &dyn PostalCodeDirectory = match &postal_codes {
        Some(gw) => gw,
        None => &NoPostalCodeDirectory,
    };
    let matches = lookup_cities(&city_lookup, postal_codes, &cfg.rate_limits(), name, limit)?;
    let matches: Vec<boundary::CityMatch> = matches.into_iter().map(Into::into).collect();
    println!("{}", serde_json::to_string_pretty(&matches)?);
    Ok(())
}
