use clap::Parser;

mod cli;
mod config;
mod gateways;
mod index;
mod json;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();
    cli::run(cli::Cli::parse())
}
