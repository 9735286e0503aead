use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use commands::{
    assemble::{self, AssembleArgs},
    filter::{self, FilterArgs},
    locations::{self, LocationsArgs},
    lookup::{self, LookupArgs},
    quantiles::{self, QuantilesArgs},
    recode::{self, RecodeArgs},
    validate::{self, ValidateArgs},
    version::{self, VersionArgs},
};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "fh", about = "Forecast hub location and submission tooling")]
struct Cli {
    /// Location table CSV replacing the bundled one.
    #[arg(long, global = true, value_name = "CSV")]
    location_table: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the location codes a hub accepts.
    Locations(LocationsArgs),
    /// Look up location table rows by abbreviation, hub code or name.
    Lookup(LookupArgs),
    /// Recode a location column between abbreviations and hub codes.
    Recode(RecodeArgs),
    /// Keep only rows whose location the hub accepts.
    Filter(FilterArgs),
    /// Project a trajectory ensemble onto quantiles.
    Quantiles(QuantilesArgs),
    /// Build a hubverse submission from trajectories and a YAML config.
    Assemble(AssembleArgs),
    /// Check a submission CSV against the hubverse schema.
    Validate(ValidateArgs),
    /// Print version information.
    Version(VersionArgs),
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logging();
    let cli = Cli::parse();
    let table = cli.location_table.as_deref();
    match cli.command {
        Command::Locations(args) => locations::run(&args, table),
        Command::Lookup(args) => lookup::run(&args, table),
        Command::Recode(args) => recode::run(&args, table),
        Command::Filter(args) => filter::run(&args, table),
        Command::Quantiles(args) => quantiles::run(&args),
        Command::Assemble(args) => assemble::run(&args, table),
        Command::Validate(args) => validate::run(&args, table),
        Command::Version(args) => version::run(&args),
    }
}
