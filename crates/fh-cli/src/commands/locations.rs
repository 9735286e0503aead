use std::error::Error;
use std::path::Path;

use clap::{Args, ValueEnum};
use fh_core::serde::to_canonical_json_bytes;

use super::{load_registry, write_table};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// JSON array of hub codes.
    Json,
    /// Location table rows of the hub's members.
    Csv,
}

#[derive(Args, Debug)]
pub struct LocationsArgs {
    /// Hub whose accepted locations are listed.
    #[arg(long, default_value = "flusight")]
    pub hub: String,
    /// Output representation.
    #[arg(long, value_enum, default_value_t = ListFormat::Json)]
    pub format: ListFormat,
}

pub fn run(args: &LocationsArgs, location_table: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let registry = load_registry(location_table)?;
    match args.format {
        ListFormat::Json => {
            let codes = registry.hub_locations(&args.hub)?;
            println!("{}", String::from_utf8(to_canonical_json_bytes(&codes)?)?);
        }
        ListFormat::Csv => {
            let members = registry.filter_to_hub(&registry.to_table()?, &args.hub, "location_code")?;
            write_table(&members, None)?;
        }
    }
    Ok(())
}
