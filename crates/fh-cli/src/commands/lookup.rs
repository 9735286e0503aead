use std::error::Error;
use std::path::Path;

use clap::Args;

use super::{load_registry, write_table};

#[derive(Args, Debug)]
pub struct LookupArgs {
    /// Format of the values: abbr, hubverse or long_name.
    #[arg(long, default_value = "abbr")]
    pub format: String,
    /// Values to look up; unmatched values are dropped.
    #[arg(required = true)]
    pub values: Vec<String>,
}

pub fn run(args: &LookupArgs, location_table: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let registry = load_registry(location_table)?;
    let found = registry.lookup(&args.values, &args.format)?;
    if found.height() < args.values.len() {
        tracing::debug!(
            requested = args.values.len(),
            matched = found.height(),
            "some values matched no location"
        );
    }
    write_table(&found, None)
}
