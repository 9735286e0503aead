use std::error::Error;
use std::path::{Path, PathBuf};

use clap::Args;
use fh_core::Table;

use super::{load_registry, write_table};

#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Input CSV.
    #[arg(long)]
    pub input: PathBuf,
    /// Output CSV; stdout when omitted.
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Hub whose locations are kept.
    #[arg(long)]
    pub hub: String,
    /// Column holding hub codes.
    #[arg(long, default_value = "location")]
    pub column: String,
}

pub fn run(args: &FilterArgs, location_table: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let registry = load_registry(location_table)?;
    let table = Table::from_csv_path(&args.input)?;
    let kept = registry.filter_to_hub(&table, &args.hub, &args.column)?;
    write_table(&kept, args.out.as_deref())
}
