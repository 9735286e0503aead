use std::error::Error;
use std::path::{Path, PathBuf};

use clap::Args;
use fh_core::Table;
use fh_hubverse::validate_submission;

use super::load_registry;

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Submission CSV.
    #[arg(long)]
    pub input: PathBuf,
    /// Hub the submission targets.
    #[arg(long)]
    pub hub: String,
}

pub fn run(args: &ValidateArgs, location_table: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let registry = load_registry(location_table)?;
    let table = Table::from_csv_path(&args.input)?;
    validate_submission(&table, &args.hub, &registry)?;
    println!("ok: {} rows valid for {}", table.height(), args.hub);
    Ok(())
}
