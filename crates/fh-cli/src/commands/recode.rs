use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use fh_core::Table;
use fh_loc::RecodeDirection;

use super::{load_registry, write_table};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Direction {
    /// Two-letter abbreviations to hub codes.
    AbbrToHubverse,
    /// Hub codes to two-letter abbreviations.
    HubverseToAbbr,
}

impl From<Direction> for RecodeDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::AbbrToHubverse => RecodeDirection::AbbrToHubverse,
            Direction::HubverseToAbbr => RecodeDirection::HubverseToAbbr,
        }
    }
}

#[derive(Args, Debug)]
pub struct RecodeArgs {
    /// Input CSV.
    #[arg(long)]
    pub input: PathBuf,
    /// Output CSV; stdout when omitted.
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Column holding the locations.
    #[arg(long, default_value = "location")]
    pub column: String,
    /// Recode direction.
    #[arg(long, value_enum)]
    pub direction: Direction,
}

pub fn run(args: &RecodeArgs, location_table: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let registry = load_registry(location_table)?;
    let table = Table::from_csv_path(&args.input)?;
    let recoded = registry.recode(&table, &args.column, args.direction.into())?;
    write_table(&recoded, args.out.as_deref())
}
