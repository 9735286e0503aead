use std::error::Error;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use clap::Args;
use fh_hubverse::{assemble_with, load_config};
use fh_quant::{project, TrajectorySet};

use super::load_registry;

#[derive(Args, Debug)]
pub struct AssembleArgs {
    /// Long trajectory CSV with columns draw,location,time_index,value.
    #[arg(long)]
    pub trajectories: PathBuf,
    /// YAML submission config.
    #[arg(long)]
    pub config: PathBuf,
    /// Output path.
    #[arg(long)]
    pub out: PathBuf,
    /// Write canonical JSON records instead of CSV.
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &AssembleArgs, location_table: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let registry = load_registry(location_table)?;
    let config = load_config(&args.config)?;
    let trajectories =
        TrajectorySet::read_csv(File::open(&args.trajectories)?, config.location_format)?;
    let quantiles = project(&trajectories, &config.quantile_levels)?;
    let submission = assemble_with(
        &quantiles,
        &config.metadata()?,
        config.hub.as_str(),
        &registry,
        &config.options(),
    )?;
    if args.json {
        fs::write(&args.out, submission.to_json_bytes()?)?;
    } else {
        submission.write_csv_path(&args.out)?;
    }
    tracing::info!(
        hub = %config.hub,
        rows = submission.len(),
        out = %args.out.display(),
        "wrote submission"
    );
    Ok(())
}
