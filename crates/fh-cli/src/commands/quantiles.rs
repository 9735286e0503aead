use std::error::Error;
use std::fs::File;
use std::path::PathBuf;

use clap::Args;
use fh_core::HUBVERSE_QUANTILE_LEVELS;
use fh_loc::LocationFormat;
use fh_quant::{project, TrajectorySet};

use super::write_table;

#[derive(Args, Debug)]
pub struct QuantilesArgs {
    /// Long trajectory CSV with columns draw,location,time_index,value.
    #[arg(long)]
    pub trajectories: PathBuf,
    /// Output CSV; stdout when omitted.
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Format of the trajectory location labels.
    #[arg(long, default_value = "abbr")]
    pub location_format: String,
    /// Comma separated levels; the 23 hubverse levels when omitted.
    #[arg(long, value_delimiter = ',')]
    pub levels: Vec<f64>,
    /// First time index to keep.
    #[arg(long, requires = "window_len")]
    pub window_start: Option<usize>,
    /// Number of time points to keep.
    #[arg(long, requires = "window_start")]
    pub window_len: Option<usize>,
}

pub fn run(args: &QuantilesArgs) -> Result<(), Box<dyn Error>> {
    let format: LocationFormat = args.location_format.parse()?;
    let mut trajectories = TrajectorySet::read_csv(File::open(&args.trajectories)?, format)?;
    if let (Some(start), Some(len)) = (args.window_start, args.window_len) {
        trajectories = trajectories.time_window(start, len)?;
    }
    let levels = if args.levels.is_empty() {
        HUBVERSE_QUANTILE_LEVELS.to_vec()
    } else {
        args.levels.clone()
    };
    let quantiles = project(&trajectories, &levels)?;
    tracing::info!(rows = quantiles.len(), "projected quantiles");
    write_table(&quantiles.to_table()?, args.out.as_deref())
}
