use std::error::Error;

use clap::Args;
use fh_core::serde::to_canonical_json_bytes;
use fh_core::Hub;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Emit JSON including the supported hubs and their task files.
    #[arg(long)]
    pub long: bool,
}

#[derive(Debug, Serialize)]
struct HubInfo {
    name: &'static str,
    tasks_json: String,
}

#[derive(Debug, Serialize)]
struct VersionInfo {
    version: &'static str,
    hubs: Vec<HubInfo>,
}

pub fn run(args: &VersionArgs) -> Result<(), Box<dyn Error>> {
    if !args.long {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    let info = VersionInfo {
        version: env!("CARGO_PKG_VERSION"),
        hubs: Hub::ALL
            .iter()
            .map(|hub| HubInfo {
                name: hub.as_str(),
                tasks_json: hub.tasks_json_url(),
            })
            .collect(),
    };
    println!("{}", String::from_utf8(to_canonical_json_bytes(&info)?)?);
    Ok(())
}
