use std::borrow::Cow;
use std::error::Error;
use std::io::{self, Write};
use std::path::Path;

use fh_core::Table;
use fh_loc::LocationRegistry;

pub mod assemble;
pub mod filter;
pub mod locations;
pub mod lookup;
pub mod quantiles;
pub mod recode;
pub mod validate;
pub mod version;

/// Bundled registry unless a replacement table was given.
pub fn load_registry(
    location_table: Option<&Path>,
) -> Result<Cow<'static, LocationRegistry>, Box<dyn Error>> {
    match location_table {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading location table");
            Ok(Cow::Owned(LocationRegistry::from_csv_path(path)?))
        }
        None => Ok(Cow::Borrowed(LocationRegistry::global()?)),
    }
}

/// Writes `table` to `out`, or to stdout when no path is given.
pub fn write_table(table: &Table, out: Option<&Path>) -> Result<(), Box<dyn Error>> {
    match out {
        Some(path) => table.write_csv_path(path)?,
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            table.write_csv(&mut handle)?;
            handle.flush()?;
        }
    }
    Ok(())
}
