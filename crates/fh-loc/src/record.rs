use fh_core::errors::{ErrorInfo, HubError};
use fh_core::{Column, Table};
use serde::{Deserialize, Serialize};

use crate::format::LocationFormat;

/// Column names of the location table, in file order.
pub const LOCATION_TABLE_COLUMNS: [&str; 4] = ["location_code", "short_name", "long_name", "is_state"];

/// One jurisdiction of the location table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationRecord {
    /// Two-digit FIPS code, or `"US"` for the nation.
    pub location_code: String,
    /// Two-letter abbreviation.
    pub short_name: String,
    /// Full English name.
    pub long_name: String,
    /// True for the 50 states only.
    pub is_state: bool,
}

impl LocationRecord {
    /// Value of this record in the requested representation.
    pub fn value(&self, format: LocationFormat) -> &str {
        match format {
            LocationFormat::Abbr => &self.short_name,
            LocationFormat::Hubverse => &self.location_code,
            LocationFormat::LongName => &self.long_name,
        }
    }
}

/// Parses location records from a headered CSV stream.
pub fn read_records<R: std::io::Read>(reader: R) -> Result<Vec<LocationRecord>, HubError> {
    let mut rdr = csv::Reader::from_reader(reader);
    rdr.deserialize()
        .collect::<Result<Vec<LocationRecord>, _>>()
        .map_err(|err| HubError::Serde(ErrorInfo::new("location.table_parse", err.to_string())))
}

/// Converts records into a [`Table`], with the join column (if any) first.
pub(crate) fn records_to_table<'a, I>(records: I, lead: Option<&str>) -> Result<Table, HubError>
where
    I: IntoIterator<Item = &'a LocationRecord>,
{
    let mut codes = Vec::new();
    let mut short_names = Vec::new();
    let mut long_names = Vec::new();
    let mut states = Vec::new();
    for record in records {
        codes.push(record.location_code.clone());
        short_names.push(record.short_name.clone());
        long_names.push(record.long_name.clone());
        states.push(record.is_state);
    }
    let mut columns = vec![
        Column::text("location_code", codes),
        Column::text("short_name", short_names),
        Column::text("long_name", long_names),
        Column::bool("is_state", states),
    ];
    if let Some(lead) = lead {
        if let Some(idx) = columns.iter().position(|column| column.name() == lead) {
            let column = columns.remove(idx);
            columns.insert(0, column);
        }
    }
    Table::new(columns)
}
