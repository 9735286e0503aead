use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::File;
use std::path::Path;

use fh_core::errors::{ErrorInfo, HubError};
use fh_core::validate::{require_elements, require_rows, require_text_column, values_outside};
use fh_core::{Column, Hub, Table, DC_FIPS, PR_FIPS, US_LOCATION_CODE};
use once_cell::sync::OnceCell;

use crate::format::{LocationFormat, RecodeDirection};
use crate::record::{read_records, records_to_table, LocationRecord};

const LOCATION_TABLE_CSV: &str = include_str!("../data/location_table.csv");

/// Number of states flagged in a well-formed location table.
pub const STATE_COUNT: usize = 50;

static GLOBAL: OnceCell<LocationRegistry> = OnceCell::new();

fn table_error(code: &str, message: impl Into<String>) -> HubError {
    HubError::SchemaViolation(ErrorInfo::new(code, message))
}

/// Read-only index over the location table and the hub membership views
/// derived from it.
#[derive(Debug, Clone)]
pub struct LocationRegistry {
    records: Vec<LocationRecord>,
    by_code: HashMap<String, usize>,
    by_abbr: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
    hub_locations: BTreeMap<Hub, Vec<String>>,
}

impl LocationRegistry {
    /// Process-wide registry over the bundled location table.
    ///
    /// The table is parsed on first use and never changes afterwards.
    pub fn global() -> Result<&'static LocationRegistry, HubError> {
        GLOBAL.get_or_try_init(|| Self::from_csv_reader(LOCATION_TABLE_CSV.as_bytes()))
    }

    /// Builds a registry from a headered location table CSV stream.
    pub fn from_csv_reader<R: std::io::Read>(reader: R) -> Result<Self, HubError> {
        Self::from_records(read_records(reader)?)
    }

    /// Builds a registry from a location table CSV file.
    pub fn from_csv_path(path: &Path) -> Result<Self, HubError> {
        let file = File::open(path).map_err(|err| {
            HubError::Io(
                ErrorInfo::new("location.table_open", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        Self::from_csv_reader(file)
    }

    /// Builds a registry, enforcing the location table invariants.
    pub fn from_records(records: Vec<LocationRecord>) -> Result<Self, HubError> {
        if records.is_empty() {
            return Err(HubError::EmptyInput(ErrorInfo::new(
                "location.table_empty",
                "the location table has no records",
            )));
        }
        let by_code = unique_index(&records, LocationFormat::Hubverse)?;
        let by_abbr = unique_index(&records, LocationFormat::Abbr)?;
        let by_name = unique_index(&records, LocationFormat::LongName)?;
        if !by_code.contains_key(US_LOCATION_CODE) {
            return Err(table_error(
                "location.table_national",
                "the location table has no national 'US' record",
            ));
        }
        let states = records.iter().filter(|record| record.is_state).count();
        if states != STATE_COUNT {
            return Err(HubError::SchemaViolation(
                ErrorInfo::new(
                    "location.table_states",
                    format!("expected {STATE_COUNT} state records, found {states}"),
                )
                .with_context("states", states.to_string()),
            ));
        }
        for code in [DC_FIPS, PR_FIPS] {
            if !by_code.contains_key(code) {
                return Err(HubError::SchemaViolation(
                    ErrorInfo::new(
                        "location.table_territory",
                        format!("the location table has no record for code '{code}'"),
                    )
                    .with_context("location_code", code),
                ));
            }
        }

        let shared = build_hub_locations(&records);
        let hub_locations = Hub::ALL
            .into_iter()
            .map(|hub| (hub, shared.clone()))
            .collect();
        tracing::debug!(records = records.len(), "location registry built");
        Ok(Self {
            records,
            by_code,
            by_abbr,
            by_name,
            hub_locations,
        })
    }

    /// Every record, in table order.
    pub fn records(&self) -> &[LocationRecord] {
        &self.records
    }

    /// The location table as a [`Table`].
    pub fn to_table(&self) -> Result<Table, HubError> {
        records_to_table(&self.records, None)
    }

    /// Every location code, in table order.
    pub fn all_location_codes(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|record| record.location_code.clone())
            .collect()
    }

    /// Codes of the 50 states, sorted.
    pub fn state_location_codes(&self) -> Vec<String> {
        sorted_codes(self.records.iter().filter(|record| record.is_state))
    }

    /// Codes of DC and the territories, sorted.
    pub fn territory_location_codes(&self) -> Vec<String> {
        sorted_codes(
            self.records
                .iter()
                .filter(|record| !record.is_state && record.location_code != US_LOCATION_CODE),
        )
    }

    /// Long names of the 50 states, in table order.
    pub fn state_names(&self) -> Vec<String> {
        self.records
            .iter()
            .filter(|record| record.is_state)
            .map(|record| record.long_name.clone())
            .collect()
    }

    /// Returns the record whose value in `format` equals `value`.
    pub fn get(&self, format: LocationFormat, value: &str) -> Option<&LocationRecord> {
        self.index(format).get(value).map(|&idx| &self.records[idx])
    }

    /// Returns true when `value` is a known location in `format`.
    pub fn contains(&self, format: LocationFormat, value: &str) -> bool {
        self.index(format).contains_key(value)
    }

    fn index(&self, format: LocationFormat) -> &HashMap<String, usize> {
        match format {
            LocationFormat::Abbr => &self.by_abbr,
            LocationFormat::Hubverse => &self.by_code,
            LocationFormat::LongName => &self.by_name,
        }
    }

    /// Rewrites `location_column` into the other representation.
    ///
    /// The input table is left untouched; a copy with the column replaced is
    /// returned.
    pub fn recode(
        &self,
        table: &Table,
        location_column: &str,
        direction: RecodeDirection,
    ) -> Result<Table, HubError> {
        require_rows(table, "input")?;
        let values = require_text_column(table, location_column)?;
        let source = direction.source();
        let index = self.index(source);
        let valid: HashSet<&str> = index.keys().map(String::as_str).collect();
        let offending = values_outside(values, &valid);
        if !offending.is_empty() {
            return Err(HubError::InvalidLocationValue(
                ErrorInfo::new(
                    "location.recode_invalid",
                    format!(
                        "values in column '{location_column}' are not valid {} values",
                        source.column()
                    ),
                )
                .with_context("column", location_column)
                .with_context("valid_set", source.column())
                .with_list("offending", offending)
                .with_hint(format!(
                    "valid values are the '{}' column of the location table; check them with `fh lookup --format {}`",
                    source.column(),
                    source.tag()
                )),
            ));
        }
        let target = direction.target();
        let recoded: Vec<String> = values
            .iter()
            .map(|value| self.records[index[value.as_str()]].value(target).to_string())
            .collect();
        table.with_column(Column::text(location_column, recoded))
    }

    /// Location table rows matching each value, with repeats.
    ///
    /// Values that match nothing are dropped (inner join), so the result can
    /// be empty.
    pub fn lookup<S: AsRef<str>>(&self, values: &[S], format: &str) -> Result<Table, HubError> {
        let format = LocationFormat::parse_for_lookup(format)?;
        require_elements(values, "location")?;
        let matched = self.lookup_records(values, format);
        records_to_table(matched, Some(format.column()))
    }

    /// Typed form of [`LocationRegistry::lookup`].
    pub fn lookup_records<S: AsRef<str>>(
        &self,
        values: &[S],
        format: LocationFormat,
    ) -> Vec<&LocationRecord> {
        values
            .iter()
            .filter_map(|value| self.get(format, value.as_ref()))
            .collect()
    }

    /// Location codes accepted by `hub`.
    pub fn hub_codes(&self, hub: Hub) -> &[String] {
        self.hub_locations
            .get(&hub)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Copy of the location codes accepted by the named hub.
    pub fn hub_locations(&self, hub_name: &str) -> Result<Vec<String>, HubError> {
        let hub: Hub = hub_name.parse()?;
        Ok(self.hub_codes(hub).to_vec())
    }

    /// Keeps the rows whose `location_column` value the hub accepts.
    pub fn filter_to_hub(
        &self,
        table: &Table,
        hub_name: &str,
        location_column: &str,
    ) -> Result<Table, HubError> {
        require_rows(table, "input")?;
        let values = require_text_column(table, location_column)?;
        let hub: Hub = hub_name.parse()?;
        let members: HashSet<&str> = self.hub_codes(hub).iter().map(String::as_str).collect();
        let mask: Vec<bool> = values
            .iter()
            .map(|value| members.contains(value.as_str()))
            .collect();
        let filtered = table.filter(&mask)?;
        tracing::debug!(
            hub = %hub,
            kept = filtered.height(),
            dropped = table.height() - filtered.height(),
            "filtered table to hub locations"
        );
        Ok(filtered)
    }
}

fn unique_index(
    records: &[LocationRecord],
    format: LocationFormat,
) -> Result<HashMap<String, usize>, HubError> {
    let mut index = HashMap::with_capacity(records.len());
    for (idx, record) in records.iter().enumerate() {
        let value = record.value(format);
        if index.insert(value.to_string(), idx).is_some() {
            return Err(HubError::SchemaViolation(
                ErrorInfo::new(
                    "location.table_duplicate",
                    format!("'{value}' appears more than once in {}", format.column()),
                )
                .with_context("column", format.column())
                .with_context("value", value),
            ));
        }
    }
    Ok(index)
}

fn sorted_codes<'a, I>(records: I) -> Vec<String>
where
    I: Iterator<Item = &'a LocationRecord>,
{
    let mut codes: Vec<String> = records.map(|record| record.location_code.clone()).collect();
    codes.sort();
    codes
}

// US first, then states, DC and PR in FIPS order.
fn build_hub_locations(records: &[LocationRecord]) -> Vec<String> {
    let members = sorted_codes(records.iter().filter(|record| {
        record.is_state || record.location_code == DC_FIPS || record.location_code == PR_FIPS
    }));
    std::iter::once(US_LOCATION_CODE.to_string())
        .chain(members)
        .collect()
}
