#![deny(missing_docs)]
#![doc = "Shared error taxonomy, tabular container and validation helpers for the forecast hub toolkit."]

pub mod constants;
pub mod errors;
pub mod hub;
/// Canonical JSON and YAML helpers.
pub mod serde;
pub mod table;
pub mod validate;

pub use constants::{
    canonical_quantile_level, nhsn_column, quantile_level_id, target_name, DC_FIPS,
    HUBVERSE_QUANTILE_LEVELS, HUBVERSE_SUBMISSION_COLUMNS, OUTPUT_TYPE_QUANTILE, PR_FIPS,
    STANDARD_HORIZONS, US_LOCATION_CODE,
};
pub use errors::{ErrorInfo, HubError};
pub use hub::Hub;
pub use table::{Column, ColumnData, Table};
