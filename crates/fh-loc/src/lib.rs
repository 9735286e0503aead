#![deny(missing_docs)]
#![doc = "Location registry for US jurisdictions: format resolution, abbreviation and hub code recoding, lookups and per-hub membership."]

/// Location format tags and recode directions.
pub mod format;
/// Location table records and parsing.
pub mod record;
/// The registry itself.
pub mod registry;

pub use format::{resolve_column, LocationFormat, RecodeDirection, LOCATION_FORMAT_TAGS};
pub use record::{read_records, LocationRecord, LOCATION_TABLE_COLUMNS};
pub use registry::{LocationRegistry, STATE_COUNT};
