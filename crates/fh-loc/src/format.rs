use std::fmt::{self, Display};
use std::str::FromStr;

use fh_core::errors::{ErrorInfo, HubError};
use serde::{Deserialize, Serialize};

/// Tags accepted wherever a location format is named.
pub const LOCATION_FORMAT_TAGS: [&str; 3] = ["abbr", "hubverse", "long_name"];

/// Representation used by a location column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LocationFormat {
    /// Two-letter jurisdiction abbreviation (`"MA"`).
    #[default]
    Abbr,
    /// Two-digit FIPS code, or `"US"` for the nation (`"25"`).
    Hubverse,
    /// Full English name (`"Massachusetts"`).
    LongName,
}

impl LocationFormat {
    /// Format tag as written in configuration and on the command line.
    pub fn tag(&self) -> &'static str {
        match self {
            LocationFormat::Abbr => "abbr",
            LocationFormat::Hubverse => "hubverse",
            LocationFormat::LongName => "long_name",
        }
    }

    /// Column of the location table holding values in this format.
    pub fn column(&self) -> &'static str {
        match self {
            LocationFormat::Abbr => "short_name",
            LocationFormat::Hubverse => "location_code",
            LocationFormat::LongName => "long_name",
        }
    }

    fn parse_with_code(tag: &str, code: &str) -> Result<Self, HubError> {
        match tag {
            "abbr" => Ok(LocationFormat::Abbr),
            "hubverse" => Ok(LocationFormat::Hubverse),
            "long_name" => Ok(LocationFormat::LongName),
            other => Err(HubError::UnknownFormat(
                ErrorInfo::new(code, format!("unknown location format '{other}'"))
                    .with_context("format", other)
                    .with_list("expected", LOCATION_FORMAT_TAGS),
            )),
        }
    }

    /// Parses a format tag, reporting failures under the lookup error code.
    pub(crate) fn parse_for_lookup(tag: &str) -> Result<Self, HubError> {
        Self::parse_with_code(tag, "location.invalid_format")
    }
}

impl Display for LocationFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for LocationFormat {
    type Err = HubError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Self::parse_with_code(tag, "location.unknown_format")
    }
}

/// Maps a format tag to the location table column holding that format.
pub fn resolve_column(format: &str) -> Result<&'static str, HubError> {
    format.parse::<LocationFormat>().map(|format| format.column())
}

/// Direction of an abbreviation / hub code recode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecodeDirection {
    /// `"MA"` becomes `"25"`.
    AbbrToHubverse,
    /// `"25"` becomes `"MA"`.
    HubverseToAbbr,
}

impl RecodeDirection {
    /// Format of the values being replaced.
    pub fn source(&self) -> LocationFormat {
        match self {
            RecodeDirection::AbbrToHubverse => LocationFormat::Abbr,
            RecodeDirection::HubverseToAbbr => LocationFormat::Hubverse,
        }
    }

    /// Format of the replacement values.
    pub fn target(&self) -> LocationFormat {
        match self {
            RecodeDirection::AbbrToHubverse => LocationFormat::Hubverse,
            RecodeDirection::HubverseToAbbr => LocationFormat::Abbr,
        }
    }
}
