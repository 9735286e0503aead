//! Forecast hub identifiers.

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, HubError};

/// CDC forecast hubs accepting hubverse submissions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum Hub {
    /// FluSight influenza forecast hub.
    #[default]
    Flusight,
    /// COVID-19 forecast hub.
    Covid,
    /// RSV forecast hub.
    Rsv,
}

impl Hub {
    /// Every known hub, in canonical order.
    pub const ALL: [Hub; 3] = [Hub::Flusight, Hub::Covid, Hub::Rsv];

    /// Lowercase hub name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Hub::Flusight => "flusight",
            Hub::Covid => "covid",
            Hub::Rsv => "rsv",
        }
    }

    /// Upstream repository of the hub.
    pub fn url(&self) -> &'static str {
        match self {
            Hub::Flusight => "https://github.com/cdcepi/FluSight-forecast-hub",
            Hub::Covid => "https://github.com/CDCgov/COVID-19-Forecast-Hub",
            Hub::Rsv => "https://github.com/CDCgov/rsv-forecast-hub",
        }
    }

    /// Hub `tasks.json`, the authoritative source for accepted locations.
    pub fn tasks_json_url(&self) -> String {
        format!("{}/blob/main/hub-config/tasks.json", self.url())
    }
}

impl Display for Hub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Hub {
    type Err = HubError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let lowered = name.to_ascii_lowercase();
        Hub::ALL
            .into_iter()
            .find(|hub| hub.as_str() == lowered)
            .ok_or_else(|| {
                HubError::UnknownHub(
                    ErrorInfo::new("hub.unknown", format!("unknown hub '{name}'"))
                        .with_context("hub", name)
                        .with_list("expected", Hub::ALL.iter().map(Hub::as_str)),
                )
            })
    }
}

impl TryFrom<String> for Hub {
    type Error = HubError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Hub> for String {
    fn from(hub: Hub) -> Self {
        hub.as_str().to_string()
    }
}
