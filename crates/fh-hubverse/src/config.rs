use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use fh_core::errors::{ErrorInfo, HubError};
use fh_core::serde::from_yaml_slice;
use fh_core::validate::require_increasing_levels;
use fh_core::{target_name, Hub, HUBVERSE_QUANTILE_LEVELS, STANDARD_HORIZONS};
use fh_loc::LocationFormat;
use serde::{Deserialize, Serialize};

use crate::assemble::{AssembleOptions, LocationPolicy};
use crate::metadata::SubmissionMetadata;

fn default_target_type() -> String {
    "hosp".to_string()
}

fn default_horizons() -> Vec<i64> {
    STANDARD_HORIZONS.to_vec()
}

fn default_quantile_levels() -> Vec<f64> {
    HUBVERSE_QUANTILE_LEVELS.to_vec()
}

/// Everything needed to turn a trajectory ensemble into one submission.
///
/// ```yaml
/// hub: flusight
/// disease: flu
/// reference_date: 2024-11-23
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubmissionConfig {
    /// Target hub.
    #[serde(default)]
    pub hub: Hub,
    /// Disease key, one of `flu`, `covid`, `rsv`.
    pub disease: String,
    /// Target type, `hosp` or `ed`.
    #[serde(default = "default_target_type")]
    pub target_type: String,
    /// Saturday anchoring the submission round.
    pub reference_date: NaiveDate,
    /// Horizon of each time point, starting at `first_time_index`.
    #[serde(default = "default_horizons")]
    pub horizons: Vec<i64>,
    /// Trajectory time index of the first horizon.
    #[serde(default)]
    pub first_time_index: usize,
    /// Representation of the trajectory location labels.
    #[serde(default)]
    pub location_format: LocationFormat,
    /// Handling of locations outside the hub.
    #[serde(default)]
    pub location_policy: LocationPolicy,
    /// Levels to project the trajectories onto.
    #[serde(default = "default_quantile_levels")]
    pub quantile_levels: Vec<f64>,
}

impl SubmissionConfig {
    /// Parses and checks a YAML document.
    pub fn from_yaml(data: &[u8]) -> Result<Self, HubError> {
        let config: Self = from_yaml_slice(data)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the knobs that YAML types alone cannot.
    pub fn validate(&self) -> Result<(), HubError> {
        self.target()?;
        require_increasing_levels(&self.quantile_levels)?;
        if self.horizons.is_empty() {
            return Err(HubError::EmptyInput(ErrorInfo::new(
                "config.horizons",
                "at least one horizon is required",
            )));
        }
        if let Some(horizon) = self
            .horizons
            .iter()
            .find(|horizon| !STANDARD_HORIZONS.contains(horizon))
        {
            return Err(HubError::SchemaViolation(
                ErrorInfo::new(
                    "config.horizon",
                    format!("horizon {horizon} is not a standard horizon"),
                )
                .with_context("horizon", horizon.to_string())
                .with_list("expected", STANDARD_HORIZONS.iter().map(i64::to_string)),
            ));
        }
        Ok(())
    }

    /// Hubverse target name for the configured disease and target type.
    pub fn target(&self) -> Result<&'static str, HubError> {
        target_name(&self.disease, &self.target_type)
    }

    /// Weekly metadata for the configured horizons.
    pub fn metadata(&self) -> Result<SubmissionMetadata, HubError> {
        SubmissionMetadata::weekly(
            self.reference_date,
            self.target()?,
            &self.horizons,
            self.first_time_index,
        )
    }

    /// Assembly options derived from the config.
    pub fn options(&self) -> AssembleOptions {
        AssembleOptions {
            location_policy: self.location_policy,
        }
    }
}

/// Loads a [`SubmissionConfig`] from a YAML file.
pub fn load_config(path: &Path) -> Result<SubmissionConfig, HubError> {
    let data = fs::read(path).map_err(|err| {
        HubError::Io(
            ErrorInfo::new("config.read", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })?;
    SubmissionConfig::from_yaml(&data)
}
