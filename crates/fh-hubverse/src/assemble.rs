use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use fh_core::errors::{ErrorInfo, HubError};
use fh_core::validate::{require_elements, require_text_column};
use fh_core::{quantile_level_id, Column, Hub, Table, OUTPUT_TYPE_QUANTILE};
use fh_loc::{LocationFormat, LocationRegistry, RecodeDirection};
use fh_quant::QuantileTable;
use serde::{Deserialize, Serialize};

use crate::metadata::{ResolvedMeta, SubmissionMetadata};
use crate::submission::{SubmissionRow, SubmissionTable};

/// What to do with rows whose location the hub does not accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationPolicy {
    /// Fail the assembly with `InvalidLocation`.
    #[default]
    Reject,
    /// Drop the rows and log them.
    Drop,
}

/// Knobs for [`assemble_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AssembleOptions {
    /// Handling of locations outside the hub.
    #[serde(default)]
    pub location_policy: LocationPolicy,
}

/// Builds a hubverse submission with the default options.
pub fn assemble(
    quantiles: &QuantileTable,
    metadata: &SubmissionMetadata,
    hub_name: &str,
    registry: &LocationRegistry,
) -> Result<SubmissionTable, HubError> {
    assemble_with(
        quantiles,
        metadata,
        hub_name,
        registry,
        &AssembleOptions::default(),
    )
}

/// Builds a hubverse submission: one row per (location, time point, level)
/// of `quantiles`, carrying the metadata of its time point and the hub code
/// of its location.
pub fn assemble_with(
    quantiles: &QuantileTable,
    metadata: &SubmissionMetadata,
    hub_name: &str,
    registry: &LocationRegistry,
    options: &AssembleOptions,
) -> Result<SubmissionTable, HubError> {
    let hub: Hub = hub_name.parse()?;
    require_elements(&quantiles.rows, "quantile")?;
    let level_ids = level_ids(quantiles)?;
    let resolved: BTreeMap<usize, ResolvedMeta> = quantiles
        .time_indices()
        .into_iter()
        .map(|time| metadata.resolve(time).map(|meta| (time, meta)))
        .collect::<Result<_, _>>()?;
    let codes = hub_codes(quantiles, registry)?;

    let members: HashSet<&str> = registry.hub_codes(hub).iter().map(String::as_str).collect();
    let outside: BTreeSet<&str> = codes
        .values()
        .map(String::as_str)
        .filter(|code| !members.contains(code))
        .collect();
    if !outside.is_empty() {
        match options.location_policy {
            LocationPolicy::Reject => {
                return Err(HubError::InvalidLocation(
                    ErrorInfo::new(
                        "assemble.location",
                        format!("locations are not accepted by the {hub} hub"),
                    )
                    .with_context("hub", hub.as_str())
                    .with_list("offending", outside.iter())
                    .with_hint("filter the trajectories or use the drop location policy"),
                ));
            }
            LocationPolicy::Drop => {
                tracing::warn!(
                    hub = %hub,
                    dropped = ?outside,
                    "dropping locations not accepted by the hub"
                );
            }
        }
    }

    let mut rows = Vec::with_capacity(quantiles.len());
    for row in &quantiles.rows {
        let location = &codes[row.location.as_str()];
        if !members.contains(location.as_str()) {
            continue;
        }
        if !row.value.is_finite() {
            return Err(HubError::SchemaViolation(
                ErrorInfo::new(
                    "assemble.value",
                    format!(
                        "non-finite quantile {} at location {location}, time index {}",
                        row.value, row.time_index
                    ),
                )
                .with_context("location", location.as_str())
                .with_context("time_index", row.time_index.to_string())
                .with_context("quantile_level", row.quantile_level.to_string()),
            ));
        }
        let meta = &resolved[&row.time_index];
        rows.push(SubmissionRow {
            reference_date: meta.reference_date,
            target: meta.target.clone(),
            horizon: meta.horizon,
            target_end_date: meta.target_end_date,
            location: location.clone(),
            output_type: OUTPUT_TYPE_QUANTILE.to_string(),
            output_type_id: level_ids[&row.quantile_level.to_bits()].clone(),
            value: row.value,
        });
    }
    tracing::info!(hub = %hub, rows = rows.len(), "assembled hubverse submission");
    Ok(SubmissionTable { hub, rows })
}

fn level_ids(quantiles: &QuantileTable) -> Result<HashMap<u64, String>, HubError> {
    let mut ids = HashMap::new();
    let mut invalid = BTreeSet::new();
    for row in &quantiles.rows {
        let bits = row.quantile_level.to_bits();
        if ids.contains_key(&bits) {
            continue;
        }
        match quantile_level_id(row.quantile_level) {
            Some(id) => {
                ids.insert(bits, id);
            }
            None => {
                invalid.insert(row.quantile_level.to_string());
            }
        }
    }
    if !invalid.is_empty() {
        return Err(HubError::InvalidQuantileLevels(
            ErrorInfo::new(
                "assemble.quantile_level",
                "quantile levels are not among the 23 hubverse levels",
            )
            .with_list("offending", invalid),
        ));
    }
    Ok(ids)
}

/// Maps each distinct location label to its hub code.
fn hub_codes(
    quantiles: &QuantileTable,
    registry: &LocationRegistry,
) -> Result<HashMap<String, String>, HubError> {
    let labels: Vec<String> = quantiles
        .rows
        .iter()
        .map(|row| row.location.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let codes = match quantiles.location_format {
        LocationFormat::Hubverse => labels.clone(),
        LocationFormat::Abbr => {
            let table = Table::new(vec![Column::text("location", labels.clone())])?;
            let recoded = registry.recode(&table, "location", RecodeDirection::AbbrToHubverse)?;
            require_text_column(&recoded, "location")?.to_vec()
        }
        LocationFormat::LongName => {
            let unknown: Vec<&String> = labels
                .iter()
                .filter(|label| !registry.contains(LocationFormat::LongName, label))
                .collect();
            if !unknown.is_empty() {
                return Err(HubError::InvalidLocationValue(
                    ErrorInfo::new(
                        "assemble.long_name",
                        "location names are not in the location table",
                    )
                    .with_context("valid_set", LocationFormat::LongName.column())
                    .with_list("offending", unknown),
                ));
            }
            registry
                .lookup_records(&labels, LocationFormat::LongName)
                .into_iter()
                .map(|record| record.location_code.clone())
                .collect()
        }
    };
    Ok(labels.into_iter().zip(codes).collect())
}
