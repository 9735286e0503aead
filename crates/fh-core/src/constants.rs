//! Constants shared by the CDC respiratory forecast hubs.

use crate::errors::{ErrorInfo, HubError};

/// The 23 quantile levels accepted by hubverse submissions.
pub const HUBVERSE_QUANTILE_LEVELS: [f64; 23] = [
    0.01, 0.025, 0.05, 0.1, 0.15, 0.2, 0.25, 0.3, 0.35, 0.4, 0.45, 0.5, 0.55, 0.6, 0.65, 0.7, 0.75,
    0.8, 0.85, 0.9, 0.95, 0.975, 0.99,
];

/// Weekly horizons: -1 is a nowcast, 0 the current week, 1-3 future weeks.
pub const STANDARD_HORIZONS: [i64; 5] = [-1, 0, 1, 2, 3];

/// Column order of a hubverse submission table.
pub const HUBVERSE_SUBMISSION_COLUMNS: [&str; 8] = [
    "reference_date",
    "target",
    "horizon",
    "target_end_date",
    "location",
    "output_type",
    "output_type_id",
    "value",
];

/// Output type literal written on every quantile row.
pub const OUTPUT_TYPE_QUANTILE: &str = "quantile";

/// Location code of the national aggregate.
pub const US_LOCATION_CODE: &str = "US";
/// FIPS code of the District of Columbia.
pub const DC_FIPS: &str = "11";
/// FIPS code of Puerto Rico.
pub const PR_FIPS: &str = "72";

/// Disease identifiers understood by the hubs.
pub const VALID_DISEASES: [&str; 3] = ["flu", "covid", "rsv"];

/// Target types: NHSN hospital admissions or NSSP ED visit proportions.
pub const VALID_TARGET_TYPES: [&str; 2] = ["hosp", "ed"];

/// NHSN hospital reporting column per disease.
pub const DISEASE_NHSN_COLUMNS: [(&str, &str); 3] = [
    ("flu", "totalconfflunewadm"),
    ("covid", "totalconfc19newadm"),
    ("rsv", "totalconfrsvnewadm"),
];

/// Hubverse target name per (disease, target type).
pub const DISEASE_TARGETS: [(&str, &str, &str); 6] = [
    ("flu", "hosp", "wk inc flu hosp"),
    ("flu", "ed", "wk inc flu prop ed visits"),
    ("covid", "hosp", "wk inc covid hosp"),
    ("covid", "ed", "wk inc covid prop ed visits"),
    ("rsv", "hosp", "wk inc rsv hosp"),
    ("rsv", "ed", "wk inc rsv prop ed visits"),
];

const LEVEL_TOLERANCE: f64 = 1e-9;

/// Snaps `level` to the canonical quantile level it represents, if any.
pub fn canonical_quantile_level(level: f64) -> Option<f64> {
    HUBVERSE_QUANTILE_LEVELS
        .iter()
        .copied()
        .find(|canonical| (canonical - level).abs() < LEVEL_TOLERANCE)
}

/// Formats a canonical level as its `output_type_id` string.
pub fn quantile_level_id(level: f64) -> Option<String> {
    canonical_quantile_level(level).map(|canonical| canonical.to_string())
}

/// Returns the hubverse target name for a disease and target type.
pub fn target_name(disease: &str, target_type: &str) -> Result<&'static str, HubError> {
    let disease_key = disease.to_ascii_lowercase();
    let type_key = target_type.to_ascii_lowercase();
    if !VALID_DISEASES.contains(&disease_key.as_str()) {
        return Err(HubError::UnknownTarget(
            ErrorInfo::new("target.disease", format!("unknown disease '{disease}'"))
                .with_context("disease", disease)
                .with_list("expected", VALID_DISEASES),
        ));
    }
    DISEASE_TARGETS
        .iter()
        .find(|(d, t, _)| *d == disease_key && *t == type_key)
        .map(|(_, _, name)| *name)
        .ok_or_else(|| {
            HubError::UnknownTarget(
                ErrorInfo::new(
                    "target.target_type",
                    format!("unknown target type '{target_type}'"),
                )
                .with_context("target_type", target_type)
                .with_list("expected", VALID_TARGET_TYPES),
            )
        })
}

/// Returns the NHSN reporting column for a disease.
pub fn nhsn_column(disease: &str) -> Result<&'static str, HubError> {
    let key = disease.to_ascii_lowercase();
    DISEASE_NHSN_COLUMNS
        .iter()
        .find(|(d, _)| *d == key)
        .map(|(_, column)| *column)
        .ok_or_else(|| {
            HubError::UnknownTarget(
                ErrorInfo::new("target.disease", format!("unknown disease '{disease}'"))
                    .with_context("disease", disease)
                    .with_list("expected", VALID_DISEASES),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_symmetric_and_increasing() {
        let levels = HUBVERSE_QUANTILE_LEVELS;
        for pair in levels.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        for (lo, hi) in levels.iter().zip(levels.iter().rev()) {
            assert!((lo + hi - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn level_ids_use_shortest_decimal() {
        assert_eq!(quantile_level_id(0.025).as_deref(), Some("0.025"));
        assert_eq!(quantile_level_id(0.5).as_deref(), Some("0.5"));
        assert_eq!(quantile_level_id(0.1 + 0.2).as_deref(), Some("0.3"));
        assert_eq!(quantile_level_id(0.33), None);
    }
}
