use std::fs;

use chrono::NaiveDate;
use fh_core::errors::HubError;
use fh_core::{Hub, HUBVERSE_QUANTILE_LEVELS, STANDARD_HORIZONS};
use fh_hubverse::{load_config, LocationPolicy, SubmissionConfig};
use fh_loc::LocationFormat;

#[test]
fn minimal_config_takes_the_defaults() {
    let yaml = "disease: flu\nreference_date: 2024-11-23\n";
    let config = SubmissionConfig::from_yaml(yaml.as_bytes()).expect("config");
    assert_eq!(config.hub, Hub::Flusight);
    assert_eq!(config.target_type, "hosp");
    assert_eq!(config.horizons, STANDARD_HORIZONS);
    assert_eq!(config.first_time_index, 0);
    assert_eq!(config.location_format, LocationFormat::Abbr);
    assert_eq!(config.location_policy, LocationPolicy::Reject);
    assert_eq!(config.quantile_levels, HUBVERSE_QUANTILE_LEVELS);
    assert_eq!(config.target().expect("target"), "wk inc flu hosp");
}

#[test]
fn config_file_drives_metadata_and_options() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("submission.yaml");
    fs::write(
        &path,
        "hub: RSV\n\
         disease: rsv\n\
         target_type: ed\n\
         reference_date: 2025-01-04\n\
         horizons: [0, 1]\n\
         first_time_index: 3\n\
         location_format: long_name\n\
         location_policy: drop\n",
    )
    .expect("write");
    let config = load_config(&path).expect("load");
    assert_eq!(config.hub, Hub::Rsv);
    assert_eq!(config.location_format, LocationFormat::LongName);
    assert_eq!(config.options().location_policy, LocationPolicy::Drop);

    let metadata = config.metadata().expect("metadata");
    let keys: Vec<usize> = metadata.time_points.keys().copied().collect();
    assert_eq!(keys, [3, 4]);
    let last = &metadata.time_points[&4];
    assert_eq!(last.target.as_deref(), Some("wk inc rsv prop ed visits"));
    assert_eq!(last.target_end_date, NaiveDate::from_ymd_opt(2025, 1, 11));
}

#[test]
fn bad_configs_are_rejected() {
    let unknown_disease = "disease: measles\nreference_date: 2024-11-23\n";
    assert!(matches!(
        SubmissionConfig::from_yaml(unknown_disease.as_bytes()),
        Err(HubError::UnknownTarget(_))
    ));

    let decreasing = "disease: flu\nreference_date: 2024-11-23\nquantile_levels: [0.5, 0.25]\n";
    assert!(matches!(
        SubmissionConfig::from_yaml(decreasing.as_bytes()),
        Err(HubError::InvalidQuantileLevels(_))
    ));

    let no_horizons = "disease: flu\nreference_date: 2024-11-23\nhorizons: []\n";
    assert!(matches!(
        SubmissionConfig::from_yaml(no_horizons.as_bytes()),
        Err(HubError::EmptyInput(_))
    ));

    let far_horizon = "disease: flu\nreference_date: 2024-11-23\nhorizons: [0, 1152921504606846976]\n";
    let err = SubmissionConfig::from_yaml(far_horizon.as_bytes()).unwrap_err();
    assert!(matches!(err, HubError::SchemaViolation(_)));
    assert_eq!(err.code(), "config.horizon");
    assert_eq!(err.info().context["horizon"], "1152921504606846976");

    let bad_hub = "hub: dengue\ndisease: flu\nreference_date: 2024-11-23\n";
    assert!(matches!(
        SubmissionConfig::from_yaml(bad_hub.as_bytes()),
        Err(HubError::Serde(_))
    ));

    let missing = tempfile::tempdir().expect("tempdir").path().join("absent.yaml");
    assert!(matches!(load_config(&missing), Err(HubError::Io(_))));
}
