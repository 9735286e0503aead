use fh_core::errors::HubError;
use fh_core::{Column, ColumnData, Table};
use fh_loc::{resolve_column, LocationRegistry};

#[test]
fn resolve_column_maps_the_three_tags() {
    assert_eq!(resolve_column("abbr").expect("abbr"), "short_name");
    assert_eq!(resolve_column("hubverse").expect("hubverse"), "location_code");
    assert_eq!(resolve_column("long_name").expect("long"), "long_name");
}

#[test]
fn resolve_column_rejects_unknown_tags() {
    let err = resolve_column("bad_format").unwrap_err();
    assert!(matches!(err, HubError::UnknownFormat(_)));
    assert_eq!(err.info().context["format"], "bad_format");
    assert_eq!(err.info().context["expected"], "[abbr, hubverse, long_name]");
    assert!(err.to_string().contains("bad_format"));
}

#[test]
fn lookup_keeps_repeats_and_leads_with_the_join_key() {
    let registry = LocationRegistry::global().expect("registry");
    let found = registry
        .lookup(&["MA", "CA", "MA"], "abbr")
        .expect("lookup");
    assert_eq!(found.height(), 3);
    assert_eq!(
        found.column_names(),
        vec!["short_name", "location_code", "long_name", "is_state"]
    );
    assert_eq!(found.render_row(0), vec!["MA", "25", "Massachusetts", "true"]);
    assert_eq!(found.render_row(2), found.render_row(0));

    let by_name = registry
        .lookup(&["Puerto Rico", "United States"], "long_name")
        .expect("lookup");
    assert_eq!(by_name.render_row(0), vec!["Puerto Rico", "72", "PR", "false"]);
    assert_eq!(by_name.render_row(1)[1], "US");
}

#[test]
fn lookup_drops_unmatched_values() {
    let registry = LocationRegistry::global().expect("registry");
    let found = registry.lookup(&["XX"], "abbr").expect("lookup");
    assert!(found.is_empty());
    assert_eq!(found.width(), 4);
    let mixed = registry.lookup(&["06", "99"], "hubverse").expect("lookup");
    assert_eq!(mixed.height(), 1);
}

#[test]
fn lookup_rejects_empty_input_and_bad_formats() {
    let registry = LocationRegistry::global().expect("registry");
    let none: [&str; 0] = [];
    assert!(matches!(
        registry.lookup(&none, "abbr"),
        Err(HubError::EmptyInput(_))
    ));
    let err = registry.lookup(&["MA"], "fips").unwrap_err();
    assert!(matches!(err, HubError::UnknownFormat(_)));
    assert_eq!(err.code(), "location.invalid_format");
}

#[test]
fn filter_to_hub_drops_unknown_locations_only() {
    let registry = LocationRegistry::global().expect("registry");
    let table = Table::new(vec![
        Column::text("location", ["US", "99", "25", "66"]),
        Column::float("value", vec![1.0, 2.0, 3.0, 4.0]),
    ])
    .expect("table");
    let filtered = registry
        .filter_to_hub(&table, "flusight", "location")
        .expect("filter");
    assert_eq!(filtered.column_names(), table.column_names());
    assert_eq!(
        filtered.column("location").map(Column::data),
        Some(&ColumnData::Text(vec!["US".into(), "25".into()]))
    );
    assert_eq!(
        filtered.column("value").map(Column::data),
        Some(&ColumnData::Float(vec![1.0, 3.0]))
    );
}

#[test]
fn filter_to_hub_returns_empty_table_on_no_match() {
    let registry = LocationRegistry::global().expect("registry");
    let table = Table::new(vec![Column::text("loc", ["99", "MA"])]).expect("table");
    let filtered = registry.filter_to_hub(&table, "rsv", "loc").expect("filter");
    assert!(filtered.is_empty());
    assert_eq!(filtered.column_names(), vec!["loc"]);
}

#[test]
fn filter_to_hub_validates_inputs() {
    let registry = LocationRegistry::global().expect("registry");
    let table = Table::new(vec![Column::text("location", ["US"])]).expect("table");
    assert!(matches!(
        registry.filter_to_hub(&table, "flusight", "loc"),
        Err(HubError::MissingColumn(_))
    ));
    assert!(matches!(
        registry.filter_to_hub(&table, "ecdc", "location"),
        Err(HubError::UnknownHub(_))
    ));
    let empty = table.filter(&[false]).expect("empty");
    assert!(matches!(
        registry.filter_to_hub(&empty, "flusight", "location"),
        Err(HubError::EmptyInput(_))
    ));
}
