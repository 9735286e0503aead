use fh_core::errors::HubError;
use fh_core::HUBVERSE_QUANTILE_LEVELS;
use fh_loc::LocationFormat;
use fh_quant::{project, TrajectorySet};
use ndarray::{Array3, ArrayD, IxDyn};
use proptest::prelude::*;

fn ensemble(draws: Array3<f64>) -> TrajectorySet {
    let locations = (0..draws.dim().1).map(|idx| format!("{:02}", idx + 1)).collect();
    TrajectorySet::new(draws, locations, LocationFormat::Hubverse).expect("ensemble")
}

#[test]
fn one_to_hundred_has_median_fifty_point_five() {
    let draws = Array3::from_shape_fn((100, 1, 1), |(draw, _, _)| (draw + 1) as f64);
    let table = project(&ensemble(draws), &[0.5]).expect("project");
    assert_eq!(table.len(), 1);
    assert_eq!(table.rows[0].value, 50.5);
    assert_eq!(table.rows[0].location, "01");
}

#[test]
fn row_count_and_order_follow_cells_then_levels() {
    let draws = Array3::from_shape_fn((10, 3, 4), |(d, l, t)| (d + 10 * l + 100 * t) as f64);
    let table = project(&ensemble(draws), &HUBVERSE_QUANTILE_LEVELS).expect("project");
    assert_eq!(table.len(), 3 * 4 * 23);
    assert_eq!(table.rows[0].location, "01");
    assert_eq!(table.rows[0].time_index, 0);
    assert_eq!(table.rows[23].time_index, 1);
    assert_eq!(table.rows[4 * 23].location, "02");
    assert_eq!(table.rows[22].quantile_level, 0.99);
    assert_eq!(table.location_format, LocationFormat::Hubverse);
}

#[test]
fn invalid_levels_are_rejected() {
    let draws = Array3::from_elem((5, 1, 1), 1.0);
    let set = ensemble(draws);
    for levels in [vec![0.5, 0.25], vec![0.5, 0.5], vec![0.0], vec![1.2], vec![]] {
        assert!(matches!(
            project(&set, &levels),
            Err(HubError::InvalidQuantileLevels(_))
        ));
    }
}

#[test]
fn rank_and_draw_count_are_checked() {
    let flat = ArrayD::<f64>::zeros(IxDyn(&[4, 2]));
    let err = TrajectorySet::from_dyn(flat, vec!["01".into(), "02".into()], LocationFormat::Hubverse)
        .unwrap_err();
    assert!(matches!(err, HubError::TypeMismatch(_)));
    assert_eq!(err.info().context["rank"], "2");

    let empty = Array3::<f64>::zeros((0, 1, 1));
    assert!(matches!(
        TrajectorySet::new(empty, vec!["01".into()], LocationFormat::Hubverse),
        Err(HubError::EmptyInput(_))
    ));

    let mislabelled = Array3::<f64>::zeros((2, 2, 1));
    assert!(matches!(
        TrajectorySet::new(mislabelled, vec!["01".into()], LocationFormat::Hubverse),
        Err(HubError::SchemaViolation(_))
    ));
}

#[test]
fn non_finite_cells_are_surfaced_not_dropped() {
    let mut draws = Array3::from_shape_fn((4, 2, 1), |(d, _, _)| d as f64);
    draws[[2, 1, 0]] = f64::NAN;
    let table = project(&ensemble(draws), &[0.25, 0.5]).expect("project");
    assert_eq!(table.len(), 4);
    assert!(table.cell_values("01", 0).iter().all(|v| v.is_finite()));
    assert!(table.cell_values("02", 0).iter().all(|v| v.is_nan()));
}

#[test]
fn time_window_restarts_indices() {
    let draws = Array3::from_shape_fn((3, 1, 6), |(d, _, t)| (d + 10 * t) as f64);
    let set = ensemble(draws);
    let window = set.time_window(4, 2).expect("window");
    assert_eq!(window.n_time_points(), 2);
    let table = project(&window, &[0.5]).expect("project");
    assert_eq!(table.cell_values("01", 0), vec![41.0]);
    assert!(matches!(
        set.time_window(5, 2),
        Err(HubError::SchemaViolation(_))
    ));
}

proptest! {
    #[test]
    fn quantiles_never_decrease_within_a_cell(
        values in proptest::collection::vec(-1e6f64..1e6, 1..200),
        raw_levels in proptest::collection::btree_set(1u32..9999, 1..30),
    ) {
        let n = values.len();
        let draws = Array3::from_shape_vec((n, 1, 1), values).expect("shape");
        let levels: Vec<f64> = raw_levels.into_iter().map(|l| f64::from(l) / 10000.0).collect();
        let table = project(&ensemble(draws), &levels).expect("project");
        let cell = table.cell_values("01", 0);
        for pair in cell.windows(2) {
            prop_assert!(pair[0] <= pair[1], "{} > {}", pair[0], pair[1]);
        }
    }
}
