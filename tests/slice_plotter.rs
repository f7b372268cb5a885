use burn::backend::NdArray;
use burn::tensor::{Tensor, TensorData};
use pinn_slice::demo::SyntheticCloud;
use pinn_slice::{FieldMap, PlotError, SliceConfig, SliceValidatorPlotter, ValidatorPlotter};

type TestBackend = NdArray<f32>;

fn column(values: &[f32]) -> Tensor<TestBackend, 2> {
    Tensor::from_data(
        TensorData::new(values.to_vec(), [values.len(), 1]),
        &Default::default(),
    )
}

fn field_maps(
    x: &[f32],
    y: &[f32],
    z: &[f32],
    u_true: &[f32],
    u_pred: &[f32],
) -> (
    FieldMap<TestBackend>,
    FieldMap<TestBackend>,
    FieldMap<TestBackend>,
) {
    let invar = FieldMap::from([
        ("x".to_string(), column(x)),
        ("y".to_string(), column(y)),
        ("z".to_string(), column(z)),
    ]);
    (
        invar,
        FieldMap::from([("u".to_string(), column(u_true))]),
        FieldMap::from([("u".to_string(), column(u_pred))]),
    )
}

fn small_three_fin() -> SliceConfig {
    SliceConfig {
        resolution: (40, 30),
        ..SliceConfig::three_fin_flow()
    }
}

#[test]
fn band_slice_uses_selected_extent() {
    let y = [0.05, 0.066, 0.0661, 0.0665, 0.08];
    let x = [-5.0, 0.0, 1.0, 0.0, 5.0];
    let z = [-5.0, 0.0, 0.0, 2.0, 5.0];
    let u = [9.0, 1.0, 2.0, 3.0, 9.0];
    let (invar, t, p) = field_maps(&x, &y, &z, &u, &u);

    let plotter = SliceValidatorPlotter::new(small_three_fin());
    let figures = plotter.plot(&invar, &t, &p).expect("plot failed");

    assert_eq!(figures.len(), 1);
    let (figure, name) = &figures[0];
    assert_eq!(name, "custom_plot");
    assert_eq!(figure.extent.xmin, 0.0);
    assert_eq!(figure.extent.xmax, 1.0);
    assert_eq!(figure.extent.zmin, 0.0);
    assert_eq!(figure.extent.zmax, 2.0);
    assert_eq!((figure.truth.grid.nx, figure.truth.grid.nz), (40, 30));
    // 外側の点 (u = 9) は補間に使われない
    let (_, hi) = figure.truth.grid.finite_range().unwrap();
    assert!(hi <= 3.0 + 1e-6);
}

#[test]
fn difference_panel_is_truth_minus_prediction() {
    let config = SliceConfig {
        resolution: (25, 25),
        ..SliceConfig::lid_driven_cavity()
    };
    let cloud = SyntheticCloud::generate(600, &config.predicate, 0.1, 11);
    let (invar, t, p) = cloud.to_field_maps::<TestBackend>("u", &Default::default());

    let figures = SliceValidatorPlotter::new(config).plot(&invar, &t, &p).unwrap();
    let figure = &figures[0].0;
    let truth = &figure.truth.grid.values;
    let pred = &figure.prediction.grid.values;
    let diff = &figure.difference.grid.values;
    assert_eq!(diff.len(), 625);
    for ((a, b), d) in truth.iter().zip(pred).zip(diff) {
        if a.is_nan() || b.is_nan() {
            assert!(d.is_nan());
        } else {
            assert_eq!(*d, a - b);
        }
    }
    assert!(figure.difference.grid.defined_count() > 0);
    assert_eq!(figure.annotations.len(), 3);
}

#[test]
fn data_driven_scale_follows_grid_values() {
    let config = SliceConfig {
        resolution: (20, 20),
        ..SliceConfig::lid_driven_cavity()
    };
    let cloud = SyntheticCloud::generate(400, &config.predicate, 0.0, 5);
    let (invar, t, p) = cloud.to_field_maps::<TestBackend>("u", &Default::default());
    let figures = SliceValidatorPlotter::new(config).plot(&invar, &t, &p).unwrap();
    let figure = &figures[0].0;
    let (lo, hi) = figure.truth.grid.finite_range().unwrap();
    assert_eq!((figure.truth.vmin, figure.truth.vmax), (lo, hi));
}

#[test]
fn perturbed_plane_gives_empty_selection() {
    let y = [0.06566_f32, 0.0656, 0.07];
    let x = [0.0, 1.0, 0.0];
    let z = [0.0, 0.0, 1.0];
    let (invar, t, p) = field_maps(&x, &y, &z, &x, &x);
    let config = SliceConfig {
        resolution: (10, 10),
        ..SliceConfig::lid_driven_cavity()
    };
    let err = SliceValidatorPlotter::new(config)
        .plot(&invar, &t, &p)
        .unwrap_err();
    assert!(matches!(err, PlotError::EmptySelection));
}

#[test]
fn missing_prediction_field_is_reported() {
    let values = [0.066_f32; 3];
    let (invar, t, _) = field_maps(&values, &values, &values, &values, &values);
    let empty = FieldMap::<TestBackend>::new();
    let err = SliceValidatorPlotter::new(small_three_fin())
        .plot(&invar, &t, &empty)
        .unwrap_err();
    assert!(matches!(err, PlotError::MissingField(name) if name == "u"));
}

#[test]
fn mismatched_lengths_are_rejected() {
    let (invar, t, p) = field_maps(
        &[0.0, 1.0, 0.0],
        &[0.066, 0.066, 0.066],
        &[0.0, 0.0, 1.0],
        &[1.0, 2.0],
        &[1.0, 2.0, 3.0],
    );
    let err = SliceValidatorPlotter::new(small_three_fin())
        .plot(&invar, &t, &p)
        .unwrap_err();
    assert!(matches!(
        err,
        PlotError::LengthMismatch {
            expected: 3,
            actual: 2,
            ..
        }
    ));
}

#[test]
fn plotting_is_deterministic() {
    let config = SliceConfig {
        resolution: (30, 30),
        ..SliceConfig::three_fin_flow()
    };
    let cloud = SyntheticCloud::generate(500, &config.predicate, 0.05, 99);
    let (invar, t, p) = cloud.to_field_maps::<TestBackend>("u", &Default::default());
    let plotter = SliceValidatorPlotter::new(config);
    let first = plotter.plot(&invar, &t, &p).unwrap();
    let second = plotter.plot(&invar, &t, &p).unwrap();
    let a = &first[0].0.truth.grid.values;
    let b = &second[0].0.truth.grid.values;
    assert_eq!(a.len(), b.len());
    assert!(a.iter().zip(b).all(|(a, b)| a == b || (a.is_nan() && b.is_nan())));
}
