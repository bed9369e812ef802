use std::f64::consts::FRAC_1_SQRT_2;

use approx::assert_relative_eq;
use ndarray::Array2;
use slopefield_core::{Bounds, Density, FieldConfig, FieldType, ShapeError, Steps, pointwise};
use slopefield_plot::{Error, ReferenceLine, SlopeFunction, render};

fn config(bounds: [f64; 4], step: f64) -> FieldConfig {
    let [x_min, x_max, y_min, y_max] = bounds;
    FieldConfig::new(
        Bounds::new(x_min, x_max, y_min, y_max).unwrap(),
        Steps::new(step, step).unwrap(),
    )
}

#[test]
fn full_field_arrows_are_raw_slopes() {
    let f = pointwise(|x, y| x * y - 1.0);
    let config = config([-2.0, 2.0, -1.0, 3.0], 0.5);

    let figure = render(&f, &config).unwrap();

    let quiver = figure.quiver();
    let expected = f.slope(quiver.grid().x(), quiver.grid().y());
    assert!(quiver.field().u().iter().all(|&u| u == 1.0));
    assert_eq!(quiver.field().v(), &expected);
    assert_eq!(quiver.field().field_type(), FieldType::Full);
}

#[test]
fn normalized_field_arrows_have_unit_length() {
    let f = pointwise(|x, y| (x - y).exp());
    let config = config([-2.0, 2.0, -2.0, 2.0], 0.25).with_field_type(FieldType::Normalized);

    let figure = render(&f, &config).unwrap();

    let field = figure.quiver().field();
    for (&u, &v) in field.u().iter().zip(field.v()) {
        assert_relative_eq!(u * u + v * v, 1.0, epsilon = 1e-12);
    }
}

#[test]
fn linear_growth_arrows() {
    let config = config([-2.0, 2.0, -2.0, 2.0], 1.0);

    let figure = render(&pointwise(|_x, y| y), &config).unwrap();

    let quiver = figure.quiver();
    assert_eq!(quiver.grid().shape(), (5, 5));
    // (0, 1) is row 3, column 2; (0, -1) is row 1, column 2.
    assert_eq!(quiver.grid().x()[[3, 2]], 0.0);
    assert_eq!(quiver.grid().y()[[3, 2]], 1.0);
    assert_relative_eq!(quiver.field().u()[[3, 2]], 1.0);
    assert_relative_eq!(quiver.field().v()[[3, 2]], 1.0);
    assert_relative_eq!(quiver.field().u()[[1, 2]], 1.0);
    assert_relative_eq!(quiver.field().v()[[1, 2]], -1.0);
}

#[test]
fn circular_normalized_arrows() {
    let config = config([-2.0, 2.0, -2.0, 2.0], 1.0).with_field_type(FieldType::Normalized);

    let figure = render(&pointwise(|x, y| -x / y), &config).unwrap();

    // (1, 1) is row 3, column 3.
    let field = figure.quiver().field();
    assert_relative_eq!(field.u()[[3, 3]], FRAC_1_SQRT_2, epsilon = 1e-12);
    assert_relative_eq!(field.v()[[3, 3]], -FRAC_1_SQRT_2, epsilon = 1e-12);
}

#[test]
fn column_count_includes_reachable_upper_bound() {
    let f = pointwise(|_, _| 0.0);

    let exact = render(&f, &config([0.0, 2.0, 0.0, 2.0], 0.5)).unwrap();
    assert_eq!(exact.quiver().grid().columns(), 5);
    assert_eq!(exact.quiver().grid().rows(), 5);

    let inexact = render(&f, &config([0.0, 2.0, 0.0, 2.0], 0.7)).unwrap();
    let xs = inexact.quiver().grid().x_values();
    assert_eq!(xs.len(), 3);
    assert_relative_eq!(xs[1], 0.7, epsilon = 1e-12);
    assert_relative_eq!(xs[2], 1.4, epsilon = 1e-12);
}

#[test]
fn unknown_field_type_is_rejected_first() {
    for code in ["X", "f", "", "FN"] {
        // Bounds and steps are invalid too, but the field type is checked first.
        let result = FieldConfig::from_parts(1.0, 0.0, 1.0, 0.0, -1.0, 0.0, code, true, -2.0)
            .map_err(Error::from)
            .and_then(|config| render(&pointwise(|x, _| x), &config));

        assert!(
            matches!(
                result,
                Err(Error::Field(slopefield_core::Error::FieldType(ref e))) if e.0 == code
            ),
            "{code:?}: {result:?}"
        );
    }
}

#[test]
fn positional_parts_build_the_same_figure() {
    let config = FieldConfig::from_parts(-1.0, 1.0, -1.0, 1.0, 0.5, 0.5, "N", false, 1.0).unwrap();

    let figure = render(&pointwise(|x, y| x + y), &config).unwrap();

    assert_eq!(figure.title(), "Direction field: dy/dx = f(x, y), type N");
    assert!(figure.streamlines().is_none());
}

#[test]
fn wrong_shape_slope_is_rejected() {
    let f = |_x: &Array2<f64>, _y: &Array2<f64>| Array2::<f64>::zeros((1, 1));

    let err = render(&f, &config([0.0, 1.0, 0.0, 1.0], 0.5)).unwrap_err();

    assert!(matches!(
        err,
        Error::Field(slopefield_core::Error::Shape(ShapeError {
            expected: (3, 3),
            actual: (1, 1),
        }))
    ));
}

#[test]
fn decorations_follow_config() {
    let figure = render(&pointwise(|x, _| x), &config([-3.0, 1.0, 0.5, 2.5], 0.5)).unwrap();

    assert_eq!(figure.title(), "Direction field: dy/dx = f(x, y), type F");
    assert_eq!(figure.x_label(), "x");
    assert_eq!(figure.y_label(), "y");
    assert_eq!(figure.x_range(), (-3.0, 1.0));
    assert_eq!(figure.y_range(), (0.5, 2.5));
    assert_eq!(figure.size(), (1000, 800));
    assert_eq!(figure.reference_lines(), [ReferenceLine::Vertical]);
}

#[test]
fn streamlines_leave_arrows_unchanged() {
    let f = pointwise(|x, y| y.sin() - x);
    let without = config([-2.0, 2.0, -2.0, 2.0], 0.5);
    let with = without.with_streamlines(Density::new(1.0).unwrap());

    let plain = render(&f, &without).unwrap();
    let streamed = render(&f, &with).unwrap();

    assert_eq!(plain.quiver().grid(), streamed.quiver().grid());
    assert_eq!(plain.quiver().field(), streamed.quiver().field());
    assert!(plain.streamlines().is_none());
    assert!(!streamed.streamlines().unwrap().lines().is_empty());
}

#[test]
fn streamlines_stay_within_bounds() {
    let config = config([-1.0, 3.0, -2.0, 0.0], 0.5)
        .with_field_type(FieldType::Normalized)
        .with_streamlines(Density::new(1.5).unwrap());

    let figure = render(&pointwise(|x, y| x * y), &config).unwrap();

    let streamlines = figure.streamlines().unwrap();
    assert_eq!(streamlines.density(), Density::new(1.5).unwrap());
    assert_relative_eq!(streamlines.width(), 1.5);
    for line in streamlines.lines() {
        for &[x, y] in line.points() {
            assert!((-1.0 - 1e-9..=3.0 + 1e-9).contains(&x), "x = {x}");
            assert!((-2.0 - 1e-9..=1e-9).contains(&y), "y = {y}");
        }
    }
}

#[test]
fn denser_streamlines_are_more_numerous() {
    let f = pointwise(|x, y| x - y * y);
    let base = config([-2.0, 2.0, -2.0, 2.0], 0.5).with_field_type(FieldType::Normalized);

    let count = |density: f64| {
        let config = base.with_streamlines(Density::new(density).unwrap());
        render(&f, &config).unwrap().streamlines().unwrap().lines().len()
    };

    assert!(count(2.0) >= count(0.5));
}

#[test]
fn svg_draws_title_and_one_polygon_per_finite_arrow() {
    // Slopes are infinite along x = 0, and undefined at the origin. Every
    // other arrow starts inside the axes and keeps part of its shaft there.
    let f = pointwise(|x, y| 0.1 - y / x);
    let figure = render(&f, &config([-2.0, 2.0, -2.0, 2.0], 0.5)).unwrap();

    let svg = figure.to_svg().unwrap();

    let finite = figure.quiver().field().finite_count();
    assert_eq!(finite, 9 * 8);
    assert!(svg.contains("Direction field: dy/dx = f(x, y), type F"));
    assert_eq!(svg.matches("<polygon").count(), finite);
}

#[test]
fn svg_draws_one_red_curve_and_arrowhead_per_streamline() {
    let config = config([-2.0, 2.0, -2.0, 2.0], 0.5).with_streamlines(Density::default());
    let figure = render(&pointwise(|x, y| 0.1 - y / x), &config).unwrap();

    let svg = figure.to_svg().unwrap();

    let lines = figure.streamlines().unwrap().lines().len();
    let arrows = figure.quiver().field().finite_count();
    assert!(lines > 0);
    assert_eq!(tags_with(&svg, "<polyline", "#FF0000"), lines);
    assert_eq!(tags_with(&svg, "<polygon", "#FF0000"), lines);
    assert_eq!(tags_with(&svg, "<polygon", "#0000FF"), arrows);
    assert_eq!(svg.matches("<polygon").count(), arrows + lines);
}

/// Counts the SVG elements named by `tag` that mention `color`.
fn tags_with(svg: &str, tag: &str, color: &str) -> usize {
    svg.split(tag)
        .skip(1)
        .filter(|element| element.split('>').next().unwrap().contains(color))
        .count()
}

#[test]
fn svg_is_deterministic() {
    let config = config([-2.0, 2.0, -2.0, 2.0], 0.5).with_streamlines(Density::default());
    let f = pointwise(|x, y| x.cos() * y);

    let first = render(&f, &config).unwrap().to_svg().unwrap();
    let second = render(&f, &config).unwrap().to_svg().unwrap();

    assert_eq!(first, second);
}

#[test]
fn save_svg_writes_file() {
    let figure = render(&pointwise(|x, _| x), &config([0.0, 1.0, 0.0, 1.0], 0.25)).unwrap();
    let path = std::env::temp_dir().join(format!("slopefield-{}.svg", std::process::id()));

    figure.save_svg(&path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(written, figure.to_svg().unwrap());
}

#[test]
fn save_svg_reports_io_errors() {
    let figure = render(&pointwise(|x, _| x), &config([0.0, 1.0, 0.0, 1.0], 0.25)).unwrap();
    let path = std::env::temp_dir()
        .join("slopefield-missing-dir")
        .join("figure.svg");

    let err = figure.save_svg(path).unwrap_err();

    assert!(matches!(err, Error::Io(_)));
}
