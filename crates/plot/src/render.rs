use slopefield_core::{FieldConfig, Grid, SlopeFunction, VectorField, streamline};
use tracing::{debug, instrument};

use crate::{Error, Figure, Quiver, StreamPlot};

/// Builds the direction-field figure of `dy/dx = f(x, y)`.
///
/// Arrows are drawn on the step-spaced grid from `config`. With streamlines
/// enabled, `f` is evaluated a second time on a dense 100 × 100 grid over the
/// same bounds, and curves are traced through that field. The step-spaced
/// arrows are the same either way.
///
/// The figure is only built, never shown or saved.
///
/// # Errors
///
/// Returns an error if `f` returns a grid of the wrong shape.
///
/// # Example
///
/// ```
/// use slopefield_core::{Bounds, FieldConfig, Steps, pointwise};
/// use slopefield_plot::render;
///
/// let config = FieldConfig::new(Bounds::new(-2.0, 2.0, -2.0, 2.0)?, Steps::new(0.5, 0.5)?);
/// let figure = render(&pointwise(|x, y| x - y), &config)?;
///
/// assert_eq!(figure.title(), "Direction field: dy/dx = f(x, y), type F");
/// assert_eq!(figure.quiver().grid().shape(), (9, 9));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(
    skip_all,
    fields(
        field_type = %config.field_type(),
        streamlines = config.streamlines(),
    ),
)]
pub fn render<F>(f: &F, config: &FieldConfig) -> Result<Figure, Error>
where
    F: SlopeFunction + ?Sized,
{
    let bounds = config.bounds();

    let grid = Grid::stepped(bounds, config.steps());
    let field = VectorField::compute(f, &grid, config.field_type())?;
    debug!(
        rows = grid.rows(),
        columns = grid.columns(),
        finite = field.finite_count(),
        "coarse field computed"
    );

    let figure = Figure::new(config.field_type(), bounds, Quiver::new(grid, field));
    if !config.streamlines() {
        return Ok(figure);
    }

    let dense = Grid::dense(bounds);
    let dense_field = VectorField::compute(f, &dense, config.field_type())?;
    let lines = streamline::trace(&dense, &dense_field, config.density());
    debug!(
        density = config.density().value(),
        streamlines = lines.len(),
        "streamlines added"
    );

    Ok(figure.with_streamlines(StreamPlot::new(lines, config.density())))
}
