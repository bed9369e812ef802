use ndarray::{Array1, Array2, ArrayView1, s};

use crate::config::{Bounds, Steps};

/// Number of points per axis in the dense grid used for streamlines.
pub const DENSE_POINTS: usize = 100;

/// Relative slack, in steps, when deciding whether the upper bound is reachable.
const STEP_TOLERANCE: f64 = 1e-9;

/// A rectangular sampling grid built as the Cartesian product of x and y values.
///
/// Both coordinate arrays have shape `(rows, columns)`, where rows follow the
/// y-values and columns follow the x-values, so `x()[[i, j]]` is the `j`-th
/// x-value and `y()[[i, j]]` is the `i`-th y-value.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    x: Array2<f64>,
    y: Array2<f64>,
}

impl Grid {
    /// Builds a grid from its axis values.
    #[must_use]
    pub fn from_values(x_values: &[f64], y_values: &[f64]) -> Self {
        Self::mesh(ArrayView1::from(x_values), ArrayView1::from(y_values))
    }

    /// Builds the step-spaced grid covering `bounds`.
    ///
    /// Each axis starts at its lower bound and advances by its step, including
    /// the upper bound when it is reachable by a whole number of steps.
    #[must_use]
    pub fn stepped(bounds: &Bounds, steps: &Steps) -> Self {
        let x = stepped_values(bounds.x_min(), bounds.x_max(), steps.x());
        let y = stepped_values(bounds.y_min(), bounds.y_max(), steps.y());
        Self::mesh(x.view(), y.view())
    }

    /// Builds an evenly spaced `points` × `points` grid spanning `bounds` exactly.
    #[must_use]
    pub fn linspace(bounds: &Bounds, points: usize) -> Self {
        let x = Array1::linspace(bounds.x_min(), bounds.x_max(), points);
        let y = Array1::linspace(bounds.y_min(), bounds.y_max(), points);
        Self::mesh(x.view(), y.view())
    }

    /// Builds the fixed-resolution grid used for streamline tracing.
    #[must_use]
    pub fn dense(bounds: &Bounds) -> Self {
        Self::linspace(bounds, DENSE_POINTS)
    }

    fn mesh(x_values: ArrayView1<'_, f64>, y_values: ArrayView1<'_, f64>) -> Self {
        let shape = (y_values.len(), x_values.len());
        Self {
            x: Array2::from_shape_fn(shape, |(_, j)| x_values[j]),
            y: Array2::from_shape_fn(shape, |(i, _)| y_values[i]),
        }
    }

    /// Returns the x coordinate of every grid point.
    #[must_use]
    pub fn x(&self) -> &Array2<f64> {
        &self.x
    }

    /// Returns the y coordinate of every grid point.
    #[must_use]
    pub fn y(&self) -> &Array2<f64> {
        &self.y
    }

    /// Returns the grid shape as `(rows, columns)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        self.x.dim()
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.x.nrows()
    }

    #[must_use]
    pub fn columns(&self) -> usize {
        self.x.ncols()
    }

    /// Returns the distinct x-values, one per column.
    ///
    /// Empty when the grid has no points.
    #[must_use]
    pub fn x_values(&self) -> ArrayView1<'_, f64> {
        if self.x.is_empty() {
            return ArrayView1::from(&[] as &[f64]);
        }
        self.x.slice(s![0, ..])
    }

    /// Returns the distinct y-values, one per row.
    ///
    /// Empty when the grid has no points.
    #[must_use]
    pub fn y_values(&self) -> ArrayView1<'_, f64> {
        if self.y.is_empty() {
            return ArrayView1::from(&[] as &[f64]);
        }
        self.y.slice(s![.., 0])
    }
}

/// Returns how many step-spaced values fit in `[min, max]`, counting `min`.
///
/// Equal to `floor((max - min) / step) + 1`, with a small tolerance so that a
/// bound reachable in exact arithmetic is not lost to rounding.
///
/// The last value never lies past `max`. A half-open range up to
/// `max + step` can overshoot instead: `0..2` by `0.7` gives `0, 0.7, 1.4`
/// here, where such a range would add `2.1`.
#[must_use]
pub fn step_count(min: f64, max: f64, step: f64) -> usize {
    let steps = (max - min) / step;
    if !steps.is_finite() || steps < 0.0 {
        return 1;
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let whole = (steps + STEP_TOLERANCE * steps.max(1.0)).floor() as usize;
    whole + 1
}

#[allow(clippy::cast_precision_loss)]
fn stepped_values(min: f64, max: f64, step: f64) -> Array1<f64> {
    let count = step_count(min, max, step);
    Array1::from_shape_fn(count, |i| min + i as f64 * step)
}
