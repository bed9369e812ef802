use ndarray::Array2;

use crate::{Grid, VectorField};

/// Coordinate conversions and field sampling for streamline tracing.
///
/// Tracing happens in grid coordinates, where `(i, j)` is column `i` and row
/// `j` of the sampled field and fractional values fall between samples. The
/// field is rescaled so that one unit of integration length moves the full
/// width (or height) of the domain.
#[derive(Debug)]
pub(super) struct DomainMap {
    u: Array2<f64>,
    v: Array2<f64>,
    origin: [f64; 2],
    spacing: [f64; 2],
    grid_to_mask: [f64; 2],
    mask: (usize, usize),
}

impl DomainMap {
    /// Builds the map for an evenly spaced grid and an occupancy mask size.
    ///
    /// Returns `None` if the grid has fewer than two samples along an axis or
    /// the field does not match the grid.
    pub(super) fn new(grid: &Grid, field: &VectorField, mask: (usize, usize)) -> Option<Self> {
        let (rows, cols) = grid.shape();
        if rows < 2 || cols < 2 || field.shape() != grid.shape() {
            return None;
        }

        let xs = grid.x_values();
        let ys = grid.y_values();
        let width = xs[cols - 1] - xs[0];
        let height = ys[rows - 1] - ys[0];
        if !(width > 0.0 && height > 0.0) {
            return None;
        }

        #[allow(clippy::cast_precision_loss)]
        let (last_col, last_row) = ((cols - 1) as f64, (rows - 1) as f64);
        #[allow(clippy::cast_precision_loss)]
        let (mask_last_x, mask_last_y) = (
            mask.0.saturating_sub(1) as f64,
            mask.1.saturating_sub(1) as f64,
        );

        Some(Self {
            u: field.u() * (last_col / width),
            v: field.v() * (last_row / height),
            origin: [xs[0], ys[0]],
            spacing: [width / last_col, height / last_row],
            grid_to_mask: [mask_last_x / last_col, mask_last_y / last_row],
            mask,
        })
    }

    #[allow(clippy::cast_precision_loss)]
    fn last_index(&self) -> [f64; 2] {
        let (rows, cols) = self.u.dim();
        [(cols - 1) as f64, (rows - 1) as f64]
    }

    /// Returns `true` if the grid point lies within the sampled field.
    pub(super) fn within_grid(&self, [x, y]: [f64; 2]) -> bool {
        let [x_last, y_last] = self.last_index();
        (0.0..=x_last).contains(&x) && (0.0..=y_last).contains(&y)
    }

    /// Returns the mask cell containing a grid point.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub(super) fn mask_cell(&self, [x, y]: [f64; 2]) -> (usize, usize) {
        let (nx, ny) = self.mask;
        (
            ((x * self.grid_to_mask[0]).round().max(0.0) as usize).min(nx.saturating_sub(1)),
            ((y * self.grid_to_mask[1]).round().max(0.0) as usize).min(ny.saturating_sub(1)),
        )
    }

    /// Returns the grid point a mask cell seeds from.
    pub(super) fn seed(&self, (x, y): (usize, usize)) -> [f64; 2] {
        let last = self.last_index();

        #[allow(clippy::cast_precision_loss)]
        let cell = [x as f64, y as f64];
        std::array::from_fn(|axis| {
            if self.grid_to_mask[axis] > 0.0 {
                (cell[axis] / self.grid_to_mask[axis]).min(last[axis])
            } else {
                last[axis] / 2.0
            }
        })
    }

    /// Converts a grid point to data coordinates.
    pub(super) fn to_data(&self, [x, y]: [f64; 2]) -> [f64; 2] {
        [
            self.origin[0] + x * self.spacing[0],
            self.origin[1] + y * self.spacing[1],
        ]
    }

    /// Returns the unit-speed direction of travel at a grid point.
    ///
    /// Speed is measured in domain fractions, so a step of length `ds` covers
    /// `ds` of the domain. Returns `None` where the field is non-finite or zero.
    pub(super) fn direction(&self, point: [f64; 2]) -> Option<[f64; 2]> {
        let u = interpolate(&self.u, point);
        let v = interpolate(&self.v, point);
        let [x_last, y_last] = self.last_index();
        let speed = (u / x_last).hypot(v / y_last);

        (speed.is_finite() && speed > 0.0).then(|| [u / speed, v / speed])
    }
}

/// Bilinear interpolation of `a` at a grid point inside the grid.
fn interpolate(a: &Array2<f64>, [x, y]: [f64; 2]) -> f64 {
    let (rows, cols) = a.dim();

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let (i, j) = ((x as usize).min(cols - 1), (y as usize).min(rows - 1));
    let i_next = (i + 1).min(cols - 1);
    let j_next = (j + 1).min(rows - 1);

    #[allow(clippy::cast_precision_loss)]
    let (tx, ty) = (x - i as f64, y - j as f64);

    let bottom = a[[j, i]] * (1.0 - tx) + a[[j, i_next]] * tx;
    let top = a[[j_next, i]] * (1.0 - tx) + a[[j_next, i_next]] * tx;
    bottom * (1.0 - ty) + top * ty
}
