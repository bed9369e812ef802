//! Streamline tracing over a sampled vector field.
//!
//! Streamlines are curves everywhere tangent to the field. For a direction
//! field of `dy/dx = f(x, y)` they approximate solution curves of the ODE.
//!
//! # Algorithm
//!
//! 1. Divide the domain into an occupancy mask of `floor(30 × density)` cells
//!    per side, capped at the dense grid's resolution.
//! 2. Visit the mask cells in a spiral from the border inward. Every cell not
//!    yet claimed seeds a new trajectory.
//! 3. Trace the trajectory backward, then forward, with fixed-length Heun
//!    steps through the bilinearly interpolated field, normalized to unit
//!    speed. Each step claims the mask cell it lands in.
//! 4. A direction stops when it leaves the domain, meets a non-finite or zero
//!    vector, enters a claimed cell, or the trajectory grows longer than four
//!    domain widths.
//! 5. Trajectories shorter than a tenth of the domain are discarded and their
//!    cells released.
//!
//! Lengths are measured in domain fractions, so the result does not depend on
//! the aspect ratio of the bounds.

mod domain;
mod mask;
mod spiral;

use tracing::{debug, trace};

use crate::{DENSE_POINTS, Density, Grid, VectorField};

use domain::DomainMap;
use mask::OccupancyMask;

/// Mask cells per side at a density of `1.0`.
const MASK_CELLS_PER_UNIT_DENSITY: f64 = 30.0;

/// Longest trajectory, in domain fractions.
const MAX_LENGTH: f64 = 4.0;

/// Shortest trajectory kept, in domain fractions.
const MIN_LENGTH: f64 = 0.1;

/// Upper bound on the integration step, in domain fractions.
const MAX_STEP: f64 = 0.1;

/// A traced curve tangent to a vector field, ordered along the flow.
#[derive(Debug, Clone, PartialEq)]
pub struct Streamline {
    points: Vec<[f64; 2]>,
}

impl Streamline {
    /// Returns the curve's points in data coordinates.
    #[must_use]
    pub fn points(&self) -> &[[f64; 2]] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the curve's length in data units.
    #[must_use]
    pub fn arc_length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| (w[1][0] - w[0][0]).hypot(w[1][1] - w[0][1]))
            .sum()
    }

    /// Returns a short `(tail, head)` segment halfway along the curve.
    ///
    /// The segment points in the direction of flow, which makes it a natural
    /// anchor for an arrowhead. Returns `None` for curves with fewer than two
    /// points.
    #[must_use]
    pub fn midpoint_segment(&self) -> Option<([f64; 2], [f64; 2])> {
        if self.points.len() < 2 {
            return None;
        }

        let half = self.arc_length() / 2.0;
        let mut walked = 0.0;
        for w in self.points.windows(2) {
            walked += (w[1][0] - w[0][0]).hypot(w[1][1] - w[0][1]);
            if walked >= half {
                let head = [(w[0][0] + w[1][0]) / 2.0, (w[0][1] + w[1][1]) / 2.0];
                return Some((w[0], head));
            }
        }

        let n = self.points.len();
        Some((self.points[n - 2], self.points[n - 1]))
    }
}

/// Traces streamlines through a field sampled on an evenly spaced grid.
///
/// Higher densities produce more, closer-spaced curves. Returns no curves if
/// the grid has fewer than two samples along an axis or the field does not
/// match it.
#[must_use]
pub fn trace(grid: &Grid, field: &VectorField, density: Density) -> Vec<Streamline> {
    let cells = mask_cells(density);
    let Some(domain) = DomainMap::new(grid, field, (cells, cells)) else {
        debug!(shape = ?grid.shape(), "grid too small for streamlines");
        return Vec::new();
    };

    #[allow(clippy::cast_precision_loss)]
    let step = 0.5 * MAX_STEP.min(1.0 / cells as f64);

    let mut tracer = Tracer {
        domain,
        mask: OccupancyMask::new(cells, cells),
        step,
    };

    let mut streamlines = Vec::new();
    for cell in spiral::spiral(tracer.mask.nx(), tracer.mask.ny()) {
        if !tracer.mask.is_free(cell) {
            continue;
        }
        if let Some(streamline) = tracer.trajectory(cell) {
            trace!(points = streamline.len(), ?cell, "streamline traced");
            streamlines.push(streamline);
        }
    }

    debug!(
        mask_cells = cells,
        streamlines = streamlines.len(),
        "streamlines traced"
    );
    streamlines
}

/// Returns the occupancy mask size per side for a density.
///
/// At least one cell, and never more than [`DENSE_POINTS`]: cells finer than
/// the sampled field would not separate streamlines any further.
#[must_use]
pub fn mask_cells(density: Density) -> usize {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let cells = (MASK_CELLS_PER_UNIT_DENSITY * density.value()).floor() as usize;
    cells.clamp(1, DENSE_POINTS)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

impl Direction {
    fn sign(self) -> f64 {
        match self {
            Self::Forward => 1.0,
            Self::Backward => -1.0,
        }
    }
}

struct Tracer {
    domain: DomainMap,
    mask: OccupancyMask,
    step: f64,
}

impl Tracer {
    /// Traces a full trajectory seeded from a free mask cell.
    fn trajectory(&mut self, cell: (usize, usize)) -> Option<Streamline> {
        let start = self.domain.seed(cell);
        let start_cell = self.domain.mask_cell(start);
        self.mask.start(start_cell).ok()?;

        let (back_length, mut points) = self.integrate(start, Direction::Backward);
        self.mask.reset_start(start_cell);
        let (forward_length, forward) = self.integrate(start, Direction::Forward);

        points.reverse();
        points.extend(forward.into_iter().skip(1));

        if points.len() > 1 && back_length + forward_length > MIN_LENGTH {
            let points = points.into_iter().map(|p| self.domain.to_data(p)).collect();
            Some(Streamline { points })
        } else {
            self.mask.undo();
            None
        }
    }

    /// Integrates from `start` in one direction, returning the length covered
    /// and the grid points visited, `start` first.
    fn integrate(&mut self, start: [f64; 2], direction: Direction) -> (f64, Vec<[f64; 2]>) {
        let ds = direction.sign() * self.step;
        let mut length = 0.0;
        let mut points = Vec::new();
        let mut p = start;

        while self.domain.within_grid(p) {
            points.push(p);

            let Some(k1) = self.domain.direction(p) else {
                break;
            };
            let predicted = [p[0] + ds * k1[0], p[1] + ds * k1[1]];
            if !self.domain.within_grid(predicted) {
                break;
            }
            let Some(k2) = self.domain.direction(predicted) else {
                break;
            };

            p = [
                p[0] + ds * 0.5 * (k1[0] + k2[0]),
                p[1] + ds * 0.5 * (k1[1] + k2[1]),
            ];
            if !self.domain.within_grid(p) || self.mask.update(self.domain.mask_cell(p)).is_err() {
                break;
            }
            if length + self.step > MAX_LENGTH {
                break;
            }
            length += self.step;
        }

        (length, points)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::{Bounds, FieldType, SlopeFunction, pointwise};

    fn streamlines_for<F: SlopeFunction>(
        f: &F,
        bounds: &Bounds,
        field_type: FieldType,
        density: f64,
    ) -> Vec<Streamline> {
        let grid = Grid::dense(bounds);
        let field = VectorField::compute(f, &grid, field_type).unwrap();
        trace(&grid, &field, Density::new(density).unwrap())
    }

    fn square(half_width: f64) -> Bounds {
        Bounds::new(-half_width, half_width, -half_width, half_width).unwrap()
    }

    #[test]
    fn mask_size_follows_density() {
        assert_eq!(mask_cells(Density::new(1.0).unwrap()), 30);
        assert_eq!(mask_cells(Density::new(0.5).unwrap()), 15);
        assert_eq!(mask_cells(Density::new(2.0).unwrap()), 60);
        assert_eq!(mask_cells(Density::new(0.01).unwrap()), 1);
    }

    #[test]
    fn mask_size_is_capped_at_dense_resolution() {
        assert_eq!(mask_cells(Density::new(10.0).unwrap()), DENSE_POINTS);
        assert_eq!(mask_cells(Density::new(1e6).unwrap()), DENSE_POINTS);
        assert_eq!(mask_cells(Density::new(f64::MAX).unwrap()), DENSE_POINTS);
    }

    #[test]
    fn huge_density_traces_like_the_cap() {
        let f = pointwise(|x, y| x - y);
        let bounds = square(1.0);

        let huge = streamlines_for(&f, &bounds, FieldType::Normalized, 1e6);
        let capped = streamlines_for(&f, &bounds, FieldType::Normalized, 4.0);

        assert!(!huge.is_empty());
        assert_eq!(huge, capped);
    }

    #[test]
    fn constant_slope_gives_straight_parallel_lines() {
        let bounds = square(2.0);
        let lines = streamlines_for(&pointwise(|_, _| 0.5), &bounds, FieldType::Full, 1.0);

        assert!(!lines.is_empty());
        for line in &lines {
            for w in line.points().windows(2) {
                let [dx, dy] = [w[1][0] - w[0][0], w[1][1] - w[0][1]];
                assert_relative_eq!(dy / dx, 0.5, epsilon = 1e-9);
                assert!(dx > 0.0, "flow runs in the direction of increasing x");
            }
        }
    }

    #[test]
    fn streamlines_are_tangent_to_field() {
        let bounds = square(2.0);
        let f = |x: f64, _y: f64| x;
        let lines = streamlines_for(&pointwise(f), &bounds, FieldType::Normalized, 1.0);

        assert!(!lines.is_empty());
        for line in &lines {
            for w in line.points().windows(2) {
                let [dx, dy] = [w[1][0] - w[0][0], w[1][1] - w[0][1]];
                let mid_x = (w[0][0] + w[1][0]) / 2.0;
                assert_relative_eq!(dy / dx, f(mid_x, 0.0), epsilon = 1e-2);
            }
        }
    }

    #[test]
    fn streamlines_stay_inside_bounds() {
        let bounds = Bounds::new(-3.0, 1.0, 0.5, 2.5).unwrap();
        let lines = streamlines_for(&pointwise(|x, y| x - y), &bounds, FieldType::Full, 1.0);

        assert!(!lines.is_empty());
        for line in &lines {
            assert!(line.len() >= 2);
            for &[x, y] in line.points() {
                assert!(x.is_finite() && y.is_finite());
                assert!(x >= bounds.x_min() - 1e-9 && x <= bounds.x_max() + 1e-9);
                assert!(y >= bounds.y_min() - 1e-9 && y <= bounds.y_max() + 1e-9);
            }
        }
    }

    #[test]
    fn higher_density_packs_more_streamlines() {
        let bounds = square(2.0);
        let f = pointwise(|x, y| -x / y);

        let sparse = streamlines_for(&f, &bounds, FieldType::Normalized, 0.5);
        let dense = streamlines_for(&f, &bounds, FieldType::Normalized, 2.0);

        assert!(dense.len() > sparse.len(), "{} <= {}", dense.len(), sparse.len());
    }

    #[test]
    fn singular_slopes_do_not_escape_as_non_finite_points() {
        let bounds = square(1.0);
        let lines = streamlines_for(&pointwise(|x, _| 1.0 / x), &bounds, FieldType::Full, 1.0);

        for line in &lines {
            assert!(line.points().iter().flatten().all(|c| c.is_finite()));
        }
    }

    #[test]
    fn tracing_is_deterministic() {
        let bounds = square(2.0);
        let f = pointwise(|x, y| (x * y).sin());

        let first = streamlines_for(&f, &bounds, FieldType::Normalized, 1.0);
        let second = streamlines_for(&f, &bounds, FieldType::Normalized, 1.0);

        assert_eq!(first, second);
    }

    #[test]
    fn too_small_grid_has_no_streamlines() {
        let grid = Grid::from_values(&[0.0, 1.0], &[0.0]);
        let field = VectorField::compute(&pointwise(|_, _| 1.0), &grid, FieldType::Full).unwrap();

        assert!(trace(&grid, &field, Density::default()).is_empty());
    }

    #[test]
    fn midpoint_segment_sits_halfway_along_curve() {
        let line = Streamline {
            points: vec![[0.0, 0.0], [1.0, 0.0], [2.0, 0.0], [3.0, 0.0], [4.0, 0.0]],
        };

        let (tail, head) = line.midpoint_segment().unwrap();

        assert_relative_eq!(line.arc_length(), 4.0);
        assert_eq!(tail, [1.0, 0.0]);
        assert_eq!(head, [1.5, 0.0]);
    }

    #[test]
    fn midpoint_segment_needs_two_points() {
        let line = Streamline {
            points: vec![[1.0, 1.0]],
        };

        assert!(line.midpoint_segment().is_none());
        assert_relative_eq!(line.arc_length(), 0.0);
    }
}
