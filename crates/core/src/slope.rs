use ndarray::{Array2, Zip};

/// The right-hand side `f(x, y)` of a first-order ODE `dy/dx = f(x, y)`.
///
/// A slope function receives two grids of equal shape holding the x and y
/// coordinates of every sample point and returns a grid of the same shape
/// holding the slope at each point.
///
/// Implementations are expected to be pure: the same grids must always
/// produce the same slopes. Non-finite slopes (for example from a division by
/// zero) are allowed and are carried through into the resulting field.
///
/// Any closure taking two `&Array2<f64>` and returning an `Array2<f64>`
/// implements this trait, which suits slopes written with whole-array
/// arithmetic:
///
/// ```
/// use ndarray::Array2;
/// use slopefield_core::{Grid, SlopeFunction};
///
/// let growth = |_x: &Array2<f64>, y: &Array2<f64>| y * 0.5;
///
/// let grid = Grid::from_values(&[0.0, 1.0], &[2.0, 4.0]);
/// let s = growth.slope(grid.x(), grid.y());
/// assert_eq!(s[[1, 0]], 2.0);
/// ```
///
/// For slopes more naturally written per point, see [`pointwise`].
pub trait SlopeFunction {
    /// Evaluates the slope at every point of the `x`/`y` grids.
    fn slope(&self, x: &Array2<f64>, y: &Array2<f64>) -> Array2<f64>;
}

impl<F> SlopeFunction for F
where
    F: Fn(&Array2<f64>, &Array2<f64>) -> Array2<f64>,
{
    fn slope(&self, x: &Array2<f64>, y: &Array2<f64>) -> Array2<f64> {
        self(x, y)
    }
}

/// A [`SlopeFunction`] built from a scalar function applied at every point.
///
/// Construct with [`pointwise`].
#[derive(Debug, Clone, Copy)]
pub struct Pointwise<F>(F);

/// Lifts a scalar `f(x, y)` into a [`SlopeFunction`].
///
/// ```
/// use slopefield_core::{Grid, SlopeFunction, pointwise};
///
/// let f = pointwise(|x, y| -x / y);
///
/// let grid = Grid::from_values(&[1.0], &[1.0]);
/// assert_eq!(f.slope(grid.x(), grid.y())[[0, 0]], -1.0);
/// ```
pub fn pointwise<F>(f: F) -> Pointwise<F>
where
    F: Fn(f64, f64) -> f64,
{
    Pointwise(f)
}

impl<F> SlopeFunction for Pointwise<F>
where
    F: Fn(f64, f64) -> f64,
{
    fn slope(&self, x: &Array2<f64>, y: &Array2<f64>) -> Array2<f64> {
        Zip::from(x).and(y).map_collect(|&x, &y| (self.0)(x, y))
    }
}
