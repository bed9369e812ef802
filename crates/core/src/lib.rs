//! Grids, slope functions, and direction fields for first-order ODEs.
//!
//! This crate holds the numerical side of drawing a direction field for
//! `dy/dx = f(x, y)`:
//!
//! - [`SlopeFunction`] is the right-hand side `f`, evaluated over whole grids
//! - [`Grid`] samples a rectangular region, either by step or densely
//! - [`VectorField`] turns slopes into drawable `(u, v)` directions, raw or
//!   normalized according to [`FieldType`]
//! - [`FieldConfig`] collects the validated inputs of a figure
//! - [`streamline::trace`] follows the field to produce [`Streamline`]s
//!
//! ```
//! use slopefield_core::{FieldType, Grid, VectorField, pointwise};
//!
//! let grid = Grid::from_values(&[0.0], &[1.0, -1.0]);
//! let field = VectorField::compute(&pointwise(|_x, y| y), &grid, FieldType::Full)?;
//!
//! assert_eq!(field.v()[[0, 0]], 1.0);
//! assert_eq!(field.v()[[1, 0]], -1.0);
//! # Ok::<(), slopefield_core::ShapeError>(())
//! ```

mod config;
mod error;
mod field;
mod grid;
mod slope;
pub mod streamline;

pub use config::{Bounds, ConfigError, Density, FieldConfig, Steps};
pub use error::{Error, ShapeError};
pub use field::{FieldType, ParseFieldTypeError, VectorField};
pub use grid::{DENSE_POINTS, Grid, step_count};
pub use slope::{Pointwise, SlopeFunction, pointwise};
pub use streamline::Streamline;
