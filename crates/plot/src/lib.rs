//! Direction-field and streamline figures for first-order ODEs.
//!
//! [`render`] samples `dy/dx = f(x, y)` over a [`FieldConfig`] and returns a
//! [`Figure`] holding an arrow for every grid point and, optionally,
//! streamlines tracing the solution curves. Figures can be inspected layer
//! by layer or exported with [`Figure::to_svg`] and [`Figure::save_svg`].

mod arrow;
mod error;
mod figure;
mod render;

pub use error::Error;
pub use figure::{
    FIGURE_SIZE, Figure, GRID_ALPHA, Quiver, REFERENCE_LINE_WIDTH, ReferenceLine, SHAFT_WIDTH,
    STREAMLINE_WIDTH, StreamPlot,
};
pub use render::render;
pub use slopefield_core::{FieldConfig, FieldType, SlopeFunction, pointwise};
