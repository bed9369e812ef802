use std::path::Path;

use plotters::{
    coord::{Shift, types::RangedCoordf64},
    prelude::*,
};
use slopefield_core::{Bounds, Density, FieldType, Grid, Streamline, VectorField};
use tracing::debug;

use crate::{
    Error,
    arrow::{self, PixelRect, Point},
    error::draw_error,
};

type Chart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Canvas size in pixels, 10 × 8 inches at 100 dpi.
pub const FIGURE_SIZE: (u32, u32) = (1000, 800);

/// Quiver shaft width as a fraction of the plot area width.
pub const SHAFT_WIDTH: f64 = 0.005;

/// Streamline width in points.
pub const STREAMLINE_WIDTH: f64 = 1.5;

/// Zero reference line width in points.
pub const REFERENCE_LINE_WIDTH: f64 = 0.5;

/// Opacity of the background grid lines.
pub const GRID_ALPHA: f64 = 0.3;

const PIXELS_PER_POINT: f64 = 100.0 / 72.0;

/// Streamline arrowhead length and width in pixels.
const STREAM_HEAD: (f64, f64) = (10.0, 7.0);

/// A rendered direction-field figure, ready for inspection or export.
///
/// Built by [`render`](crate::render). Nothing is drawn until
/// [`Figure::to_svg`] or [`Figure::save_svg`] is called.
#[derive(Debug, Clone)]
pub struct Figure {
    title: String,
    x_label: String,
    y_label: String,
    x_range: (f64, f64),
    y_range: (f64, f64),
    quiver: Quiver,
    streamlines: Option<StreamPlot>,
    reference_lines: Vec<ReferenceLine>,
}

/// Arrows drawn at every point of the coarse grid.
///
/// Arrows use data units: each runs from `(x, y)` to `(x + u, y + v)`.
#[derive(Debug, Clone)]
pub struct Quiver {
    grid: Grid,
    field: VectorField,
    color: RGBColor,
    shaft_width: f64,
}

/// Streamlines traced through a dense copy of the field.
#[derive(Debug, Clone)]
pub struct StreamPlot {
    lines: Vec<Streamline>,
    density: Density,
    color: RGBColor,
    width: f64,
}

/// A line through the origin marking one of the axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReferenceLine {
    /// The line `y = 0`.
    Horizontal,

    /// The line `x = 0`.
    Vertical,
}

impl Figure {
    pub(crate) fn new(field_type: FieldType, bounds: &Bounds, quiver: Quiver) -> Self {
        let mut reference_lines = Vec::new();
        if (bounds.y_min()..=bounds.y_max()).contains(&0.0) {
            reference_lines.push(ReferenceLine::Horizontal);
        }
        if (bounds.x_min()..=bounds.x_max()).contains(&0.0) {
            reference_lines.push(ReferenceLine::Vertical);
        }

        Self {
            title: format!("Direction field: dy/dx = f(x, y), type {field_type}"),
            x_label: "x".to_owned(),
            y_label: "y".to_owned(),
            x_range: (bounds.x_min(), bounds.x_max()),
            y_range: (bounds.y_min(), bounds.y_max()),
            quiver,
            streamlines: None,
            reference_lines,
        }
    }

    pub(crate) fn with_streamlines(mut self, streamlines: StreamPlot) -> Self {
        self.streamlines = Some(streamlines);
        self
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn x_label(&self) -> &str {
        &self.x_label
    }

    #[must_use]
    pub fn y_label(&self) -> &str {
        &self.y_label
    }

    /// Returns the x-axis limits.
    #[must_use]
    pub fn x_range(&self) -> (f64, f64) {
        self.x_range
    }

    /// Returns the y-axis limits.
    #[must_use]
    pub fn y_range(&self) -> (f64, f64) {
        self.y_range
    }

    /// Returns the canvas size in pixels.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        FIGURE_SIZE
    }

    #[must_use]
    pub fn quiver(&self) -> &Quiver {
        &self.quiver
    }

    /// Returns the streamline layer, if streamlines were requested.
    #[must_use]
    pub fn streamlines(&self) -> Option<&StreamPlot> {
        self.streamlines.as_ref()
    }

    /// Returns the zero reference lines that fall within the axis limits.
    #[must_use]
    pub fn reference_lines(&self) -> &[ReferenceLine] {
        &self.reference_lines
    }

    /// Draws the figure as an SVG document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Draw`] if plotters fails to draw any element.
    pub fn to_svg(&self) -> Result<String, Error> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, FIGURE_SIZE).into_drawing_area();
            self.draw(&root)?;
            root.present().map_err(draw_error)?;
        }
        Ok(svg)
    }

    /// Writes the figure to an SVG file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Draw`] if drawing fails, or [`Error::Io`] if the file
    /// cannot be written.
    pub fn save_svg(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        let svg = self.to_svg()?;
        std::fs::write(path, svg)?;
        debug!(path = %path.display(), "figure saved");
        Ok(())
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<(), Error> {
        root.fill(&WHITE).map_err(draw_error)?;

        let (x_min, x_max) = self.x_range;
        let (y_min, y_max) = self.y_range;

        let mut chart = self.chart(root)?;
        chart
            .configure_mesh()
            .bold_line_style(BLACK.mix(GRID_ALPHA))
            .light_line_style(TRANSPARENT)
            .x_desc(self.x_label.as_str())
            .y_desc(self.y_label.as_str())
            .draw()
            .map_err(draw_error)?;

        for line in &self.reference_lines {
            let ends = match line {
                ReferenceLine::Horizontal => [(x_min, 0.0), (x_max, 0.0)],
                ReferenceLine::Vertical => [(0.0, y_min), (0.0, y_max)],
            };
            chart
                .draw_series(LineSeries::new(
                    ends,
                    BLACK.stroke_width(stroke_pixels(REFERENCE_LINE_WIDTH)),
                ))
                .map_err(draw_error)?;
        }

        let frame = PixelFrame::new(&chart, self.x_range, self.y_range);
        self.quiver.draw(root, &frame)?;
        if let Some(streamlines) = &self.streamlines {
            streamlines.draw(root, &mut chart, &frame)?;
        }

        Ok(())
    }

    fn chart<'a, DB: DrawingBackend>(
        &self,
        root: &'a DrawingArea<DB, Shift>,
    ) -> Result<Chart<'a, DB>, Error> {
        let (x_min, x_max) = self.x_range;
        let (y_min, y_max) = self.y_range;

        ChartBuilder::on(root)
            .caption(&self.title, ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(draw_error)
    }
}

impl Quiver {
    pub(crate) fn new(grid: Grid, field: VectorField) -> Self {
        Self {
            grid,
            field,
            color: BLUE,
            shaft_width: SHAFT_WIDTH,
        }
    }

    /// Returns the grid the arrows are anchored on.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Returns the arrow vectors.
    #[must_use]
    pub fn field(&self) -> &VectorField {
        &self.field
    }

    #[must_use]
    pub fn color(&self) -> RGBColor {
        self.color
    }

    /// Returns the shaft width as a fraction of the plot area width.
    #[must_use]
    pub fn shaft_width(&self) -> f64 {
        self.shaft_width
    }

    /// Returns every arrow as `(tail, tip)` in data coordinates, row by row.
    ///
    /// Arrows with non-finite components are included.
    pub fn arrows(&self) -> impl Iterator<Item = ([f64; 2], [f64; 2])> + '_ {
        self.grid
            .x()
            .iter()
            .zip(self.grid.y())
            .zip(self.field.u().iter().zip(self.field.v()))
            .map(|((&x, &y), (&u, &v))| ([x, y], [x + u, y + v]))
    }

    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        frame: &PixelFrame,
    ) -> Result<(), Error> {
        let shaft = self.shaft_width * (frame.rect.right - frame.rect.left);

        let (mut skipped, mut outside) = (0_usize, 0_usize);
        for (tail, tip) in self.arrows() {
            let outline = if tail.iter().chain(&tip).all(|c| c.is_finite()) {
                arrow::quiver_outline(frame.map(tail), frame.map(tip), shaft)
            } else {
                None
            };
            let Some(outline) = outline else {
                skipped += 1;
                continue;
            };

            if !frame.fill(root, &outline, self.color)? {
                outside += 1;
            }
        }

        if skipped > 0 {
            debug!(skipped, "arrows without a drawable outline skipped");
        }
        if outside > 0 {
            debug!(outside, "arrows outside the plot area skipped");
        }
        Ok(())
    }
}

impl StreamPlot {
    pub(crate) fn new(lines: Vec<Streamline>, density: Density) -> Self {
        Self {
            lines,
            density,
            color: RED,
            width: STREAMLINE_WIDTH,
        }
    }

    #[must_use]
    pub fn lines(&self) -> &[Streamline] {
        &self.lines
    }

    /// Returns the density the streamlines were traced at.
    #[must_use]
    pub fn density(&self) -> Density {
        self.density
    }

    #[must_use]
    pub fn color(&self) -> RGBColor {
        self.color
    }

    /// Returns the line width in points.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        chart: &mut Chart<'_, DB>,
        frame: &PixelFrame,
    ) -> Result<(), Error> {
        let style = self.color.stroke_width(stroke_pixels(self.width));

        for line in &self.lines {
            chart
                .draw_series(LineSeries::new(
                    line.points().iter().map(|&[x, y]| (x, y)),
                    style,
                ))
                .map_err(draw_error)?;

            let (length, width) = STREAM_HEAD;
            if let Some((tail, head)) = line.midpoint_segment()
                && let Some(head) =
                    arrow::arrowhead(frame.map(tail), frame.map(head), length, width)
            {
                frame.fill(root, &head, self.color)?;
            }
        }

        Ok(())
    }
}

/// The chart's plotting area in backend pixels, with its data limits.
///
/// Points are mapped without rounding, so that arrow outlines keep their
/// shape until they are clipped and drawn.
struct PixelFrame {
    rect: PixelRect,
    x_range: (f64, f64),
    y_range: (f64, f64),
}

impl PixelFrame {
    fn new<DB: DrawingBackend>(
        chart: &Chart<'_, DB>,
        x_range: (f64, f64),
        y_range: (f64, f64),
    ) -> Self {
        let (xs, ys) = chart.plotting_area().get_pixel_range();
        Self {
            rect: PixelRect {
                left: f64::from(xs.start),
                right: f64::from(xs.end),
                top: f64::from(ys.start),
                bottom: f64::from(ys.end),
            },
            x_range,
            y_range,
        }
    }

    /// Maps a data point to pixel coordinates, `y` growing down the screen.
    fn map(&self, [x, y]: [f64; 2]) -> Point {
        let PixelRect {
            left,
            right,
            top,
            bottom,
        } = self.rect;
        let (x_min, x_max) = self.x_range;
        let (y_min, y_max) = self.y_range;

        (
            left + (x - x_min) / (x_max - x_min) * (right - left),
            bottom - (y - y_min) / (y_max - y_min) * (bottom - top),
        )
    }

    /// Fills the part of `polygon` inside the plotting area.
    ///
    /// Returns `false` if nothing of it is inside.
    fn fill<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        polygon: &[Point],
        color: RGBColor,
    ) -> Result<bool, Error> {
        let clipped = arrow::clip(polygon, &self.rect);
        if clipped.len() < 3 {
            return Ok(false);
        }

        let points: Vec<(i32, i32)> = clipped.into_iter().map(arrow::to_pixel).collect();
        root.draw(&Polygon::new(points, color.filled()))
            .map_err(draw_error)?;
        Ok(true)
    }
}

/// Converts a width in points to whole pixels, never thinner than one.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn stroke_pixels(points: f64) -> u32 {
    (points * PIXELS_PER_POINT).round().max(1.0) as u32
}
