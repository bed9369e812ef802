//! Arrow outlines in pixel coordinates.
//!
//! Quiver arrows are filled polygons: a rectangular shaft ending in a
//! swept-back head. All proportions are multiples of the shaft width.

/// A point in pixel coordinates.
pub(crate) type Point = (f64, f64);

/// Full width of a quiver head, in shaft widths.
pub(crate) const HEAD_WIDTH: f64 = 3.0;

/// Distance from the head's back corners to the tip, in shaft widths.
pub(crate) const HEAD_LENGTH: f64 = 5.0;

/// Distance from where the shaft meets the head to the tip, in shaft widths.
pub(crate) const HEAD_AXIS_LENGTH: f64 = 4.5;

/// Returns the seven-point outline of a quiver arrow from `tail` to `tip`.
///
/// Arrows shorter than their head shrink uniformly, so that the head always
/// fits. Returns `None` for zero-length or non-finite arrows.
pub(crate) fn quiver_outline(tail: Point, tip: Point, shaft_width: f64) -> Option<[Point; 7]> {
    let frame = Frame::between(tail, tip)?;
    if !(shaft_width.is_finite() && shaft_width > 0.0) {
        return None;
    }

    let length = frame.length;
    let w = shaft_width * (length / (HEAD_LENGTH * shaft_width)).min(1.0);
    let (half_shaft, half_head) = (w / 2.0, HEAD_WIDTH * w / 2.0);
    let (head, head_axis) = (HEAD_LENGTH * w, HEAD_AXIS_LENGTH * w);

    Some(
        [
            (0.0, -half_shaft),
            (length - head_axis, -half_shaft),
            (length - head, -half_head),
            (length, 0.0),
            (length - head, half_head),
            (length - head_axis, half_shaft),
            (0.0, half_shaft),
        ]
        .map(|p| frame.place(p)),
    )
}

/// Returns a triangular head with its tip at `head`, pointing away from `tail`.
pub(crate) fn arrowhead(tail: Point, head: Point, length: f64, width: f64) -> Option<[Point; 3]> {
    let frame = Frame::between(tail, head)?;
    let base = frame.length - length;

    Some([(frame.length, 0.0), (base, -width / 2.0), (base, width / 2.0)].map(|p| frame.place(p)))
}

/// An axis-aligned pixel rectangle, `top` above `bottom` on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PixelRect {
    pub(crate) left: f64,
    pub(crate) right: f64,
    pub(crate) top: f64,
    pub(crate) bottom: f64,
}

impl PixelRect {
    pub(crate) fn contains(&self, (x, y): Point) -> bool {
        (self.left..=self.right).contains(&x) && (self.top..=self.bottom).contains(&y)
    }
}

/// Clips a polygon to `rect`, one edge of the rectangle at a time.
///
/// Returns the vertices of the part inside, which is empty when the polygon
/// lies wholly outside.
pub(crate) fn clip(polygon: &[Point], rect: &PixelRect) -> Vec<Point> {
    let edges: [(fn(Point) -> f64, f64, bool); 4] = [
        (|p| p.0, rect.left, true),
        (|p| p.0, rect.right, false),
        (|p| p.1, rect.top, true),
        (|p| p.1, rect.bottom, false),
    ];

    let mut points = polygon.to_vec();
    for (coord, limit, keep_above) in edges {
        let inside = |p: Point| {
            if keep_above {
                coord(p) >= limit
            } else {
                coord(p) <= limit
            }
        };

        let input = std::mem::take(&mut points);
        let Some(&last) = input.last() else {
            break;
        };
        let mut start = last;
        for &end in &input {
            match (inside(start), inside(end)) {
                (true, true) => points.push(end),
                (true, false) => points.push(crossing(start, end, coord, limit)),
                (false, true) => {
                    points.push(crossing(start, end, coord, limit));
                    points.push(end);
                }
                (false, false) => {}
            }
            start = end;
        }
    }

    // Crossings can land an ulp outside the edge they were cut at.
    points
        .into_iter()
        .map(|(x, y)| (x.clamp(rect.left, rect.right), y.clamp(rect.top, rect.bottom)))
        .collect()
}

/// Returns where the segment from `a` to `b` meets `coord(p) == limit`.
fn crossing(a: Point, b: Point, coord: fn(Point) -> f64, limit: f64) -> Point {
    let t = (limit - coord(a)) / (coord(b) - coord(a));
    (a.0 + t * (b.0 - a.0), a.1 + t * (b.1 - a.1))
}

/// Rounds a point to the nearest pixel.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn to_pixel((x, y): Point) -> (i32, i32) {
    (x.round() as i32, y.round() as i32)
}

/// A local frame with its origin at an arrow's tail and its first axis along the arrow.
struct Frame {
    origin: Point,
    cos: f64,
    sin: f64,
    length: f64,
}

impl Frame {
    fn between(from: Point, to: Point) -> Option<Self> {
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let length = dx.hypot(dy);
        (length.is_finite() && length > 0.0 && from.0.is_finite() && from.1.is_finite()).then(
            || Self {
                origin: from,
                cos: dx / length,
                sin: dy / length,
                length,
            },
        )
    }

    fn place(&self, (a, b): Point) -> Point {
        (
            self.origin.0 + a * self.cos - b * self.sin,
            self.origin.1 + a * self.sin + b * self.cos,
        )
    }
}
