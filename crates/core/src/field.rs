use std::{fmt, str::FromStr};

use ndarray::{Array2, Zip};
use thiserror::Error;

use crate::{Grid, SlopeFunction, error::ShapeError};

/// Which vector to draw at each grid point.
///
/// For a slope `s = f(x, y)`, the direction of a solution curve through the
/// point is `(1, s)`. The two field types differ only in how that direction is
/// scaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldType {
    /// The raw direction `(1, s)`, whose length grows with the slope.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "F"))]
    Full,

    /// The unit direction `(1, s) / sqrt(1 + s²)`.
    #[cfg_attr(feature = "serde", serde(rename = "N"))]
    Normalized,
}

impl FieldType {
    /// Returns the one-letter code used to name this field type.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Full => "F",
            Self::Normalized => "N",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// An unrecognized field type code.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("field type must be 'F' or 'N', got {0:?}")]
pub struct ParseFieldTypeError(pub String);

impl FromStr for FieldType {
    type Err = ParseFieldTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "F" => Ok(Self::Full),
            "N" => Ok(Self::Normalized),
            other => Err(ParseFieldTypeError(other.to_owned())),
        }
    }
}

/// Direction vectors `(u, v)` sampled at every point of a [`Grid`].
#[derive(Debug, Clone, PartialEq)]
pub struct VectorField {
    u: Array2<f64>,
    v: Array2<f64>,
    field_type: FieldType,
}

impl VectorField {
    /// Evaluates `slope` over `grid` and builds the requested field.
    ///
    /// The slope function is called exactly once.
    ///
    /// # Errors
    ///
    /// Returns a [`ShapeError`] if the slope function's output does not have
    /// the grid's shape.
    pub fn compute<F>(slope: &F, grid: &Grid, field_type: FieldType) -> Result<Self, ShapeError>
    where
        F: SlopeFunction + ?Sized,
    {
        let s = slope.slope(grid.x(), grid.y());
        if s.dim() != grid.shape() {
            return Err(ShapeError {
                expected: grid.shape(),
                actual: s.dim(),
            });
        }

        Ok(Self::from_slopes(s, field_type))
    }

    /// Builds a field from precomputed slopes.
    #[must_use]
    pub fn from_slopes(slopes: Array2<f64>, field_type: FieldType) -> Self {
        match field_type {
            FieldType::Full => Self {
                u: Array2::ones(slopes.raw_dim()),
                v: slopes,
                field_type,
            },
            FieldType::Normalized => {
                let magnitude = slopes.mapv(|s| 1.0_f64.hypot(s));
                Self {
                    u: magnitude.mapv(f64::recip),
                    v: &slopes / &magnitude,
                    field_type,
                }
            }
        }
    }

    /// Returns the horizontal components.
    #[must_use]
    pub fn u(&self) -> &Array2<f64> {
        &self.u
    }

    /// Returns the vertical components.
    #[must_use]
    pub fn v(&self) -> &Array2<f64> {
        &self.v
    }

    #[must_use]
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Returns the field shape as `(rows, columns)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        self.u.dim()
    }

    /// Returns the length of every vector.
    #[must_use]
    pub fn magnitude(&self) -> Array2<f64> {
        Zip::from(&self.u)
            .and(&self.v)
            .map_collect(|&u, &v| u.hypot(v))
    }

    /// Returns the number of vectors with finite components.
    #[must_use]
    pub fn finite_count(&self) -> usize {
        self.u
            .iter()
            .zip(&self.v)
            .filter(|(u, v)| u.is_finite() && v.is_finite())
            .count()
    }
}
