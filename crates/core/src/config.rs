//! Validated parameters for building a direction field.
//!
//! Every value type here checks its invariants at construction, so code
//! holding a [`FieldConfig`] can rely on ordered bounds, positive steps, and a
//! positive streamline density.

use thiserror::Error;

use crate::{Error, FieldType};

/// Errors that can occur when validating field parameters.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("x bounds must be finite with x_max > x_min")]
    XBounds,

    #[error("y bounds must be finite with y_max > y_min")]
    YBounds,

    #[error("x_step must be finite and positive")]
    XStep,

    #[error("y_step must be finite and positive")]
    YStep,

    #[error("density must be finite and positive")]
    Density,
}

/// The rectangular plotting region `[x_min, x_max] × [y_min, y_max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "raw::Bounds"))]
pub struct Bounds {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl Bounds {
    /// Creates validated bounds.
    ///
    /// # Errors
    ///
    /// Returns an error if any bound is non-finite or an axis is empty or inverted.
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Result<Self, ConfigError> {
        if !(x_min.is_finite() && x_max.is_finite() && x_max > x_min) {
            return Err(ConfigError::XBounds);
        }
        if !(y_min.is_finite() && y_max.is_finite() && y_max > y_min) {
            return Err(ConfigError::YBounds);
        }

        Ok(Self {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    #[must_use]
    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    #[must_use]
    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    #[must_use]
    pub fn y_min(&self) -> f64 {
        self.y_min
    }

    #[must_use]
    pub fn y_max(&self) -> f64 {
        self.y_max
    }

    /// Returns `x_max - x_min`.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Returns `y_max - y_min`.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Returns `true` if the point lies inside the bounds, edges included.
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        (self.x_min..=self.x_max).contains(&x) && (self.y_min..=self.y_max).contains(&y)
    }
}

/// Spacing between neighboring arrows of the coarse field.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "raw::Steps"))]
pub struct Steps {
    x: f64,
    y: f64,
}

impl Steps {
    /// Creates validated steps.
    ///
    /// # Errors
    ///
    /// Returns an error if either step is non-finite or not positive.
    pub fn new(x: f64, y: f64) -> Result<Self, ConfigError> {
        if !(x.is_finite() && x > 0.0) {
            return Err(ConfigError::XStep);
        }
        if !(y.is_finite() && y > 0.0) {
            return Err(ConfigError::YStep);
        }

        Ok(Self { x, y })
    }

    #[must_use]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> f64 {
        self.y
    }
}

/// Streamline density; higher values pack curves more closely.
///
/// A density of `1.0` divides the domain into a 30 × 30 occupancy mask.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "f64", into = "f64"))]
pub struct Density(f64);

impl Density {
    /// Creates a validated density.
    ///
    /// # Errors
    ///
    /// Returns an error if the density is non-finite or not positive.
    pub fn new(value: f64) -> Result<Self, ConfigError> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(ConfigError::Density)
        }
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Density {
    fn default() -> Self {
        Self(1.0)
    }
}

impl TryFrom<f64> for Density {
    type Error = ConfigError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Density> for f64 {
    fn from(density: Density) -> Self {
        density.0
    }
}

/// Everything needed to build one direction-field figure.
///
/// Construct with [`FieldConfig::new`] and chain the `with_*` methods as
/// needed. Defaults are a [`FieldType::Full`] field, no streamlines, and a
/// density of `1.0`.
///
/// # Example
///
/// ```
/// use slopefield_core::{Bounds, Density, FieldConfig, FieldType, Steps};
///
/// let config = FieldConfig::new(
///     Bounds::new(-2.0, 2.0, -2.0, 2.0)?,
///     Steps::new(0.25, 0.25)?,
/// )
/// .with_field_type(FieldType::Normalized)
/// .with_streamlines(Density::new(1.5)?);
///
/// assert!(config.streamlines());
/// # Ok::<(), slopefield_core::ConfigError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldConfig {
    bounds: Bounds,
    steps: Steps,
    #[cfg_attr(feature = "serde", serde(default))]
    field_type: FieldType,
    #[cfg_attr(feature = "serde", serde(default))]
    streamlines: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    density: Density,
}

impl FieldConfig {
    #[must_use]
    pub fn new(bounds: Bounds, steps: Steps) -> Self {
        Self {
            bounds,
            steps,
            field_type: FieldType::default(),
            streamlines: false,
            density: Density::default(),
        }
    }

    /// Builds a config from plain values, in the order a caller would list them.
    ///
    /// The field type code is checked first, so an unknown code is always
    /// reported as [`Error::FieldType`] whatever the other values are.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FieldType`] for a code other than `"F"` or `"N"`, and
    /// [`Error::Config`] for invalid bounds, steps, or density.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        x_min: f64,
        x_max: f64,
        y_min: f64,
        y_max: f64,
        x_step: f64,
        y_step: f64,
        field_type: &str,
        streamlines: bool,
        density: f64,
    ) -> Result<Self, Error> {
        let field_type: FieldType = field_type.parse()?;
        let bounds = Bounds::new(x_min, x_max, y_min, y_max)?;
        let steps = Steps::new(x_step, y_step)?;
        let density = Density::new(density)?;

        Ok(Self {
            bounds,
            steps,
            field_type,
            streamlines,
            density,
        })
    }

    /// Sets the kind of vector field to draw.
    #[must_use]
    pub fn with_field_type(mut self, field_type: FieldType) -> Self {
        self.field_type = field_type;
        self
    }

    /// Enables streamlines drawn at the given density.
    #[must_use]
    pub fn with_streamlines(mut self, density: Density) -> Self {
        self.streamlines = true;
        self.density = density;
        self
    }

    /// Disables streamlines, keeping the configured density.
    #[must_use]
    pub fn without_streamlines(mut self) -> Self {
        self.streamlines = false;
        self
    }

    #[must_use]
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    #[must_use]
    pub fn steps(&self) -> &Steps {
        &self.steps
    }

    #[must_use]
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Returns `true` if streamlines should be overlaid.
    #[must_use]
    pub fn streamlines(&self) -> bool {
        self.streamlines
    }

    #[must_use]
    pub fn density(&self) -> Density {
        self.density
    }
}

#[cfg(feature = "serde")]
mod raw {
    use serde::Deserialize;

    use super::ConfigError;

    #[derive(Deserialize)]
    pub(super) struct Bounds {
        x_min: f64,
        x_max: f64,
        y_min: f64,
        y_max: f64,
    }

    impl TryFrom<Bounds> for super::Bounds {
        type Error = ConfigError;

        fn try_from(raw: Bounds) -> Result<Self, Self::Error> {
            Self::new(raw.x_min, raw.x_max, raw.y_min, raw.y_max)
        }
    }

    #[derive(Deserialize)]
    pub(super) struct Steps {
        x: f64,
        y: f64,
    }

    impl TryFrom<Steps> for super::Steps {
        type Error = ConfigError;

        fn try_from(raw: Steps) -> Result<Self, Self::Error> {
            Self::new(raw.x, raw.y)
        }
    }
}
