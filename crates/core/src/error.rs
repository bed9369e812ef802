use thiserror::Error;

use crate::{config::ConfigError, field::ParseFieldTypeError};

/// Errors that can occur while configuring or computing a direction field.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    FieldType(#[from] ParseFieldTypeError),

    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Shape(#[from] ShapeError),
}

/// A slope function returned a grid whose shape differs from its input.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("slope function returned shape {actual:?}, expected {expected:?}")]
pub struct ShapeError {
    pub expected: (usize, usize),
    pub actual: (usize, usize),
}
