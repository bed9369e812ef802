use std::io;

use slopefield_core::{ConfigError, ParseFieldTypeError, ShapeError};
use thiserror::Error;

/// Errors that can occur while building or exporting a figure.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Field(#[from] slopefield_core::Error),

    #[error("failed to draw figure: {0}")]
    Draw(String),

    #[error("failed to write figure: {0}")]
    Io(#[from] io::Error),
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Field(err.into())
    }
}

impl From<ParseFieldTypeError> for Error {
    fn from(err: ParseFieldTypeError) -> Self {
        Self::Field(err.into())
    }
}

impl From<ShapeError> for Error {
    fn from(err: ShapeError) -> Self {
        Self::Field(err.into())
    }
}

/// Maps any plotters drawing error into [`Error::Draw`].
pub(crate) fn draw_error(err: impl std::fmt::Display) -> Error {
    Error::Draw(err.to_string())
}
