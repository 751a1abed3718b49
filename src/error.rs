//! Error types for trueno-termplot operations.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Which axis an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisName {
    /// Horizontal axis.
    X,
    /// Vertical axis.
    Y,
}

impl std::fmt::Display for AxisName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::X => f.write_str("x"),
            Self::Y => f.write_str("y"),
        }
    }
}

/// Errors that can occur in trueno-termplot operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error (terminal, sink or config file).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// x and y input disagree in series count or series length.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Log scale requested but the axis has no strictly positive finite value.
    #[error("log scale requested for the {axis} axis, but it has no positive finite values")]
    NoPositiveDataForLogScale {
        /// Offending axis.
        axis: AxisName,
    },

    /// Invalid dimensions for the plot grid.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width value.
        width: usize,
        /// Height value.
        height: usize,
    },

    /// User supplied bounds with min greater than max.
    #[error("invalid {axis} bounds: min {min} is greater than max {max}")]
    InvalidBounds {
        /// Offending axis.
        axis: AxisName,
        /// Requested minimum.
        min: f64,
        /// Requested maximum.
        max: f64,
    },

    /// Empty data provided where non-empty is required.
    #[error("Empty data provided")]
    EmptyData,

    /// Scale domain error (e.g., log of a non-positive bound).
    #[error("Scale domain error: {0}")]
    ScaleDomain(String),

    /// Invalid option value.
    #[error("invalid value for option '{key}': {message}")]
    InvalidOption {
        /// Option name.
        key: &'static str,
        /// Why the value is invalid.
        message: String,
    },

    /// Color name parsing error.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Configuration parsing error.
    #[error("configuration error: {0}")]
    Config(#[from] serde_yaml_ng::Error),
}
