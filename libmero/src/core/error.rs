//! Objects related to reporting errors from this library

/// Reasons why a draft sample could not be committed
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ValidationError {
    #[error("missing required attribute '{0}'")]
    MissingAttribute(&'static str),
    #[error("'{field}' must be between 0 and 9999, got {value}")]
    NumberOutOfRange { field: &'static str, value: u32 },
    #[error("invalid coordinates: x (longitude) = {x}, y (latitude) = {y}")]
    InvalidCoordinates { x: f64, y: f64 },
}

/// A list of error types that can occur within this library
#[derive(thiserror::Error, Debug, PartialEq)]
#[non_exhaustive]
pub enum Error {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("index {index} is out of bounds for a store of {len} samples")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("unable to parse '{0}'")]
    Parse(String),
}

/// A convenience type alias for a [Result] with [Error] as its error type
pub type Result<T, E = Error> = std::result::Result<T, E>;
