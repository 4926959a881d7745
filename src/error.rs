use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AcoError {
    #[error("distance matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("at least 2 cities are required, got {0}")]
    TooFewCities(usize),

    #[error("distance {from} -> {to} must be positive and finite, got {value}")]
    InvalidDistance { from: usize, to: usize, value: f64 },

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// Every candidate weight leaving `city` vanished (or overflowed).
    #[error("all transition weights from city {city} are zero or non-finite")]
    DegenerateWeights { city: usize },

    #[error("no candidate cities left from city {city}")]
    NoCandidates { city: usize },

    #[error("all iterations already ran")]
    Finished,

    #[error(transparent)]
    Trace(#[from] io::Error),
}

impl AcoError {
    pub(crate) fn parameter(name: &'static str, reason: impl Into<String>) -> Self {
        AcoError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
