use thiserror::Error;

/// Errors raised at the input boundary of the profile and export code.
///
/// The numeric routines themselves never fail: bad or empty input degrades
/// to an empty profile or an unchanged range.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("position buffer holds {len} values, {count} points need {needed}")]
    PositionBufferTooShort {
        len: usize,
        count: usize,
        needed: usize,
    },

    #[error("a profile cut needs at least 2 control points, got {0}")]
    TooFewControlPoints(usize),

    #[error("profile width must be finite and positive, got {0}")]
    InvalidWidth(f64),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
