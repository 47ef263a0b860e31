use thiserror::Error;

/// Data-contract violations found while decoding raw statistics records.
///
/// Per-element variants carry the zero-based position of the offending element
/// in the array returned by the statistics API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("expected a JSON array of records")]
    NotAnArray,

    #[error("record {index}: expected a JSON object")]
    NotAnObject { index: usize },

    #[error("record {index}: missing `_count`")]
    MissingCount { index: usize },

    #[error("record {index}: `_count` must be a non-negative integer, got {value}")]
    InvalidCount { index: usize, value: String },

    #[error("record {index}: `roomCount` must be a non-negative integer or null, got {value}")]
    InvalidRoomCount { index: usize, value: String },

    #[error("record {index}: missing field `{field}`")]
    MissingField { index: usize, field: String },

    #[error("record {index}: missing or empty category field `{field}`")]
    MissingCategory { index: usize, field: String },

    #[error("record {index}: field `{field}` out of range, got {value}")]
    OutOfRange {
        index: usize,
        field: String,
        value: String,
    },
}

/// Invalid pipeline parameters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error(
        "room cutoff must be between 1 and {max}, got {0}",
        max = crate::aggregations::MAX_ROOM_CUTOFF
    )]
    InvalidCutoff(u32),

    #[error("listing counts overflow a 64-bit total")]
    CountOverflow,

    #[error("hour {0} is outside 0..24")]
    HourOutOfRange(u32),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Unknown value '{value}' for {what}")]
    UnknownValue { what: &'static str, value: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
