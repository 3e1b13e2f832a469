//! Error types for the alarmfax-core library.

use thiserror::Error;

/// Main error type for the alarmfax library.
#[derive(Error, Debug)]
pub enum AlarmfaxError {
    /// No parser is registered under the requested alias.
    #[error("unknown parser alias: {0}")]
    UnknownParser(String),

    /// A generic layout definition is unusable.
    #[error("layout error: {0}")]
    Layout(String),

    /// Field extraction error that escaped a parse.
    #[error("field error: {0}")]
    Field(#[from] FieldError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while extracting a single field from a fax line.
///
/// These never abort a parse: the engine logs them together with the line
/// index and continues with the next line.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    /// A delimiter that the layout requires was not present in the text.
    #[error("anchor '{anchor}' not found in '{text}'")]
    AnchorNotFound { anchor: String, text: String },

    /// A value the layout expects on this line is missing.
    #[error("missing value for {0}")]
    MissingValue(String),

    /// Numeric text could not be parsed.
    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    /// Coordinate conversion failed.
    #[error("coordinate error: {0}")]
    Geo(#[from] GeoError),
}

/// Errors from the Gauss-Krüger conversion.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum GeoError {
    /// The converted position lies outside the area covered by the Gauss-Krüger grid.
    #[error("position {latitude:.5};{longitude:.5} is outside the Gauss-Krüger range")]
    OutOfRange { latitude: f64, longitude: f64 },
}

/// Result type for the alarmfax library.
pub type Result<T> = std::result::Result<T, AlarmfaxError>;

/// Result type for field setters.
pub type FieldResult<T = ()> = std::result::Result<T, FieldError>;
