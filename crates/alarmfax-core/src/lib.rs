//! Core library for dispatch fax (Alarmfax) parsing.
//!
//! This crate provides:
//! - The operation model an alarm fax is parsed into
//! - Text rules shared by all fax layouts (keywords, streets, timestamps)
//! - One layout per dispatch center, selected by alias
//! - A JSON-configurable generic layout
//! - Gauss-Krüger to WGS84 coordinate conversion

pub mod error;
pub mod fax;
pub mod geo;
pub mod models;

pub use error::{AlarmfaxError, FieldError, GeoError, Result};
pub use fax::{ExtractionResult, FaxParser, GenericParser, LayoutDefinition, LineWarning, ParserRegistry};
pub use geo::{gauss_krueger_to_wgs84, LatLng};
pub use models::{
    AlarmfaxConfig, FormatOptions, Operation, OperationKeywords, OperationResource,
    OperationResources, PropertyLocation, ResourceListStyle,
};
