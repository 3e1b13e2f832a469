//! Dispatch fax parsing.

pub mod engine;
pub mod generic;
pub mod registry;
pub mod rules;
pub mod setters;
pub mod sources;

pub use engine::{Layout, LayoutParser, ParseState, Section};
pub use generic::{GenericParser, LayoutDefinition};
pub use registry::ParserRegistry;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::Operation;

/// Result of parsing one fax.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Extracted operation.
    pub operation: Operation,
    /// Lines that could not be processed.
    pub warnings: Vec<LineWarning>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// A line that failed to parse. The rest of the fax was still processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineWarning {
    /// Index into the trimmed line array.
    pub line: usize,
    pub message: String,
}

/// Parser for the fax layout of one dispatch center.
pub trait FaxParser: Send + Sync {
    /// Alias the parser is selected by.
    fn alias(&self) -> &str;

    /// Parse the OCR lines of one fax received at `received`.
    fn parse_at(&self, lines: &[&str], received: NaiveDateTime) -> ExtractionResult;

    /// Parse the OCR lines of one fax received now.
    fn parse(&self, lines: &[&str]) -> ExtractionResult {
        self.parse_at(lines, Local::now().naive_local())
    }
}

/// Trim every line and drop the empty ones.
pub fn trim_lines<'a>(lines: &[&'a str]) -> Vec<&'a str> {
    lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect()
}
