//! Configuration structures for fax parsing.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AlarmfaxError, Result};

/// Main configuration for the alarmfax pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlarmfaxConfig {
    /// Parser selection.
    pub parser: ParserConfig,

    /// Input decoding.
    pub input: InputConfig,

    /// Output rendering.
    pub output: OutputConfig,
}

/// Which parser handles incoming faxes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Alias of the dispatch-center parser.
    pub alias: String,

    /// Layout definition used when `alias` is `GenericParser`.
    pub layout_file: Option<PathBuf>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            alias: "ILSAugsburgParser".to_string(),
            layout_file: None,
        }
    }
}

/// How fax text files are read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Encoding label tried when a file is not valid UTF-8.
    pub fallback_encoding: String,

    /// Drop form feed characters left by the OCR page splitter.
    pub strip_form_feeds: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            fallback_encoding: "windows-1252".to_string(),
            strip_form_feeds: true,
        }
    }
}

/// How parsed operations are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format (`json`, `text` or `csv`).
    pub format: String,

    /// Pretty-print JSON output.
    pub pretty: bool,

    /// Include per-line warnings in JSON output.
    pub include_warnings: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
            pretty: true,
            include_warnings: false,
        }
    }
}

impl AlarmfaxConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| AlarmfaxError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
