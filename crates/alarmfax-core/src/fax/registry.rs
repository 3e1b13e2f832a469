//! Lookup of fax parsers by alias.

use tracing::debug;

use crate::error::{AlarmfaxError, Result};

use super::engine::LayoutParser;
use super::sources::LAYOUTS;
use super::FaxParser;

/// Older configurations refer to some parsers by a different name.
const LEGACY_ALIASES: &[(&str, &str)] = &[("FEZMuenchenLandParser", "FezMuenchenLandParser")];

/// All parsers known to the application, keyed by their case-sensitive alias.
pub struct ParserRegistry {
    parsers: Vec<Box<dyn FaxParser>>,
}

impl ParserRegistry {
    /// A registry holding every shipped source layout.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for layout in LAYOUTS {
            registry.register(Box::new(LayoutParser::new(layout)));
        }
        registry
    }

    pub fn empty() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    /// Add a parser. A parser registered under an existing alias replaces it.
    pub fn register(&mut self, parser: Box<dyn FaxParser>) {
        debug!(alias = parser.alias(), "Registering parser");
        match self.position(parser.alias()) {
            Some(index) => self.parsers[index] = parser,
            None => self.parsers.push(parser),
        }
    }

    pub fn get(&self, alias: &str) -> Result<&dyn FaxParser> {
        let alias = LEGACY_ALIASES
            .iter()
            .find(|(legacy, _)| *legacy == alias)
            .map_or(alias, |(_, current)| *current);

        self.position(alias)
            .map(|index| self.parsers[index].as_ref())
            .ok_or_else(|| AlarmfaxError::UnknownParser(alias.to_string()))
    }

    /// Registered aliases in registration order.
    pub fn aliases(&self) -> Vec<&str> {
        self.parsers.iter().map(|parser| parser.alias()).collect()
    }

    fn position(&self, alias: &str) -> Option<usize> {
        self.parsers.iter().position(|parser| parser.alias() == alias)
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fax::ExtractionResult;
    use crate::models::Operation;
    use chrono::NaiveDateTime;
    use pretty_assertions::assert_eq;

    struct Fixed(&'static str);

    impl FaxParser for Fixed {
        fn alias(&self) -> &str {
            self.0
        }

        fn parse_at(&self, _: &[&str], received: NaiveDateTime) -> ExtractionResult {
            let mut operation = Operation::new(received);
            operation.operation_number = self.0.to_string();
            ExtractionResult {
                operation,
                warnings: Vec::new(),
                processing_time_ms: 0,
            }
        }
    }

    #[test]
    fn test_every_layout_is_registered() {
        let registry = ParserRegistry::new();
        let aliases = registry.aliases();

        assert_eq!(aliases.len(), LAYOUTS.len());
        assert_eq!(aliases[0], "ILSAugsburgParser");
        assert!(aliases.contains(&"ILSFFBGermeringParser"));
        assert_eq!(registry.get("LSTKleveParser").unwrap().alias(), "LSTKleveParser");
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let registry = ParserRegistry::new();
        let err = registry.get("ilsaugsburgparser").err().unwrap();
        assert!(matches!(err, AlarmfaxError::UnknownParser(alias) if alias == "ilsaugsburgparser"));
    }

    #[test]
    fn test_legacy_alias() {
        let registry = ParserRegistry::new();
        let parser = registry.get("FEZMuenchenLandParser").unwrap();
        assert_eq!(parser.alias(), "FezMuenchenLandParser");
    }

    #[test]
    fn test_register_replaces_same_alias() {
        let mut registry = ParserRegistry::empty();
        registry.register(Box::new(Fixed("Custom")));
        registry.register(Box::new(Fixed("Other")));
        registry.register(Box::new(Fixed("Custom")));

        assert_eq!(registry.aliases(), vec!["Custom", "Other"]);
        let result = registry.get("Custom").unwrap().parse(&[]);
        assert_eq!(result.operation.operation_number, "Custom");
    }
}
