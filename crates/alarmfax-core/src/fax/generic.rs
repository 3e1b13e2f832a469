//! User-defined fax layouts loaded from JSON.
//!
//! A [`LayoutDefinition`] lists the sections of a fax. Each section names the
//! keywords ("areas") that can appear in its lines and where their values go.
//! Several keywords may share one line; a value runs from the end of its
//! keyword to the start of the next one.
//!
//! ```json
//! {
//!   "sections": [
//!     { "text": "MITTEILER", "areas": { "Name": "Messenger" } },
//!     {
//!       "text": "EINSATZORT",
//!       "areas": { "Abschnitt": "Einsatzort Abschnitt" },
//!       "location": { "target": "Einsatzort" }
//!     }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{AlarmfaxError, Result};
use crate::models::{Operation, PropertyLocation};

use super::rules::keywords::fold;
use super::rules::{join_line, read_fax_timestamp};
use super::setters::{apply_city, apply_street, CityCut};
use super::{trim_lines, ExtractionResult, FaxParser};

/// Alias the generic parser is registered under.
pub const GENERIC_ALIAS: &str = "GenericParser";

/// Sections of a user-defined layout, in no particular order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutDefinition {
    pub sections: Vec<SectionDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionDefinition {
    /// Marker line that opens the section.
    pub text: String,
    /// Whether a line containing `text` opens the section. Otherwise the
    /// line has to equal it.
    #[serde(default)]
    pub contained: bool,
    /// Keyword to target path. Paths that name no model field are
    /// custom data keys.
    #[serde(default)]
    pub areas: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationAspect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<KeywordAspect>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationTarget {
    #[default]
    Einsatzort,
    Zielort,
}

impl LocationTarget {
    fn path(self, field: &str) -> String {
        match self {
            Self::Einsatzort => format!("Einsatzort.{field}"),
            Self::Zielort => format!("Zielort.{field}"),
        }
    }

    fn location(self, operation: &mut Operation) -> &mut PropertyLocation {
        match self {
            Self::Einsatzort => &mut operation.einsatzort,
            Self::Zielort => &mut operation.zielort,
        }
    }
}

/// Address keywords of a section; street and city values are analyzed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationAspect {
    pub target: LocationTarget,
    pub street: String,
    pub street_number: String,
    pub city: String,
    pub intersection: String,
    pub property: String,
}

impl Default for LocationAspect {
    fn default() -> Self {
        Self {
            target: LocationTarget::Einsatzort,
            street: "Straße".to_string(),
            street_number: "Haus-Nr".to_string(),
            city: "Ort".to_string(),
            intersection: "Kreuzung".to_string(),
            property: "Objekt".to_string(),
        }
    }
}

/// Keyword fields of a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordAspect {
    pub keyword: String,
    pub b: String,
    pub r: String,
    pub s: String,
    pub t: String,
}

impl Default for KeywordAspect {
    fn default() -> Self {
        Self {
            keyword: "Schlagw".to_string(),
            b: "Stichwort B".to_string(),
            r: "Stichwort R".to_string(),
            s: "Stichwort S".to_string(),
            t: "Stichwort T".to_string(),
        }
    }
}

/// How a value is written to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Text,
    Street(LocationTarget),
    City(LocationTarget),
    Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Assignment {
    path: String,
    kind: Kind,
}

/// A keyword found in a line together with the text that belongs to it.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Token<'a> {
    keyword: &'a str,
    value: &'a str,
}

impl SectionDefinition {
    fn is_marker(&self, line: &str) -> bool {
        if self.contained {
            fold(line).contains(&fold(&self.text))
        } else {
            fold(line.trim()) == fold(self.text.trim())
        }
    }

    /// Every keyword recognized in this section.
    fn keywords(&self) -> Vec<&str> {
        let mut keywords: Vec<&str> = self.areas.keys().map(String::as_str).collect();
        if let Some(location) = &self.location {
            keywords.extend([
                location.street.as_str(),
                location.street_number.as_str(),
                location.city.as_str(),
                location.intersection.as_str(),
                location.property.as_str(),
            ]);
        }
        if let Some(aspect) = &self.keywords {
            keywords.extend([
                aspect.keyword.as_str(),
                aspect.b.as_str(),
                aspect.r.as_str(),
                aspect.s.as_str(),
                aspect.t.as_str(),
            ]);
        }
        keywords.retain(|keyword| !keyword.trim().is_empty());
        keywords
    }

    /// Where the value of `keyword` goes. Areas take precedence over aspects.
    fn resolve(&self, keyword: &str) -> Option<Assignment> {
        if let Some(path) = self.areas.get(keyword) {
            return Some(Assignment {
                kind: self.area_kind(path),
                path: path.clone(),
            });
        }

        if let Some(location) = &self.location {
            let target = location.target;
            let field = if keyword == location.street {
                Some(("Street", Kind::Street(target)))
            } else if keyword == location.street_number {
                Some(("StreetNumber", Kind::Text))
            } else if keyword == location.city {
                Some(("City", Kind::City(target)))
            } else if keyword == location.intersection {
                Some(("Intersection", Kind::Text))
            } else if keyword == location.property {
                Some(("Property", Kind::Text))
            } else {
                None
            };
            if let Some((field, kind)) = field {
                return Some(Assignment {
                    path: target.path(field),
                    kind,
                });
            }
        }

        let aspect = self.keywords.as_ref()?;
        let field = [
            (&aspect.keyword, "Keyword"),
            (&aspect.b, "B"),
            (&aspect.r, "R"),
            (&aspect.s, "S"),
            (&aspect.t, "T"),
        ]
        .into_iter()
        .find(|(name, _)| name.as_str() == keyword)
        .map(|(_, field)| field)?;
        Some(Assignment {
            path: format!("Keywords.{field}"),
            kind: Kind::Text,
        })
    }

    /// With a location aspect, street and city areas of its target are analyzed.
    fn area_kind(&self, path: &str) -> Kind {
        if fold(path) == "TIMESTAMP" {
            return Kind::Timestamp;
        }
        if let Some(location) = &self.location {
            let target = location.target;
            if fold(path) == fold(&target.path("Street")) {
                return Kind::Street(target);
            }
            if fold(path) == fold(&target.path("City")) {
                return Kind::City(target);
            }
        }
        Kind::Text
    }
}

/// Byte spans of every occurrence of `needle` in `haystack` that starts a
/// word, ignoring case. A match inside a word ("ort" in "Sportplatz") is
/// not a keyword.
fn keyword_spans(haystack: &str, needle: &str) -> Vec<(usize, usize)> {
    if needle.is_empty() {
        return Vec::new();
    }

    let mut previous: Option<char> = None;
    let mut spans = Vec::new();
    for (start, current) in haystack.char_indices() {
        let word_start = previous.is_none_or(|c| !c.is_alphanumeric());
        previous = Some(current);
        if !word_start {
            continue;
        }

        let mut rest = haystack[start..].char_indices();
        let mut end = Some(start);
        for n in needle.chars() {
            match rest.next() {
                Some((offset, c)) if c.to_lowercase().eq(n.to_lowercase()) => {
                    end = Some(start + offset + c.len_utf8());
                }
                _ => {
                    end = None;
                    break;
                }
            }
        }
        if let Some(end) = end {
            spans.push((start, end));
        }
    }
    spans
}

/// Split a line into keyword tokens. A keyword found inside a longer one
/// at the same place is ignored; text before the first keyword is dropped.
fn tokenize<'a>(line: &'a str, keywords: &[&'a str]) -> Vec<Token<'a>> {
    let mut found: Vec<(usize, usize, &str)> = keywords
        .iter()
        .flat_map(|keyword| {
            keyword_spans(line, keyword)
                .into_iter()
                .map(move |(start, end)| (start, end, *keyword))
        })
        .collect();
    found.sort_by(|a, b| a.0.cmp(&b.0).then((b.1 - b.0).cmp(&(a.1 - a.0))));

    let mut accepted: Vec<(usize, usize, &str)> = Vec::new();
    for candidate in found {
        if accepted.last().is_none_or(|last| candidate.0 >= last.1) {
            accepted.push(candidate);
        }
    }

    accepted
        .iter()
        .enumerate()
        .map(|(i, &(_, end, keyword))| {
            let until = accepted.get(i + 1).map_or(line.len(), |next| next.0);
            let value = line[end..until]
                .trim_start_matches(|c: char| c == ':' || c == '.' || c.is_whitespace())
                .trim_end();
            Token { keyword, value }
        })
        .collect()
}

/// Parser driven by a [`LayoutDefinition`].
#[derive(Debug, Clone, PartialEq)]
pub struct GenericParser {
    definition: LayoutDefinition,
}

impl GenericParser {
    pub fn new(definition: LayoutDefinition) -> Result<Self> {
        if definition.sections.is_empty() {
            return Err(AlarmfaxError::Layout("no sections defined".to_string()));
        }
        if let Some(section) = definition.sections.iter().find(|s| s.text.trim().is_empty()) {
            return Err(AlarmfaxError::Layout(format!(
                "section with areas {:?} has no marker text",
                section.areas.keys().collect::<Vec<_>>()
            )));
        }
        Ok(Self { definition })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::new(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
            .map_err(|e| AlarmfaxError::Layout(format!("{}: {}", path.display(), e)))
    }

    pub fn definition(&self) -> &LayoutDefinition {
        &self.definition
    }

    /// Group lines by section. Lines before the first marker are dropped; a
    /// marker of the current section is content.
    fn sections<'a>(&'a self, lines: &[&'a str]) -> Vec<(&'a SectionDefinition, Vec<&'a str>)> {
        let mut sections: Vec<(&SectionDefinition, Vec<&str>)> = Vec::new();
        for &line in lines {
            let current = sections.last().map(|(section, _)| *section);
            match self.definition.sections.iter().find(|s| s.is_marker(line)) {
                Some(section) if current.is_none_or(|c| c.text != section.text) => {
                    debug!(section = %section.text, "Entering section");
                    sections.push((section, Vec::new()));
                }
                _ => {
                    if let Some((_, body)) = sections.last_mut() {
                        body.push(line);
                    }
                }
            }
        }
        sections
    }
}

fn write_value(operation: &mut Operation, assignment: &Assignment, value: &str) {
    match assignment.kind {
        Kind::Timestamp => {
            operation.timestamp = read_fax_timestamp(value, operation.timestamp_income);
        }
        Kind::Street(target) => {
            apply_street(target.location(operation), value);
        }
        Kind::City(target) => {
            apply_city(target.location(operation), value, CityCut::Dash);
        }
        Kind::Text => match operation.text_field_mut(&assignment.path) {
            Some(field) => *field = value.to_string(),
            None => {
                if operation.custom_data(&assignment.path).is_some() {
                    warn!(
                        key = %assignment.path,
                        "Custom data entry already exists and is overwritten, check the layout definition"
                    );
                }
                operation.set_custom_data(&assignment.path, value);
            }
        },
    }
}

/// Continue a multi-line text value. Analyzed values are not continued.
fn append_value(operation: &mut Operation, assignment: &Assignment, line: &str) {
    if assignment.kind != Kind::Text {
        debug!(path = %assignment.path, "Ignoring continuation line");
        return;
    }
    match operation.text_field_mut(&assignment.path) {
        Some(field) => join_line(field, line),
        None => join_line(operation.custom_data_mut(&assignment.path), line),
    }
}

impl FaxParser for GenericParser {
    fn alias(&self) -> &str {
        GENERIC_ALIAS
    }

    fn parse_at(&self, lines: &[&str], received: NaiveDateTime) -> ExtractionResult {
        let start = Instant::now();
        let lines = trim_lines(lines);
        let mut operation = Operation::new(received);

        for (section, body) in self.sections(&lines) {
            let keywords = section.keywords();
            let mut last: Option<Assignment> = None;

            for line in body {
                let tokens = tokenize(line, &keywords);
                if tokens.is_empty() {
                    if let Some(assignment) = &last {
                        append_value(&mut operation, assignment, line);
                    }
                    continue;
                }

                for token in tokens {
                    if let Some(assignment) = section.resolve(token.keyword) {
                        write_value(&mut operation, &assignment, token.value);
                        last = Some(assignment);
                    }
                }
            }
        }

        info!(
            "{} extracted operation '{}' with {} resources",
            GENERIC_ALIAS,
            operation.operation_number,
            operation.resources.len()
        );

        ExtractionResult {
            operation,
            warnings: Vec::new(),
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}
