//! Section/keyword state machine shared by the source layouts.
//!
//! A [`Layout`] is a static table: which lines open which section, which
//! field prefixes are recognized in which section and what to do with lines
//! that match no prefix. [`LayoutParser`] runs a layout over the lines of one
//! fax. All mutable state lives in a [`ParseState`] local to one call.

use std::collections::{BTreeMap, BTreeSet};
use std::mem;
use std::time::Instant;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{FieldError, FieldResult};
use crate::geo::{gauss_krueger_to_wgs84, LatLng};
use crate::models::{Operation, OperationResource};

use super::rules::keywords::fold;
use super::rules::{remove_trailing_newline, split_prefix, starts_with_keyword, ColonPolicy};
use super::{trim_lines, ExtractionResult, FaxParser, LineWarning};

/// Assigns the content of one line to the operation.
pub type Setter = fn(&mut ParseState, &Line<'_>) -> FieldResult;

/// Runs on every raw line before section detection.
pub type LineHook = fn(&mut ParseState, &str) -> FieldResult;

/// Runs once after the last line.
pub type FinishHook = fn(&mut ParseState);

/// Named blocks of a fax layout. Each layout uses a subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Section {
    Header,
    Mitteiler,
    Einsatzort,
    Zielort,
    Einsatzgrund,
    Einsatzmittel,
    Bemerkung,
    Hinweis,
    Koordinaten,
    Patient,
    Objektinfo,
    Meldebild,
    Alarmierung,
    Daten,
    Footer,
}

/// How a section marker is compared against a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerMatch {
    /// Case-sensitive substring.
    Contains,
    /// Case-insensitive substring.
    ContainsIgnoreCase,
    /// The trimmed line equals the marker.
    Exact,
    /// Case-insensitive prefix of the line.
    StartsWithIgnoreCase,
}

/// A line that switches the current section.
#[derive(Debug, Clone, Copy)]
pub struct SectionMarker {
    pub markers: &'static [&'static str],
    pub section: Section,
    /// Whether the entered section only accepts lines starting with a keyword.
    pub keywords_only: bool,
    pub matching: MarkerMatch,
    /// Whether the marker line is done once the section switched. If not,
    /// it is processed again as the first line of the new section.
    pub consume: bool,
}

impl SectionMarker {
    pub const fn new(markers: &'static [&'static str], section: Section) -> Self {
        Self {
            markers,
            section,
            keywords_only: true,
            matching: MarkerMatch::Contains,
            consume: true,
        }
    }

    /// Every line in the entered section is content.
    pub const fn free(self) -> Self {
        Self {
            keywords_only: false,
            ..self
        }
    }

    pub const fn matching(self, matching: MarkerMatch) -> Self {
        Self { matching, ..self }
    }

    pub const fn keep_line(self) -> Self {
        Self {
            consume: false,
            ..self
        }
    }

    pub fn matches(&self, line: &str) -> bool {
        self.markers.iter().any(|marker| match self.matching {
            MarkerMatch::Contains => line.contains(marker),
            MarkerMatch::ContainsIgnoreCase => fold(line).contains(&fold(marker)),
            MarkerMatch::Exact => line.trim() == *marker,
            MarkerMatch::StartsWithIgnoreCase => fold(line.trim_start()).starts_with(&fold(marker)),
        })
    }
}

/// Maps a field prefix, optionally restricted to one section, to a setter.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    /// `None` matches in every section.
    pub section: Option<Section>,
    pub prefix: &'static str,
    pub apply: Setter,
    /// Setter that continuation lines without a prefix go to afterwards.
    pub inner: Option<Setter>,
}

impl FieldRule {
    pub const fn new(section: Section, prefix: &'static str, apply: Setter) -> Self {
        Self {
            section: Some(section),
            prefix,
            apply,
            inner: None,
        }
    }

    pub const fn anywhere(prefix: &'static str, apply: Setter) -> Self {
        Self {
            section: None,
            prefix,
            apply,
            inner: None,
        }
    }

    pub const fn continued_by(self, inner: Setter) -> Self {
        Self {
            inner: Some(inner),
            ..self
        }
    }

    fn applies_to(&self, section: Section, prefix: &str) -> bool {
        self.section.is_none_or(|s| s == section) && fold(self.prefix) == prefix
    }
}

/// What happens to a line in a section when no field rule matches.
#[derive(Debug, Clone, Copy)]
pub enum Fallback {
    /// Continue the field the last rule pointed at, if any.
    Inner,
    /// Hand the line to a setter.
    Apply(Setter),
}

/// Declarative description of one dispatch center's fax layout.
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    /// Alias the layout is registered under.
    pub name: &'static str,
    /// Field keywords, most specific first.
    pub keywords: &'static [&'static str],
    pub markers: &'static [SectionMarker],
    pub fields: &'static [FieldRule],
    pub fallbacks: &'static [(Section, Fallback)],
    pub start: Section,
    pub start_keywords_only: bool,
    pub colon: ColonPolicy,
    pub before_line: Option<LineHook>,
    pub finish: Option<FinishHook>,
    /// Continuation active from the first line on. When set, section
    /// markers keep the current continuation instead of clearing it.
    pub continuation: Option<Setter>,
}

impl Layout {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            keywords: &[],
            markers: &[],
            fields: &[],
            fallbacks: &[],
            start: Section::Header,
            start_keywords_only: true,
            colon: ColonPolicy::FirstColon,
            before_line: None,
            finish: None,
            continuation: None,
        }
    }

    pub const fn keywords(self, keywords: &'static [&'static str]) -> Self {
        Self { keywords, ..self }
    }

    pub const fn markers(self, markers: &'static [SectionMarker]) -> Self {
        Self { markers, ..self }
    }

    pub const fn fields(self, fields: &'static [FieldRule]) -> Self {
        Self { fields, ..self }
    }

    pub const fn fallbacks(self, fallbacks: &'static [(Section, Fallback)]) -> Self {
        Self { fallbacks, ..self }
    }

    pub const fn start(self, start: Section, keywords_only: bool) -> Self {
        Self {
            start,
            start_keywords_only: keywords_only,
            ..self
        }
    }

    pub const fn colon(self, colon: ColonPolicy) -> Self {
        Self { colon, ..self }
    }

    pub const fn before_line(self, hook: LineHook) -> Self {
        Self {
            before_line: Some(hook),
            ..self
        }
    }

    pub const fn finish(self, hook: FinishHook) -> Self {
        Self {
            finish: Some(hook),
            ..self
        }
    }

    pub const fn carry_continuation(self, initial: Setter) -> Self {
        Self {
            continuation: Some(initial),
            ..self
        }
    }

    fn fallback(&self, section: Section) -> Option<Fallback> {
        self.fallbacks
            .iter()
            .find(|(s, _)| *s == section)
            .map(|(_, fallback)| *fallback)
    }

    fn process_line(&self, state: &mut ParseState, index: usize, raw: &str) -> FieldResult {
        if let Some(hook) = self.before_line {
            hook(state, raw)?;
        }

        if let Some(marker) = self.markers.iter().find(|marker| marker.matches(raw)) {
            if self.continuation.is_some() {
                state.switch(marker.section, marker.keywords_only);
            } else {
                state.enter(marker.section, marker.keywords_only);
            }
            if marker.consume {
                return Ok(());
            }
        }

        let line = if state.keywords_only {
            let Some(keyword) = starts_with_keyword(raw, self.keywords) else {
                return Ok(());
            };
            let split = split_prefix(raw, keyword, self.colon);
            Line {
                index,
                raw,
                prefix: split.prefix,
                keyword: Some(keyword),
                message: split.message,
            }
        } else {
            Line {
                index,
                raw,
                prefix: String::new(),
                keyword: None,
                message: raw,
            }
        };

        self.dispatch(state, &line)
    }

    fn dispatch(&self, state: &mut ParseState, line: &Line<'_>) -> FieldResult {
        let rule = self
            .fields
            .iter()
            .find(|rule| rule.applies_to(state.section, &line.prefix));

        if let Some(rule) = rule {
            if rule.inner.is_some() {
                state.inner = rule.inner;
            }
            return (rule.apply)(state, line);
        }

        match self.fallback(state.section) {
            Some(Fallback::Inner) => match state.inner {
                Some(inner) => inner(state, line),
                None => Ok(()),
            },
            Some(Fallback::Apply(setter)) => setter(state, line),
            None => Ok(()),
        }
    }

    /// Run the layout over already trimmed lines.
    pub fn run(&self, lines: &[&str], received: NaiveDateTime) -> ExtractionResult {
        let start = Instant::now();
        let mut state = ParseState::new(received, self.start, self.start_keywords_only);
        state.inner = self.continuation;
        let mut warnings = Vec::new();

        debug!("Parsing {} lines with {}", lines.len(), self.name);

        for (index, raw) in lines.iter().enumerate() {
            if let Err(error) = self.process_line(&mut state, index, raw) {
                record_failure(self.name, index, &error, &mut warnings);
            }
        }

        let operation = &mut state.operation;
        operation.comment = remove_trailing_newline(&operation.comment);
        operation.picture = remove_trailing_newline(&operation.picture);
        operation.messenger = remove_trailing_newline(&operation.messenger);
        if let Some(finish) = self.finish {
            finish(&mut state);
        }

        info!(
            "{} extracted operation '{}' with {} resources ({} warnings)",
            self.name,
            state.operation.operation_number,
            state.operation.resources.len(),
            warnings.len()
        );

        ExtractionResult {
            operation: state.operation,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

/// Log a failed line and keep it for the caller.
pub(crate) fn record_failure(
    parser: &str,
    index: usize,
    error: &FieldError,
    warnings: &mut Vec<LineWarning>,
) {
    warn!(parser, line = index, %error, "Error while parsing line");
    warnings.push(LineWarning {
        line: index,
        message: error.to_string(),
    });
}

/// One line as seen by a setter.
#[derive(Debug, Clone)]
pub struct Line<'a> {
    /// Position in the trimmed line array.
    pub index: usize,
    /// The line as read.
    pub raw: &'a str,
    /// Upper-cased field label, empty in free sections.
    pub prefix: String,
    /// Keyword the line matched, if it was checked against the keyword list.
    pub keyword: Option<&'static str>,
    /// Trimmed value text.
    pub message: &'a str,
}

/// Kilometer-grid coordinates collected from separate lines.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GeoAccumulator {
    pub east: Option<f64>,
    pub north: Option<f64>,
}

impl GeoAccumulator {
    /// Convert once both values are present; the accumulator is reset then.
    pub fn resolve(&mut self) -> FieldResult<Option<LatLng>> {
        match (self.east, self.north) {
            (Some(east), Some(north)) => {
                *self = Self::default();
                Ok(Some(gauss_krueger_to_wgs84(east, north)?))
            }
            _ => Ok(None),
        }
    }
}

/// Mutable state of one parse.
#[derive(Debug, Clone)]
pub struct ParseState {
    pub operation: Operation,
    pub section: Section,
    pub keywords_only: bool,
    /// Field that continuation lines are appended to.
    pub inner: Option<Setter>,
    /// Resource being assembled from consecutive lines.
    pub resource: OperationResource,
    pub geo: GeoAccumulator,
    /// Ingestion time of the fax.
    pub received: NaiveDateTime,
    seen: BTreeSet<&'static str>,
    /// Values collected over several lines and applied by a finish hook.
    buffers: BTreeMap<&'static str, String>,
}

impl ParseState {
    pub fn new(received: NaiveDateTime, section: Section, keywords_only: bool) -> Self {
        Self {
            operation: Operation::new(received),
            section,
            keywords_only,
            inner: None,
            resource: OperationResource::default(),
            geo: GeoAccumulator::default(),
            received,
            seen: BTreeSet::new(),
            buffers: BTreeMap::new(),
        }
    }

    /// Switch to `section`. Continuations never cross a section boundary.
    pub fn enter(&mut self, section: Section, keywords_only: bool) {
        self.switch(section, keywords_only);
        self.inner = None;
    }

    /// Switch to `section` and keep the current continuation.
    pub fn switch(&mut self, section: Section, keywords_only: bool) {
        self.section = section;
        self.keywords_only = keywords_only;
    }

    /// Hand the assembled resource to the operation and start a new one.
    /// Unnamed resources are dropped.
    pub fn emit_resource(&mut self) -> bool {
        let resource = mem::take(&mut self.resource);
        self.operation.resources.push(resource)
    }

    /// True the first time it is called with `key` during this parse.
    pub fn first(&mut self, key: &'static str) -> bool {
        self.seen.insert(key)
    }

    pub fn buffer_mut(&mut self, key: &'static str) -> &mut String {
        self.buffers.entry(key).or_default()
    }

    /// Remove a collected value. `None` if nothing was collected under `key`.
    pub fn take_buffer(&mut self, key: &'static str) -> Option<String> {
        self.buffers.remove(key)
    }
}

/// A [`FaxParser`] backed by a static [`Layout`].
#[derive(Debug, Clone, Copy)]
pub struct LayoutParser {
    layout: &'static Layout,
}

impl LayoutParser {
    pub const fn new(layout: &'static Layout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &'static Layout {
        self.layout
    }
}

impl FaxParser for LayoutParser {
    fn alias(&self) -> &str {
        self.layout.name
    }

    fn parse_at(&self, lines: &[&str], received: NaiveDateTime) -> ExtractionResult {
        let lines = trim_lines(lines);
        self.layout.run(&lines, received)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fax::setters;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn received() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 3, 5)
            .unwrap()
            .and_hms_opt(14, 40, 0)
            .unwrap()
    }

    fn keyword_b(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
        state.operation.keywords.b = line.message.to_string();
        Ok(())
    }

    fn failing(_: &mut ParseState, line: &Line<'_>) -> FieldResult {
        Err(FieldError::MissingValue(line.raw.to_string()))
    }

    const KEYWORDS: &[&str] = &["STICHWORT B", "STICHWORT", "STRAßE", "ORT", "OBJEKT", "FEHLER", "NAME"];

    const MARKERS: &[SectionMarker] = &[
        SectionMarker::new(&["EINSATZORT"], Section::Einsatzort),
        SectionMarker::new(&["EINSATZGRUND"], Section::Einsatzgrund),
        SectionMarker::new(&["BEMERKUNG"], Section::Bemerkung).free(),
        SectionMarker::new(&["ENDE FAX"], Section::Footer).free(),
    ];

    const FIELDS: &[FieldRule] = &[
        FieldRule::new(Section::Einsatzort, "STRAßE", setters::einsatzort_street)
            .continued_by(setters::append_einsatzort_street),
        FieldRule::new(Section::Einsatzort, "ORT", setters::einsatzort_city)
            .continued_by(setters::append_einsatzort_city),
        FieldRule::new(Section::Einsatzort, "OBJEKT", setters::einsatzort_property),
        FieldRule::new(Section::Einsatzgrund, "STICHWORT B", keyword_b),
        FieldRule::new(Section::Einsatzgrund, "STICHWORT", setters::emergency_keyword),
        FieldRule::anywhere("FEHLER", failing),
    ];

    const FALLBACKS: &[(Section, Fallback)] = &[
        (Section::Einsatzort, Fallback::Inner),
        (Section::Bemerkung, Fallback::Apply(setters::comment_line)),
    ];

    static TEST_LAYOUT: Layout = Layout::new("TestLayout")
        .keywords(KEYWORDS)
        .markers(MARKERS)
        .fields(FIELDS)
        .fallbacks(FALLBACKS);

    fn parse(lines: &[&str]) -> ExtractionResult {
        LayoutParser::new(&TEST_LAYOUT).parse_at(lines, received())
    }

    const SCENARIO: [&str; 9] = [
        "EINSATZORT",
        "STRAßE: Kirchweg 5",
        "ORT: 12345 Beispielstadt",
        "OBJEKT: Feuerwache",
        "EINSATZGRUND",
        "STICHWORT: Brand 2",
        "BEMERKUNG",
        "Starke Rauchentwicklung",
        "ENDE FAX",
    ];

    #[test]
    fn test_end_to_end_scenario() {
        let result = parse(&SCENARIO);
        let op = &result.operation;

        assert_eq!(op.einsatzort.street, "Kirchweg");
        assert_eq!(op.einsatzort.street_number, "5");
        assert_eq!(op.einsatzort.zip_code, "12345");
        assert_eq!(op.einsatzort.city, "Beispielstadt");
        assert_eq!(op.einsatzort.property, "Feuerwache");
        assert_eq!(op.keywords.emergency_keyword, "Brand 2");
        assert_eq!(op.comment, "Starke Rauchentwicklung");
        assert_eq!(op.timestamp_income, received());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_blank_lines_do_not_change_result() {
        let mut padded = vec!["", "   "];
        for line in SCENARIO {
            padded.push(line);
            padded.push("");
        }
        padded.push("  \t ");

        assert_eq!(parse(&padded).operation, parse(&SCENARIO).operation);
    }

    #[test]
    fn test_specific_keyword_wins() {
        let result = parse(&["EINSATZGRUND", "STICHWORT B: Brand", "STICHWORT: RD 1"]);
        assert_eq!(result.operation.keywords.b, "Brand");
        assert_eq!(result.operation.keywords.emergency_keyword, "RD 1");
        assert_eq!(result.operation.keywords.keyword, "");
    }

    #[test]
    fn test_failing_line_is_isolated() {
        let result = parse(&[
            "EINSATZORT",
            "STRAßE: Kirchweg 5",
            "FEHLER: kaputt",
            "ORT: 12345 Beispielstadt",
        ]);

        assert_eq!(result.operation.einsatzort.street, "Kirchweg");
        assert_eq!(result.operation.einsatzort.city, "Beispielstadt");
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].line, 2);
    }

    #[test]
    fn test_continuation_lines() {
        // NAME has no rule in EINSATZORT, so it continues the current field.
        let result = parse(&["EINSATZORT", "ORT: 12345 Beispiel", "NAME: stadt", "OBJEKT: Rathaus"]);
        assert_eq!(result.operation.einsatzort.city, "Beispielstadt");
        assert_eq!(result.operation.einsatzort.property, "Rathaus");
    }

    #[test]
    fn test_section_switch_ends_continuation() {
        let result = parse(&["EINSATZORT", "ORT: 12345 Beispiel", "EINSATZORT", "NAME: stadt"]);
        assert_eq!(result.operation.einsatzort.city, "Beispiel");
    }

    static CARRYING_LAYOUT: Layout = Layout::new("CarryingLayout")
        .keywords(KEYWORDS)
        .markers(MARKERS)
        .fields(FIELDS)
        .fallbacks(FALLBACKS)
        .carry_continuation(setters::append_einsatzort_street);

    fn parse_carrying(lines: &[&str]) -> ExtractionResult {
        LayoutParser::new(&CARRYING_LAYOUT).parse_at(lines, received())
    }

    #[test]
    fn test_carried_continuation_survives_section_switch() {
        let result = parse_carrying(&["EINSATZORT", "ORT: 12345 Beispiel", "EINSATZORT", "NAME: stadt"]);
        assert_eq!(result.operation.einsatzort.city, "Beispielstadt");
    }

    #[test]
    fn test_carried_continuation_starts_with_initial_field() {
        let result = parse_carrying(&["EINSATZORT", "NAME: Kirchweg"]);
        assert_eq!(result.operation.einsatzort.street, "Kirchweg");
        assert_eq!(parse(&["EINSATZORT", "NAME: Kirchweg"]).operation.einsatzort.street, "");
    }

    #[test]
    fn test_lines_before_keywords_are_skipped() {
        let result = parse(&["Irgendein Kopf", "EINSATZORT", "Ohne Schlüsselwort"]);
        assert_eq!(result.operation.einsatzort, Default::default());
    }

    #[test]
    fn test_emit_resource() {
        let mut state = ParseState::new(received(), Section::Einsatzmittel, true);
        state.resource.full_name = "Florian 1".to_string();
        assert!(state.emit_resource());
        assert!(!state.emit_resource());
        assert_eq!(state.operation.resources.len(), 1);
        assert_eq!(state.resource, OperationResource::default());
    }

    #[test]
    fn test_geo_accumulator_resets() {
        let mut geo = GeoAccumulator {
            east: Some(4_468_000.0),
            north: None,
        };
        assert_eq!(geo.resolve().unwrap(), None);

        geo.north = Some(5_333_000.0);
        assert!(geo.resolve().unwrap().is_some());
        assert_eq!(geo, GeoAccumulator::default());
    }

    #[test]
    fn test_concurrent_parses_share_nothing() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let results = runtime.block_on(async {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    tokio::spawn(async move {
                        let street = format!("STRAßE: Weg {}", i + 1);
                        let lines = ["EINSATZORT", street.as_str()];
                        parse(&lines).operation.einsatzort.street_number
                    })
                })
                .collect();

            let mut numbers = Vec::new();
            for handle in handles {
                numbers.push(handle.await.unwrap());
            }
            numbers
        });

        let expected: Vec<String> = (1..=8).map(|i| i.to_string()).collect();
        assert_eq!(results, expected);
    }
}
