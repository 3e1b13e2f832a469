//! ILS Straubing.
//!
//! Same printout family as Kaiserslautern. The own units ("DEG FF ...") are
//! listed with their alarm time.

use crate::error::FieldResult;
use crate::fax::engine::{
    Fallback, FieldRule, Layout, Line, MarkerMatch, ParseState, Section, SectionMarker,
};
use crate::fax::rules::patterns::DATE_TIME;
use crate::fax::rules::{append_spaced, join_line, ColonPolicy};
use crate::fax::setters::{self, ascii_text_fields, stamp_fax_received};
use crate::models::OperationResource;

const OWN_UNITS: &str = "DEG FF";

const KEYWORDS: &[&str] = &[
    "Einsatznummer",
    "Einsatzort",
    "Einsatzplan",
    "Straße",
    "Strabe",
    "Objekt",
    "Name",
    "Schlagw.",
    "Stichw. B",
    "Stichw. T",
    "Stichw. S",
    "Stichw. I",
    "Stichw. R",
    "Ort",
];

const MARKERS: &[SectionMarker] = &[
    SectionMarker::new(&["BEMERKUNG"], Section::Bemerkung)
        .free()
        .matching(MarkerMatch::Exact),
    SectionMarker::new(&["TEXTBAUSTEINE"], Section::Footer)
        .free()
        .matching(MarkerMatch::Exact),
];

const FIELDS: &[FieldRule] = &[
    FieldRule::anywhere("EINSATZNUMMER", setters::operation_number),
    FieldRule::anywhere("EINSATZORT", setters::einsatzort_location),
    FieldRule::anywhere("EINSATZPLAN", setters::operation_plan),
    FieldRule::anywhere("STRASSE", street),
    FieldRule::anywhere("STRABE", street),
    FieldRule::anywhere("OBJEKT", setters::einsatzort_property),
    FieldRule::anywhere("NAME", messenger),
    FieldRule::anywhere("SCHLAGW.", picture),
    FieldRule::anywhere("STICHW. B", emergency_keyword),
    FieldRule::anywhere("STICHW. T", emergency_keyword),
    FieldRule::anywhere("STICHW. S", emergency_keyword),
    FieldRule::anywhere("STICHW. I", emergency_keyword),
    FieldRule::anywhere("STICHW. R", emergency_keyword),
    FieldRule::anywhere("ORT", city),
];

const FALLBACKS: &[(Section, Fallback)] = &[(Section::Bemerkung, Fallback::Apply(remark))];

pub static LAYOUT: Layout = Layout::new("ILSStraubingParser")
    .keywords(KEYWORDS)
    .markers(MARKERS)
    .fields(FIELDS)
    .fallbacks(FALLBACKS)
    .colon(ColonPolicy::AfterKeyword)
    .before_line(scan_line)
    .finish(ascii_text_fields);

fn scan_line(state: &mut ParseState, raw: &str) -> FieldResult {
    stamp_fax_received(state);
    if raw.contains(OWN_UNITS) {
        own_unit(state, raw);
    }
    Ok(())
}

/// "DEG FF Straubing 1 : 05.03.2020 14:33:10 : 05.03.2020 14:36:02"
///
/// The first own unit also gives the alarm time of the fax.
fn own_unit(state: &mut ParseState, raw: &str) {
    let name = raw.split(':').next().unwrap_or(raw).trim();
    let alarmed = DATE_TIME.find(raw).map(|m| m.as_str()).unwrap_or_default();

    if !alarmed.is_empty() && state.first("Alarmtime") {
        state
            .operation
            .set_custom_data("Alarmtime", format!("Alarmzeit: {alarmed}"));
    }
    state
        .operation
        .resources
        .push(OperationResource::new(name).with_timestamp(alarmed));
}

fn street(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.einsatzort.street = line.message.to_string();
    Ok(())
}

/// The unit table header ("Name : Alarmiert : Ausgerückt") is not a name.
fn messenger(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    if !line.message.starts_with("Alarmiert") {
        append_spaced(&mut state.operation.messenger, line.message);
    }
    Ok(())
}

fn picture(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    append_spaced(&mut state.operation.picture, line.message);
    Ok(())
}

fn emergency_keyword(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    if !line.message.is_empty() {
        append_spaced(&mut state.operation.keywords.emergency_keyword, line.message);
    }
    Ok(())
}

fn city(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    if state.first("city") {
        state.operation.einsatzort.city = line.message.to_string();
    }
    Ok(())
}

fn remark(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    join_line(&mut state.operation.comment, line.raw);
    Ok(())
}
