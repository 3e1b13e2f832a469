//! ILS Kaiserslautern.
//!
//! Fields are recognized by their label at the start of a line; the remark
//! block runs from "BEMERKUNG" to "TEXTBAUSTEINE". Downstream receivers only
//! understand ASCII, so umlauts in the free-text fields are spelled out.

use crate::error::FieldResult;
use crate::fax::engine::{
    Fallback, FieldRule, Layout, Line, MarkerMatch, ParseState, Section, SectionMarker,
};
use crate::fax::rules::{append_spaced, join_line, ColonPolicy};
use crate::fax::setters::{self, ascii_text_fields, stamp_fax_received, text_after};

const OPERATION_NUMBER_LABEL: &str = "Einsatznummer";

const KEYWORDS: &[&str] = &[
    "PLZ / Ortsteil",
    "Einsatzort",
    "Einsatzplan",
    "Objekt",
    "Meldender",
    "Straße",
    "Diagnose",
    "Stichwort",
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
    FieldRule::anywhere("EINSATZORT", setters::einsatzort_location),
    FieldRule::anywhere("EINSATZPLAN", setters::operation_plan),
    FieldRule::anywhere("OBJEKT", setters::einsatzort_property),
    FieldRule::anywhere("MELDENDER", messenger),
    FieldRule::anywhere("STRASSE", street),
    FieldRule::anywhere("DIAGNOSE", picture),
    FieldRule::anywhere("STICHWORT", emergency_keyword),
    FieldRule::anywhere("PLZ / ORTSTEIL", city),
];

const FALLBACKS: &[(Section, Fallback)] = &[(Section::Bemerkung, Fallback::Apply(remark))];

pub static LAYOUT: Layout = Layout::new("ILSKaiserslautern")
    .keywords(KEYWORDS)
    .markers(MARKERS)
    .fields(FIELDS)
    .fallbacks(FALLBACKS)
    .colon(ColonPolicy::AfterKeyword)
    .before_line(scan_line)
    .finish(ascii_text_fields);

/// The operation number stands somewhere in a line after its label.
fn scan_line(state: &mut ParseState, raw: &str) -> FieldResult {
    stamp_fax_received(state);
    if let Some(number) = text_after(raw, OPERATION_NUMBER_LABEL) {
        state.operation.operation_number = number;
    }
    Ok(())
}

fn messenger(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    append_spaced(&mut state.operation.messenger, line.message);
    Ok(())
}

fn street(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    append_spaced(&mut state.operation.einsatzort.street, line.message);
    Ok(())
}

fn picture(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    append_spaced(&mut state.operation.picture, line.message);
    Ok(())
}

fn emergency_keyword(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    append_spaced(&mut state.operation.keywords.emergency_keyword, line.message);
    Ok(())
}

/// Only the first city line counts; later ones belong to the destination.
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
