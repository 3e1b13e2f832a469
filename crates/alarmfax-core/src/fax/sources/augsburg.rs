//! ILS Augsburg.

use crate::error::FieldResult;
use crate::fax::engine::{Fallback, FieldRule, Layout, Line, ParseState, Section, SectionMarker};
use crate::fax::setters::{self, before_last};
use crate::models::OperationResource;

// The empty keyword accepts every line; lines without a colon then carry no prefix.
const KEYWORDS: &[&str] = &[
    "",
    "EINSATZNUMMER FÜR EINSATZNACHBEARBEITUNG",
    "EINSATZPLAN",
    "KOORDINATE",
    "ABSENDER",
    "NAME",
    "STRAßE",
    "ORT",
    "OBJEKT",
    "KREUZUNG",
    "STICHWORT",
    "SCHLAGW",
];

const MARKERS: &[SectionMarker] = &[
    SectionMarker::new(&["MITTEILER"], Section::Mitteiler),
    SectionMarker::new(&["EINSATZORT"], Section::Einsatzort),
    SectionMarker::new(&["ZIELORT"], Section::Zielort),
    SectionMarker::new(&["EINSATZGRUND"], Section::Einsatzgrund),
    SectionMarker::new(&["EINSATZMITTEL"], Section::Einsatzmittel).free(),
    SectionMarker::new(&["BEMERKUNG"], Section::Bemerkung).free(),
    SectionMarker::new(&["ENDE FAX"], Section::Footer).free(),
];

// Continuations in ZIELORT extend the Einsatzort fields, as the center's
// faxes have always been read.
const FIELDS: &[FieldRule] = &[
    FieldRule::new(Section::Mitteiler, "NAME", setters::messenger),
    FieldRule::new(Section::Einsatzort, "STRAßE", setters::einsatzort_street)
        .continued_by(setters::append_einsatzort_street),
    FieldRule::new(Section::Einsatzort, "ORT", setters::einsatzort_city)
        .continued_by(setters::append_einsatzort_city),
    FieldRule::new(Section::Einsatzort, "OBJEKT", setters::einsatzort_property)
        .continued_by(setters::append_einsatzort_property),
    FieldRule::new(Section::Einsatzort, "KREUZUNG", setters::einsatzort_intersection),
    FieldRule::new(Section::Einsatzort, "KOORDINATE", setters::einsatzort_coordinates),
    FieldRule::new(Section::Zielort, "STRAßE", setters::zielort_street)
        .continued_by(setters::append_einsatzort_street),
    FieldRule::new(Section::Zielort, "ORT", setters::zielort_city)
        .continued_by(setters::append_einsatzort_city),
    FieldRule::new(Section::Zielort, "OBJEKT", setters::zielort_property)
        .continued_by(setters::append_einsatzort_property),
    FieldRule::new(Section::Einsatzgrund, "SCHLAGW.", setters::keyword),
    FieldRule::new(Section::Einsatzgrund, "STICHWORT", setters::emergency_keyword),
];

const FALLBACKS: &[(Section, Fallback)] = &[
    (Section::Einsatzort, Fallback::Inner),
    (Section::Zielort, Fallback::Inner),
    (Section::Einsatzmittel, Fallback::Apply(resource)),
    (Section::Bemerkung, Fallback::Apply(setters::comment_line)),
];

pub static LAYOUT: Layout = Layout::new("ILSAugsburgParser")
    .keywords(KEYWORDS)
    .markers(MARKERS)
    .fields(FIELDS)
    .fallbacks(FALLBACKS)
    .before_line(setters::fax_timestamp)
    .carry_continuation(setters::append_einsatzort_street);

/// "HLF 20/1 (Florian Augsburg 1)": the unit name ends before the last bracket.
fn resource(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    let name = before_last(line.message, '(')?.trim();
    state.operation.resources.push(OperationResource::new(name));
    Ok(())
}
