//! ILS Ludwigsburg.

use crate::error::FieldResult;
use crate::fax::engine::{Fallback, FieldRule, Layout, Line, MarkerMatch, ParseState, Section, SectionMarker};
use crate::fax::rules::{read_fax_timestamp, ColonPolicy};
use crate::fax::setters::{self, custom_data_setters, CityCut};
use crate::models::OperationResource;

const KEYWORDS: &[&str] = &[
    "Einsatznummer",
    "Meldungseingang",
    "Stichwort",
    "Sondersignal",
    "Hinweis",
    "Ortsteil",
    "Ort",
    "Strasse",
    "Objektplan",
    "Objekt",
    "Kategorie",
    "Information",
    "Einsatzplan",
    "BMA-Nr.",
];

// Every line after the heading names one vehicle.
const MARKERS: &[SectionMarker] = &[SectionMarker::new(&["Zugeteilte Fahrzeuge"], Section::Einsatzmittel)
    .matching(MarkerMatch::StartsWithIgnoreCase)
    .free()];

const FIELDS: &[FieldRule] = &[
    FieldRule::anywhere("EINSATZNUMMER", setters::operation_number),
    FieldRule::anywhere("MELDUNGSEINGANG", received),
    FieldRule::anywhere("STICHWORT", setters::keyword),
    FieldRule::anywhere("SONDERSIGNAL", signal),
    FieldRule::anywhere("HINWEIS", setters::comment),
    FieldRule::anywhere("ORTSTEIL", district),
    FieldRule::anywhere("ORT", city),
    FieldRule::anywhere("STRASSE", setters::einsatzort_street),
    FieldRule::anywhere("OBJEKTPLAN", object_plan),
    FieldRule::anywhere("OBJEKT", setters::einsatzort_property),
    FieldRule::anywhere("KATEGORIE", category),
    FieldRule::anywhere("INFORMATION", information),
    FieldRule::anywhere("EINSATZPLAN", setters::operation_plan),
    FieldRule::anywhere("BMA-NR.", alarm_system),
];

const FALLBACKS: &[(Section, Fallback)] = &[(Section::Einsatzmittel, Fallback::Apply(vehicle))];

pub static LAYOUT: Layout = Layout::new("IlsLudwigsburgParser")
    .keywords(KEYWORDS)
    .markers(MARKERS)
    .fields(FIELDS)
    .fallbacks(FALLBACKS)
    .colon(ColonPolicy::KeywordOnly);

custom_data_setters! {
    signal => "Sondersignal",
    district => "Einsatzort Ortsteil",
    category => "Einsatzobjekt Kategorie",
    information => "Einsatzobjekt Information",
    alarm_system => "Einsatzobjekt BMA-Nr.",
    object_plan => "Einsatzobjekt Objektplan",
}

fn received(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.timestamp = read_fax_timestamp(line.message, state.received);
    Ok(())
}

fn city(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    setters::apply_city(&mut state.operation.einsatzort, line.message, CityCut::None);
    Ok(())
}

fn vehicle(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.resources.push(OperationResource::new(line.raw));
    Ok(())
}
