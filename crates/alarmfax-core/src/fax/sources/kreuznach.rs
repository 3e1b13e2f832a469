//! ILS Bad Kreuznach.

use crate::error::FieldResult;
use crate::fax::engine::{Fallback, FieldRule, Layout, Line, ParseState, Section, SectionMarker};
use crate::fax::setters::{self, custom_data_setters};

const KEYWORDS: &[&str] = &[
    "Einsatznummer",
    "Einsatzort",
    "Ortsteil",
    "Ort",
    "Strasse",
    "Objekt",
    "BMA-Nummer/Linie",
    "BMA-Info",
    "Besonderheiten",
    "Einsatzart",
    "Alarmstichwort",
    "Meldender",
];

const MARKERS: &[SectionMarker] = &[
    SectionMarker::new(&["Alarmierte Einheiten"], Section::Einsatzmittel).free(),
    SectionMarker::new(&["Alarmgruppen"], Section::Alarmierung),
    SectionMarker::new(&["Ausdruck vom"], Section::Footer),
];

const FIELDS: &[FieldRule] = &[
    FieldRule::new(Section::Daten, "EINSATZNUMMER", setters::operation_number),
    FieldRule::new(Section::Daten, "EINSATZORT", setters::einsatzort_location),
    FieldRule::new(Section::Daten, "OBJEKT", setters::einsatzort_property),
    FieldRule::new(Section::Daten, "ORT", city),
    FieldRule::new(Section::Daten, "BMA-NUMMER/LINIE", setters::operation_plan),
    FieldRule::new(Section::Daten, "ORTSTEIL", district),
    FieldRule::new(Section::Daten, "STRASSE", setters::einsatzort_street),
    FieldRule::new(Section::Daten, "BESONDERHEITEN", comment),
    FieldRule::new(Section::Daten, "EINSATZART", setters::keyword),
    FieldRule::new(Section::Daten, "ALARMSTICHWORT", setters::emergency_keyword),
    FieldRule::new(Section::Daten, "MELDENDER", setters::messenger),
];

const FALLBACKS: &[(Section, Fallback)] = &[(Section::Einsatzmittel, Fallback::Apply(setters::resource_line))];

pub static LAYOUT: Layout = Layout::new("IlsKreuznachParser")
    .keywords(KEYWORDS)
    .markers(MARKERS)
    .fields(FIELDS)
    .fallbacks(FALLBACKS)
    .start(Section::Daten, true);

custom_data_setters! {
    district => "Einsatzort Ortsteil",
}

fn city(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.einsatzort.city = line.message.to_string();
    Ok(())
}

fn comment(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.comment = line.message.to_string();
    Ok(())
}
