//! ILS Erding.

use crate::error::FieldResult;
use crate::fax::engine::{Fallback, FieldRule, Layout, Line, ParseState, Section, SectionMarker};
use crate::fax::rules::append_spaced;
use crate::fax::setters::{self, apply_city, custom_data_setters, CityCut};

const KEYWORDS: &[&str] = &[
    "",
    "ALARM",
    "EINSATZNUMMER",
    "NAME",
    "STRAßE",
    "ABSCHNITT",
    "ORT",
    "RUFNUMMER",
    "OBJEKT",
    "STATION",
    "SCHLAGW",
    "GEF. GERÄTE",
    "ALARMIERT",
    "EINSATZPLANNUMMER",
];

// Patient details are not evaluated.
const MARKERS: &[SectionMarker] = &[
    SectionMarker::new(&["MITTEILER", "M I TTE I LER"], Section::Mitteiler),
    SectionMarker::new(&["EINSATZORT"], Section::Einsatzort),
    SectionMarker::new(&["ZIELORT"], Section::Zielort),
    SectionMarker::new(&["PATIENT"], Section::Footer).free(),
    SectionMarker::new(&["EINSATZGRUND"], Section::Einsatzgrund),
    SectionMarker::new(&["EINSATZMITTEL"], Section::Einsatzmittel),
    SectionMarker::new(&["BEMERKUNG"], Section::Bemerkung).free(),
    SectionMarker::new(&["ENDE FAX"], Section::Footer).free(),
];

const FIELDS: &[FieldRule] = &[
    FieldRule::new(Section::Header, "ALARM", setters::alarm_timestamp),
    FieldRule::new(Section::Header, "EINSATZNUMMER", setters::operation_number),
    FieldRule::new(Section::Mitteiler, "NAME", setters::messenger),
    FieldRule::new(Section::Mitteiler, "RUFNUMMER", phone_number),
    FieldRule::new(Section::Einsatzort, "STRAßE", setters::einsatzort_street)
        .continued_by(setters::append_einsatzort_street),
    FieldRule::new(Section::Einsatzort, "ABSCHNITT", setters::einsatzort_intersection),
    FieldRule::new(Section::Einsatzort, "ORT", einsatzort_city)
        .continued_by(setters::append_einsatzort_city),
    FieldRule::new(Section::Einsatzort, "OBJEKT", setters::einsatzort_property)
        .continued_by(setters::append_einsatzort_property),
    FieldRule::new(Section::Einsatzort, "EINSATZPLANNUMMER", setters::operation_plan),
    FieldRule::new(Section::Einsatzort, "STATION", einsatzort_station)
        .continued_by(append_einsatzort_station),
    FieldRule::new(Section::Zielort, "STRAßE", setters::zielort_street)
        .continued_by(setters::append_zielort_street),
    FieldRule::new(Section::Zielort, "ORT", setters::zielort_city)
        .continued_by(setters::append_zielort_city),
    FieldRule::new(Section::Zielort, "OBJEKT", setters::zielort_property)
        .continued_by(setters::append_zielort_property),
    FieldRule::new(Section::Zielort, "STATION", zielort_station)
        .continued_by(append_zielort_station),
    FieldRule::new(Section::Einsatzgrund, "SCHLAGW.", setters::keyword),
    FieldRule::new(Section::Einsatzgrund, "STICHWORT", setters::emergency_keyword),
    FieldRule::new(Section::Einsatzmittel, "NAME", setters::resource_name),
    FieldRule::new(Section::Einsatzmittel, "GEF. GERÄTE", setters::resource_equipment),
    FieldRule::new(Section::Einsatzmittel, "ALARMIERT", setters::resource_alarmed),
];

const FALLBACKS: &[(Section, Fallback)] = &[
    (Section::Einsatzort, Fallback::Inner),
    (Section::Zielort, Fallback::Inner),
    (Section::Bemerkung, Fallback::Apply(setters::comment_line)),
];

pub static LAYOUT: Layout = Layout::new("IlsErdingParser")
    .keywords(KEYWORDS)
    .markers(MARKERS)
    .fields(FIELDS)
    .fallbacks(FALLBACKS)
    .before_line(setters::fax_timestamp)
    .carry_continuation(setters::append_einsatzort_street);

custom_data_setters! {
    einsatzort_station => "Einsatzort Station",
    append_einsatzort_station += "Einsatzort Station",
    zielort_station => "Zielort Station",
    append_zielort_station += "Zielort Station",
}

fn phone_number(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    append_spaced(&mut state.operation.messenger, line.message);
    Ok(())
}

fn einsatzort_city(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    apply_city(&mut state.operation.einsatzort, line.message, CityCut::None);
    Ok(())
}
