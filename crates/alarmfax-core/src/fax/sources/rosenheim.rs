//! ILS Rosenheim.

use crate::error::FieldResult;
use crate::fax::engine::{Fallback, FieldRule, Layout, Line, ParseState, Section, SectionMarker};
use crate::fax::rules::{get_text_between, resource_timestamp, truncate_at_dash, Comparison};
use crate::fax::setters;

const KEYWORDS: &[&str] = &[
    "Einsatz-Nr.",
    "Name",
    "Straße",
    "Abschnitt",
    "Ortsteil",
    "Kreuzung",
    "Objekt",
    "Schlagw.",
    "Stichwort",
    "Priorität",
    "Alarmiert",
    "gef. Gerät",
];

const MARKERS: &[SectionMarker] = &[
    SectionMarker::new(&["MITTEILER"], Section::Mitteiler),
    SectionMarker::new(&["EINSATZORT"], Section::Einsatzort),
    SectionMarker::new(&["EINSATZGRUND"], Section::Einsatzgrund),
    SectionMarker::new(&["EINSATZMITTEL"], Section::Einsatzmittel),
    SectionMarker::new(&["BEMERKUNG"], Section::Bemerkung).free(),
    SectionMarker::new(&["EINSATZHINWEIS"], Section::Hinweis).free(),
    SectionMarker::new(&["ENDE ALARMFAX"], Section::Footer).free(),
];

const FIELDS: &[FieldRule] = &[
    FieldRule::new(Section::Header, "EINSATZ-NR.", setters::operation_number),
    FieldRule::new(Section::Einsatzort, "STRAßE", setters::einsatzort_street),
    FieldRule::new(Section::Einsatzort, "ORTSTEIL", district),
    FieldRule::new(Section::Einsatzort, "OBJEKT", setters::einsatzort_property),
    FieldRule::new(Section::Einsatzort, "KREUZUNG", setters::einsatzort_intersection),
    FieldRule::new(Section::Einsatzgrund, "SCHLAGW.", setters::keyword),
    FieldRule::new(Section::Einsatzgrund, "STICHWORT", setters::emergency_keyword),
    FieldRule::new(Section::Einsatzgrund, "PRIORITÄT", setters::priority),
    FieldRule::new(Section::Einsatzmittel, "NAME", setters::resource_name),
    FieldRule::new(Section::Einsatzmittel, "ALARMIERT", alarmed),
    FieldRule::new(Section::Einsatzmittel, "GEF. GERÄT", setters::resource_equipment_last),
];

const FALLBACKS: &[(Section, Fallback)] = &[
    (Section::Mitteiler, Fallback::Apply(setters::messenger)),
    (Section::Bemerkung, Fallback::Apply(setters::picture_line)),
    (Section::Hinweis, Fallback::Apply(setters::comment_line)),
];

pub static LAYOUT: Layout = Layout::new("ILSRosenheimParser")
    .keywords(KEYWORDS)
    .markers(MARKERS)
    .fields(FIELDS)
    .fallbacks(FALLBACKS);

/// The district line carries the city, cut at its first dash.
fn district(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.einsatzort.city = truncate_at_dash(line.message).to_string();
    Ok(())
}

/// "05.03.2020 14:33 Aus: 15:10": only the alarm time is kept.
fn alarmed(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    let alarmed = get_text_between(line.message, None, Some("AUS"), Comparison::IgnoreCase)?;
    state.resource.timestamp = resource_timestamp(&alarmed);
    Ok(())
}
