//! ILS Donau-Iller.

use crate::error::FieldResult;
use crate::fax::engine::{Fallback, FieldRule, Layout, Line, ParseState, Section, SectionMarker};
use crate::fax::rules::resource_timestamp;
use crate::fax::setters::{self, label_value};

const KEYWORDS: &[&str] = &[
    "",
    "ABSENDER",
    "FAX",
    "TERMIN",
    "EINSATZNUMMER",
    "BMA MELDER",
    "NAME",
    "STRAßE",
    "STR.ABSCHN",
    "ORT",
    "OBJEKT",
    "STATION",
    "SCHLAGW",
    "STICHWORT",
    "PRIO",
    "STICHWORT B",
    "STICHWORT T",
    "STICHWORT S",
    "STICHWORT R",
    "EINSATZMITTEL",
    "ALARMIERT",
    "GEF. GERÄT",
];

const MARKERS: &[SectionMarker] = &[
    SectionMarker::new(&["MITTEILER"], Section::Mitteiler),
    SectionMarker::new(&["EINSATZORT"], Section::Einsatzort),
    SectionMarker::new(&["EINSATZGRUND"], Section::Einsatzgrund),
    SectionMarker::new(&["EINSATZMITTEL"], Section::Einsatzmittel),
    SectionMarker::new(&["BEMERKUNG"], Section::Bemerkung).free(),
    SectionMarker::new(&["ENDE FAX"], Section::Footer).free(),
];

const FIELDS: &[FieldRule] = &[
    FieldRule::new(Section::Header, "ABSENDER", sender),
    FieldRule::new(Section::Header, "TERMIN", appointment),
    FieldRule::new(Section::Header, "EINSATZNUMMER", setters::operation_number),
    FieldRule::new(Section::Header, "BMA MELDER", fire_alarm_detector),
    FieldRule::new(Section::Mitteiler, "NAME", setters::messenger),
    FieldRule::new(Section::Einsatzort, "STRAßE", setters::einsatzort_street)
        .continued_by(setters::append_einsatzort_street),
    FieldRule::new(Section::Einsatzort, "STR.ABSCHN", street_section)
        .continued_by(append_street_section),
    FieldRule::new(Section::Einsatzort, "ORT", setters::einsatzort_city)
        .continued_by(setters::append_einsatzort_city),
    FieldRule::new(Section::Einsatzort, "OBJEKT", setters::einsatzort_property)
        .continued_by(setters::append_einsatzort_property),
    FieldRule::new(Section::Einsatzort, "STATION", station).continued_by(append_station),
    FieldRule::new(Section::Einsatzgrund, "SCHLAGW.", setters::keyword),
    FieldRule::new(Section::Einsatzgrund, "STICHWORT B", setters::keyword_b),
    FieldRule::new(Section::Einsatzgrund, "STICHWORT T", setters::keyword_t),
    FieldRule::new(Section::Einsatzgrund, "STICHWORT S", setters::keyword_s),
    FieldRule::new(Section::Einsatzgrund, "STICHWORT R", setters::keyword_r),
];

const FALLBACKS: &[(Section, Fallback)] = &[
    (Section::Einsatzort, Fallback::Inner),
    (Section::Einsatzmittel, Fallback::Apply(resource)),
    (Section::Bemerkung, Fallback::Apply(setters::comment_line)),
];

pub static LAYOUT: Layout = Layout::new("ILSDonauIllerParser")
    .keywords(KEYWORDS)
    .markers(MARKERS)
    .fields(FIELDS)
    .fallbacks(FALLBACKS)
    .before_line(setters::fax_timestamp)
    .carry_continuation(setters::append_einsatzort_street);

fn sender(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.set_custom_data("Absender", line.message);
    Ok(())
}

fn appointment(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.set_custom_data("Termin", line.message);
    Ok(())
}

fn fire_alarm_detector(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.set_custom_data("BMA Melder", line.message);
    Ok(())
}

fn street_section(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state
        .operation
        .set_custom_data("Einsatzort Straße Abschnitt", line.message);
    Ok(())
}

fn append_street_section(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state
        .operation
        .custom_data_mut("Einsatzort Straße Abschnitt")
        .push_str(line.message);
    Ok(())
}

fn station(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.set_custom_data("Einsatzort Station", line.message);
    Ok(())
}

fn append_station(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state
        .operation
        .custom_data_mut("Einsatzort Station")
        .push_str(line.message);
    Ok(())
}

/// NAME opens a unit, GEF. GERÄT adds equipment, ALARMIERT closes it.
fn resource(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    if let Some(name) = label_value(line.raw, "NAME") {
        state.resource.full_name = name;
    } else if let Some(equipment) = label_value(line.raw, "GEF. GERÄT") {
        if !equipment.trim().is_empty() {
            state.resource.requested_equipment.push(equipment);
        }
    } else if let Some(alarmed) = label_value(line.raw, "ALARMIERT") {
        state.resource.timestamp = resource_timestamp(&alarmed);
        state.emit_resource();
    }
    Ok(())
}
