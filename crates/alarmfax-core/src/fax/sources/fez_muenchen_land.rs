//! FEZ München Land.
//!
//! A field keyword starts the field; following lines without a keyword
//! replace its value. Unit lines follow "Geforderte Einsatzmittel".

use crate::error::FieldResult;
use crate::fax::engine::{Fallback, FieldRule, Layout, Line, MarkerMatch, ParseState, Section, SectionMarker};
use crate::fax::rules::{get_message_text, read_fax_timestamp, ColonPolicy};
use crate::fax::setters::{apply_grid_coordinates, apply_street, ignore, split_unit_equipment};
use crate::models::OperationResource;

const UNIT_HEADING: &str = "GEFORDERTE EINSATZMITTEL";

// "STRABE" and "9BJEKT" are how the OCR reads the headings on newer faxes.
const KEYWORDS: &[&str] = &[
    "EINSATZNR",
    "MITTEILER",
    "EINSATZORT",
    "STRAßE",
    "STRABE",
    "ABSCHNITT",
    "KREUZUNG",
    "ORTSTEIL/ORT",
    "OBJEKT",
    "9BJEKT",
    "EINSATZPLAN",
    "MELDEBILD",
    "HINWEIS",
    UNIT_HEADING,
    "KOORDINATEN",
    "",
];

const MARKERS: &[SectionMarker] = &[SectionMarker::new(&["(ALARMSCHREIBEN ENDE)"], Section::Footer)
    .matching(MarkerMatch::StartsWithIgnoreCase)
    .free()];

const FIELDS: &[FieldRule] = &[
    FieldRule::new(Section::Daten, "EINSATZNR", number).continued_by(number),
    FieldRule::new(Section::Daten, "MITTEILER", messenger).continued_by(messenger),
    FieldRule::new(Section::Daten, "EINSATZORT", location).continued_by(location),
    FieldRule::new(Section::Daten, "STRAßE", street).continued_by(street),
    FieldRule::new(Section::Daten, "STRABE", street).continued_by(street),
    FieldRule::new(Section::Daten, "ABSCHNITT", street_section).continued_by(street_section),
    FieldRule::new(Section::Daten, "KREUZUNG", intersection).continued_by(intersection),
    FieldRule::new(Section::Daten, "ORTSTEIL/ORT", city).continued_by(city),
    FieldRule::new(Section::Daten, "OBJEKT", property).continued_by(property),
    FieldRule::new(Section::Daten, "9BJEKT", property).continued_by(property),
    FieldRule::new(Section::Daten, "EINSATZPLAN", plan).continued_by(plan),
    FieldRule::new(Section::Daten, "MELDEBILD", picture).continued_by(picture),
    FieldRule::new(Section::Daten, "HINWEIS", comment).continued_by(comment),
    FieldRule::new(Section::Daten, UNIT_HEADING, ignore).continued_by(resource),
    FieldRule::new(Section::Daten, "KOORDINATEN", coordinates).continued_by(coordinates),
];

const FALLBACKS: &[(Section, Fallback)] = &[(Section::Daten, Fallback::Inner)];

pub static LAYOUT: Layout = Layout::new("FezMuenchenLandParser")
    .keywords(KEYWORDS)
    .markers(MARKERS)
    .fields(FIELDS)
    .fallbacks(FALLBACKS)
    .start(Section::Daten, true)
    .colon(ColonPolicy::KeywordOnly);

/// The line without its keyword, or without its label on continuation lines.
fn value(line: &Line<'_>) -> String {
    get_message_text(line.raw, line.keyword)
}

/// "EINSATZNR: 1.2 200305 99 ALARM: 05.03.2020 14:32"
fn number(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    let Some(alarm) = line.raw.to_ascii_uppercase().find("ALARM") else {
        state.operation.operation_number = value(line);
        return Ok(());
    };

    state.operation.operation_number = get_message_text(&line.raw[..alarm], line.keyword);
    let alarm_time = get_message_text(&line.raw[alarm..], Some("ALARM"));
    state.operation.timestamp = read_fax_timestamp(&alarm_time, state.received);
    Ok(())
}

fn messenger(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.messenger = value(line);
    Ok(())
}

fn location(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.einsatzort.location = value(line);
    Ok(())
}

fn street(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    let appendix = apply_street(&mut state.operation.einsatzort, &value(line));
    state.operation.set_custom_data("Einsatzort Zusatz", appendix);
    Ok(())
}

fn street_section(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.set_custom_data("Einsatzort Abschnitt", value(line));
    Ok(())
}

fn intersection(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.einsatzort.intersection = value(line);
    Ok(())
}

fn city(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.einsatzort.city = value(line);
    Ok(())
}

fn property(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.einsatzort.property = value(line);
    Ok(())
}

fn plan(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.operation_plan = value(line);
    Ok(())
}

fn picture(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.picture = value(line);
    Ok(())
}

fn comment(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.comment = value(line);
    Ok(())
}

/// "GK4 4468000,00 5333000,00"
fn coordinates(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    let text = value(line).replace("GK4", "").replace(',', ".");
    apply_grid_coordinates(&mut state.operation.einsatzort, &text)
}

/// "FL Ottobrunn 40/1 (DLK)": requested equipment is given in parentheses.
fn resource(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    let raw = line.raw;
    if raw.to_uppercase().starts_with(UNIT_HEADING) {
        return Ok(());
    }

    let resource = match split_unit_equipment(raw) {
        Some((unit, equipment)) => OperationResource::new(unit).with_equipment(equipment),
        None => OperationResource::new(raw),
    };
    state.operation.resources.push(resource);
    Ok(())
}
