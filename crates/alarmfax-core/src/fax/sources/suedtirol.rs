//! Landesnotrufzentrale Südtirol. One field per line, no sections.

use crate::error::{FieldError, FieldResult};
use crate::fax::engine::{FieldRule, Layout, Line, ParseState};
use crate::fax::rules::{read_fax_timestamp, ColonPolicy};
use crate::fax::setters::{self, custom_data_setters, parse_number};

const DATE: &str = "date";

const KEYWORDS: &[&str] = &[
    "Datum",
    "Zeit",
    "Feuerwehr",
    "Alarmstufe",
    "Bezeichnung",
    "Strasse Nr.",
    "Strasse",
    "PLZ",
    "Ort",
    "Pager Meldung",
    "Einsatz ID",
    "Lat/Long",
    "Beschreibung",
];

const FIELDS: &[FieldRule] = &[
    FieldRule::anywhere("DATUM", date),
    FieldRule::anywhere("ZEIT", time),
    FieldRule::anywhere("FEUERWEHR", fire_brigade),
    FieldRule::anywhere("ALARMSTUFE", setters::emergency_keyword),
    FieldRule::anywhere("BEZEICHNUNG", setters::keyword),
    FieldRule::anywhere("STRASSE NR.", street_number),
    FieldRule::anywhere("STRASSE", street),
    FieldRule::anywhere("PLZ", zip_code),
    FieldRule::anywhere("ORT", city),
    FieldRule::anywhere("PAGER MELDUNG", pager_message),
    FieldRule::anywhere("EINSATZ ID", setters::operation_number),
    FieldRule::anywhere("LAT/LONG", position),
    FieldRule::anywhere("BESCHREIBUNG", setters::comment),
];

pub static LAYOUT: Layout = Layout::new("IlstSuedtirolParser")
    .keywords(KEYWORDS)
    .fields(FIELDS)
    .colon(ColonPolicy::KeywordOnly);

custom_data_setters! {
    fire_brigade => "Feuerwehr",
    pager_message => "Pager Meldung",
}

/// Kept until the time line arrives.
fn date(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    let date = state.buffer_mut(DATE);
    date.clear();
    date.push_str(line.message);
    Ok(())
}

fn time(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    let date = state.buffer_mut(DATE).clone();
    let text = format!("{} {}", date, line.message);
    state.operation.timestamp = read_fax_timestamp(&text, state.received);
    Ok(())
}

fn street(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.einsatzort.street = line.message.to_string();
    Ok(())
}

fn street_number(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.einsatzort.street_number = line.message.to_string();
    Ok(())
}

fn zip_code(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.einsatzort.zip_code = line.message.to_string();
    Ok(())
}

fn city(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.einsatzort.city = line.message.to_string();
    Ok(())
}

/// "46,4983; 11,3548": WGS84 latitude and longitude.
fn position(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    let (latitude, longitude) = line
        .message
        .split_once(';')
        .ok_or_else(|| FieldError::MissingValue(format!("longitude in '{}'", line.message)))?;
    let latitude = parse_number(latitude)?;
    let longitude = parse_number(longitude)?;
    state.operation.einsatzort.geo_latitude = Some(latitude);
    state.operation.einsatzort.geo_longitude = Some(longitude);
    Ok(())
}
