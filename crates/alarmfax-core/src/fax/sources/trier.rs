//! ILS Trier.

use crate::error::{FieldError, FieldResult};
use crate::fax::engine::{Fallback, FieldRule, Layout, Line, MarkerMatch, ParseState, Section, SectionMarker};
use crate::fax::rules::patterns::CLOCK_HMS;
use crate::fax::rules::ColonPolicy;
use crate::fax::setters;
use crate::models::OperationResource;

const KEYWORDS: &[&str] = &[
    "ALARMPLAN",
    "PLZ ORT",
    "STRASSE",
    "OBJEKT",
    "TELEFON",
    "MELDUNG INFO",
    "EINSATZART",
    "STICHWORT",
];

const MARKERS: &[SectionMarker] = &[
    SectionMarker::new(&["ANFAHRT"], Section::Hinweis)
        .matching(MarkerMatch::StartsWithIgnoreCase)
        .free(),
    SectionMarker::new(&["BETEILIGTE EINSATZMITTEL"], Section::Einsatzmittel)
        .matching(MarkerMatch::StartsWithIgnoreCase)
        .free(),
    SectionMarker::new(&["AP"], Section::Footer)
        .matching(MarkerMatch::StartsWithIgnoreCase)
        .free(),
];

const FIELDS: &[FieldRule] = &[
    FieldRule::anywhere("ALARMPLAN", operation_number),
    FieldRule::anywhere("PLZ ORT", city),
    FieldRule::anywhere("STRASSE", street),
    FieldRule::anywhere("OBJEKT", setters::einsatzort_property),
    FieldRule::anywhere("TELEFON", setters::messenger),
    FieldRule::anywhere("MELDUNG INFO", comment),
    FieldRule::anywhere("EINSATZART", setters::keyword),
    FieldRule::anywhere("STICHWORT", setters::emergency_keyword),
];

const FALLBACKS: &[(Section, Fallback)] = &[
    (Section::Hinweis, Fallback::Apply(approach)),
    (Section::Einsatzmittel, Fallback::Apply(resource)),
];

pub static LAYOUT: Layout = Layout::new("ILSTrierParser")
    .keywords(KEYWORDS)
    .markers(MARKERS)
    .fields(FIELDS)
    .fallbacks(FALLBACKS)
    .colon(ColonPolicy::KeywordOnly);

/// "ALARMPLAN ... EINSATZNUMMER 4711 vom 05.03.2020": the number is the word
/// after the label.
fn operation_number(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    let missing = || FieldError::MissingValue(format!("operation number in '{}'", line.raw));

    let label = line
        .raw
        .to_ascii_uppercase()
        .find("EINSATZNUMMER")
        .ok_or_else(missing)?;
    let rest = line.raw[label..].trim();
    let (_, rest) = rest.split_once(' ').ok_or_else(missing)?;
    let rest = rest.trim();
    let (number, _) = rest.split_once(' ').ok_or_else(missing)?;

    state.operation.operation_number = number.trim().to_string();
    state.enter(Section::Daten, true);
    Ok(())
}

fn city(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.einsatzort.city = line.message.to_string();
    Ok(())
}

fn street(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.einsatzort.street = line.message.to_string();
    Ok(())
}

fn comment(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.comment = line.message.to_string();
    Ok(())
}

/// The single line after "ANFAHRT" holds the route plan, optionally
/// followed by "PLZ <zip>".
fn approach(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    match line.raw.find("PLZ") {
        Some(index) => {
            state.operation.operation_plan = line.raw[..index].trim().to_string();
            let zip = &line.raw[index..];
            let zip = zip.split_once(' ').map_or(zip, |(_, zip)| zip);
            state.operation.einsatzort.zip_code = zip.trim().to_string();
        }
        None => state.operation.operation_plan = line.raw.to_string(),
    }
    state.enter(Section::Daten, true);
    Ok(())
}

/// Unit lines carry their alarm time, which is dropped.
fn resource(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    if line.raw.to_uppercase().contains("FAHRZEUG") {
        return Ok(());
    }
    let name = CLOCK_HMS.replace_all(line.raw, "");
    state.operation.resources.push(OperationResource::new(name.trim()));
    Ok(())
}
