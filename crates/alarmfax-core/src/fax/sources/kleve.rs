//! Leitstelle Kreis Kleve.
//!
//! A keyword line selects the field, following lines without a keyword
//! continue it. Older printouts mangle umlauts ("Prioritðt", "StraÔe"); both
//! spellings are accepted.

use crate::error::FieldResult;
use crate::fax::engine::{Fallback, FieldRule, Layout, Line, ParseState, Section};
use crate::fax::rules::patterns::CLOCK_HMS;
use crate::fax::rules::{get_message_text, read_german_long_date, ColonPolicy};
use crate::fax::setters::apply_street;
use crate::models::OperationResource;

const KEYWORDS: &[&str] = &[
    "Einsatznr",
    "EArt",
    "Stichwort",
    "Diagnose",
    "Meldender",
    "Prioritaet",
    "Prioritðt",
    "Ort ",
    "Ortsteil",
    "Strasse",
    "StraÔe",
    "Kreuzung",
    "NRN",
    "ADAC",
    "Info",
    "Objektname",
    "Routenausgabe",
    "beteiligte Einsatzmittel",
    "Besonderh",
    "Ausdruck",
    "BMA-Nummer",
    "",
];

const FIELDS: &[FieldRule] = &[
    FieldRule::new(Section::Daten, "EINSATZNR", operation_number).continued_by(operation_number),
    FieldRule::new(Section::Daten, "EART", keyword).continued_by(keyword),
    FieldRule::new(Section::Daten, "STICHWORT", emergency_keyword).continued_by(emergency_keyword),
    FieldRule::new(Section::Daten, "DIAGNOSE", picture).continued_by(picture),
    FieldRule::new(Section::Daten, "MELDENDER", messenger).continued_by(messenger),
    FieldRule::new(Section::Daten, "PRIORITAET", priority),
    FieldRule::new(Section::Daten, "PRIORITÐT", priority),
    FieldRule::new(Section::Daten, "ORT", city).continued_by(city),
    FieldRule::new(Section::Daten, "ORTSTEIL", district).continued_by(district),
    FieldRule::new(Section::Daten, "STRASSE", street).continued_by(street),
    FieldRule::new(Section::Daten, "STRAÔE", street).continued_by(street),
    FieldRule::new(Section::Daten, "KREUZUNG", intersection).continued_by(intersection),
    FieldRule::new(Section::Daten, "NRN", nrn).continued_by(nrn),
    FieldRule::new(Section::Daten, "ADAC", adac).continued_by(adac),
    FieldRule::new(Section::Daten, "INFO", comment).continued_by(comment),
    FieldRule::new(Section::Daten, "OBJEKTNAME", property).continued_by(property),
    FieldRule::new(Section::Daten, "BMA-NUMMER", alarm_system).continued_by(alarm_system),
    FieldRule::new(Section::Daten, "ROUTENAUSGABE", stop),
    FieldRule::new(Section::Daten, "BETEILIGTE EINSATZMITTEL", unit).continued_by(unit),
    FieldRule::new(Section::Daten, "AUSDRUCK", printed).continued_by(printed),
    FieldRule::new(Section::Daten, "BESONDERH", particulars),
];

const FALLBACKS: &[(Section, Fallback)] = &[(Section::Daten, Fallback::Inner)];

pub static LAYOUT: Layout = Layout::new("LSTKleveParser")
    .keywords(KEYWORDS)
    .fields(FIELDS)
    .fallbacks(FALLBACKS)
    .start(Section::Daten, true)
    .colon(ColonPolicy::KeywordOnly);

fn value(line: &Line<'_>) -> String {
    get_message_text(line.raw, None)
}

/// Append to the property, trimming the result.
fn extend_property(state: &mut ParseState, text: &str) {
    let property = &mut state.operation.einsatzort.property;
    property.push_str(text);
    *property = property.trim().to_string();
}

fn stop(state: &mut ParseState, _: &Line<'_>) -> FieldResult {
    state.inner = None;
    Ok(())
}

fn operation_number(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.operation_number = value(line);
    Ok(())
}

fn keyword(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.keywords.keyword = value(line);
    Ok(())
}

fn emergency_keyword(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.keywords.emergency_keyword = value(line);
    Ok(())
}

fn picture(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.picture = value(line);
    Ok(())
}

fn messenger(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.messenger = value(line);
    Ok(())
}

/// One line only.
fn priority(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.priority = value(line);
    stop(state, line)
}

fn city(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.einsatzort.city = value(line);
    Ok(())
}

fn district(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    let text = value(line);
    let city = &mut state.operation.einsatzort.city;
    city.push_str(" - ");
    city.push_str(&text);
    Ok(())
}

fn street(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    let appendix = apply_street(&mut state.operation.einsatzort, &value(line));
    state.operation.set_custom_data("Einsatzort Zusatz", appendix);
    Ok(())
}

fn intersection(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.einsatzort.intersection = value(line);
    Ok(())
}

fn nrn(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.set_custom_data("NRN", value(line));
    Ok(())
}

fn adac(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.set_custom_data("ADAC", value(line));
    Ok(())
}

fn comment(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.comment = value(line);
    Ok(())
}

fn property(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    extend_property(state, &value(line));
    Ok(())
}

fn alarm_system(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    extend_property(state, &format!(" BMA: {}", value(line)));
    Ok(())
}

/// One line only.
fn particulars(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    extend_property(state, &format!(" Besonderheiten: {}", value(line)));
    stop(state, line)
}

/// "FL KLE 1/44-1 14:33:10". Lines without an alarm time are skipped.
fn unit(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    if let Some(time) = CLOCK_HMS.find(line.raw) {
        let name = line.raw.replace(time.as_str(), "");
        let resource = OperationResource::new(name.trim()).with_timestamp(time.as_str());
        state.operation.resources.push(resource);
    }
    Ok(())
}

fn printed(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    if let Some(timestamp) = read_german_long_date(line.raw) {
        state.operation.timestamp = timestamp;
    }
    Ok(())
}
