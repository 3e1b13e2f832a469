//! Leitstelle Mansfeld-Südharz.
//!
//! Most keywords open a field that runs until the next keyword; "Wer",
//! "Was" and "Wo" only cover their own line.

use crate::error::FieldResult;
use crate::fax::engine::{Fallback, FieldRule, Layout, Line, ParseState, Section};
use crate::fax::rules::patterns::ANGLE_BRACKETED;
use crate::fax::rules::{get_text_between, read_fax_timestamp, ColonPolicy, Comparison};
use crate::fax::setters::apply_street;
use crate::models::OperationResource;

const KEYWORDS: &[&str] = &[
    "Einsatzdepeche",
    "AAO",
    "Einsatzort",
    "Strasse",
    "Ort",
    "Objekt",
    "Wer",
    "Was",
    "Wo",
    "Einsatzplan",
    "Hinweistext",
    "Einheiten",
    "",
];

const FIELDS: &[FieldRule] = &[
    FieldRule::new(Section::Daten, "EINSATZDEPECHE", dispatch).continued_by(dispatch),
    FieldRule::new(Section::Daten, "AAO", keyword).continued_by(keyword),
    FieldRule::new(Section::Daten, "EINSATZORT", location).continued_by(location),
    FieldRule::new(Section::Daten, "STRASSE", street).continued_by(street),
    FieldRule::new(Section::Daten, "ORT", city).continued_by(city),
    FieldRule::new(Section::Daten, "OBJEKT", property).continued_by(property),
    FieldRule::new(Section::Daten, "WER", messenger),
    FieldRule::new(Section::Daten, "WAS", emergency_keyword),
    FieldRule::new(Section::Daten, "WO", picture),
    FieldRule::new(Section::Daten, "EINSATZPLAN", plan).continued_by(plan),
    FieldRule::new(Section::Daten, "HINWEISTEXT", comment).continued_by(comment),
    FieldRule::new(Section::Daten, "EINHEITEN", unit).continued_by(unit),
];

const FALLBACKS: &[(Section, Fallback)] = &[(Section::Daten, Fallback::Inner)];

pub static LAYOUT: Layout = Layout::new("LstMansfeldSuedharz")
    .keywords(KEYWORDS)
    .fields(FIELDS)
    .fallbacks(FALLBACKS)
    .start(Section::Daten, true)
    .colon(ColonPolicy::KeywordOnly);

/// "4711 am: 05.03.2020 um 14:32"
fn dispatch(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    let number = get_text_between(line.message, None, Some("am:"), Comparison::Exact)?;
    let time = get_text_between(line.message, Some("am:"), None, Comparison::Exact)?;
    state.operation.operation_number = number;
    state.operation.timestamp = read_fax_timestamp(&time, state.received);
    Ok(())
}

fn keyword(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.keywords.keyword = line.message.to_string();
    Ok(())
}

fn location(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.einsatzort.location = line.message.to_string();
    Ok(())
}

fn street(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    let appendix = apply_street(&mut state.operation.einsatzort, line.message);
    state.operation.set_custom_data("Einsatzort Zusatz", appendix);
    Ok(())
}

fn city(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.einsatzort.city = line.message.to_string();
    Ok(())
}

fn property(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.einsatzort.property = line.message.to_string();
    Ok(())
}

fn messenger(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.inner = None;
    state.operation.messenger = line.message.to_string();
    Ok(())
}

fn emergency_keyword(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.inner = None;
    state.operation.keywords.emergency_keyword = line.message.to_string();
    Ok(())
}

fn picture(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.inner = None;
    state.operation.picture = line.message.to_string();
    Ok(())
}

fn plan(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.operation_plan = line.message.to_string();
    Ok(())
}

fn comment(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.comment = line.message.to_string();
    Ok(())
}

/// "1 <FL HET 1/44-1>": the unit name stands in angle brackets.
fn unit(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    if let Some(caps) = ANGLE_BRACKETED.captures(line.message) {
        state.operation.resources.push(OperationResource::new(&caps[1]));
    }
    Ok(())
}
