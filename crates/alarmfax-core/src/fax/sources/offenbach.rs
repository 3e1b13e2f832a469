//! Leitfunkstelle Offenbach.

use crate::error::FieldResult;
use crate::fax::engine::{FieldRule, Layout, Line, ParseState};
use crate::fax::rules::patterns::{CALL_SIGN, WKT_POINT};
use crate::fax::rules::ColonPolicy;
use crate::fax::setters::{self, parse_number};
use crate::models::OperationResource;

const KEYWORDS: &[&str] = &[
    "Einsatznummer",
    "Objekt",
    "Ort:",
    "Ortsteil",
    "Straße",
    "Koordinaten",
    "Bemerkung",
    "Meldebild",
    "Einsatzanlass",
    "Zielort",
    "Zeiten",
    "EM",
];

const FIELDS: &[FieldRule] = &[
    FieldRule::anywhere("EINSATZNUMMER", setters::operation_number),
    FieldRule::anywhere("OBJEKT", setters::einsatzort_property),
    FieldRule::anywhere("ORT:", city),
    FieldRule::anywhere("STRAßE", setters::einsatzort_street),
    FieldRule::anywhere("KOORDINATEN", position),
    FieldRule::anywhere("BEMERKUNG", setters::comment),
    FieldRule::anywhere("MELDEBILD", setters::picture),
    FieldRule::anywhere("EINSATZANLASS", setters::emergency_keyword),
    FieldRule::anywhere("EM", unit),
];

pub static LAYOUT: Layout = Layout::new("LFSOffenbachParser")
    .keywords(KEYWORDS)
    .fields(FIELDS)
    .colon(ColonPolicy::KeywordOnly);

fn city(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.einsatzort.city = line.message.to_string();
    Ok(())
}

/// "POINT (50.1009 8.7665)", latitude first. Other notations are skipped.
fn position(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    if let Some(caps) = WKT_POINT.captures(line.message) {
        state.operation.einsatzort.geo_latitude = Some(parse_number(&caps[1])?);
        state.operation.einsatzort.geo_longitude = Some(parse_number(&caps[2])?);
    }
    Ok(())
}

/// "EM FL OF 2-44-1 alarmiert": only the call sign is kept.
fn unit(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    if let Some(call_sign) = CALL_SIGN.find(line.raw) {
        state.operation.resources.push(OperationResource::new(call_sign.as_str()));
    }
    Ok(())
}
