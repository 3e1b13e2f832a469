//! ILS Fürstenfeldbruck, printout for FF Germering.
//!
//! Every "LABEL: value" line is a field. The Germering units are recognized
//! by fragments of their call sign and stored under short names together
//! with the equipment given in parentheses.

use crate::error::FieldResult;
use crate::fax::engine::{FieldRule, Layout, Line, ParseState};
use crate::fax::rules::ColonPolicy;
use crate::fax::setters::{
    self, ascii_text_fields, split_unit_equipment, stamp_fax_received, text_after,
};

const OPERATION_NUMBER_LABEL: &str = "E - Nr";

const BRIGADE: &str = "FF Germering";

/// Call sign fragment and the short name the unit is stored under.
const UNITS: &[(&str, &str)] = &[
    ("mering 40/1", "40/1"),
    ("mering 40/2", "40/2"),
    ("ring 30/1", "30/1"),
    ("mering 61/1", "61/1"),
    ("mering 81/1", "81/1"),
    ("mering 11/1", "11/1"),
    ("ering A-ÖSA", "ÖSA"),
    ("ring A-P 250", "P-250"),
    ("enhofen A-VSA", "VSA-Upf"),
    ("mering A-VSA", "81/1 + VSA"),
];

const KEYWORDS: &[&str] = &[""];

const FIELDS: &[FieldRule] = &[
    FieldRule::anywhere("MITTEILER", setters::messenger),
    FieldRule::anywhere("EINSATZORT", setters::einsatzort_location),
    FieldRule::anywhere("STRASSE", street),
    FieldRule::anywhere("STRABE", street),
    FieldRule::anywhere("ORTSTEIL/ORT", city),
    FieldRule::anywhere("OBJEKT", setters::einsatzort_property),
    FieldRule::anywhere("9BJEKT", setters::einsatzort_property),
    FieldRule::anywhere("MELDEBILD", setters::picture),
    FieldRule::anywhere("HINWEIS", setters::comment),
    FieldRule::anywhere("EINSATZPLAN", setters::operation_plan),
    FieldRule::anywhere("EINSATZSTICHWORT", setters::emergency_keyword),
];

pub static LAYOUT: Layout = Layout::new("ILSFFBGermeringParser")
    .keywords(KEYWORDS)
    .fields(FIELDS)
    .colon(ColonPolicy::FirstColon)
    .before_line(scan_line)
    .finish(ascii_text_fields);

fn scan_line(state: &mut ParseState, raw: &str) -> FieldResult {
    stamp_fax_received(state);

    if raw.starts_with(OPERATION_NUMBER_LABEL) {
        if let Some(number) = text_after(raw, OPERATION_NUMBER_LABEL) {
            state.operation.operation_number = number;
        }
    }

    if raw.contains(BRIGADE) {
        state.operation.resources.add_resource(BRIGADE);
    }
    for (fragment, unit) in UNITS {
        if raw.contains(fragment) {
            add_unit(state, raw, unit);
        }
    }
    Ok(())
}

/// "FL Germering 40/1 (DLK 23/12)": the equipment is optional.
fn add_unit(state: &mut ParseState, raw: &str, unit: &str) {
    let resources = &mut state.operation.resources;
    match split_unit_equipment(raw) {
        Some((_, equipment)) if !equipment.is_empty() => {
            resources.add_equipment(unit, equipment);
        }
        _ => {
            resources.add_resource(unit);
        }
    }
}

fn street(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.einsatzort.street = line.message.to_string();
    Ok(())
}

fn city(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.einsatzort.city = line.message.to_string();
    Ok(())
}
