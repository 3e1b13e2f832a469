//! ILS Regensburg.

use crate::error::FieldResult;
use crate::fax::engine::{Fallback, FieldRule, Layout, Line, ParseState, Section, SectionMarker};
use crate::fax::rules::{get_message_text, resource_timestamp};
use crate::fax::rules::patterns::ZIP_CODE;
use crate::fax::setters::{self, custom_data_setters, split_at_label};

const KEYWORDS: &[&str] = &[
    "Einsatznummer",
    "Name",
    "Straße",
    "Abschnitt",
    "Ort",
    "Gemeinde",
    "Kreuzung",
    "Objekt",
    "Schlagw.",
    "Stichwort",
    "Prio.",
    "Alarmiert",
    "gef. Gerät",
];

const MARKERS: &[SectionMarker] = &[
    SectionMarker::new(&["MITTEILER"], Section::Mitteiler),
    SectionMarker::new(&["EINSATZORT"], Section::Einsatzort),
    SectionMarker::new(&["EINSATZGRUND"], Section::Einsatzgrund),
    SectionMarker::new(&["EINSATZMITTEL"], Section::Einsatzmittel),
    SectionMarker::new(&["BEMERKUNG"], Section::Bemerkung).free(),
    SectionMarker::new(&["ENDE ALARMFAX — V2.0"], Section::Footer).free(),
];

const FIELDS: &[FieldRule] = &[
    FieldRule::new(Section::Header, "EINSATZNUMMER", setters::operation_number),
    FieldRule::new(Section::Einsatzort, "STRAßE", setters::einsatzort_street),
    FieldRule::new(Section::Einsatzort, "ORT", city),
    FieldRule::new(Section::Einsatzort, "GEMEINDE", municipality),
    FieldRule::new(Section::Einsatzort, "OBJEKT", property),
    FieldRule::new(Section::Einsatzort, "KREUZUNG", setters::einsatzort_intersection),
    FieldRule::new(Section::Einsatzgrund, "SCHLAGW.", setters::keyword),
    FieldRule::new(Section::Einsatzgrund, "STICHWORT", setters::emergency_keyword),
    FieldRule::new(Section::Einsatzgrund, "PRIO.", setters::priority),
    FieldRule::new(Section::Einsatzmittel, "NAME", setters::resource_name),
    FieldRule::new(Section::Einsatzmittel, "ALARMIERT", alarmed),
    FieldRule::new(Section::Einsatzmittel, "GEF. GERÄT", setters::resource_equipment_last),
];

const FALLBACKS: &[(Section, Fallback)] = &[
    (Section::Mitteiler, Fallback::Apply(messenger)),
    (Section::Bemerkung, Fallback::Apply(setters::comment_line)),
];

pub static LAYOUT: Layout = Layout::new("ILSRegensburgParser")
    .keywords(KEYWORDS)
    .markers(MARKERS)
    .fields(FIELDS)
    .fallbacks(FALLBACKS);

custom_data_setters! {
    municipality => "GEMEINDE",
}

/// Every keyword line of the block names the messenger.
fn messenger(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.messenger = get_message_text(line.raw, line.keyword);
    Ok(())
}

/// The zip code may stand anywhere in the line.
fn city(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    let location = &mut state.operation.einsatzort;
    match ZIP_CODE.find(line.message) {
        Some(zip) => {
            location.zip_code = zip.as_str().to_string();
            location.city = line.message.replace(zip.as_str(), "").trim().to_string();
        }
        None => location.city = line.message.to_string(),
    }
    Ok(())
}

/// "Rathaus EPN: 4711": the plan number follows the property.
fn property(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    if !line.message.contains("EPN:") {
        state.operation.einsatzort.property = line.message.to_string();
        return Ok(());
    }
    let (property, plan) = split_at_label(line.message, "EPN")?;
    state.operation.einsatzort.property = property;
    state.operation.operation_plan = plan;
    Ok(())
}

/// Only the alarm time is stored; the equipment line closes the resource.
fn alarmed(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.resource.timestamp = resource_timestamp(line.message);
    Ok(())
}
