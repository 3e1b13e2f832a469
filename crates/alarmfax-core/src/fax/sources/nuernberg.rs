//! ILS Nürnberg.

use crate::error::FieldResult;
use crate::fax::engine::{Fallback, FieldRule, Layout, Line, ParseState, Section, SectionMarker};
use crate::fax::rules::read_fax_timestamp;
use crate::fax::setters::{self, custom_data_setters, split_at_label};
use crate::models::OperationResource;

const KEYWORDS: &[&str] = &[
    "ABSENDER",
    "FAX",
    "TERMIN",
    "EINSATZNUMMER",
    "NAME",
    "STRAßE",
    "KOORDINATE",
    "ORT",
    "OBJEKT",
    "ABSCHNITT",
    "ZUSTÄNDIGE ILS",
    "ABTEILUNG",
    "KREUZUNG",
    "STATION",
    "SCHLAGWORT",
    "PRIO",
];

const MARKERS: &[SectionMarker] = &[
    SectionMarker::new(&["MITTEILER"], Section::Mitteiler),
    SectionMarker::new(&["EINSATZORT"], Section::Einsatzort),
    SectionMarker::new(&["ZIELORT"], Section::Zielort),
    SectionMarker::new(&["EINSATZGRUND"], Section::Einsatzgrund),
    SectionMarker::new(&["EINSATZMITTEL"], Section::Einsatzmittel).free(),
    SectionMarker::new(&["OBJEKTINFO"], Section::Objektinfo).free(),
    SectionMarker::new(&["BEMERKUNG"], Section::Bemerkung).free(),
    SectionMarker::new(&["ENDE ALARMFAX"], Section::Footer).free(),
];

const FIELDS: &[FieldRule] = &[
    FieldRule::new(Section::Header, "ABSENDER", sender),
    FieldRule::new(Section::Header, "TERMIN", appointment),
    FieldRule::new(Section::Header, "EINSATZNUMMER", setters::operation_number),
    FieldRule::new(Section::Mitteiler, "NAME", setters::messenger),
    FieldRule::new(Section::Einsatzort, "STRAßE", setters::einsatzort_street),
    FieldRule::new(Section::Einsatzort, "ORT", setters::einsatzort_city),
    FieldRule::new(Section::Einsatzort, "ABSCHNITT", append_intersection),
    FieldRule::new(Section::Einsatzort, "KREUZUNG", append_intersection),
    FieldRule::new(Section::Einsatzort, "OBJEKT", setters::einsatzort_property),
    FieldRule::new(Section::Einsatzort, "STATION", einsatzort_station),
    FieldRule::new(Section::Einsatzort, "KOORDINATE", setters::einsatzort_grid_coordinates),
    FieldRule::new(Section::Zielort, "STRAßE", setters::zielort_street),
    FieldRule::new(Section::Zielort, "ORT", setters::zielort_city),
    FieldRule::new(Section::Zielort, "OBJEKT", setters::zielort_property),
    FieldRule::new(Section::Zielort, "STATION", zielort_station),
    FieldRule::new(Section::Einsatzgrund, "SCHLAGWORT", keywords),
    FieldRule::new(Section::Einsatzgrund, "PRIO.", setters::priority),
];

const FALLBACKS: &[(Section, Fallback)] = &[
    (Section::Einsatzmittel, Fallback::Apply(resource)),
    (Section::Objektinfo, Fallback::Apply(object_info)),
    (Section::Bemerkung, Fallback::Apply(setters::comment_line)),
];

pub static LAYOUT: Layout = Layout::new("ILSNuernbergParser")
    .keywords(KEYWORDS)
    .markers(MARKERS)
    .fields(FIELDS)
    .fallbacks(FALLBACKS)
    .before_line(setters::fax_timestamp);

custom_data_setters! {
    appointment => "Termin",
    einsatzort_station => "Einsatzort Station",
    zielort_station => "Zielort Station",
    object_info += "Objektinfo",
}

/// "ILS Nürnberg Alarmzeit: 05.03.2020 14:32:10"
fn sender(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    let (sender, alarm_time) = split_at_label(line.message, "ALARMZEIT")?;
    state.operation.set_custom_data("Absender", sender);
    state.operation.timestamp = read_fax_timestamp(&alarm_time, state.operation.timestamp);
    Ok(())
}

fn append_intersection(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.einsatzort.intersection.push_str(line.message);
    Ok(())
}

/// "Schlagwort: #B1710#Brand# Stichwort: B 3"
fn keywords(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    let (keyword, emergency) = split_at_label(line.message, "STICHWORT")?;
    state.operation.keywords.keyword = keyword;
    state.operation.keywords.emergency_keyword = emergency;
    Ok(())
}

/// The header row "Name : Alarmiert : Aus" is skipped.
fn resource(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    if line.raw.to_uppercase().starts_with("NAME") {
        return Ok(());
    }
    let name = line.message.replace(':', " ");
    state.operation.resources.push(OperationResource::new(name.trim()));
    Ok(())
}
