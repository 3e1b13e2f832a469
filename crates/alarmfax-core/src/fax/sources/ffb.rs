//! ILS Fürstenfeldbruck.
//!
//! Like FEZ München Land, a keyword line opens a field and lines without a
//! keyword continue it. Street and section are collected over all lines and
//! split once the fax is read.

use crate::error::{FieldError, FieldResult};
use crate::fax::engine::{Fallback, FieldRule, Layout, Line, MarkerMatch, ParseState, Section, SectionMarker};
use crate::fax::rules::{
    append_line, get_message_text, get_text_between, read_fax_timestamp, truncate_at_spaced_dash,
    ColonPolicy, Comparison,
};
use crate::fax::setters::{apply_street, ignore, parse_number, split_unit_equipment};
use crate::geo::gauss_krueger_to_wgs84;
use crate::models::OperationResource;

const STREET: &str = "street";
const STREET_SECTION: &str = "section";

const KEYWORDS: &[&str] = &[
    "ALARM",
    "E-Nr",
    "EINSATZORT",
    "STRAßE",
    "KOORDINATEN",
    "ABSCHNITT",
    "ORTSTEIL / ORT",
    "ORTSTEIL/ORT",
    "OBJEKT",
    "EINSATZPLAN",
    "MELDEBILD",
    "EINSATZSTICHWORT",
    "HINWEIS",
    "EINSATZMITTEL",
    "",
];

const MARKERS: &[SectionMarker] = &[SectionMarker::new(&["(ALARMSCHREIBEN ENDE)"], Section::Footer)
    .matching(MarkerMatch::StartsWithIgnoreCase)
    .free()];

const FIELDS: &[FieldRule] = &[
    FieldRule::new(Section::Daten, "ALARM", ignore),
    FieldRule::new(Section::Daten, "E-NR", number_and_alarm).continued_by(number_and_alarm),
    FieldRule::new(Section::Daten, "EINSATZORT", location).continued_by(location),
    FieldRule::new(Section::Daten, "STRAßE", street).continued_by(street),
    FieldRule::new(Section::Daten, "ABSCHNITT", street_section).continued_by(street_section),
    FieldRule::new(Section::Daten, "KOORDINATEN", coordinates).continued_by(coordinates),
    FieldRule::new(Section::Daten, "ORTSTEIL / ORT", city).continued_by(city),
    FieldRule::new(Section::Daten, "ORTSTEIL/ORT", city).continued_by(city),
    FieldRule::new(Section::Daten, "OBJEKT", property).continued_by(property),
    FieldRule::new(Section::Daten, "EINSATZPLAN", plan).continued_by(plan),
    FieldRule::new(Section::Daten, "MELDEBILD", picture).continued_by(picture),
    FieldRule::new(Section::Daten, "EINSATZSTICHWORT", emergency_keyword).continued_by(emergency_keyword),
    FieldRule::new(Section::Daten, "HINWEIS", comment).continued_by(comment),
    FieldRule::new(Section::Daten, "EINSATZMITTEL", resource).continued_by(resource),
];

const FALLBACKS: &[(Section, Fallback)] = &[(Section::Daten, Fallback::Inner)];

pub static LAYOUT: Layout = Layout::new("ILSFFBParser")
    .keywords(KEYWORDS)
    .markers(MARKERS)
    .fields(FIELDS)
    .fallbacks(FALLBACKS)
    .start(Section::Daten, true)
    .colon(ColonPolicy::KeywordOnly)
    .finish(split_street);

fn value(line: &Line<'_>) -> String {
    get_message_text(line.raw, line.keyword)
}

/// "E-Nr: 1.2 200305 77 ALARM: 05.03.2020 14:32"
fn number_and_alarm(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    let number = get_text_between(line.raw, None, Some("ALARM"), Comparison::IgnoreCase)?;
    let alarm = get_text_between(line.raw, Some("ALARM"), None, Comparison::IgnoreCase)?;
    state.operation.operation_number = get_message_text(&number, line.keyword);
    state.operation.timestamp = read_fax_timestamp(&alarm, state.received);
    Ok(())
}

/// The location heading names where the units gather.
fn location(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.zielort.location = value(line);
    Ok(())
}

fn street(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    let text = value(line);
    state.buffer_mut(STREET).push_str(&text);
    Ok(())
}

fn street_section(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    let text = value(line);
    state.buffer_mut(STREET_SECTION).push_str(&text);
    Ok(())
}

/// "4430000.5/5340000.25". Empty lines are skipped.
fn coordinates(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    let text = value(line);
    if text.trim().is_empty() {
        return Ok(());
    }

    let (east, north) = text
        .split_once('/')
        .ok_or_else(|| FieldError::MissingValue(format!("northing in '{}'", text)))?;
    let position = gauss_krueger_to_wgs84(parse_number(east)?, parse_number(north)?)?;
    state.operation.einsatzort.geo_latitude = Some(position.latitude);
    state.operation.einsatzort.geo_longitude = Some(position.longitude);
    Ok(())
}

fn city(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.einsatzort.city = truncate_at_spaced_dash(&value(line)).to_string();
    Ok(())
}

fn property(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    let text = value(line);
    state.operation.einsatzort.property.push_str(&text);
    Ok(())
}

fn plan(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.operation_plan = value(line);
    Ok(())
}

fn picture(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    append_line(&mut state.operation.picture, &value(line));
    Ok(())
}

fn emergency_keyword(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.keywords.emergency_keyword = value(line);
    Ok(())
}

fn comment(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    append_line(&mut state.operation.comment, &value(line));
    Ok(())
}

/// Only units with requested equipment are listed.
fn resource(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    if let Some((unit, equipment)) = split_unit_equipment(line.raw) {
        let resource = OperationResource::new(unit).with_equipment(equipment);
        state.operation.resources.push(resource);
    }
    Ok(())
}

/// The operation number prefix "1.2" tends to bleed into the street column.
fn split_street(state: &mut ParseState) {
    if let Some(street) = state.take_buffer(STREET) {
        let appendix = apply_street(&mut state.operation.einsatzort, &street.replace("1.2", ""));
        state.operation.set_custom_data("Einsatzort Zusatz", appendix);
    }
    if let Some(section) = state.take_buffer(STREET_SECTION) {
        state.operation.einsatzort.intersection = section;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fax::sources::test_support::{at, parse};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_full_fax() {
        let result = parse(
            &LAYOUT,
            &[
                "Integrierte Leitstelle Fürstenfeldbruck",
                "E-Nr: 1.2 200305 77 ALARM: 05.03.2020 14:32",
                "EINSATZORT: Feuerwehrhaus",
                "STRAßE: Hauptstraße",
                "12 1.2",
                "ABSCHNITT: Ecke ",
                "Bahnhofstraße",
                "ORTSTEIL / ORT: Fürstenfeldbruck - Fürstenfeldbruck",
                "OBJEKT: Rathaus",
                "EINSATZPLAN: EP 3",
                "MELDEBILD: Rauch",
                "aus Keller",
                "EINSATZSTICHWORT: B 3",
                "HINWEIS: Hydrant vor Gebäude",
                "KOORDINATEN: 4430000.5/5340000.25",
                "EINSATZMITTEL:",
                "FL FFB 40/1 (DLK)",
                "FL FFB 11/1",
                "(ALARMSCHREIBEN ENDE)",
                "FL FFB 99/1 (Boot)",
            ],
        );
        let op = &result.operation;

        assert_eq!(op.operation_number, "1.2 200305 77");
        assert_eq!(op.timestamp, at(2020, 3, 5, 14, 32));
        assert_eq!(op.zielort.location, "Feuerwehrhaus");
        assert_eq!(op.einsatzort.street, "Hauptstraße");
        assert_eq!(op.einsatzort.street_number, "12");
        assert_eq!(op.einsatzort.intersection, "EckeBahnhofstraße");
        assert_eq!(op.einsatzort.city, "Fürstenfeldbruck");
        assert_eq!(op.einsatzort.property, "Rathaus");
        assert_eq!(op.operation_plan, "EP 3");
        assert_eq!(op.picture, "Rauch\naus Keller");
        assert_eq!(op.keywords.emergency_keyword, "B 3");
        assert_eq!(op.comment, "Hydrant vor Gebäude");
        assert!(op.einsatzort.has_geo_coordinates());

        assert_eq!(op.resources.len(), 1);
        assert_eq!(op.resources[0].full_name, "FL FFB 40/1");
        assert_eq!(op.resources[0].requested_equipment, vec!["DLK"]);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_number_line_without_alarm_is_reported() {
        let result = parse(&LAYOUT, &["E-Nr: 1.2 200305 77", "STRAßE: Hauptstraße 12"]);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].line, 0);
        assert_eq!(result.operation.einsatzort.street_number, "12");
    }

    #[test]
    fn test_no_street_keeps_location_empty() {
        let result = parse(&LAYOUT, &["OBJEKT: Rathaus"]);
        assert_eq!(result.operation.einsatzort.street, "");
        assert_eq!(result.operation.einsatzort.street_number, "");
    }
}
