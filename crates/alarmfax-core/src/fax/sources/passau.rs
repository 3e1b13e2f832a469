//! ILS Passau.

use crate::error::FieldResult;
use crate::fax::engine::{Fallback, FieldRule, Layout, Line, ParseState, Section, SectionMarker};
use crate::fax::rules::{get_text_between, read_fax_timestamp, Comparison};
use crate::fax::setters;

const KEYWORDS: &[&str] = &[
    "",
    "KOORDINATE",
    "EINSATZNUMMER",
    "ABSENDER",
    "NAME",
    "STRAßE",
    "ORT",
    "OBJEKT",
    "KREUZUNG",
    "STICHWORT B",
    "STICHWORT SO",
    "PRIO.",
    "SCHLAGW",
    "EINSATZMITTELNAME",
];

const MARKERS: &[SectionMarker] = &[
    SectionMarker::new(&["MITTEILER"], Section::Mitteiler),
    SectionMarker::new(&["EINSATZORT"], Section::Einsatzort),
    SectionMarker::new(&["EINSATZGRUND"], Section::Einsatzgrund),
    SectionMarker::new(&["EINSATZMITTEL"], Section::Einsatzmittel),
    SectionMarker::new(&["BEMERKUNG"], Section::Bemerkung).free(),
    SectionMarker::new(&["ENDE FAX"], Section::Footer).free(),
];

const FIELDS: &[FieldRule] = &[
    FieldRule::new(Section::Header, "EINSATZNUMMER", number_and_alarm_time),
    FieldRule::new(Section::Mitteiler, "NAME", setters::messenger),
    FieldRule::new(Section::Einsatzort, "STRAßE", setters::einsatzort_street)
        .continued_by(setters::append_einsatzort_street),
    FieldRule::new(Section::Einsatzort, "ABSCHNITT", setters::ignore),
    FieldRule::new(Section::Einsatzort, "ORT", setters::einsatzort_city)
        .continued_by(setters::append_einsatzort_city),
    FieldRule::new(Section::Einsatzort, "OBJEKT", setters::einsatzort_property)
        .continued_by(setters::append_einsatzort_property),
    FieldRule::new(Section::Einsatzort, "KREUZUNG", setters::einsatzort_intersection),
    FieldRule::new(Section::Einsatzort, "STATION", station),
    FieldRule::new(Section::Einsatzort, "KOORDINATE", setters::einsatzort_grid_coordinates),
    FieldRule::new(Section::Einsatzgrund, "SCHLAGW.", setters::keyword),
    FieldRule::new(Section::Einsatzgrund, "STICHWORT B", fire_and_rescue_keywords),
    FieldRule::new(Section::Einsatzgrund, "STICHWORT SO", other_keywords),
    FieldRule::new(Section::Einsatzgrund, "PRIO.", setters::priority),
    FieldRule::new(Section::Einsatzmittel, "EINSATZMITTELNAME", setters::resource_name),
    FieldRule::new(Section::Einsatzmittel, "GEF. GERÄTE", setters::resource_equipment_last),
];

const FALLBACKS: &[(Section, Fallback)] = &[
    (Section::Einsatzort, Fallback::Inner),
    (Section::Bemerkung, Fallback::Apply(setters::comment_line)),
];

pub static LAYOUT: Layout = Layout::new("ILSPassauParser")
    .keywords(KEYWORDS)
    .markers(MARKERS)
    .fields(FIELDS)
    .fallbacks(FALLBACKS)
    .before_line(setters::fax_timestamp)
    .carry_continuation(setters::append_einsatzort_street);

const RESCUE: &str = "STICHWORT RD:";
const TECHNICAL: &str = "STICHWORT TH:";
const INFORMATION: &str = "STICHWORT IN:";

fn between(msg: &str, from: Option<&str>, until: Option<&str>) -> FieldResult<String> {
    get_text_between(msg, from, until, Comparison::IgnoreCase)
}

/// "4711 Alarmzeit: 05.03.2020 14:32"
fn number_and_alarm_time(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.operation_number = between(line.message, None, Some("ALARMZEIT"))?;
    let alarm_time = between(line.message, Some("ALARMZEIT"), None)?;
    state.operation.timestamp = read_fax_timestamp(&alarm_time, state.received);
    Ok(())
}

fn station(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.set_custom_data("Einsatzort Station", line.message);
    Ok(())
}

/// "B 3 Stichwort RD: RD 1"
fn fire_and_rescue_keywords(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    let keywords = &mut state.operation.keywords;
    keywords.b = between(line.message, None, Some(RESCUE))?;
    keywords.r = between(line.message, Some(RESCUE), None)?;
    Ok(())
}

/// "S 1 Stichwort TH: THL 2 Stichwort IN: Info"
fn other_keywords(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    let special = between(line.message, None, Some(TECHNICAL))?;
    let technical = between(line.message, Some(TECHNICAL), Some(INFORMATION))?;
    let information = between(line.message, Some(INFORMATION), None)?;

    state.operation.keywords.s = special;
    state.operation.keywords.t = technical;
    state.operation.set_custom_data("Stichwort IN", information);
    Ok(())
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
                "Absender: ILS Passau",
                "Einsatznummer: 4711 Alarmzeit: 05.03.2020 14:32",
                "MITTEILER",
                "Name: Anrufer",
                "EINSATZORT",
                "Straße: Domplatz 1",
                "Abschnitt: Innstadt",
                "Ort: 94032 Passau - Altstadt",
                "Objekt: Dom St.",
                "Stephan",
                "Kreuzung: Residenzplatz",
                "Station: Nord",
                "EINSATZGRUND",
                "Schlagw.: #B2116#Brand#",
                "Stichwort B: B 4 Stichwort RD: RD 2",
                "Stichwort SO: Stichwort TH: THL 1 Stichwort IN: Lage unklar",
                "Prio.: 1",
                "EINSATZMITTEL",
                "Einsatzmittelname: FL PA 40/1",
                "Gef. Geräte: DLK",
                "BEMERKUNG",
                "Glocken läuten",
                "ENDE FAX",
            ],
        );
        let op = &result.operation;

        assert_eq!(op.operation_number, "4711");
        assert_eq!(op.timestamp, at(2020, 3, 5, 14, 32));
        assert_eq!(op.messenger, "Anrufer");
        assert_eq!(op.einsatzort.street, "Domplatz");
        assert_eq!(op.einsatzort.street_number, "1");
        assert_eq!(op.einsatzort.zip_code, "94032");
        assert_eq!(op.einsatzort.city, "Passau");
        assert_eq!(op.einsatzort.property, "Dom St.Stephan");
        assert_eq!(op.einsatzort.intersection, "Residenzplatz");
        assert_eq!(op.custom_data("Einsatzort Station"), Some("Nord"));
        assert_eq!(op.keywords.keyword, "#B2116#Brand#");
        assert_eq!(op.keywords.b, "B 4");
        assert_eq!(op.keywords.r, "RD 2");
        assert_eq!(op.keywords.s, "");
        assert_eq!(op.keywords.t, "THL 1");
        assert_eq!(op.custom_data("Stichwort IN"), Some("Lage unklar"));
        assert_eq!(op.priority, "1");
        assert_eq!(op.resources.len(), 1);
        assert_eq!(op.resources[0].requested_equipment, vec!["DLK"]);
        assert_eq!(op.comment, "Glocken läuten");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_abschnitt_does_not_continue_street() {
        let result = parse(
            &LAYOUT,
            &["EINSATZORT", "Straße: Domplatz 1", "Abschnitt: Innstadt", "Ring"],
        );
        assert_eq!(result.operation.einsatzort.street, "DomplatzRing");
    }

    #[test]
    fn test_continuation_survives_repeated_marker() {
        let result = parse(
            &LAYOUT,
            &["EINSATZORT", "Objekt: Dom St.", "EINSATZORT", "Stephan"],
        );
        assert_eq!(result.operation.einsatzort.property, "Dom St.Stephan");
    }
}
