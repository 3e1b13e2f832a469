//! ILS Bayreuth.

use crate::error::FieldResult;
use crate::fax::engine::{Fallback, FieldRule, Layout, Line, ParseState, Section, SectionMarker};
use crate::fax::rules::{get_message_text, get_text_between, read_fax_timestamp, Comparison};
use crate::fax::setters::{self, custom_data_setters, parse_number};

const ALARM_TIME: &str = "Alarmzeit:";
const OBJECT_NUMBER: &str = "Objektnummer";

const KEYWORDS: &[&str] = &[
    "Absender",
    "Einsatznummer",
    "Name",
    "Telefon",
    "Straße",
    "Einsatzort Position X",
    "Einsatzort Position Y",
    "Abschnitt",
    "Ort",
    "Objekt",
    "Kreuzung",
    "Station",
    "Schlagwort.",
    "Stichwort",
    "- Brand",
    "- Rettungsdienst",
    "- Sonstiges",
    "- THL",
    "- Info",
    "Einsatzmittelname",
    "gef. Geräte",
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
    FieldRule::new(Section::Header, "ABSENDER", sender),
    FieldRule::new(Section::Header, "EINSATZNUMMER", number_and_alarm_time),
    FieldRule::new(Section::Mitteiler, "NAME", setters::messenger),
    FieldRule::new(Section::Mitteiler, "TELEFON", phone),
    FieldRule::new(Section::Einsatzort, "STRAßE", setters::einsatzort_street),
    FieldRule::new(Section::Einsatzort, "ABSCHNITT", street_section),
    FieldRule::new(Section::Einsatzort, "ORT", setters::einsatzort_city),
    FieldRule::new(Section::Einsatzort, "OBJEKT", setters::einsatzort_property),
    FieldRule::new(Section::Einsatzort, "KREUZUNG", setters::einsatzort_intersection),
    FieldRule::new(Section::Einsatzort, "STATION", station_and_plan),
    FieldRule::new(Section::Einsatzort, "EINSATZORT POSITION X", easting),
    FieldRule::new(Section::Einsatzort, "EINSATZORT POSITION Y", northing),
    FieldRule::new(Section::Einsatzgrund, "SCHLAGWORT.", setters::keyword),
    FieldRule::new(Section::Einsatzgrund, "- BRAND", setters::keyword_b),
    FieldRule::new(Section::Einsatzgrund, "- RETTUNGSDIENST", setters::keyword_r),
    FieldRule::new(Section::Einsatzgrund, "- SONSTIGES", setters::keyword_s),
    FieldRule::new(Section::Einsatzgrund, "- THL", setters::keyword_t),
    FieldRule::new(Section::Einsatzgrund, "- INFO", info_keyword),
    FieldRule::new(Section::Einsatzmittel, "EINSATZMITTELNAME", setters::resource_name),
    FieldRule::new(Section::Einsatzmittel, "GEF. GERÄTE", setters::resource_equipment_last),
];

const FALLBACKS: &[(Section, Fallback)] = &[(Section::Bemerkung, Fallback::Apply(setters::comment_line))];

pub static LAYOUT: Layout = Layout::new("IlsBayreuthParser")
    .keywords(KEYWORDS)
    .markers(MARKERS)
    .fields(FIELDS)
    .fallbacks(FALLBACKS);

custom_data_setters! {
    sender => "Absender",
    street_section => "Einsatzort Abschnitt",
    info_keyword => "Stichwort I",
}

/// "4711 Alarmzeit: 05.03.2020 14:32"
fn number_and_alarm_time(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    let number = get_text_between(line.message, None, Some(ALARM_TIME), Comparison::IgnoreCase)?;
    let alarm_time = get_text_between(line.message, Some(ALARM_TIME), None, Comparison::IgnoreCase)?;
    state.operation.operation_number = number;
    state.operation.timestamp = read_fax_timestamp(&alarm_time, state.received);
    Ok(())
}

fn phone(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    let messenger = &mut state.operation.messenger;
    *messenger = format!("{} Telefon: {}", messenger, line.message);
    Ok(())
}

/// "FW Bayreuth Objektnummer: 0815": the object number is the operation plan.
fn station_and_plan(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    let station = get_text_between(line.message, None, Some(OBJECT_NUMBER), Comparison::IgnoreCase)?;
    let plan = get_text_between(line.message, Some(OBJECT_NUMBER), None, Comparison::IgnoreCase)?;
    state.operation.set_custom_data("Einsatzort Station", station);
    state.operation.operation_plan = get_message_text(&plan, None);
    Ok(())
}

fn easting(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.geo.east = Some(parse_number(line.message)?);
    Ok(())
}

fn northing(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.geo.north = Some(parse_number(line.message)?);
    if let Some(position) = state.geo.resolve()? {
        let location = &mut state.operation.einsatzort;
        location.geo_latitude = Some(position.latitude);
        location.geo_longitude = Some(position.longitude);
    }
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
                "Absender: ILS Bayreuth/Kulmbach",
                "Einsatznummer: 5.2 200305 88 Alarmzeit: 05.03.2020 14:32",
                "MITTEILER",
                "Name: Hofmann",
                "Telefon: 0921 555",
                "EINSATZORT",
                "Straße: Opernstraße 22",
                "Abschnitt: Nord",
                "Ort: 95444 Bayreuth - Bayreuth",
                "Objekt: Markgräfliches Opernhaus",
                "Station: FW Bayreuth Objektnummer: 0815",
                "Einsatzort Position X: 4476543.21",
                "Einsatzort Position Y: 5534567.89",
                "EINSATZGRUND",
                "Schlagwort.: #B1110#Brand#",
                "- Brand: B 5",
                "- Info: Kulturgut",
                "EINSATZMITTEL",
                "Einsatzmittelname: FL BT 10/1",
                "gef. Geräte: Drehleiter",
                "BEMERKUNG",
                "Publikumsverkehr",
                "ENDE FAX",
            ],
        );
        let op = &result.operation;

        assert_eq!(op.custom_data("Absender"), Some("ILS Bayreuth/Kulmbach"));
        assert_eq!(op.operation_number, "5.2 200305 88");
        assert_eq!(op.timestamp, at(2020, 3, 5, 14, 32));
        assert_eq!(op.messenger, "Hofmann Telefon: 0921 555");
        assert_eq!(op.einsatzort.street, "Opernstraße");
        assert_eq!(op.einsatzort.street_number, "22");
        assert_eq!(op.custom_data("Einsatzort Abschnitt"), Some("Nord"));
        assert_eq!(op.einsatzort.city, "Bayreuth");
        assert_eq!(op.custom_data("Einsatzort Station"), Some("FW Bayreuth"));
        assert_eq!(op.operation_plan, "0815");
        assert!(op.einsatzort.has_geo_coordinates());
        assert_eq!(op.keywords.keyword, "#B1110#Brand#");
        assert_eq!(op.keywords.b, "B 5");
        assert_eq!(op.custom_data("Stichwort I"), Some("Kulturgut"));
        assert_eq!(op.resources.len(), 1);
        assert_eq!(op.resources[0].requested_equipment, vec!["Drehleiter"]);
        assert_eq!(op.comment, "Publikumsverkehr");
        assert!(result.warnings.is_empty());
    }
}
