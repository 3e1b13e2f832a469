//! ILS Ansbach.

use crate::error::{FieldError, FieldResult};
use crate::fax::engine::{Fallback, FieldRule, Layout, Line, MarkerMatch, ParseState, Section, SectionMarker};
use crate::fax::rules::resource_timestamp;
use crate::fax::setters::{self, custom_data_setters};

const HOUSE_NUMBER: &str = "Haus-";

const KEYWORDS: &[&str] = &[
    "ABSENDER",
    "FAX",
    "TERMIN",
    "EINSATZNUMMER",
    "NAME",
    "STRAßE",
    "ORT",
    "OBJEKT",
    "PLANNUMMER",
    "STATION",
    "SCHLAGW",
    "STICHWORT",
    "PRIO",
    "EINSATZMITTEL",
    "ALARMIERT",
    "GEFORDERTE AUSSTATTUNG",
];

// Headings stand alone on their line.
const MARKERS: &[SectionMarker] = &[
    SectionMarker::new(&["MITTEILER"], Section::Mitteiler).matching(MarkerMatch::Exact),
    SectionMarker::new(&["EINSATZORT"], Section::Einsatzort).matching(MarkerMatch::Exact),
    SectionMarker::new(&["ZIELORT"], Section::Zielort).matching(MarkerMatch::Exact),
    SectionMarker::new(&["EINSATZGRUND"], Section::Einsatzgrund).matching(MarkerMatch::Exact),
    SectionMarker::new(&["EINSATZMITTEL"], Section::Einsatzmittel).matching(MarkerMatch::Exact),
    SectionMarker::new(&["BEMERKUNG"], Section::Bemerkung)
        .matching(MarkerMatch::Exact)
        .free(),
    SectionMarker::new(&["ENDE FAX"], Section::Footer)
        .matching(MarkerMatch::Exact)
        .free(),
];

const FIELDS: &[FieldRule] = &[
    FieldRule::new(Section::Header, "ABSENDER", sender),
    FieldRule::new(Section::Header, "TERMIN", appointment),
    FieldRule::new(Section::Header, "EINSATZNUMMER", setters::operation_number),
    FieldRule::new(Section::Mitteiler, "NAME", setters::messenger),
    FieldRule::new(Section::Einsatzort, "STRAßE", einsatzort_street),
    FieldRule::new(Section::Einsatzort, "ORT", setters::einsatzort_city_dash),
    FieldRule::new(Section::Einsatzort, "OBJEKT", setters::einsatzort_property),
    FieldRule::new(Section::Einsatzort, "PLANNUMMER", plan_number),
    FieldRule::new(Section::Einsatzort, "STATION", einsatzort_station),
    FieldRule::new(Section::Zielort, "STRAßE", zielort_street),
    FieldRule::new(Section::Zielort, "ORT", setters::zielort_city),
    FieldRule::new(Section::Zielort, "OBJEKT", setters::zielort_property),
    FieldRule::new(Section::Zielort, "STATION", zielort_station),
    FieldRule::new(Section::Einsatzgrund, "SCHLAGW.", setters::keyword),
    FieldRule::new(Section::Einsatzgrund, "STICHWORT B", setters::keyword_b),
    FieldRule::new(Section::Einsatzgrund, "STICHWORT R", setters::keyword_r),
    FieldRule::new(Section::Einsatzgrund, "STICHWORT S", setters::keyword_s),
    FieldRule::new(Section::Einsatzgrund, "STICHWORT T", setters::keyword_t),
    FieldRule::new(Section::Einsatzgrund, "PRIO.", setters::priority),
    FieldRule::new(Section::Einsatzmittel, "EINSATZMITTEL", setters::resource_name),
    FieldRule::new(Section::Einsatzmittel, "ALARMIERT", alarmed),
    FieldRule::new(Section::Einsatzmittel, "GEFORDERTE AUSSTATTUNG", setters::resource_equipment_last),
];

const FALLBACKS: &[(Section, Fallback)] = &[(Section::Bemerkung, Fallback::Apply(setters::comment_line))];

pub static LAYOUT: Layout = Layout::new("IlsAnsbachParser")
    .keywords(KEYWORDS)
    .markers(MARKERS)
    .fields(FIELDS)
    .fallbacks(FALLBACKS)
    .before_line(setters::fax_timestamp);

custom_data_setters! {
    sender => "Absender",
    appointment => "Termin",
    plan_number => "Einsatzort Plannummer",
    einsatzort_station => "Einsatzort Station",
    zielort_station => "Zielort Station",
}

fn before_house_number(msg: &str) -> FieldResult<&str> {
    msg.find(HOUSE_NUMBER)
        .map(|index| msg[..index].trim())
        .ok_or_else(|| FieldError::AnchorNotFound {
            anchor: HOUSE_NUMBER.to_string(),
            text: msg.to_string(),
        })
}

/// "Hauptstr. Haus-Nr.: 5": the number follows the last colon.
fn einsatzort_street(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    let location = &mut state.operation.einsatzort;
    if let Some(index) = line.message.rfind(':') {
        location.street_number = line.message[index + 1..].trim().to_string();
    }
    location.street = before_house_number(line.message)?.to_string();
    Ok(())
}

/// The Zielort street lands in the street number field.
fn zielort_street(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.zielort.street_number = before_house_number(line.message)?.to_string();
    Ok(())
}

fn alarmed(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    if !line.message.is_empty() {
        state.resource.timestamp = resource_timestamp(line.message);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fax::sources::test_support::{at, parse};
    use pretty_assertions::assert_eq;

    const FAX: [&str; 29] = [
        "Absender: ILS Ansbach Fax: 0981 1234",
        "Termin: 05.03.2020 14:32",
        "Einsatznummer: 2.1 200305 17",
        "MITTEILER",
        "Name: Müller",
        "EINSATZORT",
        "Straße: Residenzstraße Haus-Nr.: 12a",
        "Ort: 91522 Ansbach-Ansbach",
        "Objekt: Schloss",
        "Plannummer: EP 7",
        "Station: Süd",
        "ZIELORT",
        "Straße: Bahnhofplatz Haus-Nr.: 1",
        "Ort: 91522 Ansbach",
        "EINSATZGRUND",
        "Schlagw.: #B1014#Brand#",
        "Stichwort B: B 3",
        "Prio.: 1",
        "EINSATZMITTEL",
        "Einsatzmittel: FL AN 40/1",
        "Alarmiert: 05.03.2020 14:35",
        "Geforderte Ausstattung: Sprungpolster",
        "Einsatzmittel: FL AN 11/1",
        "Alarmiert:",
        "Geforderte Ausstattung:",
        "BEMERKUNG",
        "Zufahrt über Hof",
        "Schlüssel beim Pförtner",
        "ENDE FAX",
    ];

    #[test]
    fn test_full_fax() {
        let result = parse(&LAYOUT, &FAX);
        let op = &result.operation;

        assert_eq!(op.custom_data("Absender"), Some("ILS Ansbach Fax: 0981 1234"));
        // The last date on the fax wins.
        assert_eq!(op.timestamp, at(2020, 3, 5, 14, 35));
        assert_eq!(op.operation_number, "2.1 200305 17");
        assert_eq!(op.messenger, "Müller");
        assert_eq!(op.einsatzort.street, "Residenzstraße");
        assert_eq!(op.einsatzort.street_number, "12a");
        assert_eq!(op.einsatzort.zip_code, "91522");
        assert_eq!(op.einsatzort.city, "Ansbach");
        assert_eq!(op.einsatzort.property, "Schloss");
        assert_eq!(op.custom_data("Einsatzort Plannummer"), Some("EP 7"));
        assert_eq!(op.custom_data("Einsatzort Station"), Some("Süd"));
        assert_eq!(op.zielort.street, "");
        assert_eq!(op.zielort.street_number, "Bahnhofplatz");
        assert_eq!(op.zielort.city, "Ansbach");
        assert_eq!(op.keywords.keyword, "#B1014#Brand#");
        assert_eq!(op.keywords.b, "B 3");
        assert_eq!(op.priority, "1");
        assert_eq!(op.comment, "Zufahrt über Hof\nSchlüssel beim Pförtner");

        assert_eq!(op.resources.len(), 2);
        assert_eq!(op.resources[0].full_name, "FL AN 40/1");
        assert_eq!(op.resources[0].timestamp, "05.03.2020 14:35");
        assert_eq!(op.resources[0].requested_equipment, vec!["Sprungpolster"]);
        assert_eq!(op.resources[1].timestamp, "");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_street_without_house_number_is_reported() {
        let result = parse(&LAYOUT, &["EINSATZORT", "Straße: Residenzstraße 12"]);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].line, 1);
    }
}
