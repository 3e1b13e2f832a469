//! ILS Amberg.
//!
//! Coordinates come as separate `X:` and `Y:` lines in their own block.

use crate::error::FieldResult;
use crate::fax::engine::{Fallback, FieldRule, Layout, Line, ParseState, Section, SectionMarker};
use crate::fax::rules::{join_line, read_zip_code_from_city, truncate_at_dash};
use crate::fax::setters::{self, custom_data_setters, parse_number};
use crate::models::PropertyLocation;

const KEYWORDS: &[&str] = &[
    "Einsatznummer",
    "Name",
    "Rufnummer",
    "Straße",
    "Haus-Nr.",
    "Ort",
    "Objekt",
    "Station",
    "Schlagw.",
    "Stichwort",
    "Alarmiert",
    "Gerät",
    "X",
    "Y",
];

const MARKERS: &[SectionMarker] = &[
    SectionMarker::new(&["MITTEILER"], Section::Mitteiler),
    SectionMarker::new(&["KOORDINATEN"], Section::Koordinaten),
    SectionMarker::new(&["EINSATZORT"], Section::Einsatzort),
    SectionMarker::new(&["ZIELORT"], Section::Zielort),
    SectionMarker::new(&["EINSATZGRUND"], Section::Einsatzgrund),
    SectionMarker::new(&["BEMERKUNGEN"], Section::Bemerkung).free(),
    SectionMarker::new(&["EINSATZMITTEL"], Section::Einsatzmittel),
    SectionMarker::new(&["ENDE ALARMFAX"], Section::Footer).free(),
];

const FIELDS: &[FieldRule] = &[
    FieldRule::new(Section::Header, "EINSATZNUMMER", setters::operation_number),
    FieldRule::new(Section::Koordinaten, "X", easting),
    FieldRule::new(Section::Koordinaten, "Y", northing),
    FieldRule::new(Section::Mitteiler, "NAME", setters::messenger),
    FieldRule::new(Section::Mitteiler, "RUFNUMMER", phone_number),
    FieldRule::new(Section::Einsatzort, "STRAßE", einsatzort_street),
    FieldRule::new(Section::Einsatzort, "HAUS-NR.", einsatzort_street_number),
    FieldRule::new(Section::Einsatzort, "ORT", einsatzort_city),
    FieldRule::new(Section::Einsatzort, "OBJEKT", setters::einsatzort_property),
    FieldRule::new(Section::Einsatzort, "STATION", einsatzort_station),
    FieldRule::new(Section::Zielort, "STRAßE", zielort_street),
    FieldRule::new(Section::Zielort, "HAUS-NR.", zielort_street_number),
    FieldRule::new(Section::Zielort, "ORT", zielort_city),
    FieldRule::new(Section::Zielort, "OBJEKT", setters::zielort_property),
    FieldRule::new(Section::Zielort, "STATION", zielort_station),
    FieldRule::new(Section::Einsatzgrund, "SCHLAGW.", setters::keyword),
    FieldRule::new(Section::Einsatzgrund, "STICHWORT", setters::emergency_keyword),
    FieldRule::new(Section::Einsatzmittel, "NAME", setters::resource_name),
    FieldRule::new(Section::Einsatzmittel, "GERÄT", setters::resource_equipment),
    FieldRule::new(Section::Einsatzmittel, "ALARMIERT", setters::resource_alarmed),
];

const FALLBACKS: &[(Section, Fallback)] = &[(Section::Bemerkung, Fallback::Apply(setters::picture_line))];

pub static LAYOUT: Layout = Layout::new("IlsAmbergParser")
    .keywords(KEYWORDS)
    .markers(MARKERS)
    .fields(FIELDS)
    .fallbacks(FALLBACKS);

custom_data_setters! {
    einsatzort_station => "Einsatzort Station",
    zielort_station => "Zielort Station",
}

fn easting(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.geo.east = Some(parse_number(line.message)?);
    Ok(())
}

/// The northing closes the pair; a missing easting counts as zero.
fn northing(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.geo.north = Some(parse_number(line.message)?);
    state.geo.east.get_or_insert(0.0);
    if let Some(position) = state.geo.resolve()? {
        let location = &mut state.operation.einsatzort;
        location.geo_latitude = Some(position.latitude);
        location.geo_longitude = Some(position.longitude);
    }
    Ok(())
}

fn phone_number(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    join_line(&mut state.operation.messenger, &format!("Nr.: {}", line.message));
    Ok(())
}

/// The zip code is removed wherever it appears; cities without one are kept as written.
fn apply_city(location: &mut PropertyLocation, msg: &str) {
    location.zip_code = read_zip_code_from_city(msg);
    location.city = if location.zip_code.is_empty() {
        msg.to_string()
    } else {
        msg.replace(&location.zip_code, "").trim().to_string()
    };
}

fn einsatzort_street(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.einsatzort.street = line.message.to_string();
    Ok(())
}

fn einsatzort_street_number(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.einsatzort.street_number = line.message.to_string();
    Ok(())
}

fn einsatzort_city(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    let location = &mut state.operation.einsatzort;
    apply_city(location, line.message);
    location.city = truncate_at_dash(&location.city).to_string();
    Ok(())
}

fn zielort_street(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.zielort.street = line.message.to_string();
    Ok(())
}

fn zielort_street_number(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.zielort.street_number = line.message.to_string();
    Ok(())
}

fn zielort_city(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    apply_city(&mut state.operation.zielort, line.message);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fax::sources::test_support::parse;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_full_fax() {
        let result = parse(
            &LAYOUT,
            &[
                "Einsatznummer: 7.1 200305 3",
                "MITTEILER",
                "Name: Schmidt",
                "Rufnummer: 09621 4711",
                "KOORDINATEN",
                "X: 4500123.45",
                "Y: 5478123.00",
                "EINSATZORT",
                "Straße: Marktplatz",
                "Haus-Nr.: 11",
                "Ort: 92224 Amberg-Innenstadt",
                "Objekt: Rathaus",
                "ZIELORT",
                "Straße: Mariahilfbergweg",
                "Haus-Nr.: 2",
                "Ort: Amberg",
                "EINSATZGRUND",
                "Schlagw.: #T1000#THL#",
                "Stichwort: THL 1",
                "BEMERKUNGEN",
                "Baum auf Fahrbahn",
                "EINSATZMITTEL",
                "Name: FL AM 40/1",
                "Gerät: Motorsäge",
                "Alarmiert: 05.03.2020 14:33",
                "ENDE ALARMFAX",
            ],
        );
        let op = &result.operation;

        assert_eq!(op.operation_number, "7.1 200305 3");
        assert_eq!(op.messenger, "Schmidt\nNr.: 09621 4711");
        assert!(op.einsatzort.has_geo_coordinates());
        assert_eq!(op.einsatzort.street, "Marktplatz");
        assert_eq!(op.einsatzort.street_number, "11");
        assert_eq!(op.einsatzort.zip_code, "92224");
        assert_eq!(op.einsatzort.city, "Amberg");
        assert_eq!(op.zielort.street_number, "2");
        assert_eq!(op.zielort.zip_code, "");
        assert_eq!(op.zielort.city, "Amberg");
        assert_eq!(op.keywords.emergency_keyword, "THL 1");
        assert_eq!(op.picture, "Baum auf Fahrbahn");
        assert_eq!(op.resources.len(), 1);
        assert_eq!(op.resources[0].requested_equipment, vec!["Motorsäge"]);
        assert_eq!(op.resources[0].timestamp, "05.03.2020 14:33");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_bad_coordinate_is_reported() {
        let result = parse(&LAYOUT, &["KOORDINATEN", "X: vier"]);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].line, 1);
    }
}
