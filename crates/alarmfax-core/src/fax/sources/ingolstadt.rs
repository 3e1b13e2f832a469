//! ILS Ingolstadt.

use crate::error::{FieldError, FieldResult};
use crate::fax::engine::{Fallback, FieldRule, Layout, Line, ParseState, Section, SectionMarker};
use crate::fax::rules::{get_text_between, read_zip_code_from_city, truncate_at_spaced_dash, Comparison};
use crate::fax::setters::{self, custom_data_setters};
use crate::models::OperationResource;

const OPERATION_NUMBER: &str = "Einsatznummer:";
const REQUESTED: &str = ">> gefordert:";

const KEYWORDS: &[&str] = &[
    "Absender",
    "Einsatz-Nr",
    "Objekt",
    "Station",
    "Strasse",
    "Abschnitt",
    "Planumer",
    "Kreuzung",
    "Ort",
    "Koordinate",
    "Schlagwort",
    "Stichwort",
    "Priorität",
    "Prioritat",
];

const MARKERS: &[SectionMarker] = &[
    SectionMarker::new(&["EINSATZORT"], Section::Einsatzort),
    SectionMarker::new(&["EREIGNIS"], Section::Einsatzgrund),
    SectionMarker::new(&["ZIELORT"], Section::Zielort),
    SectionMarker::new(&["BEMERKUNG"], Section::Bemerkung).free(),
    SectionMarker::new(&["EINSATZMITTEL"], Section::Einsatzmittel).free(),
    SectionMarker::new(
        &["******************", "xxxxxxxxxxxxxxxxxx", "XXXXXXXXXXXXXXXXXX"],
        Section::Footer,
    )
    .free(),
];

const FIELDS: &[FieldRule] = &[
    FieldRule::new(Section::Header, "ABSENDER", operation_number),
    FieldRule::new(Section::Einsatzort, "STRASSE", setters::einsatzort_street),
    FieldRule::new(Section::Einsatzort, "ORT", einsatzort_city),
    FieldRule::new(Section::Einsatzort, "OBJEKT", setters::einsatzort_property),
    FieldRule::new(Section::Einsatzort, "STATION", einsatzort_station),
    FieldRule::new(Section::Einsatzort, "KREUZUNG", setters::einsatzort_intersection),
    FieldRule::new(Section::Einsatzort, "PLANUMER", setters::operation_plan),
    FieldRule::new(Section::Einsatzort, "KOORDINATE", setters::einsatzort_coordinates),
    FieldRule::new(Section::Einsatzgrund, "SCHLAGWORT", setters::keyword),
    FieldRule::new(Section::Einsatzgrund, "STICHWORT", setters::emergency_keyword),
    FieldRule::new(Section::Einsatzgrund, "PRIORITAT", setters::priority),
    FieldRule::new(Section::Einsatzgrund, "PRIORITÄT", setters::priority),
    FieldRule::new(Section::Zielort, "STRASSE", setters::zielort_street),
    FieldRule::new(Section::Zielort, "ORT", zielort_city),
    FieldRule::new(Section::Zielort, "OBJEKT", setters::zielort_property),
    FieldRule::new(Section::Zielort, "STATION", zielort_station),
];

const FALLBACKS: &[(Section, Fallback)] = &[
    (Section::Einsatzmittel, Fallback::Apply(resource)),
    (Section::Bemerkung, Fallback::Apply(setters::picture_line)),
];

pub static LAYOUT: Layout = Layout::new("IlsIngolstadtParser")
    .keywords(KEYWORDS)
    .markers(MARKERS)
    .fields(FIELDS)
    .fallbacks(FALLBACKS);

custom_data_setters! {
    einsatzort_station => "Einsatzort Station",
    zielort_station => "Zielort Station",
}

fn operation_number(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.operation_number =
        get_text_between(line.message, Some(OPERATION_NUMBER), None, Comparison::IgnoreCase)?;
    Ok(())
}

/// The zip code is removed wherever it appears.
fn einsatzort_city(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    let location = &mut state.operation.einsatzort;
    location.zip_code = read_zip_code_from_city(line.message);
    let city = line.message.replace(&location.zip_code, "");
    location.city = truncate_at_spaced_dash(&city).to_string();
    Ok(())
}

/// Zielort faxes repeat the Einsatzort city; it is cut at the dash position
/// of the Zielort line.
fn zielort_city(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    let Some(dash) = line.message.find('-') else {
        return Ok(());
    };
    let city = state
        .operation
        .einsatzort
        .city
        .get(..dash)
        .ok_or_else(|| FieldError::MissingValue(line.message.to_string()))?;
    state.operation.zielort.city = city.to_string();
    Ok(())
}

/// "HLF 20 >> gefordert: Atemschutz"
fn resource(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    let name = get_text_between(line.message, None, Some(REQUESTED), Comparison::IgnoreCase)?;
    let equipment = get_text_between(line.message, Some(REQUESTED), None, Comparison::IgnoreCase)?;

    let mut resource = OperationResource::new(name);
    if !equipment.is_empty() {
        resource = resource.with_equipment(equipment);
    }
    state.operation.resources.push(resource);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fax::sources::test_support::parse;
    use pretty_assertions::assert_eq;

    const FAX: [&str; 20] = [
        "Absender: ILS Ingolstadt Einsatznummer: 3.4 200305 21",
        "EINSATZORT",
        "Strasse: Rathausplatz 2",
        "Ort: 85049 Ingolstadt - Mitte",
        "Objekt: Altes Rathaus",
        "Station: FW Ingolstadt",
        "Planumer: 17",
        "Koordinate: 4459876.50 5404321.25",
        "EREIGNIS",
        "Schlagwort: #B1014#Brand#",
        "Stichwort: B 3",
        "Priorität: 2",
        "ZIELORT",
        "Ort: 85049 Ingolstadt",
        "BEMERKUNG",
        "Rauch aus Dach",
        "EINSATZMITTEL",
        "FL IN 40/1 >> gefordert: Drehleiter",
        "FL IN 11/1 >> gefordert:",
        "******************",
    ];

    #[test]
    fn test_full_fax() {
        let result = parse(&LAYOUT, &FAX);
        let op = &result.operation;

        assert_eq!(op.operation_number, "3.4 200305 21");
        assert_eq!(op.einsatzort.street, "Rathausplatz");
        assert_eq!(op.einsatzort.street_number, "2");
        assert_eq!(op.einsatzort.zip_code, "85049");
        assert_eq!(op.einsatzort.city, "Ingolstadt");
        assert_eq!(op.operation_plan, "17");
        assert!(op.einsatzort.has_geo_coordinates());
        assert_eq!(op.keywords.emergency_keyword, "B 3");
        assert_eq!(op.priority, "2");
        assert_eq!(op.picture, "Rauch aus Dach");
        assert_eq!(op.resources.len(), 2);
        assert_eq!(op.resources[0].requested_equipment, vec!["Drehleiter"]);
        assert!(op.resources[1].requested_equipment.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_zielort_city_is_cut_from_einsatzort_city() {
        let result = parse(
            &LAYOUT,
            &["EINSATZORT", "Ort: Manching Ortsmitte", "ZIELORT", "Ort: Gaimersheim-Ost"],
        );
        assert_eq!(result.operation.zielort.city, "Manching Or");

        let result = parse(
            &LAYOUT,
            &["EINSATZORT", "Ort: Manching", "ZIELORT", "Ort: 85049 Ingolstadt-Nord"],
        );
        assert_eq!(result.operation.zielort.city, "");
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].line, 3);
    }
}
