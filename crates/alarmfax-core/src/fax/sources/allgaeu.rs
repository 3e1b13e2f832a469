//! ILS Allgäu.

use crate::error::FieldResult;
use crate::fax::engine::{Fallback, FieldRule, Layout, Line, ParseState, Section, SectionMarker};
use crate::fax::rules::{get_text_between, Comparison};
use crate::fax::setters;

const PLAN_NUMBER: &str = "EINSATZPLANNR.:";

const KEYWORDS: &[&str] = &[
    "",
    "ALARM",
    "EINSATZNR.",
    "NAME",
    "STRAßE",
    "ABSCHNITT",
    "ORT",
    "ORTSTEIL",
    "OBJEKT",
    "MELDER",
    "STATION",
    "SCHLAGW",
    "GEF. GERÄTE",
];

// Tesseract tends to split the MITTEILER heading.
const MARKERS: &[SectionMarker] = &[
    SectionMarker::new(&["MITTEILER", "M I TTE I LER"], Section::Mitteiler),
    SectionMarker::new(&["EINSATZORT"], Section::Einsatzort),
    SectionMarker::new(&["EINSATZGRUND"], Section::Einsatzgrund),
    SectionMarker::new(&["EINSATZMITTEL"], Section::Einsatzmittel),
    SectionMarker::new(&["BEMERKUNG"], Section::Bemerkung).free(),
    SectionMarker::new(&["ENDE FAX"], Section::Footer).free(),
];

const FIELDS: &[FieldRule] = &[
    FieldRule::new(Section::Header, "ALARM", setters::alarm_timestamp),
    FieldRule::new(Section::Header, "EINSATZNR.", setters::operation_number),
    FieldRule::new(Section::Mitteiler, "NAME", setters::messenger),
    FieldRule::new(Section::Einsatzort, "STRAßE", setters::einsatzort_street)
        .continued_by(setters::append_einsatzort_street),
    FieldRule::new(Section::Einsatzort, "ABSCHNITT", setters::einsatzort_intersection),
    FieldRule::new(Section::Einsatzort, "ORT", setters::einsatzort_city_dash)
        .continued_by(setters::append_einsatzort_city),
    FieldRule::new(Section::Einsatzort, "ORTSTEIL", district),
    FieldRule::new(Section::Einsatzort, "OBJEKT", setters::einsatzort_property)
        .continued_by(setters::append_einsatzort_property),
    FieldRule::new(Section::Einsatzort, "MELDER", detector),
    FieldRule::new(Section::Einsatzort, "STATION", station).continued_by(append_station),
    FieldRule::new(Section::Einsatzgrund, "SCHLAGW.", setters::keyword),
    FieldRule::new(Section::Einsatzgrund, "STICHWORT", setters::emergency_keyword),
    FieldRule::new(Section::Einsatzmittel, "NAME", setters::resource_name),
    FieldRule::new(Section::Einsatzmittel, "GEF. GERÄTE", setters::resource_equipment_last),
];

const FALLBACKS: &[(Section, Fallback)] = &[
    (Section::Einsatzort, Fallback::Inner),
    (Section::Bemerkung, Fallback::Apply(setters::comment_line)),
];

pub static LAYOUT: Layout = Layout::new("ILSAllgaeuParser")
    .keywords(KEYWORDS)
    .markers(MARKERS)
    .fields(FIELDS)
    .fallbacks(FALLBACKS)
    .before_line(setters::fax_timestamp)
    .carry_continuation(setters::append_einsatzort_street);

fn district(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.set_custom_data("Einsatzort Ortsteil", line.message);
    Ok(())
}

/// "MELDER: 12/3 Halle EINSATZPLANNR.: 4711"
fn detector(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    let detector = get_text_between(line.message, None, Some(PLAN_NUMBER), Comparison::IgnoreCase)?;
    let plan = get_text_between(line.message, Some(PLAN_NUMBER), None, Comparison::IgnoreCase)?;
    state.operation.set_custom_data("Einsatzort Melder", detector);
    state.operation.operation_plan = plan;
    Ok(())
}

fn station(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.set_custom_data("Einsatzort Station", line.message);
    Ok(())
}

fn append_station(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state
        .operation
        .custom_data_mut("Einsatzort Station")
        .push_str(line.message);
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
                "Alarm: 05.03.2020 14:32",
                "Einsatznr.: B 1.2 200305 99",
                "M I TTE I LER",
                "Name: Hausmeister",
                "EINSATZORT",
                "Straße: Hauptstraße 3",
                "Abschnitt: Ecke Bahnhof",
                "Ort: 87435 Kempten-Sankt Mang",
                "Ortsteil: Sankt Mang",
                "Melder: 12/3 Halle EINSATZPLANNR.: EP 42",
                "Station: Wache",
                "Süd",
                "EINSATZGRUND",
                "Schlagw.: B4",
                "Stichwort: Brand Industrie",
                "EINSATZMITTEL",
                "Name: Florian Kempten 40/1",
                "Gef. Geräte: Wärmebildkamera",
                "Name: Florian Kempten 30/1",
                "Gef. Geräte:",
                "BEMERKUNG",
                "Anfahrt über Nordtor",
                "ENDE FAX",
            ],
        );
        let op = &result.operation;

        assert_eq!(op.timestamp, at(2020, 3, 5, 14, 32));
        assert_eq!(op.operation_number, "B 1.2 200305 99");
        assert_eq!(op.messenger, "Hausmeister");
        assert_eq!(op.einsatzort.street, "Hauptstraße");
        assert_eq!(op.einsatzort.street_number, "3");
        assert_eq!(op.einsatzort.intersection, "Ecke Bahnhof");
        assert_eq!(op.einsatzort.zip_code, "87435");
        assert_eq!(op.einsatzort.city, "Kempten");
        assert_eq!(op.custom_data("Einsatzort Ortsteil"), Some("Sankt Mang"));
        assert_eq!(op.custom_data("Einsatzort Melder"), Some("12/3 Halle"));
        assert_eq!(op.operation_plan, "EP 42");
        assert_eq!(op.custom_data("Einsatzort Station"), Some("WacheSüd"));
        assert_eq!(op.keywords.keyword, "B4");
        assert_eq!(op.keywords.emergency_keyword, "Brand Industrie");
        assert_eq!(op.comment, "Anfahrt über Nordtor");

        assert_eq!(op.resources.len(), 2);
        assert_eq!(op.resources[0].full_name, "Florian Kempten 40/1");
        assert_eq!(op.resources[0].requested_equipment, vec!["Wärmebildkamera"]);
        assert!(op.resources[1].requested_equipment.is_empty());
    }

    #[test]
    fn test_detector_without_plan_number_is_reported() {
        let result = parse(&LAYOUT, &["EINSATZORT", "Melder: 12/3 Halle"]);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.operation.operation_plan, "");
    }
}
