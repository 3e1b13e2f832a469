//! Leitstelle Tirol.
//!
//! The fax has no section headings apart from the unit table and the link to
//! the local operation information, which ends the useful content.

use crate::error::FieldResult;
use crate::fax::engine::{Fallback, FieldRule, Layout, Line, MarkerMatch, ParseState, Section, SectionMarker};
use crate::fax::rules::patterns::AUSTRIAN_ZIP_CITY;
use crate::fax::rules::{get_text_between, read_fax_timestamp, starts_with_keyword, Comparison};
use crate::fax::setters;

const KEYWORDS: &[&str] = &[
    "EINSATZBEGINN Uhrzeit/Datum",
    "PLZ - ORT",
    "STRASSE HNR.",
    "OBJEKTBEZEICHNUNG",
    "INFO ZUM OBJEKT",
    "INFO AUS DEN ÖRTLICHEN EINSATZINFORMATIONEN",
    "MDL-NUMMER",
    "MELDERNAME",
    "MELDERTELEFONNUMMER",
    "MELDER PLZ - ORT",
    "MELDER STRASSE HNR.",
    "MELDER OBJEKTBEZEICHNUNG",
    "MELDER INFO ZUM OBJEKT",
    "EINSATZCODE",
    "EINSATZTEXT",
    "ÖRTLICHE EINSATZINFORMATIONEN",
];

const MARKERS: &[SectionMarker] = &[
    SectionMarker::new(&["FUNKRUFNAME"], Section::Einsatzmittel)
        .matching(MarkerMatch::ContainsIgnoreCase)
        .free(),
    SectionMarker::new(&["ÖRTLICHE EINSATZINFORMATIONEN"], Section::Footer)
        .matching(MarkerMatch::ContainsIgnoreCase)
        .free(),
];

const FIELDS: &[FieldRule] = &[
    FieldRule::new(Section::Daten, "EINSATZBEGINN UHRZEIT/DATUM", start_and_number),
    FieldRule::new(Section::Daten, "PLZ - ORT", city),
    FieldRule::new(Section::Daten, "STRASSE HNR.", street),
    FieldRule::new(Section::Daten, "OBJEKTBEZEICHNUNG", setters::einsatzort_property),
    FieldRule::new(Section::Daten, "INFO ZUM OBJEKT", setters::comment_line),
    FieldRule::new(Section::Daten, "MELDERNAME", setters::messenger),
    FieldRule::new(Section::Daten, "EINSATZCODE", setters::keyword),
    FieldRule::new(Section::Daten, "EINSATZTEXT", setters::picture_line),
];

const FALLBACKS: &[(Section, Fallback)] = &[(Section::Einsatzmittel, Fallback::Apply(setters::resource_line))];

pub static LAYOUT: Layout = Layout::new("LstTirolParser")
    .keywords(KEYWORDS)
    .markers(MARKERS)
    .fields(FIELDS)
    .fallbacks(FALLBACKS)
    .start(Section::Daten, true)
    .before_line(leave_unit_table);

/// The unit table has no closing heading; the next field line ends it.
fn leave_unit_table(state: &mut ParseState, raw: &str) -> FieldResult {
    if state.section == Section::Einsatzmittel && starts_with_keyword(raw, KEYWORDS).is_some() {
        state.enter(Section::Daten, true);
    }
    Ok(())
}

/// "05.03.2020 14:32 / Einsatznr.: T-4711"
fn start_and_number(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    let start = get_text_between(line.message, None, Some("/"), Comparison::IgnoreCase)?;
    state.operation.timestamp = read_fax_timestamp(&start, state.received);
    state.operation.operation_number =
        get_text_between(line.message, Some("Einsatznr.:"), None, Comparison::IgnoreCase)?;
    Ok(())
}

/// "6020 Innsbruck". Lines without a four digit zip code are ignored.
fn city(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    if let Some(caps) = AUSTRIAN_ZIP_CITY.captures(line.message) {
        state.operation.einsatzort.zip_code = caps[1].to_string();
        state.operation.einsatzort.city = caps[2].to_string();
    }
    Ok(())
}

/// House numbers stay in the street field.
fn street(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.einsatzort.street = line.message.to_string();
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
                "Leitstelle Tirol",
                "EINSATZBEGINN Uhrzeit/Datum: 05.03.2020 14:32 / Einsatznr.: T-4711",
                "EINSATZCODE: B2",
                "EINSATZTEXT: Brand Wohnung",
                "PLZ - ORT: 6020 Innsbruck",
                "STRASSE HNR.: Maria-Theresien-Straße 18",
                "OBJEKTBEZEICHNUNG: Wohnhaus",
                "INFO ZUM OBJEKT: Dachgeschoss",
                "MELDERNAME: Gruber",
                "MELDER PLZ - ORT: 6020 Wilten",
                "FUNKRUFNAME",
                "Florian Innsbruck 1",
                "Florian Innsbruck 2",
                "EINSATZTEXT: Person vermisst",
                "ÖRTLICHE EINSATZINFORMATIONEN",
                "https://example.invalid/info",
                "Florian Innsbruck 3",
            ],
        );
        let op = &result.operation;

        assert_eq!(op.timestamp, at(2020, 3, 5, 14, 32));
        assert_eq!(op.operation_number, "T-4711");
        assert_eq!(op.keywords.keyword, "B2");
        assert_eq!(op.picture, "Brand Wohnung\nPerson vermisst");
        assert_eq!(op.einsatzort.zip_code, "6020");
        assert_eq!(op.einsatzort.city, "Innsbruck");
        assert_eq!(op.einsatzort.street, "Maria-Theresien-Straße 18");
        assert_eq!(op.einsatzort.property, "Wohnhaus");
        assert_eq!(op.comment, "Dachgeschoss");
        assert_eq!(op.messenger, "Gruber");

        let names: Vec<&str> = op.resources.iter().map(|r| r.full_name.as_str()).collect();
        assert_eq!(names, vec!["Florian Innsbruck 1", "Florian Innsbruck 2"]);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_start_line_without_number_is_reported() {
        let result = parse(&LAYOUT, &["EINSATZBEGINN Uhrzeit/Datum: 05.03.2020 14:32 / 4711"]);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.operation.timestamp, at(2020, 3, 5, 14, 32));
    }
}
