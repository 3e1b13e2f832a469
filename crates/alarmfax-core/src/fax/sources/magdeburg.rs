//! ILS Magdeburg.
//!
//! Values contain clock times, so only a colon directly behind the keyword
//! ends the label.

use crate::error::FieldResult;
use crate::fax::engine::{Fallback, FieldRule, Layout, Line, ParseState, Section, SectionMarker};
use crate::fax::rules::{join_line, ColonPolicy};
use crate::fax::setters;

const KEYWORDS: &[&str] = &[
    "Einsatz-Nr.",
    "Str./Hausnr.",
    "Ortst./Gem.",
    "sonst. Ortsangabe.",
    "Objekt-Nummer",
    "Objekt",
    "Stichwort",
    "Bemerkungen",
    "Telefonnummer",
    "Meldender",
    "",
];

const MARKERS: &[SectionMarker] = &[
    SectionMarker::new(&["Einsatzmeldung"], Section::Einsatzort),
    SectionMarker::new(&["Hinweise"], Section::Hinweis).free(),
    SectionMarker::new(&["Alarmierungen"], Section::Alarmierung).free(),
];

const FIELDS: &[FieldRule] = &[
    FieldRule::new(Section::Header, "EINSATZ-NR.", operation_number).continued_by(number_line),
    FieldRule::new(Section::Einsatzort, "STR./HAUSNR.", setters::einsatzort_street),
    FieldRule::new(Section::Einsatzort, "SONST. ORTSANGABE.", location_note),
    FieldRule::new(Section::Einsatzort, "OBJEKT", setters::einsatzort_property),
    FieldRule::new(Section::Einsatzort, "OBJEKT-NUMMER", object_number),
    FieldRule::new(Section::Einsatzort, "ORTST./GEM.", city),
    FieldRule::new(Section::Einsatzort, "STICHWORT", setters::keyword),
    FieldRule::new(Section::Einsatzort, "MELDENDER", setters::messenger),
    FieldRule::new(Section::Einsatzort, "TELEFONNUMMER", phone_number),
    FieldRule::new(Section::Einsatzort, "BEMERKUNGEN", setters::picture),
];

const FALLBACKS: &[(Section, Fallback)] = &[
    (Section::Header, Fallback::Inner),
    (Section::Hinweis, Fallback::Apply(setters::comment_line)),
];

pub static LAYOUT: Layout = Layout::new("IlsMagdeburgParser")
    .keywords(KEYWORDS)
    .markers(MARKERS)
    .fields(FIELDS)
    .fallbacks(FALLBACKS)
    .colon(ColonPolicy::AfterKeyword);

/// The number follows the label, or stands alone on the next line.
fn operation_number(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    if !line.message.is_empty() {
        state.operation.operation_number = line.message.to_string();
        state.inner = None;
    }
    Ok(())
}

fn number_line(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.operation_number = line.message.to_string();
    state.inner = None;
    Ok(())
}

fn location_note(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    join_line(state.operation.custom_data_mut("Einsatzort Zusatz"), line.message);
    Ok(())
}

fn object_number(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    join_line(&mut state.operation.einsatzort.property, line.message);
    Ok(())
}

fn city(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.einsatzort.city = line.message.to_string();
    Ok(())
}

fn phone_number(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    join_line(&mut state.operation.messenger, line.message);
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
                "Leitstelle Magdeburg",
                "Einsatz-Nr.",
                "2020 0815",
                "Einsatzmeldung",
                "Str./Hausnr. Breiter Weg 7",
                "Ortst./Gem.: Magdeburg Altstadt",
                "sonst. Ortsangabe.: Hinterhof",
                "Objekt: Museum",
                "Objekt-Nummer: 4711",
                "Stichwort: Brand Gebäude 10:15 gemeldet",
                "Meldender: Pförtner",
                "Telefonnummer: 0391 12345",
                "Bemerkungen: Rauch aus Fenster",
                "Hinweise",
                "Zufahrt über Hof",
                "Alarmierungen",
                "MD 1/40/1 10:16",
            ],
        );
        let op = &result.operation;

        assert_eq!(op.operation_number, "2020 0815");
        assert_eq!(op.einsatzort.street, "Breiter Weg");
        assert_eq!(op.einsatzort.street_number, "7");
        assert_eq!(op.einsatzort.city, "Magdeburg Altstadt");
        assert_eq!(op.custom_data("Einsatzort Zusatz"), Some("Hinterhof"));
        assert_eq!(op.einsatzort.property, "Museum\n4711");
        assert_eq!(op.keywords.keyword, "Brand Gebäude 10:15 gemeldet");
        assert_eq!(op.messenger, "Pförtner\n0391 12345");
        assert_eq!(op.picture, "Rauch aus Fenster");
        assert_eq!(op.comment, "Zufahrt über Hof");
        assert!(op.resources.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_number_on_label_line() {
        let result = parse(&LAYOUT, &["Einsatz-Nr.: 2020 0815", "Leitstelle Magdeburg"]);
        assert_eq!(result.operation.operation_number, "2020 0815");
    }
}
