//! ILS Darmstadt-Dieburg.
//!
//! There are no headings. A keyword line selects the field and every line up
//! to the next keyword is read into it.

use crate::error::FieldResult;
use crate::fax::engine::{Fallback, FieldRule, Layout, Line, ParseState, Section};
use crate::fax::rules::patterns::ALARMED_UNIT;
use crate::fax::rules::{append_spaced, get_message_text, read_fax_timestamp, ColonPolicy};
use crate::models::OperationResource;

// "Ort " keeps its blank so that "Ortsteil" is not taken for it.
const KEYWORDS: &[&str] = &[
    "Ort ",
    "Ortsteil",
    "Straße",
    "Hausnummer",
    "Koordinaten ",
    "Zusatzinfos",
    "Betroffene",
    "Einsatzart",
    "Stichwort",
    "Sondersignal",
    "Zusatzinformationen",
    "Alarmierungen",
    "Meldende",
    "Telefon",
    "Ausdruck",
    "Referenznummer",
    "",
];

const FIELDS: &[FieldRule] = &[
    FieldRule::new(Section::Daten, "ORT", city).continued_by(city),
    FieldRule::new(Section::Daten, "ORTSTEIL", district).continued_by(district),
    FieldRule::new(Section::Daten, "STRAßE", street).continued_by(street),
    FieldRule::new(Section::Daten, "HAUSNUMMER", street_number).continued_by(street_number),
    FieldRule::new(Section::Daten, "KOORDINATEN", stop),
    FieldRule::new(Section::Daten, "ZUSATZINFOS", comment).continued_by(comment),
    FieldRule::new(Section::Daten, "BETROFFENE", affected),
    FieldRule::new(Section::Daten, "EINSATZART", emergency_keyword).continued_by(emergency_keyword),
    FieldRule::new(Section::Daten, "STICHWORT", keyword).continued_by(keyword),
    FieldRule::new(Section::Daten, "SONDERSIGNAL", stop),
    FieldRule::new(Section::Daten, "ZUSATZINFORMATIONEN", picture),
    FieldRule::new(Section::Daten, "ALARMIERUNGEN", alarmed).continued_by(alarmed),
    FieldRule::new(Section::Daten, "MELDENDE", messenger).continued_by(messenger),
    FieldRule::new(Section::Daten, "TELEFON", phone).continued_by(phone),
    FieldRule::new(Section::Daten, "AUSDRUCK", printed).continued_by(printed),
    FieldRule::new(Section::Daten, "REFERENZNUMMER", operation_number).continued_by(operation_number),
];

const FALLBACKS: &[(Section, Fallback)] = &[(Section::Daten, Fallback::Inner)];

pub static LAYOUT: Layout = Layout::new("ILSDarmstadtDieburgParser")
    .keywords(KEYWORDS)
    .fields(FIELDS)
    .fallbacks(FALLBACKS)
    .start(Section::Daten, true)
    .colon(ColonPolicy::KeywordOnly);

fn value(line: &Line<'_>) -> String {
    get_message_text(line.raw, None)
}

/// Lines up to the next keyword are dropped.
fn stop(state: &mut ParseState, _: &Line<'_>) -> FieldResult {
    state.inner = None;
    Ok(())
}

fn city(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.einsatzort.city = value(line);
    Ok(())
}

fn district(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    let text = value(line);
    append_spaced(&mut state.operation.einsatzort.city, &text);
    Ok(())
}

fn street(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.einsatzort.street = value(line);
    Ok(())
}

fn street_number(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.einsatzort.street_number = value(line);
    Ok(())
}

fn comment(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.comment = value(line);
    Ok(())
}

/// One line only, added to the comment.
fn affected(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    let text = value(line);
    append_spaced(&mut state.operation.comment, &text);
    stop(state, line)
}

fn emergency_keyword(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.keywords.emergency_keyword = value(line);
    Ok(())
}

fn keyword(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.keywords.keyword = value(line);
    Ok(())
}

/// One line only.
fn picture(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.picture = value(line);
    stop(state, line)
}

/// "05.03.2020 14:33:10 12345 FF Dieburg". Other lines are skipped.
fn alarmed(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    if let Some(caps) = ALARMED_UNIT.captures(line.raw) {
        let resource = OperationResource::new(&caps[6]).with_timestamp(&caps[1]);
        state.operation.resources.push(resource);
    }
    Ok(())
}

fn messenger(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.messenger = value(line);
    Ok(())
}

fn phone(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    let text = value(line);
    state.operation.messenger.push_str(&format!(" Tel.:{}", text));
    Ok(())
}

fn printed(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.timestamp = read_fax_timestamp(line.raw, state.received);
    Ok(())
}

fn operation_number(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.operation_number = value(line);
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
                "Referenznummer: 2020-4711",
                "Ort : 64807 Dieburg",
                "Ortsteil: Altstadt",
                "Straße: Markt",
                "Hausnummer: 4",
                "Koordinaten : 3490000 5530000",
                "Zusatzinfos: Rathaus",
                "Betroffene: 2 Personen",
                "Zufahrt eng",
                "Einsatzart: Brand",
                "Stichwort: B 3",
                "Sondersignal: ja",
                "Zusatzinformationen: Rauch sichtbar",
                "Alarmierungen:",
                "05.03.2020 14:33:10 64807 FF Dieburg",
                "Meldende: Müller",
                "Telefon: 06071 123",
                "Ausdruck vom 05.03.2020 14:35",
            ],
        );
        let op = &result.operation;

        assert_eq!(op.operation_number, "2020-4711");
        assert_eq!(op.einsatzort.city, "64807 Dieburg Altstadt");
        assert_eq!(op.einsatzort.street, "Markt");
        assert_eq!(op.einsatzort.street_number, "4");
        assert!(!op.einsatzort.has_geo_coordinates());
        assert_eq!(op.comment, "Rathaus 2 Personen");
        assert_eq!(op.keywords.emergency_keyword, "Brand");
        assert_eq!(op.keywords.keyword, "B 3");
        assert_eq!(op.picture, "Rauch sichtbar");
        assert_eq!(op.messenger, "Müller Tel.:06071 123");
        assert_eq!(op.timestamp, at(2020, 3, 5, 14, 35));

        assert_eq!(op.resources.len(), 1);
        assert_eq!(op.resources[0].full_name, "64807");
        assert_eq!(op.resources[0].timestamp, "05.03.2020 14:33:10");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_field_continues_until_next_keyword() {
        let result = parse(&LAYOUT, &["Stichwort: B 3", "Zusatzinfos: Lager", "Halle 2"]);
        assert_eq!(result.operation.keywords.keyword, "B 3");
        assert_eq!(result.operation.comment, "Halle 2");
    }
}
