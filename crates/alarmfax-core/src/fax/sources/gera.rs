//! ILS Gera.
//!
//! Keyword lines are recognized anywhere; some of them also open a block
//! that collects the following lines. The last line of the fax usually
//! carries the alarm time and the operation number.

use chrono::NaiveDate;

use crate::error::FieldResult;
use crate::fax::engine::{Fallback, FieldRule, Layout, Line, ParseState, Section};
use crate::fax::rules::patterns::{OPERATION_NUMBER, SPACED_FAX_DATE, UNIT_CODE, ZIP_CODE};
use crate::fax::rules::{join_line, read_fax_timestamp, ColonPolicy};
use crate::fax::setters::{self, custom_data_setters};
use crate::models::OperationResource;

const LAST_LINE: &str = "last line";
const REPORTS: &str = "Meldungen";
const APPROACH: &str = "Anfahrt";
const HYDRANTS: &str = "Hydranten";

const KEYWORDS: &[&str] = &[
    "Gemeinde",
    "Ortsteil",
    "Strasse",
    "Nr.",
    "Objekthinweis",
    "Objekt",
    "Einsatzplan-Nr.",
    "Hinweis",
    "Meldender",
    "Alter",
    "Einsatzart",
    "Stichwort",
    "Meldungen",
    "Bemerkung",
    "Anfahrtsvorschlag von Hauptwache",
    "Beteiligte Einsatzmittel",
    "Hydrant vor Hausnummer",
    "",
];

const FIELDS: &[FieldRule] = &[
    FieldRule::anywhere("GEMEINDE", municipality),
    FieldRule::anywhere("ORTSTEIL", district),
    FieldRule::anywhere("STRASSE", street),
    FieldRule::anywhere("NR.", street_number),
    FieldRule::anywhere("OBJEKTHINWEIS", setters::comment),
    FieldRule::anywhere("OBJEKT", setters::einsatzort_property),
    FieldRule::anywhere("EINSATZPLAN-NR.", setters::operation_plan),
    FieldRule::anywhere("HINWEIS", comment_line),
    FieldRule::anywhere("MELDENDER", setters::messenger),
    FieldRule::anywhere("ALTER", age),
    FieldRule::anywhere("EINSATZART", setters::keyword),
    FieldRule::anywhere("STICHWORT", setters::emergency_keyword),
    FieldRule::anywhere("MELDUNGEN", reports_block),
    FieldRule::anywhere("BEMERKUNG", remarks_block),
    FieldRule::anywhere("ANFAHRTSVORSCHLAG VON HAUPTWACHE", approach_block),
    FieldRule::anywhere("BETEILIGTE EINSATZMITTEL", units_block),
    FieldRule::anywhere("HYDRANT VOR HAUSNUMMER", hydrants_block),
];

const FALLBACKS: &[(Section, Fallback)] = &[
    (Section::Meldebild, Fallback::Apply(report)),
    (Section::Bemerkung, Fallback::Apply(comment_line)),
    (Section::Hinweis, Fallback::Apply(approach)),
    (Section::Einsatzmittel, Fallback::Apply(unit)),
    (Section::Objektinfo, Fallback::Apply(hydrant)),
];

pub static LAYOUT: Layout = Layout::new("IlsGeraParser")
    .keywords(KEYWORDS)
    .fields(FIELDS)
    .fallbacks(FALLBACKS)
    .colon(ColonPolicy::KeywordOnly)
    .before_line(remember_line)
    .finish(read_last_line);

custom_data_setters! {
    district => "Einsatzort Ortsteil",
    age => "Alter",
}

fn remember_line(state: &mut ParseState, raw: &str) -> FieldResult {
    let last = state.buffer_mut(LAST_LINE);
    last.clear();
    last.push_str(raw);
    Ok(())
}

/// "07545 Gera": the zip code may stand anywhere in the line.
fn municipality(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.enter(Section::Einsatzort, true);
    let location = &mut state.operation.einsatzort;
    match ZIP_CODE.find(line.message) {
        Some(zip) => {
            location.city = line.message.replace(zip.as_str(), "").trim().to_string();
            location.zip_code = zip.as_str().to_string();
        }
        None => location.city = line.message.to_string(),
    }
    Ok(())
}

fn street(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.einsatzort.street = line.message.to_string();
    Ok(())
}

fn street_number(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.einsatzort.street_number = line.message.to_string();
    Ok(())
}

fn comment_line(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    join_line(&mut state.operation.comment, line.message);
    Ok(())
}

fn reports_block(state: &mut ParseState, _: &Line<'_>) -> FieldResult {
    state.enter(Section::Meldebild, true);
    Ok(())
}

fn remarks_block(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.enter(Section::Bemerkung, true);
    comment_line(state, line)
}

fn approach_block(state: &mut ParseState, _: &Line<'_>) -> FieldResult {
    state.enter(Section::Hinweis, true);
    Ok(())
}

fn units_block(state: &mut ParseState, _: &Line<'_>) -> FieldResult {
    state.enter(Section::Einsatzmittel, true);
    Ok(())
}

fn hydrants_block(state: &mut ParseState, _: &Line<'_>) -> FieldResult {
    state.enter(Section::Objektinfo, true);
    Ok(())
}

fn report(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    join_line(state.operation.custom_data_mut(REPORTS), line.message);
    Ok(())
}

fn approach(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    join_line(state.operation.custom_data_mut(APPROACH), line.message);
    Ok(())
}

fn hydrant(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    join_line(state.operation.custom_data_mut(HYDRANTS), line.message);
    Ok(())
}

/// Only the radio code of a unit line is kept.
fn unit(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    if let Some(code) = UNIT_CODE.find(line.message) {
        state.operation.resources.push(OperationResource::new(code.as_str()));
    }
    Ok(())
}

/// "Ausdruck 05. 03. 2020 14:35 Einsatz 2020030517"
fn read_last_line(state: &mut ParseState) {
    for key in [REPORTS, APPROACH, HYDRANTS] {
        state.operation.custom_data_mut(key);
    }

    let Some(line) = state.take_buffer(LAST_LINE) else {
        return;
    };

    let date = SPACED_FAX_DATE
        .captures(&line)
        .and_then(|caps| {
            let day = caps[1].parse().ok()?;
            let month = caps[2].parse().ok()?;
            let year = caps[3].parse().ok()?;
            NaiveDate::from_ymd_opt(year, month, day)
        })
        .unwrap_or_else(|| state.received.date());
    state.operation.timestamp = read_fax_timestamp(&line, date.and_time(state.received.time()));

    if let Some(number) = OPERATION_NUMBER.find(&line) {
        state.operation.operation_number = number.as_str().to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fax::sources::test_support::{at, parse};
    use pretty_assertions::assert_eq;

    const FAX: [&str; 25] = [
        "Leitstelle Gera",
        "Gemeinde: 07545 Gera",
        "Ortsteil: Untermhaus",
        "Strasse: Gutenbergstraße",
        "Nr.: 12",
        "Objekt: Theater",
        "Objekthinweis: Bühneneingang",
        "Einsatzplan-Nr.: 17",
        "Hinweis: Zufahrt über Hof",
        "Meldender: Schmidt",
        "Alter: 54",
        "Einsatzart: Brand",
        "Stichwort: B 3",
        "Meldungen",
        "14:31 Rauch aus Dach",
        "Bemerkung: Personen vermisst",
        "Zwei Kinder",
        "Anfahrtsvorschlag von Hauptwache",
        "links in die Gutenbergstraße",
        "Beteiligte Einsatzmittel",
        "Florian Gera 1/44 110.44.01",
        "unbekannt",
        "Hydrant vor Hausnummer",
        "10",
        "Ausdruck 05. 03. 2020 14:35 Einsatz 2020030517",
    ];

    #[test]
    fn test_full_fax() {
        let result = parse(&LAYOUT, &FAX);
        let op = &result.operation;

        assert_eq!(op.einsatzort.zip_code, "07545");
        assert_eq!(op.einsatzort.city, "Gera");
        assert_eq!(op.custom_data("Einsatzort Ortsteil"), Some("Untermhaus"));
        assert_eq!(op.einsatzort.street, "Gutenbergstraße");
        assert_eq!(op.einsatzort.street_number, "12");
        assert_eq!(op.einsatzort.property, "Theater");
        assert_eq!(op.operation_plan, "17");
        assert_eq!(op.messenger, "Schmidt");
        assert_eq!(op.custom_data("Alter"), Some("54"));
        assert_eq!(op.keywords.keyword, "Brand");
        assert_eq!(op.keywords.emergency_keyword, "B 3");
        assert_eq!(
            op.comment,
            "Bühneneingang\nZufahrt über Hof\nPersonen vermisst\nZwei Kinder"
        );
        assert_eq!(op.custom_data("Meldungen"), Some("14:31 Rauch aus Dach"));
        assert_eq!(op.custom_data("Anfahrt"), Some("links in die Gutenbergstraße"));
        assert_eq!(
            op.custom_data("Hydranten"),
            Some("10\nAusdruck 05. 03. 2020 14:35 Einsatz 2020030517")
        );

        assert_eq!(op.resources.len(), 1);
        assert_eq!(op.resources[0].full_name, "110.44.01");

        assert_eq!(op.timestamp, at(2020, 3, 5, 14, 35));
        assert_eq!(op.operation_number, "2020030517");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_blocks_are_always_present() {
        let result = parse(&LAYOUT, &["Gemeinde: Gera", "Stichwort: B 2"]);
        let op = &result.operation;

        assert_eq!(op.einsatzort.city, "Gera");
        assert_eq!(op.custom_data("Meldungen"), Some(""));
        assert_eq!(op.custom_data("Hydranten"), Some(""));
        assert_eq!(op.operation_number, "");
        // No date or time on the last line: the fax keeps its receipt time.
        assert_eq!(op.timestamp, at(2020, 3, 5, 14, 40));
    }
}
