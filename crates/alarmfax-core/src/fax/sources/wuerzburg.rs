//! ILS Würzburg.

use crate::error::{FieldError, FieldResult};
use crate::fax::engine::{Fallback, FieldRule, Layout, Line, ParseState, Section, SectionMarker};
use crate::fax::rules::patterns::BRACKETED;
use crate::fax::rules::city_without_zip;
use crate::fax::setters::{self, custom_data_setters, CityCut};
use crate::models::OperationResource;

const KEYWORDS: &[&str] = &[
    "ABSENDER",
    "FAX",
    "TERMIN",
    "EINSATZ",
    "NAME",
    "STRAßE",
    "ORT",
    "ABSCHNITT",
    "OBJEKT",
    "PLANNUMMER",
    "STATION",
    "ZONE",
    "SCHLAGW",
    "STICHWORT",
    "PRIO",
];

const MARKERS: &[SectionMarker] = &[
    SectionMarker::new(&["MITTEILER"], Section::Mitteiler),
    SectionMarker::new(&["EINSATZORT"], Section::Einsatzort),
    SectionMarker::new(&["ZIELORT"], Section::Zielort),
    SectionMarker::new(&["EINSATZGRUND"], Section::Einsatzgrund),
    SectionMarker::new(&["EINSATZMITTEL"], Section::Einsatzmittel).free(),
    SectionMarker::new(&["BEMERKUNG"], Section::Bemerkung).free(),
    SectionMarker::new(&["TEXTBAUSTEINE"], Section::Hinweis).free(),
    SectionMarker::new(&["ENDE FAX"], Section::Footer).free(),
];

const FIELDS: &[FieldRule] = &[
    FieldRule::new(Section::Header, "ABSENDER", sender),
    FieldRule::new(Section::Header, "TERMIN", appointment),
    FieldRule::new(Section::Header, "EINSATZ", setters::operation_number),
    FieldRule::new(Section::Mitteiler, "NAME", setters::messenger),
    FieldRule::new(Section::Einsatzort, "STRAßE", setters::einsatzort_street),
    FieldRule::new(Section::Einsatzort, "ORT", city),
    FieldRule::new(Section::Einsatzort, "ABSCHNITT", street_section),
    FieldRule::new(Section::Einsatzort, "OBJEKT", setters::einsatzort_property),
    FieldRule::new(Section::Einsatzort, "PLANNUMMER", setters::operation_plan),
    FieldRule::new(Section::Einsatzort, "STATION", einsatzort_station),
    FieldRule::new(Section::Einsatzort, "ZONE", setters::einsatzort_location),
    FieldRule::new(Section::Zielort, "STRAßE", setters::zielort_street),
    FieldRule::new(Section::Zielort, "ORT", setters::zielort_city),
    FieldRule::new(Section::Zielort, "OBJEKT", setters::zielort_property),
    FieldRule::new(Section::Zielort, "STATION", zielort_station),
    FieldRule::new(Section::Einsatzgrund, "SCHLAGW.", keyword),
    FieldRule::new(Section::Einsatzgrund, "STICHWORT B", setters::keyword_b),
    FieldRule::new(Section::Einsatzgrund, "STICHWORT T", setters::keyword_t),
    FieldRule::new(Section::Einsatzgrund, "STICHWORT S", setters::keyword_s),
    FieldRule::new(Section::Einsatzgrund, "STICHWORT I", info_keyword),
    FieldRule::new(Section::Einsatzgrund, "STICHWORT R", setters::keyword_r),
    FieldRule::new(Section::Einsatzgrund, "PRIO.", setters::priority),
];

const FALLBACKS: &[(Section, Fallback)] = &[
    (Section::Einsatzmittel, Fallback::Apply(resource)),
    (Section::Bemerkung, Fallback::Apply(setters::comment_line)),
    (Section::Hinweis, Fallback::Apply(setters::picture_line)),
];

pub static LAYOUT: Layout = Layout::new("IlsWuerzburgParser")
    .keywords(KEYWORDS)
    .markers(MARKERS)
    .fields(FIELDS)
    .fallbacks(FALLBACKS)
    .before_line(setters::fax_timestamp);

custom_data_setters! {
    sender => "Absender",
    appointment => "Termin",
    einsatzort_station => "Einsatzort Station",
    zielort_station => "Zielort Station",
    info_keyword => "Stichwort I",
}

/// The section of the Einsatzort is printed where the Zielort intersection
/// is expected downstream, so it is stored there.
fn street_section(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.zielort.intersection = line.message.to_string();
    Ok(())
}

/// "97070 Würzburg - Würzburg Altstadt": the part after the dash is the
/// municipality.
fn city(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    setters::apply_city(&mut state.operation.einsatzort, line.message, CityCut::None);

    let city = city_without_zip(line.message);
    if let Some(index) = city.find(" - ") {
        let municipality = city[index + 3..].trim();
        state.operation.set_custom_data("Einsatzort Kommune", municipality);
        state.operation.einsatzort.city = city[..index].trim().to_string();
    }
    Ok(())
}

/// "Brandmeldeanlage [B BMA]": the bracketed code is the emergency keyword.
fn keyword(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    let keywords = &mut state.operation.keywords;
    match BRACKETED.captures(line.message) {
        Some(caps) => {
            keywords.emergency_keyword = caps[1].to_string();
            keywords.keyword = line.message.replace(&caps[0], "");
        }
        None => keywords.keyword = line.message.to_string(),
    }
    Ok(())
}

/// "FL WÜ 1/44/1 : DLK 23/12 : 05.03.2020 14:35"
///
/// A "Fehlt:" note inside the equipment column adds one more colon.
fn resource(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    let raw = line.raw;
    if raw.to_uppercase().starts_with("NAME") {
        return Ok(());
    }

    let missing_column = || FieldError::AnchorNotFound {
        anchor: ":".to_string(),
        text: raw.to_string(),
    };
    let equipment_at = raw.find(':').ok_or_else(missing_column)?;
    let mut time_at = equipment_at + 1 + raw[equipment_at + 1..].find(':').ok_or_else(missing_column)?;
    if raw.contains("Fehlt:") {
        time_at += 1 + raw[time_at + 1..].find(':').ok_or_else(missing_column)?;
    }

    let resource = OperationResource::new(raw[..equipment_at].trim())
        .with_equipment(raw[equipment_at + 1..time_at].trim())
        .with_timestamp(raw[time_at + 1..].trim());
    state.operation.resources.push(resource);
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
                "ABSENDER: ILS Würzburg",
                "TERMIN: 05.03.2020 14:31",
                "EINSATZ: 4.1 200305 88",
                "MITTEILER",
                "NAME: Anrufer",
                "EINSATZORT",
                "STRAßE: Domstraße 10",
                "ORT: 97070 Würzburg - Würzburg Altstadt",
                "ABSCHNITT: Nord",
                "OBJEKT: Dom",
                "ZONE: Innenstadt",
                "EINSATZGRUND",
                "SCHLAGW.: Brand Kirche [B 4]",
                "STICHWORT B: B 4",
                "PRIO.: 1",
                "EINSATZMITTEL",
                "Name : Gerät : Alarmiert",
                "FL WÜ 1/30/1 : DLK 23/12 : 14:32",
                "FL WÜ 1/44/1 : Fehlt: Sprungpolster : 14:33",
                "BEMERKUNG",
                "Glocken läuten",
                "TEXTBAUSTEINE",
                "Gefahr durch Absturz",
                "ENDE FAX",
            ],
        );
        let op = &result.operation;

        assert_eq!(op.custom_data("Absender"), Some("ILS Würzburg"));
        assert_eq!(op.timestamp, at(2020, 3, 5, 14, 33));
        assert_eq!(op.custom_data("Termin"), Some("05.03.2020 14:31"));
        assert_eq!(op.operation_number, "4.1 200305 88");
        assert_eq!(op.messenger, "Anrufer");
        assert_eq!(op.einsatzort.street, "Domstraße");
        assert_eq!(op.einsatzort.street_number, "10");
        assert_eq!(op.einsatzort.zip_code, "97070");
        assert_eq!(op.einsatzort.city, "Würzburg");
        assert_eq!(op.custom_data("Einsatzort Kommune"), Some("Würzburg Altstadt"));
        assert_eq!(op.zielort.intersection, "Nord");
        assert_eq!(op.einsatzort.intersection, "");
        assert_eq!(op.einsatzort.location, "Innenstadt");
        assert_eq!(op.keywords.keyword, "Brand Kirche ");
        assert_eq!(op.keywords.emergency_keyword, "B 4");
        assert_eq!(op.keywords.b, "B 4");
        assert_eq!(op.comment, "Glocken läuten");
        assert_eq!(op.picture, "Gefahr durch Absturz");

        assert_eq!(op.resources.len(), 2);
        assert_eq!(op.resources[0].full_name, "FL WÜ 1/30/1");
        assert_eq!(op.resources[0].requested_equipment, vec!["DLK 23/12"]);
        assert_eq!(op.resources[0].timestamp, "14:32");
        assert_eq!(op.resources[1].requested_equipment, vec!["Fehlt: Sprungpolster"]);
        assert_eq!(op.resources[1].timestamp, "14:33");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_resource_without_columns_is_reported() {
        let result = parse(&LAYOUT, &["EINSATZMITTEL", "FL WÜ 1/30/1", "FL WÜ 2/30/1 : HLF : 14:40"]);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].line, 1);
        assert_eq!(result.operation.resources.len(), 1);
    }
}
