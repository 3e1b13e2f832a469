//! Field setters shared by many layouts.
//!
//! Every setter has the [`Setter`](super::engine::Setter) signature so it can
//! be placed in a static rule table. Source-specific setters live next to
//! their layout.

use tracing::warn;

use crate::error::{FieldError, FieldResult};
use crate::geo::gauss_krueger_to_wgs84;
use crate::models::PropertyLocation;

use super::engine::{Line, ParseState};
use super::rules::keywords::fold;
use super::rules::patterns::{DECIMAL_NUMBER, NUMBER};
use super::rules::{
    analyze_street_line, append_line, city_without_zip, get_message_text, get_text_between,
    read_fax_timestamp, read_zip_code_from_city, resource_timestamp, transliterate_umlauts,
    truncate_at_dash, truncate_at_spaced_dash, Comparison,
};

/// Declare setters that store the message under a custom data key.
///
/// `name => "Key"` sets the value, `name += "Key"` appends to it.
macro_rules! custom_data_setters {
    ($($name:ident $op:tt $key:literal),* $(,)?) => {
        $(custom_data_setters!(@one $name $op $key);)*
    };
    (@one $name:ident => $key:literal) => {
        fn $name(
            state: &mut $crate::fax::engine::ParseState,
            line: &$crate::fax::engine::Line<'_>,
        ) -> $crate::error::FieldResult {
            state.operation.set_custom_data($key, line.message);
            Ok(())
        }
    };
    (@one $name:ident += $key:literal) => {
        fn $name(
            state: &mut $crate::fax::engine::ParseState,
            line: &$crate::fax::engine::Line<'_>,
        ) -> $crate::error::FieldResult {
            state.operation.custom_data_mut($key).push_str(line.message);
            Ok(())
        }
    };
}

pub(crate) use custom_data_setters;

/// How the administrative duplicate after a city name is cut off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CityCut {
    None,
    /// At the first `" - "`.
    SpacedDash,
    /// At the first `-`.
    Dash,
}

/// Split `msg` into zip code and city and store both.
///
/// Logs a warning when no zip code is present, since route planning works
/// poorly without one.
pub fn apply_city(location: &mut PropertyLocation, msg: &str, cut: CityCut) {
    location.zip_code = read_zip_code_from_city(msg);
    if location.zip_code.is_empty() {
        warn!(city = msg, "Could not find a zip code, route planning may fail");
    }

    let city = city_without_zip(msg);
    location.city = match cut {
        CityCut::None => city,
        CityCut::SpacedDash => truncate_at_spaced_dash(city),
        CityCut::Dash => truncate_at_dash(city),
    }
    .to_string();
}

/// Run the street analysis and store street and number; returns the appendix.
pub fn apply_street(location: &mut PropertyLocation, msg: &str) -> String {
    let parsed = analyze_street_line(msg);
    location.street = parsed.street;
    location.street_number = parsed.street_number;
    parsed.appendix
}

/// Read two decimal Gauss-Krüger values (easting, northing) from a line.
///
/// Lines without exactly two values are left alone.
pub fn apply_coordinates(location: &mut PropertyLocation, text: &str) -> FieldResult {
    let values: Vec<&str> = DECIMAL_NUMBER.find_iter(text).map(|m| m.as_str()).collect();
    if let [east, north] = values[..] {
        let east = parse_number(east)?;
        let north = parse_number(north)?;
        let position = gauss_krueger_to_wgs84(east, north)?;
        location.geo_latitude = Some(position.latitude);
        location.geo_longitude = Some(position.longitude);
    }
    Ok(())
}

/// Parse a number written with `.` or `,` as decimal separator.
pub fn parse_number(text: &str) -> FieldResult<f64> {
    let text = text.trim();
    text.replace(',', ".")
        .parse()
        .map_err(|_| FieldError::InvalidNumber(text.to_string()))
}

/// Text before the last occurrence of `delimiter`.
pub fn before_last<'a>(text: &'a str, delimiter: char) -> FieldResult<&'a str> {
    text.rfind(delimiter)
        .map(|index| &text[..index])
        .ok_or_else(|| FieldError::AnchorNotFound {
            anchor: delimiter.to_string(),
            text: text.to_string(),
        })
}

/// Split "before LABEL: after" at a case-insensitive label.
///
/// The separator directly behind the label is dropped from the second part.
pub fn split_at_label(msg: &str, label: &str) -> FieldResult<(String, String)> {
    let before = get_text_between(msg, None, Some(label), Comparison::IgnoreCase)?;
    let after = get_text_between(msg, Some(label), None, Comparison::IgnoreCase)?;
    let after = after.strip_prefix(':').unwrap_or(&after).trim().to_string();
    Ok((before, after))
}

/// The value of a line that starts with `label` (case-insensitive).
pub fn label_value(raw: &str, label: &str) -> Option<String> {
    fold(raw)
        .starts_with(&fold(label))
        .then(|| get_message_text(raw, Some(label)))
}

/// Split "FL Ottobrunn 40/1 (DLK)" into unit and the equipment given in
/// parentheses. `None` if the line names no equipment.
pub fn split_unit_equipment(raw: &str) -> Option<(&str, &str)> {
    let open = raw.find('(')?;
    let equipment = &raw[open + 1..];
    let equipment = equipment.rfind(')').map_or(equipment, |close| &equipment[..close]);
    Some((raw[..open].trim(), equipment.trim()))
}

/// Recognize a field without storing it.
pub fn ignore(_: &mut ParseState, _: &Line<'_>) -> FieldResult {
    Ok(())
}

pub fn fax_timestamp(state: &mut ParseState, raw: &str) -> FieldResult {
    state.operation.timestamp = read_fax_timestamp(raw, state.operation.timestamp);
    Ok(())
}

pub fn alarm_timestamp(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.timestamp = read_fax_timestamp(line.message, state.received);
    Ok(())
}

pub fn operation_number(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.operation_number = line.message.to_string();
    Ok(())
}

pub fn messenger(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.messenger = line.message.to_string();
    Ok(())
}

pub fn messenger_line(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    append_line(&mut state.operation.messenger, line.message);
    Ok(())
}

pub fn priority(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.priority = line.message.to_string();
    Ok(())
}

pub fn comment(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.comment = line.message.to_string();
    Ok(())
}

pub fn comment_line(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    append_line(&mut state.operation.comment, line.message);
    Ok(())
}

pub fn picture(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.picture = line.message.to_string();
    Ok(())
}

pub fn picture_line(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    append_line(&mut state.operation.picture, line.message);
    Ok(())
}

pub fn operation_plan(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.operation_plan = line.message.to_string();
    Ok(())
}

pub fn keyword(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.keywords.keyword = line.message.to_string();
    Ok(())
}

pub fn emergency_keyword(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.keywords.emergency_keyword = line.message.to_string();
    Ok(())
}

pub fn keyword_b(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.keywords.b = line.message.to_string();
    Ok(())
}

pub fn keyword_r(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.keywords.r = line.message.to_string();
    Ok(())
}

pub fn keyword_s(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.keywords.s = line.message.to_string();
    Ok(())
}

pub fn keyword_t(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.keywords.t = line.message.to_string();
    Ok(())
}

pub fn einsatzort_location(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.einsatzort.location = line.message.to_string();
    Ok(())
}

/// Street analysis, appendix goes to "Einsatzort Zusatz".
pub fn einsatzort_street(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    let appendix = apply_street(&mut state.operation.einsatzort, line.message);
    state.operation.set_custom_data("Einsatzort Zusatz", appendix);
    Ok(())
}

/// Zip code, city and `" - "` cut.
pub fn einsatzort_city(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    apply_city(&mut state.operation.einsatzort, line.message, CityCut::SpacedDash);
    Ok(())
}

/// Zip code, city and `-` cut.
pub fn einsatzort_city_dash(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    apply_city(&mut state.operation.einsatzort, line.message, CityCut::Dash);
    Ok(())
}

pub fn einsatzort_property(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.einsatzort.property = line.message.to_string();
    Ok(())
}

pub fn einsatzort_intersection(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.einsatzort.intersection = line.message.to_string();
    Ok(())
}

pub fn einsatzort_coordinates(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    apply_coordinates(&mut state.operation.einsatzort, line.raw)
}

/// Whole-meter Gauss-Krüger values, easting first. Lines without exactly
/// two numbers are left alone.
pub fn einsatzort_grid_coordinates(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    apply_grid_coordinates(&mut state.operation.einsatzort, line.raw)
}

/// Read two whole-meter Gauss-Krüger values (easting, northing) from a line.
pub fn apply_grid_coordinates(location: &mut PropertyLocation, text: &str) -> FieldResult {
    let values: Vec<&str> = NUMBER.find_iter(text).map(|m| m.as_str()).collect();
    if let [east, north] = values[..] {
        let position = gauss_krueger_to_wgs84(parse_number(east)?, parse_number(north)?)?;
        location.geo_latitude = Some(position.latitude);
        location.geo_longitude = Some(position.longitude);
    }
    Ok(())
}

pub fn append_einsatzort_street(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.einsatzort.street.push_str(line.message);
    Ok(())
}

pub fn append_einsatzort_city(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.einsatzort.city.push_str(line.message);
    Ok(())
}

pub fn append_einsatzort_property(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.einsatzort.property.push_str(line.message);
    Ok(())
}

/// Street analysis, appendix goes to "Zielort Zusatz".
pub fn zielort_street(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    let appendix = apply_street(&mut state.operation.zielort, line.message);
    state.operation.set_custom_data("Zielort Zusatz", appendix);
    Ok(())
}

/// Zip code and city, no cut.
pub fn zielort_city(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    apply_city(&mut state.operation.zielort, line.message, CityCut::None);
    Ok(())
}

pub fn zielort_property(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.zielort.property = line.message.to_string();
    Ok(())
}

pub fn append_zielort_street(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.zielort.street.push_str(line.message);
    Ok(())
}

pub fn append_zielort_city(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.zielort.city.push_str(line.message);
    Ok(())
}

pub fn append_zielort_property(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.zielort.property.push_str(line.message);
    Ok(())
}

/// Start a new resource.
pub fn resource_name(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.resource.full_name = line.message.to_string();
    Ok(())
}

/// Add requested equipment to the current resource, if any is named.
pub fn resource_equipment(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    if !line.message.trim().is_empty() {
        state.resource.requested_equipment.push(line.message.to_string());
    }
    Ok(())
}

/// Set the alarm time of the current resource and hand it to the operation.
pub fn resource_alarmed(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.resource.timestamp = resource_timestamp(line.message);
    state.emit_resource();
    Ok(())
}

/// Add requested equipment and hand the current resource to the operation.
pub fn resource_equipment_last(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    resource_equipment(state, line)?;
    state.emit_resource();
    Ok(())
}

/// The whole message names a resource.
pub fn resource_line(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.resource.full_name = line.message.to_string();
    state.emit_resource();
    Ok(())
}

/// Store the ingestion time as "Faxeingang: HH:MM:SS" under "Faxtime".
pub fn stamp_fax_received(state: &mut ParseState) {
    if state.first("Faxtime") {
        let stamp = format!("Faxeingang: {}", state.received.format("%H:%M:%S"));
        state.operation.set_custom_data("Faxtime", stamp);
    }
}

/// Prepare the free-text fields for ASCII-only receivers: the house number
/// label is dropped from the street and umlauts are spelled out.
pub fn ascii_text_fields(state: &mut ParseState) {
    let operation = &mut state.operation;
    let street = &mut operation.einsatzort.street;
    *street = street
        .replace("Haus-Nr.:", " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    for field in [
        &mut operation.picture,
        &mut operation.comment,
        &mut operation.einsatzort.city,
        &mut operation.einsatzort.street,
    ] {
        *field = transliterate_umlauts(field).trim().to_string();
    }
}

/// Text behind `label` anywhere in the line, without a separating colon or
/// dot. `None` if the label is absent or nothing follows it.
pub fn text_after(raw: &str, label: &str) -> Option<String> {
    let start = raw.find(label)? + label.len();
    let value = raw[start..].trim_start_matches([':', ' ', '.']).trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fax::engine::Section;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn state() -> ParseState {
        let received = NaiveDate::from_ymd_opt(2020, 3, 5)
            .unwrap()
            .and_hms_opt(14, 40, 0)
            .unwrap();
        ParseState::new(received, Section::Einsatzmittel, true)
    }

    fn line(prefix: &str, message: &'static str) -> Line<'static> {
        Line {
            index: 0,
            raw: message,
            prefix: prefix.to_string(),
            keyword: None,
            message,
        }
    }

    #[test]
    fn test_resource_accumulation() {
        let mut state = state();
        for _ in 0..2 {
            resource_name(&mut state, &line("NAME", "Florian 1")).unwrap();
            resource_equipment(&mut state, &line("GEF. GERÄT", "Schere")).unwrap();
            resource_alarmed(&mut state, &line("ALARMIERT", "05.03.2020 14:35")).unwrap();
            assert_eq!(state.resource, Default::default());
        }

        let resources = &state.operation.resources;
        assert_eq!(resources.len(), 2);
        assert_eq!(resources[0].full_name, "Florian 1");
        assert_eq!(resources[0].requested_equipment, vec!["Schere"]);
        assert_eq!(resources[0].timestamp, "05.03.2020 14:35");
        assert_eq!(resources[1], resources[0]);
    }

    #[test]
    fn test_empty_equipment_is_skipped() {
        let mut state = state();
        resource_name(&mut state, &line("NAME", "Florian 1")).unwrap();
        resource_equipment_last(&mut state, &line("GEF. GERÄTE", "")).unwrap();
        assert!(state.operation.resources[0].requested_equipment.is_empty());
    }

    #[test]
    fn test_city_cuts() {
        let mut location = PropertyLocation::default();
        apply_city(&mut location, "12345 Musterstadt - Musterstadt Musterstadt", CityCut::SpacedDash);
        assert_eq!(location.zip_code, "12345");
        assert_eq!(location.city, "Musterstadt");

        apply_city(&mut location, "Musterstadt-Nord", CityCut::Dash);
        assert_eq!(location.zip_code, "");
        assert_eq!(location.city, "Musterstadt");

        apply_city(&mut location, "80331München", CityCut::None);
        assert_eq!(location.zip_code, "80331");
        assert_eq!(location.city, "München");
    }

    #[test]
    fn test_coordinates() {
        let mut location = PropertyLocation::default();
        apply_coordinates(&mut location, "KOORDINATE: 4468000.00 / 5333000.00").unwrap();
        assert!(location.has_geo_coordinates());

        let mut location = PropertyLocation::default();
        apply_coordinates(&mut location, "KOORDINATE: unbekannt").unwrap();
        assert!(!location.has_geo_coordinates());

        assert!(apply_coordinates(&mut location, "KOORDINATE: 1.5 / 1.0").is_err());
    }

    #[test]
    fn test_label_value() {
        assert_eq!(label_value("Name : Florian 1", "NAME").as_deref(), Some("Florian 1"));
        assert_eq!(label_value("Alarmiert: 14:35", "ALARMIERT").as_deref(), Some("14:35"));
        assert_eq!(label_value("Florian 1", "NAME"), None);
    }

    #[test]
    fn test_split_unit_equipment() {
        assert_eq!(split_unit_equipment("FL FFB 40/1 (DLK)"), Some(("FL FFB 40/1", "DLK")));
        assert_eq!(split_unit_equipment("FL FFB 11/1 (Säge"), Some(("FL FFB 11/1", "Säge")));
        assert_eq!(split_unit_equipment("FL FFB 11/1"), None);
    }

    #[test]
    fn test_before_last() {
        assert_eq!(before_last("HLF 20 (Florian 1)", '(').unwrap(), "HLF 20 ");
        assert!(before_last("HLF 20", '(').is_err());
    }

    #[test]
    fn test_text_after_label() {
        assert_eq!(text_after("Einsatznummer: 4711", "Einsatznummer").as_deref(), Some("4711"));
        assert_eq!(text_after("E - Nr. 2020-17", "E - Nr").as_deref(), Some("2020-17"));
        assert_eq!(text_after("Einsatznummer:", "Einsatznummer"), None);
        assert_eq!(text_after("Einsatzort: Hof", "Einsatznummer"), None);
    }

    #[test]
    fn test_ascii_text_fields() {
        let mut state = state();
        state.operation.einsatzort.street = "Hauptstraße Haus-Nr.: 12".to_string();
        state.operation.picture = "Brand Küche ".to_string();
        ascii_text_fields(&mut state);
        assert_eq!(state.operation.einsatzort.street, "Hauptstrasse 12");
        assert_eq!(state.operation.picture, "Brand Kueche");
    }
}
