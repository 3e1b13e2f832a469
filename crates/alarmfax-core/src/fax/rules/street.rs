//! Street line decomposition.

use super::patterns::{HIGHWAY_KILOMETER, HIGHWAY_TOKEN, STREET_NUMBER, TRAILING_KM_LABEL};

/// House number used when the fax names none. Geocoders work best with one.
pub const DEFAULT_STREET_NUMBER: &str = "1";

const HOUSE_NUMBER_MARKERS: [&str; 2] = ["Haus-Nr.:", "HausNr.:"];

/// A street line split into its parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreetLine {
    pub street: String,
    /// House number, or the kilometer marker on highways.
    pub street_number: String,
    /// Whatever follows the number, e.g. floor information.
    pub appendix: String,
}

/// Split a combined street line into street, number and appendix.
///
/// Highways (`A8`, `B12`, `St2045`) carry a kilometer marker instead of a
/// house number; it is taken from the last separated digit run. Otherwise an
/// explicit `Haus-Nr.:` marker splits the line, and failing that the first
/// embedded number does.
pub fn analyze_street_line(line: &str) -> StreetLine {
    if HIGHWAY_TOKEN.is_match(line) {
        return analyze_highway(line);
    }

    let mut parsed = StreetLine {
        street: line.trim().to_string(),
        street_number: DEFAULT_STREET_NUMBER.to_string(),
        appendix: String::new(),
    };

    let marker = find_house_number_marker(line);
    let rest = match marker {
        Some(index) => {
            parsed.street = line[..index].trim().to_string();
            &line[index..]
        }
        None => line,
    };

    if let Some(number) = STREET_NUMBER.find(rest) {
        if marker.is_none() {
            parsed.street = line[..number.start()].trim().to_string();
        }
        parsed.street_number = number.as_str().trim().to_string();
        parsed.appendix = clean_appendix(&rest[number.end()..]);
    }

    parsed
}

fn analyze_highway(line: &str) -> StreetLine {
    let (street, street_number) = match find_house_number_marker(line) {
        Some(index) => {
            let marker_len = HOUSE_NUMBER_MARKERS
                .iter()
                .find(|marker| line[index..].starts_with(**marker))
                .map_or(0, |marker| marker.len());
            (
                line[..index].to_string(),
                line[index + marker_len..].trim().to_string(),
            )
        }
        None => match HIGHWAY_KILOMETER.find_iter(line).last() {
            Some(kilometer) => {
                let mut street = String::with_capacity(line.len());
                street.push_str(&line[..kilometer.start()]);
                street.push_str(&line[kilometer.end()..]);
                (street, kilometer.as_str().trim().to_string())
            }
            None => (line.to_string(), String::new()),
        },
    };

    StreetLine {
        street: TRAILING_KM_LABEL.replace(street.trim(), "").trim().to_string(),
        street_number,
        appendix: String::new(),
    }
}

fn find_house_number_marker(line: &str) -> Option<usize> {
    HOUSE_NUMBER_MARKERS
        .iter()
        .filter_map(|marker| line.find(marker))
        .min()
}

fn clean_appendix(text: &str) -> String {
    let text = text.trim();
    text.strip_prefix(',').unwrap_or(text).trim().to_string()
}
