//! Small text helpers shared by the source layouts.

use regex::RegexBuilder;

use crate::error::{FieldError, FieldResult};

/// How [`get_text_between`] compares its anchors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Comparison {
    #[default]
    IgnoreCase,
    Exact,
}

/// Leading digit run of a city field ("80331München" → "80331").
pub fn read_zip_code_from_city(city: &str) -> String {
    city.chars().take_while(char::is_ascii_digit).collect()
}

/// The city field with its leading zip code removed and trimmed.
pub fn city_without_zip(city: &str) -> &str {
    city.trim_start_matches(|c: char| c.is_ascii_digit()).trim()
}

/// Return the text strictly between `from` and `until`.
///
/// `None` stands for the start or end of the text. The `until` anchor is
/// searched after the `from` anchor. A missing anchor is an error.
pub fn get_text_between(
    text: &str,
    from: Option<&str>,
    until: Option<&str>,
    comparison: Comparison,
) -> FieldResult<String> {
    let start = match from {
        Some(anchor) => find_anchor(text, anchor, comparison)?.1,
        None => 0,
    };

    let end = match until {
        Some(anchor) => start + find_anchor(&text[start..], anchor, comparison)?.0,
        None => text.len(),
    };

    Ok(text[start..end].trim().to_string())
}

fn find_anchor(text: &str, anchor: &str, comparison: Comparison) -> FieldResult<(usize, usize)> {
    let not_found = || FieldError::AnchorNotFound {
        anchor: anchor.to_string(),
        text: text.to_string(),
    };

    let pattern = RegexBuilder::new(&regex::escape(anchor))
        .case_insensitive(comparison == Comparison::IgnoreCase)
        .build()
        .map_err(|_| not_found())?;

    pattern
        .find(text)
        .map(|found| (found.start(), found.end()))
        .ok_or_else(not_found)
}

/// Drop one trailing newline and trim, as left behind by [`append_line`].
pub fn remove_trailing_newline(value: &str) -> String {
    match value.strip_suffix('\n') {
        Some(stripped) if !value.trim().is_empty() => stripped.trim().to_string(),
        _ => value.to_string(),
    }
}

/// Append `line` to a multi-line field, newline terminated.
pub fn append_line(field: &mut String, line: &str) {
    field.push_str(line);
    field.push('\n');
}

/// Append `line` separated by a newline, without terminating it.
pub fn join_line(field: &mut String, line: &str) {
    if !field.is_empty() && !field.ends_with('\n') {
        field.push('\n');
    }
    field.push_str(line);
}

/// Append `text` with a single separating space.
pub fn append_spaced(field: &mut String, text: &str) {
    if !field.is_empty() {
        field.push(' ');
    }
    field.push_str(text);
}

/// Cut administrative duplicates after the first `" - "`.
///
/// "Musterstadt - Musterstadt Musterstadt" → "Musterstadt".
pub fn truncate_at_spaced_dash(city: &str) -> &str {
    match city.find(" - ") {
        Some(index) => city[..index].trim(),
        None => city.trim(),
    }
}

/// Cut at the first `-`, spaced or not.
pub fn truncate_at_dash(city: &str) -> &str {
    match city.find('-') {
        Some(index) => city[..index].trim(),
        None => city.trim(),
    }
}

/// Replace German umlauts and sharp s with their ASCII spellings.
pub fn transliterate_umlauts(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            'ä' => out.push_str("ae"),
            'ö' => out.push_str("oe"),
            'ü' => out.push_str("ue"),
            'Ä' => out.push_str("Ae"),
            'Ö' => out.push_str("Oe"),
            'Ü' => out.push_str("Ue"),
            'ß' => out.push_str("ss"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_join_line() {
        let mut field = "Meier".to_string();
        join_line(&mut field, "0391 12345");
        join_line(&mut field, "Handy");
        assert_eq!(field, "Meier\n0391 12345\nHandy");

        let mut empty = String::new();
        join_line(&mut empty, "Meier");
        assert_eq!(empty, "Meier");
    }

    #[test]
    fn test_zip_code_from_city() {
        assert_eq!(read_zip_code_from_city("80331München"), "80331");
        assert_eq!(city_without_zip("80331München"), "München");
        assert_eq!(read_zip_code_from_city("12345 Beispielstadt"), "12345");
        assert_eq!(read_zip_code_from_city("Beispielstadt 12345"), "");
        assert_eq!(read_zip_code_from_city("123"), "123");
    }

    #[test]
    fn test_dash_truncation() {
        assert_eq!(
            truncate_at_spaced_dash("Musterstadt - Musterstadt Musterstadt"),
            "Musterstadt"
        );
        assert_eq!(truncate_at_spaced_dash("Garmisch-Partenkirchen"), "Garmisch-Partenkirchen");
        assert_eq!(truncate_at_dash("Musterstadt-Musterstadt"), "Musterstadt");
        assert_eq!(truncate_at_dash("Musterstadt"), "Musterstadt");
    }

    #[test]
    fn test_text_between() {
        let text = "4711 am: 05.03.2020 um 14:32";
        assert_eq!(
            get_text_between(text, Some("AM:"), Some("um"), Comparison::IgnoreCase).unwrap(),
            "05.03.2020"
        );
        assert_eq!(
            get_text_between(text, None, Some("am:"), Comparison::Exact).unwrap(),
            "4711"
        );
        assert_eq!(
            get_text_between(text, Some("um"), None, Comparison::default()).unwrap(),
            "14:32"
        );
    }

    #[test]
    fn test_text_between_missing_anchor() {
        let err = get_text_between("Kirchweg 5", Some("Haus-Nr.:"), None, Comparison::Exact)
            .unwrap_err();
        assert_eq!(
            err,
            FieldError::AnchorNotFound {
                anchor: "Haus-Nr.:".to_string(),
                text: "Kirchweg 5".to_string(),
            }
        );

        assert!(get_text_between("a (b", Some("("), Some(")"), Comparison::IgnoreCase).is_err());
    }

    #[test]
    fn test_until_searched_after_from() {
        let text = "Einsatz - Ort: Musterstadt - Nord";
        assert_eq!(
            get_text_between(text, Some("Ort:"), Some("-"), Comparison::IgnoreCase).unwrap(),
            "Musterstadt"
        );
    }

    #[test]
    fn test_trailing_newline() {
        assert_eq!(remove_trailing_newline("Zeile 1\nZeile 2\n"), "Zeile 1\nZeile 2");
        assert_eq!(remove_trailing_newline("ohne"), "ohne");
        assert_eq!(remove_trailing_newline("\n"), "\n");

        let mut comment = String::new();
        append_line(&mut comment, "Starke Rauchentwicklung");
        assert_eq!(remove_trailing_newline(&comment), "Starke Rauchentwicklung");
    }

    #[test]
    fn test_append_spaced() {
        let mut property = String::new();
        append_spaced(&mut property, "Feuerwache");
        append_spaced(&mut property, "Nord");
        assert_eq!(property, "Feuerwache Nord");
    }

    #[test]
    fn test_transliterate() {
        assert_eq!(transliterate_umlauts("Äußere Brückenstraße"), "Aeussere Brueckenstrasse");
    }
}
