//! Keyword detection and prefix/message splitting.

/// Upper-case a keyword or line for comparison.
pub fn fold(text: &str) -> String {
    text.to_uppercase()
}

/// Return the first keyword (in list order) that the line starts with.
///
/// Both sides are upper-cased, so the comparison is case-insensitive.
/// The empty keyword matches every line. Callers must list longer keywords
/// before shorter ones that are textual prefixes of them.
pub fn starts_with_keyword<'k>(line: &str, keywords: &[&'k str]) -> Option<&'k str> {
    let line = fold(line);
    keywords
        .iter()
        .copied()
        .find(|keyword| line.starts_with(&fold(keyword)))
}

/// Remove as many leading characters from `line` as `prefix` covers.
///
/// Counts in upper-cased form so that a keyword matched via [`fold`] is
/// stripped exactly even when upper-casing changes the length (`ß` → `SS`).
/// Never panics: a prefix longer than the line yields an empty string.
pub fn strip_leading<'a>(line: &'a str, prefix: &str) -> &'a str {
    let target = fold(prefix).len();
    let mut covered = 0;
    for (index, c) in line.char_indices() {
        if covered >= target {
            return &line[index..];
        }
        covered += c.to_uppercase().map(char::len_utf8).sum::<usize>();
    }
    ""
}

/// Extract the message part of a `PREFIX: message` line.
///
/// With a non-empty `prefix`, its length is stripped from the line;
/// otherwise everything up to and including the first colon is removed.
/// A single leading colon left after that is dropped as well, and the
/// result is trimmed.
pub fn get_message_text(line: &str, prefix: Option<&str>) -> String {
    let rest = match prefix {
        Some(prefix) if !prefix.is_empty() => strip_leading(line, prefix).trim(),
        _ => match line.find(':') {
            Some(colon) => &line[colon + 1..],
            None => line,
        },
    };

    rest.strip_prefix(':').unwrap_or(rest).trim().to_string()
}

/// Where the field label ends on a keyword line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColonPolicy {
    /// The text before the first colon is the prefix.
    #[default]
    FirstColon,
    /// Only a colon directly after the keyword counts; a colon further right
    /// belongs to the value (e.g. a clock time).
    AfterKeyword,
    /// The matched keyword is always the prefix.
    KeywordOnly,
}

/// A line split into its upper-cased prefix and trimmed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixedLine<'a> {
    pub prefix: String,
    pub message: &'a str,
}

/// Split a line whose start matched `keyword`.
///
/// If the policy accepts a colon, the prefix is the text before it and the
/// message the text after it; otherwise the keyword itself is the prefix
/// and its length (plus a directly following colon) is stripped from the line.
pub fn split_prefix<'a>(line: &'a str, keyword: &str, policy: ColonPolicy) -> PrefixedLine<'a> {
    let colon = line.find(':').filter(|&colon| match policy {
        ColonPolicy::FirstColon => true,
        ColonPolicy::AfterKeyword => colon <= keyword.len() + 1,
        ColonPolicy::KeywordOnly => false,
    });

    match colon {
        Some(colon) => PrefixedLine {
            prefix: fold(line[..colon].trim()),
            message: line[colon + 1..].trim(),
        },
        None => {
            let rest = strip_leading(line, keyword).trim();
            PrefixedLine {
                prefix: fold(keyword.trim()),
                message: rest.strip_prefix(':').unwrap_or(rest).trim(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_first_keyword_wins() {
        let ordered = ["STICHWORT B", "STICHWORT"];
        assert_eq!(starts_with_keyword("STICHWORT B: Brand", &ordered), Some("STICHWORT B"));
        assert_eq!(starts_with_keyword("Stichwort: THL 1", &ordered), Some("STICHWORT"));

        let misordered = ["STICHWORT", "STICHWORT B"];
        assert_eq!(starts_with_keyword("STICHWORT B: Brand", &misordered), Some("STICHWORT"));
    }

    #[test]
    fn test_case_insensitive_both_sides() {
        let keywords = ["Einsatzort Position X", "Schlagwort."];
        assert_eq!(
            starts_with_keyword("EINSATZORT POSITION X : 4468000", &keywords),
            Some("Einsatzort Position X")
        );
        assert_eq!(starts_with_keyword("schlagwort.: B3", &keywords), Some("Schlagwort."));
        assert_eq!(starts_with_keyword("Unbekannt", &keywords), None);
    }

    #[test]
    fn test_empty_keyword_matches_everything() {
        assert_eq!(starts_with_keyword("Musterstadt", &["ORT", ""]), Some(""));
    }

    #[test]
    fn test_sharp_s_keywords() {
        assert_eq!(starts_with_keyword("Straße: Kirchweg 5", &["STRAßE"]), Some("STRAßE"));
        assert_eq!(strip_leading("Straße Kirchweg 5", "STRAßE"), " Kirchweg 5");
    }

    #[test]
    fn test_strip_leading_short_input() {
        assert_eq!(strip_leading("ORT", "ORTSTEIL"), "");
        assert_eq!(strip_leading("", "X"), "");
        assert_eq!(strip_leading("abc", ""), "abc");
    }

    #[test]
    fn test_get_message_text() {
        assert_eq!(get_message_text("NAME : Florian 1", Some("NAME")), "Florian 1");
        assert_eq!(get_message_text("Ort: 12345 Beispielstadt", None), "12345 Beispielstadt");
        assert_eq!(get_message_text("Ort:: Beispielstadt", None), "Beispielstadt");
        assert_eq!(get_message_text("ohne doppelpunkt ", None), "ohne doppelpunkt");
        assert_eq!(get_message_text("NA", Some("NAME")), "");
    }

    #[test]
    fn test_split_prefix_with_colon() {
        let split = split_prefix("Straße : Kirchweg 5", "STRAßE", ColonPolicy::FirstColon);
        assert_eq!(split.prefix, "STRASSE");
        assert_eq!(split.message, "Kirchweg 5");
    }

    #[test]
    fn test_split_prefix_without_colon() {
        let split = split_prefix("ORT 12345 Beispielstadt", "ORT", ColonPolicy::FirstColon);
        assert_eq!(split.prefix, "ORT");
        assert_eq!(split.message, "12345 Beispielstadt");
    }

    #[test]
    fn test_split_prefix_after_keyword_policy() {
        let split = split_prefix("Einsatz-Nr. 4711 um 14:32", "Einsatz-Nr.", ColonPolicy::AfterKeyword);
        assert_eq!(split.prefix, "EINSATZ-NR.");
        assert_eq!(split.message, "4711 um 14:32");

        let split = split_prefix("Objekt: Feuerwache", "Objekt", ColonPolicy::AfterKeyword);
        assert_eq!(split.prefix, "OBJEKT");
        assert_eq!(split.message, "Feuerwache");
    }

    #[test]
    fn test_split_prefix_keyword_only() {
        let split = split_prefix(
            "Straße Kirchweg Haus-Nr.: 5",
            "STRAßE",
            ColonPolicy::KeywordOnly,
        );
        assert_eq!(split.prefix, "STRASSE");
        assert_eq!(split.message, "Kirchweg Haus-Nr.: 5");

        let split = split_prefix("Objekt : Feuerwache", "OBJEKT", ColonPolicy::KeywordOnly);
        assert_eq!(split.message, "Feuerwache");
    }
}
