//! Common regex patterns for dispatch fax extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Dates as printed in fax headers: DD.MM.YYYY with any of "- /." as separator
    pub static ref FAX_DATE: Regex = Regex::new(
        r"(0[1-9]|[12][0-9]|3[01])[- /.](0[1-9]|1[012])[- /.]((?:19|20)\d\d)"
    ).unwrap();

    // Fax date where OCR put blanks after the separators: "05. 03. 2020"
    pub static ref SPACED_FAX_DATE: Regex = Regex::new(
        r"(0[1-9]|[12][0-9]|3[01])[- /.] ?(0[1-9]|1[012])[- /.] ?((?:19|20)\d\d)"
    ).unwrap();

    // Ten digit operation number
    pub static ref OPERATION_NUMBER: Regex = Regex::new(r"\d{10}").unwrap();

    // Radio unit code, e.g. "110.44.01"
    pub static ref UNIT_CODE: Regex = Regex::new(r"\d{3}(\.\d{2}){2}").unwrap();

    // Long German date with clock time: "15. März 2020, 14:32"
    pub static ref GERMAN_LONG_DATE: Regex = Regex::new(
        r"([0-3]?\d)\. (\w*) (20\d{2}), ([01]?\d|2[0-3]):([0-5]\d)"
    ).unwrap();

    // HH:MM with optional :SS
    pub static ref FAX_TIME: Regex = Regex::new(
        r"([01]?[0-9]|2[0-3]):([0-5][0-9])(?::([0-5][0-9]))?"
    ).unwrap();

    // Clock time with seconds, as used in resource alarm lists
    pub static ref CLOCK_HMS: Regex = Regex::new(
        r"(([01]?\d|2[0-3]):[0-5]\d:[0-5]\d)|(--:--:--)"
    ).unwrap();

    // Alarm time with seconds followed by a five digit unit code
    pub static ref ALARMED_UNIT: Regex = Regex::new(
        r"((0[1-9]|[12][0-9]|3[01])[- /.](0[1-9]|1[012])[- /.](19|20)\d\d ([01]?[0-9]|2[0-3]):[0-5][0-9]:[0-5][0-9]) (\d{5})"
    ).unwrap();

    // Dotted date and clock time, seconds optional: "05.03.2020 14:33:10"
    pub static ref DATE_TIME: Regex = Regex::new(
        r"(0[1-9]|[12][0-9]|3[01])\.(0[1-9]|1[012])\.(19|20)\d\d \d{2}:\d{2}(:\d{2})?"
    ).unwrap();

    // House number with an optional lowercase suffix ("12a", "2 a")
    pub static ref STREET_NUMBER: Regex = Regex::new(r"\d+[ ]*[a-z]*").unwrap();

    // Highway identifiers: Autobahn, Bundesstraße, Staatsstraße
    pub static ref HIGHWAY_TOKEN: Regex = Regex::new(r"A\d+|B\d+|St\d+").unwrap();

    // Separated digit run, candidate kilometer marker on highways
    pub static ref HIGHWAY_KILOMETER: Regex = Regex::new(r" \d+").unwrap();

    // Dangling kilometer label left after the marker was removed
    pub static ref TRAILING_KM_LABEL: Regex = Regex::new(r"(?i)\s+km\.?$").unwrap();

    // Decimal numbers in coordinate lines
    pub static ref DECIMAL_NUMBER: Regex = Regex::new(r"\d+\.\d+").unwrap();

    // Integer or decimal numbers
    pub static ref NUMBER: Regex = Regex::new(r"[\d.]+").unwrap();

    // Austrian four digit zip code followed by the city
    pub static ref AUSTRIAN_ZIP_CITY: Regex = Regex::new(r"(\d{4}) (.*)").unwrap();

    // Five digit German zip code
    pub static ref ZIP_CODE: Regex = Regex::new(r"\d{5}").unwrap();

    // WKT point "POINT (x y)"
    pub static ref WKT_POINT: Regex = Regex::new(r"POINT \((\d+\.\d+) (\d+\.\d+)\)").unwrap();

    // Radio call sign of a unit, e.g. "2-44-1"
    pub static ref CALL_SIGN: Regex = Regex::new(r"[1-9]{1,2}-[1-9]{2}-[1-9]").unwrap();

    // Bracketed code inside a keyword line, e.g. "[B3]"
    pub static ref BRACKETED: Regex = Regex::new(r"\[(.*)]").unwrap();

    // Unit code in angle brackets
    pub static ref ANGLE_BRACKETED: Regex = Regex::new(r"<(.*)>").unwrap();
}
