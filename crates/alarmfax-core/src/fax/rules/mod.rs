//! Field extraction rules shared by all fax layouts.

pub mod keywords;
pub mod patterns;
pub mod street;
pub mod text;
pub mod timestamps;

pub use keywords::{get_message_text, split_prefix, starts_with_keyword, ColonPolicy};
pub use street::{analyze_street_line, StreetLine};
pub use text::{
    append_line, append_spaced, city_without_zip, get_text_between, join_line,
    read_zip_code_from_city, remove_trailing_newline, transliterate_umlauts, truncate_at_dash,
    truncate_at_spaced_dash, Comparison,
};
pub use timestamps::{
    read_fax_timestamp, read_german_long_date, resource_timestamp, try_get_timestamp_from_message,
};
