//! ILS Limburg. Lines without a keyword make up the comment.

use crate::error::FieldResult;
use crate::fax::engine::{Fallback, FieldRule, Layout, Line, ParseState, Section};
use crate::fax::rules::ColonPolicy;
use crate::fax::setters::{self, custom_data_setters};

const KEYWORDS: &[&str] = &["Alarmstichwort", "Einsatzort", "Ortsteil", "Ort", "Objekt", ""];

const FIELDS: &[FieldRule] = &[
    FieldRule::anywhere("ALARMSTICHWORT", setters::keyword),
    FieldRule::anywhere("EINSATZORT", setters::einsatzort_street),
    FieldRule::anywhere("ORTSTEIL", district),
    FieldRule::anywhere("ORT", city),
    FieldRule::anywhere("OBJEKT", setters::einsatzort_property),
];

const FALLBACKS: &[(Section, Fallback)] = &[(Section::Header, Fallback::Apply(setters::comment_line))];

pub static LAYOUT: Layout = Layout::new("IlsLimburgParser")
    .keywords(KEYWORDS)
    .fields(FIELDS)
    .fallbacks(FALLBACKS)
    .colon(ColonPolicy::KeywordOnly);

custom_data_setters! {
    district => "Einsatzort Ortsteil",
}

fn city(state: &mut ParseState, line: &Line<'_>) -> FieldResult {
    state.operation.einsatzort.city = line.message.to_string();
    Ok(())
}
