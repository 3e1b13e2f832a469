//! `{Path.To.Field}` template rendering for operations.
//!
//! Notification texts are configured as templates such as
//! `"{Keywords.EmergencyKeyword} - {Einsatzort.Street} {Einsatzort.StreetNumber}"`.
//! A macro that names no model field is looked up in the custom data.

use super::operation::Operation;

/// Placeholder for unresolved macros when question marks are requested.
pub const MISSING_VALUE: &str = "[?]";

/// Options for [`Operation::format_template`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatOptions {
    /// Replace unresolved macros with [`MISSING_VALUE`] instead of an empty string.
    pub question_marks_for_missing: bool,
    /// Replace newlines in the template with spaces before substitution.
    pub remove_newlines: bool,
}

impl FormatOptions {
    pub fn with_question_marks(mut self, enabled: bool) -> Self {
        self.question_marks_for_missing = enabled;
        self
    }

    pub fn with_removed_newlines(mut self, enabled: bool) -> Self {
        self.remove_newlines = enabled;
        self
    }
}

impl Operation {
    /// Substitute every `{macro}` in `template` with the value it names.
    pub fn format_template(&self, template: &str, options: FormatOptions) -> String {
        let template = if options.remove_newlines {
            template.replace("\r\n", " ").replace('\n', " ")
        } else {
            template.to_string()
        };

        let missing = if options.question_marks_for_missing {
            MISSING_VALUE
        } else {
            ""
        };

        let mut out = template.clone();
        for name in macros(&template) {
            let value = self
                .field_text(&name)
                .or_else(|| self.custom_data(&name).map(str::to_string))
                .unwrap_or_else(|| missing.to_string());
            out = out.replace(&format!("{{{}}}", name), &value);
        }
        out
    }
}

fn macros(template: &str) -> Vec<String> {
    let mut found = Vec::new();
    let mut current: Option<String> = None;

    for c in template.chars() {
        match c {
            '{' => current = Some(String::new()),
            '}' => {
                if let Some(name) = current.take() {
                    found.push(name);
                }
            }
            _ => {
                if let Some(name) = current.as_mut() {
                    name.push(c);
                }
            }
        }
    }

    found
}
