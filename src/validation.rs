//! Form field normalization and required-field checks

use indexmap::IndexMap;

/// Field name to error message, in submission order. A field is present
/// only when it failed validation.
pub type ValidationErrors = IndexMap<String, String>;

/// Trim leading and trailing whitespace (Unicode `White_Space`, so U+00A0
/// and U+2009 are stripped too). `None` normalizes to an empty string.
pub fn trim(value: Option<&str>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Returns an error message when the trimmed value is empty.
pub fn require_non_empty(value: Option<&str>, label: &str) -> Option<String> {
    if trim(value).is_empty() {
        Some(format!("{} is required", label))
    } else {
        None
    }
}

/// Checks every field as required, using the field name as its label.
pub fn validate_all<'a, I>(fields: I) -> ValidationErrors
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
{
    fields
        .into_iter()
        .filter_map(|(name, value)| {
            require_non_empty(value, name).map(|message| (name.to_string(), message))
        })
        .collect()
}
